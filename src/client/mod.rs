//! Presentation client
//!
//! Loads the published dataset once, then filters, paginates and renders it
//! entirely in memory. All browsing state lives in an explicit [`Session`].

pub mod filter;
pub mod pagination;
pub mod render;
pub mod repl;
pub mod session;
pub mod source;

pub use session::{LoadState, PageView, Session};
pub use source::{DatasetSource, FileDatasetSource, HttpDatasetSource};
