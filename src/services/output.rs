use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Writes a file through a temporary sibling that is renamed into place
///
/// Readers never observe a half-written file, and a failed write leaves any
/// previous version untouched.
pub fn write_atomically<F>(path: &Path, write: F) -> AppResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> AppResult<()>,
{
    let mut staged = StagedFiles::new();
    staged.stage(path, write)?;
    staged.commit()
}

/// A group of output files that appear together or not at all
///
/// Each file is written to a `.tmp` sibling by [`StagedFiles::stage`]; nothing
/// is renamed into place until [`StagedFiles::commit`]. Dropping the group
/// without committing removes every staged temporary.
#[derive(Debug, Default)]
pub struct StagedFiles {
    /// (temporary, final) path pairs, in staging order
    pending: Vec<(PathBuf, PathBuf)>,
}

impl StagedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage<F>(&mut self, path: &Path, write: F) -> AppResult<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> AppResult<()>,
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }

        let tmp_path = temporary_path(path);
        let file = File::create(&tmp_path).map_err(|e| AppError::io(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);

        let result = write(&mut writer).and_then(|_| {
            writer
                .flush()
                .map_err(|e| AppError::io(&tmp_path, e))
        });
        drop(writer);

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        self.pending.push((tmp_path, path.to_path_buf()));
        Ok(())
    }

    /// Renames every staged file into place
    pub fn commit(mut self) -> AppResult<()> {
        let pending = std::mem::take(&mut self.pending);
        let mut remaining = pending.into_iter();
        while let Some((tmp_path, path)) = remaining.next() {
            if let Err(e) = fs::rename(&tmp_path, &path) {
                let err = AppError::io(&path, e);
                // Not yet renamed; removed on drop
                self.pending = std::iter::once((tmp_path, path)).chain(remaining).collect();
                return Err(err);
            }
        }
        Ok(())
    }
}

impl Drop for StagedFiles {
    fn drop(&mut self) {
        for (tmp_path, _) in self.pending.drain(..) {
            let _ = fs::remove_file(&tmp_path);
        }
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
