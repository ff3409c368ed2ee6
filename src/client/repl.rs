use clap::{CommandFactory, Parser, Subcommand};
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::client::{
    render::{render_page, render_session},
    session::Session,
};

const PROMPT: &str = "cinerank> ";

#[derive(Parser)]
#[command(name = "", no_binary_name = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
enum InnerCommand {
    /// Sets the viewer age; under 18 hides restricted movies.
    Age { age: u32 },

    /// Filters by original language code, or "all" to show every language.
    Lang { code: String },

    /// Searches title, overview, language, genres and keywords.
    /// Without words the search is cleared.
    Search { words: Vec<String> },

    /// Resets every filter.
    Clear,

    /// Shows the next page.
    Next,

    /// Shows the previous page.
    Prev,

    /// Jumps to a page.
    Page { number: usize },

    /// Lists the languages available for filtering.
    Languages,

    /// Shows the current page again.
    Show,

    /// Closes the browser.
    #[command(alias = "exit")]
    Quit,
}

/// Outcome of one REPL line
#[derive(Debug, PartialEq)]
pub enum CommandExecutionResult {
    Output(String),
    Exit,
    Error(String),
}

/// Parses and applies one line of input to the session
pub fn execute_command(line: &str, session: &mut Session) -> CommandExecutionResult {
    let line = line.trim();
    if line.is_empty() {
        return CommandExecutionResult::Output(String::new());
    }

    let args = shlex::split(line)
        .unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = match InnerCli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => return CommandExecutionResult::Error(e.render().to_string()),
    };

    let output = match cli.command {
        InnerCommand::Age { age } => {
            session.set_min_age(age);
            render_session(session)
        }
        InnerCommand::Lang { code } => {
            session.set_language(Some(&code));
            render_session(session)
        }
        InnerCommand::Search { words } => {
            let keyword = words.join(" ");
            session.set_keyword(Some(&keyword));
            render_session(session)
        }
        InnerCommand::Clear => {
            session.clear_filters();
            render_session(session)
        }
        InnerCommand::Next => {
            if !session.next_page() {
                return CommandExecutionResult::Error("Already on the last page".to_string());
            }
            render_page(&session.view())
        }
        InnerCommand::Prev => {
            if !session.prev_page() {
                return CommandExecutionResult::Error("Already on the first page".to_string());
            }
            render_page(&session.view())
        }
        InnerCommand::Page { number } => {
            session.go_to_page(number);
            render_page(&session.view())
        }
        InnerCommand::Languages => {
            let mut out = String::from("all  All languages\n");
            for language in session.languages() {
                out.push_str(&format!("{:<4} {}\n", language.code, language.label));
            }
            out
        }
        InnerCommand::Show => render_session(session),
        InnerCommand::Quit => return CommandExecutionResult::Exit,
    };

    CommandExecutionResult::Output(output)
}

/// Runs the interactive browser until the user quits
pub fn run_repl(mut session: Session) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;

    InnerCli::command().print_long_help()?;
    println!("{}", render_session(&session));

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match execute_command(&line, &mut session) {
                    CommandExecutionResult::Output(text) => {
                        if !text.is_empty() {
                            println!("{text}");
                        }
                    }
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        eprintln!("{err}");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                eprintln!("Error: {:?}", e);
                break;
            }
        }
    }
    Ok(())
}
