use std::path::PathBuf;

use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Readline(ReadlineError),
    #[error("Eval failed: {0:?}")]
    EvalError(E),
}

/// What the driver does after a line has been handled.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Flow {
    Continue,
    Exit,
}

pub trait Repl {
    type Error: std::fmt::Debug;
    fn prompt(&self) -> &str {
        ">> "
    }
    fn history(&self) -> Option<PathBuf> {
        None
    }
    fn evaluate(&mut self, input: String) -> Result<Flow, Self::Error>;
}

/// Reads lines until EOF, an interrupt, or `Flow::Exit`.
/// A trailing `\` continues the input on the next line.
pub fn start_repl<R: Repl>(mut repl: R) -> Result<(), Error<R::Error>> {
    let mut editor = Editor::<()>::new();
    let history = repl.history();
    if let Some(history) = &history {
        editor.load_history(history).ok();
    }
    let mut input: Option<String> = None;
    loop {
        let prompt = if input.is_some() { ".. " } else { repl.prompt() };
        match editor.readline(prompt) {
            Ok(mut line) if line.ends_with('\\') => {
                line.pop();
                line.push('\n');
                match input.as_mut() {
                    Some(input) => input.push_str(&line),
                    None => input = Some(line),
                }
            }
            Ok(line) => {
                let input = match input.take() {
                    Some(mut input) => {
                        input.push_str(&line);
                        input
                    }
                    None => line,
                };
                editor.add_history_entry(input.as_str());
                let flow = repl.evaluate(input).map_err(Error::EvalError)?;
                if let Some(history) = &history {
                    editor.save_history(history).map_err(Error::Readline)?;
                }
                if flow == Flow::Exit {
                    break Ok(());
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Bye!");
                break Ok(());
            }
            Err(e) => break Err(Error::Readline(e)),
        }
    }
}
