// SPDX-License-Identifier: MIT
//
// n-line — interactive line editor demo.
//
// Reads lines from the terminal with emacs-style editing and prints each
// submitted line back as `line:<text>`. Words given on the command line are
// offered as Tab completions.
//
//   n-line [--prompt TEXT] [WORD ...]
//
// Logging is off unless N_LINE_LOG names a file; events then go there (the
// terminal is busy being edited) at the level in N_LINE_LOG_LEVEL, `debug`
// by default.

use std::env;
use std::fs::File;
use std::io;
use std::process;
use std::str::FromStr;
use std::sync::Mutex;

use n_editor::complete::ListCompleter;
use n_editor::editor::{Editor, Termination};
use n_editor::options::Options;
use tracing::Level;

const DEFAULT_PROMPT: &str = "belt> ";

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
struct Args {
    prompt: String,
    words: Vec<String>,
}

/// Parse everything after the program name.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut prompt = DEFAULT_PROMPT.to_owned();
    let mut words = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--prompt" {
            prompt = args.next().ok_or("--prompt needs a value")?;
        } else if let Some(value) = arg.strip_prefix("--prompt=") {
            value.clone_into(&mut prompt);
        } else {
            words.push(arg);
        }
    }

    Ok(Args { prompt, words })
}

// ─── Logging ────────────────────────────────────────────────────────────────

fn init_logging() -> io::Result<()> {
    let Some(path) = env::var_os("N_LINE_LOG") else {
        return Ok(());
    };

    let level = env::var("N_LINE_LOG_LEVEL")
        .ok()
        .and_then(|l| Level::from_str(&l).ok())
        .unwrap_or(Level::DEBUG);

    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let args = parse_args(env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("n-line: {e}");
        eprintln!("usage: n-line [--prompt TEXT] [WORD ...]");
        process::exit(2);
    });

    if let Err(e) = init_logging() {
        eprintln!("n-line: cannot open log file: {e}");
        process::exit(1);
    }

    let options = Options::default().with_prompt(args.prompt);
    let mut editor = Editor::with_options(io::stdin(), io::stdout(), options).unwrap_or_else(|e| {
        eprintln!("n-line: {e}");
        process::exit(1);
    });
    editor.set_completer(ListCompleter::new(args.words));

    loop {
        match editor.read_line() {
            Ok(line) if line.end == Termination::Submitted => println!("line:{}", line.text),
            Ok(_) => break,
            Err(e) => {
                eprintln!("n-line: {e}");
                process::exit(1);
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Args, String> {
        parse_args(args.iter().map(ToString::to_string))
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.prompt, "belt> ");
        assert!(args.words.is_empty());
    }

    #[test]
    fn prompt_and_words() {
        let args = parse(&["commit", "--prompt", "git> ", "checkout"]).unwrap();
        assert_eq!(
            args,
            Args {
                prompt: "git> ".into(),
                words: vec!["commit".into(), "checkout".into()],
            }
        );
    }

    #[test]
    fn prompt_with_equals() {
        assert_eq!(parse(&["--prompt=$ "]).unwrap().prompt, "$ ");
    }

    #[test]
    fn prompt_missing_value() {
        assert_eq!(parse(&["--prompt"]).unwrap_err(), "--prompt needs a value");
    }
}
