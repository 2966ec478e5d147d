//! Line loop for the admin shell: rustyline when interactive, stdin lines in scripts.

use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use thiserror::Error;

use crate::cli::context::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output;

/// Set to run the shell non-interactively over stdin lines.
pub const SCRIPT_ENV: &str = "CABIN_ADMIN_CLI_SCRIPT";

/// The only answers offered while a deletion waits for confirmation.
const DELETE_ANSWERS: [&str; 2] = ["confirm", "cancel"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(ShellHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    while context.running {
        if let Some(helper) = editor.helper_mut() {
            helper.delete_pending = context.delete_flow.pending_booking().is_some();
        }

        match editor.readline(&context.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.trim()).ok();
                }
                if step(context, &line)? == LoopControl::Exit {
                    break;
                }
            }
            // Ctrl-C answers an open delete confirmation before it offers to exit.
            Err(ReadlineError::Interrupted) => {
                if context.delete_flow.cancel() {
                    output::info("Deletion cancelled.");
                } else if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if step(context, &line?)? == LoopControl::Exit {
            break;
        }
    }

    if let Some(booking_id) = context.delete_flow.pending_booking() {
        context.delete_flow.cancel();
        output::warning(format!(
            "Deletion of booking #{booking_id} was never confirmed; the booking was kept."
        ));
    }
    Ok(())
}

/// Runs one input line. Command failures are reported and the loop goes on.
fn step(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    let (name, args) = match ShellLine::parse(line) {
        Ok(ShellLine::Blank) => return Ok(LoopControl::Continue),
        Ok(ShellLine::Command { name, args }) => (name, args),
        Err(err) => {
            output::warning(err);
            return Ok(LoopControl::Continue);
        }
    };

    context.last_command = Some(line.trim().to_string());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match context.dispatch(&name.to_lowercase(), &name, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        Ok(LoopControl::Continue) => Ok(LoopControl::Continue),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

/// One tokenized input line. `#` starts a comment line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ShellLine {
    Blank,
    Command { name: String, args: Vec<String> },
}

impl ShellLine {
    pub(crate) fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(ShellLine::Blank);
        }

        let mut tokens = split(trimmed)
            .map_err(|err| ParseError {
                line: trimmed.to_string(),
                reason: err.to_string(),
            })?
            .into_iter();
        Ok(match tokens.next() {
            Some(name) => ShellLine::Command {
                name,
                args: tokens.collect(),
            },
            None => ShellLine::Blank,
        })
    }
}

#[derive(Debug, Error)]
#[error("Could not read `{line}`: {reason}")]
pub(crate) struct ParseError {
    line: String,
    reason: String,
}

/// Completes and hints command names; narrows to `confirm`/`cancel` while a
/// deletion is pending.
struct ShellHelper {
    commands: Vec<String>,
    delete_pending: bool,
}

impl ShellHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self {
            commands,
            delete_pending: false,
        }
    }

    fn candidates<'a>(&'a self, needle: &str) -> Vec<&'a str> {
        if self.delete_pending {
            DELETE_ANSWERS
                .iter()
                .copied()
                .filter(|name| name.starts_with(needle))
                .collect()
        } else {
            self.commands
                .iter()
                .map(String::as_str)
                .filter(|name| name.starts_with(needle))
                .collect()
        }
    }

    /// The command word under the cursor, or `None` once arguments begin.
    fn command_word(line: &str, pos: usize) -> Option<(usize, &str)> {
        let head = &line[..pos];
        let start = head.len() - head.trim_start().len();
        let word = &head[start..];
        (!word.contains(char::is_whitespace)).then_some((start, word))
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Some((start, word)) = Self::command_word(line, pos) else {
            return Ok((pos, Vec::new()));
        };
        let pairs = self
            .candidates(&word.to_ascii_lowercase())
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (_, word) = Self::command_word(line, pos)?;
        let needle = word.to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }
        match self.candidates(&needle).as_slice() {
            [only] if only.len() > needle.len() => Some(only[needle.len()..].to_string()),
            _ => None,
        }
    }
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str, args: &[&str]) -> ShellLine {
        ShellLine::Command {
            name: name.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let line = ShellLine::parse(r#"add-guest "Maria Rossi" maria@example.com"#).unwrap();
        assert_eq!(line, command("add-guest", &["Maria Rossi", "maria@example.com"]));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        assert_eq!(ShellLine::parse("   ").unwrap(), ShellLine::Blank);
        assert_eq!(ShellLine::parse("  # seed data").unwrap(), ShellLine::Blank);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        let err = ShellLine::parse(r#"create "2024-01-01"#).unwrap_err();
        assert!(err.to_string().starts_with("Could not read `create"));
    }

    #[test]
    fn pending_delete_narrows_completion() {
        let mut helper = ShellHelper::new(vec!["create", "confirm", "cancel", "cabins"]);
        assert_eq!(helper.candidates("c").len(), 4);

        helper.delete_pending = true;
        assert_eq!(helper.candidates("c"), vec!["confirm", "cancel"]);
        assert_eq!(helper.candidates("ca"), vec!["cancel"]);
        assert!(helper.candidates("cr").is_empty());
    }

    #[test]
    fn only_the_command_word_completes() {
        assert_eq!(ShellHelper::command_word("  chec", 6), Some((2, "chec")));
        assert_eq!(ShellHelper::command_word("checkin 4", 9), None);
    }
}
