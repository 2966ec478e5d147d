use std::collections::HashMap;

pub mod booking;
pub mod catalog;
pub mod system;

use crate::cli::context::{CommandError, CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(booking::definitions());
    commands.extend(catalog::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Splits `args` into positional values and `--flag` switches. `--note`
/// consumes the following argument.
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    pub flags: Vec<&'a str>,
    pub note: Option<&'a str>,
}

pub(crate) fn parse_args<'a>(args: &[&'a str]) -> Result<ParsedArgs<'a>, CommandError> {
    let mut parsed = ParsedArgs {
        positional: Vec::new(),
        flags: Vec::new(),
        note: None,
    };
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        match arg {
            "--note" => {
                let note = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments("`--note` needs a value".into())
                })?;
                parsed.note = Some(note);
            }
            flag if flag.starts_with("--") => parsed.flags.push(flag),
            value => parsed.positional.push(value),
        }
    }
    Ok(parsed)
}

impl ParsedArgs<'_> {
    pub fn has(&self, flag: &str) -> bool {
        self.flags.iter().any(|candidate| *candidate == flag)
    }

    /// Rejects switches outside `allowed`.
    pub fn only(&self, allowed: &[&str]) -> Result<(), CommandError> {
        match self.flags.iter().copied().find(|flag| !allowed.contains(flag)) {
            Some(flag) => Err(CommandError::InvalidArguments(format!(
                "Unknown option `{flag}`"
            ))),
            None => Ok(()),
        }
    }
}

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<u64, CommandError> {
    raw.trim_start_matches('#')
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| CommandError::InvalidArguments(format!("Invalid {what} id `{raw}`")))
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}
