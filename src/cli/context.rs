//! Shell state, dispatch, and the error types shared by command handlers.

use std::{io, sync::Arc};

use cabin_config::{Config, ConfigError, ConfigManager};
use cabin_core::{
    BookingFilter, Clock, DeleteFlow, LifecycleAction, LifecycleController, LifecycleError,
    Notice, NoticeKind, ReferenceData, ServiceError, SystemClock, ValidationError,
};
use cabin_domain::{Booking, BookingId};
use cabin_storage_json::{JsonDataService, StorePaths};
use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use tracing::info;

use crate::cli::cache::QueryCache;
use crate::cli::commands::{self, CommandDefinition, CommandRegistry};
use crate::cli::output;
use crate::cli::render::Formatter;
use crate::utils::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failure that stops the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("data store error: {0}")]
    Service(#[from] ServiceError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("{0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub store: Arc<JsonDataService>,
    pub controller: LifecycleController,
    pub reference: ReferenceData,
    pub delete_flow: DeleteFlow,
    pub cache: QueryCache,
    clock: Box<dyn Clock>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home = paths::app_home();
        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = config_manager.load()?;
        crate::init_with_filter(config.log_filter.as_deref());
        output::set_color_enabled(config.ui_color_enabled && mode == CliMode::Interactive);

        let data_dir = paths::data_dir(&config, home);
        let store = Arc::new(JsonDataService::with_retention(
            StorePaths::in_dir(&data_dir),
            config.backup_retention,
        )?);
        info!(data_dir = %data_dir.display(), ?mode, "admin shell starting");

        let mut context = ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            theme: ColorfulTheme::default(),
            config,
            config_manager,
            controller: LifecycleController::new(store.clone()),
            store,
            reference: ReferenceData::default(),
            delete_flow: DeleteFlow::new(),
            cache: QueryCache::default(),
            clock: Box::new(SystemClock),
            last_command: None,
            running: true,
        };
        context.reload_reference();
        Ok(context)
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn formatter(&self) -> Formatter<'_> {
        Formatter::new(&self.config)
    }

    pub(crate) fn prompt(&self) -> String {
        match self.delete_flow.pending_booking() {
            Some(id) => format!("cabin-admin (delete #{id}? confirm/cancel)> "),
            None => "cabin-admin> ".to_string(),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    /// Reloads cabins, guests and settings, reporting each table that failed.
    pub(crate) fn reload_reference(&mut self) {
        let (reference, errors) = ReferenceData::load(self.store.as_ref());
        for err in &errors {
            output::error(err);
        }
        self.reference = reference;
    }

    pub(crate) fn bookings(&mut self, filter: BookingFilter) -> Result<Vec<Booking>, CommandError> {
        if let Some(rows) = self.cache.bookings(&filter) {
            return Ok(rows.to_vec());
        }
        let rows = self.controller.bookings(&filter)?;
        self.cache.store_bookings(filter, rows.clone());
        Ok(rows)
    }

    pub(crate) fn booking(&mut self, id: BookingId) -> Result<Booking, CommandError> {
        if let Some(booking) = self.cache.booking(id) {
            return Ok(booking.clone());
        }
        let booking = self.controller.booking(id)?;
        self.cache.store_booking(booking.clone());
        Ok(booking)
    }

    /// Applies an action's invalidation list and shows its success notice.
    pub(crate) fn action_succeeded(&mut self, action: LifecycleAction, id: BookingId) {
        self.cache.invalidate(&action.invalidates(id));
        self.notify(&Notice::success(action, id));
    }

    pub(crate) fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success => output::success(&notice.message),
            NoticeKind::Error => output::error(&notice.message),
        }
    }

    /// Asks a yes/no question; scripts always answer yes.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|def| def.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        self.confirm("Exit shell?").map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Lifecycle(err) => {
                self.notify(&Notice::from(&err));
                if let Some(source) = err.service_error() {
                    output::hint(source);
                }
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}
