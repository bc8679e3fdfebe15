// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use crate::cli::args::{Args, Command};
use crate::cli::commands::{self, Console};
use crate::cli::prompt::TerminalPrompter;
use crate::domain::Session;
use anyhow::Result;
use infrastructure::{Config, PostgrestGateway, SessionStore};
use tracing::debug;

pub fn run(args: Args) -> Result<()> {
    let config_path = match args.config {
        Some(path) => {
            debug!(?path, "Using provided config path");
            path
        }
        None => Config::default_path()?,
    };
    // `init` starts from defaults so a broken file can still be replaced.
    let config = match args.command {
        Command::Init { .. } => Config::default(),
        _ => Config::load_or_default(&config_path)?,
    }
    .with_overrides(args.url, args.anon_key);
    let store = SessionStore::beside(&config_path);
    debug!(config = %config_path.display(), session = %store.path().display(), json = args.json, "Starting qa");

    let stdout = std::io::stdout();
    let mut console = Console::new(stdout.lock(), TerminalPrompter::default(), args.json);

    match args.command {
        Command::Init { force } => commands::init(&config_path, &config, force, &mut console),
        Command::Signup(credentials) => {
            let mut gateway = connect(&config, None)?;
            commands::sign_up(&mut gateway, credentials, &mut console)
        }
        Command::Login(credentials) => {
            let mut gateway = connect(&config, None)?;
            let session = commands::login(&mut gateway, credentials, &mut console)?;
            store.save(&session)
        }
        Command::Logout => {
            let cleared = store.clear()?;
            commands::logout(cleared, &mut console)
        }
        Command::Whoami => signed_in(&config, &store, |gateway| {
            commands::whoami(gateway, &mut console)
        }),
        Command::Categories { action } => signed_in(&config, &store, |gateway| {
            commands::categories(gateway, action, &mut console)
        }),
        Command::Responses { action } => signed_in(&config, &store, |gateway| {
            commands::responses(gateway, action, config.defaults.language, &mut console)
        }),
        Command::Notes { action } => signed_in(&config, &store, |gateway| {
            commands::notes(gateway, action, &mut console)
        }),
    }
}

fn connect(config: &Config, session: Option<Session>) -> Result<PostgrestGateway> {
    let backend = config.backend()?;
    Ok(PostgrestGateway::new(backend, session)?)
}

/// Run `command` with the stored session, keeping any refreshed session for next time.
fn signed_in<F>(config: &Config, store: &SessionStore, command: F) -> Result<()>
where
    F: FnOnce(&mut PostgrestGateway) -> Result<()>,
{
    let mut gateway = connect(config, store.load()?)?;
    let result = command(&mut gateway);
    if let Some(session) = gateway.take_refreshed_session() {
        debug!(user_id = %session.user.id, "Storing refreshed session");
        store.save(&session)?;
    }
    result
}
