mod api;
mod cli;
mod config;
mod error;
mod games;
mod resolve;
mod steamid;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::debug;

use crate::api::HttpSteamWeb;
use crate::config::SettingsStore;

fn main() -> ExitCode {
    env_logger::init();

    let cli = cli::Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(cli: cli::Cli) -> Result<()> {
    let store = SettingsStore::open(cli.settings)?;
    debug!("settings file: {:?}", store.path());

    match cli.command {
        cli::Commands::SetCredential(args) => {
            config::handle_set_credential(&args.key, &store)?;
        }
        cli::Commands::ResolveIdentity(args) => {
            resolve::handle_resolve_identity(&args.username, &HttpSteamWeb::new()?)?;
        }
        cli::Commands::ListGames(args) => {
            games::handle_list_games(args, &store, &HttpSteamWeb::new()?)?;
        }
        cli::Commands::Config(args) => {
            config::handle_config(args.command, &store)?;
        }
    }
    Ok(())
}
