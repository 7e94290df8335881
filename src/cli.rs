use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Look up Steam users and their owned games",
    propagate_version = true
)]
pub struct Cli {
    /// Settings file to use instead of the per-user default
    #[arg(long, global = true, env = "STEAMUTILS_SETTINGS")]
    pub settings: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store the Steam Web API key
    #[command(visible_alias = "apikey")]
    SetCredential(SetCredentialArgs),
    /// Look up the SteamID forms of a user
    #[command(visible_alias = "user")]
    ResolveIdentity(UsernameArgs),
    /// List the games a user owns
    #[command(visible_alias = "games")]
    ListGames(ListGamesArgs),
    /// Inspect the stored settings
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct SetCredentialArgs {
    /// The API key to store
    pub key: String,
}

#[derive(Debug, Args)]
pub struct UsernameArgs {
    /// Profile name, community URL or Steam64 id
    pub username: String,
}

#[derive(Debug, Args)]
pub struct ListGamesArgs {
    /// Profile name, community URL or Steam64 id
    pub username: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
    /// Field to print; repeat for more fields
    #[arg(long = "include", value_enum, action = ArgAction::Append)]
    pub include: Vec<GameField>,
    /// Include free-to-play games the user has played
    #[arg(long, overrides_with = "no_free")]
    pub free: bool,
    /// Leave free-to-play games out (default)
    #[arg(long = "no-free", overrides_with = "free")]
    pub no_free: bool,
}

impl ListGamesArgs {
    pub fn include_free(&self) -> bool {
        self.free && !self.no_free
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Yaml,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GameField {
    Name,
    Appid,
    Url,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    Show,
    Paths,
}
