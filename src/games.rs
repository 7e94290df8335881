use anyhow::{Context, Result};
use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::api::{self, Game, OwnedGamesRequest, SteamWeb};
use crate::cli::{GameField, ListGamesArgs, OutputFormat};
use crate::config::{API_KEY, SettingsStore};
use crate::error::SteamError;
use crate::resolve;

const STORE_BASE: &str = "https://store.steampowered.com";
const CSV_SEPARATOR: &str = ",";
const API_KEY_ENV: &str = "STEAM_API_KEY";

impl GameField {
    fn key(&self) -> &'static str {
        match self {
            GameField::Name => "name",
            GameField::Appid => "app_id",
            GameField::Url => "url",
        }
    }
}

pub fn store_url(appid: u64) -> String {
    format!("{}/app/{}", STORE_BASE, appid)
}

/// A game projected onto the requested fields, serialized in field order.
struct GameRow<'a> {
    game: &'a Game,
    fields: &'a [GameField],
}

impl Serialize for GameRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in self.fields {
            match field {
                GameField::Name => map.serialize_entry(field.key(), &self.game.name)?,
                GameField::Appid => map.serialize_entry(field.key(), &self.game.appid)?,
                GameField::Url => map.serialize_entry(field.key(), &store_url(self.game.appid))?,
            }
        }
        map.end()
    }
}

/// Requested fields with duplicates dropped; `name` when nothing was asked for.
pub fn normalize_fields(requested: &[GameField]) -> Vec<GameField> {
    let mut fields = Vec::new();
    for field in requested {
        if !fields.contains(field) {
            fields.push(*field);
        }
    }
    if fields.is_empty() {
        fields.push(GameField::Name);
    }
    fields
}

/// Sort by name (case-sensitive) and render the requested fields.
pub fn render(games: &mut [Game], fields: &[GameField], format: OutputFormat) -> Result<String> {
    games.sort_by(|a, b| a.name.cmp(&b.name));
    let rows: Vec<GameRow<'_>> = games.iter().map(|game| GameRow { game, fields }).collect();
    let rendered = match format {
        OutputFormat::Csv => rows
            .iter()
            .map(csv_line)
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&rows).context("failed to encode games as JSON")?
        }
        OutputFormat::Yaml => serde_yaml::to_string(&rows)
            .context("failed to encode games as YAML")?
            .trim_end()
            .to_string(),
    };
    Ok(rendered)
}

fn csv_line(row: &GameRow<'_>) -> String {
    row.fields
        .iter()
        .map(|field| {
            let value = match field {
                GameField::Name => row.game.name.clone(),
                GameField::Appid => row.game.appid.to_string(),
                GameField::Url => store_url(row.game.appid),
            };
            csv_escape(&value)
        })
        .collect::<Vec<_>>()
        .join(CSV_SEPARATOR)
}

fn csv_escape(value: &str) -> String {
    if value.contains(CSV_SEPARATOR) || value.contains(['"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Environment override first, then the stored key.
pub fn credential(store: &SettingsStore, env_key: Option<String>) -> Result<Option<String>> {
    if let Some(key) = env_key
        && !key.is_empty()
    {
        debug!("using API key from {}", API_KEY_ENV);
        return Ok(Some(key));
    }
    store.get(API_KEY)
}

/// Resolve, fetch and render; the credential is checked before any network call.
pub fn list_games(
    args: &ListGamesArgs,
    api_key: Option<&str>,
    web: &dyn SteamWeb,
) -> Result<String> {
    let api_key = api_key.ok_or(SteamError::MissingCredential)?;
    let steamid = resolve::resolve(web, &args.username)?;
    let request = OwnedGamesRequest::new(steamid, args.include_free());
    let mut games = api::fetch_owned_games(web, api_key, &request, &args.username)?;
    debug!("{} owns {} games", args.username, games.len());
    render(&mut games, &normalize_fields(&args.include), args.format)
}

pub fn handle_list_games(
    args: ListGamesArgs,
    store: &SettingsStore,
    web: &dyn SteamWeb,
) -> Result<()> {
    let api_key = credential(store, std::env::var(API_KEY_ENV).ok())?;
    let output = list_games(&args, api_key.as_deref(), web)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
