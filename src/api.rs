//! Steam Web API and community site access.

use std::time::Duration;

use log::debug;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SteamError;
use crate::steamid::SteamId;

const API_BASE: &str = "https://api.steampowered.com";
const OWNED_GAMES_PATH: &str = "IPlayerService/GetOwnedGames/v0001/";
const COMMUNITY_BASE: &str = "https://steamcommunity.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameters of an `IPlayerService/GetOwnedGames` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedGamesRequest {
    pub steamid: SteamId,
    pub include_appinfo: bool,
    pub include_played_free_games: bool,
    pub include_free_sub: bool,
    pub language: &'static str,
    pub include_extended_appinfo: bool,
}

impl OwnedGamesRequest {
    /// One flag drives both free-game options.
    pub fn new(steamid: SteamId, include_free: bool) -> Self {
        Self {
            steamid,
            include_appinfo: true,
            include_played_free_games: include_free,
            include_free_sub: include_free,
            language: "en",
            include_extended_appinfo: false,
        }
    }

    /// Query pairs, excluding the API key.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("steamid", self.steamid.to_string()),
            ("include_appinfo", flag(self.include_appinfo)),
            (
                "include_played_free_games",
                flag(self.include_played_free_games),
            ),
            ("include_free_sub", flag(self.include_free_sub)),
            ("language", self.language.to_string()),
            (
                "include_extended_appinfo",
                flag(self.include_extended_appinfo),
            ),
            ("format", "json".to_string()),
        ]
    }
}

fn flag(value: bool) -> String {
    let text = if value { "1" } else { "0" };
    text.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Game {
    pub appid: u64,
    pub name: String,
}

/// Remote calls the commands depend on.
pub trait SteamWeb {
    /// HTML of `steamcommunity.com/id/<vanity>`, or `None` when the page does not exist.
    fn profile_page(&self, vanity: &str) -> Result<Option<String>, SteamError>;

    /// Decoded JSON body of `GetOwnedGames`.
    fn owned_games(&self, key: &str, request: &OwnedGamesRequest) -> Result<Value, SteamError>;
}

pub struct HttpSteamWeb {
    client: Client,
}

impl HttpSteamWeb {
    pub fn new() -> Result<Self, SteamError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("steamutils/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl SteamWeb for HttpSteamWeb {
    fn profile_page(&self, vanity: &str) -> Result<Option<String>, SteamError> {
        let url = profile_url(vanity)?;
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        if !community_status(response.status())? {
            return Ok(None);
        }
        Ok(Some(response.text()?))
    }

    fn owned_games(&self, key: &str, request: &OwnedGamesRequest) -> Result<Value, SteamError> {
        let url = format!("{}/{}", API_BASE, OWNED_GAMES_PATH);
        let query = request.query();
        debug!("GET {} {:?} (key redacted)", url, query);
        let response = self
            .client
            .get(&url)
            .query(&[("key", key)])
            .query(&query)
            .send()?;
        api_status(response.status())?;
        Ok(response.json()?)
    }
}

/// `Ok(false)` when the profile page does not exist.
pub fn community_status(status: StatusCode) -> Result<bool, SteamError> {
    match status {
        StatusCode::NOT_FOUND => Ok(false),
        status if status.is_success() => Ok(true),
        status => Err(SteamError::Network(format!(
            "community site returned {}",
            status
        ))),
    }
}

pub fn api_status(status: StatusCode) -> Result<(), SteamError> {
    match status {
        status if status.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SteamError::Network(format!(
            "Steam rejected the API key ({})",
            status
        ))),
        status => Err(SteamError::Network(format!("Steam API returned {}", status))),
    }
}

pub fn profile_url(vanity: &str) -> Result<Url, SteamError> {
    let mut url = Url::parse(COMMUNITY_BASE)
        .map_err(|err| SteamError::Network(format!("invalid community url: {err}")))?;
    url.path_segments_mut()
        .map_err(|_| SteamError::Network("community url cannot take a path".into()))?
        .push("id")
        .push(vanity);
    Ok(url)
}

/// Fetch and decode the owned-games list for `user`.
pub fn fetch_owned_games(
    web: &dyn SteamWeb,
    key: &str,
    request: &OwnedGamesRequest,
    user: &str,
) -> Result<Vec<Game>, SteamError> {
    let body = web.owned_games(key, request)?;
    parse_owned_games(body, user)
}

pub fn parse_owned_games(mut body: Value, user: &str) -> Result<Vec<Game>, SteamError> {
    let response = body
        .get_mut("response")
        .filter(|response| response.is_object())
        .ok_or_else(|| SteamError::MalformedResponse("missing 'response' object".into()))?;
    let games = match response.get_mut("games") {
        Some(games) => games.take(),
        None => return Err(SteamError::NoGamesOrPrivate(user.to_string())),
    };
    let games: Vec<Game> = serde_json::from_value(games)
        .map_err(|err| SteamError::MalformedResponse(format!("invalid games list: {err}")))?;
    if games.is_empty() {
        return Err(SteamError::NoGamesOrPrivate(user.to_string()));
    }
    Ok(games)
}
