use thiserror::Error;

/// Failures that end a command. Each renders as a single user-facing line.
#[derive(Debug, Error)]
pub enum SteamError {
    #[error("Could not find Steam user: {0}")]
    ProfileNotFound(String),
    #[error("API Key not set. See `steamutils set-credential --help`")]
    MissingCredential,
    #[error("No games found for {0}; the profile may be private or own no games")]
    NoGamesOrPrivate(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for SteamError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the API key in their query string.
        let err = err.without_url();
        if err.is_timeout() {
            SteamError::Network(format!("request timed out ({err})"))
        } else if err.is_decode() {
            SteamError::MalformedResponse(err.to_string())
        } else {
            SteamError::Network(err.to_string())
        }
    }
}
