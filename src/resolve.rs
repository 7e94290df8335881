use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::api::SteamWeb;
use crate::error::SteamError;
use crate::steamid::SteamId;

static PROFILE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?steamcommunity\.com/(?P<kind>id|profiles)/(?P<value>[^/?#]+)/?")
        .expect("profile url pattern")
});

static PROFILE_DATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"g_rgProfileData\s*=\s*(?P<json>\{.*?\});\s*\n").expect("profile data pattern")
});

#[derive(Debug, Deserialize)]
struct ProfileData {
    steamid: String,
}

/// What a user typed, before any network access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileRef {
    Vanity(String),
    Id(SteamId),
}

impl ProfileRef {
    /// A `/profiles/` URL must carry a numeric id. A bare number is only
    /// taken as a Steam64 when it decodes to a public individual account.
    pub fn parse(input: &str) -> Result<Self, SteamError> {
        let input = input.trim();
        if let Some(caps) = PROFILE_URL.captures(input) {
            let value = &caps["value"];
            if &caps["kind"] == "profiles" {
                return value
                    .parse()
                    .map(ProfileRef::Id)
                    .map_err(|_| SteamError::ProfileNotFound(input.to_string()));
            }
            return Ok(ProfileRef::Vanity(value.to_string()));
        }
        if input.len() == 17
            && input.bytes().all(|b| b.is_ascii_digit())
            && let Ok(id) = input.parse::<SteamId>()
            && id.is_public_individual()
        {
            return Ok(ProfileRef::Id(id));
        }
        Ok(ProfileRef::Vanity(input.to_string()))
    }
}

/// Resolve a profile name, community URL or Steam64 to a [`SteamId`].
pub fn resolve(web: &dyn SteamWeb, input: &str) -> Result<SteamId, SteamError> {
    let id = match ProfileRef::parse(input)? {
        ProfileRef::Id(id) => id,
        ProfileRef::Vanity(name) => {
            let page = web
                .profile_page(&name)?
                .ok_or_else(|| SteamError::ProfileNotFound(input.to_string()))?;
            steamid_from_page(&page).ok_or_else(|| SteamError::ProfileNotFound(input.to_string()))?
        }
    };
    debug!("resolved '{}' to {}", input, id);
    Ok(id)
}

pub fn handle_resolve_identity(username: &str, web: &dyn SteamWeb) -> anyhow::Result<()> {
    let id = resolve(web, username)?;
    for (label, value) in id.describe() {
        println!("{}: {}", label, value);
    }
    Ok(())
}

fn steamid_from_page(page: &str) -> Option<SteamId> {
    let caps = PROFILE_DATA.captures(page)?;
    let data: ProfileData = serde_json::from_str(&caps["json"]).ok()?;
    data.steamid.parse().ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::OwnedGamesRequest;
    use serde_json::Value;

    pub const GABEN: u64 = 76561197960287930;

    pub fn profile_html(steamid: u64) -> String {
        format!(
            "<script>\n\t\tg_rgProfileData = {{\"url\":\"https:\\/\\/steamcommunity.com\\/id\\/gabelogannewell\\/\",\"steamid\":\"{}\",\"personaname\":\"Rabscuttle\",\"summary\":\"\"}};\n\t\tconst g_bViewingOwnProfile = 0;\n</script>",
            steamid
        )
    }

    struct PageOnly(Option<String>);

    impl SteamWeb for PageOnly {
        fn profile_page(&self, _vanity: &str) -> Result<Option<String>, SteamError> {
            Ok(self.0.clone())
        }

        fn owned_games(&self, _: &str, _: &OwnedGamesRequest) -> Result<Value, SteamError> {
            unreachable!("resolution never lists games")
        }
    }

    #[test]
    fn parses_profile_references() {
        let parse = |input: &str| ProfileRef::parse(input).unwrap();
        assert_eq!(
            parse("gabelogannewell"),
            ProfileRef::Vanity("gabelogannewell".into())
        );
        assert_eq!(
            parse("https://steamcommunity.com/id/gabelogannewell/"),
            ProfileRef::Vanity("gabelogannewell".into())
        );
        assert_eq!(
            parse("steamcommunity.com/profiles/76561197960287930"),
            ProfileRef::Id(SteamId::from_u64(GABEN))
        );
        assert_eq!(
            parse("76561197960287930"),
            ProfileRef::Id(SteamId::from_u64(GABEN))
        );
        assert_eq!(parse("1234"), ProfileRef::Vanity("1234".into()));
    }

    #[test]
    fn digit_names_outside_public_range_stay_vanity() {
        assert_eq!(
            ProfileRef::parse("12345678901234567").unwrap(),
            ProfileRef::Vanity("12345678901234567".into())
        );
    }

    #[test]
    fn non_numeric_profiles_url_is_not_found() {
        let err = ProfileRef::parse("https://steamcommunity.com/profiles/abc").unwrap_err();
        assert!(matches!(err, SteamError::ProfileNotFound(_)));

        // no fallback to /id/abc
        let err = resolve(&PageOnly(Some(profile_html(GABEN))), "steamcommunity.com/profiles/abc")
            .unwrap_err();
        assert!(matches!(err, SteamError::ProfileNotFound(_)));
    }

    #[test]
    fn resolves_vanity_from_profile_page() {
        let web = PageOnly(Some(profile_html(GABEN)));
        let id = resolve(&web, "gabelogannewell").unwrap();
        assert_eq!(id.as_u64(), GABEN);
    }

    #[test]
    fn page_without_profile_data_is_not_found() {
        let web = PageOnly(Some(
            "<html><h3>The specified profile could not be found.</h3></html>".into(),
        ));
        let err = resolve(&web, "nobody-here").unwrap_err();
        assert!(matches!(err, SteamError::ProfileNotFound(ref user) if user == "nobody-here"));

        let err = resolve(&PageOnly(None), "nobody-here").unwrap_err();
        assert_eq!(err.to_string(), "Could not find Steam user: nobody-here");
    }
}
