use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::app::FanlineError;

/// Profile URL of the actor whose followers are examined, such as
/// `https://example.social/@me`.
///
/// The string is kept exactly as given; collection URLs are built by
/// appending to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorUrl(String);

impl ActorUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ActorUrl {
    type Err = FanlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FanlineError::InvalidActor(s.to_string());
        let url = Url::parse(s).map_err(|_| invalid())?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }

        match url.path().strip_prefix("/@") {
            Some(rest) if !rest.is_empty() => Ok(Self(s.to_string())),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ActorUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
