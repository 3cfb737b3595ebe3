use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hosting region of a space. Each region has its own management API host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Eu,
    Us,
    Ca,
    Ap,
    Cn,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown region '{0}'. Expected one of: eu, us, ca, ap, cn")]
pub struct UnknownRegion(pub String);

impl Region {
    /// Base URL of the management API for this region.
    pub fn base_url(&self) -> &'static str {
        match self {
            Region::Eu => "https://mapi.storyblok.com/v1",
            Region::Us => "https://api-us.storyblok.com/v1",
            Region::Ca => "https://api-ca.storyblok.com/v1",
            Region::Ap => "https://api-ap.storyblok.com/v1",
            Region::Cn => "https://app.storyblokchina.cn/v1",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Eu => "eu",
            Region::Us => "us",
            Region::Ca => "ca",
            Region::Ap => "ap",
            Region::Cn => "cn",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eu" => Ok(Region::Eu),
            "us" => Ok(Region::Us),
            "ca" => Ok(Region::Ca),
            "ap" => Ok(Region::Ap),
            "cn" => Ok(Region::Cn),
            _ => Err(UnknownRegion(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        assert_eq!("eu".parse::<Region>().unwrap(), Region::Eu);
        assert_eq!(" US ".parse::<Region>().unwrap(), Region::Us);
        assert_eq!("cn".parse::<Region>().unwrap(), Region::Cn);

        let err = "mars".parse::<Region>().unwrap_err();
        assert!(err.to_string().contains("mars"));
    }

    #[test]
    fn test_base_urls() {
        assert_eq!(Region::default().base_url(), "https://mapi.storyblok.com/v1");
        assert_eq!(Region::Ap.base_url(), "https://api-ap.storyblok.com/v1");
        assert_eq!(Region::Ca.to_string(), "ca");
    }
}
