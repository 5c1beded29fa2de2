//! Mapping of git remote URLs to Docker registry image references.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;

/// Known git hosts and the Docker registry serving their images.
const REGISTRIES: &[(&str, &str)] = &[
    ("gitlab.axl8.xyz", "registry.axl8.xyz"),
    ("gitorious.xyz", "registry.gitorious.xyz"),
    ("code.axelerant.com", "registry.gitorious.xyz"),
];

/// Matches SSH-like remote URLs, e.g. `git@gitlab.axl8.xyz:team/proj.git`.
static REMOTE_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]*@([^:]*):(.*)\.git$").unwrap());

/// Name of the image under each project path.
const IMAGE_NAME: &str = "db";

/// Fully qualified reference to a project's database image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Registry domain, e.g. `registry.axl8.xyz`.
    pub registry: &'static str,
    /// Lowercased project path on the git host.
    pub path: String,
    /// Docker tag.
    pub tag: String,
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{IMAGE_NAME}:{}",
            self.registry, self.path, self.tag
        )
    }
}

impl ImageReference {
    /// Build the image reference for the project behind `url`.
    pub fn from_remote_url(url: &str, tag: &str) -> Result<Self, Error> {
        let (host, path) = parse_remote_url(url)?;
        let registry = registry_for_host(host)?;
        Ok(Self {
            registry,
            path: path.to_ascii_lowercase(),
            tag: tag.to_owned(),
        })
    }
}

/// Split an SSH-like remote URL into its host and project path.
pub fn parse_remote_url(url: &str) -> Result<(&str, &str), Error> {
    let captures = REMOTE_URL_REGEX
        .captures(url)
        .ok_or_else(|| Error::UnparseableUrl {
            url: url.to_owned(),
        })?;
    match (captures.get(1), captures.get(2)) {
        (Some(host), Some(path)) => Ok((host.as_str(), path.as_str())),
        _ => Err(Error::UnparseableUrl {
            url: url.to_owned(),
        }),
    }
}

/// Look-up the registry domain serving images for `host`.
pub fn registry_for_host(host: &str) -> Result<&'static str, Error> {
    REGISTRIES
        .iter()
        .find(|(known, _)| *known == host)
        .map(|(_, registry)| *registry)
        .ok_or_else(|| Error::UnsupportedHost {
            host: host.to_owned(),
        })
}
