//! Magnet links.
//!
//! A magnet link identifies a swarm without a `.torrent` file:
//!
//! ```text
//! magnet:?xt=urn:btih:<info hash>&dn=<name>&tr=<tracker>&tr=<tracker>
//! ```
//!
//! - `xt` (exact topic): the info hash, 40 hex characters or 32 base32
//!   characters.
//! - `dn` (display name): optional name for the torrent.
//! - `tr` (tracker): optional tracker URLs.
//!
//! Other parameters are ignored.
use std::fmt;
use std::str::FromStr;

use htorrent_primitives::info_hash::{self, InfoHash};
use url::form_urlencoded::byte_serialize;
use url::Url;

const SCHEME: &str = "magnet";
const BTIH_PREFIX: &str = "urn:btih:";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unable to parse the magnet link: {source}")]
    InvalidUri { source: url::ParseError },

    #[error("invalid scheme {scheme:?}, expected \"magnet\"")]
    InvalidScheme { scheme: String },

    #[error("missing the \"xt=urn:btih:\" parameter")]
    MissingInfoHash,

    #[error("invalid info hash: {source}")]
    InvalidInfoHash { source: info_hash::ParseError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Magnet {
    pub info_hash: InfoHash,
    pub display_name: Option<String>,
    pub trackers: Vec<String>,
}

impl Magnet {
    #[must_use]
    pub fn new(info_hash: InfoHash) -> Self {
        Self {
            info_hash,
            display_name: None,
            trackers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_tracker(mut self, tracker: impl Into<String>) -> Self {
        self.trackers.push(tracker.into());
        self
    }

    /// Renders the magnet link. The info hash is always hex encoded.
    #[must_use]
    pub fn to_uri(&self) -> String {
        let mut uri = format!("{SCHEME}:?xt={BTIH_PREFIX}{}", self.info_hash);

        if let Some(name) = &self.display_name {
            uri.push_str("&dn=");
            uri.extend(byte_serialize(name.as_bytes()));
        }

        for tracker in &self.trackers {
            uri.push_str("&tr=");
            uri.extend(byte_serialize(tracker.as_bytes()));
        }

        uri
    }
}

impl fmt::Display for Magnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

impl FromStr for Magnet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s).map_err(|source| Error::InvalidUri { source })?;

        if url.scheme() != SCHEME {
            return Err(Error::InvalidScheme {
                scheme: url.scheme().to_owned(),
            });
        }

        let mut info_hash = None;
        let mut display_name = None;
        let mut trackers = Vec::new();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "xt" => {
                    // Other topics, like `urn:btmh:` for v2 torrents, are not supported.
                    if let Some(hash) = value.strip_prefix(BTIH_PREFIX) {
                        info_hash = Some(hash.parse::<InfoHash>().map_err(|source| Error::InvalidInfoHash { source })?);
                    }
                }
                "dn" => display_name = Some(value.into_owned()),
                "tr" => trackers.push(value.into_owned()),
                _ => {}
            }
        }

        Ok(Self {
            info_hash: info_hash.ok_or(Error::MissingInfoHash)?,
            display_name,
            trackers,
        })
    }
}

#[cfg(test)]
mod tests {
    use htorrent_primitives::info_hash::InfoHash;

    use super::{Error, Magnet};

    const INFO_HASH: &str = "dd8255ecdc7ca55fb0bbf81323d87062db1f6d1c";

    fn sample_info_hash() -> InfoHash {
        INFO_HASH.parse().unwrap()
    }

    #[test]
    fn it_should_parse_a_magnet_link_with_a_hex_info_hash() {
        let magnet: Magnet = format!("magnet:?xt=urn:btih:{INFO_HASH}&dn=Big+Buck+Bunny&tr=udp%3A%2F%2Fexplodie.org%3A6969")
            .parse()
            .unwrap();

        assert_eq!(magnet.info_hash, sample_info_hash());
        assert_eq!(magnet.display_name, Some("Big Buck Bunny".to_owned()));
        assert_eq!(magnet.trackers, vec!["udp://explodie.org:6969".to_owned()]);
    }

    #[test]
    fn it_should_parse_a_magnet_link_with_a_base32_info_hash() {
        let base32 = data_encoding::BASE32.encode(&sample_info_hash().bytes());

        let magnet: Magnet = format!("magnet:?xt=urn:btih:{base32}").parse().unwrap();

        assert_eq!(magnet.info_hash, sample_info_hash());
    }

    #[test]
    fn it_should_fail_without_an_info_hash() {
        assert_eq!("magnet:?dn=nothing".parse::<Magnet>(), Err(Error::MissingInfoHash));
    }

    #[test]
    fn it_should_fail_with_another_scheme() {
        assert!(matches!(
            format!("http://example.com/?xt=urn:btih:{INFO_HASH}").parse::<Magnet>(),
            Err(Error::InvalidScheme { .. })
        ));
    }

    #[test]
    fn it_should_fail_with_an_invalid_info_hash() {
        assert!(matches!(
            "magnet:?xt=urn:btih:not-a-hash".parse::<Magnet>(),
            Err(Error::InvalidInfoHash { .. })
        ));
    }

    #[test]
    fn it_should_render_the_parameters_url_encoded() {
        let magnet = Magnet::new(sample_info_hash())
            .with_display_name("Big Buck Bunny")
            .with_tracker("udp://explodie.org:6969");

        assert_eq!(
            magnet.to_string(),
            format!("magnet:?xt=urn:btih:{INFO_HASH}&dn=Big+Buck+Bunny&tr=udp%3A%2F%2Fexplodie.org%3A6969")
        );
    }

    #[test]
    fn a_rendered_magnet_link_should_be_parsed_back() {
        let magnet = Magnet::new(sample_info_hash()).with_display_name("Sintel & friends");

        assert_eq!(magnet.to_uri().parse::<Magnet>().unwrap(), magnet);
    }
}
