use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32;
use thiserror::Error;

/// `BitTorrent` Info Hash v1. It identifies a swarm.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug, PartialOrd, Ord)]
pub struct InfoHash(pub [u8; 20]);

pub const INFO_HASH_BYTES_LEN: usize = 20;

/// Length of the hex representation used in magnet links and JSON.
const HEX_LEN: usize = 40;

/// Length of the base32 representation some magnet links use.
const BASE32_LEN: usize = 32;

impl InfoHash {
    /// Returns the `InfoHash` internal byte array.
    #[must_use]
    pub fn bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Returns the `InfoHash` as a lowercase hex string.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = [0u8; HEX_LEN];
        let hex = binascii::bin2hex(&self.0, &mut chars).map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(hex).map_err(|_| fmt::Error)?)
    }
}

/// Errors that can occur when parsing an `InfoHash` from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid info hash length: got {len} characters, expected 40 (hex) or 32 (base32)")]
    InvalidLength { len: usize },

    #[error("invalid hex info hash: {value}")]
    InvalidHex { value: String },

    #[error("invalid base32 info hash: {value}")]
    InvalidBase32 { value: String },
}

impl FromStr for InfoHash {
    type Err = ParseError;

    /// Parses either the 40 characters hex form or the 32 characters base32
    /// form. Both are case insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut info_hash = Self([0u8; INFO_HASH_BYTES_LEN]);

        match s.len() {
            HEX_LEN => {
                binascii::hex2bin(s.as_bytes(), &mut info_hash.0).map_err(|_| ParseError::InvalidHex { value: s.to_owned() })?;
            }
            BASE32_LEN => {
                let decoded = BASE32
                    .decode(s.to_uppercase().as_bytes())
                    .map_err(|_| ParseError::InvalidBase32 { value: s.to_owned() })?;

                info_hash.0 = decoded
                    .try_into()
                    .map_err(|_| ParseError::InvalidBase32 { value: s.to_owned() })?;
            }
            len => return Err(ParseError::InvalidLength { len }),
        }

        Ok(info_hash)
    }
}

impl From<[u8; 20]> for InfoHash {
    fn from(val: [u8; 20]) -> Self {
        InfoHash(val)
    }
}

impl serde::ser::Serialize for InfoHash {
    fn serialize<S: serde::ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::de::Deserialize<'de> for InfoHash {
    fn deserialize<D: serde::de::Deserializer<'de>>(des: D) -> Result<Self, D::Error> {
        des.deserialize_str(InfoHashVisitor)
    }
}

struct InfoHashVisitor;

impl<'v> serde::de::Visitor<'v> for InfoHashVisitor {
    type Value = InfoHash;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "a 40 character long hex hash")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.len() != HEX_LEN {
            return Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(v),
                &"a 40 character long string",
            ));
        }

        v.parse()
            .map_err(|_| serde::de::Error::invalid_value(serde::de::Unexpected::Str(v), &"a hexadecimal string"))
    }
}

#[cfg(test)]
mod tests {
    use super::{InfoHash, ParseError};

    const HEX: &str = "dd8255ecdc7ca55fb0bbf81323d87062db1f6d1c";

    #[test]
    fn it_should_be_parsed_from_a_hex_string() {
        let info_hash: InfoHash = HEX.parse().unwrap();

        assert_eq!(info_hash.to_string(), HEX);
    }

    #[test]
    fn it_should_accept_uppercase_hex() {
        let info_hash: InfoHash = HEX.to_uppercase().parse().unwrap();

        assert_eq!(info_hash.to_hex_string(), HEX);
    }

    #[test]
    fn it_should_be_parsed_from_a_base32_string() {
        let bytes = [0xdd_u8; 20];
        let base32 = data_encoding::BASE32.encode(&bytes);

        let info_hash: InfoHash = base32.to_lowercase().parse().unwrap();

        assert_eq!(info_hash, InfoHash(bytes));
    }

    #[test]
    fn it_should_fail_with_any_other_length() {
        assert_eq!("abc".parse::<InfoHash>(), Err(ParseError::InvalidLength { len: 3 }));
    }

    #[test]
    fn it_should_fail_with_non_hex_characters() {
        let value = "zz8255ecdc7ca55fb0bbf81323d87062db1f6d1c";

        assert!(matches!(value.parse::<InfoHash>(), Err(ParseError::InvalidHex { .. })));
    }

    #[test]
    fn it_should_be_serialized_as_a_hex_string() {
        let info_hash: InfoHash = HEX.parse().unwrap();

        assert_eq!(serde_json::to_string(&info_hash).unwrap(), format!("\"{HEX}\""));
    }

    #[test]
    fn it_should_be_deserialized_from_a_hex_string() {
        let info_hash: InfoHash = serde_json::from_str(&format!("\"{HEX}\"")).unwrap();

        assert_eq!(info_hash.to_string(), HEX);
    }
}
