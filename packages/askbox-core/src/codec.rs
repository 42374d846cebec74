//! # Codec
//!
//! Every binary field crosses the system boundary as base64url text without
//! padding (alphabet `A-Za-z0-9-_`). This module owns that conversion, the
//! UTF-8 helpers, and the serde adapters used by the wire records.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::error::{Error, Result};

/// Encode bytes as unpadded base64url
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url
///
/// Padded input and the standard (`+/`) alphabet are rejected.
pub fn from_base64url(text: &str) -> Result<Vec<u8>> {
    Ok(URL_SAFE_NO_PAD.decode(text)?)
}

/// Decode unpadded base64url into a fixed-size array
pub fn from_base64url_array<const N: usize>(text: &str) -> Result<[u8; N]> {
    let bytes = from_base64url(text)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| Error::InvalidEncoding(format!("expected {} bytes, got {}", N, len)))
}

/// UTF-8 encode a string
pub fn to_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Decode UTF-8 bytes into a string
pub fn to_string(bytes: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(bytes)?)
}

/// Serde helper for `Vec<u8>` as base64url
pub mod serde_base64url {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as base64url
    pub fn serialize<S>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_base64url(bytes))
    }

    /// Deserialize from base64url
    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::from_base64url(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for fixed-size byte arrays as base64url
pub mod serde_base64url_array {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as base64url
    pub fn serialize<S, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_base64url(bytes))
    }

    /// Deserialize from base64url, checking the length
    pub fn deserialize<'de, D, const N: usize>(
        deserializer: D,
    ) -> std::result::Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::from_base64url_array::<N>(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for optional byte vectors as base64url
pub mod serde_base64url_option {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as base64url or null
    pub fn serialize<S>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(b) => serializer.serialize_some(&super::to_base64url(b)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from base64url or null
    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| super::from_base64url(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64url_has_no_padding() {
        let encoded = to_base64url(&[0xfb, 0xff]);
        assert_eq!(encoded, "-_8");
        assert!(!encoded.contains('='));
    }

    #[test]
    fn test_base64url_round_trip() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        assert_eq!(from_base64url(&to_base64url(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn test_rejects_padding_and_standard_alphabet() {
        assert!(from_base64url("-_8=").is_err());
        assert!(from_base64url("+/8").is_err());
    }

    #[test]
    fn test_fixed_array_length_checked() {
        let encoded = to_base64url(&[7u8; 32]);
        assert_eq!(from_base64url_array::<32>(&encoded).unwrap(), [7u8; 32]);

        let err = from_base64url_array::<24>(&encoded).unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding(_)));
    }

    #[test]
    fn test_utf8_helpers() {
        let bytes = to_bytes("héllo");
        assert_eq!(to_string(bytes).unwrap(), "héllo");
        assert!(to_string(vec![0xff, 0xfe]).is_err());
    }
}
