use super::ConfigDocument;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("alerting configuration is corrupt")]
    Corrupt(#[source] serde_json::Error),
}

/// Decode the stored, textual form of an alerting configuration.
pub fn decode(raw: &str) -> Result<ConfigDocument, CodecError> {
    serde_json::from_str(raw).map_err(CodecError::Corrupt)
}

/// Encode a ConfigDocument into its stored, textual form.
///
/// Encoding is deterministic: object keys of opaque sections are written in
/// sorted order, so re-encoding a decoded document reproduces its sections
/// exactly and an edit of one section leaves the text of others unchanged.
pub fn encode(doc: &ConfigDocument) -> String {
    // Keys are always strings, and serialization of Values cannot fail.
    serde_json::to_string(doc).expect("ConfigDocument always serializes to JSON")
}

/// ConfigurationHash is a content digest of a stored configuration.
/// It's used only for equality comparisons, as a compare-and-swap precondition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationHash(String);

impl ConfigurationHash {
    pub fn of(raw: &str) -> Self {
        Self(format!("{:x}", md5::compute(raw.as_bytes())))
    }

    /// Wrap a hash which was previously computed and persisted.
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConfigurationHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
