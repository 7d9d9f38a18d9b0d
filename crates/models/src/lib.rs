mod codec;
mod config;
mod defaults;
mod provenance;
mod routes;

pub use codec::{decode, encode, CodecError, ConfigurationHash};
pub use config::{AlertmanagerConfig, ConfigDocument, MuteTimeInterval, Receiver};
pub use defaults::{DEFAULT_CONFIGURATION, DEFAULT_RECEIVER};
pub use provenance::{Provenance, ResourceKind, UnknownProvenance, UnknownResourceKind};
pub use routes::Route;

use serde::{Deserialize, Serialize};

/// OrgId identifies the organization which owns an alerting configuration.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct OrgId(i64);

impl OrgId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for OrgId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for OrgId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

// Deserialize a defaulted collection for which other writers may emit an explicit `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
