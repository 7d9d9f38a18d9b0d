use super::Route;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// ConfigDocument is the complete alerting configuration of an organization.
/// The notification policy tree, receivers, and mute time intervals are
/// strongly typed. Every other section is carried through unmodified, so that
/// editors of one section never clobber another.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    /// # Notification template files, keyed on file name.
    #[serde(
        default,
        deserialize_with = "crate::null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub template_files: BTreeMap<String, String>,
    /// # Alertmanager configuration.
    pub alertmanager_config: AlertmanagerConfig,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AlertmanagerConfig {
    /// # Root of the notification policy tree.
    pub route: Route,
    /// # Named notification receivers.
    #[serde(
        default,
        deserialize_with = "crate::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub receivers: Vec<Receiver>,
    /// # Named, recurring windows of time during which routes may be muted.
    #[serde(
        default,
        deserialize_with = "crate::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub mute_time_intervals: Vec<MuteTimeInterval>,
    /// Sections such as `global`, `templates`, `inhibit_rules`, and `time_intervals`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A named notification endpoint. Only its name is interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Receiver {
    pub name: String,
    #[serde(flatten)]
    pub integrations: BTreeMap<String, Value>,
}

impl Receiver {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            integrations: BTreeMap::new(),
        }
    }
}

/// A named, recurring window of time. Only its name is interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MuteTimeInterval {
    pub name: String,
    #[serde(flatten)]
    pub definition: BTreeMap<String, Value>,
}

impl MuteTimeInterval {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: BTreeMap::new(),
        }
    }
}

impl ConfigDocument {
    pub fn route(&self) -> &Route {
        &self.alertmanager_config.route
    }

    /// Replace the policy tree, returning the previous one.
    pub fn set_route(&mut self, route: Route) -> Route {
        std::mem::replace(&mut self.alertmanager_config.route, route)
    }

    pub fn receivers(&self) -> &[Receiver] {
        &self.alertmanager_config.receivers
    }

    pub fn mute_time_intervals(&self) -> &[MuteTimeInterval] {
        &self.alertmanager_config.mute_time_intervals
    }

    pub fn receiver(&self, name: &str) -> Option<&Receiver> {
        self.receivers().iter().find(|r| r.name == name)
    }

    pub fn mute_time_interval(&self, name: &str) -> Option<&MuteTimeInterval> {
        self.mute_time_intervals().iter().find(|m| m.name == name)
    }
}
