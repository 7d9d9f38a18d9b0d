use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// A Route is a node of the notification policy tree. Alerts enter at the
/// root route and descend into the first matching child `routes`, and the
/// `receiver` of the deepest matching node is notified.
///
/// Children are exclusively owned by their parent, so a policy tree can
/// never contain a cycle.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Route {
    /// # Name of the receiver which is notified for alerts matching this route.
    /// Required of the root route. Must name a receiver of the same configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// # Labels by which incoming alerts are grouped together.
    /// The special value `...` groups by all labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    /// # Label matchers an alert must satisfy to match this route.
    /// Matchers are passed through without interpretation.
    #[serde(
        default,
        deserialize_with = "crate::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub matchers: Vec<String>,
    /// # Whether evaluation continues to sibling routes after this route matches.
    #[serde(
        rename = "continue",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub continue_: bool,
    /// # How long to wait before sending the first notification of a new group.
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_wait: Option<Duration>,
    /// # How long to wait before notifying about new alerts added to a group.
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_interval: Option<Duration>,
    /// # How long to wait before re-sending a notification which was already sent.
    /// Must be positive when set.
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_interval: Option<Duration>,
    /// # Names of mute time intervals during which this route is muted.
    /// Each must name a mute time interval of the same configuration.
    #[serde(
        default,
        deserialize_with = "crate::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub mute_time_intervals: Vec<String>,
    /// # Child routes, in evaluation order.
    #[serde(
        default,
        deserialize_with = "crate::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub routes: Vec<Route>,
    /// Remaining route fields (`object_matchers`, `match`, `match_re`,
    /// `active_time_intervals`, ...), carried as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Route {
    /// Build a leaf Route which notifies `receiver`.
    pub fn new(receiver: impl Into<String>) -> Self {
        Self {
            receiver: Some(receiver.into()),
            ..Default::default()
        }
    }

    /// Visit this route and all of its descendants, in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Route)) {
        visit(self);
        for child in &self.routes {
            child.walk(visit);
        }
    }
}
