use models::{CodecError, ConfigDocument, Route};
use std::time::Duration;

/// Settings of a NotificationPolicyService.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Configuration of organizations which have none stored,
    /// and the source of the policy tree restored by a reset.
    pub default_configuration: ConfigDocument,
    /// Bound on the duration of each store operation, if any.
    pub store_timeout: Option<Duration>,
}

impl Settings {
    /// Build Settings having a deployment-provided default configuration.
    /// A default which doesn't decode is an error.
    pub fn with_default_configuration(raw: &str) -> Result<Self, CodecError> {
        Ok(Self {
            default_configuration: models::decode(raw)?,
            store_timeout: None,
        })
    }

    pub fn default_route(&self) -> &Route {
        self.default_configuration.route()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_default_configuration(models::DEFAULT_CONFIGURATION)
            .expect("built-in default configuration is valid")
    }
}
