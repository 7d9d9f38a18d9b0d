/// Name of the receiver of the built-in default configuration.
pub const DEFAULT_RECEIVER: &str = "grafana-default-email";

/// Built-in alerting configuration of an organization which has none.
/// Its policy tree is a single root route to the default receiver, having
/// no child routes and no grouping overrides.
pub const DEFAULT_CONFIGURATION: &str = r#"{
    "alertmanager_config": {
        "route": {
            "receiver": "grafana-default-email"
        },
        "receivers": [
            {
                "name": "grafana-default-email",
                "grafana_managed_receiver_configs": [
                    {
                        "uid": "",
                        "name": "email receiver",
                        "type": "email",
                        "isDefault": true,
                        "settings": {
                            "addresses": "<example@email.com>"
                        }
                    }
                ]
            }
        ]
    }
}"#;
