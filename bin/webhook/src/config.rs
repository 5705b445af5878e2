//! Centralized server configuration.
//!
//! Loaded via the `config` crate from an optional file (path taken from
//! `HOOKFLOW_CONFIG`, format chosen by extension) overlaid with environment
//! variables prefixed `HOOKFLOW`, nested with `__`
//! (e.g. `HOOKFLOW__LISTEN_ADDR=0.0.0.0:8080`).

use crate::error::WebhookError;
use hookflow_flow::FlowDocument;
use rootcause::prelude::Report;
use serde::Deserialize;
use std::path::Path;

/// Route the server reserves for its health check.
pub const HEALTH_ROUTE: &str = "/healthz";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "HOOKFLOW_CONFIG";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Socket address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Path prefix for webhook routes. A request to `{prefix}/orders` is
    /// ingested with route id `/orders`. Must be empty or start with `/`.
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// Receivers to register, in order. Later entries replace earlier ones
    /// with the same name.
    #[serde(default)]
    pub receivers: Vec<ReceiverConfig>,

    /// Flows to register, in order.
    #[serde(default)]
    pub flows: Vec<FlowDocument>,
}

/// A configured receiver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReceiverConfig {
    /// Writes values to the server log.
    Log { name: String },
    /// POSTs values as JSON to `url`.
    Http {
        name: String,
        url: String,
        /// Per-request timeout in seconds.
        #[serde(default = "default_http_timeout_seconds")]
        timeout_seconds: u64,
    },
}

impl ReceiverConfig {
    /// The name steps use to refer to this receiver.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Log { name } | Self::Http { name, .. } => name,
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_route_prefix() -> String {
    "/hooks".to_string()
}

fn default_http_timeout_seconds() -> u64 {
    10
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            route_prefix: default_route_prefix(),
            receivers: Vec::new(),
            flows: Vec::new(),
        }
    }
}

impl WebhookConfig {
    /// Loads configuration from `HOOKFLOW_CONFIG` (if set) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the merged
    /// configuration does not deserialize.
    pub fn from_env() -> Result<Self, Report<WebhookError>> {
        match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::load(Some(Path::new(&path))),
            None => Self::load(None),
        }
    }

    /// Loads configuration from `file` (if given) overlaid with the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the merged
    /// configuration does not deserialize, or [`WebhookConfig::validate`]
    /// rejects it.
    pub fn load(file: Option<&Path>) -> Result<Self, Report<WebhookError>> {
        Self::load_with_env(file, None)
    }

    /// Like [`WebhookConfig::load`], reading environment variables from `env`
    /// instead of the process environment when given.
    fn load_with_env(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, Report<WebhookError>> {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix("HOOKFLOW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| WebhookError::ConfigLoad {
                reason: e.to_string(),
            })?
            .try_deserialize()
            .map_err(|e| WebhookError::ConfigLoad {
                reason: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks settings that would otherwise fail when the router is built.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ConfigLoad` if `route_prefix` is non-empty and
    /// does not start with `/`, or if an empty prefix would put a flow on
    /// the health check route.
    pub fn validate(&self) -> Result<(), Report<WebhookError>> {
        if !self.route_prefix.is_empty() && !self.route_prefix.starts_with('/') {
            return Err(WebhookError::ConfigLoad {
                reason: format!("route_prefix '{}' must start with '/'", self.route_prefix),
            }
            .into());
        }

        if self.normalized_prefix().is_empty() {
            if let Some(flow) = self.flows.iter().find(|f| f.trigger.path == HEALTH_ROUTE) {
                return Err(WebhookError::ConfigLoad {
                    reason: format!(
                        "flow '{}' uses {HEALTH_ROUTE}, which is reserved when route_prefix is empty or '/'",
                        flow.name
                    ),
                }
                .into());
            }
        }

        Ok(())
    }

    /// The route prefix without a trailing slash (`""` for the root).
    #[must_use]
    pub fn normalized_prefix(&self) -> &str {
        self.route_prefix.trim_end_matches('/')
    }
}
