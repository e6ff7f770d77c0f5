//! Agent configuration.
//!
//! Environment-based configuration for different deployments, with
//! development defaults for local runs.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use gray_core::{GrayRequestSettings, InstanceLocalInfo};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrayClientConfig {
    /// Control-plane base URL
    pub control_plane_url: String,

    /// Service id of the local instance
    pub service_id: Option<String>,

    /// Instance id of the local instance
    pub instance_id: Option<String>,

    /// HTTP connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,

    /// Capture outbound request bodies into the gray request representation
    pub load_request_body: bool,
}

impl GrayClientConfig {
    /// Load configuration from environment variables.
    /// Falls back to defaults for development.
    pub fn from_env() -> Self {
        Self {
            control_plane_url: env::var("GRAY_CONTROL_PLANE_URL")
                .unwrap_or_else(|_| "http://gray-server:9080".to_string()),
            service_id: env::var("GRAY_SERVICE_ID").ok(),
            instance_id: env::var("GRAY_INSTANCE_ID").ok(),
            connect_timeout_secs: env::var("GRAY_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            request_timeout_secs: env::var("GRAY_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            load_request_body: env::var("GRAY_LOAD_REQUEST_BODY")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE"))
                .unwrap_or(false),
        }
    }

    /// Configuration for development/testing
    pub fn development() -> Self {
        Self {
            control_plane_url: "http://localhost:9080".to_string(),
            service_id: None,
            instance_id: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            load_request_body: false,
        }
    }

    /// Local identity, when both ids are configured.
    pub fn instance_local_info(&self) -> Option<InstanceLocalInfo> {
        match (&self.service_id, &self.instance_id) {
            (Some(service_id), Some(instance_id)) => {
                Some(InstanceLocalInfo::new(service_id, instance_id))
            }
            _ => None,
        }
    }

    pub fn request_settings(&self) -> GrayRequestSettings {
        GrayRequestSettings {
            load_body: self.load_request_body,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = GrayClientConfig::development();
        assert_eq!(config.control_plane_url, "http://localhost:9080");
        assert!(config.instance_local_info().is_none());
        assert!(!config.request_settings().load_body);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_identity_requires_both_ids() {
        let mut config = GrayClientConfig::development();
        config.service_id = Some("orders".to_string());
        assert!(config.instance_local_info().is_none());

        config.instance_id = Some("i1".to_string());
        assert_eq!(
            config.instance_local_info(),
            Some(InstanceLocalInfo::new("orders", "i1"))
        );
    }

    #[test]
    fn test_from_env_overrides() {
        // Single test touches the process environment to avoid races
        // between parallel tests over the same variables.
        env::set_var("GRAY_CONTROL_PLANE_URL", "http://gray.example:8000");
        env::set_var("GRAY_SERVICE_ID", "orders");
        env::set_var("GRAY_INSTANCE_ID", "i1");
        env::set_var("GRAY_CONNECT_TIMEOUT_SECS", "2");
        env::set_var("GRAY_LOAD_REQUEST_BODY", "true");

        let config = GrayClientConfig::from_env();
        assert_eq!(config.control_plane_url, "http://gray.example:8000");
        assert_eq!(
            config.instance_local_info(),
            Some(InstanceLocalInfo::new("orders", "i1"))
        );
        assert_eq!(config.connect_timeout_secs, 2);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.request_settings().load_body);

        env::remove_var("GRAY_CONTROL_PLANE_URL");
        env::remove_var("GRAY_SERVICE_ID");
        env::remove_var("GRAY_INSTANCE_ID");
        env::remove_var("GRAY_CONNECT_TIMEOUT_SECS");
        env::remove_var("GRAY_LOAD_REQUEST_BODY");
    }
}
