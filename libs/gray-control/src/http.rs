//! HTTP implementation of the control-plane query contract.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use gray_core::{
    GrayInformationClient, GrayInstance, GrayTrackDefinition, InformationClientError,
};

use crate::config::GrayClientConfig;
use crate::error::ConfigError;

/// JSON/HTTP client for the control plane's query endpoints.
///
/// One fetch per call, no retry; failed calls propagate to the caller,
/// which owns redelivery policy.
pub struct HttpGrayInformationClient {
    client: Client,
    base_url: String,
}

impl HttpGrayInformationClient {
    pub fn new(config: &GrayClientConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.control_plane_url.trim_end_matches('/').to_string(),
        })
    }

    fn instance_url(&self, service_id: &str, instance_id: Option<&str>) -> String {
        match instance_id {
            Some(instance_id) => format!(
                "{}/api/gray/instances/{}/{}",
                self.base_url, service_id, instance_id
            ),
            None => format!("{}/api/gray/instances/{}", self.base_url, service_id),
        }
    }

    fn tracks_url(&self, service_id: &str) -> String {
        format!("{}/api/gray/tracks/{}", self.base_url, service_id)
    }
}

#[async_trait]
impl GrayInformationClient for HttpGrayInformationClient {
    async fn fetch_instance(
        &self,
        service_id: &str,
        instance_id: Option<&str>,
    ) -> Result<GrayInstance, InformationClientError> {
        let url = self.instance_url(service_id, instance_id);
        debug!(%url, "fetching gray instance");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| InformationClientError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(InformationClientError::UnexpectedStatus(
                response.status().as_u16(),
            ));
        }

        response
            .json::<GrayInstance>()
            .await
            .map_err(|e| InformationClientError::Decode(e.to_string()))
    }

    async fn fetch_track_definitions(
        &self,
        service_id: &str,
        instance_id: Option<&str>,
    ) -> Result<Vec<GrayTrackDefinition>, InformationClientError> {
        let url = self.tracks_url(service_id);
        debug!(%url, instance_id = ?instance_id, "fetching track definitions");

        let mut request = self.client.get(&url);
        if let Some(instance_id) = instance_id {
            request = request.query(&[("instanceId", instance_id)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| InformationClientError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(InformationClientError::UnexpectedStatus(
                response.status().as_u16(),
            ));
        }

        response
            .json::<Vec<GrayTrackDefinition>>()
            .await
            .map_err(|e| InformationClientError::Decode(e.to_string()))
    }
}
