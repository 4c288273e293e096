//! Channel-aware session construction.

use std::sync::Arc;

use async_trait::async_trait;
use qknot_hal::{ChannelRequest, ConnectError, RuntimeService, ServiceConnector};
use tracing::info;

use crate::api::{CLOUD_ENDPOINT, IbmClient, LEGACY_ENDPOINT};
use crate::error::IbmError;
use crate::service::IbmService;

/// IBM Cloud API channel names.
pub const CLOUD_CHANNELS: &[&str] = &["ibm_quantum_platform", "ibm_cloud"];

/// Legacy platform channel name.
pub const LEGACY_CHANNEL: &str = "ibm_quantum";

/// Builds [`IbmService`] sessions for the IBM channels.
///
/// `ibm_quantum_platform` and `ibm_cloud` use the cloud API and need the
/// service CRN as instance. `ibm_quantum` uses the legacy API, where the
/// instance is an optional hub/group/project.
#[derive(Debug, Clone)]
pub struct IbmConnector {
    cloud_endpoint: String,
    legacy_endpoint: String,
}

impl Default for IbmConnector {
    fn default() -> Self {
        Self {
            cloud_endpoint: CLOUD_ENDPOINT.to_string(),
            legacy_endpoint: LEGACY_ENDPOINT.to_string(),
        }
    }
}

impl IbmConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API endpoints.
    pub fn with_endpoints(
        cloud_endpoint: impl Into<String>,
        legacy_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            cloud_endpoint: cloud_endpoint.into(),
            legacy_endpoint: legacy_endpoint.into(),
        }
    }

    async fn client_for(&self, request: &ChannelRequest) -> Result<IbmClient, ConnectError> {
        let channel = request.channel.as_str();

        if CLOUD_CHANNELS.contains(&channel) {
            let crn = request
                .instance
                .as_deref()
                .ok_or_else(|| failed(IbmError::MissingServiceCrn(channel.to_string())))?;
            return IbmClient::cloud(&self.cloud_endpoint, &request.token, crn)
                .await
                .map_err(failed);
        }

        if channel == LEGACY_CHANNEL {
            return IbmClient::legacy(
                &self.legacy_endpoint,
                &request.token,
                request.instance.clone(),
            )
            .map_err(failed);
        }

        Err(ConnectError::ChannelNotSupported(format!(
            "Unknown channel '{channel}'"
        )))
    }
}

fn failed(e: IbmError) -> ConnectError {
    ConnectError::Failed(e.to_string())
}

#[async_trait]
impl ServiceConnector for IbmConnector {
    async fn connect(
        &self,
        request: &ChannelRequest,
    ) -> Result<Arc<dyn RuntimeService>, ConnectError> {
        let client = self.client_for(request).await?;
        info!(channel = %request.channel, endpoint = %client.endpoint(), "IBM client ready");
        Ok(Arc::new(IbmService::new(client)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qknot_hal::is_channel_support_message;

    fn request(channel: &str, instance: Option<&str>) -> ChannelRequest {
        ChannelRequest {
            channel: channel.to_string(),
            token: "test-token".to_string(),
            instance: instance.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_supported() {
        let err = IbmConnector::new()
            .connect(&request("local", None))
            .await
            .err()
            .unwrap();
        assert_eq!(
            err,
            ConnectError::ChannelNotSupported("Unknown channel 'local'".into())
        );
    }

    #[tokio::test]
    async fn test_cloud_channel_without_crn_is_skippable() {
        for channel in CLOUD_CHANNELS {
            let err = IbmConnector::new()
                .connect(&request(channel, None))
                .await
                .err()
                .unwrap();
            let ConnectError::Failed(message) = err else {
                panic!("expected failure for {channel}");
            };
            assert!(message.contains("without an instance CRN"));
            assert!(is_channel_support_message(&message));
        }
    }

    #[tokio::test]
    async fn test_legacy_channel_connects_without_network() {
        let connector = IbmConnector::with_endpoints("https://cloud.invalid", "https://legacy.invalid");
        let client = connector
            .client_for(&request(LEGACY_CHANNEL, Some("hub/group/project")))
            .await
            .unwrap();
        assert_eq!(client.endpoint(), "https://legacy.invalid");
    }
}
