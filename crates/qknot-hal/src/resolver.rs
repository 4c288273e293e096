//! Runtime channel resolution.
//!
//! An explicit channel is tried once. Without one, the configured candidates
//! are tried in order; each attempt is classified as connected, skippable
//! (the channel itself is not supported), or fatal.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{HalError, HalResult};
use crate::service::{ChannelRequest, ConnectError, RuntimeService, ServiceConnector};

/// Default channel candidates, in attempt order.
pub const DEFAULT_CHANNEL_CANDIDATES: &[&str] = &["ibm_quantum_platform", "ibm_cloud", "ibm_quantum"];

/// A resolved session with the channel that produced it.
#[derive(Clone)]
pub struct RuntimeSession {
    /// Channel the session was built with.
    pub channel_used: String,
    /// Instance passed to the connector.
    pub instance_used: Option<String>,
    /// The service handle.
    pub service: Arc<dyn RuntimeService>,
}

impl fmt::Debug for RuntimeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeSession")
            .field("channel_used", &self.channel_used)
            .field("instance_used", &self.instance_used)
            .finish_non_exhaustive()
    }
}

/// Outcome of one connection attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Session established.
    Connected(RuntimeSession),
    /// The channel is not usable; try the next candidate.
    Skippable(String),
    /// Stop trying.
    Fatal(String),
}

/// Whether a failure message describes a channel-support problem.
pub fn is_channel_support_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("channel")
        && (lower.contains("invalid") || lower.contains("supported") || lower.contains("unknown"))
}

/// Tries channel candidates against a [`ServiceConnector`].
#[derive(Debug, Clone)]
pub struct ChannelResolver {
    candidates: Vec<String>,
}

impl Default for ChannelResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CANDIDATES.iter().map(|c| c.to_string()).collect())
    }
}

impl ChannelResolver {
    /// Resolver over the given candidates.
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// The candidates in attempt order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Resolve a session.
    pub async fn resolve(
        &self,
        connector: &dyn ServiceConnector,
        token: &str,
        channel: Option<&str>,
        instance: Option<&str>,
    ) -> HalResult<RuntimeSession> {
        if let Some(channel) = channel {
            return self.resolve_explicit(connector, token, channel, instance).await;
        }

        let mut failures = Vec::new();
        for candidate in &self.candidates {
            match Self::attempt(connector, token, candidate, instance).await {
                AttemptOutcome::Connected(session) => {
                    info!(channel = %session.channel_used, "runtime session established");
                    return Ok(session);
                }
                AttemptOutcome::Skippable(reason) => {
                    warn!(channel = %candidate, %reason, "skipping runtime channel");
                    failures.push(format!("{candidate}: {reason}"));
                }
                AttemptOutcome::Fatal(reason) => return Err(HalError::ServiceInit(reason)),
            }
        }

        Err(HalError::NoSupportedChannel { failures })
    }

    async fn resolve_explicit(
        &self,
        connector: &dyn ServiceConnector,
        token: &str,
        channel: &str,
        instance: Option<&str>,
    ) -> HalResult<RuntimeSession> {
        let request = build_request(token, channel, instance);
        debug!(?request, "connecting with explicit channel");
        match connector.connect(&request).await {
            Ok(service) => {
                info!(%channel, "runtime session established");
                Ok(RuntimeSession {
                    channel_used: request.channel,
                    instance_used: request.instance,
                    service,
                })
            }
            Err(ConnectError::ChannelNotSupported(_)) => Err(HalError::ChannelUnsupported {
                channel: channel.to_string(),
            }),
            Err(ConnectError::Failed(reason)) => Err(HalError::ServiceInit(reason)),
        }
    }

    /// One classified connection attempt.
    pub async fn attempt(
        connector: &dyn ServiceConnector,
        token: &str,
        channel: &str,
        instance: Option<&str>,
    ) -> AttemptOutcome {
        let request = build_request(token, channel, instance);
        debug!(?request, "trying runtime channel");
        match connector.connect(&request).await {
            Ok(service) => AttemptOutcome::Connected(RuntimeSession {
                channel_used: request.channel,
                instance_used: request.instance,
                service,
            }),
            Err(ConnectError::ChannelNotSupported(reason)) => AttemptOutcome::Skippable(reason),
            Err(ConnectError::Failed(reason)) if is_channel_support_message(&reason) => {
                AttemptOutcome::Skippable(reason)
            }
            Err(ConnectError::Failed(reason)) => AttemptOutcome::Fatal(reason),
        }
    }
}

fn build_request(token: &str, channel: &str, instance: Option<&str>) -> ChannelRequest {
    ChannelRequest {
        channel: channel.to_string(),
        token: token.to_string(),
        instance: instance.filter(|i| !i.is_empty()).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeConnector, FakeService, JobScript};

    fn connector() -> FakeConnector {
        FakeConnector::new(Arc::new(FakeService::new(
            vec![],
            JobScript::completing(&["DONE"], 1, 0),
        )))
    }

    #[test]
    fn test_channel_support_classification() {
        assert!(is_channel_support_message("Unknown channel: foo"));
        assert!(is_channel_support_message("Invalid CHANNEL value"));
        assert!(is_channel_support_message(
            "channel ibm_cloud is not supported without an instance CRN"
        ));
        assert!(!is_channel_support_message("Invalid token"));
        assert!(!is_channel_support_message("channel timed out"));
    }

    #[test]
    fn test_default_candidates_order() {
        let resolver = ChannelResolver::default();
        assert_eq!(
            resolver.candidates(),
            &["ibm_quantum_platform", "ibm_cloud", "ibm_quantum"]
        );
    }

    #[tokio::test]
    async fn test_auto_skips_unsupported_channels() {
        let connector = connector()
            .failing(
                "ibm_quantum_platform",
                ConnectError::ChannelNotSupported("unexpected keyword 'channel'".into()),
            )
            .accepting("ibm_cloud");
        let session = ChannelResolver::default()
            .resolve(&connector, "tok", None, Some("crn:v1"))
            .await
            .unwrap();
        assert_eq!(session.channel_used, "ibm_cloud");
        assert_eq!(session.instance_used.as_deref(), Some("crn:v1"));
        assert_eq!(
            connector.attempted_channels(),
            vec!["ibm_quantum_platform", "ibm_cloud"]
        );
    }

    #[tokio::test]
    async fn test_auto_aborts_on_unclassified_failure() {
        let connector = connector()
            .failing("ibm_quantum_platform", ConnectError::Failed("Invalid token".into()))
            .accepting("ibm_cloud");
        let err = ChannelResolver::default()
            .resolve(&connector, "tok", None, None)
            .await
            .unwrap_err();
        assert_eq!(err, HalError::ServiceInit("Invalid token".into()));
        assert_eq!(connector.attempted_channels(), vec!["ibm_quantum_platform"]);
    }

    #[tokio::test]
    async fn test_auto_aggregates_when_exhausted() {
        let err = ChannelResolver::default()
            .resolve(&connector(), "tok", None, None)
            .await
            .unwrap_err();
        let HalError::NoSupportedChannel { failures } = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(failures.len(), 3);
        assert!(failures[0].starts_with("ibm_quantum_platform: Unknown channel"));
        assert!(failures[2].starts_with("ibm_quantum: "));
    }

    #[tokio::test]
    async fn test_explicit_channel_has_no_fallback() {
        let connector = connector()
            .failing("ibm_cloud", ConnectError::ChannelNotSupported("no".into()))
            .accepting("ibm_quantum");
        let err = ChannelResolver::default()
            .resolve(&connector, "tok", Some("ibm_cloud"), None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            HalError::ChannelUnsupported {
                channel: "ibm_cloud".into()
            }
        );
        assert!(err.is_input_error());
        assert_eq!(connector.attempted_channels(), vec!["ibm_cloud"]);

        // Channel-flavoured messages are still generic failures when explicit.
        let err = ChannelResolver::default()
            .resolve(&connector, "tok", Some("bogus"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::ServiceInit(_)));
    }
}
