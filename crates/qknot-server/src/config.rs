//! Server configuration and credential resolution.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::error::ApiError;

/// Message returned when no credential is available for a runtime route.
pub const MISSING_CREDENTIALS: &str =
    "Backend is missing IBM credentials. Set IBM_QUANTUM_TOKEN before calling runtime routes.";

/// Command-line arguments, each with an environment fallback.
#[derive(Debug, Parser)]
#[command(name = "qknot-server", version, about = "qknot HTTP API")]
pub struct Args {
    /// Interface to bind.
    #[arg(long, env = "QKNOT_BACKEND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind.
    #[arg(long, env = "QKNOT_BACKEND_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Serve the prebuilt frontend bundle next to the API (1/true/yes/on).
    #[arg(long, env = "QKNOT_SERVE_FRONTEND", default_value = "false")]
    pub serve_frontend: String,

    /// Directory holding the frontend bundle.
    #[arg(long, env = "QKNOT_FRONTEND_DIR", default_value = "dist")]
    pub frontend_dir: PathBuf,

    /// IBM Quantum credential used when a request carries none.
    #[arg(long, env = "IBM_QUANTUM_TOKEN", hide_env_values = true)]
    pub ibm_token: Option<String>,

    /// Secondary credential variable.
    #[arg(long, env = "QKNOT_IBM_TOKEN", hide_env_values = true)]
    pub qknot_ibm_token: Option<String>,
}

/// Resolved server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,
    /// Whether the static bundle is mounted as the fallback service.
    pub serve_frontend: bool,
    /// Static bundle directory.
    pub frontend_dir: PathBuf,
    /// Credential used when a request carries none. Never logged.
    pub fallback_credential: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: ([0, 0, 0, 0], 8000).into(),
            serve_frontend: false,
            frontend_dir: PathBuf::from("dist"),
            fallback_credential: None,
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_address", &self.bind_address)
            .field("serve_frontend", &self.serve_frontend)
            .field("frontend_dir", &self.frontend_dir)
            .field(
                "fallback_credential",
                &self.fallback_credential.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            bind_address: SocketAddr::new(args.host, args.port),
            serve_frontend: is_truthy(&args.serve_frontend),
            frontend_dir: args.frontend_dir,
            fallback_credential: non_blank(args.ibm_token).or(non_blank(args.qknot_ibm_token)),
        }
    }
}

impl ServerConfig {
    /// Pick the request credential if present, else the configured fallback.
    pub fn resolve_credential(&self, requested: Option<&str>) -> Result<String, ApiError> {
        requested
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| self.fallback_credential.as_deref())
            .map(str::to_string)
            .ok_or_else(|| ApiError::Internal(MISSING_CREDENTIALS.to_string()))
    }
}

/// `1`, `true`, `yes`, `on`, case-insensitive.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        for value in ["1", "true", "YES", " on "] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["0", "false", "", "enabled"] {
            assert!(!is_truthy(value), "{value}");
        }
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["qknot-server", "--port", "9000"]).unwrap();
        let config = ServerConfig::from(args);
        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.frontend_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_blank_primary_token_falls_through() {
        let args = Args::try_parse_from([
            "qknot-server",
            "--ibm-token",
            "  ",
            "--qknot-ibm-token",
            "secondary",
            "--serve-frontend",
            "on",
        ])
        .unwrap();
        let config = ServerConfig::from(args);
        assert!(config.serve_frontend);
        assert_eq!(config.fallback_credential.as_deref(), Some("secondary"));
    }

    #[test]
    fn test_request_credential_wins() {
        let config = ServerConfig {
            fallback_credential: Some("env-token".into()),
            ..ServerConfig::default()
        };
        assert_eq!(config.resolve_credential(Some(" mine ")).unwrap(), "mine");
        assert_eq!(config.resolve_credential(Some("")).unwrap(), "env-token");
        assert_eq!(config.resolve_credential(None).unwrap(), "env-token");
    }

    #[test]
    fn test_missing_credential_is_server_fault() {
        let err = ServerConfig::default().resolve_credential(None).unwrap_err();
        assert_eq!(err.to_string(), MISSING_CREDENTIALS);
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = ServerConfig {
            fallback_credential: Some("secret".into()),
            ..ServerConfig::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
