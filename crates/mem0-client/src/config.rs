//! Client configuration.

use crate::ClientError;
use std::fmt;
use std::time::Duration;

/// Default service endpoint.
pub const DEFAULT_HOST: &str = "https://api.mem0.ai";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Options for [`MemoryClient::new`](crate::MemoryClient::new).
///
/// Organization and project may be identified by name or by id. Each pair must be given in
/// full or not at all.
#[derive(Clone)]
pub struct ClientOptions {
    pub api_key: String,
    /// Empty means [`DEFAULT_HOST`].
    pub host: String,
    pub organization_name: String,
    pub project_name: String,
    pub organization_id: String,
    pub project_id: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: String::new(),
            organization_name: String::new(),
            project_name: String::new(),
            organization_id: String::new(),
            project_id: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Read `MEM0_API_KEY`, `MEM0_HOST`, `MEM0_ORG_NAME`, `MEM0_PROJECT_NAME`, `MEM0_ORG_ID`,
    /// `MEM0_PROJECT_ID` and `MEM0_TIMEOUT_SECS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        let timeout = match std::env::var("MEM0_TIMEOUT_SECS") {
            Ok(secs) => secs
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ClientError::Config(format!("MEM0_TIMEOUT_SECS: {}", e)))?,
            Err(_) => DEFAULT_TIMEOUT,
        };
        Ok(Self {
            api_key: var("MEM0_API_KEY"),
            host: var("MEM0_HOST"),
            organization_name: var("MEM0_ORG_NAME"),
            project_name: var("MEM0_PROJECT_NAME"),
            organization_id: var("MEM0_ORG_ID"),
            project_id: var("MEM0_PROJECT_ID"),
            timeout,
        })
    }

    /// Host without trailing slashes, defaulting to [`DEFAULT_HOST`].
    pub fn resolved_host(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.is_empty() {
            DEFAULT_HOST.to_string()
        } else {
            host.to_string()
        }
    }

    /// Check everything that can be checked without the network.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::Config("API key is required".to_string()));
        }
        if self.organization_name.is_empty() != self.project_name.is_empty() {
            return Err(ClientError::Config(
                "both organization_name and project_name must be provided together".to_string(),
            ));
        }
        if self.organization_id.is_empty() != self.project_id.is_empty() {
            return Err(ClientError::Config(
                "both organization_id and project_id must be provided together".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be positive".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("host", &self.host)
            .field("organization_name", &self.organization_name)
            .field("project_name", &self.project_name)
            .field("organization_id", &self.organization_id)
            .field("project_id", &self.project_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
