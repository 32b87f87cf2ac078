use std::time::Duration;

use crate::batch::{DEFAULT_MAX_DEPTH, Locator};

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    pub origins: Vec<String>,

    /// Bound on a whole batch, `None` for no bound
    pub request_timeout: Option<Duration>,

    /// Deepest container the locator accepts
    pub max_depth: usize,
}

impl ServerConfig {
    pub fn new(port: u16) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port,
            origins: Vec::new(),
            request_timeout: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the host
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Allow one more CORS origin
    pub fn origin(mut self, origin: &str) -> Self {
        self.origins.push(origin.to_string());
        self
    }

    /// Set the batch timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn locator(&self) -> Locator {
        Locator::new().max_depth(self.max_depth)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() || self.host.contains(char::is_whitespace) {
            return Err(format!("Invalid host '{}'", self.host));
        }

        if self.max_depth == 0 {
            return Err("max_depth must be > 0".to_string());
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err("request timeout must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::new(8080);
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert!(config.origins.is_empty());
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.locator().depth_limit(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ServerConfig::new(3000)
            .host("127.0.0.1")
            .origin("http://localhost:5173")
            .origin("https://example.com")
            .request_timeout(Duration::from_secs(10))
            .max_depth(16);

        assert_eq!(config.address(), "127.0.0.1:3000");
        assert_eq!(config.origins.len(), 2);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.locator().depth_limit(), 16);
    }

    #[test]
    fn test_validate() {
        assert!(ServerConfig::new(8080).validate().is_ok());
        assert!(ServerConfig::new(8080).host("not a host").validate().is_err());
        assert!(ServerConfig::new(8080).max_depth(0).validate().is_err());
        assert!(
            ServerConfig::new(8080)
                .request_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }
}
