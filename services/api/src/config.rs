//! Server configuration

use anyhow::Result;
use std::path::PathBuf;

/// Default session lifetime: 30 days (seconds)
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 24 * 3600;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Root of the public upload directory
    pub upload_dir: PathBuf,
    /// Public base URL of the service. When set, image paths in responses
    /// are rewritten to absolute URLs; when unset, relative paths are
    /// returned as stored.
    pub public_url: Option<String>,
    /// Bearer token lifetime in seconds
    pub session_ttl_secs: u64,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: Listen address (default: 0.0.0.0:3000)
    /// - `UPLOAD_DIR`: Public upload directory (default: public)
    /// - `PUBLIC_URL`: Public base URL for absolute image URLs (optional)
    /// - `SESSION_TTL_SECS`: Bearer token lifetime in seconds (default: 30 days)
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "public".to_string())
            .into();

        let public_url = std::env::var("PUBLIC_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let session_ttl_secs = std::env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_SECS.to_string())
            .parse()
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        Ok(ServerConfig {
            bind_addr,
            upload_dir,
            public_url,
            session_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        unsafe {
            std::env::remove_var("BIND_ADDR");
            std::env::remove_var("UPLOAD_DIR");
            std::env::remove_var("PUBLIC_URL");
            std::env::remove_var("SESSION_TTL_SECS");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.upload_dir, PathBuf::from("public"));
        assert_eq!(config.public_url, None);
        assert_eq!(config.session_ttl_secs, DEFAULT_SESSION_TTL_SECS);
    }

    #[test]
    #[serial]
    fn test_server_config_custom_values() {
        unsafe {
            std::env::set_var("BIND_ADDR", "127.0.0.1:8080");
            std::env::set_var("UPLOAD_DIR", "/srv/uploads");
            std::env::set_var("PUBLIC_URL", "https://shop.example.com/");
            std::env::set_var("SESSION_TTL_SECS", "3600");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.upload_dir, PathBuf::from("/srv/uploads"));
        // Trailing slash is trimmed so URL joining stays predictable
        assert_eq!(
            config.public_url,
            Some("https://shop.example.com".to_string())
        );
        assert_eq!(config.session_ttl_secs, 3600);

        unsafe {
            std::env::remove_var("BIND_ADDR");
            std::env::remove_var("UPLOAD_DIR");
            std::env::remove_var("PUBLIC_URL");
            std::env::remove_var("SESSION_TTL_SECS");
        }
    }
}
