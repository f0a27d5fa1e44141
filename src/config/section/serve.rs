//! `[serve]` section configuration.
//!
//! ```toml
//! [serve]
//! interface = "0.0.0.0"   # bind every interface (default: loopback)
//! port = 5277             # first port tried; up to 9 more on conflict
//! ```

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5277;

/// HTTP adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub interface: IpAddr,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::net::Ipv6Addr;

    #[test]
    fn test_serve_defaults_to_loopback() {
        let serve = test_parse_config("[load]\ncache = 1").serve;
        assert!(serve.interface.is_loopback());
        assert_eq!(serve.port, DEFAULT_PORT);
    }

    #[test]
    fn test_serve_any_interface() {
        let serve = test_parse_config("[serve]\ninterface = \"::\"\nport = 80").serve;
        assert_eq!(serve.interface, IpAddr::V6(Ipv6Addr::UNSPECIFIED));
        assert_eq!(serve.port, 80);
    }

    #[test]
    fn test_serve_rejects_hostname() {
        let err = crate::config::KilnConfig::from_str("[serve]\ninterface = \"localhost\"");
        assert!(err.is_err());
    }
}
