//! Server configuration read from the environment

use std::net::SocketAddr;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_FILTER: &str = "capscope=info,tower_http=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `CAPSCOPE_ADDR`, else `0.0.0.0:$PORT`
    pub addr: SocketAddr,
    /// `CAPSCOPE_CORS`: allow any origin
    pub cors_permissive: bool,
    /// `RUST_LOG`
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            cors_permissive: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(addr) = lookup("CAPSCOPE_ADDR") {
            cfg.addr = addr
                .parse()
                .map_err(|_| Error::Config(format!("CAPSCOPE_ADDR is not a socket address: {addr}")))?;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| Error::Config(format!("PORT is not a port number: {port}")))?;
            cfg.addr.set_port(port);
        }

        if let Some(v) = lookup("CAPSCOPE_CORS") {
            cfg.cors_permissive = match v.as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => return Err(Error::Config(format!("CAPSCOPE_CORS must be true/false/1/0, got {v}"))),
            };
        }

        if let Some(filter) = lookup("RUST_LOG").filter(|f| !f.is_empty()) {
            cfg.log_filter = filter;
        }

        Ok(cfg)
    }
}
