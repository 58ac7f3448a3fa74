//! Runtime configuration, read from the environment.

use actiondump_rpc::TransportOptions;
use anyhow::{Context, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

const DEFAULT_SERVER: &str = "http://127.0.0.1/zabbix";
const DEFAULT_USER: &str = "Admin";
const DEFAULT_PASSWORD: &str = "zabbix";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const API_SCRIPT: &str = "api_jsonrpc.php";

pub struct ExportConfig {
    pub api_url: Url,
    pub username: String,
    pub password: String,
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("api_url", &self.api_url.as_str())
            .field("username", &self.username)
            .field("password", &"***")
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ExportConfig {
    /// Reads `ZABBIX_URL`, `ZABBIX_USER`, `ZABBIX_PASSWORD`,
    /// `ZABBIX_VERIFY_TLS` and `ZABBIX_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server = var("ZABBIX_URL").unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let api_url = build_api_url(&server)
            .with_context(|| format!("ZABBIX_URL is not a usable URL: {server}"))?;

        let verify_tls = match var("ZABBIX_VERIFY_TLS") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("ZABBIX_VERIFY_TLS must be a boolean, got {raw:?}"))?,
            None => true,
        };

        let timeout_secs = match var("ZABBIX_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .with_context(|| {
                    format!("ZABBIX_TIMEOUT_SECS must be a positive integer, got {raw:?}")
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            username: var("ZABBIX_USER").unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: lookup("ZABBIX_PASSWORD").unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            verify_tls,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: self.timeout,
            verify_tls: self.verify_tls,
        }
    }
}

/// Derives the JSON-RPC endpoint from a frontend base URL.
///
/// `http://host/zabbix` and `http://host/zabbix/` both map to
/// `http://host/zabbix/api_jsonrpc.php`; a URL already naming the script is
/// kept as is.
fn build_api_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base.trim()).context("Invalid base URL")?;

    let mut segments: Vec<String> = url
        .path_segments()
        .map(|iter| iter.map(String::from).collect())
        .unwrap_or_default();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    if segments.last().map(String::as_str) != Some(API_SCRIPT) {
        segments.push(API_SCRIPT.to_string());
    }

    url.path_segments_mut()
        .map_err(|()| anyhow::anyhow!("URL cannot be used as a base (e.g. 'mailto:')"))?
        .clear()
        .extend(segments);
    Ok(url)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ExportConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExportConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_build_api_url() {
        let cases = vec![
            ("http://host", "http://host/api_jsonrpc.php"),
            ("http://host/", "http://host/api_jsonrpc.php"),
            ("http://host/zabbix", "http://host/zabbix/api_jsonrpc.php"),
            ("http://host/zabbix/", "http://host/zabbix/api_jsonrpc.php"),
            ("https://host:8443/zabbix//", "https://host:8443/zabbix/api_jsonrpc.php"),
            (
                "http://host/zabbix/api_jsonrpc.php",
                "http://host/zabbix/api_jsonrpc.php",
            ),
        ];

        for (input, expected) in cases {
            let url = build_api_url(input).unwrap();
            assert_eq!(url.as_str(), expected, "{input}");
        }
    }

    #[test]
    fn test_build_api_url_rejects_garbage() {
        assert!(build_api_url("not a url").is_err());
        assert!(build_api_url("mailto:ops@example.org").is_err());
    }

    #[test]
    fn defaults_match_local_install() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.api_url.as_str(), "http://127.0.0.1/zabbix/api_jsonrpc.php");
        assert_eq!(cfg.username, "Admin");
        assert_eq!(cfg.password, "zabbix");
        assert!(cfg.verify_tls);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = config(&[
            ("ZABBIX_URL", "https://zbx.example.org/"),
            ("ZABBIX_USER", "exporter"),
            ("ZABBIX_PASSWORD", "s3cret"),
            ("ZABBIX_VERIFY_TLS", "off"),
            ("ZABBIX_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(cfg.api_url.as_str(), "https://zbx.example.org/api_jsonrpc.php");
        assert_eq!(cfg.username, "exporter");
        assert!(!cfg.verify_tls);
        assert_eq!(cfg.transport_options().timeout, Duration::from_secs(5));
        assert!(!format!("{cfg:?}").contains("s3cret"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config(&[("ZABBIX_VERIFY_TLS", "maybe")]).is_err());
        assert!(config(&[("ZABBIX_TIMEOUT_SECS", "0")]).is_err());
        assert!(config(&[("ZABBIX_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("ZABBIX_URL", "::")]).is_err());
    }
}
