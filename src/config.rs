use std::path::PathBuf;
use std::time::Duration;

use crate::api::codec::SubmissionContract;
use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://mipi.equatorialenergia.com.br/mipiapi/api/v1";
pub const DEFAULT_SUBMIT_PATH: &str = "/alertas/justificativa";
pub const DEFAULT_PORTAL_URL: &str = "https://eprod.equatorialenergia.com.br/entrar";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Runtime settings for the alert client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub submission_contract: SubmissionContract,
    pub submit_path: String,
    pub data_dir: PathBuf,
    pub portal_url: String,
}

impl ClientConfig {
    /// Reads `MIPI_*` variables from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a local `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("MIPI_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let parsed = reqwest::Url::parse(&base_url).ok();
        let usable = parsed.is_some_and(|url| {
            matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
        });
        if !usable {
            return Err(ConfigError::Invalid {
                key: "MIPI_API_BASE_URL",
                value: base_url,
            });
        }

        let timeout = match lookup("MIPI_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "MIPI_HTTP_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let submission_contract = match lookup("MIPI_SUBMISSION_CONTRACT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "MIPI_SUBMISSION_CONTRACT",
                value: raw,
            })?,
            None => SubmissionContract::Base64Json,
        };

        let submit_path = lookup("MIPI_SUBMIT_PATH").unwrap_or_else(|| DEFAULT_SUBMIT_PATH.to_string());
        if !submit_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "MIPI_SUBMIT_PATH",
                value: submit_path,
            });
        }

        let data_dir = lookup("MIPI_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(".mipi")))
            .unwrap_or_else(|| PathBuf::from(".mipi"));

        let portal_url = lookup("MIPI_PORTAL_URL").unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string());

        Ok(Self {
            base_url,
            timeout,
            submission_contract,
            submit_path,
            data_dir,
            portal_url,
        })
    }
}
