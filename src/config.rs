use std::collections::HashMap;
use std::path::{Path, PathBuf};

use billqr_core::command::ParseDefaults;
use billqr_core::content::DEFAULT_CONTENT_LIMIT;
use billqr_core::env_file::read_env_file;
use billqr_core::qr::{DEFAULT_QR_BASE_URL, DEFAULT_QR_TEMPLATE};
use serde::{Deserialize, Serialize};

use crate::error::BillQrError;

const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
const ENV_DEFAULT_ACCOUNT: &str = "DEFAULT_STK";
const ENV_DEFAULT_BANK: &str = "DEFAULT_BANK";
const ENV_BANK_FILE: &str = "BILLQR_BANK_FILE";

fn default_bank_data_file() -> String {
    "data.txt".into()
}
fn default_qr_base_url() -> String {
    DEFAULT_QR_BASE_URL.into()
}
fn default_qr_template() -> String {
    DEFAULT_QR_TEMPLATE.into()
}
fn default_content_limit() -> usize {
    DEFAULT_CONTENT_LIMIT
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram_bot_token: String,
    /// Account used by `/c <amount> ...` when no bank is given.
    #[serde(default)]
    pub default_account: Option<String>,
    /// Bank key used by `/c <amount> ...` when no bank is given.
    #[serde(default)]
    pub default_bank: Option<String>,
    /// Bank registry, re-read on every `/c`.
    #[serde(default = "default_bank_data_file")]
    pub bank_data_file: String,
    #[serde(default = "default_qr_base_url")]
    pub qr_base_url: String,
    #[serde(default = "default_qr_template")]
    pub qr_template: String,
    /// Max characters of transfer content embedded in the QR.
    #[serde(default = "default_content_limit")]
    pub content_limit: usize,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn resolve_config_path() -> Result<Option<PathBuf>, BillQrError> {
        if let Ok(custom) = std::env::var("BILLQR_CONFIG") {
            if Path::new(&custom).exists() {
                return Ok(Some(PathBuf::from(custom)));
            }
            return Err(BillQrError::Config(format!(
                "BILLQR_CONFIG points to non-existent file: {custom}"
            )));
        }

        for candidate in ["./billqr.config.yaml", "./billqr.config.yml"] {
            if Path::new(candidate).exists() {
                return Ok(Some(PathBuf::from(candidate)));
            }
        }
        Ok(None)
    }

    /// Load config from the optional YAML file, `.env` and the process
    /// environment, in increasing order of precedence.
    pub fn load() -> Result<Self, BillQrError> {
        let yaml = match Self::resolve_config_path()? {
            Some(path) => {
                let path_str = path.to_string_lossy().to_string();
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    BillQrError::Config(format!("Failed to read {path_str}: {e}"))
                })?;
                Some(content)
            }
            None => None,
        };

        let mut vars = read_env_file(Path::new(".env"))?;
        vars.extend(std::env::vars());

        Self::from_sources(yaml.as_deref(), &vars)
    }

    /// Build a config from YAML text (if any) and environment variables.
    pub fn from_sources(
        yaml: Option<&str>,
        vars: &HashMap<String, String>,
    ) -> Result<Self, BillQrError> {
        let mut config: Config = match yaml {
            Some(content) if !content.trim().is_empty() => serde_yaml::from_str(content)
                .map_err(|e| BillQrError::Config(format!("Failed to parse config: {e}")))?,
            _ => serde_yaml::from_str("{}")?,
        };
        config.apply_env_overrides(vars);
        config.post_deserialize()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self, vars: &HashMap<String, String>) {
        if let Some(token) = vars.get(ENV_BOT_TOKEN) {
            self.telegram_bot_token = token.clone();
        }
        if let Some(account) = vars.get(ENV_DEFAULT_ACCOUNT) {
            self.default_account = Some(account.clone());
        }
        if let Some(bank) = vars.get(ENV_DEFAULT_BANK) {
            self.default_bank = Some(bank.clone());
        }
        if let Some(path) = vars.get(ENV_BANK_FILE) {
            self.bank_data_file = path.clone();
        }
    }

    /// Apply post-deserialization normalization and validation.
    pub(crate) fn post_deserialize(&mut self) -> Result<(), BillQrError> {
        self.telegram_bot_token = self.telegram_bot_token.trim().to_string();
        self.default_account = non_blank(self.default_account.take());
        self.default_bank = non_blank(self.default_bank.take()).map(|b| b.to_lowercase());

        if self.bank_data_file.trim().is_empty() {
            self.bank_data_file = default_bank_data_file();
        }
        self.qr_base_url = self.qr_base_url.trim().trim_end_matches('/').to_string();
        if self.qr_base_url.is_empty() {
            self.qr_base_url = default_qr_base_url();
        }
        if self.qr_template.trim().is_empty() {
            self.qr_template = default_qr_template();
        }
        if self.content_limit == 0 {
            self.content_limit = default_content_limit();
        }

        if self.telegram_bot_token.is_empty() {
            return Err(BillQrError::Config(format!(
                "{ENV_BOT_TOKEN} (or telegram_bot_token) must be set"
            )));
        }
        Ok(())
    }

    pub fn parse_defaults(&self) -> ParseDefaults {
        ParseDefaults {
            default_account: self.default_account.clone(),
            default_bank: self.default_bank.clone(),
        }
    }

    pub fn bank_data_path(&self) -> PathBuf {
        PathBuf::from(&self.bank_data_file)
    }
}
