use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OUTPUT_FORMATS: [&str; 2] = ["json", "text"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    pub database: String,
    pub login: String,
    pub password: String,
    pub company_id: Option<i64>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub timezone: Option<String>,
    pub refresh_interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub filename: String,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
            filename: "dashboard.json".to_string(),
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub verbose: Option<bool>,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DashboardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DashboardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ODOO_PASSWORD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DashboardError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.url", &self.source.url)?;
        validation::validate_non_empty_string("source.database", &self.source.database)?;
        validation::validate_non_empty_string("source.login", &self.source.login)?;

        if self.source.password.contains("${") {
            return Err(DashboardError::MissingConfigError {
                field: "source.password (environment variable not set)".to_string(),
            });
        }

        if let Some(company_id) = self.source.company_id {
            validation::validate_range("source.company_id", company_id, 1, i64::MAX)?;
        }
        validation::validate_range("source.timeout_seconds", self.timeout_seconds(), 1, 600)?;

        if let Some(interval) = self.dashboard.refresh_interval_seconds {
            validation::validate_range("dashboard.refresh_interval_seconds", interval, 5, 86_400)?;
        }
        if let Some(zone) = &self.dashboard.timezone {
            crate::adapters::time::NamedTimeZone::parse(zone)?;
        }

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_path("output.filename", &self.output.filename)?;
        validation::validate_one_of("output.format", &self.output.format, &OUTPUT_FORMATS)?;

        Ok(())
    }

    pub fn timezone(&self) -> &str {
        self.dashboard.timezone.as_deref().unwrap_or("UTC")
    }

    pub fn refresh_interval_seconds(&self) -> Option<u64> {
        self.dashboard.refresh_interval_seconds
    }

    pub fn verbose(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn server_url(&self) -> &str {
        &self.source.url
    }

    fn database(&self) -> &str {
        &self.source.database
    }

    fn login(&self) -> &str {
        &self.source.login
    }

    fn password(&self) -> &str {
        &self.source.password
    }

    fn company_id(&self) -> i64 {
        self.source.company_id.unwrap_or(1)
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(30)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
