//! UI configuration handed to list controllers at construction time.

use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides `pagination.per_page`.
pub const PER_PAGE_ENV: &str = "RAC_ADMIN_PER_PAGE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid page size: {0}")]
    InvalidPageSize(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { per_page: 20 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub pagination: PaginationConfig,
}

impl UiConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: UiConfig = toml::from_str(raw)?;
        config.validated()
    }

    /// Reads `path` if it exists, then applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        config.with_overrides(std::env::var(PER_PAGE_ENV).ok().as_deref())
    }

    /// Applies a raw `per_page` override, as read from the environment.
    pub fn with_overrides(mut self, per_page: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = per_page {
            self.pagination.per_page = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPageSize(raw.to_string()))?;
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.pagination.per_page == 0 {
            return Err(ConfigError::InvalidPageSize("0".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_document_is_empty() {
        let config = UiConfig::from_toml("").unwrap();
        assert_eq!(config.pagination.per_page, 20);
    }

    #[test]
    fn test_reads_per_page_and_applies_override() {
        let config = UiConfig::from_toml("[pagination]\nper_page = 50\n").unwrap();
        assert_eq!(config.pagination.per_page, 50);

        let config = config.with_overrides(Some("10")).unwrap();
        assert_eq!(config.pagination.per_page, 10);
    }

    #[test]
    fn test_rejects_zero_and_garbage() {
        assert!(matches!(
            UiConfig::from_toml("[pagination]\nper_page = 0\n"),
            Err(ConfigError::InvalidPageSize(_))
        ));
        assert!(matches!(
            UiConfig::default().with_overrides(Some("many")),
            Err(ConfigError::InvalidPageSize(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = UiConfig::load("/nonexistent/rac-admin.toml").unwrap();
        assert!(config.pagination.per_page > 0);
    }
}
