//! Rules configuration loader.

use std::path::Path;

use ledger_core::RulesConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for rules configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load rules configuration from a TOML file.
    ///
    /// Missing keys fall back to [`RulesConfig::default`].
    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate rules configuration from TOML text.
    pub fn parse(content: &str) -> LoadResult<RulesConfig> {
        let config: RulesConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid rules config: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use ledger_core::CounterBounds;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, RulesConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = ConfigLoader::parse(
            r#"
            max_usage_cap = 5

            [renown]
            min = 0
            max = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.max_usage_cap, 5);
        assert_eq!(config.renown, CounterBounds { min: 0, max: 12 });
        assert_eq!(config.status, CounterBounds::STATUS);
    }

    #[test]
    fn widened_counter_ranges_are_rejected() {
        let error = ConfigLoader::parse(
            r#"
            [social_standing]
            min = -20
            max = 20
            "#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("Invalid rules config"));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let error = ConfigLoader::parse(
            r#"
            [status]
            min = 3
            max = 1
            "#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("Invalid rules config"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let error = ConfigLoader::load(&dir.path().join("config.toml")).unwrap_err();
        assert!(error.to_string().starts_with("Failed to read file"));
    }
}
