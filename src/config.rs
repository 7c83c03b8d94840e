use crate::domain::Tier;
use crate::engine::RuleTable;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub root_name: String,
    pub root_tier: Tier,
    pub tier_rules: RuleTable,
    /// Directory receiving one payout CSV per period, if set.
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let root_name = env_map
            .get("ROOT_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "root".to_string());

        let tier_rules = match env_map.get("TIER_RULES") {
            Some(raw) => raw
                .parse::<RuleTable>()
                .map_err(|e| ConfigError::InvalidValue("TIER_RULES".to_string(), e.to_string()))?,
            None => RuleTable::reference(),
        };

        let root_tier = env_map
            .get("ROOT_TIER")
            .map(|s| s.as_str())
            .unwrap_or("500")
            .parse::<Tier>()
            .map_err(|_| {
                ConfigError::InvalidValue("ROOT_TIER".to_string(), "must be a valid u32".to_string())
            })?;
        if !tier_rules.contains(root_tier) {
            return Err(ConfigError::InvalidValue(
                "ROOT_TIER".to_string(),
                format!("no rule for tier {}", root_tier),
            ));
        }

        let export_dir = env_map
            .get("EXPORT_DIR")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Config {
            port,
            root_name,
            root_tier,
            tier_rules,
            export_dir,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            root_name: "root".to_string(),
            root_tier: Tier::new(500),
            tier_rules: RuleTable::reference(),
            export_dir: None,
        }
    }
}
