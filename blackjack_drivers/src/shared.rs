use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use thiserror::Error;

const DEFAULT_CONFIG_FILE_NAME: &str = ".blackjack.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value in config: {0}")]
    Value(#[from] serde::de::value::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rule: ConfigRule,
    pub blackjack_simulator: ConfigBlackjackSimulator,
}

/// Table rules as written in the config file. Enum values are kept as strings
/// and parsed when converting to `blackjack::Rule`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRule {
    pub number_of_decks: u8,
    pub dealer_rule: String,
    pub game_style: String,
    pub auto_shuffle: bool,
    pub max_splits: u8,
    pub base_unit: u32,
    pub cut_card_proportion: f64,
}

impl Default for ConfigRule {
    fn default() -> Self {
        let rule = blackjack::Rule::default();
        ConfigRule {
            number_of_decks: rule.number_of_decks,
            dealer_rule: rule.dealer_rule.to_string(),
            game_style: rule.game_style.to_string(),
            auto_shuffle: rule.auto_shuffle,
            max_splits: rule.max_splits,
            base_unit: rule.base_unit,
            cut_card_proportion: rule.cut_card_proportion,
        }
    }
}

impl TryFrom<ConfigRule> for blackjack::Rule {
    type Error = serde::de::value::Error;

    fn try_from(config_rule: ConfigRule) -> Result<Self, Self::Error> {
        let blackjack_rule = blackjack::Rule {
            number_of_decks: config_rule.number_of_decks,
            dealer_rule: config_rule.dealer_rule.parse()?,
            game_style: config_rule.game_style.parse()?,
            auto_shuffle: config_rule.auto_shuffle,
            max_splits: config_rule.max_splits,
            base_unit: config_rule.base_unit,
            cut_card_proportion: config_rule.cut_card_proportion,
        };

        Ok(blackjack_rule)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigBlackjackSimulator {
    pub number_of_games: u64,
    /// A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Rounds between two progress lines. Zero disables them.
    pub progress_period: u64,
}

impl Default for ConfigBlackjackSimulator {
    fn default() -> Self {
        ConfigBlackjackSimulator {
            number_of_games: 10_000,
            seed: None,
            progress_period: 100_000,
        }
    }
}

/// Parses the content of a config file. Missing fields take their default values.
pub fn parse_config_from_str(content: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config, ConfigError> {
    let file_content = fs::read_to_string(filename).map_err(|source| ConfigError::Io {
        path: String::from(filename),
        source,
    })?;
    parse_config_from_str(&file_content)
}

/// `~/.blackjack.yml`, if the home directory is known and the file exists.
pub fn default_config_path() -> Option<PathBuf> {
    let config_file_path = home::home_dir()?.join(DEFAULT_CONFIG_FILE_NAME);
    if config_file_path.is_file() {
        Some(config_file_path)
    } else {
        None
    }
}

/// Loads the given config file, else the one in the home directory, else the
/// built-in defaults.
pub fn load_config(filename: Option<&str>) -> Result<Config, ConfigError> {
    if let Some(filename) = filename {
        log::info!("Loading config from {}", filename);
        return parse_config_from_file(filename);
    }
    match default_config_path() {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            parse_config_from_file(&path.to_string_lossy())
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack::{DealerRule, GameStyle};

    fn get_typical_config_rule() -> ConfigRule {
        ConfigRule {
            number_of_decks: 8,
            dealer_rule: String::from("h17"),
            game_style: String::from("M"),
            auto_shuffle: false,
            max_splits: 3,
            base_unit: 5,
            cut_card_proportion: 0.5,
        }
    }

    #[test]
    fn can_convert_rule() {
        let config_rule = get_typical_config_rule();
        let converted_rule: blackjack::Rule = config_rule.try_into().unwrap();
        assert_eq!(converted_rule.number_of_decks, 8);
        assert_eq!(converted_rule.cut_card_proportion, 0.5);
        assert_eq!(converted_rule.dealer_rule, DealerRule::HitSoft17);
        assert_eq!(converted_rule.game_style, GameStyle::Macau);
        assert!(!converted_rule.auto_shuffle);
        assert_eq!(converted_rule.max_splits, 3);
        assert_eq!(converted_rule.base_unit, 5);
    }

    #[test]
    fn should_return_error_when_converting_rule() {
        let mut config_rule = get_typical_config_rule();
        config_rule.game_style = String::from("Not a style");
        let convert_result: Result<blackjack::Rule, serde::de::value::Error> =
            config_rule.try_into();
        assert!(convert_result.is_err());
    }

    #[test]
    fn default_config_matches_default_rule() {
        let rule: blackjack::Rule = ConfigRule::default().try_into().unwrap();
        assert_eq!(rule, blackjack::Rule::default());
    }

    #[test]
    fn partial_file_takes_defaults() {
        let config = parse_config_from_str(
            "rule:\n  number_of_decks: 2\n  dealer_rule: h17\nblackjack_simulator:\n  seed: 42\n",
        )
        .unwrap();
        assert_eq!(config.rule.number_of_decks, 2);
        assert_eq!(config.rule.dealer_rule, "h17");
        assert_eq!(config.rule.game_style, "A");
        assert_eq!(config.rule.max_splits, 2);
        assert_eq!(config.blackjack_simulator.seed, Some(42));
        assert_eq!(config.blackjack_simulator.number_of_games, 10_000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(matches!(
            parse_config_from_str("rule: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            parse_config_from_file("/nonexistent/blackjack.yml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
