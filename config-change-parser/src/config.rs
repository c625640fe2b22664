use std::env;
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;

use crate::error::ConfigError;
use crate::rules::IgnoreResourceList;

pub const INVENTORY_FUNCTION_NAME: &str = "INVENTORY_FUNCTION_NAME";
pub const IGNORE_RESOURCE_TYPES: &str = "IGNORE_RESOURCE_TYPES";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub inventory_function_name: String,
    pub ignore_list: IgnoreResourceList,
}

/// Read apart from `Config` so logging is up before the rest can fail.
pub fn log_level_from_env() -> LevelFilter {
    log_level(|key| env::var(key).ok())
}

pub fn log_level<F>(lookup: F) -> LevelFilter
where
    F: Fn(&str) -> Option<String>,
{
    lookup(LOG_LEVEL)
        .and_then(|level| LevelFilter::from_str(level.trim()).ok())
        .unwrap_or(LevelFilter::INFO)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let inventory_function_name = lookup(INVENTORY_FUNCTION_NAME)
            .filter(|name| !name.trim().is_empty())
            .ok_or(ConfigError::Missing(INVENTORY_FUNCTION_NAME))?;

        let ignore_list = match lookup(IGNORE_RESOURCE_TYPES) {
            Some(value) if !value.trim().is_empty() => IgnoreResourceList::new(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|resource_type| !resource_type.is_empty()),
            ),
            _ => IgnoreResourceList::default(),
        };

        Ok(Self {
            inventory_function_name,
            ignore_list,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_function_name_is_set() {
        let config = Config::from_lookup(lookup(&[(INVENTORY_FUNCTION_NAME, "inventory-collector")])).unwrap();
        assert_eq!(
            config,
            Config {
                inventory_function_name: "inventory-collector".to_string(),
                ignore_list: IgnoreResourceList::new(["AWS::EC2::Volume"]),
            }
        );
    }

    #[test]
    fn missing_function_name_is_an_error() {
        let err = Config::from_lookup(lookup(&[(INVENTORY_FUNCTION_NAME, " ")])).unwrap_err();
        assert_eq!(err.to_string(), "INVENTORY_FUNCTION_NAME not set");
    }

    #[test]
    fn ignore_list_can_be_overridden() {
        let config = Config::from_lookup(lookup(&[
            (INVENTORY_FUNCTION_NAME, "inventory-collector"),
            (IGNORE_RESOURCE_TYPES, "AWS::EC2::Volume, AWS::EC2::NetworkInterface,,"),
        ]))
        .unwrap();
        assert_eq!(
            config.ignore_list,
            IgnoreResourceList::new(["AWS::EC2::Volume", "AWS::EC2::NetworkInterface"])
        );
    }

    #[test]
    fn log_level_is_read_without_the_rest_of_the_config() {
        assert_eq!(log_level(lookup(&[(LOG_LEVEL, "debug")])), LevelFilter::DEBUG);
        assert_eq!(log_level(lookup(&[])), LevelFilter::INFO);
        assert_eq!(log_level(lookup(&[(LOG_LEVEL, "chatty")])), LevelFilter::INFO);
    }
}
