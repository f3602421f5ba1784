//! Planner configuration from environment.

use droneroute_core::{BlockPolicy, RouteConfig, SearchConfig, DEFAULT_BLOCK_THRESHOLD};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub block_policy: BlockPolicy,
    pub diagonal_factor: f64,
    pub max_steps: Option<usize>,
    pub cell_resolution_m: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| lookup(key).and_then(|s| s.trim().parse::<f64>().ok());

        // A sentinel, when given, wins over the threshold.
        let block_policy = match number("DRONEROUTE_BLOCK_SENTINEL") {
            Some(sentinel) => BlockPolicy::Sentinel(sentinel),
            None => BlockPolicy::Threshold(
                number("DRONEROUTE_BLOCK_THRESHOLD").unwrap_or(DEFAULT_BLOCK_THRESHOLD),
            ),
        };

        Self {
            block_policy,
            diagonal_factor: number("DRONEROUTE_DIAGONAL_FACTOR")
                .unwrap_or(std::f64::consts::SQRT_2),
            max_steps: lookup("DRONEROUTE_MAX_STEPS").and_then(|s| s.trim().parse().ok()),
            cell_resolution_m: number("DRONEROUTE_CELL_RESOLUTION_M").unwrap_or(30.0),
        }
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            blocking: self.block_policy,
            diagonal_factor: self.diagonal_factor,
            max_steps: self.max_steps,
        }
    }

    pub fn route_config(&self) -> RouteConfig {
        RouteConfig {
            search: self.search_config(),
            cell_resolution_m: self.cell_resolution_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.block_policy, BlockPolicy::Threshold(100.0));
        assert_eq!(config.diagonal_factor, std::f64::consts::SQRT_2);
        assert_eq!(config.max_steps, None);
        assert_eq!(config.cell_resolution_m, 30.0);
    }

    #[test]
    fn sentinel_overrides_threshold() {
        let config = Config::from_lookup(lookup(&[
            ("DRONEROUTE_BLOCK_THRESHOLD", "50"),
            ("DRONEROUTE_BLOCK_SENTINEL", "1"),
            ("DRONEROUTE_MAX_STEPS", "5000"),
            ("DRONEROUTE_DIAGONAL_FACTOR", "1.414"),
        ]));
        assert_eq!(config.block_policy, BlockPolicy::Sentinel(1.0));
        assert_eq!(config.max_steps, Some(5000));
        assert_eq!(config.route_config().search.diagonal_factor, 1.414);
    }

    #[test]
    fn garbage_falls_back() {
        let config = Config::from_lookup(lookup(&[("DRONEROUTE_CELL_RESOLUTION_M", "far")]));
        assert_eq!(config.cell_resolution_m, 30.0);
    }
}
