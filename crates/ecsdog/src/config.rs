// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_NAMESPACE: &str = "aws.ecs";
pub const DEFAULT_STATSD_ADDR: &str = "127.0.0.1:8125";
pub const DEFAULT_SCRAPE_INTERVAL: Duration = Duration::from_secs(20);
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration for scraping a single ECS cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ScraperConfig {
    /// Name of the cluster to scrape
    pub cluster: String,
    /// DogStatsD address, `host:port`
    pub statsd_addr: String,
    /// Prefix joined to every gauge name with a `.`
    pub metric_namespace: String,
    /// Extra `key:value` tags added to every gauge and event
    pub tags: Vec<String>,
    /// Time between two scrape passes
    pub scrape_interval: Duration,
    /// Time between two inventory refreshes; zero disables periodic refresh
    pub refresh_interval: Duration,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            cluster: String::new(),
            statsd_addr: DEFAULT_STATSD_ADDR.to_string(),
            metric_namespace: DEFAULT_NAMESPACE.to_string(),
            tags: Vec::new(),
            scrape_interval: DEFAULT_SCRAPE_INTERVAL,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            log_level: "info".to_string(),
        }
    }
}

impl ScraperConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "cluster name must not be empty".to_string(),
            ));
        }

        if self.statsd_addr.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "DogStatsD address must not be empty".to_string(),
            ));
        }

        if self.scrape_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "scrape interval must be greater than 0".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// Parses and validates a metric namespace.
///
/// A valid namespace starts with an ASCII letter and contains only ASCII
/// alphanumerics, underscores, or periods. Surrounding whitespace is trimmed.
///
/// ```
/// use ecsdog::config::parse_metric_namespace;
///
/// assert_eq!(parse_metric_namespace("aws.ecs"), Some("aws.ecs".to_string()));
/// assert_eq!(parse_metric_namespace("1invalid"), None);
/// assert_eq!(parse_metric_namespace("my-app"), None);
/// ```
pub fn parse_metric_namespace(namespace: &str) -> Option<String> {
    let trimmed = namespace.trim();
    let mut chars = trimmed.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        Some(_) => {
            tracing::error!(
                "Metric namespace must start with a letter, got: '{}'. Ignoring namespace.",
                trimmed
            );
            return None;
        }
        None => return None,
    }

    if let Some(invalid_char) =
        chars.find(|&ch| !ch.is_ascii_alphanumeric() && ch != '_' && ch != '.')
    {
        tracing::error!(
            "Metric namespace contains invalid character '{}' in '{}'. Ignoring namespace.",
            invalid_char,
            trimmed
        );
        return None;
    }

    Some(trimmed.to_string())
}

/// Splits a tag string on whitespace and commas, keeping `key:value` entries.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.replace(',', " ")
        .split_whitespace()
        .filter(|kv| matches!(kv.split_once(':'), Some((k, v)) if !k.is_empty() && !v.is_empty()))
        .map(str::to_string)
        .collect()
}
