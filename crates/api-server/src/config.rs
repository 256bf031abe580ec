//! Environment configuration
//!
//! Everything is read once at startup. Lookups go through a closure so the
//! parsing can be exercised without touching the process environment.

use anyhow::{Context, Result};

use newsreel_core::config::{AgentConfig, ScheduleExpression};
use newsreel_core::content::DEFAULT_FEEDS;
use newsreel_core::publish::{DEFAULT_CAPTION_LIMIT, TWITTER_CAPTION_LIMIT};

const DEFAULT_PORT: u16 = 8081;

/// Publish targets in registration order
const TARGETS: &[(&str, usize)] = &[
    ("twitter", TWITTER_CAPTION_LIMIT),
    ("facebook", DEFAULT_CAPTION_LIMIT),
    ("instagram", DEFAULT_CAPTION_LIMIT),
];

#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub name: String,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub caption_limit: usize,
}

impl TargetConfig {
    /// Endpoint and token, if both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.endpoint.as_deref(), self.token.as_deref()) {
            (Some(endpoint), Some(token)) => Some((endpoint, token)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub agent: AgentConfig,
    pub feeds: Vec<String>,
    pub targets: Vec<TargetConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match var("NEWSREEL_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("NEWSREEL_PORT is not a valid port: {}", raw))?,
            None => DEFAULT_PORT,
        };

        let defaults = AgentConfig::default();
        let max_items_per_run = match var("NEWSREEL_MAX_ITEMS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("NEWSREEL_MAX_ITEMS is not a number: {}", raw))?,
            None => defaults.max_items_per_run,
        };

        let agent = AgentConfig {
            auto_post: env_flag(var("NEWSREEL_AUTO_POST"), defaults.auto_post),
            interval: var("NEWSREEL_INTERVAL")
                .map(ScheduleExpression::from)
                .unwrap_or(defaults.interval),
            category: var("NEWSREEL_CATEGORY"),
            max_items_per_run,
        };

        let feeds = match var("NEWSREEL_FEEDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_FEEDS.iter().map(|url| url.to_string()).collect(),
        };

        let targets = TARGETS
            .iter()
            .map(|(name, caption_limit)| {
                let prefix = format!("NEWSREEL_{}", name.to_ascii_uppercase());
                TargetConfig {
                    name: name.to_string(),
                    endpoint: var(&format!("{}_ENDPOINT", prefix)),
                    token: var(&format!("{}_TOKEN", prefix)),
                    caption_limit: *caption_limit,
                }
            })
            .collect();

        Ok(Self {
            port,
            agent,
            feeds,
            targets,
        })
    }
}

fn env_flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}
