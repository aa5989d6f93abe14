//! Configuration management for the dashboard
//!
//! Values come from a key lookup: `window.DASHBOARD_*` globals in the
//! browser, environment variables natively, a plain map in tests.
//! Malformed values fall back to defaults.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use crate::error::{DashboardError, Result};
use crate::view::DisplayZone;

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API base, absolute or relative to the page origin
    pub api_base: String,

    /// Where to send the browser when the session is missing or rejected
    pub login_path: String,

    /// localStorage key holding the bearer credential
    pub token_key: String,

    /// Fixed refresh period for status and positions
    pub poll_interval: Duration,

    /// `?limit=` for the trade history fetch
    pub history_limit: u32,

    /// Notification timings
    pub toast_display: Duration,
    pub toast_exit: Duration,
    pub max_toasts: usize,

    /// Display zone for trade timestamps (IST by default)
    pub utc_offset_minutes: i32,
    pub zone_label: String,

    /// Log level
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            login_path: "/login".to_string(),
            token_key: "access_token".to_string(),
            poll_interval: Duration::from_millis(5_000),
            history_limit: 50,
            toast_display: Duration::from_millis(3_000),
            toast_exit: Duration::from_millis(300),
            max_toasts: 5,
            utc_offset_minutes: 330,
            zone_label: "IST".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Build configuration from a key lookup, keeping defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            api_base: lookup("DASHBOARD_API_BASE").unwrap_or(defaults.api_base),
            login_path: lookup("DASHBOARD_LOGIN_PATH").unwrap_or(defaults.login_path),
            token_key: lookup("DASHBOARD_TOKEN_KEY").unwrap_or(defaults.token_key),
            poll_interval: millis(&lookup, "DASHBOARD_POLL_INTERVAL_MS", defaults.poll_interval),
            history_limit: parsed(&lookup, "DASHBOARD_HISTORY_LIMIT", defaults.history_limit),
            toast_display: millis(&lookup, "DASHBOARD_TOAST_DISPLAY_MS", defaults.toast_display),
            toast_exit: millis(&lookup, "DASHBOARD_TOAST_EXIT_MS", defaults.toast_exit),
            max_toasts: parsed(&lookup, "DASHBOARD_MAX_TOASTS", defaults.max_toasts),
            utc_offset_minutes: parsed(
                &lookup,
                "DASHBOARD_UTC_OFFSET_MINUTES",
                defaults.utc_offset_minutes,
            ),
            zone_label: lookup("DASHBOARD_ZONE_LABEL").unwrap_or(defaults.zone_label),
            log_level: lookup("DASHBOARD_LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Load configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(DashboardError::Config("poll interval must be positive".into()));
        }
        if self.history_limit == 0 {
            return Err(DashboardError::Config("history limit must be positive".into()));
        }
        if self.max_toasts == 0 {
            return Err(DashboardError::Config("notification cap must be positive".into()));
        }
        if self.token_key.trim().is_empty() {
            return Err(DashboardError::Config("token key must not be empty".into()));
        }
        self.display_zone()?;
        Ok(())
    }

    /// Resolve the API base against the page origin when it is relative
    pub fn api_url(&self, origin: Option<&str>) -> Result<Url> {
        if let Ok(url) = Url::parse(&self.api_base) {
            return Ok(url);
        }

        let origin = origin.ok_or_else(|| {
            DashboardError::Config(format!(
                "relative API base {} needs a page origin",
                self.api_base
            ))
        })?;

        Url::parse(origin)
            .and_then(|base| base.join(&self.api_base))
            .map_err(|e| DashboardError::Config(format!("invalid API base: {e}")))
    }

    /// Time zone used to display trade timestamps
    pub fn display_zone(&self) -> Result<DisplayZone> {
        DisplayZone::new(self.utc_offset_minutes, &self.zone_label).ok_or_else(|| {
            DashboardError::Config(format!(
                "UTC offset out of range: {} minutes",
                self.utc_offset_minutes
            ))
        })
    }
}

fn millis<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .map_or(default, Duration::from_millis)
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
