//! API schemas
//!
//! Typed views of the JSON the trading backend returns. Optional fields
//! default at the boundary so a missing `leverage`, `entry_price` or
//! `reason` never fails a whole table.

use serde::{Deserialize, Serialize};

/// Exchange connection and wallet summary (`GET /account/status`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub connected: bool,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub equity: Option<f64>,
    #[serde(default)]
    pub available_balance: Option<f64>,
}

/// An open position as reported by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: String,
    pub size: f64,
    #[serde(default)]
    pub leverage: Option<f64>,
    pub entry_price: f64,
    pub current_price: f64,
    pub pnl: f64,
    pub pnl_percentage: f64,
    #[serde(default)]
    pub trade_id: Option<String>,
}

/// A trade history record
///
/// `created_at` is a UTC timestamp without a zone suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub trade_id: Option<String>,
    pub created_at: String,
    pub symbol: String,
    pub side: String,
    pub quantity: f64,
    #[serde(default)]
    pub leverage: Option<f64>,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub pnl: Option<f64>,
}

/// Trading settings
///
/// Only `auto_trading_enabled` is user-editable here; the sizing fields are
/// carried along so a toggle pushes back what was loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub auto_trading_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_position_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_percentage: Option<f64>,
}

/// `GET /settings` answers with either the settings or `{ "error": ... }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingsReply {
    Failure { error: String },
    Settings(Settings),
}

/// Body of `POST /positions/{symbol}/close`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseRequest {
    pub side: String,
    pub size: f64,
}

/// Reply to settings updates and close requests
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

impl ActionReply {
    /// Server-supplied failure reason, if any
    pub fn failure_reason(&self) -> &str {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("Unknown error")
    }
}
