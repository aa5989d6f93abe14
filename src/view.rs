//! Table rendering
//!
//! Pure functions from API data to table-body markup. Every refresh
//! replaces the whole `<tbody>`; nothing here keeps state.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

use crate::types::{AccountStatus, Position, Trade};

/// Columns in the positions table (including the action column)
pub const POSITION_COLUMNS: usize = 9;

/// Columns in the trade history table
pub const HISTORY_COLUMNS: usize = 7;

/// CSS class for non-negative P&L and filled trades
pub const PROFIT_CLASS: &str = "profit";

/// CSS class for negative P&L and cancelled trades
pub const LOSS_CLASS: &str = "loss";

/// Header status indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionView {
    pub connected: bool,
    pub text: String,
}

impl ConnectionView {
    /// Shown when the status fetch itself failed
    pub fn error() -> Self {
        Self {
            connected: false,
            text: "Connection Error".to_string(),
        }
    }
}

/// Fixed-offset zone trade timestamps are shown in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayZone {
    offset: FixedOffset,
    label: String,
}

impl DisplayZone {
    /// `None` when the offset is a day or more
    pub fn new(offset_minutes: i32, label: &str) -> Option<Self> {
        let seconds = offset_minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(|offset| Self {
            offset,
            label: label.to_string(),
        })
    }

    /// Indian Standard Time, UTC+05:30
    pub fn ist() -> Self {
        Self::new(330, "IST").unwrap_or_else(|| Self {
            offset: Utc.fix(),
            label: "UTC".to_string(),
        })
    }

    /// Format a server timestamp, e.g. `1/1/2024, 05:30:00 pm IST`
    ///
    /// Timestamps without a zone suffix are UTC. Anything unparseable is
    /// returned as-is.
    pub fn format(&self, raw: &str) -> String {
        match parse_utc(raw) {
            Some(instant) => {
                let local = instant.with_timezone(&self.offset);
                format!("{} {}", local.format("%-d/%-m/%Y, %I:%M:%S %P"), self.label)
            }
            None => raw.to_string(),
        }
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::ist()
    }
}

fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Header text for the latest account status
pub fn render_account(status: &AccountStatus) -> ConnectionView {
    if status.connected {
        ConnectionView {
            connected: true,
            text: format!(
                "Balance: ${:.2} | Available: ${:.2}",
                status.balance.unwrap_or(0.0),
                status.available_balance.unwrap_or(0.0)
            ),
        }
    } else {
        ConnectionView {
            connected: false,
            text: "Disconnected".to_string(),
        }
    }
}

pub fn pnl_class(pnl: f64) -> &'static str {
    if pnl >= 0.0 { PROFIT_CLASS } else { LOSS_CLASS }
}

pub fn status_class(status: &str) -> &'static str {
    match status {
        "filled" => PROFIT_CLASS,
        "cancelled" => LOSS_CLASS,
        _ => "",
    }
}

fn placeholder_row(columns: usize, message: &str) -> String {
    format!(r#"<tr><td colspan="{columns}" class="empty-message">{message}</td></tr>"#)
}

/// Positions table body
pub fn render_positions(positions: &[Position]) -> String {
    if positions.is_empty() {
        return placeholder_row(POSITION_COLUMNS, "No open positions");
    }

    let mut rows = String::new();
    for pos in positions {
        let class = pnl_class(pos.pnl);
        let leverage = pos
            .leverage
            .filter(|l| *l > 0.0)
            .map_or_else(|| "-".to_string(), |l| l.to_string());
        let symbol = escape(&pos.symbol);
        let side = escape(&pos.side);

        let _ = write!(
            rows,
            r#"
<tr>
    <td>{symbol}</td>
    <td>{side}</td>
    <td>{size}</td>
    <td>{leverage}x</td>
    <td>{entry:.4}</td>
    <td>{current:.4}</td>
    <td class="{class}">{pnl:.2}</td>
    <td class="{class}">{pct:.2}%</td>
    <td>
        <button class="btn btn-danger btn-sm" data-action="close" data-symbol="{symbol}" data-side="{side}" data-size="{size}">
            Close
        </button>
    </td>
</tr>"#,
            size = pos.size,
            entry = pos.entry_price,
            current = pos.current_price,
            pnl = pos.pnl,
            pct = pos.pnl_percentage,
        );
    }
    rows
}

/// Trade history table body
pub fn render_trades(trades: &[Trade], zone: &DisplayZone) -> String {
    if trades.is_empty() {
        return placeholder_row(HISTORY_COLUMNS, "No trade history");
    }

    let mut rows = String::new();
    for trade in trades {
        let entry = trade
            .entry_price
            .filter(|p| *p > 0.0)
            .map_or_else(|| "-".to_string(), |p| format!("${p:.4}"));
        let reason = trade
            .reason
            .as_deref()
            .filter(|r| !r.is_empty())
            .map_or_else(|| "-".to_string(), escape);

        let _ = write!(
            rows,
            r#"
<tr>
    <td>{time}</td>
    <td>{symbol}</td>
    <td>{side}</td>
    <td>{quantity}</td>
    <td>{entry}</td>
    <td class="{class}">{status}</td>
    <td>{reason}</td>
</tr>"#,
            time = escape(&zone.format(&trade.created_at)),
            symbol = escape(&trade.symbol),
            side = escape(&trade.side),
            quantity = trade.quantity,
            class = status_class(&trade.status),
            status = escape(&trade.status.to_uppercase()),
        );
    }
    rows
}

/// Trade history body after a failed fetch
pub fn render_history_error() -> String {
    placeholder_row(HISTORY_COLUMNS, "Error loading trade history")
}

/// Escape text for HTML content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
