//! Trade Dashboard - browser dashboard for a webhook-driven trading account
//!
//! Polls the trading API for account status, open positions and trade
//! history, renders them into tables, and forwards the two user actions the
//! account allows: toggling auto trading and closing a position.
//!
//! # Architecture
//! - `session` / `client`: bearer credential and authorized API calls
//! - `dashboard`: page state, loaders and action handlers
//! - `poll`: initial load plus the fixed-period refresh
//! - `view` / `page`: markup for the tables and the page shell
//! - `web` (wasm32 only): DOM, localStorage and timer bindings
//!
//! Everything except `web` is platform neutral and runs natively, which is
//! how it is tested.

// Clippy configuration for dashboard code patterns
#![allow(clippy::cast_precision_loss)] // Float casts OK for display
#![allow(clippy::doc_markdown)] // Doc style flexibility
#![allow(clippy::future_not_send)] // Single-threaded browser event loop

mod client;
mod config;
mod dashboard;
mod error;
mod notify;
pub mod page;
mod poll;
mod session;
mod types;
pub mod view;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
mod web;

pub use client::{ApiClient, AuthOutcome};
pub use config::DashboardConfig;
pub use dashboard::{CloseFlow, Dashboard, DashboardState, DashboardView, PendingClose};
pub use error::{DashboardError, Result};
pub use notify::{Placement, Severity, Toast, ToastStack};
pub use page::dashboard_html;
pub use poll::{Timer, run};
pub use session::{CredentialStore, MemoryCredentials, Navigator, SessionGuard};
pub use types::*;
pub use view::{ConnectionView, DisplayZone};
