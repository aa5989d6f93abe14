//! Dashboard state and action handlers
//!
//! [`Dashboard`] owns the API client, the view and the explicit
//! application state. Every API function catches its own failures: a fetch
//! error is logged and reflected in the view, never propagated, so the poll
//! loop keeps running.
//!
//! # Close flow
//! `Idle` → `ConfirmPending` (modal open) → `Submitting` → `Idle`.
//! The modal always closes and the pending request always clears once a
//! submission finishes, whatever the outcome.

use std::cell::RefCell;

use crate::client::{ApiClient, AuthOutcome};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::notify::{Severity, Toast};
use crate::types::{CloseRequest, Settings, SettingsReply};
use crate::view::{self, ConnectionView, DisplayZone};

/// Where the dashboard draws
pub trait DashboardView {
    fn show_connection(&self, connection: &ConnectionView);
    fn set_auto_trading(&self, enabled: bool);
    fn replace_positions(&self, markup: &str);
    fn replace_history(&self, markup: &str);
    fn set_close_modal(&self, open: bool);
    fn show_toast(&self, toast: &Toast);
}

/// Snapshot of a position taken when its Close button was clicked
#[derive(Debug, Clone, PartialEq)]
pub struct PendingClose {
    pub symbol: String,
    pub side: String,
    pub size: f64,
}

/// Position close state machine
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CloseFlow {
    #[default]
    Idle,
    ConfirmPending(PendingClose),
    Submitting(PendingClose),
}

/// Mutable page state
#[derive(Debug, Default)]
pub struct DashboardState {
    pub close: CloseFlow,
    /// Last settings the server confirmed
    pub settings: Settings,
    next_toast: u64,
}

/// The trading dashboard
pub struct Dashboard<V> {
    client: ApiClient,
    view: V,
    zone: DisplayZone,
    config: DashboardConfig,
    state: RefCell<DashboardState>,
}

impl<V: DashboardView> Dashboard<V> {
    pub fn new(client: ApiClient, view: V, config: &DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client,
            view,
            zone: config.display_zone()?,
            config: config.clone(),
            state: RefCell::new(DashboardState::default()),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn close_flow(&self) -> CloseFlow {
        self.state.borrow().close.clone()
    }

    pub fn settings(&self) -> Settings {
        self.state.borrow().settings.clone()
    }

    /// A credential is still stored
    pub fn session_active(&self) -> bool {
        self.client.session().credential().is_some()
    }

    /// Initial load: status, settings, positions, history, strictly in order
    ///
    /// Returns `false` when there is no session and the page is being
    /// redirected to the login page.
    pub async fn initialize(&self) -> bool {
        if self.client.session().require().is_none() {
            return false;
        }

        self.check_account_status().await;
        self.load_settings().await;
        self.load_positions().await;
        self.load_trade_history().await;
        true
    }

    /// One poll tick: status and positions fired together
    pub async fn refresh(&self) {
        futures::join!(self.check_account_status(), self.load_positions());
    }

    pub async fn check_account_status(&self) {
        match self.client.account_status().await {
            Ok(AuthOutcome::Authorized(status)) => {
                self.view.show_connection(&view::render_account(&status));
            }
            Ok(AuthOutcome::Unauthenticated) => {}
            Err(e) => {
                tracing::error!(error = %e, "error checking account status");
                self.view.show_connection(&ConnectionView::error());
            }
        }
    }

    pub async fn load_settings(&self) {
        match self.client.settings().await {
            Ok(AuthOutcome::Authorized(SettingsReply::Settings(settings))) => {
                self.view.set_auto_trading(settings.auto_trading_enabled);
                self.state.borrow_mut().settings = settings;
            }
            Ok(AuthOutcome::Authorized(SettingsReply::Failure { error })) => {
                tracing::warn!(%error, "settings unavailable");
            }
            Ok(AuthOutcome::Unauthenticated) => {}
            Err(e) => tracing::error!(error = %e, "error loading settings"),
        }
    }

    pub async fn load_positions(&self) {
        match self.client.positions().await {
            Ok(AuthOutcome::Authorized(positions)) => {
                tracing::debug!(count = positions.len(), "positions refreshed");
                self.view
                    .replace_positions(&view::render_positions(&positions));
            }
            Ok(AuthOutcome::Unauthenticated) => {}
            Err(e) => tracing::error!(error = %e, "error loading positions"),
        }
    }

    pub async fn load_trade_history(&self) {
        match self.client.trades(self.config.history_limit).await {
            Ok(AuthOutcome::Authorized(trades)) => {
                self.view
                    .replace_history(&view::render_trades(&trades, &self.zone));
            }
            Ok(AuthOutcome::Unauthenticated) => {}
            Err(e) => {
                tracing::error!(error = %e, "error loading trade history");
                self.view.replace_history(&view::render_history_error());
            }
        }
    }

    /// Auto-trading switch changed; pushed immediately
    ///
    /// On failure the switch goes back to the last confirmed value.
    pub async fn toggle_auto_trading(&self, enabled: bool) {
        let settings = Settings {
            auto_trading_enabled: enabled,
            ..self.settings()
        };

        match self.client.update_settings(&settings).await {
            Ok(AuthOutcome::Authorized(reply)) if reply.success => {
                self.state.borrow_mut().settings = settings;
                let label = if enabled { "enabled" } else { "disabled" };
                self.notify(format!("Auto trading {label}"), Severity::Success);
            }
            Ok(AuthOutcome::Authorized(reply)) => {
                tracing::warn!(reason = reply.failure_reason(), "settings update rejected");
                self.revert_auto_trading();
                self.notify("Failed to update settings", Severity::Error);
            }
            Ok(AuthOutcome::Unauthenticated) => {}
            Err(DashboardError::Api { status, message }) => {
                tracing::warn!(status, reason = %message, "settings update rejected");
                self.revert_auto_trading();
                self.notify("Failed to update settings", Severity::Error);
            }
            Err(e) => {
                tracing::error!(error = %e, "error saving settings");
                self.revert_auto_trading();
                self.notify("Error saving settings", Severity::Error);
            }
        }
    }

    fn revert_auto_trading(&self) {
        let confirmed = self.state.borrow().settings.auto_trading_enabled;
        self.view.set_auto_trading(confirmed);
    }

    /// Close button clicked: capture the row and open the modal
    ///
    /// Replaces any request still awaiting confirmation. Ignored while a
    /// submission is in flight.
    pub fn request_close(&self, pending: PendingClose) {
        {
            let mut state = self.state.borrow_mut();
            if matches!(state.close, CloseFlow::Submitting(_)) {
                tracing::debug!(symbol = %pending.symbol, "close already submitting, ignoring");
                return;
            }
            state.close = CloseFlow::ConfirmPending(pending);
        }
        self.view.set_close_modal(true);
    }

    /// Modal dismissed without confirming
    pub fn dismiss_close(&self) {
        {
            let mut state = self.state.borrow_mut();
            if matches!(state.close, CloseFlow::ConfirmPending(_)) {
                state.close = CloseFlow::Idle;
            }
        }
        self.view.set_close_modal(false);
    }

    /// Confirm clicked: submit the pending close
    pub async fn confirm_close(&self) {
        let pending = {
            let mut state = self.state.borrow_mut();
            let CloseFlow::ConfirmPending(pending) = state.close.clone() else {
                return;
            };
            state.close = CloseFlow::Submitting(pending.clone());
            pending
        };

        self.submit_close(&pending).await;

        self.state.borrow_mut().close = CloseFlow::Idle;
        self.view.set_close_modal(false);
    }

    async fn submit_close(&self, pending: &PendingClose) {
        let request = CloseRequest {
            side: pending.side.clone(),
            size: pending.size,
        };

        match self.client.close_position(&pending.symbol, &request).await {
            Ok(AuthOutcome::Authorized(reply)) if reply.success => {
                tracing::info!(symbol = %pending.symbol, order_id = ?reply.order_id, "position closed");
                self.notify("Position closed successfully", Severity::Success);
                self.load_positions().await;
                self.load_trade_history().await;
            }
            Ok(AuthOutcome::Authorized(reply)) => {
                let reason = reply.failure_reason();
                tracing::warn!(symbol = %pending.symbol, reason, "close rejected");
                self.notify(
                    format!("Failed to close position: {reason}"),
                    Severity::Error,
                );
            }
            Ok(AuthOutcome::Unauthenticated) => {}
            Err(DashboardError::Api { status, message }) => {
                tracing::warn!(symbol = %pending.symbol, status, reason = %message, "close rejected");
                self.notify(
                    format!("Failed to close position: {message}"),
                    Severity::Error,
                );
            }
            Err(e) => {
                tracing::error!(symbol = %pending.symbol, error = %e, "error closing position");
                self.notify("Error closing position", Severity::Error);
            }
        }
    }

    /// Show a toast
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> Toast {
        let id = {
            let mut state = self.state.borrow_mut();
            state.next_toast += 1;
            state.next_toast
        };
        let toast = Toast {
            id,
            message: message.into(),
            severity,
            display: self.config.toast_display,
            exit: self.config.toast_exit,
        };
        self.view.show_toast(&toast);
        toast
    }

    /// Clear the credential and go to the login page
    pub fn logout(&self) {
        self.client.session().logout();
    }
}
