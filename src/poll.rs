//! Poll loop
//!
//! Initial load in order, then a fixed-period tick that refreshes account
//! status and positions. Ticks are spawned rather than awaited, so a slow
//! tick can overlap the next one; whichever response lands last is what
//! the view shows.

use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;

use crate::dashboard::{Dashboard, DashboardView};

/// Timer and task spawner of the host event loop
pub trait Timer {
    fn sleep(&self, period: Duration) -> LocalBoxFuture<'static, ()>;
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Run the dashboard until the session is gone
pub async fn run<V, T>(dashboard: Rc<Dashboard<V>>, timer: T)
where
    V: DashboardView + 'static,
    T: Timer,
{
    if !dashboard.initialize().await {
        return;
    }

    let period = dashboard.config().poll_interval;
    tracing::info!(period_ms = period.as_millis(), "dashboard loaded, polling");

    loop {
        timer.sleep(period).await;

        if !dashboard.session_active() {
            tracing::info!("session ended, stopping poll loop");
            break;
        }

        let tick = Rc::clone(&dashboard);
        timer.spawn(Box::pin(async move {
            tick.refresh().await;
        }));
    }
}
