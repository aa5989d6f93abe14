//! Dashboard CSS styles
//!
//! `STYLES` is the page layout. `INJECTED` is added to `<head>` by the WASM
//! module at startup so notifications animate on any host page.

pub const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }

:root {
    --bg: #0d1117;
    --card: #161b22;
    --border: #30363d;
    --text: #c9d1d9;
    --text-dim: #8b949e;
    --green: #3fb950;
    --red: #f85149;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    padding: 20px;
}

.container { max-width: 1200px; margin: 0 auto; }

header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 24px;
}

.header-controls { display: flex; align-items: center; gap: 12px; }

.status-dot { display: inline-block; width: 10px; height: 10px; border-radius: 50%; }
.status-dot.connected { background: var(--green); }
.status-dot.disconnected { background: var(--red); }

.card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 20px;
    margin-bottom: 16px;
}

.card-title { font-size: 14px; color: var(--text-dim); text-transform: uppercase; margin-bottom: 12px; }

table { width: 100%; border-collapse: collapse; }
th, td { padding: 8px; border-bottom: 1px solid var(--border); text-align: left; font-size: 13px; }
.empty-message { text-align: center; color: var(--text-dim); }

.profit { color: var(--green); }
.loss { color: var(--red); }

.btn { padding: 8px 16px; border-radius: 6px; border: none; cursor: pointer; }
.btn-danger { background: #da3633; color: #fff; }
.btn-secondary { background: var(--border); color: var(--text); }

.modal { display: none; position: fixed; inset: 0; background: rgba(0, 0, 0, 0.6); z-index: 1000; }
.modal-content {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 24px;
    max-width: 400px;
    margin: 15vh auto;
}
.modal-actions { display: flex; gap: 12px; margin-top: 16px; }
";

pub const INJECTED: &str = r"
@keyframes slideIn {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}
@keyframes slideOut {
    from { transform: translateX(0); opacity: 1; }
    to { transform: translateX(100%); opacity: 0; }
}
.btn-sm {
    padding: 4px 8px;
    font-size: 12px;
}
";

/// Inline style for a toast
///
/// Stacked toasts are offset downwards by `slot` positions.
pub fn toast_style(color: &str, slot: usize) -> String {
    let top = 20 + slot * 60;
    format!(
        "position: fixed; top: {top}px; right: 20px; padding: 15px 20px; \
         background: {color}; color: white; border-radius: 6px; z-index: 2000; \
         animation: slideIn 0.3s ease-out;"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injected_animations() {
        assert!(INJECTED.contains("@keyframes slideIn"));
        assert!(INJECTED.contains("@keyframes slideOut"));
    }

    #[test]
    fn test_toast_style_stacks() {
        let first = toast_style("#238636", 0);
        assert!(first.contains("top: 20px"));
        assert!(first.contains("background: #238636"));
        assert!(toast_style("#da3633", 2).contains("top: 140px"));
    }
}
