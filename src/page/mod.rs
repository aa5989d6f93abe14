//! Page shell - the HTML the WASM module mounts on
//!
//! Separated into HTML and CSS submodules, like the element ids the
//! browser binding looks up.
//!
//! # Architecture
//! - `html.rs`: page structure, tables, confirmation modal
//! - `css.rs`: layout, plus the notification animation injected at startup

pub mod css;
pub mod html;

/// Ids of the elements the browser binding drives
pub mod ids {
    pub const CONNECTION_STATUS: &str = "connectionStatus";
    pub const ACCOUNT_INFO: &str = "accountInfo";
    pub const AUTO_TRADING_TOGGLE: &str = "autoTradingToggle";
    pub const POSITIONS_BODY: &str = "positionsBody";
    pub const HISTORY_BODY: &str = "historyBody";
    pub const CLOSE_MODAL: &str = "cancelModal";
    pub const CONFIRM_CLOSE: &str = "confirmCancel";
    pub const DISMISS_CLOSE: &str = "closeModal";
    pub const LOGOUT: &str = "logoutBtn";
}

/// Generate the complete dashboard page loading the WASM bundle at `module_path`
pub fn dashboard_html(module_path: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Trading Dashboard</title>
    <style>
{css}
    </style>
</head>
<body>
{html}
    <script type="module">
        import init from '{module_path}';
        init();
    </script>
</body>
</html>"#,
        css = css::STYLES,
        html = html::TEMPLATE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_contains_mount_points() {
        let page = dashboard_html("/static/pkg/trade_dashboard.js");
        for id in [
            ids::CONNECTION_STATUS,
            ids::ACCOUNT_INFO,
            ids::AUTO_TRADING_TOGGLE,
            ids::POSITIONS_BODY,
            ids::HISTORY_BODY,
            ids::CLOSE_MODAL,
            ids::CONFIRM_CLOSE,
            ids::DISMISS_CLOSE,
            ids::LOGOUT,
        ] {
            assert!(page.contains(&format!(r#"id="{id}""#)), "missing #{id}");
        }
        assert!(page.contains("import init from '/static/pkg/trade_dashboard.js'"));
    }

    #[test]
    fn test_loading_rows_span_all_columns() {
        assert!(html::TEMPLATE.contains(r#"colspan="9""#));
        assert!(html::TEMPLATE.contains(r#"colspan="7""#));
    }
}
