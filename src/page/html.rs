//! Dashboard HTML template
//!
//! Header with connection status and auto-trading switch, positions and
//! trade history tables, and the close confirmation modal.

pub const TEMPLATE: &str = r#"
    <div class="container">
        <header>
            <div>
                <h1>Trading Dashboard</h1>
                <div class="account">
                    <span class="status-dot disconnected" id="connectionStatus"></span>
                    <span id="accountInfo">Connecting...</span>
                </div>
            </div>
            <div class="header-controls">
                <label class="switch-label" for="autoTradingToggle">Auto Trading</label>
                <input type="checkbox" id="autoTradingToggle">
                <button class="btn btn-secondary" id="logoutBtn">Logout</button>
            </div>
        </header>

        <section class="card">
            <div class="card-title">Open Positions</div>
            <table>
                <thead>
                    <tr>
                        <th>Symbol</th>
                        <th>Side</th>
                        <th>Size</th>
                        <th>Leverage</th>
                        <th>Entry Price</th>
                        <th>Current Price</th>
                        <th>P&amp;L</th>
                        <th>P&amp;L %</th>
                        <th>Action</th>
                    </tr>
                </thead>
                <tbody id="positionsBody">
                    <tr><td colspan="9" class="empty-message">Loading...</td></tr>
                </tbody>
            </table>
        </section>

        <section class="card">
            <div class="card-title">Trade History</div>
            <table>
                <thead>
                    <tr>
                        <th>Time</th>
                        <th>Symbol</th>
                        <th>Side</th>
                        <th>Quantity</th>
                        <th>Entry Price</th>
                        <th>Status</th>
                        <th>Reason</th>
                    </tr>
                </thead>
                <tbody id="historyBody">
                    <tr><td colspan="7" class="empty-message">Loading...</td></tr>
                </tbody>
            </table>
        </section>
    </div>

    <div class="modal" id="cancelModal">
        <div class="modal-content">
            <h2>Close Position</h2>
            <p>Close this position at market price?</p>
            <div class="modal-actions">
                <button class="btn btn-danger" id="confirmCancel">Close Position</button>
                <button class="btn btn-secondary" id="closeModal">Cancel</button>
            </div>
        </div>
    </div>
"#;
