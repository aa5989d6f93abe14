//! Browser binding
//!
//! Wires the dashboard to the DOM: localStorage credentials, page
//! navigation, element updates, toasts, event listeners and the
//! `console`-backed tracing subscriber. Exported to JS as `start` (run on
//! module init) and `logout`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;
use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, Location, Storage, Window,
};

use crate::client::ApiClient;
use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, DashboardView, PendingClose};
use crate::error::{DashboardError, Result};
use crate::notify::{Toast, ToastStack};
use crate::page::{css, ids};
use crate::poll::{self, Timer};
use crate::session::{CredentialStore, MemoryCredentials, Navigator, SessionGuard};
use crate::view::ConnectionView;

thread_local! {
    static DASHBOARD: RefCell<Option<Rc<Dashboard<DomView>>>> = const { RefCell::new(None) };
}

impl From<DashboardError> for JsValue {
    fn from(err: DashboardError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn browser(err: JsValue) -> DashboardError {
    DashboardError::Browser(format!("{err:?}"))
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Read a `window.DASHBOARD_*` global; numbers are accepted too
fn read_global(key: &str) -> Option<String> {
    let value = Reflect::get(&js_sys::global(), &JsValue::from_str(key)).ok()?;
    value
        .as_string()
        .or_else(|| value.as_f64().map(|n| n.to_string()))
}

// ============================================================================
// Logging
// ============================================================================

/// One formatted event, flushed to `console.log` on drop
#[derive(Default)]
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if !line.is_empty() {
            web_sys::console::log_1(&JsValue::from_str(line));
        }
    }
}

fn init_logging(level: &str) {
    let level = level.parse().unwrap_or(tracing::Level::INFO);
    let subscriber = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::default)
        .without_time()
        .with_ansi(false)
        .with_max_level(level)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("tracing subscriber already installed"));
    }
}

// ============================================================================
// Session plumbing
// ============================================================================

struct LocalStorageCredentials {
    storage: Storage,
    key: String,
}

impl CredentialStore for LocalStorageCredentials {
    fn get(&self) -> Option<String> {
        self.storage.get_item(&self.key).ok().flatten()
    }

    fn set(&self, token: &str) {
        if let Err(e) = self.storage.set_item(&self.key, token) {
            tracing::error!(error = ?e, "failed to store credential");
        }
    }

    fn clear(&self) {
        if let Err(e) = self.storage.remove_item(&self.key) {
            tracing::error!(error = ?e, "failed to clear credential");
        }
    }
}

fn credential_store(window: &Window, key: &str) -> Box<dyn CredentialStore> {
    match window.local_storage() {
        Ok(Some(storage)) => Box::new(LocalStorageCredentials {
            storage,
            key: key.to_string(),
        }),
        _ => {
            tracing::warn!("localStorage unavailable, credential kept in memory");
            Box::new(MemoryCredentials::default())
        }
    }
}

struct BrowserNavigator {
    location: Location,
}

impl Navigator for BrowserNavigator {
    fn redirect(&self, path: &str) {
        if let Err(e) = self.location.set_href(path) {
            tracing::error!(error = ?e, path, "navigation failed");
        }
    }
}

struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, period: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(TimeoutFuture::new(millis(period)))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        spawn_local(task);
    }
}

// ============================================================================
// DOM view
// ============================================================================

struct LiveToasts {
    stack: ToastStack,
    elements: HashMap<u64, Element>,
}

/// Element handles looked up once at mount
struct DomView {
    document: Document,
    connection: Element,
    account: Element,
    toggle: HtmlInputElement,
    positions: Element,
    history: Element,
    modal: HtmlElement,
    toasts: Rc<RefCell<LiveToasts>>,
}

fn element(document: &Document, id: &str) -> Result<Element> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| DashboardError::Browser(format!("missing element #{id}")))
}

fn typed<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    element(document, id)?
        .dyn_into::<T>()
        .map_err(|_| DashboardError::Browser(format!("unexpected element type for #{id}")))
}

impl DomView {
    fn mount(document: &Document, max_toasts: usize) -> Result<Self> {
        Ok(Self {
            document: document.clone(),
            connection: element(document, ids::CONNECTION_STATUS)?,
            account: element(document, ids::ACCOUNT_INFO)?,
            toggle: typed(document, ids::AUTO_TRADING_TOGGLE)?,
            positions: element(document, ids::POSITIONS_BODY)?,
            history: element(document, ids::HISTORY_BODY)?,
            modal: typed(document, ids::CLOSE_MODAL)?,
            toasts: Rc::new(RefCell::new(LiveToasts {
                stack: ToastStack::new(max_toasts),
                elements: HashMap::new(),
            })),
        })
    }
}

impl DashboardView for DomView {
    fn show_connection(&self, connection: &ConnectionView) {
        let classes = self.connection.class_list();
        let (on, off) = if connection.connected {
            ("connected", "disconnected")
        } else {
            ("disconnected", "connected")
        };
        let _ = classes.remove_1(off);
        let _ = classes.add_1(on);
        self.account.set_text_content(Some(&connection.text));
    }

    fn set_auto_trading(&self, enabled: bool) {
        self.toggle.set_checked(enabled);
    }

    fn replace_positions(&self, markup: &str) {
        self.positions.set_inner_html(markup);
    }

    fn replace_history(&self, markup: &str) {
        self.history.set_inner_html(markup);
    }

    fn set_close_modal(&self, open: bool) {
        let display = if open { "block" } else { "none" };
        if let Err(e) = self.modal.style().set_property("display", display) {
            tracing::error!(error = ?e, "failed to toggle close modal");
        }
    }

    fn show_toast(&self, toast: &Toast) {
        let Ok(el) = self.document.create_element("div") else {
            tracing::error!(message = %toast.message, "failed to create notification");
            return;
        };
        el.set_class_name(&format!("notification {}", toast.severity.as_str()));
        el.set_text_content(Some(&toast.message));

        let slot = {
            let mut live = self.toasts.borrow_mut();
            let placement = live.stack.push(toast.id);
            for id in placement.evicted {
                if let Some(old) = live.elements.remove(&id) {
                    old.remove();
                }
            }
            live.elements.insert(toast.id, el.clone());
            placement.slot
        };

        let _ = el.set_attribute("style", &css::toast_style(toast.severity.color(), slot));
        if let Some(body) = self.document.body() {
            let _ = body.append_child(&el);
        }

        let id = toast.id;
        let display = toast.display;
        let exit = toast.exit;
        let toasts = Rc::clone(&self.toasts);
        spawn_local(async move {
            TimeoutFuture::new(millis(display)).await;
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let animation = format!("slideOut {}ms ease-out", exit.as_millis());
                let _ = html.style().set_property("animation", &animation);
            }
            TimeoutFuture::new(millis(exit)).await;
            el.remove();

            let mut live = toasts.borrow_mut();
            live.elements.remove(&id);
            live.stack.remove(id);
        });
    }
}

fn inject_styles(document: &Document) -> Result<()> {
    let style = document.create_element("style").map_err(browser)?;
    style.set_text_content(Some(css::INJECTED));
    let head = document
        .head()
        .ok_or_else(|| DashboardError::Browser("document has no <head>".into()))?;
    head.append_child(&style).map_err(browser)?;
    Ok(())
}

// ============================================================================
// Events
// ============================================================================

fn on(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) -> Result<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(browser)?;
    // Listeners live as long as the page
    closure.forget();
    Ok(())
}

/// Read the row snapshot off a Close button
fn pending_close(button: &Element) -> Option<PendingClose> {
    Some(PendingClose {
        symbol: button.get_attribute("data-symbol")?,
        side: button.get_attribute("data-side")?,
        size: button.get_attribute("data-size")?.parse().ok()?,
    })
}

fn bind_events(window: &Window, document: &Document, dashboard: &Rc<Dashboard<DomView>>) -> Result<()> {
    let toggle: HtmlInputElement = typed(document, ids::AUTO_TRADING_TOGGLE)?;
    let d = Rc::clone(dashboard);
    let input = toggle.clone();
    on(&toggle, "change", move |_| {
        let enabled = input.checked();
        let d = Rc::clone(&d);
        spawn_local(async move { d.toggle_auto_trading(enabled).await });
    })?;

    let d = Rc::clone(dashboard);
    on(&element(document, ids::CONFIRM_CLOSE)?, "click", move |_| {
        let d = Rc::clone(&d);
        spawn_local(async move { d.confirm_close().await });
    })?;

    let d = Rc::clone(dashboard);
    on(&element(document, ids::DISMISS_CLOSE)?, "click", move |_| {
        d.dismiss_close();
    })?;

    // Clicking the backdrop dismisses too
    let d = Rc::clone(dashboard);
    let backdrop = JsValue::from(element(document, ids::CLOSE_MODAL)?);
    on(window, "click", move |ev| {
        if ev.target().is_some_and(|t| JsValue::from(t) == backdrop) {
            d.dismiss_close();
        }
    })?;

    // Rows are re-rendered every tick, so listen on the table body
    let d = Rc::clone(dashboard);
    on(&element(document, ids::POSITIONS_BODY)?, "click", move |ev| {
        let button = ev
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(r#"button[data-action="close"]"#).ok().flatten());
        match button.as_ref().and_then(pending_close) {
            Some(pending) => d.request_close(pending),
            None if button.is_some() => tracing::warn!("close button without a position snapshot"),
            None => {}
        }
    })?;

    if let Some(button) = document.get_element_by_id(ids::LOGOUT) {
        let d = Rc::clone(dashboard);
        on(&button, "click", move |_| d.logout())?;
    }

    Ok(())
}

// ============================================================================
// Entry points
// ============================================================================

fn browser_session(window: &Window, config: &DashboardConfig) -> SessionGuard {
    SessionGuard::new(
        credential_store(window, &config.token_key),
        Box::new(BrowserNavigator {
            location: window.location(),
        }),
        config.login_path.clone(),
    )
}

fn mount(
    window: &Window,
    config: &DashboardConfig,
    session: SessionGuard,
) -> Result<Rc<Dashboard<DomView>>> {
    let document = window
        .document()
        .ok_or_else(|| DashboardError::Browser("no document".into()))?;
    inject_styles(&document)?;

    let origin = window.location().origin().map_err(browser)?;
    let base = config.api_url(Some(&origin))?;

    let view = DomView::mount(&document, config.max_toasts)?;
    let dashboard = Rc::new(Dashboard::new(ApiClient::new(base, session), view, config)?);
    bind_events(window, &document, &dashboard)?;
    Ok(dashboard)
}

#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let config = DashboardConfig::from_lookup(read_global);
    init_logging(&config.log_level);

    let window = web_sys::window().ok_or_else(|| DashboardError::Browser("no window".into()))?;
    let session = browser_session(&window, &config);
    // No credential: leave for the login page before touching the DOM
    if session.require().is_none() {
        return Ok(());
    }

    let dashboard = mount(&window, &config, session)
        .inspect_err(|e| tracing::error!(error = %e, "dashboard failed to start"))?;
    DASHBOARD.with(|slot| slot.replace(Some(Rc::clone(&dashboard))));
    spawn_local(poll::run(dashboard, BrowserTimer));
    Ok(())
}

/// Clear the credential and return to the login page
#[wasm_bindgen]
pub fn logout() {
    let dashboard = DASHBOARD.with(|slot| slot.borrow().clone());
    if let Some(dashboard) = dashboard {
        dashboard.logout();
        return;
    }

    tracing::warn!("logout before the dashboard started, clearing credential directly");
    match web_sys::window() {
        Some(window) => {
            let config = DashboardConfig::from_lookup(read_global);
            browser_session(&window, &config).logout();
        }
        None => tracing::error!("no window, cannot log out"),
    }
}
