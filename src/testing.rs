//! Test doubles: an in-process mock of the trading API plus recording
//! navigator and view.

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use reqwest::Url;

use crate::dashboard::DashboardView;
use crate::notify::Toast;
use crate::session::Navigator;
use crate::view::ConnectionView;

/// A request the mock API received
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: String,
    json: bool,
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<Recorded>>,
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
}

/// Scripted trading API on `127.0.0.1`
///
/// Replies are keyed by `"METHOD /path"` (query excluded). Queued replies
/// are served in order and the last one repeats. Unscripted routes get 404.
pub struct MockApi {
    state: Arc<MockState>,
    base: Url,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock API");
        let addr = listener.local_addr().expect("mock API address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock API server");
        });

        let base = Url::parse(&format!("http://{addr}/api")).expect("mock API URL");
        Self { state, base }
    }

    pub fn url(&self) -> Url {
        self.base.clone()
    }

    pub fn reply(&self, route: &str, status: u16, body: serde_json::Value) {
        self.push(route, Reply {
            status,
            body: body.to_string(),
            json: true,
        });
    }

    pub fn reply_text(&self, route: &str, status: u16, body: &str) {
        self.push(route, Reply {
            status,
            body: body.to_string(),
            json: false,
        });
    }

    fn push(&self, route: &str, reply: Reply) {
        self.state
            .replies
            .lock()
            .expect("replies lock")
            .entry(route.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().expect("requests lock").clone()
    }

    pub fn hits(&self, route: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| format!("{} {}", r.method, r.path) == route)
            .count()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    };
    let route = format!("{} {}", recorded.method, recorded.path);
    state.requests.lock().expect("requests lock").push(recorded);

    let reply = {
        let mut replies = state.replies.lock().expect("replies lock");
        match replies.get_mut(&route) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    };

    let reply = reply.unwrap_or(Reply {
        status: 404,
        body: r#"{"detail":"Not Found"}"#.to_string(),
        json: true,
    });
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = if reply.json {
        "application/json"
    } else {
        "text/html"
    };
    (status, [(header::CONTENT_TYPE, content_type)], reply.body).into_response()
}

/// Navigator that records redirects instead of leaving the page
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    redirects: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.redirects.borrow_mut().push(path.to_string());
    }
}

/// Everything the dashboard drew, last write wins
#[derive(Debug, Default)]
pub struct ViewLog {
    pub connection: Option<ConnectionView>,
    pub auto_trading: Option<bool>,
    pub positions: Option<String>,
    pub history: Option<String>,
    pub modal_open: bool,
    pub toasts: Vec<Toast>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    log: Rc<RefCell<ViewLog>>,
}

impl RecordingView {
    pub fn log(&self) -> Ref<'_, ViewLog> {
        self.log.borrow()
    }
}

impl DashboardView for RecordingView {
    fn show_connection(&self, connection: &ConnectionView) {
        self.log.borrow_mut().connection = Some(connection.clone());
    }

    fn set_auto_trading(&self, enabled: bool) {
        self.log.borrow_mut().auto_trading = Some(enabled);
    }

    fn replace_positions(&self, markup: &str) {
        self.log.borrow_mut().positions = Some(markup.to_string());
    }

    fn replace_history(&self, markup: &str) {
        self.log.borrow_mut().history = Some(markup.to_string());
    }

    fn set_close_modal(&self, open: bool) {
        self.log.borrow_mut().modal_open = open;
    }

    fn show_toast(&self, toast: &Toast) {
        self.log.borrow_mut().toasts.push(toast.clone());
    }
}
