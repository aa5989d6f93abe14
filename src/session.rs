//! Session guard
//!
//! Gatekeeper for every authorized call: reads the bearer credential from
//! client-local storage and sends the browser to the login page when it is
//! missing or has been rejected.

use std::cell::RefCell;
use std::rc::Rc;

/// Persistent storage for the bearer credential
pub trait CredentialStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// Full-page navigation
pub trait Navigator {
    fn redirect(&self, path: &str);
}

/// In-memory credential store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentials {
    token: Rc<RefCell<Option<String>>>,
}

impl MemoryCredentials {
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.set(token);
        store
    }
}

impl CredentialStore for MemoryCredentials {
    fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

/// Credential check plus the clear-and-redirect paths
pub struct SessionGuard {
    store: Box<dyn CredentialStore>,
    navigator: Box<dyn Navigator>,
    login_path: String,
}

impl SessionGuard {
    pub fn new(
        store: Box<dyn CredentialStore>,
        navigator: Box<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            login_path: login_path.into(),
        }
    }

    /// Current credential, empty strings count as absent
    pub fn credential(&self) -> Option<String> {
        self.store.get().filter(|token| !token.is_empty())
    }

    /// Credential or a redirect to the login page
    pub fn require(&self) -> Option<String> {
        let token = self.credential();
        if token.is_none() {
            tracing::info!(login = %self.login_path, "no session credential, redirecting");
            self.navigator.redirect(&self.login_path);
        }
        token
    }

    /// Server rejected the credential
    pub fn expire(&self) {
        tracing::warn!("session rejected by server, clearing credential");
        self.store.clear();
        self.navigator.redirect(&self.login_path);
    }

    /// User-initiated logout
    pub fn logout(&self) {
        self.store.clear();
        self.navigator.redirect(&self.login_path);
    }
}
