//! # Session & Session-aware Client
//!
//! Every outbound call of the console goes through [`SessionClient::request`]. The client
//! forwards the request to its [`Transport`], then inspects the status:
//!
//! - **2xx** - handed back to the caller.
//! - **401** - the [`Session`] is marked unauthenticated and the [`Navigator`] is sent to the
//!   login view, once. The caller still gets [`GatewayError::Unauthenticated`] so it can stop
//!   its spinner, but screens never render this error as a banner.
//! - **anything else** - [`GatewayError::Http`] carrying the server's message.
//!
//! ## One redirect per expiry
//!
//! When a session expires, every request in flight fails with 401 at about the same time. The
//! redirect guard inside [`Session`] is claimed by the first of them; the others see it taken
//! and do nothing. Only a successful [`SessionClient::login`] re-arms the guard.

use crate::config::ConsoleConfig;
use crate::error::{AuthError, GatewayError};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub const LOGIN_ENDPOINT: &str = "/auth/admin/login";
pub const LOGOUT_ENDPOINT: &str = "/auth/admin/logout";
pub const PROBE_ENDPOINT: &str = "/admins/me";

/// Process-wide authentication state.
#[derive(Debug, Default)]
pub struct Session {
    authenticated: AtomicBool,
    redirect_in_flight: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Whether a login redirect has been issued since the last login.
    pub fn redirect_pending(&self) -> bool {
        self.redirect_in_flight.load(Ordering::SeqCst)
    }

    fn set_authenticated(&self, value: bool) {
        self.authenticated.store(value, Ordering::SeqCst);
    }

    fn claim_redirect(&self) -> bool {
        self.redirect_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn rearm_redirect(&self) {
        self.redirect_in_flight.store(false, Ordering::SeqCst);
    }
}

/// The router contract the core depends on.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
}

/// Headless navigator that keeps the current path and every navigation in memory.
#[derive(Debug)]
pub struct MemoryNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(start.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every path passed to [`Navigator::navigate`], oldest first.
    pub fn history(&self) -> Vec<String> {
        lock(&self.history).clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        lock(&self.current).clone()
    }

    fn navigate(&self, path: &str) {
        *lock(&self.current) = path.to_string();
        lock(&self.history).push(path.to_string());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Wraps a [`Transport`] with session bookkeeping and the 401 redirect.
pub struct SessionClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    login_path: String,
}

impl SessionClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
        config: &ConsoleConfig,
    ) -> Self {
        Self {
            transport,
            session,
            navigator,
            login_route: config.login_route(),
            login_path: config.login_path.clone(),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// Sends a request and classifies the response.
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let method = request.method;
        let path = request.path.clone();
        debug!(%method, %path, "Sending request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %path, error = %e, "Request failed");
                return Err(e);
            }
        };

        if response.status == 401 {
            self.handle_unauthenticated();
            return Err(GatewayError::Unauthenticated);
        }
        if !response.is_success() {
            let message = response.server_message();
            debug!(%method, %path, status = response.status, %message, "Request rejected");
            return Err(GatewayError::Http {
                status: response.status,
                message,
            });
        }
        Ok(response)
    }

    fn handle_unauthenticated(&self) {
        self.session.set_authenticated(false);

        let current = self.navigator.current_path();
        if self.is_login_view(&current) {
            debug!(%current, "401 on login view, no redirect");
            return;
        }
        if self.session.claim_redirect() {
            info!(from = %current, to = %self.login_route, "Session expired, redirecting to login");
            self.navigator.navigate(&self.login_route);
        } else {
            debug!("Login redirect already in flight");
        }
    }

    fn is_login_view(&self, path: &str) -> bool {
        is_login_view(path, &self.login_route, &self.login_path)
    }

    /// Asks the backend whether the current credential is still valid.
    ///
    /// Used once at startup; never redirects.
    pub async fn probe_session(&self) -> bool {
        let authenticated = match self.transport.send(ApiRequest::get(PROBE_ENDPOINT)).await {
            Ok(response) => response.is_success(),
            Err(e) => {
                warn!(error = %e, "Session probe failed");
                false
            }
        };
        self.session.set_authenticated(authenticated);
        debug!(authenticated, "Session probed");
        authenticated
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let body = serde_json::to_value(credentials).map_err(GatewayError::from)?;
        let request = ApiRequest::new(Method::Post, LOGIN_ENDPOINT).with_json(body);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let message = response.server_message();
            warn!(username = %credentials.username, %message, "Login rejected");
            return Err(AuthError::Rejected(message));
        }
        self.session.set_authenticated(true);
        self.session.rearm_redirect();
        info!(username = %credentials.username, "Logged in");
        Ok(())
    }

    pub async fn logout(&self) {
        match self
            .transport
            .send(ApiRequest::new(Method::Post, LOGOUT_ENDPOINT))
            .await
        {
            Ok(response) if !response.is_success() => {
                warn!(status = response.status, "Logout rejected by server")
            }
            Err(e) => warn!(error = %e, "Logout request failed"),
            Ok(_) => {}
        }
        self.session.set_authenticated(false);
        info!("Logged out");
        self.navigator.navigate(&self.login_route);
    }
}

/// Whether `path` is the login view, with or without the base path prefix.
///
/// Query and fragment are ignored, so `/admin/login?next=/users` still counts.
fn is_login_view(path: &str, login_route: &str, login_path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    path == login_route || path == login_path
}

/// Outcome of [`RouteGuard::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(String),
}

/// Gatekeeper for views: anonymous users only see the login view, signed-in users skip it.
pub struct RouteGuard {
    session: Arc<Session>,
    login_route: String,
    login_path: String,
    home_route: String,
}

impl RouteGuard {
    pub fn new(session: Arc<Session>, config: &ConsoleConfig) -> Self {
        Self {
            session,
            login_route: config.login_route(),
            login_path: config.login_path.clone(),
            home_route: config.home_route(),
        }
    }

    pub fn check(&self, path: &str) -> Access {
        let on_login = is_login_view(path, &self.login_route, &self.login_path);
        match (self.session.is_authenticated(), on_login) {
            (false, false) => Access::Redirect(self.login_route.clone()),
            (true, true) => Access::Redirect(self.home_route.clone()),
            _ => Access::Allow,
        }
    }
}
