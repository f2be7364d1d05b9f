//! # Console Lifecycle & Wiring
//!
//! [`Console`] is the conductor of the admin console. It owns the pieces every screen shares and
//! hands out per-entity objects built on top of them:
//!
//! 1. **Transport** - `reqwest` against the configured API ([`Console::connect`]) or the
//!    in-process backend actor ([`Console::in_process`]).
//! 2. **Session** - one [`Session`] and one [`SessionClient`], so a 401 on any screen triggers a
//!    single redirect.
//! 3. **Screens** - [`Console::screen`] builds a [`ResourceListController`] for any entity in
//!    [`crate::model`].
//! 4. **Selectors** - [`Console::multi_selector`] and [`Console::single_selector`] build relation
//!    pickers whose changes land directly in a screen's open draft.
//!
//! ## Startup
//!
//! ```rust,ignore
//! let console = Console::connect(ConsoleConfig::from_env()?, navigator)?;
//! console.bootstrap().await;          // probe the session, guard the current view
//! console.login("root", "secret").await?;
//! let users = console.screen::<User>();
//! users.mount().await?;
//! ```
//!
//! ## Shutdown
//!
//! With the in-process backend, [`Console::shutdown`] waits for the backend task. The task ends
//! once every handle to it is gone, so drop screens, gateways and selectors first.

use console_framework::backend::{BackendActor, BackendHandle};
use console_framework::{
    Access, AuthError, ConfigError, ConsoleConfig, ConsoleError, Credentials, GatewayError,
    MultiRelationSelector, Navigator, ReqwestTransport, Resource, ResourceGateway, ResourceId,
    ResourceListController, RouteGuard, Session, SessionClient, SingleRelationSelector,
    Transport,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Anything that can stop the console binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Transport setup failed: {0}")]
    Transport(#[from] GatewayError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Screen error: {0}")]
    Screen(#[from] ConsoleError),

    #[error("Backend task failed: {0}")]
    Backend(String),
}

pub struct Console {
    config: ConsoleConfig,
    client: Arc<SessionClient>,
    navigator: Arc<dyn Navigator>,
    backend: Option<JoinHandle<()>>,
}

impl Console {
    /// Wires a console over any transport.
    pub fn new(
        config: ConsoleConfig,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let client = Arc::new(SessionClient::new(
            transport,
            Arc::new(Session::new()),
            navigator.clone(),
            &config,
        ));
        Self {
            config,
            client,
            navigator,
            backend: None,
        }
    }

    /// Talks to the REST API at `config.api_base_url`.
    pub fn connect(config: ConsoleConfig, navigator: Arc<dyn Navigator>) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(&config)?;
        info!(api = %config.api_base_url, "Connecting to API");
        Ok(Self::new(config, Arc::new(transport), navigator))
    }

    /// Starts the in-process backend and wires a console to it.
    ///
    /// The returned handle seeds fixtures and simulates session expiry.
    pub fn in_process(
        config: ConsoleConfig,
        navigator: Arc<dyn Navigator>,
        username: &str,
        password: &str,
    ) -> (Self, BackendHandle) {
        let (backend, handle) = BackendActor::new(username, password, 64);
        let task = tokio::spawn(backend.run());
        info!("In-process backend started");

        let mut console = Self::new(config, Arc::new(handle.clone()), navigator);
        console.backend = Some(task);
        (console, handle)
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<SessionClient> {
        &self.client
    }

    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }

    pub fn route_guard(&self) -> RouteGuard {
        RouteGuard::new(self.session().clone(), &self.config)
    }

    /// Probes the session once and applies the view guard to the current path.
    pub async fn bootstrap(&self) -> Access {
        let authenticated = self.client.probe_session().await;
        let current = self.navigator.current_path();
        let access = self.route_guard().check(&current);
        if let Access::Redirect(target) = &access {
            self.navigator.navigate(target);
        }
        info!(authenticated, path = %current, ?access, "Console bootstrapped");
        access
    }

    /// Signs in and leaves the login view.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.client
            .login(&Credentials::new(username, password))
            .await?;
        if let Access::Redirect(target) = self.route_guard().check(&self.navigator.current_path()) {
            self.navigator.navigate(&target);
        }
        Ok(())
    }

    pub async fn logout(&self) {
        self.client.logout().await;
    }

    pub fn gateway<T: Resource>(&self) -> ResourceGateway<T> {
        ResourceGateway::new(self.client.clone())
    }

    /// A browsing screen with the configured page size.
    pub fn screen<T: Resource>(&self) -> ResourceListController<T> {
        ResourceListController::new(self.gateway(), self.config.page_size)
    }

    /// A to-many picker over `T` whose selection is written into `screen`'s open draft.
    ///
    /// ```rust,ignore
    /// let kits = console.multi_selector::<Kit, _, _>(&items, vec![], |draft, ids| {
    ///     draft.kit_ids = Field::Value(ids);
    /// });
    /// ```
    pub fn multi_selector<T, R, F>(
        &self,
        screen: &Arc<ResourceListController<R>>,
        initial: Vec<ResourceId>,
        write: F,
    ) -> MultiRelationSelector<T>
    where
        T: Resource,
        R: Resource,
        F: Fn(&mut R::Patch, Vec<ResourceId>) + Send + 'static,
    {
        let screen = screen.clone();
        MultiRelationSelector::new(
            self.gateway(),
            self.config.candidate_limit,
            initial,
            move |ids| {
                screen.update_draft(|draft| write(draft, ids.to_vec()));
            },
        )
    }

    /// A to-one picker over `T` whose selection is written into `screen`'s open draft.
    pub fn single_selector<T, R, F>(
        &self,
        screen: &Arc<ResourceListController<R>>,
        initial: Option<ResourceId>,
        write: F,
    ) -> SingleRelationSelector<T>
    where
        T: Resource,
        R: Resource,
        F: Fn(&mut R::Patch, Option<ResourceId>) + Send + 'static,
    {
        let screen = screen.clone();
        SingleRelationSelector::new(
            self.gateway(),
            self.config.candidate_limit,
            initial,
            move |id| {
                screen.update_draft(|draft| write(draft, id));
            },
        )
    }

    /// Drops the shared client and waits for the in-process backend, if any, to stop.
    pub async fn shutdown(self) -> Result<(), AppError> {
        info!("Shutting down console...");
        drop(self.client);

        if let Some(task) = self.backend {
            if let Err(e) = task.await {
                error!("Backend task failed: {:?}", e);
                return Err(AppError::Backend(e.to_string()));
            }
        }
        info!("Console shutdown complete.");
        Ok(())
    }
}
