//! # Console Framework
//!
//! This crate is the reusable core of an administrative console for a game backend. Every
//! screen of the console (users, clans, wars, shop items, ...) browses, searches, creates,
//! edits and deletes records of one entity behind a REST API. The screens differ only in
//! their columns; the behavior is written once here, generic over the entity.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into four layers, leaves first:
//!
//! 1. **Transport Layer** ([`Transport`]) - moves requests; production HTTP via `reqwest`,
//!    an in-process [`backend`] actor, or a scripted [`mock`].
//! 2. **Session Layer** ([`SessionClient`]) - credentials, status classification and the
//!    single login redirect when the session expires.
//! 3. **Gateway Layer** ([`ResourceGateway`]) - `list`/`get_by_id`/`create`/`update`/`delete`
//!    for one [`Resource`], JSON or multipart.
//! 4. **Screen Layer** ([`ResourceListController`], [`MultiRelationSelector`],
//!    [`SingleRelationSelector`]) - the browsing state machine and the relation pickers
//!    embedded in its edit form.
//!
//! ## Core Abstractions
//!
//! ### [`Resource`] - The Entity Contract
//!
//! ```rust
//! use console_framework::{Field, Resource, ResourceId};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Deserialize)]
//! struct Kit {
//!     id: ResourceId,
//!     name: String,
//! }
//!
//! #[derive(Debug, Clone, Default, Serialize)]
//! struct KitPatch {
//!     #[serde(default, skip_serializing_if = "Field::is_absent")]
//!     name: Field<String>,
//! }
//!
//! impl Resource for Kit {
//!     type Patch = KitPatch;
//!     const COLLECTION: &'static str = "kits";
//!
//!     fn id(&self) -> ResourceId {
//!         self.id
//!     }
//!
//!     fn to_draft(&self) -> KitPatch {
//!         KitPatch { name: Field::Value(self.name.clone()) }
//!     }
//! }
//! ```
//!
//! ### Wiring a Screen
//!
//! ```rust
//! # use console_framework::{Field, Resource, ResourceId};
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Debug, Clone, Deserialize)] struct Kit { id: ResourceId }
//! # #[derive(Debug, Clone, Default, Serialize)] struct KitPatch {}
//! # impl Resource for Kit {
//! #     type Patch = KitPatch;
//! #     const COLLECTION: &'static str = "kits";
//! #     fn id(&self) -> ResourceId { self.id }
//! #     fn to_draft(&self) -> KitPatch { KitPatch {} }
//! # }
//! use console_framework::backend::BackendActor;
//! use console_framework::{
//!     ConsoleConfig, Credentials, MemoryNavigator, ResourceGateway, ResourceListController,
//!     Session, SessionClient,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ConsoleConfig::default();
//!     let (backend, transport) = BackendActor::new("root", "secret", 32);
//!     tokio::spawn(backend.run());
//!
//!     let client = Arc::new(SessionClient::new(
//!         Arc::new(transport),
//!         Arc::new(Session::new()),
//!         Arc::new(MemoryNavigator::new("/login")),
//!         &config,
//!     ));
//!     client.login(&Credentials::new("root", "secret")).await.unwrap();
//!
//!     let screen = ResourceListController::new(ResourceGateway::<Kit>::new(client), 10);
//!     screen.mount().await.unwrap();
//!     assert_eq!(screen.view().total_pages, 1);
//! }
//! ```
//!
//! ## Error Handling
//!
//! Gateways fail with [`GatewayError`]; screens store [`ConsoleError`], which adds client-side
//! validation. A 401 never becomes a banner: the session client has already redirected.
//!
//! ## Concurrency Model
//!
//! - Every network call is an `async fn`; nothing blocks.
//! - Controller operations take `&self` and may overlap; only the newest fetch is applied.
//! - The [`Session`] flags are atomics shared by `Arc`.
//!
//! ## Testing
//!
//! [`mock::MockTransport`] scripts responses (with delays, for races);
//! [`backend::BackendActor`] runs the full REST contract in-process.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod field;
pub mod gateway;
pub mod mock;
pub mod resource;
pub mod selector;
pub mod session;
pub mod tracing;
pub mod transport;

// Re-export core types for convenience
pub use config::ConsoleConfig;
pub use controller::{
    BrowseState, BrowseView, Editor, EditorMode, ResourceListController, RowView, ViewMode,
};
pub use error::{AuthError, ConfigError, ConsoleError, ErrorKind, GatewayError};
pub use field::Field;
pub use gateway::{Attachment, ResourceGateway};
pub use resource::{Page, Pagination, Resource, ResourceId};
pub use selector::{
    CandidateSet, Chip, MultiRelationSelector, SelectionSet, SingleRelationSelector,
};
pub use session::{Access, Credentials, MemoryNavigator, Navigator, RouteGuard, Session, SessionClient};
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
