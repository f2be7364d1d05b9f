//! # Game Console
//!
//! The admin console for the game backend, assembled from [`console_framework`]:
//!
//! - **[model]**: the nine backend collections as typed records and patches.
//! - **[lifecycle]**: the [`Console`](lifecycle::Console) that wires transport, session, screens
//!   and relation selectors together.
//!
//! The binary (`src/main.rs`) drives a scripted session against the configured API, or against
//! the in-process backend when `CONSOLE_API_URL` is not set.

pub mod lifecycle;
pub mod model;

pub use lifecycle::{AppError, Console};
