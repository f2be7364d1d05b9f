//! # Resource Trait
//!
//! The `Resource` trait is the contract every entity browsed by the console (User, Clan, ShopItem,
//! ...) implements. It is the only per-entity code the generic [`ResourceGateway`] and
//! [`ResourceListController`] need: where the records live, how to read their identity, which
//! draft a fresh "create" form starts from and which rows are protected.
//!
//! # Architecture Note
//! Every admin screen is the same state machine with different columns. By putting the
//! per-entity knowledge behind associated items (`type Patch`, `const COLLECTION`) the machine is
//! written *once*. A `User` screen can only be handed a `UserPatch`; the compiler rejects a
//! `KitPatch`.
//!
//! # Provided Methods
//! - [`Resource::is_guarded`] - defaults to `false`.
//! - [`Resource::guard_message`] - the text shown when a guarded row is edited or deleted.
//! - [`Resource::draft_defaults`] - defaults to `Patch::default()` (every field absent).
//!
//! [`ResourceGateway`]: crate::ResourceGateway
//! [`ResourceListController`]: crate::ResourceListController

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Integer identity shared by every backend record.
pub type ResourceId = i64;

pub trait Resource: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    /// Partial representation used for create and update requests.
    ///
    /// Fields are [`Field`](crate::Field)s so "leave alone" and "clear" stay distinct.
    type Patch: Clone + Debug + Default + Serialize + Send + Sync + 'static;

    /// Collection segment of the REST routes, e.g. `"shop-items"` for `/shop-items/:id`.
    const COLLECTION: &'static str;

    fn id(&self) -> ResourceId;

    /// Protected rows cannot be edited or deleted from the console.
    fn is_guarded(&self) -> bool {
        false
    }

    fn guard_message(&self) -> String {
        format!("{} #{} is protected and cannot be modified", Self::COLLECTION, self.id())
    }

    /// Draft a "create" form starts from.
    fn draft_defaults() -> Self::Patch {
        Self::Patch::default()
    }

    /// Draft an "edit" form starts from: the record's current values.
    fn to_draft(&self) -> Self::Patch;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn query(&self) -> String {
        format!("page={}&limit={}", self.page, self.limit)
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages for display purposes; `1` when the collection is empty.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }
}

/// `ceil(total / page_size)`, never less than one.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Wire shape of `GET /<collection>?page=&limit=`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> From<ListEnvelope<T>> for Page<T> {
    fn from(envelope: ListEnvelope<T>) -> Self {
        Self {
            items: envelope.data,
            total: envelope.total,
            page_number: envelope.page.max(1),
            page_size: envelope.limit.max(1),
        }
    }
}
