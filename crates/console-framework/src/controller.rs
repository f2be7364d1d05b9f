//! # Resource List Controller
//!
//! `ResourceListController<T>` is the state machine behind every browsing screen. It owns the
//! screen's [`BrowseState`], the draft of an open create/edit form ([`Editor`]) and a pending
//! delete confirmation, and drives a [`ResourceGateway<T>`] to keep them current.
//!
//! ## States
//!
//! | State | Rendered from |
//! |-------|---------------|
//! | Listing | the loaded [`Page`] |
//! | SingleLookup | a one-row (found) or zero-row (404) page |
//! | Loading | overlays either of the above while a fetch is in flight |
//! | Error | table cleared, [`BrowseState::error`] set |
//!
//! ## Stale responses
//!
//! Users click faster than the backend answers. Every fetch takes a ticket from a monotonically
//! increasing counter; when it completes, its result is applied only if no newer fetch was issued
//! in the meantime. A slow page-1 response arriving after a fast page-2 response is dropped.
//!
//! ## Mutations
//!
//! Create, edit and delete re-run the active view (same page, same lookup) when they succeed.
//! A failed save keeps the editor open with its draft intact and the error attached to it.
//! Guarded rows are refused before any request is built.
//!
//! ## Concurrency
//!
//! All operations take `&self`, so a screen can fire several of them concurrently from one task
//! (or share the controller behind an `Arc`). State sits behind a mutex that is never held
//! across an `.await`.

use crate::error::{ConsoleError, GatewayError};
use crate::gateway::{Attachment, ResourceGateway};
use crate::resource::{Page, Pagination, Resource, ResourceId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Listing,
    SingleLookup(ResourceId),
}

/// What a browsing screen currently shows.
#[derive(Debug, Clone)]
pub struct BrowseState<T> {
    pub mode: ViewMode,
    /// `None` before the first load and after a failed one.
    pub page: Option<Page<T>>,
    /// The listing page the user last navigated to.
    pub current_page: u32,
    pub query: String,
    pub loading: bool,
    pub error: Option<ConsoleError>,
}

impl<T> Default for BrowseState<T> {
    fn default() -> Self {
        Self {
            mode: ViewMode::Listing,
            page: None,
            current_page: 1,
            query: String::new(),
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(ResourceId),
}

/// An open create/edit form.
#[derive(Debug, Clone)]
pub struct Editor<T: Resource> {
    pub mode: EditorMode,
    pub draft: T::Patch,
    pub attachments: Vec<Attachment>,
    pub error: Option<ConsoleError>,
    /// A submit is in flight; further submits are ignored.
    pub saving: bool,
}

impl<T: Resource> Editor<T> {
    fn new(mode: EditorMode, draft: T::Patch) -> Self {
        Self {
            mode,
            draft,
            attachments: Vec::new(),
            error: None,
            saving: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowView<T> {
    pub record: T,
    pub can_edit: bool,
    pub can_delete: bool,
}

/// Everything a presentation layer needs to draw the screen.
#[derive(Debug, Clone)]
pub struct BrowseView<T: Resource> {
    pub mode: ViewMode,
    pub rows: Vec<RowView<T>>,
    pub total: u64,
    pub page_number: u32,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub editor: Option<Editor<T>>,
    pub pending_delete: Option<ResourceId>,
}

struct ControllerState<T: Resource> {
    browse: BrowseState<T>,
    /// Mode of the most recently issued fetch; `browse.mode` lags behind it while loading.
    requested: ViewMode,
    editor: Option<Editor<T>>,
    pending_delete: Option<ResourceId>,
}

pub struct ResourceListController<T: Resource> {
    gateway: ResourceGateway<T>,
    page_size: u32,
    state: Mutex<ControllerState<T>>,
    fetch_seq: AtomicU64,
}

/// Parses a search query as a record id.
pub fn parse_lookup_id(query: &str) -> Option<ResourceId> {
    query.trim().parse::<ResourceId>().ok()
}

impl<T: Resource> ResourceListController<T> {
    pub fn new(gateway: ResourceGateway<T>, page_size: u32) -> Self {
        Self {
            gateway,
            page_size: page_size.max(1),
            state: Mutex::new(ControllerState {
                browse: BrowseState::default(),
                requested: ViewMode::Listing,
                editor: None,
                pending_delete: None,
            }),
            fetch_seq: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// A copy of the raw browse state.
    pub fn browse_state(&self) -> BrowseState<T> {
        self.state().browse.clone()
    }

    pub fn view(&self) -> BrowseView<T> {
        let state = self.state();
        let browse = &state.browse;
        let paginating = browse.mode == ViewMode::Listing && browse.query.trim().is_empty();

        let (rows, total, page_number, total_pages) = match &browse.page {
            Some(page) => (
                page.items
                    .iter()
                    .map(|record| RowView {
                        record: record.clone(),
                        can_edit: !record.is_guarded(),
                        can_delete: !record.is_guarded(),
                    })
                    .collect(),
                page.total,
                page.page_number,
                page.total_pages(),
            ),
            None => (Vec::new(), 0, browse.current_page, 1),
        };

        BrowseView {
            mode: browse.mode,
            rows,
            total,
            page_number,
            total_pages,
            has_prev: paginating && page_number > 1,
            has_next: paginating && page_number < total_pages,
            query: browse.query.clone(),
            loading: browse.loading,
            error: browse
                .error
                .as_ref()
                .filter(|e| e.is_displayable())
                .map(ConsoleError::message),
            editor: state.editor.clone(),
            pending_delete: state.pending_delete,
        }
    }

    // --- Fetching ---

    fn begin_fetch(&self, requested: ViewMode, page: Option<u32>) -> u64 {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state();
        state.requested = requested;
        if let Some(page) = page {
            state.browse.current_page = page;
        }
        state.browse.loading = true;
        seq
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.fetch_seq.load(Ordering::SeqCst) == seq
    }

    fn apply_failure(browse: &mut BrowseState<T>, mode: ViewMode, error: GatewayError) -> ConsoleError {
        let error = ConsoleError::from(error);
        browse.loading = false;
        if error.is_displayable() {
            browse.mode = mode;
            browse.page = None;
            browse.error = Some(error.clone());
        }
        error
    }

    /// Fetches one listing page. Returns the last valid page when `number` overshot it.
    async fn fetch_page(&self, number: u32) -> Result<Option<u32>, ConsoleError> {
        let seq = self.begin_fetch(ViewMode::Listing, Some(number));
        let result = self
            .gateway
            .list(Pagination::new(number, self.page_size))
            .await;

        let mut state = self.state();
        if !self.is_latest(seq) {
            debug!(collection = T::COLLECTION, seq, page = number, "Discarding stale page");
            return Ok(None);
        }
        let browse = &mut state.browse;
        match result {
            Ok(page) => {
                let last = page.total_pages();
                let overshot = page.items.is_empty() && page.total > 0 && number > last;
                browse.loading = false;
                browse.mode = ViewMode::Listing;
                browse.error = None;
                browse.page = Some(page);
                Ok(overshot.then_some(last))
            }
            Err(e) => Err(Self::apply_failure(browse, ViewMode::Listing, e)),
        }
    }

    async fn load_page(&self, number: u32) -> Result<(), ConsoleError> {
        let mut target = number;
        while let Some(last) = self.fetch_page(target).await? {
            debug!(collection = T::COLLECTION, requested = target, last, "Page out of range");
            target = last;
        }
        Ok(())
    }

    async fn load_lookup(&self, id: ResourceId) -> Result<(), ConsoleError> {
        let mode = ViewMode::SingleLookup(id);
        let seq = self.begin_fetch(mode, None);
        let result = self.gateway.get_by_id(id).await;

        let mut state = self.state();
        if !self.is_latest(seq) {
            debug!(collection = T::COLLECTION, seq, id, "Discarding stale lookup");
            return Ok(());
        }
        let page_size = self.page_size;
        let browse = &mut state.browse;
        let found = match result {
            Ok(record) => vec![record],
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(Self::apply_failure(browse, mode, e)),
        };
        browse.loading = false;
        browse.mode = mode;
        browse.error = None;
        browse.page = Some(Page {
            total: found.len() as u64,
            items: found,
            page_number: 1,
            page_size,
        });
        Ok(())
    }

    // --- Navigation ---

    /// Initial load: listing, page 1.
    pub async fn mount(&self) -> Result<(), ConsoleError> {
        self.load_page(1).await
    }

    /// Re-runs whichever view was last requested.
    pub async fn reload(&self) -> Result<(), ConsoleError> {
        let (requested, page) = {
            let state = self.state();
            (state.requested, state.browse.current_page)
        };
        match requested {
            ViewMode::Listing => self.load_page(page).await,
            ViewMode::SingleLookup(id) => self.load_lookup(id).await,
        }
    }

    /// Moves to another listing page, clamped to the known bounds.
    ///
    /// Returns `Ok(false)` without a request when paging is not possible: a search is active,
    /// a lookup is shown, or the clamped target is already the current page.
    pub async fn go_to_page(&self, number: u32) -> Result<bool, ConsoleError> {
        let target = {
            let state = self.state();
            let browse = &state.browse;
            if state.requested != ViewMode::Listing || !browse.query.trim().is_empty() {
                return Ok(false);
            }
            let last = browse
                .page
                .as_ref()
                .map(Page::total_pages)
                .unwrap_or(browse.current_page);
            let target = number.clamp(1, last.max(1));
            if target == browse.current_page && browse.page.is_some() {
                return Ok(false);
            }
            target
        };
        self.load_page(target).await.map(|_| true)
    }

    pub async fn next_page(&self) -> Result<bool, ConsoleError> {
        let current = self.state().browse.current_page;
        self.go_to_page(current.saturating_add(1)).await
    }

    pub async fn prev_page(&self) -> Result<bool, ConsoleError> {
        let current = self.state().browse.current_page;
        if current <= 1 {
            return Ok(false);
        }
        self.go_to_page(current - 1).await
    }

    /// Updates the search box. Clearing it returns to the listing page the user was on.
    pub async fn set_query(&self, text: &str) -> Result<(), ConsoleError> {
        let back_to_listing = {
            let mut state = self.state();
            state.browse.query = text.to_string();
            if text.trim().is_empty() && state.requested != ViewMode::Listing {
                Some(state.browse.current_page)
            } else {
                None
            }
        };
        match back_to_listing {
            Some(page) => self.load_page(page).await,
            None => Ok(()),
        }
    }

    /// Looks the query up as a record id.
    ///
    /// A query that is not an integer issues no request; a shown lookup falls back to the
    /// listing.
    pub async fn submit_search(&self) -> Result<(), ConsoleError> {
        let (query, requested, page) = {
            let state = self.state();
            (
                state.browse.query.clone(),
                state.requested,
                state.browse.current_page,
            )
        };
        match parse_lookup_id(&query) {
            Some(id) => self.load_lookup(id).await,
            None if requested != ViewMode::Listing => self.load_page(page).await,
            None => {
                debug!(collection = T::COLLECTION, %query, "Ignoring non-numeric search");
                Ok(())
            }
        }
    }

    /// Clears the search and goes back to page 1.
    pub async fn reset(&self) -> Result<(), ConsoleError> {
        self.state().browse.query.clear();
        self.load_page(1).await
    }

    pub fn dismiss_error(&self) {
        self.state().browse.error = None;
    }

    fn reject(&self, message: String) -> ConsoleError {
        warn!(collection = T::COLLECTION, %message, "Rejected");
        let error = ConsoleError::Validation(message);
        self.state().browse.error = Some(error.clone());
        error
    }

    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.reload().await {
            debug!(collection = T::COLLECTION, error = %e, "Reload after mutation failed");
        }
    }

    // --- Editor ---

    /// Opens the create form seeded with the entity's defaults.
    pub fn open_create(&self) {
        self.state().editor = Some(Editor::new(EditorMode::Create, T::draft_defaults()));
    }

    /// Opens the edit form seeded with the record's current values.
    pub fn open_edit(&self, record: &T) -> Result<(), ConsoleError> {
        if record.is_guarded() {
            return Err(self.reject(record.guard_message()));
        }
        self.state().editor = Some(Editor::new(EditorMode::Edit(record.id()), record.to_draft()));
        Ok(())
    }

    /// Mutates the open draft. Returns `false` when no editor is open.
    pub fn update_draft<F>(&self, edit: F) -> bool
    where
        F: FnOnce(&mut T::Patch),
    {
        match self.state().editor.as_mut() {
            Some(editor) => {
                edit(&mut editor.draft);
                true
            }
            None => false,
        }
    }

    pub fn attach(&self, attachment: Attachment) -> bool {
        match self.state().editor.as_mut() {
            Some(editor) => {
                editor.attachments.retain(|a| a.field != attachment.field);
                editor.attachments.push(attachment);
                true
            }
            None => false,
        }
    }

    /// Closes the editor and discards its draft.
    pub fn cancel_editor(&self) {
        self.state().editor = None;
    }

    /// Saves the open draft.
    ///
    /// On success the editor closes and the active view reloads; `Ok(false)` means a save was
    /// already in flight and this call did nothing. On failure the editor stays open with the
    /// draft and the error.
    pub async fn submit_editor(&self) -> Result<bool, ConsoleError> {
        let (mode, draft, attachments) = {
            let mut state = self.state();
            let Some(editor) = state.editor.as_mut() else {
                return Err(ConsoleError::Validation("No form is open".to_string()));
            };
            if editor.saving {
                debug!(collection = T::COLLECTION, "Save already in flight");
                return Ok(false);
            }
            editor.saving = true;
            editor.error = None;
            (editor.mode, editor.draft.clone(), editor.attachments.clone())
        };

        let result = match mode {
            EditorMode::Create => self.gateway.create(&draft, &attachments).await,
            EditorMode::Edit(id) => self.gateway.update(id, &draft, &attachments).await,
        };

        match result {
            Ok(record) => {
                self.state().editor = None;
                info!(collection = T::COLLECTION, id = record.id(), ?mode, "Saved");
                self.refresh_after_mutation().await;
                Ok(true)
            }
            Err(e) => {
                let error = ConsoleError::from(e);
                if let Some(editor) = self.state().editor.as_mut() {
                    editor.saving = false;
                    if error.is_displayable() {
                        editor.error = Some(error.clone());
                    }
                }
                Err(error)
            }
        }
    }

    // --- Delete ---

    /// First step of a delete: asks for confirmation.
    pub fn request_delete(&self, record: &T) -> Result<(), ConsoleError> {
        if record.is_guarded() {
            return Err(self.reject(record.guard_message()));
        }
        self.state().pending_delete = Some(record.id());
        Ok(())
    }

    pub fn cancel_delete(&self) {
        self.state().pending_delete = None;
    }

    /// Second step of a delete: the user said yes.
    ///
    /// Returns `Ok(false)` when nothing was awaiting confirmation.
    pub async fn confirm_delete(&self) -> Result<bool, ConsoleError> {
        let Some(id) = self.state().pending_delete.take() else {
            return Ok(false);
        };
        match self.gateway.delete(id).await {
            Ok(()) => {
                self.refresh_after_mutation().await;
                Ok(true)
            }
            Err(e) => {
                let error = ConsoleError::from(e);
                if error.is_displayable() {
                    self.state().browse.error = Some(error.clone());
                }
                Err(error)
            }
        }
    }
}
