//! An in-memory [`Platform`] for tests and non-browser hosts.
//!
//! `MemoryPlatform` keeps a history stack with a cursor, the way a browser
//! tab does: pushing truncates forward entries, back/forward move the cursor
//! and queue a [`PopStateEvent`] for the host to deliver to the router. It also
//! models a scrollable document with positioned elements, and records every
//! side effect in an operation log so tests can assert ordering.
//!
//! ```
//! use spa_navigator::{MemoryPlatform, Platform};
//! use serde_json::json;
//!
//! let platform = MemoryPlatform::new("/");
//! platform.push_state(json!({ "blockPageScroll": false }), "/about");
//! assert_eq!(platform.location(), "/about");
//!
//! platform.history_back();
//! assert_eq!(platform.location(), "/");
//! assert!(platform.take_pop_event().is_some());
//! ```

use crate::history::ScrollPosition;
use crate::platform::{ElementRect, Platform, PopStateEvent, Viewport};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

/// A side effect performed on the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformOp {
    Push { url: String },
    Replace { url: String },
    Back,
    ScrollTo(ScrollPosition),
    BlockPageScroll(bool),
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    url: String,
    state: Option<Value>,
}

/// History stack, document and viewport held in memory.
#[derive(Debug)]
pub struct MemoryPlatform {
    entries: RefCell<Vec<MemoryEntry>>,
    current: Cell<usize>,
    pending: RefCell<VecDeque<PopStateEvent>>,
    scroll: Cell<ScrollPosition>,
    /// Element rectangles in document coordinates.
    elements: RefCell<HashMap<String, ElementRect>>,
    viewport: Cell<Viewport>,
    page_scroll_blocked: Cell<bool>,
    manual_restoration: Cell<bool>,
    operations: RefCell<Vec<PlatformOp>>,
}

impl MemoryPlatform {
    /// A fresh tab that loaded `url` (no history state yet).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            entries: RefCell::new(vec![MemoryEntry {
                url: url.into(),
                state: None,
            }]),
            current: Cell::new(0),
            pending: RefCell::new(VecDeque::new()),
            scroll: Cell::new(ScrollPosition::ORIGIN),
            elements: RefCell::new(HashMap::new()),
            viewport: Cell::new(Viewport {
                width: 1024.0,
                height: 768.0,
            }),
            page_scroll_blocked: Cell::new(false),
            manual_restoration: Cell::new(false),
            operations: RefCell::new(Vec::new()),
        }
    }

    /// Move the cursor by `delta` like the browser's back/forward buttons.
    ///
    /// Returns `false` (and queues nothing) when the move would leave the
    /// stack.
    pub fn go(&self, delta: isize) -> bool {
        let len = self.entries.borrow().len();
        let Some(target) = self.current.get().checked_add_signed(delta) else {
            return false;
        };
        if target >= len {
            return false;
        }

        self.current.set(target);
        let state = self.entries.borrow()[target].state.clone();
        self.pending.borrow_mut().push_back(PopStateEvent::new(state));
        true
    }

    /// Simulate clicking an in-page `#fragment` link: a new entry without
    /// state and a stateless back/forward event.
    pub fn follow_hash(&self, fragment: &str) {
        let base = self.location();
        let base = base.split('#').next().unwrap_or_default();
        self.push_entry(format!("{base}#{fragment}"), None);
        self.pending.borrow_mut().push_back(PopStateEvent::new(None));
    }

    /// Next queued back/forward event.
    pub fn take_pop_event(&self) -> Option<PopStateEvent> {
        self.pending.borrow_mut().pop_front()
    }

    /// Place an element at document coordinates.
    pub fn add_element(&self, id: impl Into<String>, rect: ElementRect) {
        self.elements.borrow_mut().insert(id.into(), rect);
    }

    pub fn remove_element(&self, id: &str) {
        self.elements.borrow_mut().remove(id);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    /// Scroll as the user would, without recording an operation.
    pub fn user_scroll(&self, position: ScrollPosition) {
        self.scroll.set(position);
    }

    pub fn history_len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn current_index(&self) -> usize {
        self.current.get()
    }

    pub fn url_at(&self, index: usize) -> Option<String> {
        self.entries.borrow().get(index).map(|entry| entry.url.clone())
    }

    pub fn state_at(&self, index: usize) -> Option<Value> {
        self.entries
            .borrow()
            .get(index)
            .and_then(|entry| entry.state.clone())
    }

    pub fn is_page_scroll_blocked(&self) -> bool {
        self.page_scroll_blocked.get()
    }

    pub fn is_manual_scroll_restoration(&self) -> bool {
        self.manual_restoration.get()
    }

    /// Side effects recorded so far, oldest first.
    pub fn operations(&self) -> Vec<PlatformOp> {
        self.operations.borrow().clone()
    }

    pub fn clear_operations(&self) {
        self.operations.borrow_mut().clear();
    }

    fn record(&self, op: PlatformOp) {
        self.operations.borrow_mut().push(op);
    }

    fn push_entry(&self, url: String, state: Option<Value>) {
        let mut entries = self.entries.borrow_mut();
        // Pushing drops forward history
        entries.truncate(self.current.get() + 1);
        entries.push(MemoryEntry { url, state });
        self.current.set(entries.len() - 1);
    }
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Platform for MemoryPlatform {
    fn location(&self) -> String {
        self.entries.borrow()[self.current.get()].url.clone()
    }

    fn history_state(&self) -> Option<Value> {
        self.entries.borrow()[self.current.get()].state.clone()
    }

    fn push_state(&self, state: Value, url: &str) {
        self.push_entry(url.to_string(), Some(state));
        self.record(PlatformOp::Push {
            url: url.to_string(),
        });
    }

    fn replace_state(&self, state: Option<Value>, url: &str) {
        {
            let mut entries = self.entries.borrow_mut();
            let entry = &mut entries[self.current.get()];
            entry.url = url.to_string();
            entry.state = state;
        }
        self.record(PlatformOp::Replace {
            url: url.to_string(),
        });
    }

    fn history_back(&self) {
        self.record(PlatformOp::Back);
        self.go(-1);
    }

    fn scroll_position(&self) -> ScrollPosition {
        self.scroll.get()
    }

    fn scroll_to(&self, position: ScrollPosition) {
        self.scroll.set(position);
        self.record(PlatformOp::ScrollTo(position));
    }

    fn element_rect(&self, id: &str) -> Option<ElementRect> {
        let scroll = self.scroll.get();
        self.elements.borrow().get(id).map(|rect| ElementRect {
            top: rect.top - scroll.y,
            left: rect.left - scroll.x,
            ..*rect
        })
    }

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn set_page_scroll_blocked(&self, blocked: bool) {
        self.page_scroll_blocked.set(blocked);
        self.record(PlatformOp::BlockPageScroll(blocked));
    }

    fn set_manual_scroll_restoration(&self) {
        self.manual_restoration.set(true);
    }
}
