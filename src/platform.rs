//! The contracts the router needs from its host.
//!
//! - [`Platform`]: the browser-like environment: location, native history,
//!   document scrolling and element geometry. [`MemoryPlatform`] implements it
//!   in memory; `WebPlatform` (feature `web`) implements it with `web-sys`.
//! - [`RenderCycle`]: lets the router wait until the UI has processed the
//!   state it just published before it touches scroll.
//!
//! All methods take `&self`. Implementations are single-threaded and use
//! interior mutability where they need it.
//!
//! [`MemoryPlatform`]: crate::memory::MemoryPlatform

use crate::history::ScrollPosition;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Position and size of an element relative to the viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// A back/forward event as delivered by the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopStateEvent {
    /// State payload of the entry the platform moved to.
    pub state: Option<Value>,
}

impl PopStateEvent {
    pub fn new(state: Option<Value>) -> Self {
        Self { state }
    }
}

/// The browser-facing side of the router.
pub trait Platform {
    /// Current location without the origin: path, query and fragment.
    fn location(&self) -> String;

    /// State payload of the active history entry.
    fn history_state(&self) -> Option<Value>;

    /// Add a history entry and move to it.
    fn push_state(&self, state: Value, url: &str);

    /// Overwrite the active history entry without navigating.
    fn replace_state(&self, state: Option<Value>, url: &str);

    /// Ask the platform to go back one entry. The resulting back/forward event
    /// is delivered asynchronously.
    fn history_back(&self);

    fn scroll_position(&self) -> ScrollPosition;

    fn scroll_to(&self, position: ScrollPosition);

    /// Bounding rectangle of the element with this id, if it exists.
    fn element_rect(&self, id: &str) -> Option<ElementRect>;

    fn viewport(&self) -> Viewport;

    /// Lock or unlock page scrolling (`overflow: hidden` on the body).
    fn set_page_scroll_blocked(&self, blocked: bool);

    /// Turn off the platform's own scroll restoration.
    fn set_manual_scroll_restoration(&self);
}

/// One UI update cycle of the rendering layer.
pub trait RenderCycle {
    /// Resolves once every consumer of the last published state has updated.
    fn tick(&self) -> impl Future<Output = ()>;
}

/// A [`RenderCycle`] that yields to the executor exactly once.
///
/// Suits renderers that update synchronously inside store subscriptions and
/// only need queued work to run before scrolling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextTick;

impl RenderCycle for NextTick {
    fn tick(&self) -> impl Future<Output = ()> {
        YieldOnce { yielded: false }
    }
}

/// Returns `Pending` once, waking itself, then `Ready`.
#[derive(Debug)]
pub struct YieldOnce {
    yielded: bool,
}

impl YieldOnce {
    pub fn new() -> Self {
        Self { yielded: false }
    }
}

impl Default for YieldOnce {
    fn default() -> Self {
        Self::new()
    }
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tick_completes() {
        pollster::block_on(NextTick.tick());
    }

    #[test]
    fn test_yield_once_is_pending_first() {
        use std::sync::Arc;
        use std::task::Wake;

        struct Noop;
        impl Wake for Noop {
            fn wake(self: Arc<Self>) {}
        }

        let waker = Arc::new(Noop).into();
        let mut cx = Context::from_waker(&waker);
        let mut future = YieldOnce::new();
        assert!(Pin::new(&mut future).poll(&mut cx).is_pending());
        assert!(Pin::new(&mut future).poll(&mut cx).is_ready());
    }
}
