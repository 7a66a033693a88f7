//! Shared fixtures for router integration tests.

#![allow(dead_code)]

use spa_navigator::*;
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

/// The route tree used throughout the scenarios:
///
/// ```text
/// /                 [Home]
/// /about            [About]
/// /about/modal      [About, Modal]     blocks page scroll
/// /users/:id        [User]
/// /docs             [DocsLayout, DocsIndex]
/// /docs/:section    [DocsLayout, DocsSection]
/// ```
pub fn app_routes() -> Vec<RouteDeclaration> {
    vec![
        RouteDeclaration::new("/", "Home"),
        RouteDeclaration::new("/about", "About")
            .meta("title", "About us")
            .child(RouteDeclaration::new("modal", "Modal").block_page_scroll(true)),
        RouteDeclaration::new("/users/:id", "User"),
        RouteDeclaration::new("/docs", "DocsLayout").children(vec![
            RouteDeclaration::new("", "DocsIndex"),
            RouteDeclaration::new(":section", "DocsSection"),
        ]),
    ]
}

pub fn app_config() -> RouterConfig {
    RouterConfig::new(app_routes()).not_found("NotFound")
}

/// A router over a fresh in-memory tab at `url`, not yet initialized.
pub fn router_at(url: &str) -> Router<MemoryPlatform> {
    Router::new(app_config(), MemoryPlatform::new(url))
}

/// An initialized router over a fresh in-memory tab at `url`.
pub fn started_router(url: &str) -> Router<MemoryPlatform> {
    let router = router_at(url);
    pollster::block_on(router.initialize()).expect("initial navigation failed");
    router
}

/// Deliver every queued back/forward event to the router.
pub async fn deliver_pop_events<R: RenderCycle>(
    router: &Router<MemoryPlatform, R>,
) -> Vec<NavigationResult> {
    let mut results = Vec::new();
    while let Some(event) = router.platform().take_pop_event() {
        results.push(router.handle_pop_state(event).await);
    }
    results
}

/// Component keys of the published route, outermost first.
pub fn component_keys(router: &Router<impl Platform, impl RenderCycle>) -> Vec<String> {
    router
        .current_route()
        .get()
        .map(|route| {
            route
                .components()
                .iter()
                .map(|component| component.key().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Element rectangle in document coordinates.
pub fn rect_at(top: f64) -> ElementRect {
    ElementRect {
        top,
        left: 0.0,
        width: 100.0,
        height: 40.0,
    }
}

/// The history entry stored at `index` of the in-memory stack.
pub fn entry_at(platform: &MemoryPlatform, index: usize) -> Option<HistoryEntry> {
    platform
        .state_at(index)
        .as_ref()
        .and_then(HistoryEntry::from_state)
}

/// A render cycle that counts ticks and yields once per tick.
#[derive(Debug, Default, Clone)]
pub struct CountingTick {
    pub ticks: Rc<Cell<usize>>,
}

impl RenderCycle for CountingTick {
    fn tick(&self) -> impl Future<Output = ()> {
        self.ticks.set(self.ticks.get() + 1);
        spa_navigator::platform::YieldOnce::new()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
