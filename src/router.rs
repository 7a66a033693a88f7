//! The navigation controller.
//!
//! [`Router`] owns the flattened route table, the published UI state and the
//! platform handle, and runs every navigation through the same pipeline:
//!
//! 1. Split the request path into clean path, query and fragment.
//! 2. Match the clean path against the table (not-found on no match).
//! 3. Ask the `on_route_match` hook, if any. A `false` answer aborts with
//!    nothing changed.
//! 4. Capture the scroll offset of the entry being left.
//! 5. Publish the new path and route to the stores.
//! 6. Await one UI update cycle so the new view exists before scrolling.
//! 7. Block or unblock page scrolling for the matched route.
//! 8. Scroll to the requested element, or to the origin.
//! 9. Push or replace the native history entry.
//!
//! Back/forward events re-run steps 1-2 and 5-7, then restore the scroll
//! offset remembered in the history entry.
//!
//! # Overlapping navigations
//!
//! The latest navigation wins. Each navigation takes an id when it starts; if
//! a newer one started while it was awaiting the render tick, it returns
//! [`NavigationOutcome::Superseded`] without touching scroll or history.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{MemoryPlatform, RouteDeclaration, Router, RouterConfig};
//!
//! let config = RouterConfig::new(vec![
//!     RouteDeclaration::new("/", "Home"),
//!     RouteDeclaration::new("/users/:id", "User"),
//! ])
//! .not_found("NotFound");
//!
//! let router = Router::new(config, MemoryPlatform::new("/"));
//! pollster::block_on(async {
//!     router.initialize().await.unwrap();
//!     router.navigate("/users/42?tab=posts").await.unwrap();
//! });
//!
//! let route = router.current_route().get().unwrap();
//! assert_eq!(route.params.get("id"), Some("42"));
//! assert_eq!(route.query.get("tab"), Some("posts"));
//! assert_eq!(router.current_path().get(), "/users/42");
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, MatchCache};
use crate::active::link_is_active;
use crate::error::{NavigationError, NavigationOutcome, NavigationResult};
use crate::flatten::{normalize_route_path, RouteTable};
use crate::history::HistoryEntry;
use crate::matching::{extract_params, find_route};
use crate::params::{split_path, QueryParams, RouteParams, SplitPath};
use crate::platform::{NextTick, Platform, PopStateEvent, RenderCycle};
use crate::route::{ComponentRef, FlatRoute, MatchedRoute, RouteDeclaration};
use crate::scroll::{capture_scroll, restore_scroll, ScrollTarget, ScrollTicket, ScrollTracker};
use crate::store::Store;
use crate::{debug_log, info_log, trace_log, warn_log};
use serde::{Deserialize, Serialize};
#[cfg(feature = "cache")]
use std::cell::RefCell;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

// ============================================================================
// Configuration
// ============================================================================

/// Decides whether a navigation may proceed: `(from, to) -> allowed`.
///
/// `from` is `None` for the very first navigation.
pub type RouteMatchHook = Rc<dyn Fn(Option<&MatchedRoute>, &MatchedRoute) -> bool>;

/// Plain router settings, loadable from JSON.
///
/// ```
/// use spa_navigator::RouterOptions;
///
/// let options: RouterOptions = serde_json::from_str(r#"{ "scrollToTop": false }"#).unwrap();
/// assert!(!options.scroll_to_top);
/// assert!(options.manage_scroll);
/// assert_eq!(options.active_class, "active");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterOptions {
    /// Scroll to the origin after navigations without a scroll target.
    pub scroll_to_top: bool,
    /// Let the router capture, reset and restore scroll at all.
    pub manage_scroll: bool,
    /// Class name handed out by [`Router::link_class`].
    pub active_class: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            scroll_to_top: true,
            manage_scroll: true,
            active_class: "active".to_string(),
        }
    }
}

/// Everything needed to build a [`Router`].
pub struct RouterConfig {
    pub routes: Vec<RouteDeclaration>,
    /// Component stack of the not-found route.
    pub not_found_components: Vec<ComponentRef>,
    pub options: RouterOptions,
    pub on_route_match: Option<RouteMatchHook>,
}

impl RouterConfig {
    pub fn new(routes: Vec<RouteDeclaration>) -> Self {
        Self {
            routes,
            not_found_components: Vec::new(),
            options: RouterOptions::default(),
            on_route_match: None,
        }
    }

    /// Render a single component for unmatched paths.
    pub fn not_found(mut self, component: impl Into<ComponentRef>) -> Self {
        self.not_found_components = vec![component.into()];
        self
    }

    /// Render a component stack for unmatched paths.
    pub fn not_found_components<I, C>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ComponentRef>,
    {
        self.not_found_components = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn options(mut self, options: RouterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn scroll_to_top(mut self, enabled: bool) -> Self {
        self.options.scroll_to_top = enabled;
        self
    }

    pub fn manage_scroll(mut self, enabled: bool) -> Self {
        self.options.manage_scroll = enabled;
        self
    }

    pub fn active_class(mut self, class: impl Into<String>) -> Self {
        self.options.active_class = class.into();
        self
    }

    /// Install the match interception hook.
    pub fn on_route_match<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&MatchedRoute>, &MatchedRoute) -> bool + 'static,
    {
        self.on_route_match = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("routes", &self.routes.len())
            .field("not_found_components", &self.not_found_components)
            .field("options", &self.options)
            .field("on_route_match", &self.on_route_match.is_some())
            .finish()
    }
}

// ============================================================================
// Requests
// ============================================================================

/// A navigation request. Plain strings convert into a default request.
///
/// ```
/// use spa_navigator::NavigateRequest;
///
/// let request = NavigateRequest::new("/docs").scroll_to_id("install").replace();
/// assert_eq!(request.scroll_to_id.as_deref(), Some("install"));
/// assert!(request.replace);
/// assert!(request.add_to_history);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateRequest {
    /// Target path, optionally with query and fragment.
    pub path: String,
    /// Center this element after rendering.
    pub scroll_to_id: Option<String>,
    /// `Some(false)` keeps the current scroll offset; `Some(true)` forces a
    /// reset even when `scroll_to_top` is off.
    pub reset_scroll: Option<bool>,
    /// Replace the active history entry instead of pushing a new one.
    pub replace: bool,
    /// Write a history entry at all.
    pub add_to_history: bool,
}

impl NavigateRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            scroll_to_id: None,
            reset_scroll: None,
            replace: false,
            add_to_history: true,
        }
    }

    pub fn scroll_to_id(mut self, id: impl Into<String>) -> Self {
        self.scroll_to_id = Some(id.into());
        self
    }

    pub fn reset_scroll(mut self, reset: bool) -> Self {
        self.reset_scroll = Some(reset);
        self
    }

    pub fn replace(mut self) -> Self {
        self.replace = true;
        self
    }

    pub fn add_to_history(mut self, add: bool) -> Self {
        self.add_to_history = add;
        self
    }
}

impl From<&str> for NavigateRequest {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for NavigateRequest {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<&String> for NavigateRequest {
    fn from(path: &String) -> Self {
        Self::new(path.as_str())
    }
}

/// Options for [`Router::back`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackOptions {
    /// Navigate here instead when the router is at the first entry it manages.
    pub fallback_path: Option<String>,
}

impl BackOptions {
    pub fn fallback(path: impl Into<String>) -> Self {
        Self {
            fallback_path: Some(path.into()),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Client-side router over a [`Platform`] and a [`RenderCycle`].
pub struct Router<P: Platform, R: RenderCycle = NextTick> {
    table: RouteTable,
    options: RouterOptions,
    on_route_match: Option<RouteMatchHook>,
    platform: P,
    render: R,
    current_route: Store<Option<MatchedRoute>>,
    current_path: Store<String>,
    /// Router-managed history depth of the active entry.
    depth: Cell<usize>,
    navigation_id: Cell<u64>,
    scroll: ScrollTracker,
    #[cfg(feature = "cache")]
    cache: RefCell<MatchCache>,
}

impl<P: Platform> Router<P, NextTick> {
    /// Build a router that waits one executor turn for the UI to update.
    pub fn new(config: RouterConfig, platform: P) -> Self {
        Self::with_render_cycle(config, platform, NextTick)
    }
}

impl<P: Platform, R: RenderCycle> Router<P, R> {
    /// Build a router with a custom UI update signal.
    ///
    /// Flattens the route tree; nothing touches the platform until
    /// [`initialize`](Self::initialize).
    pub fn with_render_cycle(config: RouterConfig, platform: P, render: R) -> Self {
        let table = RouteTable::build(&config.routes, config.not_found_components);
        info_log!("Router created with {} routes", table.len());

        Self {
            table,
            options: config.options,
            on_route_match: config.on_route_match,
            platform,
            render,
            current_route: Store::new(None),
            current_path: Store::new(String::new()),
            depth: Cell::new(0),
            navigation_id: Cell::new(0),
            scroll: ScrollTracker::new(),
            #[cfg(feature = "cache")]
            cache: RefCell::new(MatchCache::new()),
        }
    }

    /// Take over scroll restoration and render the page the platform loaded.
    ///
    /// The loaded entry is not duplicated: the initial navigation skips
    /// history, and the entry is stamped with router state in place. If it
    /// already carries router state (a reload), the depth is taken from it.
    ///
    /// The router does not listen to the platform by itself. In a browser,
    /// register the back/forward and scroll listeners with `web::attach`
    /// before calling this, or use `web::start`, which does both in that
    /// order. Without the listeners, back/forward changes the URL but the
    /// published route stays put.
    pub async fn initialize(&self) -> NavigationResult {
        self.platform.set_manual_scroll_restoration();

        let location = normalize_route_path(&self.platform.location()).into_owned();
        info_log!("Initializing router at '{}'", location);

        let outcome = self
            .navigate(NavigateRequest::new(location.clone()).add_to_history(false))
            .await;

        match self
            .platform
            .history_state()
            .as_ref()
            .and_then(HistoryEntry::from_state)
        {
            Some(entry) => self.depth.set(entry.index),
            None => {
                let block = self
                    .current_route
                    .with(|route| route.as_ref().is_some_and(MatchedRoute::block_page_scroll));
                let entry = HistoryEntry::new(0, block);
                self.platform.replace_state(Some(entry.to_state()), &location);
                self.depth.set(0);
                debug_log!("Stamped initial history entry for '{}'", location);
            }
        }

        outcome
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Resolve a full request path to the route it would publish.
    ///
    /// Never fails: unmatched paths resolve to the not-found route.
    pub fn resolve(&self, full_path: &str) -> MatchedRoute {
        let SplitPath {
            clean_path,
            query,
            fragment,
        } = split_path(full_path);
        let clean_path = normalize_route_path(&clean_path).into_owned();

        let route = self.lookup(&clean_path);
        let params = if route.has_params {
            extract_params(&clean_path, &route.path)
        } else {
            RouteParams::new()
        };

        MatchedRoute {
            route,
            params,
            query,
            fragment,
            clean_path,
            full_path: full_path.to_string(),
        }
    }

    fn route_at(&self, index: Option<usize>) -> Arc<FlatRoute> {
        index
            .and_then(|index| self.table.routes().get(index))
            .unwrap_or_else(|| self.table.not_found())
            .clone()
    }

    #[cfg(feature = "cache")]
    fn lookup(&self, clean_path: &str) -> Arc<FlatRoute> {
        let cached = self.cache.borrow_mut().get(clean_path);
        let index = cached.unwrap_or_else(|| {
            let index = find_route(clean_path, self.table.routes());
            self.cache
                .borrow_mut()
                .insert(clean_path.to_string(), index);
            index
        });
        self.route_at(index)
    }

    #[cfg(not(feature = "cache"))]
    fn lookup(&self, clean_path: &str) -> Arc<FlatRoute> {
        self.route_at(find_route(clean_path, self.table.routes()))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate to a path or a [`NavigateRequest`].
    pub async fn navigate(&self, request: impl Into<NavigateRequest>) -> NavigationResult {
        let mut request = request.into();
        if request.path.is_empty() {
            return Err(NavigationError::InvalidRequest {
                message: "empty path".to_string(),
            });
        }
        request.path = normalize_route_path(&request.path).into_owned();
        let path = request.path.clone();

        let matched = self.resolve(&path);
        info_log!(
            "Navigating to '{}' (route '{}')",
            path,
            matched.path()
        );

        if let Some(hook) = &self.on_route_match {
            let from = self.current_route.get();
            if !hook(from.as_ref(), &matched) {
                warn_log!("Navigation to '{}' rejected by on_route_match", path);
                return Ok(NavigationOutcome::Rejected { path });
            }
        }

        let navigation = self.start_navigation();

        if self.options.manage_scroll && request.add_to_history && !request.replace {
            capture_scroll(&self.platform);
        }

        self.publish(&matched);
        self.render.tick().await;

        if !self.is_navigation_current(navigation) {
            debug_log!("Navigation to '{}' superseded after render", path);
            return Ok(NavigationOutcome::Superseded { path });
        }

        self.apply_page_scroll_block(matched.block_page_scroll());
        let scrolled = self.scroll_after_navigate(&request, &matched);

        if request.add_to_history {
            self.write_history(&request, &matched);
        }

        // History is written first so the URL agrees with the published route
        scrolled?;

        info_log!("Navigation complete: '{}'", path);
        Ok(Self::outcome_for(&matched, path))
    }

    /// Go back one entry, or to `fallback_path` when there is nothing to go
    /// back to.
    pub async fn back(&self, options: BackOptions) -> NavigationResult {
        if let Some(fallback) = options.fallback_path {
            if self.depth.get() == 0 {
                debug_log!("At first entry; navigating to fallback '{}'", fallback);
                return self.navigate(fallback).await;
            }
        }

        if self.options.manage_scroll {
            capture_scroll(&self.platform);
        }
        self.platform.history_back();
        Ok(NavigationOutcome::WentBack)
    }

    /// React to a back/forward event from the platform.
    ///
    /// The platform has already moved, so nothing is written to history.
    pub async fn handle_pop_state(&self, event: PopStateEvent) -> NavigationResult {
        let Some(state) = event.state else {
            trace_log!("Ignoring back/forward event without state");
            return Ok(NavigationOutcome::Ignored);
        };
        let Some(entry) = HistoryEntry::from_state(&state) else {
            warn_log!("Ignoring back/forward event with unknown history state");
            return Ok(NavigationOutcome::UnknownState);
        };

        let location = normalize_route_path(&self.platform.location()).into_owned();
        let matched = self.resolve(&location);
        info_log!(
            "History moved to '{}' (entry #{})",
            location,
            entry.index
        );

        let navigation = self.start_navigation();
        self.depth.set(entry.index);

        self.publish(&matched);
        self.render.tick().await;

        if !self.is_navigation_current(navigation) {
            debug_log!("Restore of '{}' superseded after render", location);
            return Ok(NavigationOutcome::Superseded { path: location });
        }

        self.apply_page_scroll_block(matched.block_page_scroll());

        if self.options.manage_scroll {
            let target = match (entry.scroll_to_id, entry.scroll_position) {
                (Some(id), _) => Some(ScrollTarget::Element(id)),
                (None, Some(position)) => Some(ScrollTarget::Position(position)),
                (None, None) => None,
            };
            if let Some(target) = target {
                debug_log!("Restoring scroll {:?}", target);
                restore_scroll(&self.platform, &target)?;
            }
        }

        Ok(Self::outcome_for(&matched, location))
    }

    // ========================================================================
    // Scroll events
    // ========================================================================

    /// Record a scroll event. Settle the returned ticket after
    /// [`SCROLL_DEBOUNCE`](crate::scroll::SCROLL_DEBOUNCE).
    pub fn on_scroll(&self) -> ScrollTicket {
        self.scroll.on_scroll()
    }

    /// Save the scroll offset if `ticket` belongs to the latest scroll event.
    pub fn settle_scroll(&self, ticket: ScrollTicket) -> bool {
        self.options.manage_scroll && self.scroll.settle(&self.platform, ticket)
    }

    // ========================================================================
    // Query string
    // ========================================================================

    /// Rewrite the current URL's query string in place.
    ///
    /// The active history entry keeps its state; no entry is added. The
    /// published route is updated with the new query.
    pub fn set_query(&self, query: &QueryParams) {
        let path = self.current_path.get();
        let url = if query.is_empty() {
            path
        } else {
            format!("{}?{}", path, query.to_query_string())
        };

        let state = self.platform.history_state();
        self.platform.replace_state(state, &url);
        debug_log!("Query rewritten: '{}'", url);

        if let Some(mut route) = self.current_route.get() {
            route.query = query.clone();
            route.fragment = None;
            route.full_path = url;
            self.current_route.set(Some(route));
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The published route; `None` before the first navigation.
    pub fn current_route(&self) -> &Store<Option<MatchedRoute>> {
        &self.current_route
    }

    /// The published clean path.
    pub fn current_path(&self) -> &Store<String> {
        &self.current_path
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Router-managed depth of the active history entry.
    pub fn history_depth(&self) -> usize {
        self.depth.get()
    }

    /// Check if [`back`](Self::back) would leave the first managed entry.
    pub fn can_go_back(&self) -> bool {
        self.depth.get() > 0
    }

    /// The active class if a link to `link_path` is active on the current route.
    pub fn link_class(&self, link_path: &str, match_start: bool) -> Option<&str> {
        let active = self.current_route.with(|route| {
            route
                .as_ref()
                .is_some_and(|route| link_is_active(link_path, route.path(), match_start))
        });
        active.then_some(self.options.active_class.as_str())
    }

    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.borrow().stats().clone()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn start_navigation(&self) -> u64 {
        let id = self.navigation_id.get().wrapping_add(1);
        self.navigation_id.set(id);
        id
    }

    fn is_navigation_current(&self, id: u64) -> bool {
        self.navigation_id.get() == id
    }

    fn publish(&self, matched: &MatchedRoute) {
        debug_log!(
            "Publishing '{}' ({} components, {} params)",
            matched.clean_path,
            matched.components().len(),
            matched.params.len()
        );
        self.current_path.set(matched.clean_path.clone());
        self.current_route.set(Some(matched.clone()));
    }

    fn apply_page_scroll_block(&self, block: bool) {
        trace_log!("Page scroll {}", if block { "blocked" } else { "unblocked" });
        self.platform.set_page_scroll_blocked(block);
    }

    fn scroll_after_navigate(
        &self,
        request: &NavigateRequest,
        matched: &MatchedRoute,
    ) -> Result<(), NavigationError> {
        if !self.options.manage_scroll
            || matched.block_page_scroll()
            || request.reset_scroll == Some(false)
        {
            return Ok(());
        }

        let target = match &request.scroll_to_id {
            Some(id) => ScrollTarget::Element(id.clone()),
            None if request.reset_scroll.unwrap_or(self.options.scroll_to_top) => {
                ScrollTarget::Origin
            }
            None => return Ok(()),
        };

        restore_scroll(&self.platform, &target).map(|_| ())
    }

    fn write_history(&self, request: &NavigateRequest, matched: &MatchedRoute) {
        let index = if request.replace {
            self.depth.get()
        } else {
            self.depth.get() + 1
        };

        let mut entry = HistoryEntry::new(index, matched.block_page_scroll());
        entry.scroll_to_id = request.scroll_to_id.clone();

        if request.replace {
            self.platform
                .replace_state(Some(entry.to_state()), &request.path);
            debug_log!("Replaced history entry #{} with '{}'", index, request.path);
        } else {
            self.platform.push_state(entry.to_state(), &request.path);
            self.depth.set(index);
            debug_log!("Pushed history entry #{} for '{}'", index, request.path);
        }
    }

    fn outcome_for(matched: &MatchedRoute, path: String) -> NavigationOutcome {
        if matched.is_not_found() {
            NavigationOutcome::NotFound { path }
        } else {
            NavigationOutcome::Completed { path }
        }
    }
}

impl<P: Platform + fmt::Debug, R: RenderCycle> fmt::Debug for Router<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("options", &self.options)
            .field("platform", &self.platform)
            .field("current_path", &self.current_path.get())
            .field("depth", &self.depth.get())
            .finish_non_exhaustive()
    }
}
