//! # spa-navigator
//!
//! Client-side navigation for single-page applications.
//!
//! Routes are declared as a tree of paths and component stacks, flattened
//! once into a lookup table, and matched against navigation requests. The
//! matched route, its parameters, query and fragment are published through
//! [`Store`]s that the rendering layer subscribes to. The native history
//! stack and the page scroll offset are kept in sync along the way, so
//! back/forward restores where the user was.
//!
//! The browser is reached through the [`Platform`] trait: [`MemoryPlatform`]
//! runs everywhere (tests, servers, native hosts) and `web::WebPlatform`
//! (feature `web`) drives a real browser window.
//!
//! ## Quick start
//!
//! ```
//! use spa_navigator::{
//!     MemoryPlatform, NavigateRequest, RouteDeclaration, Router, RouterConfig,
//! };
//!
//! let routes = vec![
//!     RouteDeclaration::new("/", "Home"),
//!     RouteDeclaration::new("/about", "About")
//!         .child(RouteDeclaration::new("modal", "Modal").block_page_scroll(true)),
//!     RouteDeclaration::new("/users/:id", "User"),
//! ];
//! let router = Router::new(
//!     RouterConfig::new(routes).not_found("NotFound"),
//!     MemoryPlatform::new("/"),
//! );
//!
//! pollster::block_on(async {
//!     router.initialize().await.unwrap();
//!     router
//!         .navigate(NavigateRequest::new("/about/modal"))
//!         .await
//!         .unwrap();
//! });
//!
//! let route = router.current_route().get().unwrap();
//! let stack: Vec<_> = route.components().iter().map(|c| c.key()).collect();
//! assert_eq!(stack, ["About", "Modal"]);
//! assert!(route.block_page_scroll());
//! ```
//!
//! ## Features
//!
//! | Feature   | Default | Description                              |
//! |-----------|---------|------------------------------------------|
//! | `log`     | yes     | Log through the `log` crate              |
//! | `tracing` | no      | Log through the `tracing` crate          |
//! | `cache`   | yes     | LRU cache of path match results          |
//! | `web`     | no      | Browser platform on `web-sys`            |

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
pub mod logging;

pub mod active;
#[cfg(feature = "cache")]
pub mod cache;
pub mod error;
pub mod flatten;
pub mod history;
pub mod matching;
pub mod memory;
pub mod params;
pub mod platform;
pub mod route;
pub mod router;
pub mod scroll;
pub mod store;
#[cfg(feature = "web")]
pub mod web;

pub use active::link_is_active;
#[cfg(feature = "cache")]
pub use cache::{CacheStats, MatchCache};
pub use error::{NavigationError, NavigationOutcome, NavigationResult};
pub use flatten::{flatten_routes, RouteTable};
pub use history::{HistoryEntry, ScrollPosition};
pub use matching::{extract_params, match_route};
pub use memory::{MemoryPlatform, PlatformOp};
pub use params::{split_path, QueryParams, RouteParams, SplitPath};
pub use platform::{ElementRect, NextTick, Platform, PopStateEvent, RenderCycle, Viewport};
pub use route::{ComponentRef, FlatRoute, MatchedRoute, Meta, RouteDeclaration};
pub use router::{
    BackOptions, NavigateRequest, RouteMatchHook, Router, RouterConfig, RouterOptions,
};
pub use scroll::{ScrollTicket, SCROLL_DEBOUNCE};
pub use store::{Store, SubscriptionId};
#[cfg(feature = "web")]
pub use web::{attach, start, Listeners, WebPlatform};
