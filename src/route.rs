//! Route declarations and the records derived from them.
//!
//! - [`RouteDeclaration`]: the user-authored, possibly nested route tree.
//! - [`FlatRoute`]: one resolved path-to-component-stack entry, produced once
//!   by [`flatten_routes`](crate::flatten::flatten_routes).
//! - [`MatchedRoute`]: a [`FlatRoute`] plus the params, query and fragment of
//!   one navigation. This is what the router publishes to the UI.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{ComponentRef, RouteDeclaration};
//!
//! let about = RouteDeclaration::new("/about", "About").children(vec![
//!     RouteDeclaration::new("modal", "Modal").block_page_scroll(true),
//! ]);
//! assert_eq!(about.path, "/about");
//! assert_eq!(about.children.len(), 1);
//! assert_eq!(about.components, vec![ComponentRef::new("About")]);
//! ```

use crate::params::{QueryParams, RouteParams};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Arbitrary per-route metadata (`title`, `requiresAuth`, ...).
pub type Meta = Map<String, Value>;

// ============================================================================
// ComponentRef
// ============================================================================

/// Opaque handle to a view component.
///
/// The router only sequences and concatenates these; the rendering layer
/// resolves them to actual views.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentRef(Arc<str>);

impl ComponentRef {
    /// Create a handle from a component key.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// The component key.
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentRef {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ComponentRef {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

// ============================================================================
// RouteDeclaration
// ============================================================================

/// A user-authored route, optionally with children.
///
/// `block_page_scroll` is `None` when the declaration does not set it, so the
/// flattener can tell "inherit" apart from an explicit `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteDeclaration {
    /// Path segment(s); a missing leading `/` is added during flattening.
    pub path: String,
    /// Layout stack rendered for this route, outside-in.
    pub components: Vec<ComponentRef>,
    /// Nested routes rendered inside this one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDeclaration>,
    /// Metadata merged into every descendant (child keys win).
    #[serde(skip_serializing_if = "Meta::is_empty")]
    pub meta: Meta,
    /// Lock page scrolling while this route is active (e.g. modals).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_page_scroll: Option<bool>,
}

impl RouteDeclaration {
    /// Declare a route rendering a single component.
    pub fn new(path: impl Into<String>, component: impl Into<ComponentRef>) -> Self {
        Self {
            path: path.into(),
            components: vec![component.into()],
            ..Self::default()
        }
    }

    /// Declare a route rendering a stack of components.
    pub fn with_components<I, C>(path: impl Into<String>, components: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ComponentRef>,
    {
        Self {
            path: path.into(),
            components: components.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the child routes.
    pub fn children(mut self, children: Vec<RouteDeclaration>) -> Self {
        self.children = children;
        self
    }

    /// Append one child route.
    pub fn child(mut self, child: RouteDeclaration) -> Self {
        self.children.push(child);
        self
    }

    /// Set a metadata entry.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Block or explicitly unblock page scrolling for this route.
    pub fn block_page_scroll(mut self, block: bool) -> Self {
        self.block_page_scroll = Some(block);
        self
    }
}

// ============================================================================
// FlatRoute
// ============================================================================

/// A fully resolved route: one concrete path and its full component stack.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRoute {
    /// Always starts with `/` (empty only for the not-found route).
    pub path: String,
    /// Ancestor components followed by this route's own, outside-in.
    pub components: Vec<ComponentRef>,
    /// `true` when some path segment starts with `:`.
    pub has_params: bool,
    /// Inherited from the nearest ancestor unless overridden.
    pub block_page_scroll: bool,
    /// Ancestor meta merged with this route's meta.
    pub meta: Meta,
}

impl FlatRoute {
    /// The synthetic not-found route: empty path, never matched positionally.
    pub fn not_found(components: Vec<ComponentRef>) -> Self {
        Self {
            path: String::new(),
            components,
            has_params: false,
            block_page_scroll: false,
            meta: Meta::new(),
        }
    }

    /// Check if this is the not-found route.
    pub fn is_not_found(&self) -> bool {
        self.path.is_empty()
    }
}

// ============================================================================
// MatchedRoute
// ============================================================================

/// The route published for one navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRoute {
    /// The flat route that matched (or the not-found route).
    pub route: Arc<FlatRoute>,
    /// Parameter values keyed by name (`:id` → `id`).
    pub params: RouteParams,
    /// Decoded query string.
    pub query: QueryParams,
    /// Fragment after `#`, if any.
    pub fragment: Option<String>,
    /// Path with query and fragment removed.
    pub clean_path: String,
    /// The exact path that was requested.
    pub full_path: String,
}

impl MatchedRoute {
    /// Route pattern (e.g. `/users/:id`).
    pub fn path(&self) -> &str {
        &self.route.path
    }

    /// Component stack to render, outside-in.
    pub fn components(&self) -> &[ComponentRef] {
        &self.route.components
    }

    /// Route metadata.
    pub fn meta(&self) -> &Meta {
        &self.route.meta
    }

    /// Whether page scrolling is blocked while this route is active.
    pub fn block_page_scroll(&self) -> bool {
        self.route.block_page_scroll
    }

    /// Check if nothing matched.
    pub fn is_not_found(&self) -> bool {
        self.route.is_not_found()
    }
}
