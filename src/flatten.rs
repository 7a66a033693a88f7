//! Route tree flattening.
//!
//! The declared route tree is walked once at router construction and turned
//! into a flat, ordered table of [`FlatRoute`]s. Matching then never has to
//! look at the hierarchy again.
//!
//! # Rules
//!
//! 1. Every path gets a leading `/`; an empty path becomes `/`.
//! 2. A child's path is appended to its parent's. A child whose path is empty
//!    or `/` is an *index child* and renders at the parent path itself.
//! 3. Components concatenate root-to-leaf (layout outside-in).
//! 4. `block_page_scroll` and `meta` are inherited and overridden by the
//!    child's own values (child meta keys win).
//! 5. A parent with children is registered at its own path with its own
//!    component stack, unless an index child already renders there. In that
//!    case the index child's entry is the one registered.
//! 6. Paths are unique: a later duplicate is dropped with a warning, so the
//!    first declaration wins.
//! 7. `has_params` is computed in one pass over the finished table.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{flatten_routes, RouteDeclaration};
//!
//! let routes = vec![
//!     RouteDeclaration::new("/", "Home"),
//!     RouteDeclaration::new("/about", "About").children(vec![
//!         RouteDeclaration::new("modal", "Modal").block_page_scroll(true),
//!     ]),
//! ];
//!
//! let flat = flatten_routes(&routes);
//! let paths: Vec<&str> = flat.iter().map(|r| r.path.as_str()).collect();
//! assert_eq!(paths, vec!["/", "/about", "/about/modal"]);
//! assert!(flat[2].block_page_scroll);
//! assert_eq!(flat[2].components.len(), 2);
//! ```

use crate::matching::is_param_segment;
use crate::route::{ComponentRef, FlatRoute, Meta, RouteDeclaration};
use crate::{debug_log, trace_log, warn_log};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

/// Ensure a declared path starts with `/`. Empty paths become `/`.
///
/// Trailing slashes are kept: `/users/` and `/users` are different routes.
///
/// ```
/// use spa_navigator::flatten::normalize_route_path;
///
/// assert_eq!(normalize_route_path("about"), "/about");
/// assert_eq!(normalize_route_path("/about"), "/about");
/// assert_eq!(normalize_route_path(""), "/");
/// ```
#[must_use]
pub fn normalize_route_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        Cow::Borrowed("/")
    } else if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// Index children render at their parent's path.
fn is_index_path(path: &str) -> bool {
    path.is_empty() || path == "/"
}

fn join_paths(parent: &str, child: &str) -> String {
    if child == "/" {
        if parent.is_empty() {
            "/".to_string()
        } else {
            parent.to_string()
        }
    } else if parent.is_empty() || parent == "/" {
        child.to_string()
    } else {
        format!("{parent}{child}")
    }
}

/// What a declaration passes down to its children.
struct Inherited {
    path: String,
    components: Vec<ComponentRef>,
    block_page_scroll: bool,
    meta: Meta,
}

impl Inherited {
    fn root() -> Self {
        Self {
            path: String::new(),
            components: Vec::new(),
            block_page_scroll: false,
            meta: Meta::new(),
        }
    }

    fn extend(&self, declaration: &RouteDeclaration) -> Self {
        let own_path = normalize_route_path(&declaration.path);

        let mut components = self.components.clone();
        components.extend(declaration.components.iter().cloned());

        let mut meta = self.meta.clone();
        for (key, value) in &declaration.meta {
            meta.insert(key.clone(), value.clone());
        }

        Self {
            path: join_paths(&self.path, &own_path),
            components,
            block_page_scroll: declaration
                .block_page_scroll
                .unwrap_or(self.block_page_scroll),
            meta,
        }
    }

    fn to_flat_route(&self) -> FlatRoute {
        FlatRoute {
            path: self.path.clone(),
            components: self.components.clone(),
            has_params: false,
            block_page_scroll: self.block_page_scroll,
            meta: self.meta.clone(),
        }
    }
}

fn flatten_into(declaration: &RouteDeclaration, parent: &Inherited, out: &mut Vec<FlatRoute>) {
    let current = parent.extend(declaration);

    if declaration.children.is_empty() {
        out.push(current.to_flat_route());
        return;
    }

    let has_index_child = declaration
        .children
        .iter()
        .any(|child| is_index_path(&child.path));

    if has_index_child {
        trace_log!(
            "'{}' has an index child; parent entry replaced by it",
            current.path
        );
    } else {
        out.push(current.to_flat_route());
    }

    for child in &declaration.children {
        flatten_into(child, &current, out);
    }
}

/// Flatten a route tree into a lookup table, preserving declaration order.
pub fn flatten_routes(tree: &[RouteDeclaration]) -> Vec<FlatRoute> {
    let mut flat = Vec::new();
    let root = Inherited::root();
    for declaration in tree {
        flatten_into(declaration, &root, &mut flat);
    }

    let mut seen = HashSet::new();
    flat.retain(|route| {
        let first = seen.insert(route.path.clone());
        if !first {
            warn_log!(
                "Duplicate route path '{}' ignored; the first declaration wins",
                route.path
            );
        }
        first
    });

    // Only once the whole table exists
    for route in &mut flat {
        route.has_params = route.path.split('/').any(is_param_segment);
    }

    debug_log!("Flattened route tree into {} routes", flat.len());
    flat
}

// ============================================================================
// RouteTable
// ============================================================================

/// The flattened routes plus the not-found fallback.
///
/// Built once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Arc<FlatRoute>>,
    not_found: Arc<FlatRoute>,
}

impl RouteTable {
    /// Flatten `tree` and pair it with a not-found route.
    pub fn build(tree: &[RouteDeclaration], not_found_components: Vec<ComponentRef>) -> Self {
        Self {
            routes: flatten_routes(tree).into_iter().map(Arc::new).collect(),
            not_found: Arc::new(FlatRoute::not_found(not_found_components)),
        }
    }

    /// Routes in match order.
    pub fn routes(&self) -> &[Arc<FlatRoute>] {
        &self.routes
    }

    /// The fallback route for unmatched paths.
    pub fn not_found(&self) -> &Arc<FlatRoute> {
        &self.not_found
    }

    /// Look up a route by its exact pattern.
    pub fn get(&self, pattern: &str) -> Option<&Arc<FlatRoute>> {
        self.routes.iter().find(|route| route.path == pattern)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
