//! Path matching against the flattened route table.
//!
//! # Algorithm
//!
//! Routes are scanned in table order and the first match wins, so declaration
//! order is the tie-break.
//!
//! - A route without parameters matches by exact string equality with the
//!   requested path (after enforcing a leading `/`).
//! - A parameterized route splits both paths on `/`. Segment counts must be
//!   equal; literal segments must be identical; a `:name` segment matches any
//!   **non-empty** value. An empty value is rejected at every position,
//!   including the last one, so `/users/` does not match `/users/:id`.
//!
//! If nothing matches, the caller's not-found route is returned.
//!
//! ```
//! use spa_navigator::{flatten_routes, match_route, extract_params, FlatRoute, RouteDeclaration};
//!
//! let table = flatten_routes(&[
//!     RouteDeclaration::new("/about", "About"),
//!     RouteDeclaration::new("/users/:id", "User"),
//! ]);
//! let not_found = FlatRoute::not_found(vec![]);
//!
//! assert_eq!(match_route("/about", &table, &not_found).path, "/about");
//! assert!(match_route("/nope", &table, &not_found).is_not_found());
//!
//! let user = match_route("/users/42", &table, &not_found);
//! assert_eq!(extract_params("/users/42", &user.path).get("id"), Some("42"));
//! ```

use crate::flatten::normalize_route_path;
use crate::params::RouteParams;
use crate::route::FlatRoute;
use crate::trace_log;
use std::borrow::Borrow;

/// Check if a route segment is a parameter (`:name`).
pub fn is_param_segment(segment: &str) -> bool {
    segment.starts_with(':')
}

/// Extract the parameter name from a route segment.
///
/// ```
/// use spa_navigator::matching::param_name;
///
/// assert_eq!(param_name(":id"), Some("id"));
/// assert_eq!(param_name("users"), None);
/// ```
pub fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(':')
}

/// Check whether `path` matches the parameterized pattern `route_path`.
pub fn matches_pattern(path: &str, route_path: &str) -> bool {
    let path_segments: Vec<&str> = path.split('/').collect();
    let route_segments: Vec<&str> = route_path.split('/').collect();

    if path_segments.len() != route_segments.len() {
        return false;
    }

    // Index 0 is the empty string before the leading '/'
    path_segments
        .iter()
        .zip(route_segments.iter())
        .skip(1)
        .all(|(value, segment)| {
            if is_param_segment(segment) {
                !value.is_empty()
            } else {
                value == segment
            }
        })
}

/// Check whether `path` (already normalized) matches `route`.
pub fn route_matches(path: &str, route: &FlatRoute) -> bool {
    if route.is_not_found() {
        return false;
    }
    if route.has_params {
        matches_pattern(path, &route.path)
    } else {
        route.path == path
    }
}

/// Index of the first route matching `clean_path`, if any.
pub fn find_route<R: Borrow<FlatRoute>>(clean_path: &str, table: &[R]) -> Option<usize> {
    let path = normalize_route_path(clean_path);
    let found = table
        .iter()
        .position(|route| route_matches(&path, route.borrow()));

    if let Some(index) = found {
        trace_log!(
            "'{}' matched route #{} '{}'",
            path,
            index,
            table[index].borrow().path
        );
    } else {
        trace_log!("'{}' matched no route", path);
    }

    found
}

/// Match `clean_path` against `table`, falling back to `error_route`.
pub fn match_route<'a, R: Borrow<FlatRoute>>(
    clean_path: &str,
    table: &'a [R],
    error_route: &'a R,
) -> &'a R {
    find_route(clean_path, table).map_or(error_route, |index| &table[index])
}

/// Capture `:name` segment values of `route_path` from `clean_path`.
///
/// Mirrors the segment walk of the matcher. Returns empty params when the
/// segment counts differ.
pub fn extract_params(clean_path: &str, route_path: &str) -> RouteParams {
    let path = normalize_route_path(clean_path);
    let path_segments: Vec<&str> = path.split('/').collect();
    let route_segments: Vec<&str> = route_path.split('/').collect();
    let mut params = RouteParams::new();

    if path_segments.len() != route_segments.len() {
        return params;
    }

    for (value, segment) in path_segments.iter().zip(route_segments.iter()).skip(1) {
        if let Some(name) = param_name(segment) {
            params.insert(name.to_string(), (*value).to_string());
        }
    }

    params
}
