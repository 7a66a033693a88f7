//! Active-link detection for navigation menus.
//!
//! A link is active when its path equals the current route's path. With
//! `match_start`, a link is also active for every route below it
//! (`/docs` is active on `/docs/install`), except the root link `/`.
//!
//! For parameterized routes the link is compared segment by segment and the
//! route's `:name` segments accept any link value, so a link to `/users/42`
//! is active while `/users/:id` is the current route.
//!
//! ```
//! use spa_navigator::active::link_is_active;
//!
//! assert!(link_is_active("/about", "/about", false));
//! assert!(link_is_active("/docs", "/docs/install", true));
//! assert!(!link_is_active("/", "/docs", true));
//! assert!(link_is_active("/users/42", "/users/:id", false));
//! ```

use crate::matching::is_param_segment;

/// Check whether a link to `link_path` is active on route pattern `route_path`.
pub fn link_is_active(link_path: &str, route_path: &str, match_start: bool) -> bool {
    if !route_path.split('/').any(is_param_segment) {
        return link_path == route_path
            || (match_start && link_path != "/" && starts_with_segments(route_path, link_path));
    }

    let link_segments: Vec<&str> = link_path.split('/').collect();
    let route_segments: Vec<&str> = route_path.split('/').collect();

    let comparable = if match_start {
        link_segments.len() <= route_segments.len()
    } else {
        link_segments.len() == route_segments.len()
    };
    if !comparable {
        return false;
    }

    link_segments
        .iter()
        .zip(route_segments.iter())
        .skip(1)
        .all(|(link, route)| is_param_segment(route) || link == route)
}

/// `prefix` covers whole leading segments of `path`.
fn starts_with_segments(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'))
}
