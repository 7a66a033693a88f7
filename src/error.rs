//! Navigation outcomes and errors.
//!
//! Most things that can "go wrong" while navigating are normal routing
//! outcomes, not failures:
//!
//! - an unknown path resolves to the not-found route
//!   ([`NavigationOutcome::NotFound`]);
//! - the `on_route_match` hook can decline a navigation
//!   ([`NavigationOutcome::Rejected`]);
//! - a back/forward event without router state is ignored
//!   ([`NavigationOutcome::Ignored`] / [`NavigationOutcome::UnknownState`]).
//!
//! Only a scroll target that does not exist in the document is surfaced as a
//! [`NavigationError`], because it indicates a content or timing bug.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::error::{NavigationError, NavigationOutcome};
//!
//! let outcome = NavigationOutcome::Completed { path: "/about".into() };
//! assert!(outcome.is_completed());
//! assert_eq!(outcome.path(), Some("/about"));
//!
//! let err = NavigationError::MissingScrollTarget { id: "intro".into() };
//! assert_eq!(err.to_string(), "Element id \"intro\" doesn't exist in the page");
//! ```

use std::fmt;

// ============================================================================
// Navigation outcomes
// ============================================================================

/// Outcome of a navigation, back request, or back/forward event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A declared route matched and was published.
    Completed { path: String },
    /// No route matched; the not-found route was published.
    NotFound { path: String },
    /// The `on_route_match` hook declined; nothing changed.
    Rejected { path: String },
    /// A newer navigation started while this one awaited the render tick.
    /// State was published, but scroll and history were left to the newer one.
    Superseded { path: String },
    /// Native history back was requested; the platform will deliver a
    /// back/forward event.
    WentBack,
    /// A back/forward event without state (e.g. a pure hash change).
    Ignored,
    /// A back/forward event whose state is not a router history entry.
    UnknownState,
}

impl NavigationOutcome {
    /// A route (declared or not-found) was published and history updated.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::NotFound { .. })
    }

    /// Check if the path resolved to the not-found route.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the interception hook declined the navigation.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Check if a newer navigation took over.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    /// The requested path, for outcomes that carry one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Completed { path }
            | Self::NotFound { path }
            | Self::Rejected { path }
            | Self::Superseded { path } => Some(path),
            Self::WentBack | Self::Ignored | Self::UnknownState => None,
        }
    }
}

// ============================================================================
// Navigation errors
// ============================================================================

/// Failures raised to the caller of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// `scroll_to_id` (or a remembered one) names no element in the document.
    MissingScrollTarget { id: String },

    /// The navigation request itself is unusable.
    InvalidRequest { message: String },
}

impl NavigationError {
    /// Check if this is a missing scroll target.
    pub fn is_missing_scroll_target(&self) -> bool {
        matches!(self, Self::MissingScrollTarget { .. })
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::MissingScrollTarget { id } => {
                write!(f, "Element id \"{}\" doesn't exist in the page", id)
            }
            NavigationError::InvalidRequest { message } => {
                write!(f, "Invalid navigation request: {}", message)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

/// Result type for router operations.
pub type NavigationResult = Result<NavigationOutcome, NavigationError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_and_not_found_both_count_as_completed() {
        let done = NavigationOutcome::Completed {
            path: "/a".to_string(),
        };
        let missing = NavigationOutcome::NotFound {
            path: "/nope".to_string(),
        };
        assert!(done.is_completed());
        assert!(!done.is_not_found());
        assert!(missing.is_completed());
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_rejected_is_not_completed() {
        let outcome = NavigationOutcome::Rejected {
            path: "/admin".to_string(),
        };
        assert!(outcome.is_rejected());
        assert!(!outcome.is_completed());
        assert_eq!(outcome.path(), Some("/admin"));
    }

    #[test]
    fn test_pathless_outcomes() {
        assert_eq!(NavigationOutcome::WentBack.path(), None);
        assert_eq!(NavigationOutcome::Ignored.path(), None);
        assert_eq!(NavigationOutcome::UnknownState.path(), None);
    }

    #[test]
    fn test_error_display() {
        let error = NavigationError::InvalidRequest {
            message: "empty path".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid navigation request: empty path");
        assert!(!error.is_missing_scroll_target());
    }
}
