//! End-to-end navigation through the router over an in-memory platform.

mod common;

use common::*;
use spa_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;

// ============================================================================
// Basic navigation
// ============================================================================

#[test]
fn test_navigate_publishes_route_and_pushes_history() {
    init_logging();
    let router = started_router("/");

    let outcome = pollster::block_on(router.navigate("/users/42?tab=posts#bio")).unwrap();
    assert_eq!(
        outcome,
        NavigationOutcome::Completed {
            path: "/users/42?tab=posts#bio".to_string()
        }
    );

    let route = router.current_route().get().unwrap();
    assert_eq!(route.path(), "/users/:id");
    assert_eq!(route.params.get("id"), Some("42"));
    assert_eq!(route.query.get("tab"), Some("posts"));
    assert_eq!(route.fragment.as_deref(), Some("bio"));
    assert_eq!(router.current_path().get(), "/users/42");

    let platform = router.platform();
    assert_eq!(platform.history_len(), 2);
    assert_eq!(platform.location(), "/users/42?tab=posts#bio");
    assert_eq!(entry_at(platform, 1).unwrap().index, 1);
    assert_eq!(router.history_depth(), 1);
}

#[test]
fn test_modal_route_blocks_scroll_before_any_scroll_write() {
    let routes = vec![
        RouteDeclaration::new("/", "A"),
        RouteDeclaration::new("/about", "B")
            .children(vec![RouteDeclaration::new("modal", "C").block_page_scroll(true)]),
    ];
    let router = Router::new(RouterConfig::new(routes), MemoryPlatform::new("/"));
    pollster::block_on(router.initialize()).unwrap();
    router.platform().clear_operations();

    pollster::block_on(router.navigate("/about/modal")).unwrap();

    assert_eq!(component_keys(&router), ["B", "C"]);
    let route = router.current_route().get().unwrap();
    assert!(route.block_page_scroll());
    assert!(router.platform().is_page_scroll_blocked());

    let ops = router.platform().operations();
    let block = ops
        .iter()
        .position(|op| *op == PlatformOp::BlockPageScroll(true))
        .expect("scroll was never blocked");
    let first_scroll = ops
        .iter()
        .position(|op| matches!(op, PlatformOp::ScrollTo(_)))
        .unwrap_or(usize::MAX);
    assert!(block < first_scroll);

    let entry = entry_at(router.platform(), 1).unwrap();
    assert!(entry.block_page_scroll);
}

#[test]
fn test_leaving_blocked_route_unblocks_then_scrolls() {
    let router = started_router("/");
    pollster::block_on(router.navigate("/about/modal")).unwrap();
    router.platform().clear_operations();

    pollster::block_on(router.navigate("/about")).unwrap();

    let ops = router.platform().operations();
    let unblock = ops
        .iter()
        .position(|op| *op == PlatformOp::BlockPageScroll(false))
        .unwrap();
    let scroll = ops
        .iter()
        .position(|op| *op == PlatformOp::ScrollTo(ScrollPosition::ORIGIN))
        .unwrap();
    assert!(unblock < scroll);
    assert!(!router.platform().is_page_scroll_blocked());
}

#[test]
fn test_unknown_path_renders_not_found() {
    let router = started_router("/");

    let outcome = pollster::block_on(router.navigate("/nope")).unwrap();
    assert!(outcome.is_not_found());
    assert!(outcome.is_completed());
    assert_eq!(component_keys(&router), ["NotFound"]);
    assert_eq!(router.current_path().get(), "/nope");
    assert_eq!(router.platform().location(), "/nope");
}

#[test]
fn test_navigate_without_history_is_idempotent() {
    let router = started_router("/");
    let request = NavigateRequest::new("/docs/routing?v=2").add_to_history(false);

    pollster::block_on(router.navigate(request.clone())).unwrap();
    let first = router.current_route().get();
    pollster::block_on(router.navigate(request)).unwrap();
    let second = router.current_route().get();

    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(router.platform().history_len(), 1);
    assert_eq!(router.history_depth(), 0);
}

#[test]
fn test_replace_keeps_history_length() {
    let router = started_router("/");
    pollster::block_on(router.navigate("/about")).unwrap();

    pollster::block_on(router.navigate(NavigateRequest::new("/docs").replace())).unwrap();

    let platform = router.platform();
    assert_eq!(platform.history_len(), 2);
    assert_eq!(platform.location(), "/docs");
    assert_eq!(entry_at(platform, 1).unwrap().index, 1);
    assert_eq!(router.history_depth(), 1);
}

// ============================================================================
// Scrolling
// ============================================================================

#[test]
fn test_scroll_to_id_centers_element() {
    let router = started_router("/");
    router.platform().add_element("install", rect_at(2000.0));

    let request = NavigateRequest::new("/docs/setup").scroll_to_id("install");
    pollster::block_on(router.navigate(request)).unwrap();

    // Default viewport is 1024x768
    assert_eq!(
        router.platform().scroll_position(),
        ScrollPosition::new(0.0, 2000.0 - 384.0)
    );
    let entry = entry_at(router.platform(), 1).unwrap();
    assert_eq!(entry.scroll_to_id.as_deref(), Some("install"));
}

#[test]
fn test_missing_scroll_target_is_reported_after_history_write() {
    let router = started_router("/");

    let request = NavigateRequest::new("/docs").scroll_to_id("ghost");
    let err = pollster::block_on(router.navigate(request)).unwrap_err();

    assert_eq!(
        err,
        NavigationError::MissingScrollTarget {
            id: "ghost".to_string()
        }
    );
    assert_eq!(err.to_string(), "Element id \"ghost\" doesn't exist in the page");
    assert_eq!(router.current_path().get(), "/docs");
    assert_eq!(router.platform().location(), "/docs");
    assert_eq!(router.platform().history_len(), 2);
}

#[test]
fn test_reset_scroll_false_keeps_offset() {
    let router = started_router("/");
    router.platform().user_scroll(ScrollPosition::new(0.0, 300.0));
    router.platform().clear_operations();

    pollster::block_on(router.navigate(NavigateRequest::new("/about").reset_scroll(false))).unwrap();

    assert_eq!(router.platform().scroll_position(), ScrollPosition::new(0.0, 300.0));
    assert!(!router
        .platform()
        .operations()
        .iter()
        .any(|op| matches!(op, PlatformOp::ScrollTo(_))));
}

#[test]
fn test_scroll_to_top_disabled() {
    let config = app_config().scroll_to_top(false);
    let router = Router::new(config, MemoryPlatform::new("/"));
    pollster::block_on(router.initialize()).unwrap();
    router.platform().user_scroll(ScrollPosition::new(0.0, 120.0));

    pollster::block_on(router.navigate("/about")).unwrap();
    assert_eq!(router.platform().scroll_position(), ScrollPosition::new(0.0, 120.0));

    pollster::block_on(router.navigate(NavigateRequest::new("/docs").reset_scroll(true))).unwrap();
    assert_eq!(router.platform().scroll_position(), ScrollPosition::ORIGIN);
}

#[test]
fn test_unmanaged_scroll_never_scrolls() {
    let config = app_config().manage_scroll(false);
    let router = Router::new(config, MemoryPlatform::new("/"));
    router.platform().add_element("install", rect_at(2000.0));
    pollster::block_on(router.initialize()).unwrap();
    router.platform().user_scroll(ScrollPosition::new(0.0, 50.0));

    let request = NavigateRequest::new("/docs").scroll_to_id("install");
    pollster::block_on(router.navigate(request)).unwrap();

    assert_eq!(router.platform().scroll_position(), ScrollPosition::new(0.0, 50.0));
    let ticket = router.on_scroll();
    assert!(!router.settle_scroll(ticket));
}

// ============================================================================
// Interception hook
// ============================================================================

#[test]
fn test_hook_rejection_leaves_everything_untouched() {
    let config = app_config().on_route_match(|_, to| to.path() != "/about/modal");
    let router = Router::new(config, MemoryPlatform::new("/"));
    pollster::block_on(router.initialize()).unwrap();
    pollster::block_on(router.navigate("/about")).unwrap();

    let before = router.current_route().get();
    let history_len = router.platform().history_len();
    router.platform().clear_operations();

    let outcome = pollster::block_on(router.navigate("/about/modal")).unwrap();

    assert!(outcome.is_rejected());
    assert_eq!(router.current_route().get(), before);
    assert_eq!(router.current_path().get(), "/about");
    assert_eq!(router.platform().history_len(), history_len);
    assert!(router.platform().operations().is_empty());
}

#[test]
fn test_hook_sees_previous_and_candidate_routes() {
    let seen: Rc<RefCell<Vec<(Option<String>, String)>>> = Rc::default();
    let log = Rc::clone(&seen);
    let config = app_config().on_route_match(move |from, to| {
        log.borrow_mut()
            .push((from.map(|route| route.clean_path.clone()), to.clean_path.clone()));
        true
    });

    let router = Router::new(config, MemoryPlatform::new("/"));
    pollster::block_on(router.initialize()).unwrap();
    pollster::block_on(router.navigate("/users/1")).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            (None, "/".to_string()),
            (Some("/".to_string()), "/users/1".to_string()),
        ]
    );
}

#[test]
fn test_rejected_navigation_skips_render_tick() {
    let tick = CountingTick::default();
    let config = app_config().on_route_match(|_, to| !to.is_not_found());
    let router = Router::with_render_cycle(config, MemoryPlatform::new("/"), tick.clone());

    pollster::block_on(router.initialize()).unwrap();
    assert_eq!(tick.ticks.get(), 1);

    pollster::block_on(router.navigate("/nowhere")).unwrap();
    assert_eq!(tick.ticks.get(), 1);

    pollster::block_on(router.navigate("/about")).unwrap();
    assert_eq!(tick.ticks.get(), 2);
}

// ============================================================================
// Published state
// ============================================================================

#[test]
fn test_subscribers_see_every_update_in_order() {
    let router = started_router("/");
    let paths: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&paths);
    router
        .current_path()
        .subscribe(move |path| sink.borrow_mut().push(path.clone()));

    pollster::block_on(async {
        router.navigate("/about").await.unwrap();
        router.navigate("/users/3").await.unwrap();
        router.navigate("/about").await.unwrap();
    });

    assert_eq!(*paths.borrow(), ["/", "/about", "/users/3", "/about"]);
}

#[test]
fn test_query_rewrite_from_subscriber_is_seen_last() {
    let router = Rc::new(started_router("/"));

    let weak = Rc::downgrade(&router);
    router.current_route().subscribe(move |route: &Option<MatchedRoute>| {
        let Some(route) = route else { return };
        if route.clean_path == "/docs" && !route.query.contains("page") {
            if let Some(router) = weak.upgrade() {
                router.set_query(&[("page", "1")].into_iter().collect());
            }
        }
    });

    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&seen);
    router
        .current_route()
        .subscribe(move |route: &Option<MatchedRoute>| {
            if let Some(route) = route {
                sink.borrow_mut().push(route.full_path.clone());
            }
        });

    pollster::block_on(router.navigate("/docs")).unwrap();

    assert_eq!(*seen.borrow(), ["/", "/docs", "/docs?page=1"]);
    let current = router.current_route().get().unwrap();
    assert_eq!(current.full_path, "/docs?page=1");
}

#[test]
fn test_empty_path_is_rejected_as_invalid() {
    let router = started_router("/about");
    let err = pollster::block_on(router.navigate("")).unwrap_err();
    assert!(matches!(err, NavigationError::InvalidRequest { .. }));
    assert_eq!(router.current_path().get(), "/about");
}

#[tokio::test]
async fn test_latest_navigation_wins() {
    let router = started_router("/");

    let (first, second) = tokio::join!(router.navigate("/about"), router.navigate("/users/1"));

    assert!(first.unwrap().is_superseded());
    assert!(second.unwrap().is_completed());
    assert_eq!(router.current_path().get(), "/users/1");
    assert_eq!(router.platform().history_len(), 2);
    assert_eq!(router.platform().location(), "/users/1");
}

// ============================================================================
// Query and links
// ============================================================================

#[test]
fn test_set_query_rewrites_url_in_place() {
    let router = started_router("/");
    pollster::block_on(router.navigate("/docs?old=1")).unwrap();
    let state_before = router.platform().history_state();

    let query: QueryParams = [("q", "a b"), ("page", "2")].into_iter().collect();
    router.set_query(&query);

    let platform = router.platform();
    assert_eq!(platform.location(), "/docs?q=a%20b&page=2");
    assert_eq!(platform.history_len(), 2);
    assert_eq!(platform.history_state(), state_before);

    let route = router.current_route().get().unwrap();
    assert_eq!(route.query.get("q"), Some("a b"));
    assert!(!route.query.contains("old"));

    router.set_query(&QueryParams::new());
    assert_eq!(router.platform().location(), "/docs");
}

#[test]
fn test_link_class_uses_configured_class() {
    let config = app_config().active_class("is-current");
    let router = Router::new(config, MemoryPlatform::new("/docs/routing"));
    pollster::block_on(router.initialize()).unwrap();

    assert_eq!(router.link_class("/docs/routing", false), Some("is-current"));
    assert_eq!(router.link_class("/docs/other", false), Some("is-current"));
    assert_eq!(router.link_class("/docs", false), None);
    assert_eq!(router.link_class("/docs", true), Some("is-current"));
    assert_eq!(router.link_class("/", true), None);
}

#[test]
fn test_options_load_from_json() {
    let options: RouterOptions =
        serde_json::from_str(r#"{ "manageScroll": false, "activeClass": "on" }"#).unwrap();
    let config = app_config().options(options);
    let router = Router::new(config, MemoryPlatform::new("/"));

    assert!(router.options().scroll_to_top);
    assert!(!router.options().manage_scroll);
    assert_eq!(router.options().active_class, "on");
}
