//! Path matching, parameter extraction and query/fragment parsing.

mod common;

use common::app_routes;
use spa_navigator::*;

fn table() -> RouteTable {
    RouteTable::build(&app_routes(), vec![ComponentRef::new("NotFound")])
}

fn matched_path<'a>(table: &'a RouteTable, path: &str) -> &'a str {
    &match_route(path, table.routes(), table.not_found()).path
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_literal_route_matches() {
    let table = table();
    assert_eq!(matched_path(&table, "/about"), "/about");
    assert_eq!(matched_path(&table, "/"), "/");
}

#[test]
fn test_unknown_path_falls_back_to_not_found() {
    let table = table();
    let route = match_route("/nope", table.routes(), table.not_found());
    assert!(route.is_not_found());
    assert_eq!(route.components, vec![ComponentRef::new("NotFound")]);
}

#[test]
fn test_param_route_matches_with_value() {
    let table = table();
    let route = match_route("/users/42", table.routes(), table.not_found());
    assert_eq!(route.path, "/users/:id");

    let params = extract_params("/users/42", &route.path);
    assert_eq!(params.get("id"), Some("42"));
    assert_eq!(params.len(), 1);
}

#[test]
fn test_empty_terminal_param_is_rejected() {
    let table = table();
    assert_eq!(matched_path(&table, "/users/"), "");
}

#[test]
fn test_segment_count_must_agree() {
    let table = table();
    assert_eq!(matched_path(&table, "/users/42/posts"), "");
    assert_eq!(matched_path(&table, "/users"), "");
}

#[test]
fn test_literal_declared_first_wins_over_param() {
    let routes = vec![
        RouteDeclaration::new("/users/me", "Me"),
        RouteDeclaration::new("/users/:id", "User"),
    ];
    let table = RouteTable::build(&routes, Vec::new());
    assert_eq!(matched_path(&table, "/users/me"), "/users/me");
    assert_eq!(matched_path(&table, "/users/you"), "/users/:id");
}

#[test]
fn test_index_child_matches_parent_path() {
    let table = table();
    let route = match_route("/docs", table.routes(), table.not_found());
    assert_eq!(route.components.last().map(ComponentRef::key), Some("DocsIndex"));

    let route = match_route("/docs/routing", table.routes(), table.not_found());
    assert_eq!(route.path, "/docs/:section");
}

#[test]
fn test_param_extraction_round_trip() {
    let pattern = "/org/:org/repo/:repo/blob/:file";
    let samples = [
        ["acme", "rocket", "main.rs"],
        ["a", "b", "c"],
        ["with space", "dots.and-dashes", "%41"],
        ["ünïcödé", "42", "x_y"],
    ];

    for [org, repo, file] in samples {
        let path = format!("/org/{org}/repo/{repo}/blob/{file}");
        let params = extract_params(&path, pattern);
        assert_eq!(params.get("org"), Some(org));
        assert_eq!(params.get("repo"), Some(repo));
        assert_eq!(params.get("file"), Some(file));
        assert_eq!(params.len(), 3);
    }
}

#[test]
fn test_typed_params() {
    let params = extract_params("/users/42", "/users/:id");
    assert_eq!(params.get_as::<u32>("id"), Some(42));
    assert_eq!(params.get_as::<bool>("id"), None);
}

// ============================================================================
// Query and fragment
// ============================================================================

#[test]
fn test_split_path_with_query_and_fragment() {
    let split = split_path("/a?x=1&y=2#frag");
    assert_eq!(split.clean_path, "/a");
    assert_eq!(split.query.get("x"), Some("1"));
    assert_eq!(split.query.get("y"), Some("2"));
    assert_eq!(split.query.len(), 2);
    assert_eq!(split.fragment.as_deref(), Some("frag"));
}

#[test]
fn test_split_path_without_query() {
    let split = split_path("/plain");
    assert_eq!(split.clean_path, "/plain");
    assert!(split.query.is_empty());
    assert_eq!(split.fragment, None);
}

#[test]
fn test_question_mark_inside_fragment_is_not_a_query() {
    let split = split_path("/page#section?x=1");
    assert_eq!(split.clean_path, "/page");
    assert!(split.query.is_empty());
    assert_eq!(split.fragment.as_deref(), Some("section?x=1"));
}

#[test]
fn test_query_decoding_and_duplicates() {
    let split = split_path("/search?q=rust%20router&tag=a&tag=b&flag&=x&&");
    assert_eq!(split.query.get("q"), Some("rust router"));
    assert_eq!(split.query.get("tag"), Some("b"));
    assert_eq!(split.query.get("flag"), Some(""));
}

#[test]
fn test_query_string_is_encoded_symmetrically() {
    let mut query = QueryParams::new();
    query.insert("q".to_string(), "a&b = c".to_string());
    query.insert("page".to_string(), "2".to_string());

    let encoded = query.to_query_string();
    assert!(!encoded.contains(' '));

    let decoded = QueryParams::from_query_string(&encoded);
    assert_eq!(decoded.get("q"), Some("a&b = c"));
    assert_eq!(decoded.get("page"), Some("2"));
}
