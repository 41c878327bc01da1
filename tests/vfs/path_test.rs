/*!
 * Path Resolver Property Tests
 */

use ai_os_vfs::vfs::path;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(".".to_string()),
        Just("..".to_string()),
        "[a-z0-9_.-]{1,8}",
    ]
}

/// Segment-stack reference for lexical normalization
fn collapse(raw: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    format!("/{}", stack.join("/"))
}

fn absolute_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 0..8).prop_map(|parts| format!("/{}", parts.join("/")))
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in absolute_path()) {
        let once = path::normalize(&raw).unwrap();
        let twice = path::normalize(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_matches_segment_stack(raw in absolute_path()) {
        prop_assert_eq!(path::normalize(&raw).unwrap(), collapse(&raw));
    }

    #[test]
    fn normalized_form_is_canonical(raw in absolute_path()) {
        let normalized = path::normalize(&raw).unwrap();
        prop_assert!(normalized.starts_with('/'));
        prop_assert!(!normalized.contains("//"));
        prop_assert!(normalized == "/" || !normalized.ends_with('/'));
        for segment in normalized.split('/').skip(1) {
            prop_assert!(segment != "." && segment != "..");
        }
    }

    #[test]
    fn dirname_and_basename_rejoin(raw in absolute_path()) {
        let normalized = path::normalize(&raw).unwrap();
        let dir = path::dirname(&normalized).unwrap();
        let base = path::basename(&normalized, None).unwrap();
        prop_assert_eq!(path::join(&[dir, base]), normalized);
    }

    #[test]
    fn relative_then_resolve_round_trips(from in absolute_path(), to in absolute_path()) {
        let rel = path::relative(&from, &to).unwrap();
        let back = path::resolve(&from, &[rel]).unwrap();
        prop_assert_eq!(back, path::normalize(&to).unwrap());
    }
}

#[test]
fn test_resolve_scenario() {
    assert_eq!(path::resolve::<&str>("/a/./b/../c", &[]).unwrap(), "/a/c");
    assert_eq!(ai_os_vfs::resolve("/", &["a/./b/../c"]).unwrap(), "/a/c");
}

#[test]
fn test_relative_paths_rejected() {
    assert!(path::normalize("a/b").is_err());
    assert!(path::dirname("").is_err());
    assert!(path::relative("a", "/b").is_err());
}
