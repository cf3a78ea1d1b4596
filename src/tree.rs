use std::collections::BTreeMap;

use serde_json::Value;

/// One entry in the source documentation tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub path: String,
    pub title: String,
    pub kind: String,
    pub parent_path: Option<String>,
}

/// Collect every in-scope node from the index document.
///
/// The index nests its forest under `interfaceLanguages.<language>`. Each
/// root is walked pre-order; a node is kept iff its `path` is a string
/// starting with `prefix`. Duplicate paths keep the last-visited occurrence,
/// and the result is sorted by path so catalog output is stable across runs
/// regardless of the source tree's internal ordering.
pub fn collect_nodes(index: &Value, language: &str, prefix: &str) -> Vec<Node> {
    let mut visited = Vec::new();

    let roots = index
        .get("interfaceLanguages")
        .and_then(|langs| langs.get(language))
        .and_then(Value::as_array);
    if let Some(roots) = roots {
        for root in roots {
            if root.is_object() {
                walk(root, None, prefix, &mut visited);
            }
        }
    }

    let mut dedup: BTreeMap<String, Node> = BTreeMap::new();
    for node in visited {
        dedup.insert(node.path.clone(), node);
    }
    dedup.into_values().collect()
}

fn walk(value: &Value, parent_path: Option<&str>, prefix: &str, out: &mut Vec<Node>) {
    let path = value.get("path").and_then(Value::as_str);

    // An out-of-scope node is skipped but does not reset the parent
    // context for its descendants.
    let mut current_parent = parent_path;
    if let Some(path) = path {
        if path.starts_with(prefix) {
            let title = value
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| last_segment(path).to_string());
            let kind = value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            out.push(Node {
                path: path.to_string(),
                title,
                kind,
                parent_path: parent_path.map(str::to_string),
            });
            current_parent = Some(path);
        }
    }

    if let Some(children) = value.get("children").and_then(Value::as_array) {
        for child in children {
            if child.is_object() {
                walk(child, current_parent, prefix, out);
            }
        }
    }
}

/// Final `/`-delimited segment of a path.
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PREFIX: &str = "/design/human-interface-guidelines";

    fn index_with_roots(roots: Value) -> Value {
        json!({ "interfaceLanguages": { "swift": roots } })
    }

    #[test]
    fn output_is_sorted_and_unique() {
        let index = index_with_roots(json!([{
            "path": PREFIX,
            "title": "HIG",
            "type": "module",
            "children": [
                { "path": format!("{PREFIX}/zeta"), "title": "Zeta", "type": "article" },
                { "path": format!("{PREFIX}/alpha"), "title": "Alpha", "type": "article" },
            ],
        }]));

        let nodes = collect_nodes(&index, "swift", PREFIX);
        let paths: Vec<&str> = nodes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                PREFIX,
                "/design/human-interface-guidelines/alpha",
                "/design/human-interface-guidelines/zeta",
            ]
        );
    }

    #[test]
    fn duplicate_paths_keep_last_visited() {
        let index = index_with_roots(json!([{
            "path": PREFIX,
            "title": "HIG",
            "type": "module",
            "children": [
                { "path": format!("{PREFIX}/color"), "title": "First", "type": "article" },
                { "path": format!("{PREFIX}/color"), "title": "Second", "type": "symbol" },
            ],
        }]));

        let nodes = collect_nodes(&index, "swift", PREFIX);
        let color = nodes.iter().find(|n| n.path.ends_with("/color")).unwrap();
        assert_eq!(color.title, "Second");
        assert_eq!(color.kind, "symbol");
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn out_of_scope_paths_are_dropped() {
        let index = index_with_roots(json!([{
            "path": "/documentation/swiftui",
            "title": "SwiftUI",
            "type": "module",
            "children": [
                { "path": format!("{PREFIX}/buttons"), "title": "Buttons", "type": "article" },
            ],
        }]));

        let nodes = collect_nodes(&index, "swift", PREFIX);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path, "/design/human-interface-guidelines/buttons");
        // The rejected root never became a parent.
        assert_eq!(nodes[0].parent_path, None);
    }

    #[test]
    fn parent_skips_unaccepted_intermediate_nodes() {
        let index = index_with_roots(json!([{
            "path": PREFIX,
            "title": "HIG",
            "type": "module",
            "children": [{
                "path": "/elsewhere/grouping",
                "title": "Grouping",
                "type": "groupMarker",
                "children": [
                    { "path": format!("{PREFIX}/layout"), "title": "Layout", "type": "article" },
                ],
            }],
        }]));

        let nodes = collect_nodes(&index, "swift", PREFIX);
        let layout = nodes.iter().find(|n| n.path.ends_with("/layout")).unwrap();
        assert_eq!(layout.parent_path.as_deref(), Some(PREFIX));
    }

    #[test]
    fn title_and_kind_fallbacks() {
        let index = index_with_roots(json!([
            { "path": format!("{PREFIX}/motion"), "type": 7 },
        ]));

        let nodes = collect_nodes(&index, "swift", PREFIX);
        assert_eq!(nodes[0].title, "motion");
        assert_eq!(nodes[0].kind, "unknown");
    }

    #[test]
    fn malformed_index_yields_empty() {
        assert!(collect_nodes(&json!({}), "swift", PREFIX).is_empty());
        assert!(collect_nodes(&json!({ "interfaceLanguages": 5 }), "swift", PREFIX).is_empty());
        let index = json!({ "interfaceLanguages": { "swift": "not a list" } });
        assert!(collect_nodes(&index, "swift", PREFIX).is_empty());
    }

    #[test]
    fn non_object_children_are_ignored() {
        let index = index_with_roots(json!([{
            "path": format!("{PREFIX}/typography"),
            "title": "Typography",
            "type": "article",
            "children": ["stray", 9, null],
        }]));
        assert_eq!(collect_nodes(&index, "swift", PREFIX).len(), 1);
    }
}
