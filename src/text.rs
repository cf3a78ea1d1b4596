use serde_json::Value;

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize_space(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flatten every `"text"` string leaf in a page document into one blob.
///
/// Fragments are collected depth-first, whitespace-normalized, and joined
/// with blank lines. Only immediately adjacent duplicates are collapsed;
/// a heading that legitimately repeats later in the page survives.
pub fn extract_full_text(page: &Value) -> String {
    let mut fragments = Vec::new();
    collect_text_fragments(page, &mut fragments);

    let mut compact: Vec<String> = Vec::new();
    for fragment in fragments {
        if compact.last().map(String::as_str) != Some(fragment.as_str()) {
            compact.push(fragment);
        }
    }

    compact.join("\n\n")
}

fn collect_text_fragments(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "text" {
                    if let Some(s) = child.as_str() {
                        let text = normalize_space(s);
                        if !text.is_empty() {
                            out.push(text);
                        }
                        continue;
                    }
                }
                collect_text_fragments(child, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_text_fragments(child, out);
            }
        }
        _ => {}
    }
}

/// Pull a page's abstract from its top-level `abstract` field.
///
/// The field is either a plain string or a list of inline content items
/// (strings, or objects carrying a `text` string). Anything else yields
/// an empty abstract.
pub fn extract_abstract(page: &Value) -> String {
    match page.get("abstract") {
        Some(Value::String(s)) => normalize_space(s),
        Some(Value::Array(items)) => {
            let mut parts: Vec<&str> = Vec::new();
            for item in items {
                match item {
                    Value::String(s) => parts.push(s),
                    Value::Object(map) => {
                        if let Some(text) = map.get("text").and_then(Value::as_str) {
                            parts.push(text);
                        }
                    }
                    _ => {}
                }
            }
            if parts.is_empty() {
                String::new()
            } else {
                normalize_space(&parts.join(" "))
            }
        }
        _ => String::new(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_collapses_runs_and_trims() {
        assert_eq!(normalize_space("  foo\n\tbar  "), "foo bar");
        assert_eq!(normalize_space(""), "");
        assert_eq!(normalize_space("   "), "");
    }

    #[test]
    fn adjacent_duplicates_collapse_only() {
        let page = json!([
            { "text": "A" },
            { "text": "A" },
            { "text": "B" },
            { "text": "A" },
        ]);
        assert_eq!(extract_full_text(&page), "A\n\nB\n\nA");
    }

    #[test]
    fn recurses_through_non_text_keys() {
        let page = json!({
            "sections": [
                { "content": { "text": "First" } },
                { "items": [{ "inline": { "text": "Second" } }] },
            ],
            "metadata": { "title": "ignored scalar" },
        });
        assert_eq!(extract_full_text(&page), "First\n\nSecond");
    }

    #[test]
    fn non_string_text_values_are_recursed_not_emitted() {
        // A "text" key holding an object is not a leaf; its own leaves count.
        let page = json!({ "text": { "text": "deep" } });
        assert_eq!(extract_full_text(&page), "deep");

        let page = json!({ "text": 42 });
        assert_eq!(extract_full_text(&page), "");
    }

    #[test]
    fn empty_fragments_are_dropped() {
        let page = json!([{ "text": "   " }, { "text": "kept" }]);
        assert_eq!(extract_full_text(&page), "kept");
    }

    #[test]
    fn flatten_is_idempotent_on_normalized_output() {
        let page = json!({ "content": { "text": "Choose  a clear\nlayout" } });
        let rendered = extract_full_text(&page);
        assert_eq!(rendered, "Choose a clear layout");

        let again = extract_full_text(&json!({ "text": rendered.clone() }));
        assert_eq!(again, rendered);
    }

    #[test]
    fn no_fragments_yields_empty_string() {
        assert_eq!(extract_full_text(&json!({ "a": 1, "b": [true, null] })), "");
        assert_eq!(extract_full_text(&json!("bare string")), "");
    }

    #[test]
    fn abstract_from_string() {
        let page = json!({ "abstract": "  A  concise\nsummary " });
        assert_eq!(extract_abstract(&page), "A concise summary");
    }

    #[test]
    fn abstract_from_mixed_list() {
        let page = json!({
            "abstract": [
                { "type": "text", "text": "Design" },
                "great",
                { "type": "codeVoice" },
                { "text": "apps." },
            ]
        });
        assert_eq!(extract_abstract(&page), "Design great apps.");
    }

    #[test]
    fn abstract_missing_or_wrong_type() {
        assert_eq!(extract_abstract(&json!({})), "");
        assert_eq!(extract_abstract(&json!({ "abstract": 3 })), "");
        assert_eq!(extract_abstract(&json!({ "abstract": [1, null] })), "");
    }
}
