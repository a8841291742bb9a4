//! Comment-stripping extractor.

/// Line-comment marker used by the runtime's declaration sources.
pub const DEFAULT_MARKER: &str = "//";

/// Collect the body of every directive line in `source`, in order.
///
/// A directive line is one whose trimmed text starts with `marker`. The
/// marker is removed and the remainder trimmed. Code lines and trailing
/// comments are never emitted. With the `//` marker, Rust doc comments
/// (`///`, `//!`) are documentation and are skipped.
pub fn extract(source: &str, marker: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| directive_body(line, marker))
        .map(str::to_string)
        .collect()
}

fn directive_body<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.trim().strip_prefix(marker)?;
    if marker == DEFAULT_MARKER && (rest.starts_with('/') || rest.starts_with('!')) {
        return None;
    }
    Some(rest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_directive_and_skips_code() {
        let source = "// (def foo 1)\nconst FOO: u8 = 1;\n";
        assert_eq!(extract(source, DEFAULT_MARKER), vec!["(def foo 1)"]);
    }

    #[test]
    fn strips_indentation_and_inner_whitespace() {
        let source = "    //    (defun (f: nil) [])   \n\tlet x = 1; // trailing\n";
        assert_eq!(extract(source, DEFAULT_MARKER), vec!["(defun (f: nil) [])"]);
    }

    #[test]
    fn skips_rust_doc_comments() {
        let source = "//! crate docs\n/// item docs\n// (def a 0)\n";
        assert_eq!(extract(source, DEFAULT_MARKER), vec!["(def a 0)"]);
    }

    #[test]
    fn keeps_source_order_and_empty_bodies() {
        let source = "// b\nfn x() {}\n//\n// a\n";
        assert_eq!(extract(source, DEFAULT_MARKER), vec!["b", "", "a"]);
    }

    #[test]
    fn honors_custom_marker() {
        let source = "# (def x 2)\n// (def y 3)\n";
        assert_eq!(extract(source, "#"), vec!["(def x 2)"]);
    }
}
