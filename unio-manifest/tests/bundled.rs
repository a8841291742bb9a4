//! The runtime's own declaration sources produce the expected manifest.

use unio_manifest::BUNDLED_SOURCES;
use unio_manifest::directive::parse_all;
use unio_manifest::extract::{DEFAULT_MARKER, extract};
use unio_manifest::signature::resolve;

fn bundled_directives() -> Vec<String> {
    BUNDLED_SOURCES
        .iter()
        .flat_map(|(_, source)| extract(source, DEFAULT_MARKER))
        .collect()
}

#[test]
fn every_bundled_directive_parses() {
    let directives = bundled_directives();
    assert!(!directives.is_empty());
    assert!(directives.iter().all(|d| d.starts_with("(def")), "{directives:?}");
    parse_all(&directives).expect("parse");
}

#[test]
fn declares_the_eight_facade_operations() {
    let manifest = resolve(&parse_all(&bundled_directives()).expect("parse")).expect("resolve");
    let summary: Vec<(&str, usize, bool)> = manifest
        .functions
        .iter()
        .map(|sig| (sig.name.as_str(), sig.arity, sig.is_async))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("open", 2, false),
            ("close", 1, false),
            ("read", 1, true),
            ("write", 2, true),
            ("unlink", 1, false),
            ("listen", 1, false),
            ("accept", 1, true),
            ("connect", 1, true),
        ]
    );
}

#[test]
fn open_flag_constants_come_first_in_tag_order() {
    let manifest = resolve(&parse_all(&bundled_directives()).expect("parse")).expect("resolve");
    let constants: Vec<(&str, i64)> = manifest
        .constants
        .iter()
        .map(|c| (c.name.as_str(), c.value))
        .collect();
    assert_eq!(
        constants,
        vec![
            ("open_read", 0),
            ("open_write", 1),
            ("open_append", 2),
            ("open_truncate", 3),
            ("open_create", 4),
            ("open_create_new", 5),
        ]
    );
}
