//! Binding smoke tests: the Sable tables load through the public accessor.

use tree_sitter_sable::{load_and_check, Language, LanguageError, LanguageFn, LANGUAGE};

#[test]
fn test_can_load_grammar() {
    let language = Language::new(LANGUAGE);
    assert!(language.is_ok(), "Error loading Sable grammar");
}

#[test]
fn test_load_is_idempotent() {
    let first = load_and_check(LANGUAGE).expect("Error loading Sable grammar");
    let second = load_and_check(LANGUAGE).expect("Error loading Sable grammar");
    assert_eq!(first, second);
    assert_eq!(tree_sitter_sable::language(), first);
}

#[test]
fn test_missing_tables_name_the_grammar() {
    let broken = LanguageFn::from_fn(|| None);
    let err = load_and_check(broken).unwrap_err();
    assert_eq!(err.source, LanguageError::MissingTables);
    assert!(err.to_string().contains("Sable"));
}

#[test]
fn test_sable_node_kinds() {
    let language = tree_sitter_sable::language();
    assert_eq!(language.name(), "sable");
    assert_eq!(language.node_kind_count(), 3);
    assert_eq!(language.node_kind_for_id(0), Some("end"));

    let root = language.id_for_node_kind("source_file", true);
    assert_eq!(root, language.start_symbol());
    assert!(language.node_kind_is_named(root));
    assert!(language.node_kind_is_visible(root));

    let hello = language.id_for_node_kind("hello", false);
    assert_ne!(hello, 0);
    assert!(!language.node_kind_is_named(hello));
    assert_eq!(language.id_for_node_kind("missing", true), 0);
    assert_eq!(language.field_count(), 0);
}

#[test]
fn test_language_is_shareable_across_threads() {
    let language = tree_sitter_sable::language();
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || language.node_kind_for_id(language.start_symbol())))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some("source_file"));
    }
}

#[test]
fn test_node_types() {
    let types = tree_sitter_sable::language().node_types();
    assert_eq!(types.len(), 2);
    assert_eq!(types[0].kind, "source_file");
    assert!(types[0].named && types[0].root);
    assert_eq!(types[1].kind, "hello");
    assert!(!types[1].named);
}
