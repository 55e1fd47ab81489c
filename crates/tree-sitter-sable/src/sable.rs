//! The Sable grammar and its binding surface.
//!
//! Sable is a compiled language inspired by C, Rust and Swift. Its grammar is
//! still a placeholder upstream: a source file is the single word `hello`.

use crate::grammar::dsl::string;
use crate::grammar::{grammar_json, Grammar, GrammarBuilder, GrammarError};
use crate::language::{Language, LanguageError, LanguageFn};
use crate::tables::{compile, ParseTables};
use std::sync::LazyLock;

/// How the grammar is named in diagnostics.
pub const DISPLAY_NAME: &str = "Sable";

/// Declares the Sable grammar.
#[must_use]
pub fn grammar() -> Grammar {
    GrammarBuilder::new("sable")
        .rule("source_file", string("hello"))
        .build()
}

static TABLES: LazyLock<Result<ParseTables, GrammarError>> = LazyLock::new(|| compile(&grammar()));

fn tables() -> Option<&'static ParseTables> {
    match &*TABLES {
        Ok(tables) => Some(tables),
        Err(err) => {
            tracing::error!(%err, "failed to compile the sable grammar");
            None
        }
    }
}

/// The tree-sitter-style accessor for the Sable tables.
///
/// ```
/// let language = tree_sitter_sable::Language::new(tree_sitter_sable::LANGUAGE)
///     .expect("Error loading Sable grammar");
/// assert_eq!(language.name(), "sable");
/// ```
pub const LANGUAGE: LanguageFn = LanguageFn::from_fn(tables);

/// The content of the node-types listing for Sable, as JSON.
///
/// Empty when the tables fail to load; use [`load_and_check`] to see why.
pub static NODE_TYPES: LazyLock<String> = LazyLock::new(|| {
    Language::new(LANGUAGE)
        .map(|language| language.node_types_json())
        .unwrap_or_default()
});

/// The Sable grammar in the `grammar.json` schema.
pub static GRAMMAR_JSON: LazyLock<String> = LazyLock::new(|| grammar_json(&grammar()));

/// Failure to load a grammar, reported with the grammar's display name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error loading {grammar} grammar: {source}")]
pub struct LoadError {
    /// Display name of the grammar that failed to load.
    pub grammar: &'static str,

    /// Why the language handle could not be built.
    #[source]
    pub source: LanguageError,
}

/// Builds a language handle from `language` and checks that it is usable.
///
/// Pass [`LANGUAGE`] for the regular binding; any other accessor is treated as
/// a stand-in for the Sable tables.
///
/// # Errors
///
/// Returns a [`LoadError`] naming the Sable grammar when no handle can be built.
pub fn load_and_check(language: LanguageFn) -> Result<Language, LoadError> {
    Language::new(language).map_err(|source| {
        let err = LoadError {
            grammar: DISPLAY_NAME,
            source,
        };
        tracing::error!(%err, "language check failed");
        err
    })
}

/// Returns the Sable language handle.
///
/// # Panics
///
/// Panics with the load diagnostic when the tables cannot be loaded, which
/// only happens when the grammar itself is broken.
#[must_use]
pub fn language() -> Language {
    load_and_check(LANGUAGE).unwrap_or_else(|err| panic!("{err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::SymbolKind;

    #[test]
    fn test_grammar_shape() {
        let grammar = grammar();
        assert_eq!(grammar.name, "sable");
        assert_eq!(grammar.rules.len(), 1);
        let start = grammar.start_rule().unwrap();
        assert_eq!(start.name, "source_file");
        assert_eq!(start.rule.string_value(), Some("hello"));
    }

    #[test]
    fn test_tables() {
        let tables = LANGUAGE.tables().unwrap();
        let kinds: Vec<_> = tables.symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("end", SymbolKind::End),
                ("hello", SymbolKind::Terminal),
                ("source_file", SymbolKind::NonTerminal),
            ]
        );
        assert_eq!(tables.start_symbol, 2);
        assert!(tables.field_names.is_empty());
    }

    #[test]
    fn test_accessor_returns_one_artifact() {
        let first = LANGUAGE.tables().unwrap();
        let second = LANGUAGE.tables().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_load_error_message() {
        let err = load_and_check(LanguageFn::from_fn(|| None)).unwrap_err();
        assert_eq!(err.grammar, "Sable");
        assert_eq!(
            err.to_string(),
            "Error loading Sable grammar: the language accessor returned no parse tables"
        );
    }

    #[test]
    fn test_node_types_listing() {
        assert!(NODE_TYPES.contains("source_file"));
        assert!(NODE_TYPES.contains("hello"));
    }

    #[test]
    fn test_grammar_json() {
        assert_eq!(
            *GRAMMAR_JSON,
            concat!(
                r#"{"name":"sable","rules":{"source_file":{"type":"STRING","value":"hello"}},"#,
                r#""extras":[],"conflicts":[],"precedences":[],"externals":[],"inline":[],"supertypes":[]}"#,
            )
        );
    }
}
