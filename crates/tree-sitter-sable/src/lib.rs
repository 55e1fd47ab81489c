//! The Sable grammar for a Rust-native tree-sitter.
//!
//! The grammar is declared in Rust, validated, and compiled into
//! [`ParseTables`]. A [`Language`] handle wraps those tables for consumers:
//!
//! ```
//! let language = tree_sitter_sable::load_and_check(tree_sitter_sable::LANGUAGE)
//!     .expect("Error loading Sable grammar");
//! assert_eq!(language.node_kind_for_id(language.start_symbol()), Some("source_file"));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// Grammar declaration: the rule model, the `grammar.js`-style DSL and the
/// builder.
///
/// This module defines how a language's declarative shape is represented.
/// Everything else in the crate builds upon these types.
pub mod grammar;

/// Grammar validation and consistency checking.
///
/// Validation protects table compilation from malformed grammars: it enforces
/// Tree-sitter's invariants before any symbol id is assigned.
pub mod validate;

/// Compilation of grammars into parse tables.
pub mod tables;

/// Language handles.
pub mod language;

/// The Sable binding.
pub mod sable;

pub use grammar::{Grammar, GrammarBuilder, GrammarError, Rule};
pub use language::{Language, LanguageError, LanguageFn, NodeType};
pub use sable::{
    grammar as sable_grammar, language, load_and_check, LoadError, GRAMMAR_JSON, LANGUAGE,
    NODE_TYPES,
};
pub use tables::{compile, ParseTables};
pub use validate::{validate, ValidationError};
