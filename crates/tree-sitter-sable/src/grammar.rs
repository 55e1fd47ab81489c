//! Core structures for declaring Tree-sitter grammars in Rust.
//!
//! This module defines the internal representation of a grammar. Its shape
//! mirrors the `grammar.json` file that `tree-sitter generate` emits, and
//! [`grammar_json`] writes a grammar back out in that schema.

use crate::validate::ValidationError;

pub mod dsl;
mod json;
mod rules;

pub use rules::{Rule, RuleType, RuleValue};

/// Represents a full Tree-sitter grammar definition.
///
/// `Grammar` is the root artifact of the pipeline. It holds the rule set along
/// with the auxiliary metadata (extras, precedences, conflicts, supertypes)
/// that together define a language's formal structure. The first rule in
/// [`rules`](Self::rules) is the start rule.
///
/// See <https://tree-sitter.github.io/tree-sitter/assets/schemas/grammar.schema.json>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    /// The short name of the grammar (e.g. `"sable"`).
    pub name: String,

    /// Optional name of a base grammar that this one inherits from.
    pub inherits: Option<String>,

    /// All rule definitions, in declaration order.
    pub rules: Vec<RuleDefinition>,

    /// “Extras” that may appear between other tokens, such as whitespace or comments.
    pub extras: Vec<Rule>,

    /// Rules implemented externally via a scanner.
    pub externals: Vec<Rule>,

    /// Names of rules that should be inlined into other rules.
    pub inline: Vec<String>,

    /// Precedence declarations that control operator binding order.
    pub precedences: Vec<Vec<Precedence>>,

    /// Explicit conflict groups expected during parsing.
    pub conflicts: Vec<Vec<String>>,

    /// The special rule name used to identify word tokens (keywords, identifiers, etc.).
    pub word: Option<String>,

    /// A list of node supertypes, grouping related syntactic forms.
    pub supertypes: Vec<String>,
}

/// A named rule: one `name: $ => ...` entry of `grammar.js`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    /// The rule name.
    pub name: String,

    /// The rule body.
    pub rule: Rule,
}

/// A single precedence entry, either a named symbol or a literal string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precedence {
    /// A literal precedence string.
    String(String),

    /// A symbolic precedence name.
    Symbol {
        /// The identifier of the referenced symbol.
        name: String,
    },
}

/// Possible errors raised while turning a grammar into parse tables.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// Structural or semantic validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The grammar needs more symbols than a 16-bit symbol id can address.
    #[error("grammar defines {count} symbols, more than the 65535 a symbol id can address")]
    TooManySymbols {
        /// How many symbols the grammar would need.
        count: usize,
    },
}

impl Grammar {
    /// Looks up a rule body by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|definition| definition.name == name)
            .map(|definition| &definition.rule)
    }

    /// Returns the start rule, which by convention is the first one declared.
    #[must_use]
    pub fn start_rule(&self) -> Option<&RuleDefinition> {
        self.rules.first()
    }

    /// Returns `true` if a rule called `name` is defined.
    #[must_use]
    pub fn defines(&self, name: &str) -> bool {
        self.rule(name).is_some()
    }
}

/// Incremental construction of a [`Grammar`], in the spirit of `grammar({...})`.
///
/// ```
/// use tree_sitter_sable::grammar::{dsl::{pattern, string}, GrammarBuilder};
///
/// let grammar = GrammarBuilder::new("demo")
///     .rule("source_file", string("hello"))
///     .extra(pattern(r"\s"))
///     .build();
/// assert_eq!(grammar.start_rule().map(|r| r.name.as_str()), Some("source_file"));
/// ```
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    grammar: Grammar,
}

impl GrammarBuilder {
    /// Starts an empty grammar called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            grammar: Grammar {
                name: name.into(),
                inherits: None,
                rules: Vec::new(),
                extras: Vec::new(),
                externals: Vec::new(),
                inline: Vec::new(),
                precedences: Vec::new(),
                conflicts: Vec::new(),
                word: None,
                supertypes: Vec::new(),
            },
        }
    }

    /// Appends a rule. The first rule appended becomes the start rule.
    #[must_use]
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.grammar.rules.push(RuleDefinition {
            name: name.into(),
            rule,
        });
        self
    }

    /// Adds a rule that may appear between any two tokens.
    #[must_use]
    pub fn extra(mut self, rule: Rule) -> Self {
        self.grammar.extras.push(rule);
        self
    }

    /// Adds an externally scanned token.
    #[must_use]
    pub fn external(mut self, rule: Rule) -> Self {
        self.grammar.externals.push(rule);
        self
    }

    /// Sets the keyword-extraction word rule.
    #[must_use]
    pub fn word(mut self, name: impl Into<String>) -> Self {
        self.grammar.word = Some(name.into());
        self
    }

    /// Marks a rule for inlining.
    #[must_use]
    pub fn inline(mut self, name: impl Into<String>) -> Self {
        self.grammar.inline.push(name.into());
        self
    }

    /// Marks a rule as a supertype.
    #[must_use]
    pub fn supertype(mut self, name: impl Into<String>) -> Self {
        self.grammar.supertypes.push(name.into());
        self
    }

    /// Declares an expected conflict between the named rules.
    #[must_use]
    pub fn conflict<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.grammar
            .conflicts
            .push(names.into_iter().map(Into::into).collect());
        self
    }

    /// Declares an ordered precedence group.
    #[must_use]
    pub fn precedences(mut self, group: impl IntoIterator<Item = Precedence>) -> Self {
        self.grammar.precedences.push(group.into_iter().collect());
        self
    }

    /// Finishes the grammar. Nothing is checked here; see [`validate`](crate::validate()).
    #[must_use]
    pub fn build(self) -> Grammar {
        self.grammar
    }
}

/// Serializes a grammar to JSON in the `src/grammar.json` schema: `rules` is
/// an object keyed by rule name in declaration order, rule values are bare
/// strings or integers, and unset rule properties are omitted.
#[must_use]
pub fn grammar_json(grammar: &Grammar) -> String {
    json::write_grammar(grammar)
}
