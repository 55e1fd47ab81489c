//! Rule combinators mirroring the `grammar.js` DSL.
//!
//! Each function builds one [`Rule`] node, so a grammar reads the same in Rust
//! as it does in a `grammar.js` file:
//!
//! ```
//! use tree_sitter_sable::grammar::dsl::{choice, pattern, seq, string, sym};
//!
//! let rule = seq([string("let"), sym("identifier"), choice([string("="), pattern(":=")])]);
//! assert_eq!(rule.members.len(), 3);
//! ```

use super::rules::{Rule, RuleType, RuleValue};

/// An empty production.
#[must_use]
pub fn blank() -> Rule {
    Rule::of_type(RuleType::Blank)
}

/// A literal token, e.g. `"if"`.
#[must_use]
pub fn string(value: impl Into<String>) -> Rule {
    Rule {
        value: Some(RuleValue::String(value.into())),
        ..Rule::of_type(RuleType::String)
    }
}

/// A regular-expression token.
#[must_use]
pub fn pattern(value: impl Into<String>) -> Rule {
    Rule {
        value: Some(RuleValue::String(value.into())),
        ..Rule::of_type(RuleType::Pattern)
    }
}

/// A reference to the rule called `name` (`$.name` in `grammar.js`).
#[must_use]
pub fn sym(name: impl Into<String>) -> Rule {
    Rule {
        name: Some(name.into()),
        ..Rule::of_type(RuleType::Symbol)
    }
}

/// The members in order.
#[must_use]
pub fn seq(members: impl IntoIterator<Item = Rule>) -> Rule {
    Rule {
        members: members.into_iter().collect(),
        ..Rule::of_type(RuleType::Seq)
    }
}

/// Exactly one of the members.
#[must_use]
pub fn choice(members: impl IntoIterator<Item = Rule>) -> Rule {
    Rule {
        members: members.into_iter().collect(),
        ..Rule::of_type(RuleType::Choice)
    }
}

/// `rule` or nothing. Desugars to `choice([rule, blank()])` as tree-sitter does.
#[must_use]
pub fn optional(rule: Rule) -> Rule {
    choice([rule, blank()])
}

/// Zero or more repetitions.
#[must_use]
pub fn repeat(rule: Rule) -> Rule {
    wrap(RuleType::Repeat, rule)
}

/// One or more repetitions.
#[must_use]
pub fn repeat1(rule: Rule) -> Rule {
    wrap(RuleType::Repeat1, rule)
}

/// Numeric precedence.
#[must_use]
pub fn prec(level: i32, rule: Rule) -> Rule {
    with_precedence(RuleType::Prec, level, rule)
}

/// Left-associative precedence.
#[must_use]
pub fn prec_left(level: i32, rule: Rule) -> Rule {
    with_precedence(RuleType::PrecLeft, level, rule)
}

/// Right-associative precedence.
#[must_use]
pub fn prec_right(level: i32, rule: Rule) -> Rule {
    with_precedence(RuleType::PrecRight, level, rule)
}

/// Precedence resolved at parse time.
#[must_use]
pub fn prec_dynamic(level: i32, rule: Rule) -> Rule {
    with_precedence(RuleType::PrecDynamic, level, rule)
}

/// Labels `rule` with the field `name`.
#[must_use]
pub fn field(name: impl Into<String>, rule: Rule) -> Rule {
    Rule {
        name: Some(name.into()),
        ..wrap(RuleType::Field, rule)
    }
}

/// Renames the node produced by `rule`.
#[must_use]
pub fn alias(rule: Rule, name: impl Into<String>, named: bool) -> Rule {
    Rule {
        value: Some(RuleValue::String(name.into())),
        named: Some(named),
        ..wrap(RuleType::Alias, rule)
    }
}

/// Lexes `rule` as a single token.
#[must_use]
pub fn token(rule: Rule) -> Rule {
    wrap(RuleType::Token, rule)
}

/// A token that may not be preceded by extras.
#[must_use]
pub fn immediate_token(rule: Rule) -> Rule {
    wrap(RuleType::ImmediateToken, rule)
}

fn wrap(rule_type: RuleType, content: Rule) -> Rule {
    Rule {
        content: Some(Box::new(content)),
        ..Rule::of_type(rule_type)
    }
}

fn with_precedence(rule_type: RuleType, level: i32, content: Rule) -> Rule {
    Rule {
        value: Some(RuleValue::Integer(level)),
        ..wrap(rule_type, content)
    }
}
