//! Validation routines for grammars.
//!
//! This module performs structural checks over [`Grammar`](crate::grammar::Grammar)
//! definitions before they are compiled: every referenced symbol must be
//! defined, rule names must be unique identifiers, combinators must have
//! members and tokens must not match the empty string. Softer findings
//! (unreachable rules, left recursion, mixed precedence levels) are logged.

use crate::grammar::{Grammar, Rule, RuleType};
use std::collections::{HashMap, HashSet};

/// Represents a validation failure encountered when checking a grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The grammar declares no rules at all.
    #[error("grammar '{grammar}' has no rules")]
    EmptyGrammar {
        /// The grammar name.
        grammar: String,
    },

    /// Two rules share a name.
    #[error("rule '{name}' is defined more than once")]
    DuplicateRule {
        /// The repeated rule name.
        name: String,
    },

    /// A rule name is not a valid identifier.
    #[error("rule name '{name}' is not a valid identifier")]
    InvalidRuleName {
        /// The offending name.
        name: String,
    },

    /// A symbol is referenced but never defined.
    #[error("undefined symbol '{name}' referenced in {context}")]
    UndefinedSymbol {
        /// The missing symbol.
        name: String,
        /// Where the reference occurs, e.g. `rule 'expression'`.
        context: String,
    },

    /// A `SEQ` or `CHOICE` without members.
    #[error("{kind} without members in rule '{rule}'")]
    EmptyCombinator {
        /// `SEQ` or `CHOICE`.
        kind: &'static str,
        /// The enclosing rule.
        rule: String,
    },

    /// A literal or pattern token that matches the empty string.
    #[error("empty {kind} token in rule '{rule}'")]
    EmptyToken {
        /// `STRING` or `PATTERN`.
        kind: &'static str,
        /// The enclosing rule.
        rule: String,
    },
}

/// Performs semantic validation of a [`Grammar`](crate::grammar::Grammar).
///
/// This function runs several consistency passes over the grammar:
///
/// - Checks that the grammar has rules and that their names are unique identifiers.
/// - Checks that all referenced symbols are defined.
/// - Rejects empty combinators and empty tokens.
/// - Warns about unreachable rules.
/// - Reports immediate left recursion.
/// - Warns about inconsistent precedence.
///
/// # Errors
///
/// Returns the first [`ValidationError`] detected.
pub fn validate(grammar: &Grammar) -> Result<(), ValidationError> {
    check_rule_names(grammar)?;

    check_undefined_symbols(grammar)?;

    check_rule_shapes(grammar)?;

    check_unreachable_rules(grammar);

    check_left_recursion(grammar);

    check_precedence(grammar);

    Ok(())
}

fn check_rule_names(grammar: &Grammar) -> Result<(), ValidationError> {
    if grammar.rules.is_empty() {
        return Err(ValidationError::EmptyGrammar {
            grammar: grammar.name.clone(),
        });
    }

    let mut seen = HashSet::new();
    for definition in &grammar.rules {
        if !is_identifier(&definition.name) {
            return Err(ValidationError::InvalidRuleName {
                name: definition.name.clone(),
            });
        }
        if !seen.insert(definition.name.as_str()) {
            return Err(ValidationError::DuplicateRule {
                name: definition.name.clone(),
            });
        }
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_undefined_symbols(grammar: &Grammar) -> Result<(), ValidationError> {
    let defined: HashSet<&str> = grammar
        .rules
        .iter()
        .map(|d| d.name.as_str())
        .chain(external_names(grammar))
        .collect();

    for definition in &grammar.rules {
        check_rule_symbols(&definition.rule, &defined, &format!("rule '{}'", definition.name))?;
    }
    for extra in &grammar.extras {
        check_rule_symbols(extra, &defined, "extras")?;
    }

    let declared = grammar
        .word
        .iter()
        .map(|name| (name, "word"))
        .chain(grammar.inline.iter().map(|name| (name, "inline")))
        .chain(grammar.supertypes.iter().map(|name| (name, "supertypes")))
        .chain(grammar.conflicts.iter().flatten().map(|name| (name, "conflicts")));
    for (name, context) in declared {
        if !defined.contains(name.as_str()) {
            return Err(ValidationError::UndefinedSymbol {
                name: name.clone(),
                context: context.to_string(),
            });
        }
    }

    Ok(())
}

/// Names of the externally scanned tokens, which rules may reference like rules.
fn external_names(grammar: &Grammar) -> impl Iterator<Item = &str> {
    grammar
        .externals
        .iter()
        .filter_map(|external| external.symbol_name().or(external.string_value()))
}

fn check_rule_symbols(
    rule: &Rule,
    defined: &HashSet<&str>,
    context: &str,
) -> Result<(), ValidationError> {
    if let Some(name) = rule.symbol_name() {
        if !defined.contains(name) {
            return Err(ValidationError::UndefinedSymbol {
                name: name.to_string(),
                context: context.to_string(),
            });
        }
    }
    for child in rule.children() {
        check_rule_symbols(child, defined, context)?;
    }
    Ok(())
}

fn check_rule_shapes(grammar: &Grammar) -> Result<(), ValidationError> {
    for definition in &grammar.rules {
        check_shape(&definition.rule, &definition.name)?;
    }
    Ok(())
}

fn check_shape(rule: &Rule, context: &str) -> Result<(), ValidationError> {
    match rule.rule_type {
        RuleType::Choice | RuleType::Seq if rule.members.is_empty() => {
            return Err(ValidationError::EmptyCombinator {
                kind: rule.type_name(),
                rule: context.to_string(),
            });
        }
        RuleType::String | RuleType::Pattern
            if rule.string_value().or(rule.pattern_value()).unwrap_or_default().is_empty() =>
        {
            return Err(ValidationError::EmptyToken {
                kind: rule.type_name(),
                rule: context.to_string(),
            });
        }
        _ => {}
    }
    for child in rule.children() {
        check_shape(child, context)?;
    }
    Ok(())
}

fn check_unreachable_rules(grammar: &Grammar) {
    let Some(entry_point) = grammar.start_rule() else {
        return;
    };

    let mut reachable = HashSet::new();
    let mut to_visit = vec![entry_point.name.as_str()];
    to_visit.extend(external_names(grammar));
    for extra in &grammar.extras {
        collect_referenced_symbols(extra, &mut to_visit);
    }

    while let Some(rule_name) = to_visit.pop() {
        if !reachable.insert(rule_name) {
            continue; // Already visited
        }

        if let Some(rule) = grammar.rule(rule_name) {
            collect_referenced_symbols(rule, &mut to_visit);
        }
    }

    for definition in &grammar.rules {
        let name = definition.name.as_str();
        let is_word = grammar.word.as_deref() == Some(name);
        if !reachable.contains(name) && !is_word && !grammar.inline.iter().any(|n| n == name) {
            tracing::warn!(grammar = %grammar.name, rule = name, "unreachable rule");
        }
    }
}

fn collect_referenced_symbols<'g>(rule: &'g Rule, symbols: &mut Vec<&'g str>) {
    if let Some(name) = rule.symbol_name() {
        symbols.push(name);
    }
    for child in rule.children() {
        collect_referenced_symbols(child, symbols);
    }
}

fn check_left_recursion(grammar: &Grammar) {
    for definition in &grammar.rules {
        if has_immediate_left_recursion(&definition.rule, &definition.name) {
            tracing::debug!(grammar = %grammar.name, rule = %definition.name, "rule is left-recursive");
        }
    }
}

fn has_immediate_left_recursion(rule: &Rule, target: &str) -> bool {
    match rule.rule_type {
        RuleType::Symbol => rule.name.as_deref() == Some(target),

        RuleType::Seq => rule
            .members
            .first()
            .is_some_and(|first| has_immediate_left_recursion(first, target)),

        RuleType::Choice => rule
            .members
            .iter()
            .any(|member| has_immediate_left_recursion(member, target)),

        RuleType::Prec
        | RuleType::PrecLeft
        | RuleType::PrecRight
        | RuleType::PrecDynamic
        | RuleType::Field
        | RuleType::Alias => rule
            .content
            .as_deref()
            .is_some_and(|content| has_immediate_left_recursion(content, target)),

        _ => false,
    }
}

fn check_precedence(grammar: &Grammar) {
    let mut prec_levels: HashMap<&str, Vec<i32>> = HashMap::new();

    for definition in &grammar.rules {
        collect_precedence_levels(&definition.rule, &mut prec_levels, &definition.name);
    }

    for (rule, levels) in &prec_levels {
        if levels.len() > 1 {
            tracing::warn!(grammar = %grammar.name, rule, ?levels, "rule has multiple precedence levels");
        }
    }
}

fn collect_precedence_levels<'g>(
    rule: &Rule,
    levels: &mut HashMap<&'g str, Vec<i32>>,
    context: &'g str,
) {
    if let Some(p) = rule.precedence() {
        let entry = levels.entry(context).or_default();
        if !entry.contains(&p) {
            entry.push(p);
        }
    }
    for child in rule.children() {
        collect_precedence_levels(child, levels, context);
    }
}
