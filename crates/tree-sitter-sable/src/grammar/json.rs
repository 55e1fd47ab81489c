//! Writer for the `grammar.json` schema.
//!
//! The schema keys `rules` by name and stores rule values untagged, neither of
//! which the derived encoding of [`Rule`] produces, so objects are assembled
//! here and only scalars go through [`facet_json`].

use super::{Grammar, Precedence, Rule, RuleType, RuleValue};

pub(super) fn write_grammar(grammar: &Grammar) -> String {
    let mut fields = vec![("name", quote(&grammar.name))];
    if let Some(inherits) = &grammar.inherits {
        fields.push(("inherits", quote(inherits)));
    }

    let rules = grammar
        .rules
        .iter()
        .map(|definition| format!("{}:{}", quote(&definition.name), rule(&definition.rule)));
    fields.push(("rules", format!("{{{}}}", join(rules))));
    fields.push(("extras", array(grammar.extras.iter().map(rule))));
    fields.push((
        "conflicts",
        array(grammar.conflicts.iter().map(|group| array(group.iter().map(|n| quote(n))))),
    ));
    fields.push((
        "precedences",
        array(grammar.precedences.iter().map(|group| array(group.iter().map(precedence)))),
    ));
    fields.push(("externals", array(grammar.externals.iter().map(rule))));
    fields.push(("inline", array(grammar.inline.iter().map(|n| quote(n)))));
    fields.push(("supertypes", array(grammar.supertypes.iter().map(|n| quote(n)))));
    if let Some(word) = &grammar.word {
        fields.push(("word", quote(word)));
    }

    object(fields)
}

fn rule(rule: &Rule) -> String {
    let mut fields = vec![("type", quote(rule.type_name()))];
    let value = rule.value.as_ref().map(|value| match value {
        RuleValue::String(text) => quote(text),
        RuleValue::Integer(level) => level.to_string(),
    });
    let name = rule.name.as_deref().map(quote);
    let content = rule.content.as_deref().map(self::rule);

    // Key order follows what `tree-sitter generate` writes for each rule type.
    let order: &[&str] = match rule.rule_type {
        RuleType::Blank => &[],
        RuleType::String | RuleType::Pattern => &["value", "flags"],
        RuleType::Symbol => &["name"],
        RuleType::Choice | RuleType::Seq => &["members"],
        RuleType::Repeat | RuleType::Repeat1 | RuleType::Token | RuleType::ImmediateToken => {
            &["content"]
        }
        RuleType::Prec | RuleType::PrecLeft | RuleType::PrecRight | RuleType::PrecDynamic => {
            &["value", "content"]
        }
        RuleType::Field => &["name", "content"],
        RuleType::Alias => &["content", "named", "value"],
        RuleType::Reserved => &["context_name", "content"],
    };
    for &key in order {
        let field = match key {
            "value" => value.clone(),
            "name" => name.clone(),
            "content" => content.clone(),
            "members" => Some(array(rule.members.iter().map(self::rule))),
            "named" => rule.named.map(|named| named.to_string()),
            "flags" => rule.flags.as_deref().map(quote),
            "context_name" => rule.context_name.as_deref().map(quote),
            _ => None,
        };
        if let Some(field) = field {
            fields.push((key, field));
        }
    }
    object(fields)
}

fn precedence(entry: &Precedence) -> String {
    match entry {
        Precedence::String(value) => object(vec![("type", quote("STRING")), ("value", quote(value))]),
        Precedence::Symbol { name } => object(vec![("type", quote("SYMBOL")), ("name", quote(name))]),
    }
}

fn quote(text: &str) -> String {
    facet_json::to_string(&text.to_string())
}

fn object(fields: Vec<(&str, String)>) -> String {
    let entries = fields
        .into_iter()
        .map(|(key, value)| format!("{}:{value}", quote(key)));
    format!("{{{}}}", join(entries))
}

fn array(items: impl Iterator<Item = String>) -> String {
    format!("[{}]", join(items))
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::dsl::{alias, field, optional, pattern, prec_left, seq, string, sym};

    #[test]
    fn test_rule_shapes() {
        assert_eq!(rule(&string("hello")), r#"{"type":"STRING","value":"hello"}"#);
        assert_eq!(rule(&sym("expr")), r#"{"type":"SYMBOL","name":"expr"}"#);
        assert_eq!(
            rule(&prec_left(2, sym("expr"))),
            r#"{"type":"PREC_LEFT","value":2,"content":{"type":"SYMBOL","name":"expr"}}"#
        );
        assert_eq!(
            rule(&field("left", sym("expr"))),
            r#"{"type":"FIELD","name":"left","content":{"type":"SYMBOL","name":"expr"}}"#
        );
        assert_eq!(
            rule(&alias(string("fn"), "keyword", true)),
            r#"{"type":"ALIAS","content":{"type":"STRING","value":"fn"},"named":true,"value":"keyword"}"#
        );
        assert_eq!(
            rule(&optional(string(";"))),
            r#"{"type":"CHOICE","members":[{"type":"STRING","value":";"},{"type":"BLANK"}]}"#
        );
    }

    #[test]
    fn test_escapes_strings() {
        assert_eq!(rule(&pattern(r"\s")), r#"{"type":"PATTERN","value":"\\s"}"#);
        assert_eq!(rule(&string("\"")), r#"{"type":"STRING","value":"\""}"#);
    }

    #[test]
    fn test_rules_keep_declaration_order() {
        let grammar = crate::grammar::GrammarBuilder::new("order")
            .rule("zeta", seq([sym("alpha")]))
            .rule("alpha", string("a"))
            .word("alpha")
            .precedences([Precedence::Symbol { name: "alpha".into() }])
            .build();
        let json = write_grammar(&grammar);
        assert!(json.starts_with(r#"{"name":"order","rules":{"zeta":"#));
        assert!(json.contains(r#"},"alpha":{"type":"STRING","value":"a"}}"#));
        assert!(json.contains(r#""precedences":[[{"type":"SYMBOL","name":"alpha"}]]"#));
        assert!(json.ends_with(r#""word":"alpha"}"#));
    }
}
