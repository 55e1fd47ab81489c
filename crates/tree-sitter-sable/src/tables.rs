//! Compilation of a [`Grammar`] into the tables a [`Language`](crate::Language) wraps.
//!
//! The tables carry the symbol inventory, the field names and the lexical
//! tokens of a grammar. Symbol ids follow the generated-parser layout:
//!
//! - id 0 is the builtin `end` symbol;
//! - terminals follow, in first-appearance order over the rule list;
//! - external tokens come next, then non-terminals in rule order;
//! - aliases of non-terminals close the list.
//!
//! Field ids start at 1 so that 0 can mean "no field".

use crate::grammar::{Grammar, GrammarError, Rule, RuleType, RuleValue};
use crate::validate::validate;
use facet::Facet;
use std::collections::BTreeSet;

/// The table layout version produced by [`compile`].
pub const ABI_VERSION: u32 = 15;

/// The oldest table layout a [`Language`](crate::Language) still accepts.
pub const MIN_COMPATIBLE_ABI_VERSION: u32 = 13;

/// The name of the builtin end-of-input symbol.
pub const END_SYMBOL_NAME: &str = "end";

/// The compiled, read-only form of a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ParseTables {
    /// Layout version of these tables.
    pub abi_version: u32,

    /// Grammar name.
    pub name: String,

    /// Every symbol, indexed by symbol id.
    pub symbols: Vec<Symbol>,

    /// Field names; the name of field id `n` is at index `n - 1`.
    pub field_names: Vec<String>,

    /// Lexical definitions of terminals, ordered by symbol id.
    pub lexical: Vec<LexicalToken>,

    /// Id of the start symbol.
    pub start_symbol: u16,

    /// Ids of supertype symbols.
    pub supertypes: Vec<u16>,
}

/// One entry of the symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Symbol {
    /// The node kind shown for this symbol.
    pub name: String,

    /// What produced the symbol.
    pub kind: SymbolKind,

    /// Whether nodes of this symbol are named.
    pub named: bool,

    /// Whether nodes of this symbol appear in syntax trees.
    pub visible: bool,

    /// Ids of the fields used directly by this symbol's rule.
    pub fields: Vec<u16>,
}

/// Origin of a [`Symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum SymbolKind {
    /// The builtin end-of-input symbol.
    End,
    /// A token matched by the lexer.
    Terminal,
    /// A token matched by an external scanner.
    External,
    /// A rule built from other symbols.
    NonTerminal,
    /// An alias of a non-terminal.
    Alias,
}

/// The lexical definition of one terminal symbol.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct LexicalToken {
    /// The terminal's symbol id.
    pub symbol: u16,

    /// The token body: a `STRING`, a `PATTERN`, or a composite `TOKEN` content.
    pub rule: Rule,

    /// Whether the token may not be preceded by extras.
    pub immediate: bool,
}

impl ParseTables {
    /// Looks up a symbol by id.
    #[must_use]
    pub fn symbol(&self, id: u16) -> Option<&Symbol> {
        self.symbols.get(usize::from(id))
    }

    /// Returns the id of the first symbol called `name` with the given namedness.
    #[must_use]
    pub fn symbol_id(&self, name: &str, named: bool) -> Option<u16> {
        self.symbols
            .iter()
            .position(|s| s.kind != SymbolKind::End && s.name == name && s.named == named)
            .and_then(|index| u16::try_from(index).ok())
    }

    /// Returns the lexical definition of a terminal.
    #[must_use]
    pub fn lexical_token(&self, symbol: u16) -> Option<&LexicalToken> {
        self.lexical.iter().find(|token| token.symbol == symbol)
    }
}

/// Validates `grammar` and compiles it into [`ParseTables`].
///
/// # Errors
///
/// Returns [`GrammarError::Validation`] when the grammar is malformed and
/// [`GrammarError::TooManySymbols`] when the symbol ids would overflow.
pub fn compile(grammar: &Grammar) -> Result<ParseTables, GrammarError> {
    validate(grammar)?;

    let mut builder = TableBuilder::new(grammar);
    builder.collect_terminals();
    builder.collect_externals();
    builder.collect_non_terminals();
    builder.collect_aliases();
    let tables = builder.finish()?;

    tracing::debug!(
        grammar = %tables.name,
        symbols = tables.symbols.len(),
        fields = tables.field_names.len(),
        tokens = tables.lexical.len(),
        "compiled parse tables"
    );
    Ok(tables)
}

struct PendingToken {
    symbol: usize,
    rule: Rule,
    immediate: bool,
}

struct TableBuilder<'g> {
    grammar: &'g Grammar,
    symbols: Vec<Symbol>,
    field_names: Vec<String>,
    tokens: Vec<PendingToken>,
}

impl<'g> TableBuilder<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let field_names = collect_field_names(grammar);
        Self {
            grammar,
            symbols: vec![Symbol {
                name: END_SYMBOL_NAME.to_string(),
                kind: SymbolKind::End,
                named: true,
                visible: false,
                fields: Vec::new(),
            }],
            field_names,
            tokens: Vec::new(),
        }
    }

    fn is_lexical_rule(&self, index: usize) -> bool {
        // The start rule always yields a non-terminal.
        index > 0
            && matches!(
                self.grammar.rules[index].rule.rule_type,
                RuleType::String | RuleType::Pattern | RuleType::Token | RuleType::ImmediateToken
            )
    }

    fn is_inlined(&self, name: &str) -> bool {
        self.grammar.inline.iter().any(|inlined| inlined == name)
    }

    fn collect_terminals(&mut self) {
        let grammar = self.grammar;
        for (index, definition) in grammar.rules.iter().enumerate() {
            if self.is_lexical_rule(index) {
                let (body, immediate) = unwrap_token(&definition.rule);
                self.add_terminal(
                    &definition.name,
                    true,
                    !definition.name.starts_with('_'),
                    body.clone(),
                    immediate,
                );
            } else {
                let mut counter = 0;
                self.walk_terminals(&definition.rule, &definition.name, &mut counter, None);
            }
        }
        let mut counter = 0;
        for extra in &grammar.extras {
            self.walk_terminals(extra, "extras", &mut counter, None);
        }
    }

    fn walk_terminals(
        &mut self,
        rule: &Rule,
        context: &str,
        counter: &mut usize,
        alias: Option<(&str, bool)>,
    ) {
        match rule.rule_type {
            RuleType::String => {
                let text = rule.string_value().unwrap_or_default();
                let (name, named) = alias.unwrap_or((text, false));
                self.add_terminal(name, named, true, rule.clone(), false);
            }
            RuleType::Pattern | RuleType::Token | RuleType::ImmediateToken => {
                let (body, immediate) = unwrap_token(rule);
                if let (Some(text), None) = (body.string_value(), alias) {
                    self.add_terminal(text, false, true, body.clone(), immediate);
                } else if let Some((name, named)) = alias {
                    self.add_terminal(name, named, true, body.clone(), immediate);
                } else {
                    *counter += 1;
                    let name = format!("{context}_token{counter}");
                    self.add_terminal(&name, false, false, body.clone(), immediate);
                }
            }
            RuleType::Alias => {
                let target = alias_target(rule);
                for child in rule.children() {
                    self.walk_terminals(child, context, counter, target);
                }
            }
            _ => {
                for child in rule.children() {
                    self.walk_terminals(child, context, counter, None);
                }
            }
        }
    }

    fn add_terminal(&mut self, name: &str, named: bool, visible: bool, rule: Rule, immediate: bool) {
        let existing = self.symbols.iter().position(|s| {
            s.kind == SymbolKind::Terminal && s.name == name && s.named == named
        });
        if existing.is_some() {
            return;
        }
        self.tokens.push(PendingToken {
            symbol: self.symbols.len(),
            rule,
            immediate,
        });
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Terminal,
            named,
            visible,
            fields: Vec::new(),
        });
    }

    fn collect_externals(&mut self) {
        for external in &self.grammar.externals {
            let (name, named) = match (external.symbol_name(), external.string_value()) {
                (Some(name), _) => (name.to_string(), true),
                (None, Some(text)) => (text.to_string(), false),
                (None, None) => continue,
            };
            let visible = !name.starts_with('_');
            self.symbols.push(Symbol {
                name,
                kind: SymbolKind::External,
                named,
                visible,
                fields: Vec::new(),
            });
        }
    }

    fn collect_non_terminals(&mut self) {
        let grammar = self.grammar;
        for (index, definition) in grammar.rules.iter().enumerate() {
            if self.is_lexical_rule(index) || self.is_inlined(&definition.name) {
                continue;
            }
            let fields = self.fields_of(&definition.rule);
            self.symbols.push(Symbol {
                name: definition.name.clone(),
                kind: SymbolKind::NonTerminal,
                named: true,
                visible: !definition.name.starts_with('_'),
                fields,
            });
        }
    }

    fn collect_aliases(&mut self) {
        let mut aliases = Vec::new();
        for definition in &self.grammar.rules {
            collect_symbol_aliases(&definition.rule, &mut aliases);
        }
        for (name, named) in aliases {
            let known = self
                .symbols
                .iter()
                .any(|s| s.kind != SymbolKind::End && s.name == name && s.named == named);
            if !known {
                self.symbols.push(Symbol {
                    name,
                    kind: SymbolKind::Alias,
                    named,
                    visible: true,
                    fields: Vec::new(),
                });
            }
        }
    }

    fn fields_of(&self, rule: &Rule) -> Vec<u16> {
        let mut names = BTreeSet::new();
        collect_fields(rule, &mut names);
        names
            .into_iter()
            .filter_map(|name| self.field_names.iter().position(|f| f == name))
            .filter_map(|index| u16::try_from(index + 1).ok())
            .collect()
    }

    fn finish(self) -> Result<ParseTables, GrammarError> {
        let count = self.symbols.len();
        let to_id = |index: usize| u16::try_from(index).map_err(|_| GrammarError::TooManySymbols { count });
        to_id(count)?;

        let start_name = self
            .grammar
            .start_rule()
            .map(|definition| definition.name.as_str())
            .unwrap_or_default();
        let start_symbol = self
            .symbols
            .iter()
            .position(|s| s.kind == SymbolKind::NonTerminal && s.name == start_name)
            .map_or(Ok(0), to_id)?;

        let supertypes = self
            .grammar
            .supertypes
            .iter()
            .filter_map(|name| {
                self.symbols
                    .iter()
                    .position(|s| s.kind == SymbolKind::NonTerminal && s.name == *name)
            })
            .map(to_id)
            .collect::<Result<Vec<u16>, GrammarError>>()?;

        let lexical = self
            .tokens
            .into_iter()
            .map(|token| {
                Ok(LexicalToken {
                    symbol: to_id(token.symbol)?,
                    rule: token.rule,
                    immediate: token.immediate,
                })
            })
            .collect::<Result<Vec<LexicalToken>, GrammarError>>()?;

        Ok(ParseTables {
            abi_version: ABI_VERSION,
            name: self.grammar.name.clone(),
            symbols: self.symbols,
            field_names: self.field_names,
            lexical,
            start_symbol,
            supertypes,
        })
    }
}

/// Strips `TOKEN`/`IMMEDIATE_TOKEN` wrappers, reporting whether any was immediate.
fn unwrap_token(rule: &Rule) -> (&Rule, bool) {
    let mut current = rule;
    let mut immediate = false;
    while matches!(current.rule_type, RuleType::Token | RuleType::ImmediateToken) {
        immediate |= current.rule_type == RuleType::ImmediateToken;
        match current.content.as_deref() {
            Some(content) => current = content,
            None => break,
        }
    }
    (current, immediate)
}

fn alias_target(rule: &Rule) -> Option<(&str, bool)> {
    match &rule.value {
        Some(RuleValue::String(name)) => Some((name.as_str(), rule.named.unwrap_or(false))),
        _ => None,
    }
}

fn collect_symbol_aliases(rule: &Rule, aliases: &mut Vec<(String, bool)>) {
    if rule.rule_type == RuleType::Alias {
        let wraps_symbol = rule.content.as_deref().is_some_and(Rule::is_symbol);
        if let (true, Some((name, named))) = (wraps_symbol, alias_target(rule)) {
            if !aliases.iter().any(|(n, m)| n == name && *m == named) {
                aliases.push((name.to_string(), named));
            }
        }
    }
    for child in rule.children() {
        collect_symbol_aliases(child, aliases);
    }
}

fn collect_field_names(grammar: &Grammar) -> Vec<String> {
    let mut names = BTreeSet::new();
    for definition in &grammar.rules {
        collect_fields(&definition.rule, &mut names);
    }
    names.into_iter().map(str::to_string).collect()
}

fn collect_fields<'g>(rule: &'g Rule, names: &mut BTreeSet<&'g str>) {
    if rule.rule_type == RuleType::Field {
        if let Some(name) = rule.name.as_deref() {
            names.insert(name);
        }
    }
    for child in rule.children() {
        collect_fields(child, names);
    }
}
