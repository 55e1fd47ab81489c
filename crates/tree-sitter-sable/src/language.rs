//! Language handles over compiled [`ParseTables`].

use crate::tables::{ParseTables, SymbolKind, ABI_VERSION, MIN_COMPATIBLE_ABI_VERSION};
use facet::Facet;
use std::fmt;
use std::num::NonZeroU16;

/// The accessor a grammar binding exports for its tables.
///
/// This is the Rust-native counterpart of a C function returning a possibly
/// null `const TSLanguage *`: `None` stands for the null artifact.
#[derive(Clone, Copy)]
pub struct LanguageFn(fn() -> Option<&'static ParseTables>);

impl LanguageFn {
    /// Wraps a table accessor.
    #[must_use]
    pub const fn from_fn(accessor: fn() -> Option<&'static ParseTables>) -> Self {
        Self(accessor)
    }

    /// Calls the accessor.
    #[must_use]
    pub fn tables(self) -> Option<&'static ParseTables> {
        (self.0)()
    }
}

impl fmt::Debug for LanguageFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LanguageFn(..)")
    }
}

/// Reasons a [`Language`] cannot be built from a [`LanguageFn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LanguageError {
    /// The accessor returned no tables.
    #[error("the language accessor returned no parse tables")]
    MissingTables,

    /// The tables use a layout this crate cannot read.
    #[error(
        "incompatible language version {0}, expected a version between {min} and {max}",
        min = MIN_COMPATIBLE_ABI_VERSION,
        max = ABI_VERSION
    )]
    Version(u32),
}

/// A handle to a grammar's tables, usable to inspect its node kinds and fields.
///
/// Handles are cheap to copy and can be shared freely between threads. Two
/// handles compare equal when they wrap the same tables.
#[derive(Clone, Copy)]
pub struct Language {
    tables: &'static ParseTables,
}

impl Language {
    /// Builds a handle from a grammar's table accessor.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError::MissingTables`] when the accessor yields
    /// nothing and [`LanguageError::Version`] when the table layout is not
    /// supported.
    pub fn new(language: LanguageFn) -> Result<Self, LanguageError> {
        let tables = language.tables().ok_or(LanguageError::MissingTables)?;
        if !(MIN_COMPATIBLE_ABI_VERSION..=ABI_VERSION).contains(&tables.abi_version) {
            return Err(LanguageError::Version(tables.abi_version));
        }
        tracing::debug!(
            language = %tables.name,
            abi = tables.abi_version,
            node_kinds = tables.symbols.len(),
            "loaded language"
        );
        Ok(Self { tables })
    }

    /// The grammar name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        &self.tables.name
    }

    /// The table layout version.
    #[must_use]
    pub fn abi_version(&self) -> u32 {
        self.tables.abi_version
    }

    /// The number of distinct node kinds, `end` included.
    #[must_use]
    pub fn node_kind_count(&self) -> usize {
        self.tables.symbols.len()
    }

    /// The node kind of a symbol id.
    #[must_use]
    pub fn node_kind_for_id(&self, id: u16) -> Option<&'static str> {
        self.tables.symbol(id).map(|symbol| symbol.name.as_str())
    }

    /// Whether nodes of this symbol are named. Unknown ids are not.
    #[must_use]
    pub fn node_kind_is_named(&self, id: u16) -> bool {
        self.tables.symbol(id).is_some_and(|symbol| symbol.named)
    }

    /// Whether nodes of this symbol appear in trees. Unknown ids do not.
    #[must_use]
    pub fn node_kind_is_visible(&self, id: u16) -> bool {
        self.tables.symbol(id).is_some_and(|symbol| symbol.visible)
    }

    /// The symbol id of a node kind, or 0 when the kind does not exist.
    #[must_use]
    pub fn id_for_node_kind(&self, kind: &str, named: bool) -> u16 {
        self.tables.symbol_id(kind, named).unwrap_or(0)
    }

    /// The number of distinct field names.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.tables.field_names.len()
    }

    /// The name of a field id. Field ids start at 1.
    #[must_use]
    pub fn field_name_for_id(&self, id: u16) -> Option<&'static str> {
        let index = usize::from(id).checked_sub(1)?;
        self.tables.field_names.get(index).map(String::as_str)
    }

    /// The id of a field name.
    #[must_use]
    pub fn field_id_for_name(&self, name: &str) -> Option<NonZeroU16> {
        let index = self.tables.field_names.iter().position(|f| f == name)?;
        u16::try_from(index + 1).ok().and_then(NonZeroU16::new)
    }

    /// The id of the root symbol.
    #[must_use]
    pub fn start_symbol(&self) -> u16 {
        self.tables.start_symbol
    }

    /// The tables behind this handle.
    #[must_use]
    pub fn tables(&self) -> &'static ParseTables {
        self.tables
    }

    /// The static node-types listing: one entry per visible node kind,
    /// named kinds first, each group sorted by kind.
    #[must_use]
    pub fn node_types(&self) -> Vec<NodeType> {
        let tables = self.tables;
        let mut types: Vec<NodeType> = Vec::new();
        for (id, symbol) in tables.symbols.iter().enumerate() {
            if symbol.kind == SymbolKind::End || !symbol.visible {
                continue;
            }
            if types
                .iter()
                .any(|t| t.kind == symbol.name && t.named == symbol.named)
            {
                continue;
            }
            let fields = symbol
                .fields
                .iter()
                .filter_map(|&field| self.field_name_for_id(field))
                .map(str::to_string)
                .collect();
            types.push(NodeType {
                kind: symbol.name.clone(),
                named: symbol.named,
                root: usize::from(tables.start_symbol) == id,
                fields,
            });
        }
        types.sort_by(|a, b| b.named.cmp(&a.named).then_with(|| a.kind.cmp(&b.kind)));
        types
    }

    /// [`node_types`](Self::node_types) serialized as JSON, the counterpart of
    /// `src/node-types.json`.
    #[must_use]
    pub fn node_types_json(&self) -> String {
        facet_json::to_string(&self.node_types())
    }
}

impl TryFrom<LanguageFn> for Language {
    type Error = LanguageError;

    fn try_from(language: LanguageFn) -> Result<Self, Self::Error> {
        Self::new(language)
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tables, other.tables)
    }
}

impl Eq for Language {}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.tables.name)
            .field("abi_version", &self.tables.abi_version)
            .field("node_kind_count", &self.tables.symbols.len())
            .finish()
    }
}

/// One entry of the node-types listing.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct NodeType {
    /// The node kind.
    #[facet(rename = "type")]
    pub kind: String,

    /// Whether the node is named.
    pub named: bool,

    /// Whether this is the root node kind.
    pub root: bool,

    /// Fields used directly by the node's rule, sorted.
    pub fields: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::dsl::{field, pattern, seq, string, sym};
    use crate::grammar::GrammarBuilder;
    use crate::tables::compile;
    use std::sync::LazyLock;

    static ASSIGNMENTS: LazyLock<ParseTables> = LazyLock::new(|| {
        let grammar = GrammarBuilder::new("assign")
            .rule("source_file", sym("assignment"))
            .rule(
                "assignment",
                seq([
                    field("left", sym("identifier")),
                    string("="),
                    field("right", sym("_atom")),
                ]),
            )
            .rule("_atom", pattern("[0-9]+"))
            .rule("identifier", pattern("[a-z]+"))
            .build();
        compile(&grammar).unwrap()
    });

    static FUTURE: LazyLock<ParseTables> = LazyLock::new(|| ParseTables {
        abi_version: ABI_VERSION + 1,
        ..ASSIGNMENTS.clone()
    });

    static ANCIENT: LazyLock<ParseTables> = LazyLock::new(|| ParseTables {
        abi_version: MIN_COMPATIBLE_ABI_VERSION - 1,
        ..ASSIGNMENTS.clone()
    });

    const ASSIGN: LanguageFn = LanguageFn::from_fn(|| Some(&*ASSIGNMENTS));

    fn assign() -> Language {
        Language::new(ASSIGN).unwrap()
    }

    #[test]
    fn test_missing_tables() {
        let missing = LanguageFn::from_fn(|| None);
        assert_eq!(Language::new(missing), Err(LanguageError::MissingTables));
    }

    #[test]
    fn test_version_bounds() {
        let future = LanguageFn::from_fn(|| Some(&*FUTURE));
        assert_eq!(
            Language::try_from(future),
            Err(LanguageError::Version(ABI_VERSION + 1))
        );
        let ancient = LanguageFn::from_fn(|| Some(&*ANCIENT));
        assert_eq!(
            Language::new(ancient),
            Err(LanguageError::Version(MIN_COMPATIBLE_ABI_VERSION - 1))
        );
        assert!(LanguageError::Version(99).to_string().contains("between 13 and 15"));
    }

    #[test]
    fn test_node_kinds() {
        let language = assign();
        assert_eq!(language.name(), "assign");
        // end, =, _atom, identifier, source_file, assignment
        assert_eq!(language.node_kind_count(), 6);
        assert_eq!(language.node_kind_for_id(0), Some("end"));
        assert_eq!(language.node_kind_for_id(1), Some("="));
        assert!(!language.node_kind_is_named(1));
        assert!(language.node_kind_is_visible(1));
        assert!(!language.node_kind_is_visible(2));
        assert_eq!(language.id_for_node_kind("assignment", true), 5);
        assert_eq!(language.id_for_node_kind("assignment", false), 0);
        assert_eq!(language.id_for_node_kind("end", true), 0);
        assert_eq!(language.node_kind_for_id(42), None);
        assert!(!language.node_kind_is_named(42));
    }

    #[test]
    fn test_fields() {
        let language = assign();
        assert_eq!(language.field_count(), 2);
        assert_eq!(language.field_name_for_id(0), None);
        assert_eq!(language.field_name_for_id(1), Some("left"));
        assert_eq!(language.field_name_for_id(2), Some("right"));
        assert_eq!(language.field_name_for_id(3), None);
        assert_eq!(language.field_id_for_name("right").map(NonZeroU16::get), Some(2));
        assert_eq!(language.field_id_for_name("middle"), None);
    }

    #[test]
    fn test_handles_share_tables() {
        let first = assign();
        let second = Language::try_from(ASSIGN).unwrap();
        assert_eq!(first, second);
        assert!(std::ptr::eq(first.tables(), second.tables()));
        assert_eq!(first.start_symbol(), 4);
    }

    #[test]
    fn test_node_types() {
        let types = assign().node_types();
        let kinds: Vec<(&str, bool)> = types.iter().map(|t| (t.kind.as_str(), t.named)).collect();
        assert_eq!(
            kinds,
            vec![
                ("assignment", true),
                ("identifier", true),
                ("source_file", true),
                ("=", false),
            ]
        );
        let assignment = &types[0];
        assert_eq!(assignment.fields, vec!["left".to_string(), "right".to_string()]);
        assert!(!assignment.root);
        assert!(types[2].root);
    }

    #[test]
    fn test_node_types_json() {
        let json = assign().node_types_json();
        assert!(json.contains("assignment"));
        assert!(json.contains("source_file"));
        assert!(!json.contains("_atom"));
    }
}
