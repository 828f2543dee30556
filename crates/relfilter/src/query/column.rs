use serde::{Deserialize, Serialize};

///
/// ColumnRef
///
/// Column reference, optionally qualified by a table name or alias.
/// Unqualified columns resolve against the nearest enclosing source.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub name: String,
}

impl ColumnRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    #[must_use]
    pub const fn is_qualified(&self) -> bool {
        self.table.is_some()
    }
}

// "table.column" splits on the last dot; anything else is unqualified.
impl From<&str> for ColumnRef {
    fn from(s: &str) -> Self {
        match s.rsplit_once('.') {
            Some((table, name)) if !table.is_empty() && !name.is_empty() => {
                Self::qualified(table, name)
            }
            _ => Self::new(s),
        }
    }
}

impl From<String> for ColumnRef {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

///
/// TableRef
///
/// Query source. The alias, when present, is what columns are qualified with.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

impl TableRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    #[must_use]
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// Name columns of this source are qualified with.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn column(&self, name: impl Into<String>) -> ColumnRef {
        ColumnRef::qualified(self.reference(), name)
    }
}
