use crate::query::{ColumnRef, Predicate, Projection, SelectQuery, TableRef, Value, WhereClause};
use std::fmt::{self, Display, Write as _};

impl Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{table}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} AS {alias}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Text(v) => {
                f.write_char('\'')?;
                for ch in v.chars() {
                    if ch == '\'' {
                        f.write_char('\'')?;
                    }
                    f.write_char(ch)?;
                }
                f.write_char('\'')
            }
        }
    }
}

impl Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::CountAll => f.write_str("COUNT(*)"),
            Self::Columns(columns) => {
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{column}")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { column, op, value } => write!(f, "{column} {op} {value}"),
            Self::IsNull { column } => write!(f, "{column} IS NULL"),
            Self::IsNotNull { column } => write!(f, "{column} IS NOT NULL"),
            Self::Correlate { outer, inner } => write!(f, "{outer} = {inner}"),
            Self::Exists { query, negated } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{not}EXISTS ({query})")
            }
            Self::InSubquery {
                column,
                query,
                negated,
            } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{column} {not}IN ({query})")
            }
            Self::CountCompare { query, op, count } => write!(f, "({query}) {op} {count}"),
            Self::Group(clauses) => {
                f.write_char('(')?;
                write_clauses(f, clauses)?;
                f.write_char(')')
            }
        }
    }
}

fn write_clauses(f: &mut fmt::Formatter<'_>, clauses: &[WhereClause]) -> fmt::Result {
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", clause.conjunction)?;
        }
        write!(f, "{}", clause.predicate)?;
    }
    Ok(())
}

impl Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {} FROM {}", self.projection, self.from)?;
        if !self.wheres.is_empty() {
            f.write_str(" WHERE ")?;
            write_clauses(f, &self.wheres)?;
        }
        Ok(())
    }
}
