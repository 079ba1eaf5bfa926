//! Boolean predicate tree over the listing entity graph.
//!
//! Leaves compare one [`Field`] against a [`Value`]; inner nodes are n-ary
//! AND/OR. The tree is backend-neutral: `query_builder` renders it to SQL and
//! `evaluate` runs it against in-memory listings.

use chrono::{DateTime, Utc};
use std::fmt;

/// Listing attribute reachable from a listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ProductName,
    BusinessName,
    AddressCity,
    AddressCountry,
    BusinessId,
    BusinessType,
    Price,
    Closes,
    Fat,
    SaturatedFat,
    Sugars,
    Salt,
    IsVegan,
    IsVegetarian,
    IsGlutenFree,
    IsPalmOilFree,
    IsDairyFree,
    NutriScore,
    NovaGroup,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Self::ProductName => "productName",
            Self::BusinessName => "businessName",
            Self::AddressCity => "city",
            Self::AddressCountry => "country",
            Self::BusinessId => "businessId",
            Self::BusinessType => "businessType",
            Self::Price => "price",
            Self::Closes => "closes",
            Self::Fat => "fat",
            Self::SaturatedFat => "saturatedFat",
            Self::Sugars => "sugars",
            Self::Salt => "salt",
            Self::IsVegan => "isVegan",
            Self::IsVegetarian => "isVegetarian",
            Self::IsGlutenFree => "isGlutenFree",
            Self::IsPalmOilFree => "isPalmOilFree",
            Self::IsDairyFree => "isDairyFree",
            Self::NutriScore => "nutriScore",
            Self::NovaGroup => "novaGroup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Exact equality. Text is compared case-sensitively.
    Equals,
    /// Case-insensitive substring containment (text only).
    Contains,
    AtLeast,
    AtMost,
}

/// Right-hand side of a comparison. Enumerations are carried as their codes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row.
    Always,
    Compare {
        field: Field,
        op: Comparison,
        value: Value,
    },
    /// Conjunction. Empty matches every row.
    And(Vec<Predicate>),
    /// Disjunction. Empty matches no row.
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(field: Field, op: Comparison, value: Value) -> Self {
        Self::Compare { field, op, value }
    }

    pub fn equals(field: Field, value: Value) -> Self {
        Self::compare(field, Comparison::Equals, value)
    }

    pub fn contains(field: Field, needle: impl Into<String>) -> Self {
        Self::compare(field, Comparison::Contains, Value::Text(needle.into()))
    }

    pub fn at_least(field: Field, value: Value) -> Self {
        Self::compare(field, Comparison::AtLeast, value)
    }

    pub fn at_most(field: Field, value: Value) -> Self {
        Self::compare(field, Comparison::AtMost, value)
    }

    /// AND of `parts`, dropping `Always` and collapsing trivial cases.
    pub fn all(parts: impl IntoIterator<Item = Predicate>) -> Self {
        let mut flat: Vec<Predicate> = Vec::new();
        for part in parts {
            match part {
                Self::Always => {}
                Self::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::Always,
            1 => flat.remove(0),
            _ => Self::And(flat),
        }
    }

    /// OR of `parts`, collapsing a single child. An `Always` child makes the
    /// whole disjunction `Always`.
    pub fn any(parts: impl IntoIterator<Item = Predicate>) -> Self {
        let mut flat: Vec<Predicate> = Vec::new();
        for part in parts {
            match part {
                Self::Always => return Self::Always,
                Self::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self::Or(flat)
        }
    }

    /// Number of comparison leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Always => 0,
            Self::Compare { .. } => 1,
            Self::And(parts) | Self::Or(parts) => parts.iter().map(Self::leaf_count).sum(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("TRUE"),
            Self::Compare { field, op, value } => {
                let op = match op {
                    Comparison::Equals => "=",
                    Comparison::Contains => "~",
                    Comparison::AtLeast => ">=",
                    Comparison::AtMost => "<=",
                };
                write!(f, "{} {} {}", field.name(), op, value)
            }
            Self::And(parts) | Self::Or(parts) if parts.is_empty() => {
                f.write_str(if matches!(self, Self::And(_)) {
                    "TRUE"
                } else {
                    "FALSE"
                })
            }
            Self::And(parts) | Self::Or(parts) => {
                let joiner = if matches!(self, Self::And(_)) {
                    " AND "
                } else {
                    " OR "
                };
                f.write_str("(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(joiner)?;
                    }
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_is(v: &str) -> Predicate {
        Predicate::equals(Field::ProductName, Value::Text(v.to_string()))
    }

    #[test]
    fn all_drops_always_and_flattens() {
        assert_eq!(Predicate::all(Vec::new()), Predicate::Always);
        assert_eq!(
            Predicate::all([Predicate::Always, name_is("Milk")]),
            name_is("Milk")
        );
        let nested = Predicate::all([
            Predicate::all([name_is("a"), name_is("b")]),
            name_is("c"),
        ]);
        assert_eq!(
            nested,
            Predicate::And(vec![name_is("a"), name_is("b"), name_is("c")])
        );
    }

    #[test]
    fn any_of_nothing_matches_nothing() {
        assert_eq!(Predicate::any(Vec::new()), Predicate::Or(Vec::new()));
        assert_eq!(
            Predicate::any([name_is("a"), Predicate::Always]),
            Predicate::Always
        );
    }

    #[test]
    fn display_is_readable() {
        let p = Predicate::all([
            Predicate::any([name_is("Milk"), Predicate::contains(Field::ProductName, "Bread")]),
            Predicate::at_least(Field::Price, Value::Number(5.0)),
        ]);
        assert_eq!(
            p.to_string(),
            r#"((productName = "Milk" OR productName ~ "Bread") AND price >= 5)"#
        );
        assert_eq!(p.leaf_count(), 3);
    }
}
