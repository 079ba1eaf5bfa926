//! In-memory evaluation of a [`Predicate`] against a [`Listing`].
//!
//! Mirrors the SQL rendering in `query_builder`: equality on text is
//! case-sensitive, containment is case-insensitive, and a comparison against
//! a missing (`None`) attribute is false.

use std::cmp::Ordering;

use super::predicate::{Comparison, Field, Predicate, Value};
use crate::models::Listing;

impl Predicate {
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Self::Always => true,
            Self::Compare { field, op, value } => match field_value(*field, listing) {
                Some(actual) => compare(&actual, *op, value),
                None => false,
            },
            Self::And(parts) => parts.iter().all(|p| p.matches(listing)),
            Self::Or(parts) => parts.iter().any(|p| p.matches(listing)),
        }
    }
}

fn field_value(field: Field, listing: &Listing) -> Option<Value> {
    let product = listing.product();
    let business = listing.business();
    let text = |s: &str| Some(Value::Text(s.to_string()));
    let level = |l: Option<crate::models::NutritionLevel>| l.and_then(|l| text(l.code()));

    match field {
        Field::ProductName => text(&product.name),
        Field::BusinessName => text(&business.name),
        Field::AddressCity => text(&business.address.city),
        Field::AddressCountry => text(&business.address.country),
        Field::BusinessId => Some(Value::Integer(business.id)),
        Field::BusinessType => text(business.business_type.code()),
        Field::Price => Some(Value::Number(listing.price)),
        Field::Closes => Some(Value::Timestamp(listing.closes)),
        Field::Fat => level(product.fat),
        Field::SaturatedFat => level(product.saturated_fat),
        Field::Sugars => level(product.sugars),
        Field::Salt => level(product.salt),
        Field::IsVegan => Some(Value::Bool(product.is_vegan)),
        Field::IsVegetarian => Some(Value::Bool(product.is_vegetarian)),
        Field::IsGlutenFree => Some(Value::Bool(product.is_gluten_free)),
        Field::IsPalmOilFree => Some(Value::Bool(product.is_palm_oil_free)),
        Field::IsDairyFree => Some(Value::Bool(product.is_dairy_free)),
        Field::NutriScore => product.nutri_score.and_then(|s| text(s.code())),
        Field::NovaGroup => product.nova_group.map(|g| Value::Integer(g.into())),
    }
}

fn compare(actual: &Value, op: Comparison, expected: &Value) -> bool {
    if op == Comparison::Contains {
        return match (actual, expected) {
            (Value::Text(haystack), Value::Text(needle)) => haystack
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => false,
        };
    }

    let Some(ordering) = order(actual, expected) else {
        return false;
    };
    match op {
        Comparison::Equals => ordering == Ordering::Equal,
        Comparison::AtLeast => ordering != Ordering::Less,
        Comparison::AtMost => ordering != Ordering::Greater,
        Comparison::Contains => false,
    }
}

fn order(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Integer(a), Value::Number(b)) => (*a as f64).partial_cmp(b),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
