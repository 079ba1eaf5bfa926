//! Filter composer: turns the optional filters of a [`SearchParams`] into one
//! conjunctive [`Predicate`]. Every absent filter contributes nothing, so a
//! request with no filters yields [`Predicate::Always`].

use super::params::{ClosingDateFilter, SearchParams};
use super::predicate::{Field, Predicate, Value};
use crate::models::NutritionLevel;

pub fn build_filter_predicate(params: &SearchParams) -> Predicate {
    let mut parts: Vec<Predicate> = Vec::new();

    if let Some(min) = params.min_price {
        tracing::debug!(min_price = min, "Filtering by minimum price");
        parts.push(Predicate::at_least(Field::Price, Value::Number(min)));
    }
    if let Some(max) = params.max_price {
        tracing::debug!(max_price = max, "Filtering by maximum price");
        parts.push(Predicate::at_most(Field::Price, Value::Number(max)));
    }

    if let Some(dates) = params.closing_dates {
        parts.push(closing_date_predicate(dates));
    }

    if let Some(types) = &params.business_types {
        tracing::debug!(business_types = ?types, "Filtering by business type");
        parts.push(Predicate::any(types.iter().map(|t| {
            Predicate::equals(Field::BusinessType, Value::Text(t.code().to_string()))
        })));
    }

    for (field, levels) in [
        (Field::Fat, &params.fat),
        (Field::SaturatedFat, &params.saturated_fat),
        (Field::Sugars, &params.sugars),
        (Field::Salt, &params.salt),
    ] {
        if let Some(levels) = levels {
            parts.push(nutrition_level_predicate(field, levels));
        }
    }

    for (field, flag) in [
        (Field::IsVegan, params.is_vegan),
        (Field::IsVegetarian, params.is_vegetarian),
        (Field::IsGlutenFree, params.is_gluten_free),
        (Field::IsPalmOilFree, params.is_palm_oil_free),
        (Field::IsDairyFree, params.is_dairy_free),
    ] {
        if let Some(flag) = flag {
            tracing::debug!(field = field.name(), value = flag, "Filtering by dietary flag");
            parts.push(Predicate::equals(field, Value::Bool(flag)));
        }
    }

    if let Some(min) = params.min_nutri_score {
        tracing::debug!(min_nutri_score = min.code(), "Filtering by minimum nutri-score");
        parts.push(Predicate::at_least(
            Field::NutriScore,
            Value::Text(min.code().to_string()),
        ));
    }
    if let Some(max) = params.max_nutri_score {
        tracing::debug!(max_nutri_score = max.code(), "Filtering by maximum nutri-score");
        parts.push(Predicate::at_most(
            Field::NutriScore,
            Value::Text(max.code().to_string()),
        ));
    }

    if let Some(min) = params.min_nova_group {
        tracing::debug!(min_nova_group = min, "Filtering by minimum nova group");
        parts.push(Predicate::at_least(Field::NovaGroup, Value::Integer(min.into())));
    }
    if let Some(max) = params.max_nova_group {
        tracing::debug!(max_nova_group = max, "Filtering by maximum nova group");
        parts.push(Predicate::at_most(Field::NovaGroup, Value::Integer(max.into())));
    }

    Predicate::all(parts)
}

fn closing_date_predicate(dates: ClosingDateFilter) -> Predicate {
    match dates {
        ClosingDateFilter::OnOrBefore(date) => {
            tracing::debug!(closes_by = %date, "Filtering by closing date");
            Predicate::at_most(Field::Closes, Value::Timestamp(date.upper_bound()))
        }
        ClosingDateFilter::Between { from, to } => {
            tracing::debug!(from = %from, to = %to, "Filtering by closing date range");
            let low = from.lower_bound().min(to.lower_bound());
            let high = from.upper_bound().max(to.upper_bound());
            Predicate::all([
                Predicate::at_least(Field::Closes, Value::Timestamp(low)),
                Predicate::at_most(Field::Closes, Value::Timestamp(high)),
            ])
        }
    }
}

fn nutrition_level_predicate(field: Field, levels: &[NutritionLevel]) -> Predicate {
    tracing::debug!(
        field = field.name(),
        levels = ?levels.iter().map(|l| l.code()).collect::<Vec<_>>(),
        "Filtering by nutrition level"
    );
    Predicate::any(
        levels
            .iter()
            .map(|l| Predicate::equals(field, Value::Text(l.code().to_string()))),
    )
}
