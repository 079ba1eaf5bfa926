//! Listing search parameter parsing and normalization.
//!
//! Query strings are first collected into [`RawListingSearchParams`] without
//! interpretation, then [`normalize`] turns them into [`SearchParams`] in one
//! pass: defaults are applied, values are parsed, empty lists become absent and
//! a pair of closing dates is ordered low to high.
//!
//! List-valued parameters (`searchKeys`, `filterDates`, `businessTypes`, the
//! nutrient levels) may be repeated or comma separated.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::fmt;

use super::escape::split_list_value;
use super::pagination::{
    parse_bool, parse_page_index, parse_sort_field, ListingSortBy, PageRequest, SortField,
    DEFAULT_PAGE_END_INDEX,
};
use crate::models::product::NOVA_GROUP_RANGE;
use crate::models::{BusinessType, NutriScore, NutritionLevel};
use crate::{Error, Result};

/// Entity field a free-text term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKey {
    ProductName,
    BusinessName,
    /// City or country of the business address.
    Address,
}

impl SearchKey {
    pub const ALL: [SearchKey; 3] = [Self::ProductName, Self::BusinessName, Self::Address];

    pub fn name(self) -> &'static str {
        match self {
            Self::ProductName => "PRODUCT_NAME",
            Self::BusinessName => "BUSINESS_NAME",
            Self::Address => "ADDRESS",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(trimmed))
    }
}

/// A closing-date bound as supplied by the client: either an RFC 3339
/// instant or a calendar day (UTC) covering the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDate {
    Instant(DateTime<Utc>),
    Day(NaiveDate),
}

impl FilterDate {
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(Self::Instant(instant.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(Self::Day)
    }

    /// Earliest instant covered by this bound.
    pub fn lower_bound(self) -> DateTime<Utc> {
        match self {
            Self::Instant(instant) => instant,
            Self::Day(day) => start_of_day(day),
        }
    }

    /// Latest instant covered by this bound.
    pub fn upper_bound(self) -> DateTime<Utc> {
        match self {
            Self::Instant(instant) => instant,
            Self::Day(day) => match day.succ_opt() {
                Some(next) => start_of_day(next) - chrono::Duration::microseconds(1),
                None => start_of_day(day),
            },
        }
    }
}

impl fmt::Display for FilterDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
            Self::Day(day) => write!(f, "{day}"),
        }
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::default()))
}

/// Closing-date restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosingDateFilter {
    /// Closes on or before the date.
    OnOrBefore(FilterDate),
    /// Closes anywhere in the span covered by both dates, inclusive.
    /// `from` is never after `to`.
    Between { from: FilterDate, to: FilterDate },
}

impl ClosingDateFilter {
    /// Order two dates so the earlier one is the lower bound. Ties on the
    /// lower bound (a day and its midnight instant) break on the upper bound.
    pub fn between(a: FilterDate, b: FilterDate) -> Self {
        if (b.lower_bound(), b.upper_bound()) < (a.lower_bound(), a.upper_bound()) {
            Self::Between { from: b, to: a }
        } else {
            Self::Between { from: a, to: b }
        }
    }
}

/// Listing search parameters exactly as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListingSearchParams {
    pub search_query: Option<String>,
    pub search_keys: Vec<String>,
    pub pag_start_index: Option<String>,
    pub pag_end_index: Option<String>,
    pub sort_by: Option<String>,
    pub is_ascending: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub filter_dates: Vec<String>,
    pub business_types: Vec<String>,
    pub fat: Vec<String>,
    pub saturated_fat: Vec<String>,
    pub sugars: Vec<String>,
    pub salt: Vec<String>,
    pub is_vegan: Option<String>,
    pub is_vegetarian: Option<String>,
    pub is_gluten_free: Option<String>,
    pub is_palm_oil_free: Option<String>,
    pub is_dairy_free: Option<String>,
    pub min_nutri_score: Option<String>,
    pub max_nutri_score: Option<String>,
    pub min_nova_group: Option<String>,
    pub max_nova_group: Option<String>,
}

impl RawListingSearchParams {
    /// Collect decoded query pairs. Unknown keys are ignored; single-valued
    /// keys must not repeat.
    pub fn from_items(items: &[(String, String)]) -> Result<Self> {
        let mut raw = Self::default();

        for (key, value) in items {
            match key.as_str() {
                "searchQuery" => set_once(&mut raw.search_query, key, value)?,
                "searchKeys" => raw.search_keys.extend(split_list_value(value)),
                "pagStartIndex" => set_once(&mut raw.pag_start_index, key, value)?,
                "pagEndIndex" => set_once(&mut raw.pag_end_index, key, value)?,
                "sortBy" => set_once(&mut raw.sort_by, key, value)?,
                "isAscending" => set_once(&mut raw.is_ascending, key, value)?,
                "minPrice" => set_once(&mut raw.min_price, key, value)?,
                "maxPrice" => set_once(&mut raw.max_price, key, value)?,
                "filterDates" => raw.filter_dates.extend(split_list_value(value)),
                "businessTypes" => raw.business_types.extend(split_list_value(value)),
                "fat" => raw.fat.extend(split_list_value(value)),
                "saturatedFat" => raw.saturated_fat.extend(split_list_value(value)),
                "sugars" => raw.sugars.extend(split_list_value(value)),
                "salt" => raw.salt.extend(split_list_value(value)),
                "isVegan" => set_once(&mut raw.is_vegan, key, value)?,
                "isVegetarian" => set_once(&mut raw.is_vegetarian, key, value)?,
                "isGlutenFree" => set_once(&mut raw.is_gluten_free, key, value)?,
                "isPalmOilFree" => set_once(&mut raw.is_palm_oil_free, key, value)?,
                "isDairyFree" => set_once(&mut raw.is_dairy_free, key, value)?,
                "minNutriScore" => set_once(&mut raw.min_nutri_score, key, value)?,
                "maxNutriScore" => set_once(&mut raw.max_nutri_score, key, value)?,
                "minNovaGroup" => set_once(&mut raw.min_nova_group, key, value)?,
                "maxNovaGroup" => set_once(&mut raw.max_nova_group, key, value)?,
                other => {
                    tracing::debug!(parameter = other, "Ignoring unknown search parameter");
                }
            }
        }

        Ok(raw)
    }
}

fn set_once(slot: &mut Option<String>, key: &str, value: &str) -> Result<()> {
    if slot.is_some() {
        return Err(Error::Validation(format!(
            "Search parameter '{key}' must not appear more than once"
        )));
    }
    *slot = Some(value.to_string());
    Ok(())
}

/// Normalized listing search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub query: String,
    /// Never empty.
    pub search_keys: Vec<SearchKey>,
    /// Not yet validated; see [`SearchParams::page_request`].
    pub start_index: i64,
    pub end_index: i64,
    /// Not yet validated; see [`SearchParams::page_request`].
    pub sort_by: String,
    pub ascending: bool,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub closing_dates: Option<ClosingDateFilter>,
    pub business_types: Option<Vec<BusinessType>>,
    pub fat: Option<Vec<NutritionLevel>>,
    pub saturated_fat: Option<Vec<NutritionLevel>>,
    pub sugars: Option<Vec<NutritionLevel>>,
    pub salt: Option<Vec<NutritionLevel>>,
    pub is_vegan: Option<bool>,
    pub is_vegetarian: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub is_palm_oil_free: Option<bool>,
    pub is_dairy_free: Option<bool>,
    pub min_nutri_score: Option<NutriScore>,
    pub max_nutri_score: Option<NutriScore>,
    pub min_nova_group: Option<i32>,
    pub max_nova_group: Option<i32>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            search_keys: vec![SearchKey::ProductName],
            start_index: 0,
            end_index: DEFAULT_PAGE_END_INDEX,
            sort_by: ListingSortBy::Created.name().to_string(),
            ascending: true,
            min_price: None,
            max_price: None,
            closing_dates: None,
            business_types: None,
            fat: None,
            saturated_fat: None,
            sugars: None,
            salt: None,
            is_vegan: None,
            is_vegetarian: None,
            is_gluten_free: None,
            is_palm_oil_free: None,
            is_dairy_free: None,
            min_nutri_score: None,
            max_nutri_score: None,
            min_nova_group: None,
            max_nova_group: None,
        }
    }
}

impl SearchParams {
    /// Validate the page bounds and sort field.
    pub fn page_request(&self) -> Result<PageRequest<ListingSortBy>> {
        let sort_by = parse_sort_field(&self.sort_by)?;
        PageRequest::new(
            self.start_index,
            Some(self.end_index),
            sort_by,
            self.ascending,
        )
    }
}

/// Apply defaults and parse every raw value.
pub fn normalize(raw: RawListingSearchParams) -> Result<SearchParams> {
    let defaults = SearchParams::default();

    let search_keys = {
        let keys = raw
            .search_keys
            .iter()
            .map(|k| parse_enum("searchKeys", k, SearchKey::parse))
            .collect::<Result<Vec<_>>>()?;
        let mut unique: Vec<SearchKey> = Vec::with_capacity(keys.len());
        for key in keys {
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        if unique.is_empty() {
            defaults.search_keys
        } else {
            unique
        }
    };

    let closing_dates = {
        let dates = raw
            .filter_dates
            .iter()
            .map(|d| {
                FilterDate::parse(d).ok_or_else(|| {
                    Error::Validation(format!(
                        "filterDates must be RFC 3339 timestamps or YYYY-MM-DD dates, got '{d}'"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        match dates.as_slice() {
            [] => None,
            [single] => Some(ClosingDateFilter::OnOrBefore(*single)),
            [a, b] => Some(ClosingDateFilter::between(*a, *b)),
            more => {
                return Err(Error::Validation(format!(
                    "filterDates accepts one or two dates, got {}",
                    more.len()
                )))
            }
        }
    };

    Ok(SearchParams {
        query: raw.search_query.unwrap_or_default(),
        search_keys,
        start_index: parse_page_index("pagStartIndex", raw.pag_start_index.as_deref())?
            .unwrap_or(defaults.start_index),
        end_index: parse_page_index("pagEndIndex", raw.pag_end_index.as_deref())?
            .unwrap_or(defaults.end_index),
        sort_by: raw
            .sort_by
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.sort_by),
        ascending: opt_bool("isAscending", raw.is_ascending)?.unwrap_or(defaults.ascending),
        min_price: opt_price("minPrice", raw.min_price)?,
        max_price: opt_price("maxPrice", raw.max_price)?,
        closing_dates,
        business_types: enum_list("businessTypes", &raw.business_types, BusinessType::parse)?,
        fat: enum_list("fat", &raw.fat, NutritionLevel::parse)?,
        saturated_fat: enum_list("saturatedFat", &raw.saturated_fat, NutritionLevel::parse)?,
        sugars: enum_list("sugars", &raw.sugars, NutritionLevel::parse)?,
        salt: enum_list("salt", &raw.salt, NutritionLevel::parse)?,
        is_vegan: opt_bool("isVegan", raw.is_vegan)?,
        is_vegetarian: opt_bool("isVegetarian", raw.is_vegetarian)?,
        is_gluten_free: opt_bool("isGlutenFree", raw.is_gluten_free)?,
        is_palm_oil_free: opt_bool("isPalmOilFree", raw.is_palm_oil_free)?,
        is_dairy_free: opt_bool("isDairyFree", raw.is_dairy_free)?,
        min_nutri_score: opt_enum("minNutriScore", raw.min_nutri_score, NutriScore::parse)?,
        max_nutri_score: opt_enum("maxNutriScore", raw.max_nutri_score, NutriScore::parse)?,
        min_nova_group: opt_nova_group("minNovaGroup", raw.min_nova_group)?,
        max_nova_group: opt_nova_group("maxNovaGroup", raw.max_nova_group)?,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_enum<T>(name: &str, value: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    parse(value).ok_or_else(|| Error::Validation(format!("Invalid {name} value: {value}")))
}

fn opt_enum<T>(
    name: &str,
    value: Option<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    non_blank(value)
        .map(|v| parse_enum(name, &v, parse))
        .transpose()
}

fn enum_list<T: PartialEq>(
    name: &str,
    values: &[String],
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<Vec<T>>> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for value in values {
        let parsed = parse_enum(name, value, &parse)?;
        if !out.contains(&parsed) {
            out.push(parsed);
        }
    }
    Ok(if out.is_empty() { None } else { Some(out) })
}

fn opt_bool(name: &str, value: Option<String>) -> Result<Option<bool>> {
    non_blank(value).map(|v| parse_bool(name, &v)).transpose()
}

fn opt_price(name: &str, value: Option<String>) -> Result<Option<f64>> {
    non_blank(value)
        .map(|v| match v.parse::<f64>() {
            Ok(price) if price.is_finite() => Ok(price),
            _ => Err(Error::Validation(format!("Invalid {name} value: {v}"))),
        })
        .transpose()
}

fn opt_nova_group(name: &str, value: Option<String>) -> Result<Option<i32>> {
    non_blank(value)
        .map(|v| match v.parse::<i32>() {
            Ok(group) if NOVA_GROUP_RANGE.contains(&group) => Ok(group),
            _ => Err(Error::Validation(format!(
                "{name} must be an integer between {} and {}, got '{v}'",
                NOVA_GROUP_RANGE.start(),
                NOVA_GROUP_RANGE.end()
            ))),
        })
        .transpose()
}
