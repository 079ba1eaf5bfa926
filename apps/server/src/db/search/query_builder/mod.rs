//! SQL query builder for listing and market listing searches.
//!
//! Renders a [`Predicate`] into a Postgres `WHERE` clause with positional
//! (`$n`) binds, and wraps it in:
//! - a page query (ordered, `OFFSET`/`LIMIT` bounded)
//! - a count query over the same matches, ignoring pagination

use chrono::{DateTime, Utc};

use super::escape::escape_like_pattern;
use super::pagination::{ListingSortBy, MarketListingSortBy, PageRequest};
use super::predicate::{Comparison, Field, Predicate, Value};
use crate::models::MarketListingSection;

mod bind;

use bind::{push_bool, push_float, push_int, push_text, push_timestamp};

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

const LISTING_COLUMNS: &str = "SELECT l.id, l.quantity, l.price, l.more_info, l.created, l.closes, \
     i.id AS inventory_item_id, i.quantity AS inventory_quantity, i.price_per_item, i.total_price, \
     i.manufactured, i.sell_by, i.best_before, i.expires, \
     p.id AS product_id, p.name AS product_name, p.manufacturer, p.fat, p.saturated_fat, \
     p.sugars, p.salt, p.is_vegan, p.is_vegetarian, p.is_gluten_free, p.is_palm_oil_free, \
     p.is_dairy_free, p.nutri_score, p.nova_group, \
     b.id AS business_id, b.name AS business_name, b.business_type, a.city, a.country";

const LISTING_FROM: &str = " FROM listings l \
     JOIN inventory_items i ON i.id = l.inventory_item_id \
     JOIN products p ON p.id = i.product_id \
     JOIN businesses b ON b.id = i.business_id \
     JOIN addresses a ON a.id = b.address_id";

fn column(field: Field) -> &'static str {
    match field {
        Field::ProductName => "p.name",
        Field::BusinessName => "b.name",
        Field::AddressCity => "a.city",
        Field::AddressCountry => "a.country",
        Field::BusinessId => "b.id",
        Field::BusinessType => "b.business_type",
        Field::Price => "l.price",
        Field::Closes => "l.closes",
        Field::Fat => "p.fat",
        Field::SaturatedFat => "p.saturated_fat",
        Field::Sugars => "p.sugars",
        Field::Salt => "p.salt",
        Field::IsVegan => "p.is_vegan",
        Field::IsVegetarian => "p.is_vegetarian",
        Field::IsGlutenFree => "p.is_gluten_free",
        Field::IsPalmOilFree => "p.is_palm_oil_free",
        Field::IsDairyFree => "p.is_dairy_free",
        Field::NutriScore => "p.nutri_score",
        Field::NovaGroup => "p.nova_group",
    }
}

fn push_value(bind_params: &mut Vec<BindValue>, value: &Value) -> usize {
    match value {
        Value::Text(v) => push_text(bind_params, v.clone()),
        Value::Number(v) => push_float(bind_params, *v),
        Value::Integer(v) => push_int(bind_params, *v),
        Value::Bool(v) => push_bool(bind_params, *v),
        Value::Timestamp(v) => push_timestamp(bind_params, *v),
    }
}

impl Predicate {
    /// Render as a SQL boolean expression over the listing joins.
    pub(crate) fn build_sql(&self, bind_params: &mut Vec<BindValue>) -> String {
        match self {
            Self::Always => "TRUE".to_string(),
            Self::Compare { field, op, value } => {
                let col = column(*field);
                match op {
                    Comparison::Contains => {
                        let needle = match value {
                            Value::Text(v) => v.clone(),
                            other => other.to_string(),
                        };
                        let idx = push_text(
                            bind_params,
                            format!("%{}%", escape_like_pattern(&needle)),
                        );
                        format!("{col} ILIKE ${idx} ESCAPE E'\\\\'")
                    }
                    Comparison::Equals => format!("{col} = ${}", push_value(bind_params, value)),
                    Comparison::AtLeast => format!("{col} >= ${}", push_value(bind_params, value)),
                    Comparison::AtMost => format!("{col} <= ${}", push_value(bind_params, value)),
                }
            }
            Self::And(parts) if parts.is_empty() => "TRUE".to_string(),
            Self::Or(parts) if parts.is_empty() => "FALSE".to_string(),
            Self::And(parts) => join_sql(parts, " AND ", bind_params),
            Self::Or(parts) => join_sql(parts, " OR ", bind_params),
        }
    }
}

fn join_sql(parts: &[Predicate], joiner: &str, bind_params: &mut Vec<BindValue>) -> String {
    let rendered: Vec<String> = parts.iter().map(|p| p.build_sql(bind_params)).collect();
    format!("({})", rendered.join(joiner))
}

/// Listing search: a predicate plus a validated page.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub predicate: Predicate,
    pub page: PageRequest<ListingSortBy>,
}

impl ListingQuery {
    pub fn new(predicate: Predicate, page: PageRequest<ListingSortBy>) -> Self {
        Self { predicate, page }
    }

    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let clause = self.predicate.build_sql(&mut bind_params);
        let sql = format!(
            "{LISTING_COLUMNS}{LISTING_FROM} WHERE {clause}{}",
            self.page.order_and_limit_sql()
        );
        (sql, bind_params)
    }

    pub fn build_count_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let clause = self.predicate.build_sql(&mut bind_params);
        let sql = format!("SELECT COUNT(*){LISTING_FROM} WHERE {clause}");
        (sql, bind_params)
    }
}

/// Cards of one section.
#[derive(Debug, Clone)]
pub struct MarketListingQuery {
    pub section: MarketListingSection,
    pub page: PageRequest<MarketListingSortBy>,
}

impl MarketListingQuery {
    pub fn new(section: MarketListingSection, page: PageRequest<MarketListingSortBy>) -> Self {
        Self { section, page }
    }

    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let idx = push_text(&mut bind_params, self.section.code().to_string());
        let sql = format!(
            "SELECT m.id, m.creator_id, m.section, m.created, m.display_period_end, m.title, \
             m.description, ARRAY(SELECT k.keyword_id FROM market_listing_keywords k \
             WHERE k.market_listing_id = m.id ORDER BY k.keyword_id) AS keyword_ids \
             FROM market_listings m WHERE m.section = ${idx}{}",
            self.page.order_and_limit_sql()
        );
        (sql, bind_params)
    }

    pub fn build_count_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let idx = push_text(&mut bind_params, self.section.code().to_string());
        let sql = format!("SELECT COUNT(*) FROM market_listings m WHERE m.section = ${idx}");
        (sql, bind_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::search::compose::build_listing_predicate;
    use crate::db::search::params::SearchParams;

    fn page() -> PageRequest<ListingSortBy> {
        PageRequest::new(0, Some(9), ListingSortBy::Created, true).unwrap()
    }

    #[test]
    fn unfiltered_search_renders_true() {
        let query = ListingQuery::new(Predicate::Always, page());
        let (sql, binds) = query.build_count_sql();
        assert!(sql.ends_with(" WHERE TRUE"), "{sql}");
        assert!(binds.is_empty());
    }

    #[test]
    fn contains_escapes_like_wildcards() {
        let query = ListingQuery::new(Predicate::contains(Field::ProductName, "50%_off"), page());
        let (sql, binds) = query.build_sql();
        assert!(sql.contains(r"WHERE p.name ILIKE $1 ESCAPE E'\\'"), "{sql}");
        assert_eq!(binds, vec![BindValue::Text(r"%50\%\_off%".to_string())]);
    }

    #[test]
    fn page_and_count_share_the_where_clause() {
        let params = SearchParams {
            query: r#""Milk" OR Bread"#.to_string(),
            min_price: Some(5.0),
            ..SearchParams::default()
        };
        let query = ListingQuery::new(build_listing_predicate(&params, 32), page());
        let (sql, binds) = query.build_sql();
        let (count_sql, count_binds) = query.build_count_sql();

        let clause = "WHERE ((p.name = $1 OR p.name ILIKE $2 ESCAPE E'\\\\') AND l.price >= $3)";
        assert!(sql.contains(clause), "{sql}");
        assert!(count_sql.ends_with(clause), "{count_sql}");
        assert!(sql.ends_with("ORDER BY l.created ASC, l.id ASC OFFSET 0 LIMIT 10"));
        assert_eq!(binds, count_binds);
        assert_eq!(
            binds,
            vec![
                BindValue::Text("Milk".to_string()),
                BindValue::Text("%Bread%".to_string()),
                BindValue::Float(5.0),
            ]
        );
    }

    #[test]
    fn empty_disjunction_renders_false() {
        let mut binds = Vec::new();
        assert_eq!(Predicate::Or(Vec::new()).build_sql(&mut binds), "FALSE");
    }

    #[test]
    fn market_listing_query_filters_by_section() {
        let page = PageRequest::new(0, None, MarketListingSortBy::Id, false).unwrap();
        let query = MarketListingQuery::new(MarketListingSection::Wanted, page);
        let (sql, binds) = query.build_sql();
        assert!(sql.contains("WHERE m.section = $1 ORDER BY m.id DESC OFFSET 0"));
        assert_eq!(binds, vec![BindValue::Text("Wanted".to_string())]);
    }
}
