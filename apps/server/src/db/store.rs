//! PostgreSQL implementations of the storage traits

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::time::Instant;

use crate::{
    db::search::{BindValue, ListingQuery, MarketListingQuery, MarketListingSortBy, PageRequest},
    db::traits::{ListingStore, MarketListingStore},
    models::{
        Address, Business, BusinessType, InventoryItem, Listing, MarketListing,
        MarketListingSection, NewMarketListing, NutriScore, NutritionLevel, Page, Product,
    },
    Error, Result,
};

#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: i64,
    quantity: i64,
    price: f64,
    more_info: Option<String>,
    created: DateTime<Utc>,
    closes: DateTime<Utc>,
    inventory_item_id: i64,
    inventory_quantity: i64,
    price_per_item: Option<f64>,
    total_price: Option<f64>,
    manufactured: Option<NaiveDate>,
    sell_by: Option<NaiveDate>,
    best_before: Option<NaiveDate>,
    expires: NaiveDate,
    product_id: i64,
    product_name: String,
    manufacturer: Option<String>,
    fat: Option<String>,
    saturated_fat: Option<String>,
    sugars: Option<String>,
    salt: Option<String>,
    is_vegan: bool,
    is_vegetarian: bool,
    is_gluten_free: bool,
    is_palm_oil_free: bool,
    is_dairy_free: bool,
    nutri_score: Option<String>,
    nova_group: Option<i32>,
    business_id: i64,
    business_name: String,
    business_type: String,
    city: String,
    country: String,
}

fn decode_code<T>(
    column: &str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    value
        .map(|v| {
            parse(v).ok_or_else(|| Error::Internal(format!("Unknown {column} code '{v}' in row")))
        })
        .transpose()
}

impl TryFrom<ListingRow> for Listing {
    type Error = Error;

    fn try_from(row: ListingRow) -> Result<Self> {
        let level = |column: &str, value: &Option<String>| {
            decode_code(column, value.as_deref(), NutritionLevel::parse)
        };

        let product = Product {
            id: row.product_id,
            name: row.product_name,
            manufacturer: row.manufacturer,
            fat: level("fat", &row.fat)?,
            saturated_fat: level("saturated_fat", &row.saturated_fat)?,
            sugars: level("sugars", &row.sugars)?,
            salt: level("salt", &row.salt)?,
            is_vegan: row.is_vegan,
            is_vegetarian: row.is_vegetarian,
            is_gluten_free: row.is_gluten_free,
            is_palm_oil_free: row.is_palm_oil_free,
            is_dairy_free: row.is_dairy_free,
            nutri_score: decode_code("nutri_score", row.nutri_score.as_deref(), NutriScore::parse)?,
            nova_group: row.nova_group,
        };

        let business_type =
            decode_code("business_type", Some(&row.business_type), BusinessType::parse)?
                .ok_or_else(|| Error::Internal("Missing business type".to_string()))?;
        let business = Business {
            id: row.business_id,
            name: row.business_name,
            business_type,
            address: Address {
                city: row.city,
                country: row.country,
            },
        };

        Ok(Listing {
            id: row.id,
            inventory_item: InventoryItem {
                id: row.inventory_item_id,
                product,
                business,
                quantity: row.inventory_quantity,
                price_per_item: row.price_per_item,
                total_price: row.total_price,
                manufactured: row.manufactured,
                sell_by: row.sell_by,
                best_before: row.best_before,
                expires: row.expires,
            },
            quantity: row.quantity,
            price: row.price,
            more_info: row.more_info,
            created: row.created,
            closes: row.closes,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MarketListingRow {
    id: i64,
    creator_id: i64,
    section: String,
    created: DateTime<Utc>,
    display_period_end: DateTime<Utc>,
    title: String,
    description: Option<String>,
    keyword_ids: Vec<i64>,
}

impl TryFrom<MarketListingRow> for MarketListing {
    type Error = Error;

    fn try_from(row: MarketListingRow) -> Result<Self> {
        let section = MarketListingSection::parse(&row.section).ok_or_else(|| {
            Error::Internal(format!(
                "Unknown section '{}' for market listing {}",
                row.section, row.id
            ))
        })?;
        Ok(MarketListing {
            id: row.id,
            creator_id: row.creator_id,
            section,
            created: row.created,
            display_period_end: row.display_period_end,
            title: row.title,
            description: row.description,
            keyword_ids: row.keyword_ids,
        })
    }
}

/// Read-only transaction whose statements all see one snapshot, so a count
/// and the page it describes agree.
async fn begin_snapshot(pool: &PgPool) -> Result<Transaction<'static, Postgres>> {
    let mut tx = pool.begin().await.map_err(Error::Database)?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;
    Ok(tx)
}

async fn count_total(conn: &mut PgConnection, sql: &str, binds: Vec<BindValue>) -> Result<i64> {
    let mut query = sqlx::query_scalar::<_, i64>(sql);
    for value in binds {
        query = match value {
            BindValue::Text(v) => query.bind(v),
            BindValue::Float(v) => query.bind(v),
            BindValue::Int(v) => query.bind(v),
            BindValue::Bool(v) => query.bind(v),
            BindValue::Timestamp(v) => query.bind(v),
        };
    }
    query.fetch_one(&mut *conn).await.map_err(Error::Database)
}

async fn fetch_rows<T>(conn: &mut PgConnection, sql: &str, binds: Vec<BindValue>) -> Result<Vec<T>>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    let mut query = sqlx::query_as::<_, T>(sql);
    for value in binds {
        query = match value {
            BindValue::Text(v) => query.bind(v),
            BindValue::Float(v) => query.bind(v),
            BindValue::Int(v) => query.bind(v),
            BindValue::Bool(v) => query.bind(v),
            BindValue::Timestamp(v) => query.bind(v),
        };
    }
    query.fetch_all(&mut *conn).await.map_err(Error::Database)
}

/// Listing search over the relational schema in `migrations/`.
#[derive(Clone)]
pub struct PostgresListingStore {
    pool: PgPool,
}

impl PostgresListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingStore for PostgresListingStore {
    #[tracing::instrument(name = "listing_store.search", skip_all)]
    async fn search(&self, query: &ListingQuery) -> Result<Page<Listing>> {
        let (count_sql, count_binds) = query.build_count_sql();
        let (page_sql, page_binds) = query.build_sql();
        tracing::debug!(sql = %page_sql, binds = page_binds.len(), "Executing listing search");

        let started = Instant::now();
        let mut tx = begin_snapshot(&self.pool).await?;

        let total = count_total(&mut tx, &count_sql, count_binds).await?;
        let rows: Vec<ListingRow> = if total == 0 {
            Vec::new()
        } else {
            fetch_rows(&mut tx, &page_sql, page_binds).await?
        };
        tx.commit().await.map_err(Error::Database)?;

        tracing::debug!(
            total,
            returned = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Listing search complete"
        );

        let listings = rows
            .into_iter()
            .map(Listing::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(listings, total))
    }

    async fn business_exists(&self, business_id: i64) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM businesses WHERE id = $1)")
            .bind(business_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }
}

#[derive(Clone)]
pub struct PostgresMarketListingStore {
    pool: PgPool,
}

impl PostgresMarketListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarketListingStore for PostgresMarketListingStore {
    async fn insert(&self, card: NewMarketListing) -> Result<i64> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO market_listings (
                creator_id,
                section,
                created,
                display_period_end,
                title,
                description
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(card.creator_id)
        .bind(card.section.code())
        .bind(card.created)
        .bind(card.display_period_end)
        .bind(&card.title)
        .bind(card.description.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if !card.keyword_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO market_listing_keywords (market_listing_id, keyword_id)
                SELECT $1, UNNEST($2::bigint[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(&card.keyword_ids)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        Ok(id)
    }

    #[tracing::instrument(name = "market_listing_store.list", skip(self, page))]
    async fn list_by_section(
        &self,
        section: MarketListingSection,
        page: &PageRequest<MarketListingSortBy>,
    ) -> Result<Page<MarketListing>> {
        let query = MarketListingQuery::new(section, *page);
        let (count_sql, count_binds) = query.build_count_sql();
        let (page_sql, page_binds) = query.build_sql();

        let mut tx = begin_snapshot(&self.pool).await?;
        let total = count_total(&mut tx, &count_sql, count_binds).await?;
        let rows: Vec<MarketListingRow> = if total == 0 {
            Vec::new()
        } else {
            fetch_rows(&mut tx, &page_sql, page_binds).await?
        };
        tx.commit().await.map_err(Error::Database)?;

        let cards = rows
            .into_iter()
            .map(MarketListing::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(cards, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> anyhow::Result<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL")?;
        Ok(sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await?)
    }

    #[tokio::test]
    #[ignore = "needs a Postgres database in TEST_DATABASE_URL"]
    async fn count_and_page_share_one_snapshot() -> anyhow::Result<()> {
        let pool = test_pool().await?;
        let table = format!("snapshot_{}", uuid::Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE TABLE {table} (id BIGINT PRIMARY KEY)"))
            .execute(&pool)
            .await?;
        sqlx::query(&format!("INSERT INTO {table} (id) VALUES (1), (2)"))
            .execute(&pool)
            .await?;

        let mut tx = begin_snapshot(&pool).await?;
        let isolation: String = sqlx::query_scalar("SHOW transaction_isolation")
            .fetch_one(&mut *tx)
            .await?;
        assert_eq!(isolation, "repeatable read");
        let read_only: String = sqlx::query_scalar("SHOW transaction_read_only")
            .fetch_one(&mut *tx)
            .await?;
        assert_eq!(read_only, "on");

        let count_sql = format!("SELECT COUNT(*) FROM {table}");
        let before = count_total(&mut tx, &count_sql, Vec::new()).await?;

        sqlx::query(&format!("INSERT INTO {table} (id) VALUES (3)"))
            .execute(&pool)
            .await?;

        let after = count_total(&mut tx, &count_sql, Vec::new()).await?;
        tx.commit().await?;
        assert_eq!(before, after, "concurrent insert leaked into the snapshot");

        let committed = sqlx::query_scalar::<_, i64>(&count_sql)
            .fetch_one(&pool)
            .await?;
        assert_eq!(committed, 3);

        sqlx::query(&format!("DROP TABLE {table}"))
            .execute(&pool)
            .await?;
        Ok(())
    }
}
