//! Market listing service - community marketplace cards

use chrono::{DateTime, Months, Utc};
use std::sync::Arc;
use validator::Validate;

use crate::{
    db::search::pagination::single_value,
    db::search::{MarketListingSortBy, PageRequest},
    db::MarketListingStore,
    metrics,
    models::{CreateMarketListing, MarketListing, MarketListingSection, NewMarketListing, Page},
    Error, Result,
};

/// How long a new card stays on display.
const DISPLAY_PERIOD: Months = Months::new(1);

pub struct MarketListingService {
    store: Arc<dyn MarketListingStore>,
}

impl MarketListingService {
    pub fn new(store: Arc<dyn MarketListingStore>) -> Self {
        Self { store }
    }

    /// Validate and store a new card, returning its id.
    pub async fn create(&self, request: CreateMarketListing) -> Result<i64> {
        self.create_at(request, Utc::now()).await
    }

    /// As [`create`](Self::create) with an explicit creation time.
    pub async fn create_at(
        &self,
        request: CreateMarketListing,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        request
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;

        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::Validation("title must not be blank".to_string()));
        }
        let section = parse_section(Some(request.section.as_str()))?;

        let display_period_end = now.checked_add_months(DISPLAY_PERIOD).ok_or_else(|| {
            Error::Validation(format!("Display period end overflows for {now}"))
        })?;

        let card = NewMarketListing {
            creator_id: request.creator_id,
            section,
            created: now,
            display_period_end,
            title,
            description: request.description.filter(|d| !d.trim().is_empty()),
            keyword_ids: request.keyword_ids,
        };

        let id = self.store.insert(card).await?;
        metrics::CARDS_CREATED_TOTAL
            .with_label_values(&[section.code()])
            .inc();
        tracing::info!(card_id = id, section = %section, "Created market listing");
        Ok(id)
    }

    /// Cards of one section.
    ///
    /// GET /cards?section=...
    pub async fn list(&self, query_items: &[(String, String)]) -> Result<Page<MarketListing>> {
        let result = async {
            let section = parse_section(single_value(query_items, "section")?)?;
            let page = PageRequest::from_items(query_items, MarketListingSortBy::Id)?;
            self.store.list_by_section(section, &page).await
        }
        .await;
        metrics::record_search("cards", &result);
        result
    }
}

fn parse_section(raw: Option<&str>) -> Result<MarketListingSection> {
    let raw = raw.map(str::trim).unwrap_or_default();
    MarketListingSection::parse(raw).ok_or_else(|| {
        let allowed: Vec<&str> = MarketListingSection::ALL.iter().map(|s| s.code()).collect();
        Error::InvalidMarketListingSection(format!(
            "'{raw}', expected one of: {}",
            allowed.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryMarketListingStore;
    use chrono::TimeZone;

    fn request(section: &str, title: &str) -> CreateMarketListing {
        CreateMarketListing {
            creator_id: 3,
            section: section.to_string(),
            title: title.to_string(),
            description: None,
            keyword_ids: vec![2, 1, 2],
        }
    }

    fn service() -> MarketListingService {
        MarketListingService::new(Arc::new(InMemoryMarketListingStore::new()))
    }

    #[tokio::test]
    async fn display_period_ends_one_month_after_creation() {
        let service = service();
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap();
        let id = service
            .create_at(request("ForSale", "Surplus apples"), now)
            .await
            .unwrap();

        let page = service
            .list(&[("section".to_string(), "forSale".to_string())])
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
        let card = &page.results[0];
        assert_eq!(card.id, id);
        assert_eq!(
            card.display_period_end,
            Utc.with_ymd_and_hms(2024, 2, 29, 9, 0, 0).unwrap()
        );
        assert_eq!(card.keyword_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn invalid_cards_are_rejected() {
        let service = service();
        let err = service
            .create(request("ForSale", &"x".repeat(51)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = service.create(request("ForSale", "   ")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = service.create(request("Giveaway", "Chairs")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidMarketListingSection(_)));
    }

    #[tokio::test]
    async fn listing_requires_a_section() {
        let err = service().list(&[]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidMarketListingSection(_)));
    }

    #[tokio::test]
    async fn repeated_section_is_rejected() {
        let err = service()
            .list(&[
                ("section".to_string(), "ForSale".to_string()),
                ("section".to_string(), "Wanted".to_string()),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
