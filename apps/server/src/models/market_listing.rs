use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Marketplace board a card is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketListingSection {
    ForSale,
    Wanted,
    Exchange,
}

impl MarketListingSection {
    pub const ALL: [MarketListingSection; 3] = [Self::ForSale, Self::Wanted, Self::Exchange];

    pub fn code(self) -> &'static str {
        match self {
            Self::ForSale => "ForSale",
            Self::Wanted => "Wanted",
            Self::Exchange => "Exchange",
        }
    }

    /// Accepts `ForSale`, `forsale`, `FOR_SALE` and `for-sale`.
    pub fn parse(value: &str) -> Option<Self> {
        let folded: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect();
        Self::ALL
            .into_iter()
            .find(|s| s.code().eq_ignore_ascii_case(&folded))
    }
}

impl fmt::Display for MarketListingSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Community marketplace card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketListing {
    pub id: i64,
    pub creator_id: i64,
    pub section: MarketListingSection,
    pub created: DateTime<Utc>,
    pub display_period_end: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub keyword_ids: Vec<i64>,
}

/// Client request to create a card.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMarketListing {
    pub creator_id: i64,
    pub section: String,
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    pub keyword_ids: Vec<i64>,
}

/// Card ready to be stored; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarketListing {
    pub creator_id: i64,
    pub section: MarketListingSection,
    pub created: DateTime<Utc>,
    pub display_period_end: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub keyword_ids: Vec<i64>,
}

impl NewMarketListing {
    pub fn into_market_listing(self, id: i64) -> MarketListing {
        MarketListing {
            id,
            creator_id: self.creator_id,
            section: self.section,
            created: self.created,
            display_period_end: self.display_period_end,
            title: self.title,
            description: self.description,
            keyword_ids: self.keyword_ids,
        }
    }
}
