use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a business registers under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessType {
    AccommodationAndFood,
    Retail,
    Charity,
    NonProfit,
}

impl BusinessType {
    pub const ALL: [BusinessType; 4] = [
        Self::AccommodationAndFood,
        Self::Retail,
        Self::Charity,
        Self::NonProfit,
    ];

    /// Storage code, also accepted by `parse`.
    pub fn code(self) -> &'static str {
        match self {
            Self::AccommodationAndFood => "ACCOMMODATION_AND_FOOD",
            Self::Retail => "RETAIL",
            Self::Charity => "CHARITY",
            Self::NonProfit => "NON_PROFIT",
        }
    }

    /// Human readable label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Self::AccommodationAndFood => "Accommodation and Food Services",
            Self::Retail => "Retail Trade",
            Self::Charity => "Charitable organisation",
            Self::NonProfit => "Non-profit organisation",
        }
    }

    /// Accepts either the storage code (case-insensitive) or the exact label.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL.into_iter().find(|t| {
            t.code().eq_ignore_ascii_case(trimmed) || t.label() == trimmed
        })
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub business_type: BusinessType,
    pub address: Address,
}
