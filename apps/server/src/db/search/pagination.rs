//! Pagination and sorting.
//!
//! Pages are addressed with an inclusive `[start, end]` index range over the
//! ordered result set. Sort fields are per-entity enums implementing
//! [`SortField`]; every ordering ends with the row id so pages are stable.

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::models::{Listing, MarketListing};
use crate::{Error, Result};

/// End index used when the client does not bound the page.
pub const DEFAULT_PAGE_END_INDEX: i64 = 1_000_000_000;

/// Sortable attribute of a record type.
pub trait SortField: Copy + Debug + PartialEq + Send + Sync + 'static {
    type Record;

    /// Every accepted name, in declaration order.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Qualified SQL column the field orders by.
    fn column(self) -> &'static str;

    /// SQL column of the id tie-breaker.
    fn id_column() -> &'static str;

    fn compare(self, a: &Self::Record, b: &Self::Record) -> Ordering;

    fn record_id(record: &Self::Record) -> i64;

    fn parse(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(trimmed))
    }

    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Resolve a client supplied sort field name.
pub fn parse_sort_field<S: SortField>(raw: &str) -> Result<S> {
    S::parse(raw).ok_or_else(|| Error::InvalidSortField {
        field: raw.to_string(),
        allowed: S::allowed(),
    })
}

/// Parse an optional page index. Unparseable values are a pagination error.
pub fn parse_page_index(name: &str, raw: Option<&str>) -> Result<Option<i64>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse::<i64>().map(Some).map_err(|_| {
            Error::InvalidPaginationInput(format!("{name} must be an integer, got '{value}'"))
        }),
    }
}

pub fn parse_ascending(raw: Option<&str>) -> Result<bool> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(true),
        Some(value) => parse_bool("isAscending", value),
    }
}

pub(crate) fn parse_bool(name: &str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::Validation(format!(
            "{name} must be true or false, got '{value}'"
        )))
    }
}

/// Value of a query key that must not repeat.
pub fn single_value<'a>(items: &'a [(String, String)], key: &str) -> Result<Option<&'a str>> {
    let mut values = items.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str());
    let first = values.next();
    if values.next().is_some() {
        return Err(Error::Validation(format!(
            "Query parameter '{key}' must not appear more than once"
        )));
    }
    Ok(first)
}

/// Validated page bounds and ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest<S> {
    pub start: i64,
    /// Inclusive.
    pub end: i64,
    pub sort_by: S,
    pub ascending: bool,
}

impl<S: SortField> PageRequest<S> {
    pub fn new(start: i64, end: Option<i64>, sort_by: S, ascending: bool) -> Result<Self> {
        if start < 0 {
            return Err(Error::InvalidPaginationInput(format!(
                "start index must be zero or greater, got {start}"
            )));
        }
        let end = end.unwrap_or(DEFAULT_PAGE_END_INDEX);
        if end < start {
            return Err(Error::InvalidPaginationInput(format!(
                "end index {end} is before start index {start}"
            )));
        }
        Ok(Self {
            start,
            end,
            sort_by,
            ascending,
        })
    }

    /// Build from raw query values, applying defaults.
    pub fn from_raw(
        start: Option<&str>,
        end: Option<&str>,
        sort_by: Option<&str>,
        ascending: Option<&str>,
        default_sort: S,
    ) -> Result<Self> {
        let sort_by = match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_sort_field(raw)?,
            None => default_sort,
        };
        let start = parse_page_index("pagStartIndex", start)?.unwrap_or(0);
        let end = parse_page_index("pagEndIndex", end)?;
        Self::new(start, end, sort_by, parse_ascending(ascending)?)
    }

    /// Build from decoded query pairs (`pagStartIndex`, `pagEndIndex`,
    /// `sortBy`, `isAscending`). Each key may appear at most once.
    pub fn from_items(items: &[(String, String)], default_sort: S) -> Result<Self> {
        Self::from_raw(
            single_value(items, "pagStartIndex")?,
            single_value(items, "pagEndIndex")?,
            single_value(items, "sortBy")?,
            single_value(items, "isAscending")?,
            default_sort,
        )
    }

    pub fn offset(&self) -> i64 {
        self.start
    }

    /// Page size implied by the inclusive bounds.
    pub fn limit(&self) -> i64 {
        (self.end - self.start).saturating_add(1)
    }

    pub fn direction_sql(&self) -> &'static str {
        if self.ascending {
            "ASC"
        } else {
            "DESC"
        }
    }

    /// `ORDER BY ... OFFSET ... LIMIT ...` tail for a page query.
    pub fn order_and_limit_sql(&self) -> String {
        let dir = self.direction_sql();
        let column = self.sort_by.column();
        let order = if column == S::id_column() {
            format!("{column} {dir}")
        } else {
            format!("{column} {dir}, {} {dir}", S::id_column())
        };
        format!(
            " ORDER BY {order} OFFSET {} LIMIT {}",
            self.offset(),
            self.limit()
        )
    }

    pub fn compare(&self, a: &S::Record, b: &S::Record) -> Ordering {
        let ord = self
            .sort_by
            .compare(a, b)
            .then_with(|| S::record_id(a).cmp(&S::record_id(b)));
        if self.ascending {
            ord
        } else {
            ord.reverse()
        }
    }

    /// Sort `records` and cut out the requested page.
    pub fn apply(&self, mut records: Vec<S::Record>) -> Vec<S::Record> {
        records.sort_by(|a, b| self.compare(a, b));
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        records.into_iter().skip(offset).take(limit).collect()
    }
}

/// Sort fields for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSortBy {
    Created,
    Closes,
    Price,
    Quantity,
    ProductName,
    BusinessName,
    BusinessType,
    Location,
}

impl SortField for ListingSortBy {
    type Record = Listing;

    const ALL: &'static [Self] = &[
        Self::Created,
        Self::Closes,
        Self::Price,
        Self::Quantity,
        Self::ProductName,
        Self::BusinessName,
        Self::BusinessType,
        Self::Location,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Closes => "CLOSES",
            Self::Price => "PRICE",
            Self::Quantity => "QUANTITY",
            Self::ProductName => "PRODUCT_NAME",
            Self::BusinessName => "BUSINESS_NAME",
            Self::BusinessType => "BUSINESS_TYPE",
            Self::Location => "LOCATION",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Created => "l.created",
            Self::Closes => "l.closes",
            Self::Price => "l.price",
            Self::Quantity => "l.quantity",
            Self::ProductName => "p.name",
            Self::BusinessName => "b.name",
            Self::BusinessType => "b.business_type",
            Self::Location => "a.city",
        }
    }

    fn id_column() -> &'static str {
        "l.id"
    }

    fn compare(self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            Self::Created => a.created.cmp(&b.created),
            Self::Closes => a.closes.cmp(&b.closes),
            Self::Price => a.price.total_cmp(&b.price),
            Self::Quantity => a.quantity.cmp(&b.quantity),
            Self::ProductName => a.product().name.cmp(&b.product().name),
            Self::BusinessName => a.business().name.cmp(&b.business().name),
            Self::BusinessType => a
                .business()
                .business_type
                .code()
                .cmp(b.business().business_type.code()),
            Self::Location => a.business().address.city.cmp(&b.business().address.city),
        }
    }

    fn record_id(record: &Listing) -> i64 {
        record.id
    }
}

/// Sort fields for market listing cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketListingSortBy {
    Id,
    Created,
    DisplayPeriodEnd,
    Title,
}

impl SortField for MarketListingSortBy {
    type Record = MarketListing;

    const ALL: &'static [Self] = &[Self::Id, Self::Created, Self::DisplayPeriodEnd, Self::Title];

    fn name(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Created => "CREATED",
            Self::DisplayPeriodEnd => "DISPLAY_PERIOD_END",
            Self::Title => "TITLE",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Id => "m.id",
            Self::Created => "m.created",
            Self::DisplayPeriodEnd => "m.display_period_end",
            Self::Title => "m.title",
        }
    }

    fn id_column() -> &'static str {
        "m.id"
    }

    fn compare(self, a: &MarketListing, b: &MarketListing) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Created => a.created.cmp(&b.created),
            Self::DisplayPeriodEnd => a.display_period_end.cmp(&b.display_period_end),
            Self::Title => a.title.cmp(&b.title),
        }
    }

    fn record_id(record: &MarketListing) -> i64 {
        record.id
    }
}
