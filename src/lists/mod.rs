//! Display-ready commodity and country lists
//!
//! The `build_*` functions reshape flat API rows; [`ListService`] fetches the
//! rows through a [`DataFetcher`] and applies them.

mod commodities;
mod countries;

pub use commodities::{build_commodity_list, CommodityEntry, CommodityGroup, CommodityItem, CommodityList};
pub use countries::{build_country_list, CountryEntry};

use serde::Serialize;
use serde_json::Value;

use crate::api::RemoteClient;
use crate::cache::CacheStore;
use crate::fetcher::{DataFetcher, RawRow, Resource};
use crate::notify::Notifier;

/// Country listing
pub const COUNTRY_DETAILS: Resource = Resource::new("country_details", "/production_data/country_details");

/// Commodity listing
pub const COMMODITY_DETAIL: Resource = Resource::new("commodity_detail", "/production_data/commodity_detail");

/// Reads a row field as a string
///
/// Numbers and booleans are stringified; missing and null fields read as empty.
pub(crate) fn field_str(row: &RawRow, name: &str) -> String {
    match row.get(name) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Both lists, as shown on the global production page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionOverview {
    pub commodities: CommodityList,
    pub countries: Vec<CountryEntry>,
}

/// Read-only list queries over the production data API
#[derive(Debug)]
pub struct ListService<R, C, N> {
    fetcher: DataFetcher<R, C, N>,
}

impl<R, C, N> ListService<R, C, N>
where
    R: RemoteClient,
    C: CacheStore,
    N: Notifier,
{
    pub fn new(fetcher: DataFetcher<R, C, N>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &DataFetcher<R, C, N> {
        &self.fetcher
    }

    /// Loads all countries, sorted by name
    pub async fn load_countries(&self) -> Vec<CountryEntry> {
        let rows = self.fetcher.fetch_rows(&COUNTRY_DETAILS).await;
        build_country_list(&rows)
    }

    /// Loads all commodities, grouped by parent and keyed by group name
    pub async fn load_commodities(&self) -> CommodityList {
        let rows = self.fetcher.fetch_rows(&COMMODITY_DETAIL).await;
        build_commodity_list(&rows)
    }

    /// Loads both lists concurrently
    pub async fn global_production(&self) -> ProductionOverview {
        let (commodities, countries) = futures::join!(self.load_commodities(), self.load_countries());
        ProductionOverview {
            commodities,
            countries,
        }
    }
}
