//! Plain-text and JSON rendering of the lists

use serde::Serialize;
use std::fmt::Write;

use crate::lists::{CommodityEntry, CommodityList, CountryEntry, ProductionOverview};

/// One line per country: name, code and link target
pub fn countries_text(countries: &[CountryEntry]) -> String {
    let mut out = String::new();
    for country in countries {
        let _ = writeln!(out, "{} ({})  {}", country.label, country.code, country.link.uri);
    }
    out
}

/// Standalone commodities on one line, groups followed by indented members
pub fn commodities_text(commodities: &CommodityList) -> String {
    let mut out = String::new();
    for entry in commodities.values() {
        match entry {
            CommodityEntry::Standalone(item) => {
                let _ = writeln!(out, "{} ({})  {}", item.label, item.code, item.link.uri);
            }
            CommodityEntry::Group(group) => {
                let _ = writeln!(out, "{}", group.group);
                for item in &group.sub_commodities {
                    let _ = writeln!(out, "  - {} ({})  {}", item.label, item.code, item.link.uri);
                }
            }
        }
    }
    out
}

/// Both lists under headings
pub fn overview_text(overview: &ProductionOverview) -> String {
    format!(
        "Commodities\n{}\nCountries\n{}",
        commodities_text(&overview.commodities),
        countries_text(&overview.countries)
    )
}

/// Pretty-printed JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
