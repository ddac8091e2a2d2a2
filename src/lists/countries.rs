//! Country list transformer

use serde::Serialize;
use std::collections::HashMap;

use super::field_str;
use crate::fetcher::RawRow;
use crate::links::{build_link, LinkKind, NavigationLink};

/// A country with a link to its production page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryEntry {
    pub code: String,
    pub label: String,
    pub link: NavigationLink,
}

/// Builds the country list from `countryCode`/`countryName` rows
///
/// One entry per distinct code; a later row with the same code replaces the
/// earlier one in place. The result is sorted by label with a byte-wise
/// comparison, keeping input order among equal labels.
pub fn build_country_list(rows: &[RawRow]) -> Vec<CountryEntry> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<CountryEntry> = Vec::with_capacity(rows.len());

    for row in rows {
        let code = field_str(row, "countryCode");
        let label = field_str(row, "countryName");
        let entry = CountryEntry {
            link: build_link(LinkKind::Country, &code, &label),
            code: code.clone(),
            label,
        };

        match positions.get(&code).copied() {
            Some(index) => entries[index] = entry,
            None => {
                positions.insert(code, entries.len());
                entries.push(entry);
            }
        }
    }

    entries.sort_by(|a, b| a.label.cmp(&b.label));
    entries
}
