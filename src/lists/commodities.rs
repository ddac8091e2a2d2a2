//! Commodity list transformer
//!
//! Rows with a `commodityGroup` are nested under a container for that group;
//! rows without one stand alone under their own name. The top level is keyed by
//! group (or standalone) name in byte order.

use serde::Serialize;
use std::collections::BTreeMap;

use super::field_str;
use crate::fetcher::RawRow;
use crate::links::{build_link, LinkKind, NavigationLink};

/// Commodity list keyed by group name
pub type CommodityList = BTreeMap<String, CommodityEntry>;

/// A single commodity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommodityItem {
    /// Parent group, or the commodity's own name when it has none
    pub group: String,
    pub code: String,
    pub label: String,
    pub link: NavigationLink,
}

/// A group of commodities sharing a parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommodityGroup {
    pub group: String,
    pub sub_commodities: Vec<CommodityItem>,
}

impl CommodityGroup {
    fn new(group: &str) -> Self {
        Self {
            group: group.to_string(),
            sub_commodities: Vec::new(),
        }
    }

    /// Appends `item` unless an identical item is already present
    fn push_unique(&mut self, item: CommodityItem) {
        if !self.sub_commodities.contains(&item) {
            self.sub_commodities.push(item);
        }
    }
}

/// Top-level entry of the commodity list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommodityEntry {
    Standalone(CommodityItem),
    Group(CommodityGroup),
}

impl CommodityEntry {
    pub fn group(&self) -> &str {
        match self {
            CommodityEntry::Standalone(item) => &item.group,
            CommodityEntry::Group(group) => &group.group,
        }
    }

    /// Nested commodities; empty for a standalone entry
    pub fn sub_commodities(&self) -> &[CommodityItem] {
        match self {
            CommodityEntry::Standalone(_) => &[],
            CommodityEntry::Group(group) => &group.sub_commodities,
        }
    }
}

/// Builds the grouped commodity list from `commodityCode`/`commodityName`/`commodityGroup` rows
///
/// Sub-commodities are deduplicated on all fields and sorted by label.
pub fn build_commodity_list(rows: &[RawRow]) -> CommodityList {
    let mut list = CommodityList::new();

    for row in rows {
        let group = field_str(row, "commodityGroup");
        let code = field_str(row, "commodityCode");
        let label = field_str(row, "commodityName");
        let link = build_link(LinkKind::Commodity, &code, &label);

        // Only a missing or blank group is ungrouped; "0" names a group
        if group.is_empty() {
            let item = CommodityItem {
                group: label.clone(),
                code,
                label: label.clone(),
                link,
            };
            list.insert(label, CommodityEntry::Standalone(item));
            continue;
        }

        let entry = list
            .entry(group.clone())
            .or_insert_with(|| CommodityEntry::Group(CommodityGroup::new(&group)));
        if matches!(entry, CommodityEntry::Standalone(_)) {
            *entry = CommodityEntry::Group(CommodityGroup::new(&group));
        }
        if let CommodityEntry::Group(container) = entry {
            container.push_unique(CommodityItem {
                group,
                code,
                label,
                link,
            });
        }
    }

    for entry in list.values_mut() {
        if let CommodityEntry::Group(container) = entry {
            container.sub_commodities.sort_by(|a, b| a.label.cmp(&b.label));
        }
    }

    list
}
