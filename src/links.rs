//! Internal navigation links for list entries

use serde::Serialize;
use std::fmt;

/// Entity kinds that have a production detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Commodity,
    Country,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Commodity => "commodity",
            LinkKind::Country => "country",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display text paired with an internal URI
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NavigationLink {
    pub text: String,
    pub uri: String,
}

/// Builds the link to the production page of a commodity or country
///
/// The URI is `base:/data/production/{kind}/{code}`, lower-cased in full; the
/// display text is `name` as given.
pub fn build_link(kind: LinkKind, code: &str, name: &str) -> NavigationLink {
    NavigationLink {
        text: name.to_string(),
        uri: format!("base:/data/production/{}/{}", kind, code).to_lowercase(),
    }
}
