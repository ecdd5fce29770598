//! Cast list entries (`castItem`), parsed independently of the body pipeline

use super::flatten::{attributes, is_element_named};
use super::record::{attr, tag, Attributes};
use roxmltree::Document;
use serde::{Deserialize, Serialize};

/// One `castItem` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastEntry {
    pub attributes: Attributes,
}

impl CastEntry {
    /// The entry's `xml:id`
    pub fn id(&self) -> Option<&str> {
        self.attributes.get(attr::ID)
    }

    /// Raw `corresp` pointer, e.g. `#ATTENDANTS_MND`
    pub fn corresp(&self) -> Option<&str> {
        self.attributes.get(attr::CORRESP)
    }

    /// The identifier this entry is an alias of, without the leading `#`
    pub fn alias_of(&self) -> Option<&str> {
        self.corresp().map(|c| c.trim_start_matches('#'))
    }
}

/// All cast entries in the document, sorted by `xml:id` (entries without
/// an id last, in document order).
pub fn cast_entries(document: &Document<'_>) -> Vec<CastEntry> {
    let mut entries: Vec<CastEntry> = document
        .descendants()
        .filter(|n| is_element_named(n, tag::CAST_ITEM))
        .map(|n| CastEntry {
            attributes: attributes(&n),
        })
        .collect();
    entries.sort_by(|a, b| match (a.id(), b.id()) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    entries
}
