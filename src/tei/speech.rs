//! Speech-act ownership: which line-numbered elements belong to which `sp`

use super::flatten::{has_number, is_element_named, xml_id};
use super::record::{attr, tag};
use roxmltree::Node;

/// One `sp` element: its raw `who` and the ids of the numbered
/// elements inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAct {
    /// Raw `who` attribute; absent for songs and similar unattributed speech
    pub who: Option<String>,
    /// `xml:id`s of descendant elements carrying a non-empty `n`
    pub owned_ids: Vec<String>,
}

impl SpeechAct {
    pub fn new(who: Option<&str>, owned_ids: Vec<String>) -> Self {
        Self {
            who: who.map(str::to_string),
            owned_ids,
        }
    }
}

/// Collect every speech act under `body`, in document order.
pub fn speech_acts(body: Node<'_, '_>) -> Vec<SpeechAct> {
    body.descendants()
        .filter(|n| is_element_named(n, tag::SPEECH))
        .map(|sp| {
            let owned_ids = sp
                .descendants()
                .skip(1)
                .filter(|n| n.is_element() && has_number(n))
                .filter_map(|n| xml_id(&n).map(str::to_string))
                .collect();
            SpeechAct::new(sp.attribute(attr::WHO), owned_ids)
        })
        .collect()
}
