//! Speaker resolution through speech-act id ownership

use crate::tei::{tag, SpeechAct, StructuralRecord};
use crate::util::normalize_characters;
use std::collections::HashMap;

/// Speaker of every record.
///
/// Ids owned by several speech acts belong to the last one in document
/// order. `sp` records carry their own `who`.
pub fn resolve_speakers(records: &[StructuralRecord], speech: &[SpeechAct]) -> Vec<Option<String>> {
    let mut owner: HashMap<&str, Option<&str>> = HashMap::new();
    for act in speech {
        for id in &act.owned_ids {
            owner.insert(id.as_str(), act.who.as_deref());
        }
    }

    let unattributed = speech.iter().filter(|act| act.who.is_none()).count();
    if unattributed > 0 {
        tracing::warn!(
            speech_acts = unattributed,
            "speech acts without `who`; their lines have no speaker"
        );
    }

    records
        .iter()
        .map(|record| {
            let who = if record.is_tag(tag::SPEECH) {
                record.who()
            } else {
                record.id().and_then(|id| owner.get(id).copied().flatten())
            };
            who.map(normalize_characters)
        })
        .collect()
}
