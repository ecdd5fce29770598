//! Contiguous runs of identical onstage sets

use super::CharacterSet;

/// Group index per record: 0 for the first record, +1 wherever the
/// onstage set differs from the previous record's.
pub fn stagegroups(onstage: &[CharacterSet]) -> Vec<u32> {
    let mut group = 0;
    onstage
        .iter()
        .enumerate()
        .map(|(i, current)| {
            if i > 0 && onstage[i - 1] != *current {
                group += 1;
            }
            group
        })
        .collect()
}
