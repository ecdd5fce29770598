//! Degree-based character rankings
//!
//! Degrees are taken over character nodes only. Characters of equal
//! degree share a rank, and the next rank skips accordingly (1, 2, 2, 4).

use crate::aggregate::SettingAggregate;
use crate::represent::{CliqueMultigraph, DirectedStarGraph, EdgeWeight, Granularity, StarGraph};
use crate::storage::Table;
use std::collections::{BTreeMap, BTreeSet};

/// Characters sharing a degree, highest degree first
pub type TiedRanking = Vec<(Vec<String>, u64)>;

/// Columns of the character ranking table after `character`
pub const RANKING_COLUMNS: [&str; 12] = [
    "se-scene-b",
    "se-scene-w",
    "se-group-b",
    "se-group-w",
    "se-speech-wd_in",
    "se-speech-wd_out",
    "ce-scene-b",
    "ce-scene-mb",
    "ce-scene-mw",
    "ce-group-b",
    "ce-group-mb",
    "ce-group-mw",
];

/// Group characters by degree, highest first; names within a group are sorted.
pub fn ranking_with_ties(degrees: &BTreeMap<String, u64>) -> TiedRanking {
    let mut ordered: Vec<(&String, u64)> = degrees.iter().map(|(c, d)| (c, *d)).collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1));

    let mut ranking: TiedRanking = Vec::new();
    for (character, degree) in ordered {
        if let Some((characters, last)) = ranking.last_mut() {
            if *last == degree {
                characters.push(character.clone());
                continue;
            }
        }
        ranking.push((vec![character.clone()], degree));
    }
    ranking
}

/// Competition rank of every character
pub fn rank_dictionary(ranking: &TiedRanking) -> BTreeMap<String, usize> {
    let mut ranks = BTreeMap::new();
    let mut rank = 1;
    for (characters, _) in ranking {
        for character in characters {
            ranks.insert(character.clone(), rank);
        }
        rank += characters.len();
    }
    ranks
}

fn ranks(degrees: BTreeMap<String, u64>) -> BTreeMap<String, usize> {
    rank_dictionary(&ranking_with_ties(&degrees))
}

/// Rank of every character under each representation, in
/// [`RANKING_COLUMNS`] order.
pub fn rank_columns(rows: &[SettingAggregate]) -> Vec<BTreeMap<String, usize>> {
    let lines = Some(EdgeWeight::NLines);
    let se_scene = StarGraph::build(rows, Granularity::Scene);
    let se_group = StarGraph::build(rows, Granularity::Group);
    let se_speech = DirectedStarGraph::build(rows);
    let ce_scene = CliqueMultigraph::build(rows, Granularity::Scene);
    let ce_group = CliqueMultigraph::build(rows, Granularity::Group);

    vec![
        ranks(se_scene.degrees(None)),
        ranks(se_scene.degrees(lines)),
        ranks(se_group.degrees(None)),
        ranks(se_group.degrees(lines)),
        ranks(se_speech.in_degrees(lines)),
        ranks(se_speech.out_degrees(lines)),
        ranks(ce_scene.count_weighted().degrees(None)),
        ranks(ce_scene.degrees(None)),
        ranks(ce_scene.degrees(lines)),
        ranks(ce_group.count_weighted().degrees(None)),
        ranks(ce_group.degrees(None)),
        ranks(ce_group.degrees(lines)),
    ]
}

/// The character ranking table, ordered by the last column.
///
/// Characters absent from a representation (e.g. never on stage with
/// anyone else) have no rank there and sort last.
pub fn character_ranking(rows: &[SettingAggregate]) -> Table {
    let columns = rank_columns(rows);
    let characters: BTreeSet<&String> = columns.iter().flat_map(|c| c.keys()).collect();

    let mut ranked: Vec<(&String, Vec<Option<usize>>)> = characters
        .into_iter()
        .map(|character| {
            let ranks = columns.iter().map(|c| c.get(character).copied()).collect();
            (character, ranks)
        })
        .collect();
    ranked.sort_by_key(|(_, ranks)| {
        let last = ranks.last().copied().flatten();
        (last.is_none(), last)
    });

    let mut table = Table::new(std::iter::once("character").chain(RANKING_COLUMNS));
    for (character, ranks) in ranked {
        let mut row = vec![Some(character.clone())];
        row.extend(ranks.into_iter().map(|r| r.map(|r| r.to_string())));
        table.push_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degrees(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(c, d)| (c.to_string(), *d)).collect()
    }

    #[test]
    fn ties_share_a_rank_and_skip_the_next() {
        let ranking = ranking_with_ties(&degrees(&[("#A", 3), ("#B", 5), ("#C", 3), ("#D", 1)]));
        assert_eq!(
            ranking,
            vec![
                (vec!["#B".to_string()], 5),
                (vec!["#A".to_string(), "#C".to_string()], 3),
                (vec!["#D".to_string()], 1),
            ]
        );
        let ranks = rank_dictionary(&ranking);
        assert_eq!(ranks["#B"], 1);
        assert_eq!(ranks["#A"], 2);
        assert_eq!(ranks["#C"], 2);
        assert_eq!(ranks["#D"], 4);
    }

    #[test]
    fn empty_degrees_rank_nobody() {
        assert!(rank_dictionary(&ranking_with_ties(&BTreeMap::new())).is_empty());
    }

    #[test]
    fn solo_characters_sort_last() {
        let row = |onstage: &str, speaker: &str, setting, n_lines| SettingAggregate {
            act: 1,
            scene: setting,
            stagegroup: setting,
            stagegroup_raw: setting,
            setting,
            onstage: onstage.to_string(),
            speaker: speaker.to_string(),
            n_lines,
            n_tokens: n_lines * 5,
        };
        let rows = vec![
            row("#A #B", "#A", 1, 4),
            row("#A #B #C", "#B", 2, 2),
            row("#D", "#D", 3, 9),
        ];
        let table = character_ranking(&rows);
        assert_eq!(table.columns().len(), 13);
        assert_eq!(table.columns()[0], "character");
        assert_eq!(table.columns()[12], "ce-group-mw");

        let order: Vec<_> = (0..table.len()).filter_map(|i| table.cell(i, "character")).collect();
        assert_eq!(order, vec!["#A", "#B", "#C", "#D"]);
        assert_eq!(table.cell(3, "ce-group-mw"), None);
        assert_eq!(table.cell(3, "se-scene-w"), Some("1"));
        assert_eq!(table.cell(3, "se-speech-wd_out"), Some("1"));
    }
}
