//! Graph and hypergraph representations of an aggregate table
//!
//! Aggregate rows are first grouped into text units (a scene, a stage
//! group, or a single speech) and each unit then becomes edges between
//! characters (clique expansion), a node linked to its characters (star
//! expansion), or one hyperedge.
//!
//! Text units are visited in sorted key order; a unit's position in that
//! order is its `edge_index`.

mod clique;
mod hypergraph;
mod star;

pub use clique::{CliqueMultigraph, CountGraph, CountEdge, MultiEdge};
pub use hypergraph::{Hyperedge, Hypergraph};
pub use star::{DirectedEdge, DirectedStarGraph, StarEdge, StarGraph};

use crate::aggregate::SettingAggregate;
use crate::storage::{write_csv, StorageResult, Table};
use crate::util::sort_join_strings;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Edge attribute used as a degree weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeWeight {
    NLines,
    NTokens,
    /// Collapsed parallel edges; other edges count once
    Count,
}

/// How aggregate rows are grouped into text units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// `act, scene`
    Scene,
    /// `act, scene, stagegroup`
    Group,
    /// `act, scene, stagegroup, setting, speaker`
    Speech,
}

impl Granularity {
    /// Key columns, in grouping order
    pub fn key_columns(&self) -> &'static [&'static str] {
        match self {
            Granularity::Scene => &["act", "scene"],
            Granularity::Group => &["act", "scene", "stagegroup"],
            Granularity::Speech => &["act", "scene", "stagegroup", "setting", "speaker"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Scene => "scene",
            Granularity::Group => "group",
            Granularity::Speech => "speech",
        }
    }
}

/// Grouping key of a text unit; fields finer than the granularity are `None`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitKey {
    pub act: u32,
    pub scene: u32,
    pub stagegroup: Option<u32>,
    pub setting: Option<u32>,
    pub speaker: Option<String>,
}

impl UnitKey {
    fn of(row: &SettingAggregate, granularity: Granularity) -> Self {
        let group = matches!(granularity, Granularity::Group | Granularity::Speech);
        let speech = granularity == Granularity::Speech;
        Self {
            act: row.act,
            scene: row.scene,
            stagegroup: group.then_some(row.stagegroup),
            setting: speech.then_some(row.setting),
            speaker: speech.then(|| row.speaker.clone()),
        }
    }

    /// The key's act, scene and stage group only, as a star-expansion
    /// node: `1.2` or `1.2.3`
    pub fn label(&self) -> String {
        match self.stagegroup {
            Some(stagegroup) => format!("{}.{}.{}", self.act, self.scene, stagegroup),
            None => format!("{}.{}", self.act, self.scene),
        }
    }

    /// Key values as cells, in [`Granularity::key_columns`] order
    pub fn cells(&self) -> Vec<Option<String>> {
        let mut cells = vec![Some(self.act.to_string()), Some(self.scene.to_string())];
        cells.extend(self.stagegroup.map(|v| Some(v.to_string())));
        cells.extend(self.setting.map(|v| Some(v.to_string())));
        cells.extend(self.speaker.clone().map(Some));
        cells
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Aggregate rows sharing a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub key: UnitKey,
    /// Position in sorted key order
    pub index: usize,
    /// Union of the rows' onstage characters, sorted
    pub characters: Vec<String>,
    /// Speakers of the unit's rows, sorted
    pub speakers: Vec<String>,
    pub n_tokens: u64,
    pub n_lines: u64,
}

/// Group rows into text units, in sorted key order.
pub fn text_units(rows: &[SettingAggregate], granularity: Granularity) -> Vec<TextUnit> {
    #[derive(Default)]
    struct Acc {
        characters: BTreeSet<String>,
        speakers: BTreeSet<String>,
        n_tokens: u64,
        n_lines: u64,
    }

    let mut groups: BTreeMap<UnitKey, Acc> = BTreeMap::new();
    for row in rows {
        let acc = groups.entry(UnitKey::of(row, granularity)).or_default();
        acc.characters.extend(row.onstage_characters());
        acc.speakers.extend(row.speakers());
        acc.n_tokens += row.n_tokens;
        acc.n_lines += row.n_lines;
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(index, (key, acc))| TextUnit {
            key,
            index,
            characters: acc.characters.into_iter().collect(),
            speakers: acc.speakers.into_iter().collect(),
            n_tokens: acc.n_tokens,
            n_lines: acc.n_lines,
        })
        .collect()
}

/// Every character on stage in any row, sorted
pub fn characters(rows: &[SettingAggregate]) -> Vec<String> {
    rows.iter()
        .flat_map(SettingAggregate::onstage_characters)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The representations written for every play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    CeSceneMw,
    CeGroupMw,
    CeSceneW,
    CeGroupW,
    SeSceneW,
    SeGroupW,
    SeSpeechMwd,
    HgSceneMw,
    HgGroupMw,
}

impl Representation {
    pub const ALL: [Representation; 9] = [
        Representation::CeSceneMw,
        Representation::CeGroupMw,
        Representation::CeSceneW,
        Representation::CeGroupW,
        Representation::SeSceneW,
        Representation::SeGroupW,
        Representation::SeSpeechMwd,
        Representation::HgSceneMw,
        Representation::HgGroupMw,
    ];

    /// Name used in edge file names, e.g. `ce-scene-mw`
    pub fn name(&self) -> &'static str {
        match self {
            Representation::CeSceneMw => "ce-scene-mw",
            Representation::CeGroupMw => "ce-group-mw",
            Representation::CeSceneW => "ce-scene-w",
            Representation::CeGroupW => "ce-group-w",
            Representation::SeSceneW => "se-scene-w",
            Representation::SeGroupW => "se-group-w",
            Representation::SeSpeechMwd => "se-speech-mwd",
            Representation::HgSceneMw => "hg-scene-mw",
            Representation::HgGroupMw => "hg-group-mw",
        }
    }

    /// Name used in node file names: clique expansions and hypergraphs
    /// share one node list, star expansions have one per granularity
    pub fn nodes_name(&self) -> &'static str {
        match self {
            Representation::CeSceneMw
            | Representation::CeGroupMw
            | Representation::CeSceneW
            | Representation::CeGroupW => "ce",
            Representation::SeSceneW => "se-scene",
            Representation::SeGroupW => "se-group",
            Representation::SeSpeechMwd => "se-speech",
            Representation::HgSceneMw | Representation::HgGroupMw => "hg",
        }
    }

    /// Node and edge tables of this representation
    pub fn tables(&self, rows: &[SettingAggregate]) -> RepresentationTables {
        match self {
            Representation::CeSceneMw => {
                CliqueMultigraph::build(rows, Granularity::Scene).tables(rows)
            }
            Representation::CeGroupMw => {
                CliqueMultigraph::build(rows, Granularity::Group).tables(rows)
            }
            Representation::CeSceneW => CliqueMultigraph::build(rows, Granularity::Scene)
                .count_weighted()
                .tables(rows),
            Representation::CeGroupW => CliqueMultigraph::build(rows, Granularity::Group)
                .count_weighted()
                .tables(rows),
            Representation::SeSceneW => StarGraph::build(rows, Granularity::Scene).tables(),
            Representation::SeGroupW => StarGraph::build(rows, Granularity::Group).tables(),
            Representation::SeSpeechMwd => DirectedStarGraph::build(rows).tables(),
            Representation::HgSceneMw => Hypergraph::build(rows, Granularity::Scene).tables(),
            Representation::HgGroupMw => Hypergraph::build(rows, Granularity::Group).tables(),
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A representation as tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentationTables {
    pub nodes: Table,
    pub edges: Table,
}

/// Node table with a single `node` column
fn node_table(nodes: &[String]) -> Table {
    let mut table = Table::new(["node"]);
    for node in nodes {
        table.push_row(vec![Some(node.clone())]);
    }
    table
}

/// Write every representation of a play into `dir`:
/// `<play>_<repr>.edges.csv` and `<play>_<nodes repr>.nodes.csv`.
pub fn write_representations(
    play: &str,
    rows: &[SettingAggregate],
    dir: impl AsRef<Path>,
) -> StorageResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    let mut nodes_written = BTreeSet::new();

    for representation in Representation::ALL {
        let tables = representation.tables(rows);
        if nodes_written.insert(representation.nodes_name()) {
            let path = dir.join(format!("{}_{}.nodes.csv", play, representation.nodes_name()));
            write_csv(&path, &tables.nodes)?;
            written.push(path);
        }
        let path = dir.join(format!("{}_{}.edges.csv", play, representation.name()));
        write_csv(&path, &tables.edges)?;
        written.push(path);
        tracing::debug!(
            play = %play,
            representation = %representation,
            edges = tables.edges.len(),
            "wrote representation"
        );
    }
    Ok(written)
}

/// Space-joined, sorted identifiers
fn joined(characters: &[String]) -> String {
    sort_join_strings(characters)
}

#[cfg(test)]
mod tests;
