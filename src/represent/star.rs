//! Star expansions: characters linked to the text units they appear in

use super::{text_units, EdgeWeight, Granularity, RepresentationTables, UnitKey};
use crate::aggregate::SettingAggregate;
use crate::storage::Table;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const CHARACTER: &str = "character";
const TEXT_UNIT: &str = "text_unit";

fn weight_of(n_lines: u64, n_tokens: u64, weight: Option<EdgeWeight>) -> u64 {
    match weight {
        None | Some(EdgeWeight::Count) => 1,
        Some(EdgeWeight::NLines) => n_lines,
        Some(EdgeWeight::NTokens) => n_tokens,
    }
}

/// Node table: characters, then text units, each with a `node_type`
fn typed_node_table(characters: &[String], units: &[String]) -> Table {
    let mut table = Table::new(["node", "node_type"]);
    for character in characters {
        table.push_row(vec![Some(character.clone()), Some(CHARACTER.to_string())]);
    }
    for unit in units {
        table.push_row(vec![Some(unit.clone()), Some(TEXT_UNIT.to_string())]);
    }
    table
}

/// Character–unit edge of the bipartite star expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarEdge {
    pub character: String,
    pub unit: UnitKey,
    pub n_lines: u64,
    pub n_tokens: u64,
}

/// Bipartite star expansion (`se-{scene,group}-w`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarGraph {
    pub granularity: Granularity,
    pub characters: Vec<String>,
    pub units: Vec<UnitKey>,
    /// Sorted by unit, then character
    pub edges: Vec<StarEdge>,
}

impl StarGraph {
    pub fn build(rows: &[SettingAggregate], granularity: Granularity) -> Self {
        let mut characters = BTreeSet::new();
        let mut units = Vec::new();
        let mut edges = Vec::new();
        for unit in text_units(rows, granularity) {
            for character in &unit.characters {
                characters.insert(character.clone());
                edges.push(StarEdge {
                    character: character.clone(),
                    unit: unit.key.clone(),
                    n_lines: unit.n_lines,
                    n_tokens: unit.n_tokens,
                });
            }
            units.push(unit.key);
        }
        Self {
            granularity,
            characters: characters.into_iter().collect(),
            units,
            edges,
        }
    }

    pub fn node_count(&self) -> usize {
        self.characters.len() + self.units.len()
    }

    /// Degree of every character node
    pub fn degrees(&self, weight: Option<EdgeWeight>) -> BTreeMap<String, u64> {
        let mut degrees: BTreeMap<String, u64> =
            self.characters.iter().map(|c| (c.clone(), 0)).collect();
        for edge in &self.edges {
            *degrees.entry(edge.character.clone()).or_insert(0) +=
                weight_of(edge.n_lines, edge.n_tokens, weight);
        }
        degrees
    }

    /// `node1` (character), `node2` (unit), `n_lines, n_tokens`
    pub fn tables(&self) -> RepresentationTables {
        let mut edges = Table::new(["node1", "node2", "n_lines", "n_tokens"]);
        for edge in &self.edges {
            edges.push_row(vec![
                Some(edge.character.clone()),
                Some(edge.unit.label()),
                Some(edge.n_lines.to_string()),
                Some(edge.n_tokens.to_string()),
            ]);
        }
        let labels: Vec<String> = self.units.iter().map(UnitKey::label).collect();
        RepresentationTables {
            nodes: typed_node_table(&self.characters, &labels),
            edges,
        }
    }
}

/// Edge of the directed speech star expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectedEdge {
    pub source: String,
    pub target: String,
    /// Number of earlier edges from `source` to `target`
    pub key: u32,
    pub n_lines: u64,
    pub n_tokens: u64,
    pub edge_index: usize,
}

/// Directed star expansion over speeches (`se-speech-mwd`)
///
/// Each speech links its speaker to the stage group it belongs to, and
/// the stage group to every other character on stage. A speech by
/// several characters has one source edge per speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectedStarGraph {
    pub characters: Vec<String>,
    /// Stage-group labels, in key order
    pub units: Vec<String>,
    /// Sorted by `edge_index, source, target, key`
    pub edges: Vec<DirectedEdge>,
}

impl DirectedStarGraph {
    pub fn build(rows: &[SettingAggregate]) -> Self {
        let mut characters = BTreeSet::new();
        let mut units: Vec<String> = Vec::new();
        let mut keys: HashMap<(String, String), u32> = HashMap::new();
        let mut edges = Vec::new();

        for unit in text_units(rows, Granularity::Speech) {
            let label = unit.key.label();
            if units.last() != Some(&label) {
                units.push(label.clone());
            }

            let mut unit_edges: Vec<(String, String)> = unit
                .speakers
                .iter()
                .map(|speaker| (speaker.clone(), label.clone()))
                .collect();
            unit_edges.extend(
                unit.characters
                    .iter()
                    .filter(|c| !unit.speakers.contains(c))
                    .map(|c| (label.clone(), c.clone())),
            );
            unit_edges.sort();

            for (source, target) in unit_edges {
                let counter = keys.entry((source.clone(), target.clone())).or_insert(0);
                edges.push(DirectedEdge {
                    source,
                    target,
                    key: *counter,
                    n_lines: unit.n_lines,
                    n_tokens: unit.n_tokens,
                    edge_index: unit.index,
                });
                *counter += 1;
            }
            characters.extend(unit.characters);
            characters.extend(unit.speakers);
        }

        Self {
            characters: characters.into_iter().collect(),
            units,
            edges,
        }
    }

    /// Weighted in-degree of every character (lines heard)
    pub fn in_degrees(&self, weight: Option<EdgeWeight>) -> BTreeMap<String, u64> {
        self.character_degrees(weight, |edge| &edge.target)
    }

    /// Weighted out-degree of every character (lines spoken)
    pub fn out_degrees(&self, weight: Option<EdgeWeight>) -> BTreeMap<String, u64> {
        self.character_degrees(weight, |edge| &edge.source)
    }

    fn character_degrees(
        &self,
        weight: Option<EdgeWeight>,
        endpoint: impl Fn(&DirectedEdge) -> &String,
    ) -> BTreeMap<String, u64> {
        let mut degrees: BTreeMap<String, u64> =
            self.characters.iter().map(|c| (c.clone(), 0)).collect();
        for edge in &self.edges {
            if let Some(degree) = degrees.get_mut(endpoint(edge)) {
                *degree += weight_of(edge.n_lines, edge.n_tokens, weight);
            }
        }
        degrees
    }

    /// `source, target, key, n_lines, n_tokens, edge_index`
    pub fn tables(&self) -> RepresentationTables {
        let mut edges = Table::new(["source", "target", "key", "n_lines", "n_tokens", "edge_index"]);
        for edge in &self.edges {
            edges.push_row(vec![
                Some(edge.source.clone()),
                Some(edge.target.clone()),
                Some(edge.key.to_string()),
                Some(edge.n_lines.to_string()),
                Some(edge.n_tokens.to_string()),
                Some(edge.edge_index.to_string()),
            ]);
        }
        RepresentationTables {
            nodes: typed_node_table(&self.characters, &self.units),
            edges,
        }
    }
}
