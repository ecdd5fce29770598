//! Clique expansions: every pair of characters sharing a text unit

use super::{characters, node_table, text_units, EdgeWeight, Granularity, RepresentationTables, UnitKey};
use crate::aggregate::SettingAggregate;
use crate::storage::Table;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One edge per character pair per text unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiEdge {
    /// Lexicographically smaller endpoint
    pub node1: String,
    pub node2: String,
    /// Number of earlier edges between the same pair
    pub key: u32,
    pub unit: UnitKey,
    pub n_tokens: u64,
    pub n_lines: u64,
    pub edge_index: usize,
}

impl MultiEdge {
    fn weight(&self, weight: Option<EdgeWeight>) -> u64 {
        match weight {
            None | Some(EdgeWeight::Count) => 1,
            Some(EdgeWeight::NLines) => self.n_lines,
            Some(EdgeWeight::NTokens) => self.n_tokens,
        }
    }
}

/// Clique-expansion multigraph (`ce-{scene,group}-mw`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliqueMultigraph {
    pub granularity: Granularity,
    /// Characters with at least one edge, sorted
    pub nodes: Vec<String>,
    pub edges: Vec<MultiEdge>,
}

impl CliqueMultigraph {
    pub fn build(rows: &[SettingAggregate], granularity: Granularity) -> Self {
        let mut keys: HashMap<(String, String), u32> = HashMap::new();
        let mut nodes = BTreeSet::new();
        let mut edges = Vec::new();

        for unit in text_units(rows, granularity) {
            for (i, node1) in unit.characters.iter().enumerate() {
                for node2 in &unit.characters[i + 1..] {
                    let counter = keys.entry((node1.clone(), node2.clone())).or_insert(0);
                    edges.push(MultiEdge {
                        node1: node1.clone(),
                        node2: node2.clone(),
                        key: *counter,
                        unit: unit.key.clone(),
                        n_tokens: unit.n_tokens,
                        n_lines: unit.n_lines,
                        edge_index: unit.index,
                    });
                    *counter += 1;
                    nodes.insert(node1.clone());
                    nodes.insert(node2.clone());
                }
            }
        }

        Self {
            granularity,
            nodes: nodes.into_iter().collect(),
            edges,
        }
    }

    /// Parallel edges collapsed into a count
    pub fn count_weighted(&self) -> CountGraph {
        let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
        for edge in &self.edges {
            *counts
                .entry((edge.node1.clone(), edge.node2.clone()))
                .or_insert(0) += 1;
        }
        CountGraph {
            nodes: self.nodes.clone(),
            edges: counts
                .into_iter()
                .map(|((node1, node2), count)| CountEdge { node1, node2, count })
                .collect(),
        }
    }

    /// Edges between two characters, in either order
    pub fn edges_between(&self, a: &str, b: &str) -> Vec<&MultiEdge> {
        let (node1, node2) = if a <= b { (a, b) } else { (b, a) };
        self.edges
            .iter()
            .filter(|e| e.node1 == node1 && e.node2 == node2)
            .collect()
    }

    /// Degree of every node; unweighted counts parallel edges separately
    pub fn degrees(&self, weight: Option<EdgeWeight>) -> BTreeMap<String, u64> {
        let mut degrees: BTreeMap<String, u64> =
            self.nodes.iter().map(|n| (n.clone(), 0)).collect();
        for edge in &self.edges {
            let w = edge.weight(weight);
            *degrees.entry(edge.node1.clone()).or_insert(0) += w;
            *degrees.entry(edge.node2.clone()).or_insert(0) += w;
        }
        degrees
    }

    /// `node1, node2, key`, the unit's key columns, `n_tokens, n_lines, edge_index`
    pub fn tables(&self, rows: &[SettingAggregate]) -> RepresentationTables {
        let mut columns = vec!["node1", "node2", "key"];
        columns.extend(self.granularity.key_columns());
        columns.extend(["n_tokens", "n_lines", "edge_index"]);

        let mut edges = Table::new(columns);
        for edge in &self.edges {
            let mut row = vec![
                Some(edge.node1.clone()),
                Some(edge.node2.clone()),
                Some(edge.key.to_string()),
            ];
            row.extend(edge.unit.cells());
            row.extend([
                Some(edge.n_tokens.to_string()),
                Some(edge.n_lines.to_string()),
                Some(edge.edge_index.to_string()),
            ]);
            edges.push_row(row);
        }

        RepresentationTables {
            nodes: node_table(&characters(rows)),
            edges,
        }
    }
}

/// A collapsed clique-expansion edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountEdge {
    pub node1: String,
    pub node2: String,
    /// Number of text units the pair shared
    pub count: u64,
}

/// Count-weighted clique graph (`ce-{scene,group}-w`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountGraph {
    pub nodes: Vec<String>,
    /// Sorted by `node1`, then `node2`
    pub edges: Vec<CountEdge>,
}

impl CountGraph {
    pub fn edge(&self, a: &str, b: &str) -> Option<&CountEdge> {
        let (node1, node2) = if a <= b { (a, b) } else { (b, a) };
        self.edges
            .iter()
            .find(|e| e.node1 == node1 && e.node2 == node2)
    }

    /// Unweighted degree is the number of neighbours
    pub fn degrees(&self, weight: Option<EdgeWeight>) -> BTreeMap<String, u64> {
        let mut degrees: BTreeMap<String, u64> =
            self.nodes.iter().map(|n| (n.clone(), 0)).collect();
        for edge in &self.edges {
            let w = match weight {
                Some(EdgeWeight::Count) => edge.count,
                _ => 1,
            };
            *degrees.entry(edge.node1.clone()).or_insert(0) += w;
            *degrees.entry(edge.node2.clone()).or_insert(0) += w;
        }
        degrees
    }

    /// `node1, node2, count`
    pub fn tables(&self, rows: &[SettingAggregate]) -> RepresentationTables {
        let mut edges = Table::new(["node1", "node2", "count"]);
        for edge in &self.edges {
            edges.push_row(vec![
                Some(edge.node1.clone()),
                Some(edge.node2.clone()),
                Some(edge.count.to_string()),
            ]);
        }
        RepresentationTables {
            nodes: node_table(&characters(rows)),
            edges,
        }
    }
}
