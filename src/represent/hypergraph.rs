//! Hypergraph representation: one hyperedge per text unit

use super::{characters, joined, node_table, text_units, EdgeWeight, Granularity, RepresentationTables, UnitKey};
use crate::aggregate::SettingAggregate;
use crate::storage::Table;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperedge {
    pub edge_index: usize,
    pub unit: UnitKey,
    /// Characters on stage at any point of the unit, sorted
    pub members: Vec<String>,
    pub n_tokens: u64,
    pub n_lines: u64,
}

/// Edge-weighted multi-hypergraph (`hg-{scene,group}-mw`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hypergraph {
    pub granularity: Granularity,
    pub nodes: Vec<String>,
    pub edges: Vec<Hyperedge>,
}

impl Hypergraph {
    pub fn build(rows: &[SettingAggregate], granularity: Granularity) -> Self {
        let edges = text_units(rows, granularity)
            .into_iter()
            .map(|unit| Hyperedge {
                edge_index: unit.index,
                unit: unit.key,
                members: unit.characters,
                n_tokens: unit.n_tokens,
                n_lines: unit.n_lines,
            })
            .collect();
        Self {
            granularity,
            nodes: characters(rows),
            edges,
        }
    }

    /// Sum of incident hyperedge weights per node; unweighted counts memberships
    pub fn degrees(&self, weight: Option<EdgeWeight>) -> BTreeMap<String, u64> {
        let mut degrees: BTreeMap<String, u64> =
            self.nodes.iter().map(|n| (n.clone(), 0)).collect();
        for edge in &self.edges {
            let w = match weight {
                None | Some(EdgeWeight::Count) => 1,
                Some(EdgeWeight::NLines) => edge.n_lines,
                Some(EdgeWeight::NTokens) => edge.n_tokens,
            };
            for member in &edge.members {
                *degrees.entry(member.clone()).or_insert(0) += w;
            }
        }
        degrees
    }

    /// `edge_index`, the unit's key columns, `onstage, n_tokens, n_lines`
    pub fn tables(&self) -> RepresentationTables {
        let mut columns = vec!["edge_index"];
        columns.extend(self.granularity.key_columns());
        columns.extend(["onstage", "n_tokens", "n_lines"]);

        let mut edges = Table::new(columns);
        for edge in &self.edges {
            let mut row = vec![Some(edge.edge_index.to_string())];
            row.extend(edge.unit.cells());
            row.extend([
                Some(joined(&edge.members)),
                Some(edge.n_tokens.to_string()),
                Some(edge.n_lines.to_string()),
            ]);
            edges.push_row(row);
        }
        RepresentationTables {
            nodes: node_table(&self.nodes),
            edges,
        }
    }
}
