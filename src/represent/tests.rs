//! Representation tests over a five-row excerpt of A Midsummer Night's Dream

use super::*;

const ATTENDANTS: &str = "#ATTENDANTS_MND";
const HIPPOLYTA: &str = "#Hippolyta_MND";
const COURT: &str = "#ATTENDANTS_MND #Demetrius_MND #Egeus_MND #Hermia_MND #Hippolyta_MND #Lysander_MND #Theseus_MND";

fn row(
    (act, scene, stagegroup, setting): (u32, u32, u32, u32),
    onstage: &str,
    speaker: &str,
    n_lines: u64,
    n_tokens: u64,
) -> SettingAggregate {
    SettingAggregate {
        act,
        scene,
        stagegroup,
        stagegroup_raw: stagegroup,
        setting,
        onstage: onstage.to_string(),
        speaker: speaker.to_string(),
        n_lines,
        n_tokens,
    }
}

fn toy_rows() -> Vec<SettingAggregate> {
    vec![
        row((1, 1, 1, 1), "#ATTENDANTS_MND #Philostrate_MND #Theseus_MND", "#Theseus_MND", 6, 43),
        row(
            (1, 1, 2, 2),
            "#ATTENDANTS_MND #Hippolyta_MND #Philostrate_MND #Theseus_MND",
            "#Hippolyta_MND",
            5,
            35,
        ),
        row((1, 2, 3, 3), COURT, "#Egeus_MND", 1, 6),
        row((1, 2, 3, 4), COURT, "#Theseus_MND", 1, 8),
        row((2, 1, 4, 5), COURT, "#Egeus_MND", 1, 7),
    ]
}

#[test]
fn text_units_follow_key_order() {
    let rows = toy_rows();
    let scenes = text_units(&rows, Granularity::Scene);
    assert_eq!(scenes.len(), 3);
    assert_eq!(scenes[0].key.label(), "1.1");
    assert_eq!(scenes[0].characters.len(), 4);
    assert_eq!(scenes[0].n_lines, 11);
    assert_eq!(scenes[0].n_tokens, 78);
    assert_eq!(scenes[1].index, 1);

    let speeches = text_units(&rows, Granularity::Speech);
    assert_eq!(speeches.len(), 5);
    assert_eq!(speeches[2].key.speaker.as_deref(), Some("#Egeus_MND"));
    assert_eq!(speeches[2].key.label(), "1.2.3");
}

#[test]
fn scene_multigraph() {
    let graph = CliqueMultigraph::build(&toy_rows(), Granularity::Scene);
    assert_eq!(graph.nodes.len(), 8);
    assert_eq!(graph.edges.len(), 48);

    let pair = graph.edges_between(HIPPOLYTA, ATTENDANTS);
    let lines: Vec<_> = pair.iter().map(|e| (e.key, e.n_lines)).collect();
    assert_eq!(lines, vec![(0, 11), (1, 2), (2, 1)]);
}

#[test]
fn group_multigraph() {
    let graph = CliqueMultigraph::build(&toy_rows(), Granularity::Group);
    assert_eq!(graph.nodes.len(), 8);
    assert_eq!(graph.edges.len(), 51);
    assert_eq!(graph.edges_between(ATTENDANTS, HIPPOLYTA)[0].n_lines, 5);
}

#[test]
fn count_weighted_graphs() {
    for granularity in [Granularity::Scene, Granularity::Group] {
        let graph = CliqueMultigraph::build(&toy_rows(), granularity).count_weighted();
        assert_eq!(graph.nodes.len(), 8);
        assert_eq!(graph.edges.len(), 24);
        assert_eq!(graph.edge(ATTENDANTS, HIPPOLYTA).map(|e| e.count), Some(3));
    }
}

#[test]
fn bipartite_graphs() {
    let scene = StarGraph::build(&toy_rows(), Granularity::Scene);
    assert_eq!(scene.node_count(), 11);
    assert_eq!(scene.edges.len(), 18);

    let group = StarGraph::build(&toy_rows(), Granularity::Group);
    assert_eq!(group.node_count(), 12);
    assert_eq!(group.edges.len(), 21);
}

#[test]
fn directed_speech_star() {
    let graph = DirectedStarGraph::build(&toy_rows());
    assert_eq!(graph.characters.len(), 8);
    assert_eq!(graph.units, vec!["1.1.1", "1.1.2", "1.2.3", "2.1.4"]);
    assert_eq!(graph.edges.len(), 28);

    let out = graph.out_degrees(Some(EdgeWeight::NLines));
    assert_eq!(out["#Theseus_MND"], 7);
    assert_eq!(out["#Egeus_MND"], 2);
    assert_eq!(out[HIPPOLYTA], 5);
    assert_eq!(out[ATTENDANTS], 0);

    let heard = graph.in_degrees(Some(EdgeWeight::NLines));
    assert_eq!(heard[ATTENDANTS], 14);
    assert_eq!(heard["#Theseus_MND"], 7);

    let repeated: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| e.source == "1.2.3" && e.target == ATTENDANTS)
        .map(|e| e.key)
        .collect();
    assert_eq!(repeated, vec![0, 1]);
}

#[test]
fn multi_speaker_rows_split_into_source_edges() {
    let rows = vec![row((1, 1, 1, 1), "#A #B #C", "#A #B", 2, 9)];
    let graph = DirectedStarGraph::build(&rows);
    let edges: Vec<_> = graph
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(edges, vec![("#A", "1.1.1"), ("#B", "1.1.1"), ("1.1.1", "#C")]);
}

#[test]
fn hypergraphs() {
    let scene = Hypergraph::build(&toy_rows(), Granularity::Scene);
    assert_eq!(scene.edges.len(), 3);
    assert_eq!(scene.edges[1].members.len(), 7);
    assert_eq!(scene.degrees(None)[ATTENDANTS], 3);
    assert_eq!(scene.degrees(None)["#Philostrate_MND"], 1);

    let group = Hypergraph::build(&toy_rows(), Granularity::Group);
    assert_eq!(group.edges.len(), 4);
    assert_eq!(group.degrees(Some(EdgeWeight::NLines))[HIPPOLYTA], 5 + 2 + 1);
}

#[test]
fn multigraph_edge_table_columns() {
    let rows = toy_rows();
    let tables = Representation::CeGroupMw.tables(&rows);
    assert_eq!(
        tables.edges.columns(),
        &["node1", "node2", "key", "act", "scene", "stagegroup", "n_tokens", "n_lines", "edge_index"]
    );
    assert_eq!(tables.edges.len(), 51);
    assert_eq!(tables.nodes.columns(), &["node"]);
    assert_eq!(tables.nodes.len(), 8);

    let star = Representation::SeSceneW.tables(&rows);
    assert_eq!(star.nodes.len(), 11);
    assert_eq!(star.nodes.cell(10, "node"), Some("2.1"));
    assert_eq!(star.nodes.cell(10, "node_type"), Some("text_unit"));
}

#[test]
fn writes_every_representation() {
    let dir = tempfile::TempDir::new().unwrap();
    let written = write_representations("toy", &toy_rows(), dir.path()).unwrap();
    assert_eq!(written.len(), Representation::ALL.len() + 5);
    assert!(dir.path().join("toy_ce.nodes.csv").is_file());
    assert!(dir.path().join("toy_se-speech.nodes.csv").is_file());
    assert!(dir.path().join("toy_se-speech-mwd.edges.csv").is_file());
    assert!(dir.path().join("toy_hg-group-mw.edges.csv").is_file());
}
