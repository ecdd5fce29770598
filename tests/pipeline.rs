//! End-to-end runs of the per-document pipeline on small plays

mod common;

use common::{FLUSH_PLAY, SONG_PLAY, TOY_PLAY};
use hyperbard::storage::ANNOTATION_COLUMNS;
use hyperbard::{
    CsvStore, FlushPolicy, PipelineError, PlayPipeline, SettingAggregate, Table, TableKind,
    TableStore,
};
use tempfile::TempDir;

fn row_where<'a>(table: &'a Table, column: &str, value: &str) -> usize {
    (0..table.len())
        .find(|&i| table.cell(i, column) == Some(value))
        .unwrap_or_else(|| panic!("no row with {} = {}", column, value))
}

fn summary(rows: &[SettingAggregate]) -> Vec<(&str, &str, u64, u64, u32)> {
    rows.iter()
        .map(|r| (r.onstage.as_str(), r.speaker.as_str(), r.n_lines, r.n_tokens, r.setting))
        .collect()
}

#[test]
fn toy_play_aggregates_per_setting() {
    let tables = PlayPipeline::new().run(TOY_PLAY).unwrap();

    assert_eq!(
        summary(&tables.aggregates),
        vec![
            ("#A_Toy #B_Toy #C_Toy #D_Toy", "#A_Toy", 2, 6, 1),
            ("#E_Toy", "#E_Toy", 1, 2, 2),
        ]
    );
    assert_eq!(tables.aggregates[0].act, 1);
    assert_eq!(tables.aggregates[0].scene, 1);
    assert_eq!(tables.aggregates[1].act, 2);
    assert_eq!(tables.aggregates[0].stagegroup, 1);
    assert_eq!(tables.aggregates[1].stagegroup, 2);
}

#[test]
fn raw_table_tracks_presence_and_drops_redundant_elements() {
    let tables = PlayPipeline::new().run(TOY_PLAY).unwrap();
    let raw = tables.table(TableKind::Raw);

    assert_eq!(raw.columns()[0], "tag");
    let tail: Vec<_> = raw.columns()[raw.columns().len() - 5..].iter().map(String::as_str).collect();
    assert_eq!(tail, ANNOTATION_COLUMNS.to_vec());

    // head and speaker subtrees are gone
    assert!((0..raw.len()).all(|i| raw.cell(i, "xml:id") != Some("w-00a")));
    assert!((0..raw.len()).all(|i| raw.cell(i, "xml:id") != Some("w-00c")));
    assert!((0..raw.len()).all(|i| raw.cell(i, "xml:id") != Some("spk-01")));

    let exit = row_where(&raw, "xml:id", "stg-02");
    assert_eq!(raw.cell(exit, "onstage"), Some("#A_Toy #B_Toy #C_Toy"));

    let word = row_where(&raw, "xml:id", "w-07");
    assert_eq!(raw.cell(word, "tag"), Some("w"));
    assert_eq!(raw.cell(word, "text"), Some("Four"));
    assert_eq!(raw.cell(word, "act"), Some("2"));
    assert_eq!(raw.cell(word, "scene"), Some("1"));
    assert_eq!(raw.cell(word, "onstage"), Some("#E_Toy"));
    assert_eq!(raw.cell(word, "speaker"), Some("#E_Toy"));

    let stage_word = row_where(&raw, "xml:id", "w-00b");
    assert_eq!(raw.cell(stage_word, "speaker"), None);
}

#[test]
fn cast_table_keeps_alias_pointers() {
    let tables = PlayPipeline::new().run(TOY_PLAY).unwrap();
    assert_eq!(tables.cast.len(), 5);

    let cast = tables.table(TableKind::Cast);
    assert_eq!(cast.columns(), ["xml:id", "corresp"]);
    let d = row_where(&cast, "xml:id", "D_Toy");
    assert_eq!(cast.cell(d, "corresp"), Some("#C_Toy"));
    assert_eq!(cast.cell(0, "corresp"), None);
}

#[test]
fn flush_policy_decides_whether_scene_changes_clear_the_stage() {
    let by_act = PlayPipeline::new().run(FLUSH_PLAY).unwrap();
    assert_eq!(
        summary(&by_act.aggregates),
        vec![
            ("#A_Toy", "#A_Toy", 1, 1, 1),
            ("#A_Toy #B_Toy", "#B_Toy", 1, 1, 2),
        ]
    );

    let by_scene = PlayPipeline::new()
        .with_flush(FlushPolicy::ActAndScene)
        .run(FLUSH_PLAY)
        .unwrap();
    assert_eq!(
        summary(&by_scene.aggregates),
        vec![("#A_Toy", "#A_Toy", 1, 1, 1), ("#B_Toy", "#B_Toy", 1, 1, 2)]
    );
}

#[test]
fn unattributed_speech_is_not_counted() {
    let tables = PlayPipeline::new().run(SONG_PLAY).unwrap();
    assert_eq!(
        summary(&tables.aggregates),
        vec![
            ("#A_Toy #B_Toy", "#A_Toy", 1, 1, 1),
            ("#A_Toy #B_Toy", "#A_Toy #B_Toy", 1, 2, 2),
        ]
    );
    assert_eq!(tables.aggregates[0].scene, 0);
}

#[test]
fn rerunning_writes_identical_tables() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    for dir in [&first, &second] {
        let store = CsvStore::new(dir.path()).unwrap();
        let tables = PlayPipeline::new().run(TOY_PLAY).unwrap();
        for kind in TableKind::ALL {
            store.write_table("toy", kind, &tables.table(kind)).unwrap();
        }
    }

    for kind in TableKind::ALL {
        let name = format!("toy.{}.csv", kind);
        let a = std::fs::read(first.path().join(&name)).unwrap();
        let b = std::fs::read(second.path().join(&name)).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b, "{} differs between runs", name);
    }
}

#[test]
fn structural_faults_name_the_record() {
    let xml = r#"<TEI><text><body><div xml:id="act-x" type="act" n="one"/></body></text></TEI>"#;
    let err = PlayPipeline::new().run(xml).unwrap_err();
    assert!(matches!(err, PipelineError::StructuralViolation(_)));
    assert!(err.to_string().contains("act-x"));

    let no_body = "<TEI><text><front/></text></TEI>";
    assert!(matches!(
        PlayPipeline::new().run(no_body),
        Err(PipelineError::StructuralViolation(_))
    ));

    assert!(matches!(
        PlayPipeline::new().run("<TEI><text>"),
        Err(PipelineError::Xml(_))
    ));
}

#[test]
fn stage_moves_without_who_are_rejected() {
    let xml = r##"<TEI><text><body>
        <div type="act" n="1"><stage xml:id="stg-9" type="exit"/></div>
      </body></text></TEI>"##;
    let err = PlayPipeline::new().run(xml).unwrap_err();
    assert!(matches!(err, PipelineError::PresenceInvariantViolation(_)));
    assert!(err.to_string().contains("stg-9"));
}

#[test]
fn speaking_puts_a_character_back_on_stage() {
    let xml = r##"<TEI><text><body>
        <div type="act" n="1">
          <stage type="entrance" who="#A_Toy"/>
          <stage type="exit" who="#A_Toy"/>
          <sp who="#A_Toy"><l n="1.0.1"><w xml:id="w-1" n="1.0.1">Hm</w></l></sp>
        </div>
      </body></text></TEI>"##;
    let tables = PlayPipeline::new().run(xml).unwrap();
    assert_eq!(summary(&tables.aggregates), vec![("#A_Toy", "#A_Toy", 1, 1, 1)]);
}
