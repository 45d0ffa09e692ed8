use std::sync::Arc;
use std::thread;

use crate::assembler::{Segment, stitch};
use crate::diagnostics::{ModificationKind, ParserDiagnostics};
use crate::dictionary::{DictionaryEntry, DictionaryStore, MemoryDictionary};
use crate::errors::{KotobaError, Result};
use crate::parser::Parser;
use crate::scorer::ScoreWeights;
use crate::test_utils::{ScriptedAnalyzer, fixture_dictionary, fixture_parser};

const SAMUKE: &[(&str, &str, &str, &str)] = &[
    ("寒気", "名詞,一般", "寒気", "カンキ"),
    ("が", "助詞,格助詞,一般", "が", "ガ"),
    ("し", "動詞,自立", "する", "シ"),
    ("た", "助動詞", "た", "タ"),
];

#[test]
fn test_empty_input() {
    let parser = fixture_parser(ScriptedAnalyzer::failing());
    assert!(parser.parse("", None).unwrap().is_empty());
    assert!(parser.parse(" \n", None).unwrap().is_empty());
}

#[test]
fn test_max_input_chars() {
    let parser = fixture_parser(ScriptedAnalyzer::new()).max_input_chars(3);
    assert!(parser.parse("表へ", None).is_ok());
    assert!(matches!(
        parser.parse("表へ出る", None),
        Err(KotobaError::InvalidArgument(_))
    ));
}

#[test]
fn test_tokenizer_failure_is_fatal() {
    let parser = fixture_parser(ScriptedAnalyzer::failing());
    let err = parser.parse("表へ出る", None).unwrap_err();
    assert!(err.is_upstream());
}

#[test]
fn test_tokens_not_covering_input() {
    let tokens = [
        ("表", "名詞,一般", "表", "ヒョウ"),
        ("出る", "動詞,自立", "出る", "デル"),
    ];
    let parser = fixture_parser(ScriptedAnalyzer::new().script("表へ出る", &tokens));
    let err = parser.parse("表へ出る", None).unwrap_err();
    assert!(err.is_upstream());
}

struct FailingStore;

impl DictionaryStore for FailingStore {
    fn lookup(&self, _key: &str) -> Result<Vec<Arc<DictionaryEntry>>> {
        Err(KotobaError::upstream("dictionary", "connection refused"))
    }

    fn reading_count(&self, _word_id: u32) -> Result<Option<usize>> {
        Err(KotobaError::upstream("dictionary", "connection refused"))
    }
}

#[test]
fn test_store_failure_is_fatal() {
    let parser = Parser::new(ScriptedAnalyzer::new(), FailingStore);
    match parser.parse("表", None) {
        Err(KotobaError::Upstream(e)) => assert_eq!("dictionary", e.component()),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_unresolved_tokens_are_absent() {
    let parser = fixture_parser(ScriptedAnalyzer::new());
    let words = parser.parse("猫と表", None).unwrap();
    let surfaces: Vec<&str> = words.iter().map(|w| w.original_text.as_str()).collect();
    assert_eq!(vec!["表"], surfaces);
}

#[test]
fn test_diagnostics() {
    let parser = fixture_parser(ScriptedAnalyzer::new().script("寒気がした", SAMUKE));
    let mut diagnostics = ParserDiagnostics::new();
    let with = parser.parse("寒気がした", Some(&mut diagnostics)).unwrap();
    let without = parser.parse("寒気がした", None).unwrap();
    assert_eq!(with, without);

    assert_eq!("寒気がした", diagnostics.input_text);
    assert_eq!(vec!["寒気", "が", "し", "た"], diagnostics.tokenizer_surfaces());
    assert_eq!(4, diagnostics.stages.len());

    let inflections = diagnostics.stage("Inflections").unwrap();
    assert_eq!(4, inflections.input_token_count);
    assert_eq!(3, inflections.output_token_count);

    let overrides = diagnostics.stage("ReadingOverrides").unwrap();
    assert_eq!(1, overrides.modifications.len());
    assert_eq!(ModificationKind::ReadingOverride, overrides.modifications[0].kind);
    assert_eq!("サムケ", overrides.modifications[0].output_reading);

    let (stage, _) = diagnostics.modifications_producing("した").next().unwrap();
    assert_eq!("Inflections", stage);

    let resolution = diagnostics.resolution("寒気").unwrap();
    assert_eq!("さむけ", resolution.reading);
    assert_eq!(2, resolution.candidates.len());
    assert_eq!(1210410, resolution.selected().unwrap().word_id);

    let json = serde_json::to_value(&diagnostics).unwrap();
    assert_eq!("Inflections", json["stages"][2]["stage_name"]);
    assert_eq!("reading_override", json["stages"][3]["modifications"][0]["kind"]);
}

#[test]
fn test_diagnostics_reused() {
    let parser = fixture_parser(ScriptedAnalyzer::new());
    let mut diagnostics = ParserDiagnostics::new();
    parser.parse("表へ", Some(&mut diagnostics)).unwrap();
    parser.parse("ママ", Some(&mut diagnostics)).unwrap();
    assert_eq!("ママ", diagnostics.input_text);
    assert_eq!(1, diagnostics.resolutions.len());
}

#[test]
fn test_stitch_parse_result() {
    let text = "表へ出る。";
    let parser = fixture_parser(ScriptedAnalyzer::new());
    let words = parser.parse(text, None).unwrap();
    let segments = stitch(text, &words);
    assert_eq!(text, segments.iter().map(Segment::text).collect::<String>());
    assert!(matches!(segments[0], Segment::Word(w) if w.word_id == 1489340));
}

#[test]
fn test_snapshot_dictionary_gives_same_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.dic.zst");
    fixture_dictionary().write_to_path(&path).unwrap();
    let loaded = MemoryDictionary::from_path(&path).unwrap();

    let analyzer = || ScriptedAnalyzer::new().script("寒気がした", SAMUKE);
    let from_memory = fixture_parser(analyzer()).parse("寒気がした", None).unwrap();
    let from_snapshot = Parser::new(analyzer(), loaded)
        .parse("寒気がした", None)
        .unwrap();
    assert_eq!(from_memory, from_snapshot);
}

/// 頻度帯の重みを0にすると優先度が並び、単語IDで決まる
#[test]
fn test_custom_weights() {
    let tokens = [
        ("あと", "名詞,副詞可能", "あと", "アト"),
        ("少し", "副詞,助詞類接続", "少し", "スコシ"),
    ];
    let weights = ScoreWeights {
        band_weight: 0,
        ..ScoreWeights::default()
    };
    let mut diagnostics = ParserDiagnostics::new();

    let parser = fixture_parser(ScriptedAnalyzer::new().script("あと少し", &tokens));
    parser.parse("あと少し", Some(&mut diagnostics)).unwrap();
    let candidates = &diagnostics.resolution("あと").unwrap().candidates;
    assert_eq!(80, candidates[0].frequency_score);
    assert_eq!(70, candidates[1].frequency_score);

    let flat = parser.clone().weights(weights);
    let words = flat.parse("あと少し", Some(&mut diagnostics)).unwrap();
    assert_eq!(1269320, words[0].word_id);
    let candidates = &diagnostics.resolution("あと").unwrap().candidates;
    assert_eq!(candidates[0].priority, candidates[1].priority);
    assert_eq!(1383680, candidates[1].word_id);
}

#[test]
fn test_shared_across_threads() {
    let parser = fixture_parser(ScriptedAnalyzer::new());
    let expected = parser.parse("表へ出る", None).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let parser = parser.clone();
            thread::spawn(move || parser.parse("表へ出る", None).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(expected, handle.join().unwrap());
    }
}
