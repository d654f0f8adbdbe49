use archsim_core::semantic::{
    average_vector, CachedEmbedder, Embedder, NameNormalizer, SemanticScorer, StaticEmbedder,
};
use archsim_core::similarity::normalize_semantic;
use archsim_core::InstanceDocument;
use std::io::Write;
use std::sync::Arc;

fn vectors() -> StaticEmbedder {
    StaticEmbedder::new(3)
        .with_word("heater", vec![1.0, 0.2, 0.0])
        .with_word("thermostat", vec![0.8, 0.4, 0.1])
        .with_word("pump", vec![-0.5, 1.0, 0.0])
        .with_word("valve", vec![-0.4, 0.9, 0.3])
        .with_word("radar", vec![0.0, -0.3, 1.0])
}

fn scorer() -> SemanticScorer {
    SemanticScorer::new(Arc::new(vectors()))
}

fn doc(json: &str) -> InstanceDocument {
    InstanceDocument::from_json_str(json).unwrap()
}

#[test]
fn test_normalized_score_stays_in_unit_interval() {
    let scorer = scorer();
    let docs = [
        doc(r#"{"name":"Heater_Impl","componentInstance":{"name":"thermostat_1"}}"#),
        doc(r#"{"name":"Pump","componentInstance":[{"name":"valve"},{"name":"valve_2"}]}"#),
        doc(r#"{"name":"Radar_System"}"#),
    ];
    for a in &docs {
        for b in &docs {
            let raw = scorer.similarity(a, b);
            assert!((-1.0..=1.0).contains(&raw));
            let normalized = normalize_semantic(raw);
            assert!((0.0..=1.0).contains(&normalized));
        }
    }
}

#[test]
fn test_related_names_score_higher() {
    let scorer = scorer();
    let heater = doc(r#"{"name":"Heater"}"#);
    let thermostat = doc(r#"{"name":"Thermostat"}"#);
    let pump = doc(r#"{"name":"Pump"}"#);
    assert!(scorer.similarity(&heater, &thermostat) > scorer.similarity(&heater, &pump));
}

#[test]
fn test_stop_words_only_scores_zero() {
    let scorer = scorer();
    let empty = doc(r#"{"name":"this_system_instance","componentInstance":{"name":"hardware"}}"#);
    let heater = doc(r#"{"name":"Heater"}"#);
    assert_eq!(scorer.similarity(&empty, &heater), 0.0);
    assert_eq!(scorer.document_vector(&empty), None);
}

#[test]
fn test_unknown_names_are_skipped() {
    let embedder = vectors();
    let averaged = average_vector(&embedder, &["heater", "zeppelin"]).unwrap();
    assert_eq!(averaged.len(), 3);
    assert!((averaged[0] - 1.0).abs() < 1e-6);
}

#[test]
fn test_custom_stop_words() {
    let scorer = scorer().with_normalizer(NameNormalizer::new(&["heater"]));
    let a = doc(r#"{"name":"heater"}"#);
    let b = doc(r#"{"name":"thermostat"}"#);
    assert_eq!(scorer.similarity(&a, &b), 0.0);
}

#[test]
fn test_vector_file_feeds_the_scorer() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "3 2").unwrap();
    writeln!(file, "heater 1.0 0.0").unwrap();
    writeln!(file, "boiler 0.9 0.1").unwrap();
    writeln!(file, "antenna 0.0 1.0").unwrap();

    let table = StaticEmbedder::from_vec_file(file.path()).unwrap();
    let scorer = SemanticScorer::new(Arc::new(CachedEmbedder::new(table)));
    assert!(scorer.word_similarity("heater", "boiler") > 0.9);
    assert!(scorer.word_similarity("heater", "antenna").abs() < 1e-9);
    assert_eq!(scorer.embedder().dimension(), 2);
}
