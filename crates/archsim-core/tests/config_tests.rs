use archsim_core::config::{
    ConfigError, DEFAULT_COMBINED_CSV, DEFAULT_EMBEDDING_MODEL, DEFAULT_JSON_DIR,
    DEFAULT_STRUCTURAL_CSV, DEFAULT_WEIGHT_SEMANTIC, DEFAULT_WEIGHT_STRUCTURAL,
};
use archsim_core::semantic::DEFAULT_STOP_WORDS;
use archsim_core::{CompareMode, Config};
use std::io::Write;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.similarity.weight_structural, DEFAULT_WEIGHT_STRUCTURAL);
    assert_eq!(config.similarity.weight_semantic, DEFAULT_WEIGHT_SEMANTIC);
    assert!(!config.similarity.test);
    assert_eq!(config.paths.json_dir, DEFAULT_JSON_DIR);
    assert_eq!(config.paths.structural_csv, DEFAULT_STRUCTURAL_CSV);
    assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
    assert_eq!(config.embedding.stop_words.len(), DEFAULT_STOP_WORDS.len());
    assert_eq!(config.scheduler.threads, None);
}

#[test]
fn test_default_config_string_round_trips() {
    let toml_str = Config::default_config_string();
    let config: Config = toml::from_str(&toml_str).unwrap();
    assert_eq!(config.similarity.compare_mode, CompareMode::Max);
    assert_eq!(config.paths.combined_csv, DEFAULT_COMBINED_CSV);
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[similarity]
weight_structural = 0.2
weight_semantic = 0.8
compare_mode = "min"

[embedding]
vectors_file = "vectors/wiki.en.vec"
stop_words = ["impl"]

[scheduler]
threads = 4
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.similarity.compare_mode, CompareMode::Min);
    assert_eq!(
        config.embedding.vectors_file.as_deref(),
        Some("vectors/wiki.en.vec")
    );
    assert_eq!(config.embedding.stop_words, vec!["impl".to_string()]);
    assert_eq!(config.scheduler.threads, Some(4));
    assert_eq!(config.paths.json_dir, DEFAULT_JSON_DIR);
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[similarity\nweight_structural = ").unwrap();
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::from_file(dir.path().join("absent.toml")),
        Err(ConfigError::ReadError(_))
    ));
}

#[test]
fn test_validate() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.similarity.weight_structural = 0.9;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    config.similarity.test = true;
    assert!(config.validate().is_ok());

    config.scheduler.threads = Some(0);
    assert!(config.validate().is_err());
}
