use lookup_core::config::LookupConfig;
use lookup_core::NormalizerMode;

#[test]
fn test_parse_full_config_json() {
    let json = r#"{
        "files": {
            "input": "etablissements.csv",
            "output": "etablissements_complets.csv",
            "report_path": "rapport.json"
        },
        "search": {
            "url": "https://search.example.org/search",
            "user_agent": "address-lookup/1.0",
            "timeout_secs": 10,
            "max_attempts": 5
        },
        "pacing": {
            "min_delay_ms": 1000,
            "max_delay_ms": 2000
        },
        "columns": {
            "name": "Raison sociale",
            "street": "Rue",
            "postal_code": "CP",
            "city": "Commune"
        },
        "normalizer": {
            "mode": "basic",
            "follow_up_query": false
        }
    }"#;

    let config = LookupConfig::from_json_str(json).expect("Failed to parse config");

    assert_eq!(config.files.input_path, "etablissements.csv", "input should map to input_path");
    assert_eq!(config.files.output_path, "etablissements_complets.csv");
    assert_eq!(config.files.report_path.as_deref(), Some("rapport.json"));

    assert_eq!(config.search.base_url, "https://search.example.org/search", "url should map to base_url");
    assert_eq!(config.search.user_agent, "address-lookup/1.0");
    assert_eq!(config.search.timeout_secs, 10);
    assert_eq!(config.search.max_attempts, 5);
    assert_eq!(config.search.accept_language, "fr-FR,fr;q=0.9", "accept_language should have default value");

    assert_eq!(config.pacing.min_delay_ms, 1000);
    assert_eq!(config.pacing.max_delay_ms, 2000);

    assert_eq!(config.columns.name, "Raison sociale");
    assert_eq!(config.columns.city, "Commune");

    assert_eq!(config.normalizer.mode, NormalizerMode::Basic);
    assert!(!config.normalizer.follow_up_query);
}

#[test]
fn test_parse_empty_config_uses_defaults() {
    let config = LookupConfig::from_json_str("{}").expect("Failed to parse empty config");

    assert_eq!(config.files.input_path, "input.csv");
    assert_eq!(config.files.output_path, "output.csv");
    assert!(config.files.report_path.is_none());
    assert_eq!(config.search.base_url, "https://www.google.com/search");
    assert_eq!(config.search.max_attempts, 3);
    assert_eq!(config.pacing.min_delay_ms, 5000);
    assert_eq!(config.pacing.max_delay_ms, 8000);
    assert_eq!(config.columns.postal_code, "Code postal");
    assert_eq!(config.normalizer.mode, NormalizerMode::Advanced);
    assert!(config.normalizer.follow_up_query);
}

#[test]
fn test_validate_config() {
    let json = r#"{
        "search": { "url": "ftp://search.example.org" },
        "pacing": { "min_delay_ms": 100, "max_delay_ms": 50 }
    }"#;

    let result = LookupConfig::from_json_str(json);
    assert!(result.is_err(), "Parsing should fail with an inverted delay range");

    let json = r#"{ "columns": { "name": "" } }"#;
    let result = LookupConfig::from_json_str(json);
    assert!(result.unwrap_err().to_string().contains("required"), "Error should mention required columns");

    let json = r#"{ "search": { "url": "ftp://search.example.org" } }"#;
    assert!(LookupConfig::from_json_str(json).is_err(), "Non-http search URL should be rejected");
}

#[test]
fn test_load_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("lookup.json");
    std::fs::write(&path, r#"{ "pacing": { "min_delay_ms": 0, "max_delay_ms": 0 } }"#).unwrap();

    let config = LookupConfig::from_file(&path).expect("Failed to load config file");
    assert_eq!(config.pacing.max_delay_ms, 0);
    assert_eq!(config.columns.name, "Nom établissement");

    let missing = LookupConfig::from_file(dir.path().join("absent.json"));
    assert!(missing.unwrap_err().to_string().contains("not found"));
}
