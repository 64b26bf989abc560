//! End-to-end lookup over a CSV file with a scripted address source

use async_trait::async_trait;
use lookup_core::{
    AddressNormalizer, AddressSource, DelayPolicy, LookupError, LookupOrchestrator, LookupStatus,
    RecordStore, Result,
};
use std::collections::HashMap;

/// Serves canned results-page HTML and runs it through the page extractor
struct HtmlPageSource {
    pages: HashMap<String, String>,
}

#[async_trait]
impl AddressSource for HtmlPageSource {
    async fn fetch_raw_address(&self, query: &str) -> Result<String> {
        match self.pages.get(query) {
            Some(html) if html == "503" => Err(LookupError::ServiceUnavailable("Search returned 503".to_string())),
            Some(html) => Ok(lookup_core::extract_address_text(html)),
            None => Ok(String::new()),
        }
    }
}

const INPUT: &str = "\
Nom établissement,SIRET,Adresse,Code postal,Ville
Cabinet Durand,11111111100011,,,Nantes
Boulangerie Martin,22222222200022,3 rue Haute,59000,Lille
Garage Dupont,33333333300033,,,Lyon
Pharmacie Centrale,44444444400044,,,Bordeaux
";

fn pages() -> HashMap<String, String> {
    let mut pages = HashMap::new();
    pages.insert(
        "Cabinet Durand Nantes".to_string(),
        "<div><span>Adresse :</span><span>Cabinet médical 44000 NANTES - Prendre RDV</span></div>".to_string(),
    );
    pages.insert(
        "Boulangerie Martin 3 rue Haute Lille".to_string(),
        "<p>Avis clients, ouvert le dimanche</p>".to_string(),
    );
    pages.insert(
        "Garage Dupont Lyon".to_string(),
        "<address>15 Avenue Victor Hugo,<br>69006 Lyon.</address>".to_string(),
    );
    pages.insert("Pharmacie Centrale Bordeaux".to_string(), "503".to_string());
    pages
}

#[tokio::test]
async fn test_csv_lookup_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let input_path = dir.path().join("input.csv");
    let output_path = dir.path().join("output.csv");
    std::fs::write(&input_path, INPUT).unwrap();

    let store = RecordStore::default();
    let mut table = store.read_path(&input_path).unwrap();
    assert_eq!(table.records.len(), 4);

    let orchestrator = LookupOrchestrator::new(
        HtmlPageSource { pages: pages() },
        AddressNormalizer::default(),
        DelayPolicy::none(),
    );
    let processed = orchestrator.process_records(std::mem::take(&mut table.records)).await;
    table.records = processed.records;
    store.write_path(&output_path, &table).unwrap();

    let statuses: Vec<LookupStatus> = processed.run.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            LookupStatus::Parsed,
            LookupStatus::NotFound,
            LookupStatus::Parsed,
            LookupStatus::Failed,
        ]
    );

    let written = std::fs::read_to_string(&output_path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "Nom établissement,SIRET,Adresse,Code postal,Ville");
    assert_eq!(lines[1], "Cabinet Durand,11111111100011,Cabinet médical,44000,NANTES");
    assert_eq!(lines[2], "Boulangerie Martin,22222222200022,3 rue Haute,59000,Lille");
    assert_eq!(lines[3], "Garage Dupont,33333333300033,15 Avenue Victor Hugo,69006,Lyon");
    assert_eq!(lines[4], "Pharmacie Centrale,44444444400044,,,Bordeaux");
    assert_eq!(lines.len(), 5, "no record may be dropped");

    let report = processed.run.to_json_pretty().unwrap();
    assert!(report.contains("\"status\": \"failed\""));
    assert!(report.contains("Search returned 503"));
}
