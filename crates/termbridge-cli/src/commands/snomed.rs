use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use termbridge_core::{Concept, MappingResult, dedupe_codes};
use termbridge_export::MappingRow;
use termbridge_umls::UmlsClient;

use crate::cli::OutputFormat;
use crate::output::{TableRows, print_rows};

#[derive(Serialize)]
struct HitRow {
    ui: String,
    name: String,
}

impl TableRows for HitRow {
    fn header() -> Vec<&'static str> {
        vec!["CUI", "Name"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.ui.clone(), self.name.clone()]
    }
}

#[derive(Serialize)]
struct MappedRow {
    cui: String,
    icd10_code: String,
    description: String,
}

impl TableRows for MappedRow {
    fn header() -> Vec<&'static str> {
        vec!["CUI", "ICD-10 Code", "Description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.cui.clone(),
            self.icd10_code.clone(),
            self.description.clone(),
        ]
    }
}

pub async fn search(client: &UmlsClient, term: &str, format: OutputFormat) -> Result<()> {
    let rows: Vec<_> = client
        .search_terms(term)
        .await?
        .into_iter()
        .map(|c| HitRow {
            ui: c.code,
            name: c.name,
        })
        .collect();
    print_rows(&rows, format)
}

pub async fn map(
    client: &UmlsClient,
    cuis: &[String],
    term: &str,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let concepts = dedupe_codes(cuis.iter().map(|cui| cui.trim().to_string()))
        .into_iter()
        .map(|cui| Concept::new(cui, ""));
    let results = client.map_concepts(concepts).await?;

    if let Some(path) = output {
        return super::write_export(path, &MappingRow::from_results(term, &results));
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        OutputFormat::Table => print_rows(&mapped_rows(&results), format),
    }
}

/// One table row per ICD-10 code; an unmapped concept keeps a row with empty cells.
fn mapped_rows(results: &[MappingResult]) -> Vec<MappedRow> {
    MappingRow::from_results("", results)
        .into_iter()
        .map(|row| MappedRow {
            cui: row.concept_id,
            icd10_code: row.icd10_code,
            description: row.icd10_description,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use termbridge_core::TargetCode;
    use termbridge_umls::UmlsConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TGT_PATH: &str = "/cas/v1/api-key/TGT-1";

    async fn umls_client(server: &MockServer) -> UmlsClient {
        Mock::given(method("POST"))
            .and(path("/cas/v1/api-key"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Location", format!("{}{TGT_PATH}", server.uri()).as_str()),
            )
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path(TGT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("ST-1"))
            .mount(server)
            .await;

        let config = UmlsConfig::default()
            .with_api_key("test-key")
            .with_auth_url(format!("{}/cas/v1/api-key", server.uri()))
            .with_base_url(format!("{}/rest", server.uri()));
        UmlsClient::new(config).unwrap()
    }

    #[test]
    fn test_unmapped_concept_keeps_a_table_row() {
        let results = vec![
            MappingResult::from_targets(
                Concept::new("C0004096", "Asthma"),
                vec![TargetCode::new("J45.909", "Unspecified asthma")],
            ),
            MappingResult::new(Concept::new("C0000001", "Unmapped")),
        ];

        let rows = mapped_rows(&results);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row(), vec!["C0004096", "J45.909", "Unspecified asthma"]);
        assert_eq!(rows[1].row(), vec!["C0000001", "", ""]);
    }

    #[tokio::test]
    async fn test_map_writes_export_file() {
        let server = MockServer::start().await;
        let client = umls_client(&server).await;
        Mock::given(method("GET"))
            .and(path("/rest/content/current/CUI/C0004096/atoms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pageSize": 25,
                "pageNumber": 1,
                "result": [{
                    "obsolete": "false",
                    "name": "Unspecified asthma, uncomplicated",
                    "code": format!("{}/rest/content/current/source/ICD10CM/J45.909", server.uri())
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/content/current/CUI/C0000001/atoms"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("asthma.csv");
        let cuis = vec!["C0004096".to_string(), "C0000001".to_string(), "C0004096".to_string()];
        map(&client, &cuis, "asthma", Some(&output), OutputFormat::Json)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Search Term,Concept CUI"));
        assert_eq!(lines[1], "asthma,C0004096,,J45.909,\"Unspecified asthma, uncomplicated\"");
        assert_eq!(lines[2], "asthma,C0000001,,,");
    }
}
