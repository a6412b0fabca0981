use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use termbridge_core::ValueSetSummary;
use termbridge_export::ValueSetRow;
use termbridge_vsac::VsacClient;

use crate::cli::OutputFormat;
use crate::output::{TableRows, print_rows};

#[derive(Serialize)]
struct SummaryRow<'a>(&'a ValueSetSummary);

impl TableRows for SummaryRow<'_> {
    fn header() -> Vec<&'static str> {
        vec!["OID", "Name", "Title"]
    }

    fn row(&self) -> Vec<String> {
        let cell = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        vec![cell(&self.0.id), cell(&self.0.name), cell(&self.0.title)]
    }
}

#[derive(Serialize)]
struct CodeRow {
    value_set: String,
    code: String,
    display: String,
}

impl TableRows for CodeRow {
    fn header() -> Vec<&'static str> {
        vec!["Value Set OID", "Code", "Display"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.value_set.clone(),
            self.code.clone(),
            self.display.clone(),
        ]
    }
}

pub async fn search(client: &VsacClient, term: &str, format: OutputFormat) -> Result<()> {
    let value_sets = client.search_value_sets(term).await?;
    let rows: Vec<_> = value_sets.iter().map(SummaryRow).collect();
    print_rows(&rows, format)
}

pub async fn view(client: &VsacClient, id: &str) -> Result<()> {
    let resource = client.read_value_set(id).await?;
    println!("{}", serde_json::to_string_pretty(&resource)?);
    Ok(())
}

pub async fn expand(
    client: &VsacClient,
    ids: &[String],
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut rows = Vec::new();
    for id in ids {
        let concepts = client.expand_value_set(id).await?;
        rows.extend(ValueSetRow::from_concepts(id, &concepts));
    }

    match output {
        Some(path) => super::write_export(path, &rows),
        None => {
            let rows: Vec<_> = rows
                .into_iter()
                .map(|r| CodeRow {
                    value_set: r.value_set_oid,
                    code: r.code,
                    display: r.display,
                })
                .collect();
            print_rows(&rows, format)
        }
    }
}
