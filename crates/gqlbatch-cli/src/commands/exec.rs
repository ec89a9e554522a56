use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gqlbatch_client::{
    HttpTransport, OperationBuilder, OperationKind, QueryBatch, QueryExecutor, compile_batch,
};
use gqlbatch_schema::SchemaRegistry;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::cli::ExecArgs;
use crate::config::parse_pair;
use crate::output::{print_json, print_response, print_warning};

/// One call in a batch file.
#[derive(Debug, Deserialize)]
pub struct BatchEntry {
    pub field: String,
    #[serde(default)]
    pub args: IndexMap<String, Value>,
    pub selection: Option<String>,
}

pub fn operation_kind(mutation: bool) -> OperationKind {
    if mutation {
        OperationKind::Mutation
    } else {
        OperationKind::Query
    }
}

/// Parses `name=value`; the value is JSON when it parses as JSON, else a string.
pub fn parse_argument(raw: &str) -> Result<(String, Value)> {
    let (name, text) = parse_pair(raw)?;
    let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok((name, value))
}

/// Plans a single `exec` call.
pub fn plan_call(registry: &SchemaRegistry, args: &ExecArgs) -> Result<QueryBatch> {
    let arguments = args
        .args
        .iter()
        .map(|raw| parse_argument(raw))
        .collect::<Result<Vec<_>>>()?;
    let alias = args.alias.as_deref().unwrap_or(&args.field);

    let mut builder = OperationBuilder::new(registry, operation_kind(args.mutation))?;
    match &args.selection {
        Some(selection) => {
            builder.field_with_selection(alias, &args.field, selection.as_str(), arguments)?
        }
        None => builder.field(alias, &args.field, arguments)?,
    };
    Ok(builder.build())
}

pub fn read_batch_file(path: &Path) -> Result<IndexMap<String, BatchEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read batch file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid batch file {}", path.display()))
}

/// Plans every entry of a batch file, in file order.
pub fn plan_batch(
    registry: &SchemaRegistry,
    kind: OperationKind,
    entries: IndexMap<String, BatchEntry>,
) -> Result<QueryBatch> {
    let mut builder = OperationBuilder::new(registry, kind)?;
    for (alias, entry) in entries {
        match entry.selection {
            Some(selection) => {
                builder.field_with_selection(&alias, &entry.field, selection, entry.args)?
            }
            None => builder.field(&alias, &entry.field, entry.args)?,
        };
    }
    Ok(builder.build())
}

pub fn print_document(kind: OperationKind, batch: &QueryBatch) -> Result<()> {
    print_json(&compile_batch(kind, batch))
}

pub async fn execute(
    executor: &QueryExecutor<HttpTransport>,
    kind: OperationKind,
    batch: &QueryBatch,
) -> Result<()> {
    if batch.is_empty() {
        print_warning("Nothing to send");
        return Ok(());
    }
    let response = executor.execute(kind, batch).await?;
    tracing::debug!(partial = response.is_partial(), "Operation completed");
    print_response(&response)
}
