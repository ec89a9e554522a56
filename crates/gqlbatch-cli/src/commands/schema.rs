use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use gqlbatch_client::{Headers, HttpTransport, OperationKind, QueryExecutor};
use gqlbatch_schema::{SchemaRegistry, TypeClass};

use crate::output::{print_json, print_success, print_table};

/// Loads a schema from a saved introspection response.
pub fn load_file(path: &Path) -> Result<SchemaRegistry> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read schema file {}", path.display()))?;
    SchemaRegistry::from_introspection_str(&content)
        .with_context(|| format!("Invalid schema file {}", path.display()))
}

pub async fn introspect(executor: &QueryExecutor<HttpTransport>, output: Option<&Path>) -> Result<()> {
    let value = executor.introspect(&Headers::new()).await?;
    let registry = SchemaRegistry::from_introspection_value(value.clone())?;

    match output {
        Some(path) => {
            fs::write(path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            print_success(&format!(
                "Saved {} types to {}",
                registry.len(),
                path.display()
            ));
        }
        None => print_json(&value)?,
    }
    Ok(())
}

pub fn selection(registry: &SchemaRegistry, type_name: Option<&str>) -> Result<()> {
    match type_name {
        Some(name) => println!("{}", registry.default_selection(name)?),
        None => {
            for (name, body) in registry.default_selections()? {
                println!("{} {{ {body} }}", name.cyan());
            }
        }
    }
    Ok(())
}

pub fn types(registry: &SchemaRegistry) {
    let rows = registry
        .types()
        .map(|t| {
            let members = t.member_fields().map_or(0, |fields| fields.len());
            [
                t.name.clone(),
                t.kind.to_string(),
                class_label(registry.classify(t)).to_string(),
                members.to_string(),
            ]
        })
        .collect();
    print_table(["Name", "Kind", "Selected as", "Fields"], rows);
}

pub fn operations(registry: &SchemaRegistry, kind: OperationKind) -> Result<()> {
    let root = registry.root_type(kind)?;
    println!("{}: {}", "Root".cyan(), root.name);

    let rows = registry
        .root_fields(kind)
        .iter()
        .map(|field| {
            let args = field
                .args
                .iter()
                .map(|arg| format!("{}: {}", arg.name, arg.type_ref))
                .collect::<Vec<_>>()
                .join(", ");
            [field.name.clone(), args, field.type_ref.to_string()]
        })
        .collect();
    print_table(["Field", "Arguments", "Returns"], rows);
    Ok(())
}

fn class_label(class: TypeClass) -> &'static str {
    match class {
        TypeClass::Object => "object",
        TypeClass::Enum => "enum",
        TypeClass::Scalar => "leaf",
    }
}
