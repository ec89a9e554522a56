use anyhow::Result;
use colored::Colorize;
use gqlbatch_client::GraphQlResponse;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Prints rows under a header with rounded borders.
pub fn print_table<const N: usize>(header: [&str; N], rows: Vec<[String; N]>) {
    if rows.is_empty() {
        println!("Nothing to show.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}

/// Prints the response body, then each GraphQL error on stderr.
pub fn print_response(response: &GraphQlResponse) -> Result<()> {
    print_json(response)?;
    for error in response.errors() {
        let path = error
            .path
            .as_ref()
            .map(|p| {
                p.iter()
                    .map(|seg| seg.as_str().map_or_else(|| seg.to_string(), str::to_string))
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .unwrap_or_default();
        if path.is_empty() {
            print_warning(&error.message);
        } else {
            print_warning(&format!("{}: {}", path.cyan(), error.message));
        }
    }
    Ok(())
}
