use std::fs;
use std::path::Path;

use panelquote_core::config::AppConfig;
use panelquote_core::{Catalog, OperatingMode, Pipeline, QuoteInput};

use super::CommandResult;

pub fn run(
    config: &AppConfig,
    file: &Path,
    mode: Option<OperatingMode>,
    pretty: bool,
) -> CommandResult {
    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                "batch",
                "read_file",
                format!("could not read `{}`: {error}", file.display()),
                2,
            );
        }
    };

    let texts = match parse_requests(&raw) {
        Ok(texts) => texts,
        Err(error) => return CommandResult::failure("batch", "parse_file", error, 2),
    };
    if texts.is_empty() {
        return CommandResult::failure(
            "batch",
            "empty_batch",
            format!("`{}` contains no requests", file.display()),
            2,
        );
    }

    let catalog = match Catalog::load(&config.catalog_paths()) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::failure("batch", "catalog_load", error.to_string(), 2),
    };

    let pipeline = Pipeline::new(&catalog);
    let inputs: Vec<QuoteInput> = texts
        .into_iter()
        .map(|text| QuoteInput { text, mode_override: mode, client: None })
        .collect();
    let outputs = pipeline.process_batch(&inputs);
    tracing::info!(items = outputs.len(), "batch processed");

    let serialized = if pretty {
        serde_json::to_string_pretty(&outputs)
    } else {
        serde_json::to_string(&outputs)
    };
    match serialized {
        Ok(json) => CommandResult { exit_code: 0, output: json },
        Err(error) => CommandResult::failure("batch", "serialization", error.to_string(), 1),
    }
}

/// A JSON array of strings, or one request per non-empty line.
fn parse_requests(raw: &str) -> Result<Vec<String>, String> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str::<Vec<String>>(raw)
            .map_err(|error| format!("expected a JSON array of strings: {error}"));
    }

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
