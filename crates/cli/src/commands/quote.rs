use std::io::{self, Read};

use panelquote_core::config::AppConfig;
use panelquote_core::{Catalog, OperatingMode, Pipeline, QuotationOutput, QuoteInput};

use super::CommandResult;

pub fn run(
    config: &AppConfig,
    text: Option<String>,
    mode: Option<OperatingMode>,
    pretty: bool,
) -> CommandResult {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            if let Err(error) = io::stdin().read_to_string(&mut buffer) {
                return CommandResult::failure(
                    "quote",
                    "stdin",
                    format!("could not read request text from stdin: {error}"),
                    2,
                );
            }
            buffer
        }
    };

    let catalog = match Catalog::load(&config.catalog_paths()) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::failure("quote", "catalog_load", error.to_string(), 2),
    };

    let pipeline = Pipeline::new(&catalog);
    let output = pipeline.process(&QuoteInput { text, mode_override: mode, client: None });
    render(&output, pretty)
}

fn render(output: &QuotationOutput, pretty: bool) -> CommandResult {
    let serialized = if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    };
    match serialized {
        Ok(json) => CommandResult { exit_code: 0, output: json },
        Err(error) => CommandResult::failure("quote", "serialization", error.to_string(), 1),
    }
}
