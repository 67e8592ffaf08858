use std::fs;
use std::path::{Path, PathBuf};

use panelquote_cli::commands::{batch, catalog, quote};
use panelquote_core::config::{AppConfig, CatalogConfig, LogFormat, LoggingConfig};
use serde_json::Value;
use tempfile::TempDir;

fn workspace_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn config_with_shipped_tables() -> AppConfig {
    let data = workspace_data_dir();
    AppConfig {
        catalog: CatalogConfig {
            span_table: data.join("span_table.toml"),
            price_table: data.join("price_table.toml"),
            defaults: data.join("defaults.toml"),
        },
        logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

#[test]
fn quote_emits_a_full_quotation_document() {
    let config = config_with_shipped_tables();
    let result = quote::run(
        &config,
        Some("techo isodec eps 100mm, 6 paneles de 6.5m, luz de 5m".to_string()),
        None,
        false,
    );
    assert_eq!(result.exit_code, 0, "expected successful quote: {}", result.output);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["classification"]["request_type"], "roof_system");
    assert!(payload["pricing"]["total"].is_string() || payload["pricing"]["total"].is_number());
    assert!(payload["status"].is_string());
    assert!(payload["confidence_score"].is_number());
}

#[test]
fn quote_reports_catalog_errors_as_structured_failures() {
    let data = workspace_data_dir();
    let config = AppConfig {
        catalog: CatalogConfig {
            span_table: PathBuf::from("/nonexistent/span_table.toml"),
            price_table: data.join("price_table.toml"),
            defaults: data.join("defaults.toml"),
        },
        logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
    };

    let result = quote::run(&config, Some("techo isodec".to_string()), None, false);
    assert_eq!(result.exit_code, 2);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "catalog_load");
}

#[test]
fn batch_quotes_each_line_independently() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("requests.txt");
    fs::write(
        &file,
        "techo isodec eps 100mm, 6 paneles de 6.5m, luz de 5m\n\npared isowall 50mm, 13 paneles de 2.60 m\n",
    )
    .expect("write batch file");

    let config = config_with_shipped_tables();
    let result = batch::run(&config, &file, None, false);
    assert_eq!(result.exit_code, 0, "expected successful batch: {}", result.output);

    let payload = parse_payload(&result.output);
    let items = payload.as_array().expect("batch output should be a JSON array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["classification"]["request_type"], "roof_system");
    assert_eq!(items[1]["classification"]["request_type"], "wall_system");
}

#[test]
fn batch_rejects_an_empty_file() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("empty.txt");
    fs::write(&file, "\n  \n").expect("write batch file");

    let config = config_with_shipped_tables();
    let result = batch::run(&config, &file, None, false);
    assert_eq!(result.exit_code, 2);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "empty_batch");
}

#[test]
fn catalog_check_passes_against_shipped_tables() {
    let config = config_with_shipped_tables();
    let result = catalog::check(&config, true);
    assert_eq!(result.exit_code, 0, "expected passing check: {}", result.output);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["overall_status"], "pass");
    let checks = payload["checks"].as_array().expect("checks array");
    assert!(checks.iter().any(|check| check["name"] == "catalog_build"));
}

#[test]
fn catalog_check_fails_when_a_table_is_missing() {
    let data = workspace_data_dir();
    let config = AppConfig {
        catalog: CatalogConfig {
            span_table: data.join("span_table.toml"),
            price_table: PathBuf::from("/nonexistent/price_table.toml"),
            defaults: data.join("defaults.toml"),
        },
        logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
    };

    let result = catalog::check(&config, true);
    assert_eq!(result.exit_code, 2);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["overall_status"], "fail");
}

#[test]
fn catalog_reload_rebuilds_the_snapshot() {
    let config = config_with_shipped_tables();
    let result = catalog::reload(&config);
    assert_eq!(result.exit_code, 0, "expected successful reload: {}", result.output);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "catalog reload");
    assert_eq!(payload["status"], "ok");
    assert!(payload["details"]["span_entries"].as_u64().is_some_and(|count| count > 0));
    assert!(payload["details"]["accessory_prices"].as_u64().is_some_and(|count| count > 0));
}
