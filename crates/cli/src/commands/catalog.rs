use panelquote_core::config::AppConfig;
use panelquote_core::CatalogStore;
use serde::Serialize;

use super::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
}

#[derive(Debug, Serialize)]
struct CatalogCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct CatalogReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<CatalogCheck>,
}

pub fn check(config: &AppConfig, json_output: bool) -> CommandResult {
    let report = build_report(config);
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 2 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"catalog check serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

pub fn reload(config: &AppConfig) -> CommandResult {
    let store = CatalogStore::new(config.catalog_paths());
    if let Err(error) = store.get() {
        return CommandResult::failure("catalog reload", "catalog_load", error.to_string(), 2);
    }
    match store.reload() {
        Ok(catalog) => CommandResult::success_with_details(
            "catalog reload",
            "catalog snapshot rebuilt",
            serde_json::json!({
                "span_entries": catalog.span_entry_count(),
                "panel_prices": catalog.panel_price_count(),
                "accessory_prices": catalog.accessory_price_count(),
            }),
        ),
        Err(error) => {
            CommandResult::failure("catalog reload", "catalog_reload", error.to_string(), 2)
        }
    }
}

fn build_report(config: &AppConfig) -> CatalogReport {
    let paths = config.catalog_paths();
    let mut checks = Vec::new();

    for (name, path) in [
        ("span_table_file", &paths.span_table),
        ("price_table_file", &paths.price_table),
        ("defaults_file", &paths.defaults),
    ] {
        let status = if path.exists() { CheckStatus::Pass } else { CheckStatus::Fail };
        let details = if path.exists() {
            format!("found `{}`", path.display())
        } else {
            format!("missing `{}`", path.display())
        };
        checks.push(CatalogCheck { name, status, details });
    }

    match CatalogStore::new(paths).get() {
        Ok(catalog) => {
            checks.push(CatalogCheck {
                name: "catalog_build",
                status: CheckStatus::Pass,
                details: format!(
                    "{} span entries, {} panel prices, {} accessory prices, {} accessory rules",
                    catalog.span_entry_count(),
                    catalog.panel_price_count(),
                    catalog.accessory_price_count(),
                    catalog.accessory_rules().len()
                ),
            });
        }
        Err(error) => {
            checks.push(CatalogCheck {
                name: "catalog_build",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "catalog check: all reference tables loaded".to_string()
    } else {
        "catalog check: one or more reference tables failed to load".to_string()
    };

    CatalogReport { overall_status, summary, checks }
}

fn render_human(report: &CatalogReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
