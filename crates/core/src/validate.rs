//! Four-layer validation over the assembled quotation.
//!
//! Layers are independent: A data integrity, B technical, C commercial
//! completeness, D mathematical consistency. Findings keep both their
//! original and effective severity; the non-formal downgrade is a pure
//! transform over the issue list, never an in-place mutation, so the audit
//! trail survives.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bom::BomResult;
use crate::domain::request::{OperatingMode, PanelUsage, QuoteRequest};
use crate::pricing::{PriceCategory, PricingResult};
use crate::risk::RiskResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    A,
    B,
    C,
    D,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoportanciaStatus {
    Validated,
    NotVerified,
    NotApplicable,
    Exceeded,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub layer: Layer,
    pub code: String,
    pub message: String,
    pub field: Option<String>,
    pub original_severity: Severity,
    pub effective_severity: Severity,
    pub note: Option<String>,
}

impl Issue {
    fn new(
        layer: Layer,
        severity: Severity,
        code: &str,
        message: impl Into<String>,
        field: Option<&str>,
    ) -> Self {
        Self {
            layer,
            code: code.to_string(),
            message: message.into(),
            field: field.map(str::to_string),
            original_severity: severity,
            effective_severity: severity,
            note: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub issues: Vec<Issue>,
    pub autoportancia: AutoportanciaStatus,
    pub can_emit_formal: bool,
}

impl ValidationResult {
    pub fn effective_criticals(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.effective_severity == Severity::Critical)
            .count()
    }

    pub fn effective_warnings(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.effective_severity == Severity::Warning)
            .count()
    }
}

pub fn validate(
    request: &QuoteRequest,
    bom: &BomResult,
    pricing: &PricingResult,
    risk: &RiskResult,
    mode: OperatingMode,
) -> ValidationResult {
    let mut issues = Vec::new();
    layer_a(&mut issues, request, pricing);
    layer_b(&mut issues, request, bom, risk);
    layer_c(&mut issues, request, bom);
    layer_d(&mut issues, pricing);

    let issues = apply_mode_policy(issues, mode);
    let autoportancia = autoportancia_status(request, risk);
    let can_emit_formal = mode.is_formal()
        && issues.iter().all(|issue| issue.effective_severity != Severity::Critical);

    ValidationResult { issues, autoportancia, can_emit_formal }
}

fn layer_a(issues: &mut Vec<Issue>, request: &QuoteRequest, pricing: &PricingResult) {
    if request.family.is_none() {
        issues.push(Issue::new(
            Layer::A,
            Severity::Critical,
            "A_MISSING_FAMILY",
            "no product family identified in the request",
            Some("family"),
        ));
    }
    if request.thickness_mm.is_none() {
        issues.push(Issue::new(
            Layer::A,
            Severity::Critical,
            "A_MISSING_THICKNESS",
            "panel thickness is required to identify the product",
            Some("thickness_mm"),
        ));
    }
    for entry in &pricing.missing_prices {
        issues.push(Issue::new(
            Layer::A,
            Severity::Critical,
            "A_PRICE_UNRESOLVED",
            format!("no reference price for {entry}"),
            None,
        ));
    }
}

fn layer_b(issues: &mut Vec<Issue>, request: &QuoteRequest, bom: &BomResult, risk: &RiskResult) {
    if request.usage == Some(PanelUsage::Roof) && request.span_m.is_none() {
        issues.push(Issue::new(
            Layer::B,
            Severity::Critical,
            "B_SPAN_MISSING",
            "support spacing is required for a roof install",
            Some("span_m"),
        ));
    }
    match risk.span_ratio {
        Some(ratio) if ratio > 1.0 => {
            let alternatives = if risk.alternative_thicknesses.is_empty() {
                "no thicker gauge covers it; add supports".to_string()
            } else {
                format!(
                    "thicker gauges available: {}",
                    risk.alternative_thicknesses
                        .iter()
                        .map(|thickness| format!("{thickness}mm"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            };
            issues.push(Issue::new(
                Layer::B,
                Severity::Critical,
                "B_SPAN_EXCEEDED",
                format!("requested span exceeds rated capacity (ratio {ratio:.2}); {alternatives}"),
                Some("span_m"),
            ));
        }
        Some(_) => {
            issues.push(Issue::new(
                Layer::B,
                Severity::Ok,
                "B_SPAN_VALIDATED",
                "span within rated capacity",
                Some("span_m"),
            ));
        }
        None => {}
    }
    for warning in &bom.warnings {
        issues.push(Issue::new(Layer::B, Severity::Warning, "B_BOM_WARNING", warning, None));
    }
}

fn layer_c(issues: &mut Vec<Issue>, request: &QuoteRequest, bom: &BomResult) {
    if request.include_shipping && request.client.location.is_none() {
        issues.push(Issue::new(
            Layer::C,
            Severity::Critical,
            "C_SHIPPING_LOCATION_MISSING",
            "shipping requested but no delivery location given",
            Some("client.location"),
        ));
    }
    if request.usage == Some(PanelUsage::Roof) {
        let has_accessories = bom
            .items
            .iter()
            .any(|item| item.kind != crate::bom::BomItemKind::Panel);
        if !has_accessories {
            issues.push(Issue::new(
                Layer::C,
                Severity::Warning,
                "C_ACCESSORIES_MISSING",
                "roof quote carries no accessories; confirm the client supplies them",
                None,
            ));
        }
    }
}

fn layer_d(issues: &mut Vec<Issue>, pricing: &PricingResult) {
    let mut panels = Decimal::ZERO;
    let mut accessories = Decimal::ZERO;
    let mut fixings = Decimal::ZERO;
    for item in &pricing.items {
        match item.category {
            PriceCategory::Panels => panels += item.subtotal,
            PriceCategory::Accessories => accessories += item.subtotal,
            PriceCategory::Fixings => fixings += item.subtotal,
        }
    }

    let categories_match = panels == pricing.subtotal_panels
        && accessories == pricing.subtotal_accessories
        && fixings == pricing.subtotal_fixings;
    let total_matches = pricing.total
        == (pricing.subtotal_panels + pricing.subtotal_accessories + pricing.subtotal_fixings)
            .round_dp(2);

    if !categories_match || !total_matches {
        issues.push(Issue::new(
            Layer::D,
            Severity::Critical,
            "D_TOTAL_MISMATCH",
            "line items do not reconcile with reported subtotals",
            None,
        ));
    }
}

/// Non-formal modes trade blocking for auditability: every A-C critical is
/// re-emitted as a warning with a note. Layer D stays critical in every
/// mode.
fn apply_mode_policy(issues: Vec<Issue>, mode: OperatingMode) -> Vec<Issue> {
    if mode.is_formal() {
        return issues;
    }
    issues
        .into_iter()
        .map(|issue| {
            if issue.layer != Layer::D && issue.original_severity == Severity::Critical {
                Issue {
                    effective_severity: Severity::Warning,
                    note: Some(format!(
                        "downgraded from critical: non-blocking in {mode:?} mode"
                    )),
                    ..issue
                }
            } else {
                issue
            }
        })
        .collect()
}

fn autoportancia_status(request: &QuoteRequest, risk: &RiskResult) -> AutoportanciaStatus {
    if request.usage != Some(PanelUsage::Roof) {
        return AutoportanciaStatus::NotApplicable;
    }
    match risk.span_ratio {
        Some(ratio) if ratio > 1.0 => AutoportanciaStatus::Exceeded,
        Some(_) => AutoportanciaStatus::Validated,
        None => AutoportanciaStatus::NotVerified,
    }
}

#[cfg(test)]
mod tests {
    use crate::bom;
    use crate::catalog::Catalog;
    use crate::domain::request::{
        ClientInfo, CoreMaterial, OperatingMode, PanelFamily, PanelUsage, QuoteRequest,
    };
    use crate::pricing;
    use crate::risk;

    use super::{validate, AutoportanciaStatus, Layer, Severity};

    fn roof_request(span_m: Option<f64>) -> QuoteRequest {
        QuoteRequest {
            family: Some(PanelFamily::Isodec),
            core: Some(CoreMaterial::Eps),
            thickness_mm: Some(100),
            usage: Some(PanelUsage::Roof),
            span_m,
            panel_count: Some(6),
            panel_lengths_m: vec![6.5; 6],
            length_m: Some(6.5),
            width_m: Some(6.0),
            include_accessories: true,
            include_fixings: true,
            ..QuoteRequest::default()
        }
    }

    fn run(request: &QuoteRequest, mode: OperatingMode) -> super::ValidationResult {
        let catalog = Catalog::fixture();
        let risk = risk::assess(request, &catalog);
        let bom = bom::build(request, &catalog);
        let pricing = pricing::price(&bom, request, &catalog);
        validate(request, &bom, &pricing, &risk, mode)
    }

    #[test]
    fn clean_formal_request_can_emit() {
        let result = run(&roof_request(Some(4.0)), OperatingMode::Formal);
        assert_eq!(result.effective_criticals(), 0);
        assert!(result.can_emit_formal);
        assert_eq!(result.autoportancia, AutoportanciaStatus::Validated);
    }

    #[test]
    fn missing_span_is_critical_in_formal_mode() {
        let result = run(&roof_request(None), OperatingMode::Formal);
        let issue = result
            .issues
            .iter()
            .find(|issue| issue.code == "B_SPAN_MISSING")
            .expect("span issue");
        assert_eq!(issue.effective_severity, Severity::Critical);
        assert!(!result.can_emit_formal);
    }

    #[test]
    fn missing_span_downgrades_outside_formal_mode() {
        let result = run(&roof_request(None), OperatingMode::PreCotizacion);
        let issue = result
            .issues
            .iter()
            .find(|issue| issue.code == "B_SPAN_MISSING")
            .expect("span issue");
        assert_eq!(issue.original_severity, Severity::Critical);
        assert_eq!(issue.effective_severity, Severity::Warning);
        assert!(issue.note.as_deref().is_some_and(|note| note.contains("downgraded")));
    }

    #[test]
    fn exceeded_span_reports_alternatives() {
        let result = run(&roof_request(Some(7.0)), OperatingMode::Formal);
        let issue = result
            .issues
            .iter()
            .find(|issue| issue.code == "B_SPAN_EXCEEDED")
            .expect("exceeded issue");
        assert!(issue.message.contains("150mm"));
        assert_eq!(result.autoportancia, AutoportanciaStatus::Exceeded);
    }

    #[test]
    fn shipping_without_location_is_a_layer_c_finding() {
        let request = QuoteRequest { include_shipping: true, ..roof_request(Some(4.0)) };
        let result = run(&request, OperatingMode::Formal);
        assert!(result
            .issues
            .iter()
            .any(|issue| issue.code == "C_SHIPPING_LOCATION_MISSING" && issue.layer == Layer::C));
    }

    #[test]
    fn shipping_with_location_passes_layer_c() {
        let request = QuoteRequest {
            include_shipping: true,
            client: ClientInfo { location: Some("Quito".to_string()), ..ClientInfo::default() },
            ..roof_request(Some(4.0))
        };
        let result = run(&request, OperatingMode::Formal);
        assert!(!result.issues.iter().any(|issue| issue.code == "C_SHIPPING_LOCATION_MISSING"));
    }

    #[test]
    fn tampered_totals_fail_layer_d_even_in_informal_mode() {
        let catalog = Catalog::fixture();
        let request = roof_request(Some(4.0));
        let risk = crate::risk::assess(&request, &catalog);
        let bom = crate::bom::build(&request, &catalog);
        let mut pricing = crate::pricing::price(&bom, &request, &catalog);
        pricing.total += rust_decimal::Decimal::ONE;

        let result = validate(&request, &bom, &pricing, &risk, OperatingMode::Informativo);
        let issue = result
            .issues
            .iter()
            .find(|issue| issue.code == "D_TOTAL_MISMATCH")
            .expect("mismatch issue");
        assert_eq!(issue.effective_severity, Severity::Critical);
    }

    #[test]
    fn wall_requests_have_not_applicable_autoportancia() {
        let request = QuoteRequest {
            family: Some(PanelFamily::Isowall),
            usage: Some(PanelUsage::Wall),
            ..roof_request(None)
        };
        let result = run(&request, OperatingMode::PreCotizacion);
        assert_eq!(result.autoportancia, AutoportanciaStatus::NotApplicable);
    }
}
