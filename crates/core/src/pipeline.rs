//! Orchestration: classify, parse, default, score, itemize, price,
//! validate, decide.
//!
//! Strictly linear per request; batch mode is N independent invocations
//! with no shared mutable state. The pipeline never raises for user input;
//! the only fallible step in the whole system is catalog loading, which
//! happens before a pipeline exists.

use chrono::Utc;

use crate::bom;
use crate::catalog::Catalog;
use crate::classify;
use crate::defaults;
use crate::domain::quotation::{QuotationId, QuotationOutput, QuotationStatus};
use crate::domain::request::{ClientInfo, OperatingMode};
use crate::parse;
use crate::pricing;
use crate::risk::{self, RiskLevel};
use crate::validate::{self, ValidationResult};

const INCOMPLETE_FIELD_WEIGHT: u32 = 4;
const ASSUMPTION_WEIGHT: u32 = 5;
const CRITICAL_ISSUE_WEIGHT: u32 = 15;
const WARNING_ISSUE_WEIGHT: u32 = 5;
const MISSING_PRICE_WEIGHT: u32 = 8;
const REVIEW_WARNING_THRESHOLD: usize = 3;

#[derive(Clone, Debug, Default)]
pub struct QuoteInput {
    pub text: String,
    pub mode_override: Option<OperatingMode>,
    pub client: Option<ClientInfo>,
}

pub struct Pipeline<'a> {
    catalog: &'a Catalog,
}

impl<'a> Pipeline<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn process(&self, input: &QuoteInput) -> QuotationOutput {
        let classification = classify::classify(&input.text, input.mode_override);
        let mode = classification.mode;
        tracing::debug!(
            request_type = ?classification.request_type,
            ?mode,
            confidence = classification.confidence,
            "request classified"
        );

        let parsed = parse::parse(&input.text, input.client.clone());
        let request = defaults::apply_defaults(parsed, mode, self.catalog);
        tracing::debug!(
            incomplete = request.incomplete_fields.len(),
            assumptions = request.assumptions_used.len(),
            "request parsed"
        );

        let risk = risk::assess(&request, self.catalog);
        let bom = bom::build(&request, self.catalog);
        let pricing = pricing::price(&bom, &request, self.catalog);
        let validation = validate::validate(&request, &bom, &pricing, &risk, mode);

        let confidence_score = confidence_score(
            request.incomplete_fields.len(),
            request.assumptions_used.len(),
            risk.level,
            &validation,
            pricing.missing_prices.len(),
        );
        let status = decide_status(mode, risk.level, &validation);
        tracing::info!(?status, confidence_score, total_risk = risk.total, "quotation assembled");

        let processing_notes = build_notes(&classification, &request, &pricing, status);

        QuotationOutput {
            id: QuotationId::new(),
            created_at: Utc::now(),
            mode,
            classification,
            request,
            risk,
            bom,
            pricing,
            validation,
            status,
            confidence_score,
            processing_notes,
        }
    }

    /// Batch mode: an ordered list of independent requests. Items share
    /// the catalog reference and nothing else, so callers may parallelize.
    pub fn process_batch(&self, inputs: &[QuoteInput]) -> Vec<QuotationOutput> {
        inputs.iter().map(|input| self.process(input)).collect()
    }
}

fn confidence_score(
    incomplete_fields: usize,
    assumptions: usize,
    risk_level: RiskLevel,
    validation: &ValidationResult,
    missing_prices: usize,
) -> u8 {
    let risk_deduction = match risk_level {
        RiskLevel::FormalCertified => 0,
        RiskLevel::TechnicalConditioned => 8,
        RiskLevel::CommercialQuick => 15,
        RiskLevel::TechnicalBlock => 30,
    };
    let deductions = incomplete_fields as u32 * INCOMPLETE_FIELD_WEIGHT
        + assumptions as u32 * ASSUMPTION_WEIGHT
        + risk_deduction
        + validation.effective_criticals() as u32 * CRITICAL_ISSUE_WEIGHT
        + validation.effective_warnings() as u32 * WARNING_ISSUE_WEIGHT
        + missing_prices as u32 * MISSING_PRICE_WEIGHT;

    100u32.saturating_sub(deductions) as u8
}

// Fixed decision table; order matters.
fn decide_status(
    mode: OperatingMode,
    risk_level: RiskLevel,
    validation: &ValidationResult,
) -> QuotationStatus {
    if mode.is_formal() && validation.effective_criticals() > 0 {
        return QuotationStatus::Blocked;
    }
    if risk_level == RiskLevel::TechnicalBlock {
        return QuotationStatus::RequiresReview;
    }
    if validation.effective_warnings() > REVIEW_WARNING_THRESHOLD {
        return QuotationStatus::RequiresReview;
    }
    if mode.is_formal()
        && validation.effective_criticals() == 0
        && validation.effective_warnings() == 0
    {
        return QuotationStatus::Validated;
    }
    QuotationStatus::Draft
}

fn build_notes(
    classification: &classify::ClassificationResult,
    request: &crate::domain::request::QuoteRequest,
    pricing: &pricing::PricingResult,
    status: QuotationStatus,
) -> Vec<String> {
    let mut notes = vec![format!(
        "classified as {:?} in {:?} mode (confidence {:.2})",
        classification.request_type, classification.mode, classification.confidence
    )];
    if !request.assumptions_used.is_empty() {
        notes.push(format!("{} assumption(s) applied", request.assumptions_used.len()));
    }
    if !pricing.missing_prices.is_empty() {
        notes.push(format!("{} price(s) unresolved", pricing.missing_prices.len()));
    }
    notes.push(format!("final status {status:?}"));
    notes
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::domain::quotation::QuotationStatus;
    use crate::domain::request::{OperatingMode, RequestType};
    use crate::risk::RiskLevel;

    use super::{Pipeline, QuoteInput};

    fn input(text: &str, mode_override: Option<OperatingMode>) -> QuoteInput {
        QuoteInput { text: text.to_string(), mode_override, client: None }
    }

    #[test]
    fn roof_without_span_in_pre_cotizacion_is_never_blocked() {
        let catalog = Catalog::fixture();
        let pipeline = Pipeline::new(&catalog);
        let output = pipeline.process(&input(
            "Isodec 100mm eps, 6 paneles de 6.5m, techo",
            Some(OperatingMode::PreCotizacion),
        ));

        assert_ne!(output.status, QuotationStatus::Blocked);
        assert!(output
            .request
            .assumptions_used
            .iter()
            .any(|assumption| assumption.contains("span")));
    }

    #[test]
    fn formal_roof_without_span_is_blocked() {
        let catalog = Catalog::fixture();
        let pipeline = Pipeline::new(&catalog);
        let output = pipeline.process(&input(
            "Cotización formal: Isodec 100mm eps, 6 paneles de 6.5m para techo",
            None,
        ));

        assert_eq!(output.mode, OperatingMode::Formal);
        assert_eq!(output.status, QuotationStatus::Blocked);
        assert!(output
            .validation
            .issues
            .iter()
            .any(|issue| issue.code == "B_SPAN_MISSING"));
    }

    #[test]
    fn wall_batch_scenario_classifies_and_scores_as_specified() {
        let catalog = Catalog::fixture();
        let pipeline = Pipeline::new(&catalog);
        let output = pipeline.process(&input("Pared con 13 paneles de 2.60 m, isowall eps 50mm", None));

        assert!(output.classification.has_wall);
        assert_eq!(output.classification.request_type, RequestType::WallSystem);
        assert_eq!(output.risk.system.points, 0);
        assert_eq!(output.request.panel_count, Some(13));
    }

    #[test]
    fn clean_formal_request_validates() {
        let catalog = Catalog::fixture();
        let pipeline = Pipeline::new(&catalog);
        let output = pipeline.process(&input(
            "Cotización formal: techo isodec eps de 100mm, 6x6.5 metros, \
             luz de 3m, estructura metalica, dos aguas",
            None,
        ));

        // The fixture keeps this request fully resolvable; whatever issues
        // remain must not be critical.
        assert_eq!(output.validation.effective_criticals(), 0);
        assert_ne!(output.status, QuotationStatus::Blocked);
    }

    #[test]
    fn confidence_never_underflows() {
        let catalog = Catalog::fixture();
        let pipeline = Pipeline::new(&catalog);
        let output = pipeline.process(&input(
            "techo según plano con empalme, envío urgente",
            Some(OperatingMode::Formal),
        ));

        // Plenty of deductions here; the score must floor at zero instead
        // of wrapping.
        assert!(output.confidence_score <= 100);
    }

    #[test]
    fn technical_block_risk_routes_to_review_even_when_not_formal() {
        let catalog = Catalog::fixture();
        let pipeline = Pipeline::new(&catalog);
        // Missing everything on a roof plus exceeded span pushes total risk
        // past the block threshold.
        let output = pipeline.process(&input(
            "techo isodec eps 50mm según plano, 4 paneles de 13m, mariposa, luz de 7m, empalme",
            Some(OperatingMode::PreCotizacion),
        ));

        assert_eq!(output.risk.level, RiskLevel::TechnicalBlock);
        assert_eq!(output.status, QuotationStatus::RequiresReview);
    }

    #[test]
    fn batch_items_are_independent_and_ordered() {
        let catalog = Catalog::fixture();
        let pipeline = Pipeline::new(&catalog);
        let inputs = vec![
            input("Isodec 100mm eps, 6 paneles de 6.5m, techo", None),
            input("", None),
            input("Pared isowall 50mm, 13 paneles de 2.60 m", None),
        ];
        let outputs = pipeline.process_batch(&inputs);

        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].classification.request_type, RequestType::RoofSystem);
        assert_eq!(outputs[1].classification.request_type, RequestType::InfoOnly);
        assert_eq!(outputs[2].classification.request_type, RequestType::WallSystem);

        // Same text processed alone yields the same quantities: no state
        // leaks between batch items.
        let solo = pipeline.process(&inputs[0]);
        assert_eq!(solo.bom.items, outputs[0].bom.items);
        assert_eq!(solo.pricing.total, outputs[0].pricing.total);
    }
}
