use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bom::BomResult;
use crate::classify::ClassificationResult;
use crate::domain::request::{OperatingMode, QuoteRequest};
use crate::pricing::PricingResult;
use crate::risk::RiskResult;
use crate::validate::ValidationResult;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuotationId(pub Uuid);

impl QuotationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuotationId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    Draft,
    Validated,
    RequiresReview,
    Blocked,
}

/// Final pipeline output: one immutable document per request.
///
/// There is no update-in-place lifecycle; a correction produces a new
/// document with a new id. Consumers (transport, PDF rendering, audit)
/// read this and nothing else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotationOutput {
    pub id: QuotationId,
    pub created_at: DateTime<Utc>,
    pub mode: OperatingMode,
    pub classification: ClassificationResult,
    pub request: QuoteRequest,
    pub risk: RiskResult,
    pub bom: BomResult,
    pub pricing: PricingResult,
    pub validation: ValidationResult,
    pub status: QuotationStatus,
    pub confidence_score: u8,
    pub processing_notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::pipeline::{Pipeline, QuoteInput};

    use super::QuotationOutput;

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let catalog = Catalog::fixture();
        let pipeline = Pipeline::new(&catalog);
        let output = pipeline.process(&QuoteInput {
            text: "Isodec 100mm eps, 6 paneles de 6.5m, techo a dos aguas, luz de 5m".to_string(),
            mode_override: None,
            client: None,
        });

        let json = serde_json::to_string(&output).expect("serialize quotation");
        let decoded: QuotationOutput = serde_json::from_str(&json).expect("deserialize quotation");

        // Full structural equality: no lossy numeric coercion on decimals,
        // floats, or timestamps.
        assert_eq!(output, decoded);
    }
}
