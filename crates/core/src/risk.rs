//! Structural risk scoring.
//!
//! Four independently capped sub-scores summed into a total and mapped to a
//! risk level. The engine only classifies risk; it never blocks. Penalty
//! weights, caps and band boundaries are fixed domain constants and are not
//! derived from anything.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::request::{CoreMaterial, PanelFamily, PanelUsage, QuoteRequest, RoofTopology};

const R_DATA_CAP: u32 = 40;
const R_SPAN_CAP: u32 = 50;
const R_GEOMETRY_CAP: u32 = 15;
const R_SYSTEM_CAP: u32 = 15;

const LONG_PANEL_THRESHOLD_M: f64 = 12.0;
const THIN_PANEL_THRESHOLD_MM: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    FormalCertified,
    TechnicalConditioned,
    CommercialQuick,
    TechnicalBlock,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub points: u32,
    pub breakdown: Vec<String>,
}

impl SubScore {
    fn add(&mut self, points: u32, reason: impl Into<String>) {
        self.points += points;
        self.breakdown.push(format!("+{points} {}", reason.into()));
    }

    fn capped(mut self, cap: u32) -> Self {
        if self.points > cap {
            // Several simultaneous penalties collapse to the same ceiling;
            // this is the specified behavior, not an accident.
            self.breakdown.push(format!("capped at {cap} (raw {})", self.points));
            self.points = cap;
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub total: u32,
    pub level: RiskLevel,
    pub data: SubScore,
    pub span: SubScore,
    pub geometry: SubScore,
    pub system: SubScore,
    pub span_ratio: Option<f64>,
    pub alternative_thicknesses: Vec<u32>,
    pub recommendations: Vec<String>,
}

pub fn assess(request: &QuoteRequest, catalog: &Catalog) -> RiskResult {
    let data = data_score(request);
    let (span, span_ratio, alternative_thicknesses) = span_score(request, catalog);
    let geometry = geometry_score(request);
    let system = system_score(request);

    let total = data.points + span.points + geometry.points + system.points;
    let level = level_for(total);
    let recommendations =
        build_recommendations(request, &data, span_ratio, &alternative_thicknesses, level);

    RiskResult {
        total,
        level,
        data,
        span,
        geometry,
        system,
        span_ratio,
        alternative_thicknesses,
        recommendations,
    }
}

fn level_for(total: u32) -> RiskLevel {
    match total {
        0..=30 => RiskLevel::FormalCertified,
        31..=60 => RiskLevel::TechnicalConditioned,
        61..=85 => RiskLevel::CommercialQuick,
        _ => RiskLevel::TechnicalBlock,
    }
}

// Data completeness penalties read the parser's `incomplete_fields` audit
// trail, so an injected default does not hide that the user never gave the
// value.
fn data_score(request: &QuoteRequest) -> SubScore {
    let mut score = SubScore::default();

    if request.usage == Some(PanelUsage::Roof) && request.is_missing("span_m") {
        score.add(40, "span not provided for a roof install");
    }
    if request.is_missing("thickness_mm") {
        score.add(25, "thickness not provided");
    }
    if request.is_missing("structure") {
        score.add(15, "structure type not provided");
    }
    if request.is_missing("length_m")
        && request.is_missing("width_m")
        && request.is_missing("panel_count")
    {
        score.add(20, "no usable geometry (no length, width or panel count)");
    }
    if request.defers_to_drawing {
        score.add(25, "dimensions deferred to an external drawing");
    }

    score.capped(R_DATA_CAP)
}

fn span_score(request: &QuoteRequest, catalog: &Catalog) -> (SubScore, Option<f64>, Vec<u32>) {
    let mut score = SubScore::default();

    let (Some(family), Some(thickness), Some(span)) =
        (request.family, request.thickness_mm, request.span_m)
    else {
        score.breakdown.push("not evaluated: needs family, thickness and span".to_string());
        return (score, None, Vec::new());
    };

    let Some(capacity) = catalog.span_capacity(family, request.core, thickness) else {
        score
            .breakdown
            .push(format!("no span table entry for {}/{thickness}mm", family.as_str()));
        return (score, None, Vec::new());
    };

    let ratio = span / capacity.max_span_m;
    let points = span_band_points(ratio);
    if points > 0 {
        score.add(
            points,
            format!(
                "span {span:.2} m vs rated {:.2} m (ratio {ratio:.2})",
                capacity.max_span_m
            ),
        );
    } else {
        score
            .breakdown
            .push(format!("span {span:.2} m well within rated {:.2} m", capacity.max_span_m));
    }

    let alternatives = if ratio > 1.0 {
        catalog.thicker_alternatives(family, request.core, thickness, span)
    } else {
        Vec::new()
    };

    (score.capped(R_SPAN_CAP), Some(ratio), alternatives)
}

fn span_band_points(ratio: f64) -> u32 {
    if ratio <= 0.60 {
        0
    } else if ratio <= 0.75 {
        10
    } else if ratio <= 0.85 {
        20
    } else if ratio <= 1.0 {
        30
    } else {
        50
    }
}

fn geometry_score(request: &QuoteRequest) -> SubScore {
    let mut score = SubScore::default();

    match request.roof_topology {
        Some(RoofTopology::TwoWater) => score.add(5, "two-water roof"),
        Some(RoofTopology::FourWater) => score.add(8, "four-water roof"),
        Some(RoofTopology::Butterfly) => score.add(10, "butterfly roof"),
        Some(RoofTopology::OneWater) | None => {}
    }
    if request.longest_panel_m().is_some_and(|longest| longest > LONG_PANEL_THRESHOLD_M) {
        score.add(10, format!("panel longer than {LONG_PANEL_THRESHOLD_M:.0} m"));
    }
    if request.splice_mentioned {
        score.add(5, "mid-span splice mentioned");
    }

    score.capped(R_GEOMETRY_CAP)
}

fn system_score(request: &QuoteRequest) -> SubScore {
    let mut score = SubScore::default();

    // Wall installs carry no system risk by definition.
    if request.usage == Some(PanelUsage::Wall) {
        score.breakdown.push("wall install: system risk forced to 0".to_string());
        return score;
    }

    if request.usage == Some(PanelUsage::Roof)
        && matches!(request.family, Some(PanelFamily::Isowall) | Some(PanelFamily::Isofrig))
    {
        score.add(8, "non-roofing family used as roof");
    }
    match request.core {
        Some(CoreMaterial::Eps) => score.add(6, "EPS core on an exposed install"),
        Some(CoreMaterial::RockWool) => score.add(3, "rock wool core weight"),
        Some(CoreMaterial::Pur) | Some(CoreMaterial::Pir) | None => {}
    }
    if request.thickness_mm.is_some_and(|thickness| thickness <= THIN_PANEL_THRESHOLD_MM) {
        score.add(5, format!("thin panel (<= {THIN_PANEL_THRESHOLD_MM} mm)"));
    }

    score.capped(R_SYSTEM_CAP)
}

fn build_recommendations(
    request: &QuoteRequest,
    data: &SubScore,
    span_ratio: Option<f64>,
    alternatives: &[u32],
    level: RiskLevel,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if data.points > 0 {
        recommendations.push(format!(
            "confirm missing data with the client: {}",
            request.incomplete_fields.join(", ")
        ));
    }
    if let Some(ratio) = span_ratio {
        if ratio > 1.0 {
            if alternatives.is_empty() {
                recommendations.push(
                    "requested span exceeds panel capacity: add intermediate supports".to_string(),
                );
            } else {
                let listed = alternatives
                    .iter()
                    .map(|thickness| format!("{thickness}mm"))
                    .collect::<Vec<_>>()
                    .join(", ");
                recommendations.push(format!(
                    "requested span exceeds panel capacity: move to {listed} or add supports"
                ));
            }
        } else if ratio > 0.85 {
            recommendations
                .push("span close to rated limit: validate loads before formal offer".to_string());
        }
    }
    if level == RiskLevel::TechnicalBlock {
        recommendations.push("route to technical review before quoting".to_string());
    }

    recommendations
}
