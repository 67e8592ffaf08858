//! Text classification: request type and operating mode.
//!
//! Pure keyword-set counting over fixed commercial vocabulary; no side
//! effects and no failure mode. Garbage input classifies as an
//! informational request with low confidence.

use serde::{Deserialize, Serialize};

use crate::domain::request::{OperatingMode, RequestType};

const ROOF_KEYWORDS: &[&str] = &[
    "techo",
    "techos",
    "cubierta",
    "tejado",
    "techumbre",
    "galpon",
    "galpón",
    "roof",
];

const WALL_KEYWORDS: &[&str] = &[
    "pared",
    "paredes",
    "muro",
    "muros",
    "fachada",
    "cerramiento",
    "tabique",
    "division",
    "división",
    "wall",
];

const ACCESSORY_KEYWORDS: &[&str] = &[
    "accesorio",
    "accesorios",
    "cumbrera",
    "caballete",
    "botaguas",
    "canalon",
    "canalón",
    "sellador",
    "cinta butilica",
    "cinta butílica",
    "tornillos",
    "autoperforante",
    "autoperforantes",
    "flashing",
    "ridge cap",
    "sealant",
    "screws",
];

const UPDATE_KEYWORDS: &[&str] = &[
    "actualizar",
    "actualizacion",
    "actualización",
    "modificar",
    "corregir",
    "cambiar la cotizacion",
    "cambiar la cotización",
    "update",
    "revise quote",
];

const WATERPROOFING_KEYWORDS: &[&str] = &[
    "impermeabilizar",
    "impermeabilizacion",
    "impermeabilización",
    "membrana",
    "asfaltica",
    "asfáltica",
    "goteras",
    "filtracion",
    "filtración",
    "waterproof",
];

const CONVENTIONAL_SHEET_KEYWORDS: &[&str] = &[
    "calamina",
    "chapa",
    "zinc",
    "galvanizada",
    "ondulada",
    "fibrocemento",
    "corrugated sheet",
];

const POST_SALE_KEYWORDS: &[&str] = &[
    "garantia",
    "garantía",
    "reclamo",
    "falla",
    "defecto",
    "ya instalado",
    "postventa",
    "post-venta",
    "warranty",
    "claim",
];

const FORMAL_KEYWORDS: &[&str] = &[
    "cotizacion formal",
    "cotización formal",
    "oferta formal",
    "orden de compra",
    "licitacion",
    "licitación",
    "en firme",
    "contrato",
    "para factura",
    "purchase order",
    "formal quote",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub request_type: RequestType,
    pub mode: OperatingMode,
    pub has_roof: bool,
    pub has_wall: bool,
    pub has_accessories: bool,
    pub is_update: bool,
    pub confidence: f64,
    pub signals: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default)]
struct CategoryCounts {
    roof: usize,
    wall: usize,
    accessory: usize,
    update: usize,
    waterproofing: usize,
    conventional: usize,
    post_sale: usize,
    formal: usize,
}

impl CategoryCounts {
    fn total(&self) -> usize {
        self.roof
            + self.wall
            + self.accessory
            + self.update
            + self.waterproofing
            + self.conventional
            + self.post_sale
            + self.formal
    }
}

pub fn classify(text: &str, mode_override: Option<OperatingMode>) -> ClassificationResult {
    let normalized = text.to_lowercase();
    let mut signals = Vec::new();
    let counts = CategoryCounts {
        roof: count_matches(&normalized, "roof", ROOF_KEYWORDS, &mut signals),
        wall: count_matches(&normalized, "wall", WALL_KEYWORDS, &mut signals),
        accessory: count_matches(&normalized, "accessory", ACCESSORY_KEYWORDS, &mut signals),
        update: count_matches(&normalized, "update", UPDATE_KEYWORDS, &mut signals),
        waterproofing: count_matches(
            &normalized,
            "waterproofing",
            WATERPROOFING_KEYWORDS,
            &mut signals,
        ),
        conventional: count_matches(
            &normalized,
            "conventional_sheet",
            CONVENTIONAL_SHEET_KEYWORDS,
            &mut signals,
        ),
        post_sale: count_matches(&normalized, "post_sale", POST_SALE_KEYWORDS, &mut signals),
        formal: count_matches(&normalized, "formal", FORMAL_KEYWORDS, &mut signals),
    };

    let request_type = decide_request_type(&counts);
    let mode = decide_mode(&counts, request_type, mode_override);

    ClassificationResult {
        request_type,
        mode,
        has_roof: counts.roof > 0,
        has_wall: counts.wall > 0,
        has_accessories: counts.accessory > 0,
        is_update: counts.update > 0,
        confidence: score_confidence(&counts),
        signals,
    }
}

fn count_matches(
    normalized: &str,
    category: &str,
    keywords: &[&str],
    signals: &mut Vec<String>,
) -> usize {
    let mut count = 0;
    for keyword in keywords {
        if normalized.contains(keyword) {
            count += 1;
            signals.push(format!("{category}:{keyword}"));
        }
    }
    count
}

// Fixed priority order; the mixed override goes first because it subsumes
// the room-complete branch.
fn decide_request_type(counts: &CategoryCounts) -> RequestType {
    let has_roof = counts.roof > 0;
    let has_wall = counts.wall > 0;
    let has_accessories = counts.accessory > 0;

    if has_roof && has_wall && has_accessories {
        return RequestType::Mixed;
    }
    if counts.post_sale >= 2 {
        return RequestType::PostSale;
    }
    if counts.update > 0 {
        return RequestType::Update;
    }
    if counts.waterproofing >= 2 {
        return RequestType::Waterproofing;
    }
    if counts.conventional >= 2 && !has_roof && !has_wall {
        return RequestType::ConventionalSheet;
    }
    if has_roof && has_wall {
        return RequestType::RoomComplete;
    }
    if has_roof {
        return RequestType::RoofSystem;
    }
    if has_wall {
        return RequestType::WallSystem;
    }
    if has_accessories {
        return RequestType::AccessoriesOnly;
    }
    if counts.conventional >= 1 {
        return RequestType::ConventionalSheet;
    }
    RequestType::InfoOnly
}

fn decide_mode(
    counts: &CategoryCounts,
    request_type: RequestType,
    mode_override: Option<OperatingMode>,
) -> OperatingMode {
    if let Some(mode) = mode_override {
        return mode;
    }
    if counts.formal > 0 {
        return OperatingMode::Formal;
    }
    if matches!(request_type, RequestType::Update | RequestType::AccessoriesOnly) {
        return OperatingMode::PreCotizacion;
    }
    if counts.total() == 0 {
        return OperatingMode::Informativo;
    }
    OperatingMode::PreCotizacion
}

fn score_confidence(counts: &CategoryCounts) -> f64 {
    let total = counts.total();
    if total == 0 {
        return 0.2;
    }
    let scaled = 0.4 + 0.1 * total.min(5) as f64;
    scaled.min(0.9)
}

#[cfg(test)]
mod tests {
    use crate::domain::request::{OperatingMode, RequestType};

    use super::classify;

    #[test]
    fn roof_text_classifies_as_roof_system() {
        let result = classify("Necesito panel para techo de un galpón", None);
        assert_eq!(result.request_type, RequestType::RoofSystem);
        assert!(result.has_roof);
        assert!(!result.has_wall);
        assert_eq!(result.mode, OperatingMode::PreCotizacion);
    }

    #[test]
    fn wall_panel_batch_classifies_as_wall_system() {
        let result = classify("Pared con 13 paneles de 2.60 m", None);
        assert_eq!(result.request_type, RequestType::WallSystem);
        assert!(result.has_wall);
    }

    #[test]
    fn roof_and_wall_make_a_room_complete_request() {
        let result = classify("Cerramiento: techo y paredes para cuarto nuevo", None);
        assert_eq!(result.request_type, RequestType::RoomComplete);
    }

    #[test]
    fn roof_wall_and_accessories_override_to_mixed() {
        let result = classify("Techo, paredes y accesorios: cumbrera y botaguas", None);
        assert_eq!(result.request_type, RequestType::Mixed);
    }

    #[test]
    fn two_post_sale_signals_win_over_roof() {
        let result = classify("Reclamo por falla en el techo ya instalado", None);
        assert_eq!(result.request_type, RequestType::PostSale);
    }

    #[test]
    fn update_keyword_forces_pre_cotizacion() {
        let result = classify("Quiero actualizar la cotización del techo", None);
        assert_eq!(result.request_type, RequestType::Update);
        assert_eq!(result.mode, OperatingMode::PreCotizacion);
        assert!(result.is_update);
    }

    #[test]
    fn formal_keyword_switches_mode_to_formal() {
        let result = classify("Cotización formal para techo Isodec con orden de compra", None);
        assert_eq!(result.mode, OperatingMode::Formal);
    }

    #[test]
    fn explicit_override_beats_text_signals() {
        let result = classify(
            "Cotización formal para techo",
            Some(OperatingMode::PreCotizacion),
        );
        assert_eq!(result.mode, OperatingMode::PreCotizacion);
    }

    #[test]
    fn empty_text_is_info_only_informativo_with_low_confidence() {
        let result = classify("", None);
        assert_eq!(result.request_type, RequestType::InfoOnly);
        assert_eq!(result.mode, OperatingMode::Informativo);
        assert!(result.confidence < 0.3);
        assert!(result.signals.is_empty());
    }

    #[test]
    fn single_conventional_signal_is_the_sheet_fallback() {
        let result = classify("precio de calamina por plancha", None);
        assert_eq!(result.request_type, RequestType::ConventionalSheet);
    }

    #[test]
    fn two_waterproofing_signals_classify_as_waterproofing() {
        let result = classify("Tengo goteras, necesito impermeabilizar la losa", None);
        assert_eq!(result.request_type, RequestType::Waterproofing);
    }
}
