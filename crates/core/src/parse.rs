//! Structured extraction from free-form request text.
//!
//! Pattern matching only, no judgement: every field the text does not
//! provide is recorded in `incomplete_fields`. The function is total; empty
//! or garbage input yields an empty request with every field marked
//! incomplete.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::request::{
    ClientInfo, CoreMaterial, PanelFamily, PanelUsage, QuoteRequest, RoofTopology, StructureType,
    TaxMode,
};

/// Values parsed with a `cm` unit at or below this threshold are treated as
/// centimeters and converted; larger values are assumed to be mistyped
/// millimeters ("100cm panel" almost always means 100 mm).
const CM_AS_MM_THRESHOLD: f64 = 30.0;

/// Upper bound on panel quantities taken from text. Larger figures are
/// typos or nonsense, not orders; they are left unparsed so the
/// incompleteness audit flags the count instead of materializing it.
pub(crate) const MAX_PANEL_COUNT: u32 = 5_000;

const ACCESSORY_MENTION_KEYWORDS: &[&str] = &[
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
];

fn cached(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|error| panic!("static pattern must compile: {error}"))
    })
}

fn thickness_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(\d+(?:[.,]\d+)?)\s*(mm|cm)\b")
}

fn panel_batch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(\d+)\s*(?:paneles|panels|panel|piezas|pzas|unidades)?\s*(?:de|of)\s*(\d+(?:[.,]\d+)?)\s*m\b",
    )
}

fn dimensions_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"(\d+(?:[.,]\d+)?)\s*[x×]\s*(\d+(?:[.,]\d+)?)\s*(?:m\b|mts|metros)")
}

fn length_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(?:largo|longitud|length)\s*(?:de\s*)?(\d+(?:[.,]\d+)?)\s*m\b|(\d+(?:[.,]\d+)?)\s*m(?:etros)?\s+de\s+largo",
    )
}

fn width_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(?:ancho|width)\s*(?:de\s*)?(\d+(?:[.,]\d+)?)\s*m\b|(\d+(?:[.,]\d+)?)\s*m(?:etros)?\s+de\s+ancho",
    )
}

fn height_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(?:alto|altura|height)\s*(?:de\s*)?(\d+(?:[.,]\d+)?)\s*m\b|(\d+(?:[.,]\d+)?)\s*m(?:etros)?\s+de\s+alt(?:o|ura)",
    )
}

fn span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(
        &RE,
        r"(?:luz|claro|span)\s*(?:de\s*|of\s*)?(\d+(?:[.,]\d+)?)\s*m\b|apoyos\s+cada\s+(\d+(?:[.,]\d+)?)\s*m\b|supports?\s+every\s+(\d+(?:[.,]\d+)?)\s*m\b",
    )
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\b09\d{8}\b|\+\d{10,13}\b")
}

fn core_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"\b(eps|poliestireno|plumavit|pir|pur|poliuretano|lana de roca|rockwool)\b")
}

pub fn parse(text: &str, client: Option<ClientInfo>) -> QuoteRequest {
    let normalized = text.to_lowercase();
    let mut request = QuoteRequest {
        client: client.unwrap_or_default(),
        include_accessories: true,
        include_fixings: true,
        ..QuoteRequest::default()
    };

    extract_family(&normalized, &mut request);
    extract_core(&normalized, &mut request);
    extract_thickness(&normalized, &mut request);
    extract_usage(&normalized, &mut request);
    extract_structure(&normalized, &mut request);
    extract_topology(&normalized, &mut request);
    extract_panel_batches(&normalized, &mut request);
    extract_dimensions(&normalized, &mut request);
    extract_span(&normalized, &mut request);
    extract_flags(&normalized, &mut request);
    extract_accessory_mentions(&normalized, &mut request);
    extract_phone(&normalized, &mut request);
    apply_sub_family_default(&mut request);
    record_incomplete_fields(&mut request);

    request
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse::<f64>().ok()
}

fn extract_family(normalized: &str, request: &mut QuoteRequest) {
    request.family = if normalized.contains("isodec") {
        Some(PanelFamily::Isodec)
    } else if normalized.contains("isowall") {
        Some(PanelFamily::Isowall)
    } else if normalized.contains("isofrig") {
        Some(PanelFamily::Isofrig)
    } else {
        None
    };
}

fn extract_core(normalized: &str, request: &mut QuoteRequest) {
    let Some(capture) = core_re().captures(normalized) else {
        return;
    };
    request.core = match &capture[1] {
        "eps" | "poliestireno" | "plumavit" => Some(CoreMaterial::Eps),
        "pir" => Some(CoreMaterial::Pir),
        "pur" | "poliuretano" => Some(CoreMaterial::Pur),
        "lana de roca" | "rockwool" => Some(CoreMaterial::RockWool),
        _ => None,
    };
}

fn extract_thickness(normalized: &str, request: &mut QuoteRequest) {
    let Some(capture) = thickness_re().captures(normalized) else {
        return;
    };
    let Some(value) = parse_number(&capture[1]) else {
        return;
    };
    let millimeters = match &capture[2] {
        "cm" if value <= CM_AS_MM_THRESHOLD => value * 10.0,
        _ => value,
    };
    if millimeters > 0.0 {
        request.thickness_mm = Some(millimeters.round() as u32);
    }
}

fn extract_usage(normalized: &str, request: &mut QuoteRequest) {
    let roof = ["techo", "cubierta", "tejado", "roof"]
        .iter()
        .any(|keyword| normalized.contains(keyword));
    let wall = ["pared", "muro", "fachada", "cerramiento", "wall"]
        .iter()
        .any(|keyword| normalized.contains(keyword));
    let chamber = ["camara", "cámara", "frigorif", "cold room"]
        .iter()
        .any(|keyword| normalized.contains(keyword));

    // Room-style requests carry both; the classifier handles that split.
    // The parser keeps the dominant usage for sizing: roof wins over wall.
    request.usage = if roof {
        Some(PanelUsage::Roof)
    } else if chamber {
        Some(PanelUsage::Chamber)
    } else if wall {
        Some(PanelUsage::Wall)
    } else {
        None
    };
}

fn extract_structure(normalized: &str, request: &mut QuoteRequest) {
    let concrete = ["hormigon", "hormigón", "concreto", "concrete", "losa"];
    let metal = ["metalica", "metálica", "estructura metal", "acero", "steel", "correas"];
    let wood = ["madera", "wood"];

    request.structure = if concrete.iter().any(|keyword| normalized.contains(keyword)) {
        Some(StructureType::Concrete)
    } else if metal.iter().any(|keyword| normalized.contains(keyword)) {
        Some(StructureType::Metal)
    } else if wood.iter().any(|keyword| normalized.contains(keyword)) {
        Some(StructureType::Wood)
    } else {
        None
    };
}

fn extract_topology(normalized: &str, request: &mut QuoteRequest) {
    let one = ["un agua", "una agua", "1 agua", "one water", "monopitch"];
    let two = ["dos aguas", "2 aguas", "two water", "gable"];
    let four = ["cuatro aguas", "4 aguas", "four water", "hip roof"];
    let butterfly = ["mariposa", "butterfly"];

    request.roof_topology = if two.iter().any(|keyword| normalized.contains(keyword)) {
        Some(RoofTopology::TwoWater)
    } else if four.iter().any(|keyword| normalized.contains(keyword)) {
        Some(RoofTopology::FourWater)
    } else if butterfly.iter().any(|keyword| normalized.contains(keyword)) {
        Some(RoofTopology::Butterfly)
    } else if one.iter().any(|keyword| normalized.contains(keyword)) {
        Some(RoofTopology::OneWater)
    } else {
        None
    };
}

fn extract_panel_batches(normalized: &str, request: &mut QuoteRequest) {
    let mut total_count: u32 = 0;
    for capture in panel_batch_re().captures_iter(normalized) {
        let Some(count) = capture[1].parse::<u32>().ok().filter(|count| *count > 0) else {
            continue;
        };
        let Some(length) = parse_number(&capture[2]).filter(|length| *length > 0.0) else {
            continue;
        };
        if count > MAX_PANEL_COUNT || total_count.saturating_add(count) > MAX_PANEL_COUNT {
            continue;
        }
        total_count += count;
        request.panel_lengths_m.extend(std::iter::repeat(length).take(count as usize));
    }
    if total_count > 0 {
        request.panel_count = Some(total_count);
    }
}

fn extract_dimensions(normalized: &str, request: &mut QuoteRequest) {
    if let Some(capture) = dimensions_re().captures(normalized) {
        let width = parse_number(&capture[1]);
        let length = parse_number(&capture[2]);
        if let (Some(width), Some(length)) = (width, length) {
            if width > 0.0 && length > 0.0 {
                request.width_m = Some(width);
                request.length_m = Some(length);
            }
        }
    }

    if request.length_m.is_none() {
        if let Some(capture) = length_re().captures(normalized) {
            request.length_m = first_group(&capture).filter(|value| *value > 0.0);
        }
    }
    if request.width_m.is_none() {
        if let Some(capture) = width_re().captures(normalized) {
            request.width_m = first_group(&capture).filter(|value| *value > 0.0);
        }
    }
    if let Some(capture) = height_re().captures(normalized) {
        request.height_m = first_group(&capture).filter(|value| *value > 0.0);
    }

    // A uniform panel batch doubles as the length dimension.
    if request.length_m.is_none() && !request.panel_lengths_m.is_empty() {
        let first = request.panel_lengths_m[0];
        let uniform = request
            .panel_lengths_m
            .iter()
            .all(|length| (length - first).abs() < f64::EPSILON);
        if uniform {
            request.length_m = Some(first);
        }
    }
}

fn first_group(capture: &regex::Captures<'_>) -> Option<f64> {
    (1..capture.len())
        .filter_map(|index| capture.get(index))
        .find_map(|group| parse_number(group.as_str()))
}

fn extract_span(normalized: &str, request: &mut QuoteRequest) {
    if let Some(capture) = span_re().captures(normalized) {
        request.span_m = first_group(&capture).filter(|value| *value > 0.0);
    }
}

fn extract_flags(normalized: &str, request: &mut QuoteRequest) {
    let shipping = ["envio", "envío", "flete", "entrega en", "transporte", "shipping", "delivery"];
    request.include_shipping = shipping.iter().any(|keyword| normalized.contains(keyword));

    let no_accessories = ["sin accesorios", "solo panel", "solo paneles", "panels only"];
    if no_accessories.iter().any(|keyword| normalized.contains(keyword)) {
        request.include_accessories = false;
    }
    let no_fixings = ["sin tornilleria", "sin tornillería", "sin fijaciones", "no screws"];
    if no_fixings.iter().any(|keyword| normalized.contains(keyword)) {
        request.include_fixings = false;
    }

    let tax_exclusive = ["sin iva", "mas iva", "más iva", "+ iva", "plus tax"];
    if tax_exclusive.iter().any(|keyword| normalized.contains(keyword)) {
        request.tax_mode = TaxMode::Exclusive;
    }

    let drawing = ["segun plano", "según plano", "adjunto plano", "ver plano", "blueprint"];
    request.defers_to_drawing = drawing.iter().any(|keyword| normalized.contains(keyword));

    let splice = ["empalme", "traslape", "splice", "union intermedia", "unión intermedia"];
    request.splice_mentioned = splice.iter().any(|keyword| normalized.contains(keyword));
}

fn extract_accessory_mentions(normalized: &str, request: &mut QuoteRequest) {
    for keyword in ACCESSORY_MENTION_KEYWORDS {
        if normalized.contains(keyword) {
            request.accessory_mentions.push((*keyword).to_string());
        }
    }
}

fn extract_phone(normalized: &str, request: &mut QuoteRequest) {
    if request.client.phone.is_some() {
        return;
    }
    if let Some(found) = phone_re().find(normalized) {
        request.client.phone = Some(found.as_str().to_string());
    }
}

// Sub-family is never extracted from text directly; when the family is known
// and no explicit variant was named, the commercial default applies and is
// logged as an assumption.
fn apply_sub_family_default(request: &mut QuoteRequest) {
    if request.sub_family.is_some() {
        return;
    }
    let Some(family) = request.family else {
        return;
    };
    let default = match family {
        PanelFamily::Isodec => "isodec clasico",
        PanelFamily::Isowall => "isowall liso",
        PanelFamily::Isofrig => "isofrig camara",
    };
    request.sub_family = Some(default.to_string());
    request
        .assumptions_used
        .push(format!("sub_family defaulted to '{default}' for family {}", family.as_str()));
}

fn record_incomplete_fields(request: &mut QuoteRequest) {
    let mut missing = Vec::new();
    if request.family.is_none() {
        missing.push("family");
    }
    if request.core.is_none() {
        missing.push("core");
    }
    if request.thickness_mm.is_none() {
        missing.push("thickness_mm");
    }
    if request.usage.is_none() {
        missing.push("usage");
    }
    if request.structure.is_none() {
        missing.push("structure");
    }
    if request.span_m.is_none() {
        missing.push("span_m");
    }
    if request.length_m.is_none() && request.panel_lengths_m.is_empty() {
        missing.push("length_m");
    }
    if request.width_m.is_none() {
        missing.push("width_m");
    }
    if request.panel_count.is_none() {
        missing.push("panel_count");
    }
    request.incomplete_fields = missing.into_iter().map(str::to_string).collect();
}
