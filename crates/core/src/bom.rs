//! Bill-of-materials derivation.
//!
//! A pure function from the structured request and the catalog to an
//! itemized component list. Quantities are always computed, even when a SKU
//! cannot be resolved; unresolved accessories become line items with a null
//! SKU and a warning so the commercial team sees the gap instead of a
//! silently shorter list.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{AccessoryRun, AccessoryType, Catalog, Unit};
use crate::domain::request::{PanelUsage, QuoteRequest};
use crate::parse::MAX_PANEL_COUNT;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BomItemKind {
    Panel,
    DripEdge,
    RidgeCap,
    Sealant,
    ButylTape,
    Fastener,
}

impl From<AccessoryType> for BomItemKind {
    fn from(accessory_type: AccessoryType) -> Self {
        match accessory_type {
            AccessoryType::DripEdge => Self::DripEdge,
            AccessoryType::RidgeCap => Self::RidgeCap,
            AccessoryType::Sealant => Self::Sealant,
            AccessoryType::ButylTape => Self::ButylTape,
            AccessoryType::Fastener => Self::Fastener,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
    pub kind: BomItemKind,
    pub reference: String,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub quantity: Decimal,
    pub unit: Unit,
    pub formula: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BomResult {
    pub system_key: Option<String>,
    pub area_m2: f64,
    pub panel_count: u32,
    pub supports_per_panel: u32,
    pub fixation_points: u32,
    pub items: Vec<BomItem>,
    pub warnings: Vec<String>,
}

fn quantity_from(value: f64) -> Decimal {
    // Geometry values are bounded and finite here; a failed conversion can
    // only come from a NaN, which zero-quantity makes visible downstream.
    Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO).round_dp(2)
}

pub fn build(request: &QuoteRequest, catalog: &Catalog) -> BomResult {
    let mut result = BomResult::default();

    let (Some(family), Some(usage)) = (request.family, request.usage) else {
        result
            .warnings
            .push("cannot derive BOM without a product family and usage".to_string());
        return result;
    };

    let defaults = catalog.defaults();
    let usable_width = match catalog.system(family, usage) {
        Some(system) => {
            result.system_key = Some(system.key.clone());
            system.usable_width_m
        }
        None => {
            result.warnings.push(format!(
                "no system mapping for {}/{usage:?}; using standard panel width",
                family.as_str()
            ));
            defaults.usable_width_m
        }
    };

    // Geometry resolution: per-panel lengths dominate, then explicit
    // dimensions, then panel count alone.
    let panel_count = request
        .panel_count
        .or_else(|| {
            request.width_m.map(|width| (width / usable_width).ceil().max(1.0) as u32)
        })
        .unwrap_or(0);
    if panel_count == 0 {
        result.warnings.push("no usable geometry: BOM limited to zero quantities".to_string());
        return result;
    }
    // Width is free text; a nonsense figure must not blow up quantity math.
    let panel_count = if panel_count > MAX_PANEL_COUNT {
        result.warnings.push(format!(
            "derived panel count {panel_count} is implausible; clamped to {MAX_PANEL_COUNT}"
        ));
        MAX_PANEL_COUNT
    } else {
        panel_count
    };
    result.panel_count = panel_count;

    let panel_length = request.longest_panel_m().unwrap_or(0.0);
    let width = request.width_m.unwrap_or(f64::from(panel_count) * usable_width);
    let covered_length: f64 = if request.panel_lengths_m.is_empty() {
        panel_length * f64::from(panel_count)
    } else {
        request.panel_lengths_m.iter().sum()
    };
    result.area_m2 = covered_length * usable_width;

    // Support spacing from the span table, conservatively 3 m when the
    // gauge has no rated entry.
    let max_span = match request
        .thickness_mm
        .and_then(|thickness| catalog.span_capacity(family, request.core, thickness))
    {
        Some(capacity) => capacity.max_span_m,
        None => {
            result.warnings.push(format!(
                "no span capacity entry for {}; assuming conservative {:.1} m support spacing",
                family.as_str(),
                defaults.fallback_max_span_m
            ));
            defaults.fallback_max_span_m
        }
    };
    let supports_per_panel = ((panel_length / max_span).ceil() as u32).saturating_add(1).max(2);
    result.supports_per_panel = supports_per_panel;

    let perimeter = 2.0 * (panel_length + width);
    let mut fixation_points = panel_count
        .saturating_mul(supports_per_panel)
        .saturating_mul(defaults.fasteners_per_crossing);
    if usage == PanelUsage::Roof {
        // Roofs get an extra edge-fastener row proportional to perimeter.
        fixation_points = fixation_points
            .saturating_add((perimeter * defaults.edge_fasteners_per_m).ceil() as u32);
    }
    result.fixation_points = fixation_points;

    push_panel_item(&mut result, request, covered_length, usable_width);

    if request.include_accessories {
        push_accessory_items(&mut result, request, catalog, usage, perimeter, width);
    }
    if request.include_fixings {
        push_fastener_item(&mut result, request, catalog, fixation_points);
    }

    result
}

fn push_panel_item(
    result: &mut BomResult,
    request: &QuoteRequest,
    covered_length: f64,
    usable_width: f64,
) {
    // family/usage checked by the caller before any item is pushed.
    let family = match request.family {
        Some(family) => family,
        None => return,
    };
    let reference = match (request.core, request.thickness_mm) {
        (Some(core), Some(thickness)) => {
            format!("{}/{}/{}", family.as_str(), core.as_str(), thickness)
        }
        (None, Some(thickness)) => format!("{}/{}", family.as_str(), thickness),
        _ => family.as_str().to_string(),
    };

    result.items.push(BomItem {
        kind: BomItemKind::Panel,
        reference,
        sku: None,
        name: Some(format!(
            "{} panel{}",
            family.as_str(),
            request
                .thickness_mm
                .map(|thickness| format!(" {thickness}mm"))
                .unwrap_or_default()
        )),
        quantity: quantity_from(result.area_m2),
        unit: Unit::SquareMeters,
        formula: format!(
            "{} panels x {covered_length:.2} m covered x {usable_width:.2} m usable width",
            result.panel_count
        ),
        notes: None,
    });
}

fn push_accessory_items(
    result: &mut BomResult,
    request: &QuoteRequest,
    catalog: &Catalog,
    usage: PanelUsage,
    perimeter: f64,
    width: f64,
) {
    for rule in catalog.accessory_rules() {
        let run_length = match rule.run {
            AccessoryRun::Perimeter => perimeter,
            AccessoryRun::Eaves => {
                if usage != PanelUsage::Roof {
                    continue;
                }
                2.0 * width
            }
            AccessoryRun::Ridge => {
                if usage != PanelUsage::Roof {
                    continue;
                }
                // Missing topology still gets a ridge: the common build is
                // two-water, and omitting the line loses the sale item.
                if request.roof_topology.is_some_and(|topology| !topology.has_ridge()) {
                    continue;
                }
                width
            }
        };
        if run_length <= 0.0 {
            continue;
        }

        let resolved = catalog.resolve_accessory_sku(
            rule.accessory_type,
            request.family,
            request.thickness_mm,
        );
        if resolved.is_none() {
            result.warnings.push(format!(
                "no SKU resolved for {}; line kept with quantity only",
                rule.accessory_type.as_str()
            ));
        }

        // Metered accessories are sold by the running meter; everything else
        // ships in fixed lengths, so quantities round up to whole pieces.
        let priced_unit = resolved
            .and_then(|def| catalog.accessory_price(&def.sku))
            .map(|price| price.unit);
        let (quantity, unit, formula) = if priced_unit == Some(Unit::LinearMeters) {
            (
                quantity_from(run_length),
                Unit::LinearMeters,
                format!("{run_length:.2} m run, sold per meter"),
            )
        } else {
            (
                quantity_from((run_length / rule.unit_length_m).ceil()),
                Unit::Pieces,
                format!("ceil({run_length:.2} m run / {:.1} m per piece)", rule.unit_length_m),
            )
        };

        result.items.push(BomItem {
            kind: rule.accessory_type.into(),
            reference: rule.accessory_type.as_str().to_string(),
            sku: resolved.map(|def| def.sku.clone()),
            name: resolved.map(|def| def.name.clone()),
            quantity,
            unit,
            formula,
            notes: None,
        });
    }
}

fn push_fastener_item(
    result: &mut BomResult,
    request: &QuoteRequest,
    catalog: &Catalog,
    fixation_points: u32,
) {
    let resolved =
        catalog.resolve_accessory_sku(AccessoryType::Fastener, request.family, request.thickness_mm);
    if resolved.is_none() {
        result
            .warnings
            .push("no SKU resolved for fastener; line kept with quantity only".to_string());
    }

    result.items.push(BomItem {
        kind: BomItemKind::Fastener,
        reference: AccessoryType::Fastener.as_str().to_string(),
        sku: resolved.map(|def| def.sku.clone()),
        name: resolved.map(|def| def.name.clone()),
        quantity: Decimal::from(fixation_points),
        unit: Unit::Pieces,
        formula: format!(
            "{} panels x {} supports x fasteners per crossing, plus roof edge rows",
            result.panel_count, result.supports_per_panel
        ),
        notes: None,
    });
}
