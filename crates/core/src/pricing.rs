//! Price lookup over the BOM.
//!
//! Every unit price comes from exactly one of the two reference tables:
//! panels by (family, core, thickness), accessories by SKU. Prices are
//! tax-inclusive by contract; nothing here derives cost-plus-margin or adds
//! tax on top. A price the tables cannot answer goes to `missing_prices`
//! and is never zero-filled.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::bom::{BomItemKind, BomResult};
use crate::catalog::{Catalog, Unit};
use crate::domain::request::QuoteRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategory {
    Panels,
    Accessories,
    Fixings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    PanelTable,
    AccessoryTable,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricedItem {
    pub category: PriceCategory,
    pub kind: BomItemKind,
    pub sku: Option<String>,
    pub name: String,
    pub quantity: Decimal,
    pub unit: Unit,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub source: PriceSource,
    pub tax_inclusive: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub items: Vec<PricedItem>,
    pub subtotal_panels: Decimal,
    pub subtotal_accessories: Decimal,
    pub subtotal_fixings: Decimal,
    pub total: Decimal,
    pub missing_prices: Vec<String>,
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn price(bom: &BomResult, request: &QuoteRequest, catalog: &Catalog) -> PricingResult {
    let mut result = PricingResult::default();

    for item in &bom.items {
        match item.kind {
            BomItemKind::Panel => price_panel(&mut result, item, request, catalog),
            _ => price_accessory(&mut result, item, catalog),
        }
    }

    result.total = round_money(
        result.subtotal_panels + result.subtotal_accessories + result.subtotal_fixings,
    );
    result
}

fn price_panel(
    result: &mut PricingResult,
    item: &crate::bom::BomItem,
    request: &QuoteRequest,
    catalog: &Catalog,
) {
    let resolved = match (request.family, request.core, request.thickness_mm) {
        (Some(family), Some(core), Some(thickness)) => {
            catalog.panel_price_m2(family, core, thickness)
        }
        _ => None,
    };
    let Some(price_m2) = resolved else {
        result.missing_prices.push(format!("panel {}", item.reference));
        return;
    };

    let subtotal = round_money(price_m2 * item.quantity);
    result.subtotal_panels += subtotal;
    result.items.push(PricedItem {
        category: PriceCategory::Panels,
        kind: item.kind,
        sku: None,
        name: item.name.clone().unwrap_or_else(|| item.reference.clone()),
        quantity: item.quantity,
        unit: item.unit,
        unit_price: price_m2,
        subtotal,
        source: PriceSource::PanelTable,
        tax_inclusive: true,
    });
}

fn price_accessory(result: &mut PricingResult, item: &crate::bom::BomItem, catalog: &Catalog) {
    let Some(sku) = item.sku.as_deref() else {
        result.missing_prices.push(format!("accessory {} (no SKU)", item.reference));
        return;
    };
    let Some(price) = catalog.accessory_price(sku) else {
        result.missing_prices.push(format!("accessory {sku}"));
        return;
    };

    let category = if item.kind == BomItemKind::Fastener {
        PriceCategory::Fixings
    } else {
        PriceCategory::Accessories
    };
    let subtotal = round_money(price.unit_price * item.quantity);
    match category {
        PriceCategory::Fixings => result.subtotal_fixings += subtotal,
        _ => result.subtotal_accessories += subtotal,
    }

    result.items.push(PricedItem {
        category,
        kind: item.kind,
        sku: Some(sku.to_string()),
        name: price.name.clone(),
        quantity: item.quantity,
        unit: price.unit,
        unit_price: price.unit_price,
        subtotal,
        source: PriceSource::AccessoryTable,
        tax_inclusive: price.tax_inclusive,
    });
}
