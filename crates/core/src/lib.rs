pub mod bom;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod defaults;
pub mod domain;
pub mod errors;
pub mod parse;
pub mod pipeline;
pub mod pricing;
pub mod risk;
pub mod validate;

pub use bom::{BomItem, BomItemKind, BomResult};
pub use catalog::{
    AccessoryRule, AccessoryRun, AccessoryType, Catalog, CatalogPaths, CatalogStore, SpanCapacity,
    Unit,
};
pub use classify::ClassificationResult;
pub use domain::quotation::{QuotationId, QuotationOutput, QuotationStatus};
pub use domain::request::{
    ClientInfo, CoreMaterial, OperatingMode, PanelFamily, PanelUsage, QuoteRequest, RequestType,
    RoofTopology, StructureType, TaxMode,
};
pub use errors::CatalogError;
pub use pipeline::{Pipeline, QuoteInput};
pub use pricing::{PriceCategory, PriceSource, PricedItem, PricingResult};
pub use risk::{RiskLevel, RiskResult, SubScore};
pub use validate::{AutoportanciaStatus, Issue, Layer, Severity, ValidationResult};
