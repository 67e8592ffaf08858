//! Reference-data context for the quotation pipeline.
//!
//! A [`Catalog`] is built once at startup from three TOML documents (span
//! table, price table, defaults) and passed by reference into every pipeline
//! call. All lookup maps are built eagerly at load time with typed keys;
//! nothing scans raw tables at request time.

mod store;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::request::{CoreMaterial, PanelFamily, PanelUsage, StructureType};
use crate::errors::CatalogError;

pub use store::CatalogStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryType {
    DripEdge,
    RidgeCap,
    Sealant,
    ButylTape,
    Fastener,
}

impl AccessoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DripEdge => "drip_edge",
            Self::RidgeCap => "ridge_cap",
            Self::Sealant => "sealant",
            Self::ButylTape => "butyl_tape",
            Self::Fastener => "fastener",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    SquareMeters,
    LinearMeters,
    Pieces,
}

/// Length basis an accessory quantity is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryRun {
    Perimeter,
    Eaves,
    Ridge,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpanCapacity {
    pub max_span_m: f64,
    pub weight_kg_m2: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AccessoryRule {
    pub accessory_type: AccessoryType,
    pub run: AccessoryRun,
    pub unit_length_m: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccessoryPrice {
    pub name: String,
    pub unit: Unit,
    pub unit_price: Decimal,
    pub tax_inclusive: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccessorySkuDef {
    pub sku: String,
    pub name: String,
    pub family: Option<PanelFamily>,
    pub thickness_mm: Option<u32>,
}

/// Installed system resolved from (family, usage), width inherited from the
/// parent entry when the child does not override it.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemSpec {
    pub key: String,
    pub usable_width_m: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Defaults {
    pub default_span_m: f64,
    pub usable_width_m: f64,
    pub fallback_max_span_m: f64,
    pub fasteners_per_crossing: u32,
    pub edge_fasteners_per_m: f64,
    pub roof_structure: StructureType,
    pub wall_structure: StructureType,
    pub chamber_structure: StructureType,
}

impl Defaults {
    pub fn structure_for(&self, usage: PanelUsage) -> StructureType {
        match usage {
            PanelUsage::Roof => self.roof_structure,
            PanelUsage::Wall => self.wall_structure,
            PanelUsage::Chamber => self.chamber_structure,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CatalogPaths {
    pub span_table: PathBuf,
    pub price_table: PathBuf,
    pub defaults: PathBuf,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    span_index: HashMap<(PanelFamily, CoreMaterial, u32), SpanCapacity>,
    // Conservative (smallest max_span) entry per (family, thickness), used
    // when the request never named a core material.
    span_by_family_thickness: HashMap<(PanelFamily, u32), SpanCapacity>,
    span_gauges: HashMap<(PanelFamily, CoreMaterial), Vec<(u32, f64)>>,
    panel_prices: HashMap<(PanelFamily, CoreMaterial, u32), Decimal>,
    accessory_prices: HashMap<String, AccessoryPrice>,
    accessory_skus: HashMap<AccessoryType, Vec<AccessorySkuDef>>,
    systems: HashMap<(PanelFamily, PanelUsage), SystemSpec>,
    accessory_rules: Vec<AccessoryRule>,
    defaults: Defaults,
}

impl Catalog {
    pub fn load(paths: &CatalogPaths) -> Result<Self, CatalogError> {
        let span_doc: SpanTableDoc = read_toml(&paths.span_table)?;
        let price_doc: PriceTableDoc = read_toml(&paths.price_table)?;
        let defaults_doc: DefaultsDoc = read_toml(&paths.defaults)?;
        Self::from_documents(span_doc, price_doc, defaults_doc)
    }

    fn from_documents(
        span_doc: SpanTableDoc,
        price_doc: PriceTableDoc,
        defaults_doc: DefaultsDoc,
    ) -> Result<Self, CatalogError> {
        if span_doc.entries.is_empty() {
            return Err(CatalogError::EmptyTable("span_table"));
        }
        if price_doc.panels.is_empty() {
            return Err(CatalogError::EmptyTable("price_table.panels"));
        }

        let mut span_index = HashMap::new();
        let mut span_by_family_thickness: HashMap<(PanelFamily, u32), SpanCapacity> =
            HashMap::new();
        let mut span_gauges: HashMap<(PanelFamily, CoreMaterial), Vec<(u32, f64)>> =
            HashMap::new();
        for entry in span_doc.entries {
            let key = (entry.family, entry.core, entry.thickness_mm);
            let capacity =
                SpanCapacity { max_span_m: entry.max_span_m, weight_kg_m2: entry.weight_kg_m2 };
            if span_index.insert(key, capacity).is_some() {
                return Err(CatalogError::DuplicateKey {
                    table: "span_table",
                    key: format!(
                        "{}/{}/{}",
                        entry.family.as_str(),
                        entry.core.as_str(),
                        entry.thickness_mm
                    ),
                });
            }
            span_by_family_thickness
                .entry((entry.family, entry.thickness_mm))
                .and_modify(|current| {
                    if capacity.max_span_m < current.max_span_m {
                        *current = capacity;
                    }
                })
                .or_insert(capacity);
            span_gauges
                .entry((entry.family, entry.core))
                .or_default()
                .push((entry.thickness_mm, entry.max_span_m));
        }
        for gauges in span_gauges.values_mut() {
            gauges.sort_by_key(|(thickness, _)| *thickness);
        }

        let mut panel_prices = HashMap::new();
        for entry in price_doc.panels {
            let key = (entry.family, entry.core, entry.thickness_mm);
            if panel_prices.insert(key, entry.price_m2).is_some() {
                return Err(CatalogError::DuplicateKey {
                    table: "price_table.panels",
                    key: format!(
                        "{}/{}/{}",
                        entry.family.as_str(),
                        entry.core.as_str(),
                        entry.thickness_mm
                    ),
                });
            }
        }

        let mut accessory_prices = HashMap::new();
        let mut accessory_skus: HashMap<AccessoryType, Vec<AccessorySkuDef>> = HashMap::new();
        for entry in price_doc.accessories {
            if accessory_prices
                .insert(
                    entry.sku.clone(),
                    AccessoryPrice {
                        name: entry.name.clone(),
                        unit: entry.unit,
                        unit_price: entry.unit_price,
                        tax_inclusive: true,
                    },
                )
                .is_some()
            {
                return Err(CatalogError::DuplicateKey {
                    table: "price_table.accessories",
                    key: entry.sku,
                });
            }
            accessory_skus.entry(entry.accessory_type).or_default().push(AccessorySkuDef {
                sku: entry.sku,
                name: entry.name,
                family: entry.family,
                thickness_mm: entry.thickness_mm,
            });
        }

        let mut systems = HashMap::new();
        let raw_by_key: HashMap<&str, &SystemRaw> =
            defaults_doc.systems.iter().map(|raw| (raw.key.as_str(), raw)).collect();
        for raw in &defaults_doc.systems {
            let inherited = raw
                .usable_width_m
                .or_else(|| {
                    raw.parent
                        .as_deref()
                        .and_then(|parent| raw_by_key.get(parent))
                        .and_then(|parent| parent.usable_width_m)
                })
                .unwrap_or(defaults_doc.usable_width_m);
            let previous = systems.insert(
                (raw.family, raw.usage),
                SystemSpec { key: raw.key.clone(), usable_width_m: inherited },
            );
            if previous.is_some() {
                return Err(CatalogError::DuplicateKey {
                    table: "defaults.systems",
                    key: raw.key.clone(),
                });
            }
        }
        if systems.is_empty() {
            return Err(CatalogError::MissingDefault("systems"));
        }
        if defaults_doc.accessory_rules.is_empty() {
            return Err(CatalogError::MissingDefault("accessory_rules"));
        }

        Ok(Self {
            span_index,
            span_by_family_thickness,
            span_gauges,
            panel_prices,
            accessory_prices,
            accessory_skus,
            systems,
            accessory_rules: defaults_doc.accessory_rules,
            defaults: Defaults {
                default_span_m: defaults_doc.default_span_m,
                usable_width_m: defaults_doc.usable_width_m,
                fallback_max_span_m: defaults_doc.fallback_max_span_m,
                fasteners_per_crossing: defaults_doc.fasteners_per_crossing,
                edge_fasteners_per_m: defaults_doc.edge_fasteners_per_m,
                roof_structure: defaults_doc.structure_defaults.roof,
                wall_structure: defaults_doc.structure_defaults.wall,
                chamber_structure: defaults_doc.structure_defaults.chamber,
            },
        })
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn accessory_rules(&self) -> &[AccessoryRule] {
        &self.accessory_rules
    }

    pub fn span_capacity(
        &self,
        family: PanelFamily,
        core: Option<CoreMaterial>,
        thickness_mm: u32,
    ) -> Option<SpanCapacity> {
        match core {
            Some(core) => self.span_index.get(&(family, core, thickness_mm)).copied(),
            None => self.span_by_family_thickness.get(&(family, thickness_mm)).copied(),
        }
    }

    /// Thicker gauges of the same family/core whose rated span covers the
    /// requested one, in ascending thickness order.
    pub fn thicker_alternatives(
        &self,
        family: PanelFamily,
        core: Option<CoreMaterial>,
        thickness_mm: u32,
        span_m: f64,
    ) -> Vec<u32> {
        let cores: Vec<CoreMaterial> = match core {
            Some(core) => vec![core],
            None => self
                .span_gauges
                .keys()
                .filter(|(entry_family, _)| *entry_family == family)
                .map(|(_, entry_core)| *entry_core)
                .collect(),
        };

        let mut alternatives: Vec<u32> = cores
            .into_iter()
            .filter_map(|core| self.span_gauges.get(&(family, core)))
            .flatten()
            .filter(|(thickness, max_span)| *thickness > thickness_mm && *max_span >= span_m)
            .map(|(thickness, _)| *thickness)
            .collect();
        alternatives.sort_unstable();
        alternatives.dedup();
        alternatives
    }

    pub fn panel_price_m2(
        &self,
        family: PanelFamily,
        core: CoreMaterial,
        thickness_mm: u32,
    ) -> Option<Decimal> {
        self.panel_prices.get(&(family, core, thickness_mm)).copied()
    }

    pub fn accessory_price(&self, sku: &str) -> Option<&AccessoryPrice> {
        self.accessory_prices.get(sku)
    }

    /// Three-tier SKU resolution: family+thickness exact, then family-wide,
    /// then the universal entry. `None` when no tier matches.
    pub fn resolve_accessory_sku(
        &self,
        accessory_type: AccessoryType,
        family: Option<PanelFamily>,
        thickness_mm: Option<u32>,
    ) -> Option<&AccessorySkuDef> {
        let candidates = self.accessory_skus.get(&accessory_type)?;

        if let (Some(family), Some(thickness_mm)) = (family, thickness_mm) {
            if let Some(exact) = candidates.iter().find(|candidate| {
                candidate.family == Some(family) && candidate.thickness_mm == Some(thickness_mm)
            }) {
                return Some(exact);
            }
        }
        if let Some(family) = family {
            if let Some(family_wide) = candidates.iter().find(|candidate| {
                candidate.family == Some(family) && candidate.thickness_mm.is_none()
            }) {
                return Some(family_wide);
            }
        }
        candidates
            .iter()
            .find(|candidate| candidate.family.is_none() && candidate.thickness_mm.is_none())
    }

    pub fn system(&self, family: PanelFamily, usage: PanelUsage) -> Option<&SystemSpec> {
        self.systems.get(&(family, usage))
    }

    pub fn span_entry_count(&self) -> usize {
        self.span_index.len()
    }

    pub fn panel_price_count(&self) -> usize {
        self.panel_prices.len()
    }

    pub fn accessory_price_count(&self) -> usize {
        self.accessory_prices.len()
    }

    /// Deterministic in-memory catalog for tests and demos.
    pub fn fixture() -> Self {
        let span_doc: SpanTableDoc = toml::from_str(FIXTURE_SPAN_TABLE)
            .unwrap_or_else(|error| panic!("fixture span table must parse: {error}"));
        let price_doc: PriceTableDoc = toml::from_str(FIXTURE_PRICE_TABLE)
            .unwrap_or_else(|error| panic!("fixture price table must parse: {error}"));
        let defaults_doc: DefaultsDoc = toml::from_str(FIXTURE_DEFAULTS)
            .unwrap_or_else(|error| panic!("fixture defaults document must parse: {error}"));
        Self::from_documents(span_doc, price_doc, defaults_doc)
            .unwrap_or_else(|error| panic!("fixture catalog must build: {error}"))
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| CatalogError::ParseFile { path: path.to_path_buf(), source })
}

#[derive(Debug, Default, Deserialize)]
struct SpanTableDoc {
    #[serde(default)]
    entries: Vec<SpanEntryRaw>,
}

#[derive(Debug, Deserialize)]
struct SpanEntryRaw {
    family: PanelFamily,
    core: CoreMaterial,
    thickness_mm: u32,
    max_span_m: f64,
    weight_kg_m2: f64,
}

#[derive(Debug, Default, Deserialize)]
struct PriceTableDoc {
    #[serde(default)]
    panels: Vec<PanelPriceRaw>,
    #[serde(default)]
    accessories: Vec<AccessoryPriceRaw>,
}

#[derive(Debug, Deserialize)]
struct PanelPriceRaw {
    family: PanelFamily,
    core: CoreMaterial,
    thickness_mm: u32,
    price_m2: Decimal,
}

#[derive(Debug, Deserialize)]
struct AccessoryPriceRaw {
    sku: String,
    name: String,
    accessory_type: AccessoryType,
    unit: Unit,
    unit_price: Decimal,
    family: Option<PanelFamily>,
    thickness_mm: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DefaultsDoc {
    default_span_m: f64,
    usable_width_m: f64,
    fallback_max_span_m: f64,
    fasteners_per_crossing: u32,
    edge_fasteners_per_m: f64,
    structure_defaults: StructureDefaultsRaw,
    #[serde(default)]
    accessory_rules: Vec<AccessoryRule>,
    #[serde(default)]
    systems: Vec<SystemRaw>,
}

#[derive(Debug, Deserialize)]
struct StructureDefaultsRaw {
    roof: StructureType,
    wall: StructureType,
    chamber: StructureType,
}

#[derive(Debug, Deserialize)]
struct SystemRaw {
    key: String,
    family: PanelFamily,
    usage: PanelUsage,
    usable_width_m: Option<f64>,
    parent: Option<String>,
}

pub(crate) const FIXTURE_SPAN_TABLE: &str = r#"
[[entries]]
family = "isodec"
core = "eps"
thickness_mm = 50
max_span_m = 3.2
weight_kg_m2 = 10.2

[[entries]]
family = "isodec"
core = "eps"
thickness_mm = 100
max_span_m = 5.5
weight_kg_m2 = 12.4

[[entries]]
family = "isodec"
core = "eps"
thickness_mm = 150
max_span_m = 7.1
weight_kg_m2 = 14.6

[[entries]]
family = "isodec"
core = "eps"
thickness_mm = 200
max_span_m = 8.4
weight_kg_m2 = 16.9

[[entries]]
family = "isodec"
core = "pur"
thickness_mm = 50
max_span_m = 3.6
weight_kg_m2 = 10.8

[[entries]]
family = "isodec"
core = "pur"
thickness_mm = 100
max_span_m = 6.0
weight_kg_m2 = 13.1

[[entries]]
family = "isowall"
core = "eps"
thickness_mm = 50
max_span_m = 3.0
weight_kg_m2 = 9.8

[[entries]]
family = "isowall"
core = "eps"
thickness_mm = 100
max_span_m = 4.8
weight_kg_m2 = 11.9

[[entries]]
family = "isofrig"
core = "pir"
thickness_mm = 100
max_span_m = 5.0
weight_kg_m2 = 12.0

[[entries]]
family = "isofrig"
core = "pir"
thickness_mm = 150
max_span_m = 6.4
weight_kg_m2 = 14.2
"#;

pub(crate) const FIXTURE_PRICE_TABLE: &str = r#"
[[panels]]
family = "isodec"
core = "eps"
thickness_mm = 50
price_m2 = "18.90"

[[panels]]
family = "isodec"
core = "eps"
thickness_mm = 100
price_m2 = "24.50"

[[panels]]
family = "isodec"
core = "eps"
thickness_mm = 150
price_m2 = "31.80"

[[panels]]
family = "isodec"
core = "eps"
thickness_mm = 200
price_m2 = "39.40"

[[panels]]
family = "isodec"
core = "pur"
thickness_mm = 100
price_m2 = "29.75"

[[panels]]
family = "isowall"
core = "eps"
thickness_mm = 50
price_m2 = "17.60"

[[panels]]
family = "isowall"
core = "eps"
thickness_mm = 100
price_m2 = "22.90"

[[panels]]
family = "isofrig"
core = "pir"
thickness_mm = 100
price_m2 = "33.20"

[[accessories]]
sku = "ACC-DRIP-ISODEC-100"
name = "Botaguas Isodec 100mm"
accessory_type = "drip_edge"
unit = "pieces"
unit_price = "8.40"
family = "isodec"
thickness_mm = 100

[[accessories]]
sku = "ACC-DRIP-ISODEC"
name = "Botaguas Isodec"
accessory_type = "drip_edge"
unit = "pieces"
unit_price = "7.90"
family = "isodec"

[[accessories]]
sku = "ACC-DRIP-UNI"
name = "Botaguas universal"
accessory_type = "drip_edge"
unit = "pieces"
unit_price = "7.10"

[[accessories]]
sku = "ACC-RIDGE-ISODEC"
name = "Cumbrera Isodec"
accessory_type = "ridge_cap"
unit = "pieces"
unit_price = "11.25"
family = "isodec"

[[accessories]]
sku = "ACC-RIDGE-UNI"
name = "Cumbrera universal"
accessory_type = "ridge_cap"
unit = "pieces"
unit_price = "10.10"

[[accessories]]
sku = "ACC-SEAL-UNI"
name = "Sellador poliuretano 600ml"
accessory_type = "sealant"
unit = "pieces"
unit_price = "6.75"

[[accessories]]
sku = "ACC-TAPE-UNI"
name = "Cinta butilica"
accessory_type = "butyl_tape"
unit = "linear_meters"
unit_price = "0.65"

[[accessories]]
sku = "FIX-SCREW-UNI"
name = "Autoperforante 14x3"
accessory_type = "fastener"
unit = "pieces"
unit_price = "0.18"
"#;

pub(crate) const FIXTURE_DEFAULTS: &str = r#"
default_span_m = 3.0
usable_width_m = 1.0
fallback_max_span_m = 3.0
fasteners_per_crossing = 3
edge_fasteners_per_m = 2.0

[structure_defaults]
roof = "metal"
wall = "concrete"
chamber = "concrete"

[[systems]]
key = "isodec_roof"
family = "isodec"
usage = "roof"
usable_width_m = 1.0

[[systems]]
key = "isodec_wall"
family = "isodec"
usage = "wall"
parent = "isodec_roof"

[[systems]]
key = "isowall_wall"
family = "isowall"
usage = "wall"
usable_width_m = 1.15

[[systems]]
key = "isowall_roof"
family = "isowall"
usage = "roof"
parent = "isowall_wall"

[[systems]]
key = "isofrig_chamber"
family = "isofrig"
usage = "chamber"
usable_width_m = 1.1

[[accessory_rules]]
accessory_type = "drip_edge"
run = "eaves"
unit_length_m = 3.0

[[accessory_rules]]
accessory_type = "ridge_cap"
run = "ridge"
unit_length_m = 3.0

[[accessory_rules]]
accessory_type = "sealant"
run = "perimeter"
unit_length_m = 8.0

[[accessory_rules]]
accessory_type = "butyl_tape"
run = "perimeter"
unit_length_m = 20.0
"#;

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::domain::request::{CoreMaterial, PanelFamily, PanelUsage};
    use crate::errors::CatalogError;

    use super::{AccessoryType, Catalog, CatalogPaths};

    #[test]
    fn fixture_builds_and_indexes_span_entries() {
        let catalog = Catalog::fixture();
        let capacity = catalog
            .span_capacity(PanelFamily::Isodec, Some(CoreMaterial::Eps), 100)
            .expect("isodec/eps/100 should exist");
        assert!((capacity.max_span_m - 5.5).abs() < f64::EPSILON);
    }

    #[test]
    fn coreless_span_lookup_is_conservative() {
        let catalog = Catalog::fixture();
        // isodec 100 exists as eps (5.5) and pur (6.0); the coreless lookup
        // must return the smaller rated span.
        let capacity = catalog
            .span_capacity(PanelFamily::Isodec, None, 100)
            .expect("family/thickness lookup should exist");
        assert!((capacity.max_span_m - 5.5).abs() < f64::EPSILON);
    }

    #[test]
    fn thicker_alternatives_cover_requested_span() {
        let catalog = Catalog::fixture();
        let alternatives =
            catalog.thicker_alternatives(PanelFamily::Isodec, Some(CoreMaterial::Eps), 100, 7.0);
        assert_eq!(alternatives, vec![150, 200]);
    }

    #[test]
    fn sku_resolution_walks_three_tiers() {
        let catalog = Catalog::fixture();

        let exact = catalog
            .resolve_accessory_sku(AccessoryType::DripEdge, Some(PanelFamily::Isodec), Some(100))
            .expect("exact tier");
        assert_eq!(exact.sku, "ACC-DRIP-ISODEC-100");

        let family_wide = catalog
            .resolve_accessory_sku(AccessoryType::DripEdge, Some(PanelFamily::Isodec), Some(150))
            .expect("family tier");
        assert_eq!(family_wide.sku, "ACC-DRIP-ISODEC");

        let universal = catalog
            .resolve_accessory_sku(AccessoryType::DripEdge, Some(PanelFamily::Isofrig), None)
            .expect("universal tier");
        assert_eq!(universal.sku, "ACC-DRIP-UNI");
    }

    #[test]
    fn system_width_is_inherited_from_parent() {
        let catalog = Catalog::fixture();
        let child = catalog
            .system(PanelFamily::Isowall, PanelUsage::Roof)
            .expect("isowall roof system should exist");
        assert_eq!(child.key, "isowall_roof");
        assert!((child.usable_width_m - 1.15).abs() < f64::EPSILON);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let paths = CatalogPaths {
            span_table: dir.path().join("missing_span.toml"),
            price_table: dir.path().join("missing_price.toml"),
            defaults: dir.path().join("missing_defaults.toml"),
        };
        assert!(matches!(Catalog::load(&paths), Err(CatalogError::ReadFile { .. })));
    }

    #[test]
    fn load_round_trips_fixture_documents_from_disk() {
        let dir = TempDir::new().expect("temp dir");
        let paths = CatalogPaths {
            span_table: dir.path().join("span_table.toml"),
            price_table: dir.path().join("price_table.toml"),
            defaults: dir.path().join("defaults.toml"),
        };
        fs::write(&paths.span_table, super::FIXTURE_SPAN_TABLE).expect("write span table");
        fs::write(&paths.price_table, super::FIXTURE_PRICE_TABLE).expect("write price table");
        fs::write(&paths.defaults, super::FIXTURE_DEFAULTS).expect("write defaults");

        let catalog = Catalog::load(&paths).expect("catalog should load from disk");
        assert_eq!(catalog.span_entry_count(), Catalog::fixture().span_entry_count());
    }
}
