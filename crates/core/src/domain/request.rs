use serde::{Deserialize, Serialize};

/// Panel product family recognized by the commercial catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelFamily {
    Isodec,
    Isowall,
    Isofrig,
}

impl PanelFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isodec => "isodec",
            Self::Isowall => "isowall",
            Self::Isofrig => "isofrig",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreMaterial {
    Eps,
    Pur,
    Pir,
    RockWool,
}

impl CoreMaterial {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eps => "eps",
            Self::Pur => "pur",
            Self::Pir => "pir",
            Self::RockWool => "rock_wool",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelUsage {
    Roof,
    Wall,
    Chamber,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Metal,
    Concrete,
    Wood,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofTopology {
    OneWater,
    TwoWater,
    FourWater,
    Butterfly,
}

impl RoofTopology {
    /// Whether the shape produces a ridge line that needs capping.
    pub fn has_ridge(&self) -> bool {
        matches!(self, Self::TwoWater | Self::FourWater)
    }
}

/// Commercial operating mode controlling how strict the pipeline is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    Informativo,
    PreCotizacion,
    Formal,
}

impl OperatingMode {
    pub fn is_formal(&self) -> bool {
        matches!(self, Self::Formal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    RoofSystem,
    WallSystem,
    RoomComplete,
    AccessoriesOnly,
    Update,
    Waterproofing,
    ConventionalSheet,
    PostSale,
    InfoOnly,
    Mixed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    #[default]
    Inclusive,
    Exclusive,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Structured request extracted from free text.
///
/// The parser fills what it can and records every gap in
/// `incomplete_fields`; the assumption applier is the only later stage
/// allowed to mutate the request, and it only fills `None` fields while
/// appending to `assumptions_used`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub family: Option<PanelFamily>,
    pub sub_family: Option<String>,
    pub core: Option<CoreMaterial>,
    pub thickness_mm: Option<u32>,
    pub usage: Option<PanelUsage>,
    pub structure: Option<StructureType>,
    pub span_m: Option<f64>,
    pub length_m: Option<f64>,
    pub width_m: Option<f64>,
    pub height_m: Option<f64>,
    pub panel_count: Option<u32>,
    pub panel_lengths_m: Vec<f64>,
    pub roof_topology: Option<RoofTopology>,
    pub client: ClientInfo,
    pub include_accessories: bool,
    pub include_fixings: bool,
    pub include_shipping: bool,
    pub tax_mode: TaxMode,
    pub accessory_mentions: Vec<String>,
    pub defers_to_drawing: bool,
    pub splice_mentioned: bool,
    pub incomplete_fields: Vec<String>,
    pub assumptions_used: Vec<String>,
}

impl QuoteRequest {
    /// Longest individual panel, falling back to the overall length.
    pub fn longest_panel_m(&self) -> Option<f64> {
        let from_list =
            self.panel_lengths_m.iter().copied().fold(None, |acc: Option<f64>, value| {
                Some(acc.map_or(value, |current| current.max(value)))
            });
        from_list.or(self.length_m)
    }

    pub fn is_missing(&self, field: &str) -> bool {
        self.incomplete_fields.iter().any(|entry| entry == field)
    }
}
