use crate::error::SetupError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    Body,
    Engine,
    Tyres,
}

impl PartKind {
    pub const ALL: [PartKind; 3] = [PartKind::Body, PartKind::Engine, PartKind::Tyres];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartKind::Body => "body",
            PartKind::Engine => "engine",
            PartKind::Tyres => "tyres",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Offsets of the front (f) and back (b) tyres relative to the body center. They are only used
/// by the view to place the wheel sprites, the left tyres mirror the x offset.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub struct TyreOffsets {
    pub fx: i32,
    pub fy: i32,
    pub bx: i32,
    pub by: i32,
}

/// * `mass` - Body mass, the tuning range is [1, 10)
/// * `width` - (px) Unscaled sprite width, used for the footprint
/// * `height` - (px) Unscaled sprite height, used for the footprint and the AI sensors
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BodyPars {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub mass: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub tyre_offsets: TyreOffsets,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EnginePars {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub power: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TyresPars {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub grip: f64,
}

/// PartCatalogPars is the on-disk layout of the part catalog, one list per part group.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PartCatalogPars {
    #[serde(default)]
    pub body: Vec<BodyPars>,
    #[serde(default)]
    pub engine: Vec<EnginePars>,
    #[serde(default)]
    pub tyres: Vec<TyresPars>,
}

/// The group specific physical coefficients of a part.
#[derive(Debug, Clone, PartialEq)]
pub enum Coefficients {
    Body {
        mass: f64,
        width: f64,
        height: f64,
        tyre_offsets: TyreOffsets,
    },
    Engine {
        power: f64,
    },
    Tyres {
        grip: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartRecord {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub coefficients: Coefficients,
}

impl PartRecord {
    pub fn kind(&self) -> PartKind {
        match self.coefficients {
            Coefficients::Body { .. } => PartKind::Body,
            Coefficients::Engine { .. } => PartKind::Engine,
            Coefficients::Tyres { .. } => PartKind::Tyres,
        }
    }
}

/// PartCatalog maps (kind, id) to the immutable part records. Within a group the parts are kept
/// sorted by price.
#[derive(Debug, Clone, Default)]
pub struct PartCatalog {
    parts: HashMap<(PartKind, String), PartRecord>,
    order: HashMap<PartKind, Vec<String>>,
}

impl PartCatalog {
    pub fn new(pars: PartCatalogPars) -> PartCatalog {
        let mut records: Vec<PartRecord> = Vec::new();

        records.extend(pars.body.into_iter().map(|p| PartRecord {
            id: p.id,
            name: p.name,
            price: p.price,
            coefficients: Coefficients::Body {
                mass: p.mass,
                width: p.width,
                height: p.height,
                tyre_offsets: p.tyre_offsets,
            },
        }));
        records.extend(pars.engine.into_iter().map(|p| PartRecord {
            id: p.id,
            name: p.name,
            price: p.price,
            coefficients: Coefficients::Engine { power: p.power },
        }));
        records.extend(pars.tyres.into_iter().map(|p| PartRecord {
            id: p.id,
            name: p.name,
            price: p.price,
            coefficients: Coefficients::Tyres { grip: p.grip },
        }));

        // stable sort, parts with equal price keep their file order
        records.sort_by_key(|r| r.price);

        let mut catalog = PartCatalog::default();
        for record in records {
            let kind = record.kind();
            let key = (kind, record.id.to_owned());
            if !catalog.parts.contains_key(&key) {
                catalog.order.entry(kind).or_default().push(record.id.to_owned());
            }
            catalog.parts.insert(key, record);
        }
        catalog
    }

    pub fn get(&self, kind: PartKind, id: &str) -> Result<&PartRecord, SetupError> {
        self.parts
            .get(&(kind, id.to_owned()))
            .ok_or_else(|| SetupError::UnknownPart {
                kind,
                id: id.to_owned(),
            })
    }

    /// parts_of returns all parts of a group, cheapest first.
    pub fn parts_of(&self, kind: PartKind) -> Vec<&PartRecord> {
        self.order
            .get(&kind)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.parts.get(&(kind, id.to_owned())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
