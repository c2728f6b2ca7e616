//! The board (PCB) document graph.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{At, Vec2},
    property::Property,
    style::{Stroke, TextEffects},
};

/// A decoded `kicad_pcb` document.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub version: u64,
    pub generator: Option<String>,
    pub layers: Vec<Layer>,
    pub nets: Vec<Net>,
    pub footprints: Vec<Footprint>,
    pub segments: Vec<Segment>,
    pub vias: Vec<Via>,
    pub graphics: Vec<BoardGraphic>,
    pub unrecognized: Vec<String>,
}

impl Board {
    /// Resolves a net number to its definition.
    pub fn find_net(&self, number: i64) -> Option<&Net> {
        self.nets.iter().find(|n| n.number == number)
    }
}

/// Broad category of a copper or drawing layer.
///
/// Unknown categories fall back to `User` so newer sources still load.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Signal,
    #[default]
    User,
}

impl FromStr for LayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signal" => Ok(Self::Signal),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid layer kind `{s}`, valid values: signal, user")),
        }
    }
}

/// One entry of the board's `(layers ...)` table.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub ordinal: i64,
    pub name: String,
    pub kind: LayerKind,
    pub user_name: Option<String>,
}

/// A net definition, `(net 1 "GND")`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Net {
    pub number: i64,
    pub name: String,
}

/// Mechanical kind of a pad.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadKind {
    #[default]
    ThruHole,
    Smd,
    Connect,
    NpThruHole,
}

impl FromStr for PadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thru_hole" => Ok(Self::ThruHole),
            "smd" => Ok(Self::Smd),
            "connect" => Ok(Self::Connect),
            "np_thru_hole" => Ok(Self::NpThruHole),
            _ => Err(format!(
                "invalid pad type `{s}`, valid values: thru_hole, smd, connect, np_thru_hole"
            )),
        }
    }
}

/// Copper shape of a pad.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadShape {
    #[default]
    Circle,
    Rect,
    Oval,
    RoundRect,
    Trapezoid,
}

impl FromStr for PadShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Self::Circle),
            "rect" => Ok(Self::Rect),
            "oval" => Ok(Self::Oval),
            "roundrect" => Ok(Self::RoundRect),
            "trapezoid" => Ok(Self::Trapezoid),
            _ => Err(format!(
                "invalid pad shape `{s}`, valid values: circle, rect, oval, roundrect, trapezoid"
            )),
        }
    }
}

/// A pad's drill hole; oval drills carry a second dimension.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drill {
    pub diameter: f64,
    pub width: Option<f64>,
    pub oval: bool,
}

/// A footprint pad.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    /// Pad "numbers" are text; BGA pads use names like `A1`.
    pub number: String,
    pub kind: PadKind,
    pub shape: PadShape,
    pub at: At,
    pub size: Vec2,
    pub drill: Option<Drill>,
    pub layers: Vec<String>,
    /// The connected net, when the pad is on one.
    pub net: Option<Net>,
}

/// A footprint placed on the board.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub lib_id: String,
    pub layer: String,
    pub at: At,
    pub uuid: Option<String>,
    pub properties: Vec<Property>,
    pub pads: Vec<Pad>,
    pub graphics: Vec<BoardGraphic>,
    pub unrecognized: Vec<String>,
}

impl Footprint {
    /// Finds a pad by number. First match wins, like property lookup.
    pub fn find_pad(&self, number: &str) -> Option<&Pad> {
        self.pads.iter().find(|p| p.number == number)
    }
}

/// A copper track segment.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f64,
    pub layer: String,
    pub net: i64,
    pub uuid: Option<String>,
}

/// A through via.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub at: At,
    pub size: f64,
    pub drill: f64,
    pub layers: Vec<String>,
    pub net: i64,
    pub uuid: Option<String>,
}

/// Geometry of a board-level or footprint-level drawing item.
///
/// Covers both the `gr_*` (board) and `fp_*` (footprint) spellings; the
/// two families share shapes and differ only in prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardShape {
    Line { start: Vec2, end: Vec2 },
    Rect { start: Vec2, end: Vec2 },
    Circle { center: Vec2, end: Vec2 },
    Arc { start: Vec2, mid: Vec2, end: Vec2 },
    Poly { points: Vec<Vec2> },
    Text { text: String, at: At, effects: TextEffects },
}

/// A drawing item on a board layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardGraphic {
    pub shape: BoardShape,
    pub layer: String,
    pub stroke: Stroke,
}
