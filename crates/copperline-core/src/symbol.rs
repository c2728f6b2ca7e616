//! Library symbols, pins and the graphic primitives that draw them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{At, Vec2},
    property::Property,
    style::{Fill, Stroke, TextEffects},
};

/// A drawable primitive inside a symbol body.
///
/// This is a closed union: the format's drawing lists may only contain
/// these shapes, and the decoder rejects anything else by tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicItem {
    Rectangle(Rectangle),
    Circle(Circle),
    Arc(Arc),
    Polyline(Polyline),
    Text(Text),
}

/// An axis-aligned rectangle between two corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub start: Vec2,
    pub end: Vec2,
    pub stroke: Stroke,
    pub fill: Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f64,
    pub stroke: Stroke,
    pub fill: Fill,
}

/// A circular arc through three points (start, midpoint, end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub start: Vec2,
    pub mid: Vec2,
    pub end: Vec2,
    pub stroke: Stroke,
    pub fill: Fill,
}

/// An open polyline through an ordered list of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    pub stroke: Stroke,
    pub fill: Fill,
}

/// Free text placed inside a symbol body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    pub at: At,
    pub effects: TextEffects,
}

/// Electrical function of a pin.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinElectrical {
    Input,
    Output,
    Bidirectional,
    TriState,
    #[default]
    Passive,
    Free,
    Unspecified,
    PowerIn,
    PowerOut,
    OpenCollector,
    OpenEmitter,
    NoConnect,
}

impl FromStr for PinElectrical {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Self::Input),
            "output" => Ok(Self::Output),
            "bidirectional" => Ok(Self::Bidirectional),
            "tri_state" => Ok(Self::TriState),
            "passive" => Ok(Self::Passive),
            "free" => Ok(Self::Free),
            "unspecified" => Ok(Self::Unspecified),
            "power_in" => Ok(Self::PowerIn),
            "power_out" => Ok(Self::PowerOut),
            "open_collector" => Ok(Self::OpenCollector),
            "open_emitter" => Ok(Self::OpenEmitter),
            "no_connect" => Ok(Self::NoConnect),
            _ => Err(format!("invalid pin electrical type `{s}`")),
        }
    }
}

/// Visual decoration drawn at the pin's connection point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinGraphicStyle {
    #[default]
    Line,
    Inverted,
    Clock,
    InvertedClock,
    InputLow,
    ClockLow,
    OutputLow,
    EdgeClockHigh,
    NonLogic,
}

impl FromStr for PinGraphicStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(Self::Line),
            "inverted" => Ok(Self::Inverted),
            "clock" => Ok(Self::Clock),
            "inverted_clock" => Ok(Self::InvertedClock),
            "input_low" => Ok(Self::InputLow),
            "clock_low" => Ok(Self::ClockLow),
            "output_low" => Ok(Self::OutputLow),
            "edge_clock_high" => Ok(Self::EdgeClockHigh),
            "non_logic" => Ok(Self::NonLogic),
            _ => Err(format!("invalid pin graphic style `{s}`")),
        }
    }
}

/// A pin's display name, e.g. `(name "VCC" (effects ...))`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinName {
    pub text: String,
    pub effects: TextEffects,
}

/// A pin's number. Stored as text because numbers like `A1` are legal.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinNumber {
    pub text: String,
    pub effects: TextEffects,
}

/// A connection point on a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub electrical: PinElectrical,
    pub graphic: PinGraphicStyle,
    pub at: At,
    /// Lead length from `at` toward the symbol body, in millimetres.
    pub length: f64,
    pub hidden: bool,
    pub name: PinName,
    pub number: PinNumber,
}

/// A symbol definition from a `lib_symbols` table.
///
/// The format nests per-unit bodies as inner `symbol` lists; those appear
/// here as `units`, each itself a [`LibSymbol`] (with only graphics and
/// pins populated). A library symbol owns everything below it; placed
/// instances refer to it by name only (see
/// [`Schematic::find_symbol`](crate::schematic::Schematic::find_symbol)).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibSymbol {
    /// Library identifier, e.g. `"Device:R"` for the root definition or
    /// `"R_0_1"` for a nested unit.
    pub id: String,
    /// Power symbols get special net-name handling downstream.
    pub power: bool,
    pub pin_numbers_hidden: bool,
    pub pin_names_hidden: bool,
    /// Offset of pin names from the body outline, when given.
    pub pin_names_offset: Option<f64>,
    pub in_bom: bool,
    pub on_board: bool,
    pub properties: Vec<Property>,
    pub graphics: Vec<GraphicItem>,
    pub pins: Vec<Pin>,
    pub units: Vec<LibSymbol>,
    pub unrecognized: Vec<String>,
}

impl LibSymbol {
    /// Iterates all pins of this symbol, including those of nested units,
    /// in definition order.
    pub fn all_pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins
            .iter()
            .chain(self.units.iter().flat_map(|unit| unit.pins.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_electrical_from_str() {
        assert_eq!(
            PinElectrical::from_str("power_in").unwrap(),
            PinElectrical::PowerIn
        );
        assert_eq!(
            PinElectrical::from_str("passive").unwrap(),
            PinElectrical::Passive
        );
        assert!(PinElectrical::from_str("magic").is_err());
    }

    #[test]
    fn test_pin_graphic_style_from_str() {
        assert_eq!(
            PinGraphicStyle::from_str("inverted_clock").unwrap(),
            PinGraphicStyle::InvertedClock
        );
        assert!(PinGraphicStyle::from_str("fancy").is_err());
    }

    fn pin(number: &str) -> Pin {
        Pin {
            electrical: PinElectrical::Passive,
            graphic: PinGraphicStyle::Line,
            at: At::default(),
            length: 2.54,
            hidden: false,
            name: PinName::default(),
            number: PinNumber {
                text: number.to_string(),
                effects: TextEffects::default(),
            },
        }
    }

    #[test]
    fn test_all_pins_includes_units() {
        let symbol = LibSymbol {
            id: "Device:R".to_string(),
            units: vec![LibSymbol {
                id: "R_1_1".to_string(),
                pins: vec![pin("1"), pin("2")],
                ..LibSymbol::default()
            }],
            ..LibSymbol::default()
        };

        let numbers: Vec<_> = symbol.all_pins().map(|p| p.number.text.as_str()).collect();
        assert_eq!(numbers, ["1", "2"]);
    }
}
