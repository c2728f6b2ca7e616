//! The schematic document graph.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{At, Vec2},
    property::Property,
    style::{Color, Stroke, TextEffects},
    symbol::LibSymbol,
};

/// A decoded `kicad_sch` document.
///
/// The schematic owns its library symbol table and all placed items.
/// `unrecognized` holds the raw text of children the schema does not
/// describe, captured only when the decoder runs in capture mode.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schematic {
    pub version: u64,
    pub generator: Option<String>,
    pub uuid: Option<String>,
    pub paper: Option<String>,
    pub lib_symbols: Vec<LibSymbol>,
    pub items: Vec<SchematicItem>,
    pub unrecognized: Vec<String>,
}

impl Schematic {
    /// Resolves a placed symbol's `lib_id` against the schematic's own
    /// library table.
    ///
    /// This is the non-owning direction of the instance/library
    /// association: instances store only the name, so there are no
    /// ownership cycles to keep a symbol alive.
    pub fn find_symbol(&self, lib_id: &str) -> Option<&LibSymbol> {
        self.lib_symbols.iter().find(|s| s.id == lib_id)
    }

    /// Iterates all placed symbol instances.
    pub fn symbols(&self) -> impl Iterator<Item = &SymbolInstance> {
        self.items.iter().filter_map(|item| match item {
            SchematicItem::Symbol(instance) => Some(instance),
            _ => None,
        })
    }
}

/// Any item that can appear directly in a schematic, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchematicItem {
    Junction(Junction),
    NoConnect(NoConnect),
    Wire(Wire),
    Bus(Wire),
    Polyline(SchPolyline),
    Text(SchText),
    Label(Label),
    GlobalLabel(GlobalLabel),
    HierarchicalLabel(GlobalLabel),
    Symbol(SymbolInstance),
}

/// A junction dot where wires connect.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub at: At,
    /// `0` means the renderer's default diameter.
    pub diameter: f64,
    pub color: Option<Color>,
    pub uuid: Option<String>,
}

/// A no-connect marker on an intentionally unconnected pin.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoConnect {
    pub at: At,
    pub uuid: Option<String>,
}

/// A wire or bus segment described by its polyline points.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub points: Vec<Vec2>,
    pub stroke: Stroke,
    pub uuid: Option<String>,
}

/// A free-standing graphical polyline (not electrically connected).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchPolyline {
    pub points: Vec<Vec2>,
    pub stroke: Stroke,
    pub uuid: Option<String>,
}

/// Free text placed on the schematic sheet.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchText {
    pub text: String,
    pub at: At,
    pub effects: TextEffects,
    pub uuid: Option<String>,
}

/// A local net label.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub at: At,
    pub effects: TextEffects,
    pub uuid: Option<String>,
}

/// Connection-point shape of a global or hierarchical label.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelShape {
    Input,
    Output,
    Bidirectional,
    TriState,
    #[default]
    Passive,
}

impl FromStr for LabelShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(Self::Input),
            "output" => Ok(Self::Output),
            "bidirectional" => Ok(Self::Bidirectional),
            "tri_state" => Ok(Self::TriState),
            "passive" => Ok(Self::Passive),
            _ => Err(format!(
                "invalid label shape `{s}`, valid values: input, output, bidirectional, tri_state, passive"
            )),
        }
    }
}

/// A global or hierarchical label; these share a record shape.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalLabel {
    pub text: String,
    pub shape: LabelShape,
    pub at: At,
    pub effects: TextEffects,
    pub uuid: Option<String>,
}

/// Axis mirroring of a placed symbol.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mirror {
    #[default]
    None,
    X,
    Y,
}

impl FromStr for Mirror {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            _ => Err(format!("invalid mirror axis `{s}`, valid values: x, y")),
        }
    }
}

/// A symbol placed on the sheet.
///
/// Holds a `lib_id` naming its [`LibSymbol`]; resolve it with
/// [`Schematic::find_symbol`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInstance {
    pub lib_id: String,
    pub at: At,
    pub mirror: Mirror,
    /// Which unit of a multi-unit symbol this instance places.
    pub unit: i64,
    pub in_bom: bool,
    pub on_board: bool,
    pub uuid: Option<String>,
    pub properties: Vec<Property>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_symbol() {
        let sch = Schematic {
            lib_symbols: vec![
                LibSymbol {
                    id: "Device:R".to_string(),
                    ..LibSymbol::default()
                },
                LibSymbol {
                    id: "Device:C".to_string(),
                    ..LibSymbol::default()
                },
            ],
            ..Schematic::default()
        };

        assert_eq!(sch.find_symbol("Device:C").unwrap().id, "Device:C");
        assert!(sch.find_symbol("Device:L").is_none());
    }

    #[test]
    fn test_symbols_iterator_filters() {
        let sch = Schematic {
            items: vec![
                SchematicItem::Junction(Junction::default()),
                SchematicItem::Symbol(SymbolInstance {
                    lib_id: "Device:R".to_string(),
                    ..SymbolInstance::default()
                }),
            ],
            ..Schematic::default()
        };

        let ids: Vec<_> = sch.symbols().map(|s| s.lib_id.as_str()).collect();
        assert_eq!(ids, ["Device:R"]);
    }

    #[test]
    fn test_label_shape_from_str() {
        assert_eq!(LabelShape::from_str("tri_state").unwrap(), LabelShape::TriState);
        assert!(LabelShape::from_str("dangling").is_err());
    }
}
