//! Decoders for library symbols, pins and the symbol drawing list.

use std::sync::LazyLock;

use copperline_core::symbol::{
    Arc, Circle, GraphicItem, LibSymbol, Pin, PinName, PinNumber, Polyline, Rectangle, Text,
};
use indexmap::IndexMap;

use crate::{
    ParseOptions,
    error::SchemaError,
    reader::ListReader,
    schema::{common, handle_unknown},
    tree::ListNode,
};

type GraphicDecoder = fn(&ListNode, &ParseOptions) -> Result<GraphicItem, SchemaError>;

/// Tag registry for the symbol drawing list. This slot is strict: a tag
/// outside the registry (and not `pin`/`symbol`/`property`) is a decode
/// error, because a renderer cannot skip geometry it cannot classify.
static GRAPHIC_DECODERS: LazyLock<IndexMap<&'static str, GraphicDecoder>> = LazyLock::new(|| {
    IndexMap::from([
        ("rectangle", rectangle as GraphicDecoder),
        ("circle", circle),
        ("arc", arc),
        ("polyline", polyline),
        ("text", text),
    ])
});

fn rectangle(node: &ListNode, options: &ParseOptions) -> Result<GraphicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let start = common::point_child(&mut r, "start", options)?
        .ok_or_else(|| missing(&r, "start"))?;
    let end = common::point_child(&mut r, "end", options)?.ok_or_else(|| missing(&r, "end"))?;
    let stroke = common::opt_stroke(&mut r, options)?;
    let fill = common::opt_fill(&mut r, options)?;
    r.finish(options, None)?;
    Ok(GraphicItem::Rectangle(Rectangle {
        start,
        end,
        stroke,
        fill,
    }))
}

fn circle(node: &ListNode, options: &ParseOptions) -> Result<GraphicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let center = common::point_child(&mut r, "center", options)?
        .ok_or_else(|| missing(&r, "center"))?;
    let radius = common::number_child(&mut r, "radius", options)?
        .ok_or_else(|| missing(&r, "radius"))?;
    let stroke = common::opt_stroke(&mut r, options)?;
    let fill = common::opt_fill(&mut r, options)?;
    r.finish(options, None)?;
    Ok(GraphicItem::Circle(Circle {
        center,
        radius,
        stroke,
        fill,
    }))
}

fn arc(node: &ListNode, options: &ParseOptions) -> Result<GraphicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let start = common::point_child(&mut r, "start", options)?
        .ok_or_else(|| missing(&r, "start"))?;
    let mid = common::point_child(&mut r, "mid", options)?.ok_or_else(|| missing(&r, "mid"))?;
    let end = common::point_child(&mut r, "end", options)?.ok_or_else(|| missing(&r, "end"))?;
    let stroke = common::opt_stroke(&mut r, options)?;
    let fill = common::opt_fill(&mut r, options)?;
    r.finish(options, None)?;
    Ok(GraphicItem::Arc(Arc {
        start,
        mid,
        end,
        stroke,
        fill,
    }))
}

fn polyline(node: &ListNode, options: &ParseOptions) -> Result<GraphicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let points = match r.child("pts") {
        Some(list) => common::pts(list, options)?,
        None => Vec::new(),
    };
    let stroke = common::opt_stroke(&mut r, options)?;
    let fill = common::opt_fill(&mut r, options)?;
    r.finish(options, None)?;
    Ok(GraphicItem::Polyline(Polyline {
        points,
        stroke,
        fill,
    }))
}

fn text(node: &ListNode, options: &ParseOptions) -> Result<GraphicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let content = r.string("text")?;
    let at = common::opt_at(&mut r, options)?;
    let effects = common::opt_effects(&mut r, options)?;
    r.finish(options, None)?;
    Ok(GraphicItem::Text(Text {
        text: content,
        at,
        effects,
    }))
}

fn missing(r: &ListReader<'_>, field: &'static str) -> SchemaError {
    SchemaError::MissingField {
        tag: r.tag().to_string(),
        field,
        span: r.span(),
    }
}

/// Decodes `(pin electrical graphic_style (at ...) (length ...) ...)`.
pub(crate) fn pin(node: &ListNode, options: &ParseOptions) -> Result<Pin, SchemaError> {
    let mut r = ListReader::open(node)?;
    let electrical = r.enum_atom("electrical")?;
    let graphic = r.enum_atom("graphic_style")?;
    let hidden = r.flag("hide") || r.bool_child("hide", false)?;
    let at = common::opt_at(&mut r, options)?;
    let length = common::number_child(&mut r, "length", options)?.unwrap_or(0.0);

    let name = match r.child("name") {
        Some(list) => {
            let mut nr = ListReader::open(list)?;
            let text = nr.string("text")?;
            let effects = common::opt_effects(&mut nr, options)?;
            nr.finish(options, None)?;
            PinName { text, effects }
        }
        None => PinName::default(),
    };
    let number = match r.child("number") {
        Some(list) => {
            let mut nr = ListReader::open(list)?;
            let text = nr.string("text")?;
            let effects = common::opt_effects(&mut nr, options)?;
            nr.finish(options, None)?;
            PinNumber { text, effects }
        }
        None => PinNumber::default(),
    };

    r.finish(options, None)?;
    Ok(Pin {
        electrical,
        graphic,
        at,
        length,
        hidden,
        name,
        number,
    })
}

/// Decodes a `(symbol "id" ...)` definition.
///
/// The same decoder handles both library-level definitions and the nested
/// per-unit bodies; `is_unit` selects the strict drawing-list policy for
/// the latter.
pub(crate) fn lib_symbol(
    node: &ListNode,
    options: &ParseOptions,
    is_unit: bool,
) -> Result<LibSymbol, SchemaError> {
    let mut r = ListReader::open(node)?;
    let id = r.text("id")?;
    let power = r.child("power").is_some();

    let pin_numbers_hidden = match r.child("pin_numbers") {
        Some(list) => {
            let mut pr = ListReader::open(list)?;
            let hidden = pr.flag("hide") || pr.bool_child("hide", false)?;
            pr.finish(options, None)?;
            hidden
        }
        None => false,
    };
    let (pin_names_offset, pin_names_hidden) = match r.child("pin_names") {
        Some(list) => {
            let mut pr = ListReader::open(list)?;
            let offset = common::number_child(&mut pr, "offset", options)?;
            let hidden = pr.flag("hide") || pr.bool_child("hide", false)?;
            pr.finish(options, None)?;
            (offset, hidden)
        }
        None => (None, false),
    };
    let in_bom = r.bool_child("in_bom", true)?;
    let on_board = r.bool_child("on_board", true)?;

    let mut properties = Vec::new();
    for prop in r.children("property") {
        properties.push(common::property(prop, options)?);
    }

    let mut graphics = Vec::new();
    let mut pins = Vec::new();
    let mut units = Vec::new();
    let mut unrecognized = Vec::new();

    for child in r.remaining_lists() {
        match child.tag() {
            Some("symbol") => units.push(lib_symbol(child, options, true)?),
            Some("pin") => pins.push(pin(child, options)?),
            Some(tag) => match GRAPHIC_DECODERS.get(tag) {
                Some(decode) => graphics.push(decode(child, options)?),
                None if is_unit => {
                    return Err(SchemaError::UnsupportedItem {
                        tag: tag.to_string(),
                        slot: "symbol drawing list",
                        span: child.span,
                    });
                }
                None => handle_unknown(r.tag(), child, options, Some(&mut unrecognized))?,
            },
            None => handle_unknown(r.tag(), child, options, Some(&mut unrecognized))?,
        }
    }

    r.finish(options, Some(&mut unrecognized))?;

    Ok(LibSymbol {
        id,
        power,
        pin_numbers_hidden,
        pin_names_hidden,
        pin_names_offset,
        in_bom,
        on_board,
        properties,
        graphics,
        pins,
        units,
        unrecognized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use copperline_core::symbol::{PinElectrical, PinGraphicStyle};

    use crate::{tokenizer::Tokenizer, tree::build_tree};

    fn node(input: &str) -> ListNode {
        build_tree(Tokenizer::new(input)).unwrap()
    }

    const OPTS: ParseOptions = ParseOptions {
        strictness: crate::Strictness::Permissive,
    };

    #[test]
    fn test_polymorphic_dispatch_preserves_order() {
        let n = node(
            "(symbol \"X_0_1\" \
               (rectangle (start 0 0) (end 1 1)) \
               (circle (center 0 0) (radius 2)) \
               (arc (start 0 0) (mid 1 1) (end 2 0)))",
        );
        let sym = lib_symbol(&n, &OPTS, true).unwrap();
        assert_eq!(sym.graphics.len(), 3);
        assert!(matches!(sym.graphics[0], GraphicItem::Rectangle(_)));
        assert!(matches!(sym.graphics[1], GraphicItem::Circle(_)));
        assert!(matches!(sym.graphics[2], GraphicItem::Arc(_)));
    }

    #[test]
    fn test_unsupported_drawing_tag_fails_by_name() {
        let n = node("(symbol \"X_0_1\" (spline (pts (xy 0 0))))");
        let err = lib_symbol(&n, &OPTS, true).unwrap_err();
        match err {
            SchemaError::UnsupportedItem { tag, slot, .. } => {
                assert_eq!(tag, "spline");
                assert_eq!(slot, "symbol drawing list");
            }
            other => panic!("expected UnsupportedItem, got {other:?}"),
        }
    }

    #[test]
    fn test_pin_decode() {
        let n = node(
            "(pin passive line (at 0 2.54 270) (length 1.27) \
               (name \"VCC\" (effects (font (size 1.27 1.27)))) \
               (number \"1\"))",
        );
        let pin = pin(&n, &OPTS).unwrap();
        assert_eq!(pin.electrical, PinElectrical::Passive);
        assert_eq!(pin.graphic, PinGraphicStyle::Line);
        assert_eq!(pin.at.rotation, 270.0);
        assert_eq!(pin.length, 1.27);
        assert_eq!(pin.name.text, "VCC");
        assert_eq!(pin.number.text, "1");
    }

    #[test]
    fn test_pin_invalid_electrical_type() {
        let n = node("(pin mystery line (at 0 0))");
        let err = pin(&n, &OPTS).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidEnum { field: "electrical", .. }
        ));
    }

    #[test]
    fn test_lib_symbol_with_units_and_pins() {
        let n = node(
            "(symbol \"Device:R\" (pin_numbers hide) (pin_names (offset 0)) \
               (in_bom yes) (on_board yes) \
               (property \"Reference\" \"R\" (at 2.032 0 90)) \
               (symbol \"R_0_1\" (rectangle (start -1.016 -2.54) (end 1.016 2.54))) \
               (symbol \"R_1_1\" \
                 (pin passive line (at 0 3.81 270) (length 1.27) (number \"1\")) \
                 (pin passive line (at 0 -3.81 90) (length 1.27) (number \"2\"))))",
        );
        let sym = lib_symbol(&n, &OPTS, false).unwrap();
        assert_eq!(sym.id, "Device:R");
        assert!(sym.pin_numbers_hidden);
        assert_eq!(sym.pin_names_offset, Some(0.0));
        assert!(sym.in_bom);
        assert_eq!(sym.units.len(), 2);
        let numbers: Vec<_> = sym.all_pins().map(|p| p.number.text.as_str()).collect();
        assert_eq!(numbers, ["1", "2"]);
    }

    #[test]
    fn test_power_flag() {
        let n = node("(symbol \"power:GND\" (power) (pin_names (offset 0)))");
        let sym = lib_symbol(&n, &OPTS, false).unwrap();
        assert!(sym.power);
    }
}
