//! Decoders for `kicad_sch` documents and every item they can contain.

use std::sync::LazyLock;

use copperline_core::schematic::{
    GlobalLabel, Junction, Label, NoConnect, SchPolyline, SchText, Schematic, SchematicItem,
    SymbolInstance, Wire,
};
use indexmap::IndexMap;

use crate::{
    ParseOptions,
    error::SchemaError,
    reader::ListReader,
    schema::{common, handle_unknown, symbol},
    tree::ListNode,
};

type ItemDecoder = fn(&ListNode, &ParseOptions) -> Result<SchematicItem, SchemaError>;

/// Tag registry for the schematic item slot. Insertion order matches the
/// order the format usually writes items in, which keeps debug output
/// stable; lookup is by tag either way.
static ITEM_DECODERS: LazyLock<IndexMap<&'static str, ItemDecoder>> = LazyLock::new(|| {
    IndexMap::from([
        ("junction", junction as ItemDecoder),
        ("no_connect", no_connect),
        ("wire", wire),
        ("bus", bus),
        ("polyline", polyline),
        ("text", text),
        ("label", label),
        ("global_label", global_label),
        ("hierarchical_label", hierarchical_label),
        ("symbol", symbol_instance),
    ])
});

/// Decodes the `(kicad_sch ...)` root.
pub(crate) fn decode(root: &ListNode, options: &ParseOptions) -> Result<Schematic, SchemaError> {
    let mut r = ListReader::open(root)?;
    let version = common::number_child(&mut r, "version", options)?.unwrap_or(0.0) as u64;
    let generator = common::text_child(&mut r, "generator", options)?;
    let uuid = common::text_child(&mut r, "uuid", options)?;
    let paper = common::text_child(&mut r, "paper", options)?;

    let mut lib_symbols = Vec::new();
    if let Some(table) = r.child("lib_symbols") {
        let mut tr = ListReader::open(table)?;
        for def in tr.children("symbol") {
            lib_symbols.push(symbol::lib_symbol(def, options, false)?);
        }
        tr.finish(options, None)?;
    }

    let mut items = Vec::new();
    let mut unrecognized = Vec::new();
    for child in r.remaining_lists() {
        let Some(tag) = child.tag() else {
            handle_unknown(r.tag(), child, options, Some(&mut unrecognized))?;
            continue;
        };
        match ITEM_DECODERS.get(tag) {
            Some(decode) => items.push(decode(child, options)?),
            None => handle_unknown(r.tag(), child, options, Some(&mut unrecognized))?,
        }
    }

    r.finish(options, Some(&mut unrecognized))?;

    Ok(Schematic {
        version,
        generator,
        uuid,
        paper,
        lib_symbols,
        items,
        unrecognized,
    })
}

fn junction(node: &ListNode, options: &ParseOptions) -> Result<SchematicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let at = common::opt_at(&mut r, options)?;
    let diameter = common::number_child(&mut r, "diameter", options)?.unwrap_or(0.0);
    let color = match r.child("color") {
        Some(list) => {
            let color = common::color(list, options)?;
            (!color.is_transparent()).then_some(color)
        }
        None => None,
    };
    let uuid = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(SchematicItem::Junction(Junction {
        at,
        diameter,
        color,
        uuid,
    }))
}

fn no_connect(node: &ListNode, options: &ParseOptions) -> Result<SchematicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let at = common::opt_at(&mut r, options)?;
    let uuid = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(SchematicItem::NoConnect(NoConnect { at, uuid }))
}

fn wire_body(node: &ListNode, options: &ParseOptions) -> Result<Wire, SchemaError> {
    let mut r = ListReader::open(node)?;
    let points = match r.child("pts") {
        Some(list) => common::pts(list, options)?,
        None => Vec::new(),
    };
    let stroke = common::opt_stroke(&mut r, options)?;
    let uuid = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(Wire {
        points,
        stroke,
        uuid,
    })
}

fn wire(node: &ListNode, options: &ParseOptions) -> Result<SchematicItem, SchemaError> {
    Ok(SchematicItem::Wire(wire_body(node, options)?))
}

fn bus(node: &ListNode, options: &ParseOptions) -> Result<SchematicItem, SchemaError> {
    Ok(SchematicItem::Bus(wire_body(node, options)?))
}

fn polyline(node: &ListNode, options: &ParseOptions) -> Result<SchematicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let points = match r.child("pts") {
        Some(list) => common::pts(list, options)?,
        None => Vec::new(),
    };
    let stroke = common::opt_stroke(&mut r, options)?;
    let uuid = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(SchematicItem::Polyline(SchPolyline {
        points,
        stroke,
        uuid,
    }))
}

fn text(node: &ListNode, options: &ParseOptions) -> Result<SchematicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let content = r.string("text")?;
    let at = common::opt_at(&mut r, options)?;
    let effects = common::opt_effects(&mut r, options)?;
    let uuid = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(SchematicItem::Text(SchText {
        text: content,
        at,
        effects,
        uuid,
    }))
}

fn label(node: &ListNode, options: &ParseOptions) -> Result<SchematicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let content = r.string("text")?;
    let at = common::opt_at(&mut r, options)?;
    let effects = common::opt_effects(&mut r, options)?;
    let uuid = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(SchematicItem::Label(Label {
        text: content,
        at,
        effects,
        uuid,
    }))
}

fn shaped_label(node: &ListNode, options: &ParseOptions) -> Result<GlobalLabel, SchemaError> {
    let mut r = ListReader::open(node)?;
    let content = r.string("text")?;
    // Connection shapes drive pin-compatibility checks downstream, so an
    // unknown shape is a hard error rather than a default.
    let shape = match r.child("shape") {
        Some(list) => {
            let mut sr = ListReader::open(list)?;
            let shape = sr.enum_atom("shape")?;
            sr.finish(options, None)?;
            shape
        }
        None => Default::default(),
    };
    let at = common::opt_at(&mut r, options)?;
    let effects = common::opt_effects(&mut r, options)?;
    let uuid = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(GlobalLabel {
        text: content,
        shape,
        at,
        effects,
        uuid,
    })
}

fn global_label(node: &ListNode, options: &ParseOptions) -> Result<SchematicItem, SchemaError> {
    Ok(SchematicItem::GlobalLabel(shaped_label(node, options)?))
}

fn hierarchical_label(
    node: &ListNode,
    options: &ParseOptions,
) -> Result<SchematicItem, SchemaError> {
    Ok(SchematicItem::HierarchicalLabel(shaped_label(node, options)?))
}

fn symbol_instance(node: &ListNode, options: &ParseOptions) -> Result<SchematicItem, SchemaError> {
    let mut r = ListReader::open(node)?;
    let lib_id = common::text_child(&mut r, "lib_id", options)?.unwrap_or_default();
    let at = common::opt_at(&mut r, options)?;
    let mirror = match r.child("mirror") {
        Some(list) => {
            let mut mr = ListReader::open(list)?;
            let mirror = mr.enum_atom("axis")?;
            mr.finish(options, None)?;
            mirror
        }
        None => Default::default(),
    };
    let unit = common::number_child(&mut r, "unit", options)?.unwrap_or(1.0) as i64;
    let in_bom = r.bool_child("in_bom", true)?;
    let on_board = r.bool_child("on_board", true)?;
    let uuid = uuid(&mut r, options)?;

    let mut properties = Vec::new();
    for prop in r.children("property") {
        properties.push(common::property(prop, options)?);
    }

    r.finish(options, None)?;
    Ok(SchematicItem::Symbol(SymbolInstance {
        lib_id,
        at,
        mirror,
        unit,
        in_bom,
        on_board,
        uuid,
        properties,
    }))
}

pub(crate) fn uuid(
    r: &mut ListReader<'_>,
    options: &ParseOptions,
) -> Result<Option<String>, SchemaError> {
    common::text_child(r, "uuid", options)
}
