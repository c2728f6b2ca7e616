//! Decoders for `kicad_pcb` documents: layer table, nets, footprints with
//! their pads, tracks, vias, and the `gr_*`/`fp_*` drawing items.

use std::sync::LazyLock;

use copperline_core::board::{
    Board, BoardGraphic, BoardShape, Drill, Footprint, Layer, Net, Pad, Segment, Via,
};
use indexmap::IndexMap;

use crate::{
    ParseOptions,
    error::SchemaError,
    reader::ListReader,
    schema::{common, handle_unknown, schematic::uuid},
    tree::ListNode,
};

type ShapeDecoder = fn(&mut ListReader<'_>, &ParseOptions) -> Result<BoardShape, SchemaError>;

/// Shape decoders shared by the `gr_*` (board-level) and `fp_*`
/// (footprint-level) tag families. Each entry maps the suffix; the caller
/// strips the prefix before lookup.
static SHAPE_DECODERS: LazyLock<IndexMap<&'static str, ShapeDecoder>> = LazyLock::new(|| {
    IndexMap::from([
        ("line", shape_line as ShapeDecoder),
        ("rect", shape_rect),
        ("circle", shape_circle),
        ("arc", shape_arc),
        ("poly", shape_poly),
        ("text", shape_text),
    ])
});

fn shape_line(r: &mut ListReader<'_>, options: &ParseOptions) -> Result<BoardShape, SchemaError> {
    let start = common::point_child(r, "start", options)?.ok_or_else(|| missing(r, "start"))?;
    let end = common::point_child(r, "end", options)?.ok_or_else(|| missing(r, "end"))?;
    Ok(BoardShape::Line { start, end })
}

fn shape_rect(r: &mut ListReader<'_>, options: &ParseOptions) -> Result<BoardShape, SchemaError> {
    let start = common::point_child(r, "start", options)?.ok_or_else(|| missing(r, "start"))?;
    let end = common::point_child(r, "end", options)?.ok_or_else(|| missing(r, "end"))?;
    Ok(BoardShape::Rect { start, end })
}

fn shape_circle(r: &mut ListReader<'_>, options: &ParseOptions) -> Result<BoardShape, SchemaError> {
    let center =
        common::point_child(r, "center", options)?.ok_or_else(|| missing(r, "center"))?;
    let end = common::point_child(r, "end", options)?.ok_or_else(|| missing(r, "end"))?;
    Ok(BoardShape::Circle { center, end })
}

fn shape_arc(r: &mut ListReader<'_>, options: &ParseOptions) -> Result<BoardShape, SchemaError> {
    let start = common::point_child(r, "start", options)?.ok_or_else(|| missing(r, "start"))?;
    let mid = common::point_child(r, "mid", options)?.ok_or_else(|| missing(r, "mid"))?;
    let end = common::point_child(r, "end", options)?.ok_or_else(|| missing(r, "end"))?;
    Ok(BoardShape::Arc { start, mid, end })
}

fn shape_poly(r: &mut ListReader<'_>, options: &ParseOptions) -> Result<BoardShape, SchemaError> {
    let points = match r.child("pts") {
        Some(list) => common::pts(list, options)?,
        None => Vec::new(),
    };
    Ok(BoardShape::Poly { points })
}

fn shape_text(r: &mut ListReader<'_>, options: &ParseOptions) -> Result<BoardShape, SchemaError> {
    // fp_text writes a leading kind atom before the string.
    let _ = r.flag("reference") || r.flag("value") || r.flag("user");
    let text = r.string("text")?;
    let at = common::opt_at(r, options)?;
    let effects = common::opt_effects(r, options)?;
    Ok(BoardShape::Text { text, at, effects })
}

fn missing(r: &ListReader<'_>, field: &'static str) -> SchemaError {
    SchemaError::MissingField {
        tag: r.tag().to_string(),
        field,
        span: r.span(),
    }
}

/// Decodes one drawing item whose tag carries the given family prefix
/// (`gr_` or `fp_`). Returns `None` when the tag is not in the family.
fn graphic(
    node: &ListNode,
    prefix: &str,
    options: &ParseOptions,
) -> Result<Option<BoardGraphic>, SchemaError> {
    let Some(tag) = node.tag() else {
        return Ok(None);
    };
    let Some(suffix) = tag.strip_prefix(prefix) else {
        return Ok(None);
    };
    let Some(decode) = SHAPE_DECODERS.get(suffix) else {
        return Ok(None);
    };

    let mut r = ListReader::open(node)?;
    let shape = decode(&mut r, options)?;
    let layer = common::text_child(&mut r, "layer", options)?.unwrap_or_default();
    let stroke = common::opt_stroke(&mut r, options)?;
    // Older sources write (width w) instead of a stroke list.
    let stroke = match common::number_child(&mut r, "width", options)? {
        Some(width) if stroke.width == 0.0 => copperline_core::style::Stroke {
            width,
            ..stroke
        },
        _ => stroke,
    };
    let _ = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(Some(BoardGraphic {
        shape,
        layer,
        stroke,
    }))
}

/// Decodes the `(kicad_pcb ...)` root.
pub(crate) fn decode(root: &ListNode, options: &ParseOptions) -> Result<Board, SchemaError> {
    let mut r = ListReader::open(root)?;
    let version = common::number_child(&mut r, "version", options)?.unwrap_or(0.0) as u64;
    let generator = common::text_child(&mut r, "generator", options)?;

    let mut layers = Vec::new();
    if let Some(table) = r.child("layers") {
        let mut tr = ListReader::open(table)?;
        for entry in tr.remaining_lists() {
            layers.push(layer(entry)?);
        }
        tr.finish(options, None)?;
    }

    let mut nets = Vec::new();
    for entry in r.children("net") {
        nets.push(net(entry, options)?);
    }

    let mut footprints = Vec::new();
    let mut segments = Vec::new();
    let mut vias = Vec::new();
    let mut graphics = Vec::new();
    let mut unrecognized = Vec::new();

    for child in r.remaining_lists() {
        match child.tag() {
            Some("footprint") => footprints.push(footprint(child, options)?),
            Some("segment") => segments.push(segment(child, options)?),
            Some("via") => vias.push(via(child, options)?),
            _ => match graphic(child, "gr_", options)? {
                Some(item) => graphics.push(item),
                None => handle_unknown(r.tag(), child, options, Some(&mut unrecognized))?,
            },
        }
    }

    r.finish(options, Some(&mut unrecognized))?;

    Ok(Board {
        version,
        generator,
        layers,
        nets,
        footprints,
        segments,
        vias,
        graphics,
        unrecognized,
    })
}

/// Decodes one layer-table entry, `(0 "F.Cu" signal [ "user name" ])`.
/// These lists start with a number, not a tag.
fn layer(node: &ListNode) -> Result<Layer, SchemaError> {
    let mut r = ListReader::open_untagged(node, "layer entry");
    let ordinal = r.integer("ordinal")?;
    let name = r.string("name")?;
    let kind = r.enum_atom_or_default("kind");
    let user_name = r.opt_text();
    Ok(Layer {
        ordinal,
        name,
        kind,
        user_name,
    })
}

fn net(node: &ListNode, options: &ParseOptions) -> Result<Net, SchemaError> {
    let mut r = ListReader::open(node)?;
    let number = r.integer("number")?;
    // Net 0 is the unconnected net and is written with an empty name.
    let name = r.opt_text().unwrap_or_default();
    r.finish(options, None)?;
    Ok(Net { number, name })
}

fn drill(node: &ListNode, options: &ParseOptions) -> Result<Drill, SchemaError> {
    let mut r = ListReader::open(node)?;
    let oval = r.flag("oval");
    let diameter = r.number("diameter")?;
    let width = r.maybe_number();
    r.finish(options, None)?;
    Ok(Drill {
        diameter,
        width,
        oval,
    })
}

fn pad(node: &ListNode, options: &ParseOptions) -> Result<Pad, SchemaError> {
    let mut r = ListReader::open(node)?;
    let number = r.text("number")?;
    // Pad kind and shape are closed vocabularies: a value outside them
    // means the pad cannot be fabricated as written.
    let kind = r.enum_atom("type")?;
    let shape = r.enum_atom("shape")?;
    let at = common::opt_at(&mut r, options)?;
    let size = match r.child("size") {
        Some(list) => {
            let mut sr = ListReader::open(list)?;
            let w = sr.number("width")?;
            let h = sr.number("height")?;
            sr.finish(options, None)?;
            copperline_core::geometry::Vec2::new(w, h)
        }
        None => copperline_core::geometry::Vec2::default(),
    };
    let drill = match r.child("drill") {
        Some(list) => Some(drill(list, options)?),
        None => None,
    };
    let layers = match r.child("layers") {
        Some(list) => ListReader::open(list)?.rest_texts(),
        None => Vec::new(),
    };
    let net = match r.child("net") {
        Some(list) => Some(self::net(list, options)?),
        None => None,
    };
    let _ = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(Pad {
        number,
        kind,
        shape,
        at,
        size,
        drill,
        layers,
        net,
    })
}

fn footprint(node: &ListNode, options: &ParseOptions) -> Result<Footprint, SchemaError> {
    let mut r = ListReader::open(node)?;
    let lib_id = r.text("lib_id")?;
    let layer = common::text_child(&mut r, "layer", options)?.unwrap_or_default();
    let at = common::opt_at(&mut r, options)?;
    // Sources older than format revision 2024 write (tstamp ...) where
    // newer ones write (uuid ...).
    let id = match uuid(&mut r, options)? {
        Some(id) => Some(id),
        None => common::text_child(&mut r, "tstamp", options)?,
    };

    let mut properties = Vec::new();
    for prop in r.children("property") {
        properties.push(common::property(prop, options)?);
    }

    let mut pads = Vec::new();
    let mut graphics = Vec::new();
    let mut unrecognized = Vec::new();
    for child in r.remaining_lists() {
        match child.tag() {
            Some("pad") => pads.push(pad(child, options)?),
            _ => match graphic(child, "fp_", options)? {
                Some(item) => graphics.push(item),
                None => handle_unknown(r.tag(), child, options, Some(&mut unrecognized))?,
            },
        }
    }

    r.finish(options, Some(&mut unrecognized))?;

    Ok(Footprint {
        lib_id,
        layer,
        at,
        uuid: id,
        properties,
        pads,
        graphics,
        unrecognized,
    })
}

fn segment(node: &ListNode, options: &ParseOptions) -> Result<Segment, SchemaError> {
    let mut r = ListReader::open(node)?;
    let start = common::point_child(&mut r, "start", options)?.ok_or_else(|| missing(&r, "start"))?;
    let end = common::point_child(&mut r, "end", options)?.ok_or_else(|| missing(&r, "end"))?;
    let width = common::number_child(&mut r, "width", options)?.unwrap_or(0.0);
    let layer = common::text_child(&mut r, "layer", options)?.unwrap_or_default();
    let net = common::number_child(&mut r, "net", options)?.unwrap_or(0.0) as i64;
    let id = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(Segment {
        start,
        end,
        width,
        layer,
        net,
        uuid: id,
    })
}

fn via(node: &ListNode, options: &ParseOptions) -> Result<Via, SchemaError> {
    let mut r = ListReader::open(node)?;
    let at = common::opt_at(&mut r, options)?;
    let size = common::number_child(&mut r, "size", options)?.unwrap_or(0.0);
    let drill = common::number_child(&mut r, "drill", options)?.unwrap_or(0.0);
    let layers = match r.child("layers") {
        Some(list) => ListReader::open(list)?.rest_texts(),
        None => Vec::new(),
    };
    let net = common::number_child(&mut r, "net", options)?.unwrap_or(0.0) as i64;
    let id = uuid(&mut r, options)?;
    r.finish(options, None)?;
    Ok(Via {
        at,
        size,
        drill,
        layers,
        net,
        uuid: id,
    })
}
