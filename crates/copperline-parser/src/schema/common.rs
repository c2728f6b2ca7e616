//! Decoders for the style and geometry sub-lists shared by every record:
//! `(at ...)`, `(xy ...)`, `(stroke ...)`, `(fill ...)`, `(effects ...)`,
//! `(color ...)` and `(property ...)`.

use copperline_core::{
    geometry::{At, Vec2},
    property::Property,
    style::{
        Color, Fill, FillKind, Font, HorizontalJustify, Justify, Stroke, StrokeStyle, TextEffects,
        VerticalJustify,
    },
};
use log::debug;

use crate::{ParseOptions, error::SchemaError, reader::ListReader, tree::ListNode};

/// Decodes `(at x y [rotation])`; a missing rotation defaults to 0.
pub(crate) fn at(node: &ListNode, options: &ParseOptions) -> Result<At, SchemaError> {
    let mut r = ListReader::open(node)?;
    let x = r.number("x")?;
    let y = r.number("y")?;
    let rotation = r.opt_number(0.0);
    r.finish(options, None)?;
    Ok(At::new(x, y, rotation))
}

/// Decodes `(xy x y)`.
pub(crate) fn xy(node: &ListNode, options: &ParseOptions) -> Result<Vec2, SchemaError> {
    let mut r = ListReader::open(node)?;
    let x = r.number("x")?;
    let y = r.number("y")?;
    r.finish(options, None)?;
    Ok(Vec2::new(x, y))
}

/// Decodes `(pts (xy ...) (xy ...) ...)` in source order.
pub(crate) fn pts(node: &ListNode, options: &ParseOptions) -> Result<Vec<Vec2>, SchemaError> {
    let mut r = ListReader::open(node)?;
    let mut points = Vec::new();
    for point in r.children("xy") {
        points.push(xy(point, options)?);
    }
    r.finish(options, None)?;
    Ok(points)
}

/// Decodes `(color r g b a)`.
pub(crate) fn color(node: &ListNode, options: &ParseOptions) -> Result<Color, SchemaError> {
    let mut r = ListReader::open(node)?;
    let red = r.number("r")?;
    let green = r.number("g")?;
    let blue = r.number("b")?;
    let alpha = r.opt_number(0.0);
    r.finish(options, None)?;
    Ok(Color::new(red, green, blue, alpha))
}

/// Decodes `(stroke (width w) (type t) (color ...))`. Every sub-list is
/// optional; absent fields take the theme defaults.
pub(crate) fn stroke(node: &ListNode, options: &ParseOptions) -> Result<Stroke, SchemaError> {
    let mut r = ListReader::open(node)?;
    let width = number_child(&mut r, "width", options)?.unwrap_or(0.0);
    let style = match r.child("type") {
        Some(list) => {
            let mut tr = ListReader::open(list)?;
            // Stroke styles are a growing vocabulary; unknown values
            // fall back to the theme default instead of failing.
            let style = tr.enum_atom_or_default::<StrokeStyle>("type");
            tr.finish(options, None)?;
            style
        }
        None => StrokeStyle::Default,
    };
    let color = match r.child("color") {
        Some(list) => Some(color(list, options)?),
        None => None,
    };
    r.finish(options, None)?;
    Ok(Stroke {
        width,
        style,
        color,
    })
}

/// Decodes `(fill (type t) [(color ...)])`.
pub(crate) fn fill(node: &ListNode, options: &ParseOptions) -> Result<Fill, SchemaError> {
    let mut r = ListReader::open(node)?;
    let kind = match r.child("type") {
        Some(list) => {
            let mut tr = ListReader::open(list)?;
            let kind = tr.enum_atom_or_default::<FillKind>("type");
            tr.finish(options, None)?;
            kind
        }
        None => FillKind::None,
    };
    let fill_color = match r.child("color") {
        Some(list) => Some(color(list, options)?),
        None => None,
    };
    r.finish(options, None)?;
    Ok(Fill {
        kind,
        color: fill_color,
    })
}

/// Decodes `(effects (font ...) (justify ...) [hide])`.
pub(crate) fn effects(node: &ListNode, options: &ParseOptions) -> Result<TextEffects, SchemaError> {
    let mut r = ListReader::open(node)?;

    let font = match r.child("font") {
        Some(list) => {
            let mut fr = ListReader::open(list)?;
            let size = match fr.child("size") {
                Some(size_list) => {
                    let mut sr = ListReader::open(size_list)?;
                    // The format writes (size height width).
                    let height = sr.number("height")?;
                    let width = sr.number("width")?;
                    sr.finish(options, None)?;
                    Vec2::new(width, height)
                }
                None => Font::default().size,
            };
            let thickness = number_child(&mut fr, "thickness", options)?;
            let bold = fr.flag("bold") || fr.bool_child("bold", false)?;
            let italic = fr.flag("italic") || fr.bool_child("italic", false)?;
            fr.finish(options, None)?;
            Font {
                size,
                thickness,
                bold,
                italic,
            }
        }
        None => Font::default(),
    };

    let justify = match r.child("justify") {
        Some(list) => {
            let mut jr = ListReader::open(list)?;
            let mut justify = Justify::default();
            // The justify list is a bare sequence of alignment atoms in
            // any order, e.g. `(justify left bottom mirror)`.
            for word in jr.rest_texts() {
                match word.as_str() {
                    "left" => justify.horizontal = HorizontalJustify::Left,
                    "right" => justify.horizontal = HorizontalJustify::Right,
                    "top" => justify.vertical = VerticalJustify::Top,
                    "bottom" => justify.vertical = VerticalJustify::Bottom,
                    "mirror" => justify.mirror = true,
                    other => {
                        debug!(value = other; "ignoring unknown justify keyword");
                    }
                }
            }
            jr.finish(options, None)?;
            justify
        }
        None => Justify::default(),
    };

    let hide = r.flag("hide") || r.bool_child("hide", false)?;
    r.finish(options, None)?;

    Ok(TextEffects {
        font,
        justify,
        hide,
    })
}

/// Decodes `(property "Key" "Value" (at ...) (effects ...))`.
pub(crate) fn property(node: &ListNode, options: &ParseOptions) -> Result<Property, SchemaError> {
    let mut r = ListReader::open(node)?;
    let key = r.string("key")?;
    let value = r.string("value")?;
    let at = opt_at(&mut r, options)?;
    let effects = opt_effects(&mut r, options)?;
    r.finish(options, None)?;
    Ok(Property {
        key,
        value,
        at,
        effects,
    })
}

/// Reads an optional `(at ...)` child, defaulting to the origin.
pub(crate) fn opt_at(r: &mut ListReader<'_>, options: &ParseOptions) -> Result<At, SchemaError> {
    match r.child("at") {
        Some(list) => at(list, options),
        None => Ok(At::default()),
    }
}

/// Reads an optional `(effects ...)` child, defaulting to plain text.
pub(crate) fn opt_effects(
    r: &mut ListReader<'_>,
    options: &ParseOptions,
) -> Result<TextEffects, SchemaError> {
    match r.child("effects") {
        Some(list) => effects(list, options),
        None => Ok(TextEffects::default()),
    }
}

/// Reads an optional `(stroke ...)` child, defaulting to the theme stroke.
pub(crate) fn opt_stroke(
    r: &mut ListReader<'_>,
    options: &ParseOptions,
) -> Result<Stroke, SchemaError> {
    match r.child("stroke") {
        Some(list) => stroke(list, options),
        None => Ok(Stroke::default()),
    }
}

/// Reads an optional `(fill ...)` child, defaulting to no fill.
pub(crate) fn opt_fill(
    r: &mut ListReader<'_>,
    options: &ParseOptions,
) -> Result<Fill, SchemaError> {
    match r.child("fill") {
        Some(list) => fill(list, options),
        None => Ok(Fill::default()),
    }
}

/// Reads a `(tag value)` child whose single field is a number.
pub(crate) fn number_child(
    r: &mut ListReader<'_>,
    tag: &'static str,
    options: &ParseOptions,
) -> Result<Option<f64>, SchemaError> {
    match r.child(tag) {
        Some(list) => {
            let mut cr = ListReader::open(list)?;
            let value = cr.number("value")?;
            cr.finish(options, None)?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Reads a `(tag value)` child whose single field is text.
pub(crate) fn text_child(
    r: &mut ListReader<'_>,
    tag: &'static str,
    options: &ParseOptions,
) -> Result<Option<String>, SchemaError> {
    match r.child(tag) {
        Some(list) => {
            let mut cr = ListReader::open(list)?;
            let value = cr.text("value")?;
            cr.finish(options, None)?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Reads a `(tag (xy ...))`-style point child such as `(start x y)`.
pub(crate) fn point_child(
    r: &mut ListReader<'_>,
    tag: &'static str,
    options: &ParseOptions,
) -> Result<Option<Vec2>, SchemaError> {
    match r.child(tag) {
        Some(list) => {
            let mut pr = ListReader::open(list)?;
            let x = pr.number("x")?;
            let y = pr.number("y")?;
            pr.finish(options, None)?;
            Ok(Some(Vec2::new(x, y)))
        }
        None => Ok(None),
    }
}
