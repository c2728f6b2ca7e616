//! Stroke, fill and text-effect definitions.
//!
//! These records mirror the style sub-lists that appear throughout the
//! format: `(stroke ...)`, `(fill ...)` and `(effects ...)`. Every field
//! has a sensible default so that records decoded from sources that omit
//! a style sub-list render the same way KiCad renders them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// An RGBA color as stored in the format: integer 0-255 channels and a
/// fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// A fully transparent color means "use the theme default" in KiCad
    /// sources; renderers check this before applying the color.
    pub fn is_transparent(&self) -> bool {
        self.a == 0.0
    }
}

/// Line pattern of a stroke.
///
/// `Default` defers to the renderer's theme. Unrecognized values fall back
/// to `Default` rather than failing, since this vocabulary has grown
/// across format revisions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeStyle {
    #[default]
    Default,
    Solid,
    Dash,
    DashDot,
    DashDotDot,
    Dot,
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "solid" => Ok(Self::Solid),
            "dash" => Ok(Self::Dash),
            "dash_dot" => Ok(Self::DashDot),
            "dash_dot_dot" => Ok(Self::DashDotDot),
            "dot" => Ok(Self::Dot),
            _ => Err(format!(
                "invalid stroke style `{s}`, valid values: default, solid, dash, dash_dot, dash_dot_dot, dot"
            )),
        }
    }
}

/// Outline style for drawable items, the `(stroke ...)` sub-list.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Line width in millimetres. `0` means the renderer's default width.
    pub width: f64,
    pub style: StrokeStyle,
    /// Absent or transparent means the theme color.
    pub color: Option<Color>,
}

/// How the interior of a closed shape is painted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillKind {
    #[default]
    None,
    Outline,
    Background,
    Color,
}

impl FromStr for FillKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "outline" => Ok(Self::Outline),
            "background" => Ok(Self::Background),
            "color" => Ok(Self::Color),
            _ => Err(format!(
                "invalid fill type `{s}`, valid values: none, outline, background, color"
            )),
        }
    }
}

/// Fill style for closed shapes, the `(fill (type ...))` sub-list.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub kind: FillKind,
    /// Only meaningful when `kind` is [`FillKind::Color`].
    pub color: Option<Color>,
}

/// Horizontal text anchoring.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalJustify {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical text anchoring.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalJustify {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Text alignment and mirroring, the `(justify ...)` sub-list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Justify {
    pub horizontal: HorizontalJustify,
    pub vertical: VerticalJustify,
    pub mirror: bool,
}

/// Font settings, the `(font ...)` sub-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Glyph size as (width, height) in millimetres.
    pub size: Vec2,
    pub thickness: Option<f64>,
    pub bold: bool,
    pub italic: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            // KiCad's default text size is 1.27mm (50 mil).
            size: Vec2::new(1.27, 1.27),
            thickness: None,
            bold: false,
            italic: false,
        }
    }
}

/// Text presentation bundle, the `(effects ...)` sub-list.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEffects {
    pub font: Font,
    pub justify: Justify,
    pub hide: bool,
}
