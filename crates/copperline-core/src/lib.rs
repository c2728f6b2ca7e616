//! Copperline Core Types
//!
//! This crate provides the document model for decoded KiCad design files.
//! It includes:
//!
//! - **Geometry**: positions and sizes ([`geometry`] module)
//! - **Style**: stroke, fill and text-effect definitions ([`style`] module)
//! - **Symbols**: library symbols, pins and graphic primitives
//!   ([`symbol`] module)
//! - **Schematic**: the schematic document graph ([`schematic`] module)
//! - **Board**: the board document graph ([`board`] module)
//!
//! The types here are plain owned records: a container owns its children
//! outright, and cross-references (a placed symbol naming its library
//! symbol) are string lookups rather than pointers, so dropping a root
//! always drops its entire subtree. Records are produced by the
//! `copperline-parser` crate and are not mutated afterwards.

pub mod board;
pub mod geometry;
pub mod property;
pub mod schematic;
pub mod style;
pub mod symbol;

use serde::{Deserialize, Serialize};

use crate::{board::Board, schematic::Schematic};

/// A fully decoded design file: either a schematic or a board.
///
/// This is the root type returned by the decoder. The variant is selected
/// by the document's top-level tag (`kicad_sch` or `kicad_pcb`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Document {
    Schematic(Schematic),
    Board(Board),
}

impl Document {
    /// Returns a short human-readable name for the document kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Schematic(_) => "schematic",
            Self::Board(_) => "board",
        }
    }

    /// Returns the file format version recorded in the document.
    pub fn version(&self) -> u64 {
        match self {
            Self::Schematic(sch) => sch.version,
            Self::Board(board) => board.version,
        }
    }
}
