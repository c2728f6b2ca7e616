//! Decoder for KiCad s-expression design files.
//!
//! This crate turns the raw text of a `.kicad_sch` or `.kicad_pcb` file
//! into the typed document graph defined in [`copperline_core`]. The
//! pipeline runs in three stages, strictly one way:
//!
//! 1. [`tokenizer`] — lexes the text into a lazy token stream
//! 2. [`tree`] — assembles tokens into one balanced list tree
//! 3. schema mapping — decodes the tree into typed records by tag
//!
//! The entry points are [`parse`] and [`parse_with`]. Parsing is
//! synchronous, performs no I/O, touches no shared state, and fails fast:
//! the first lexical, structural or schema error aborts the parse.
//!
//! ```
//! let source = "(kicad_sch (version 9) (junction (at 10 20)))";
//! let document = copperline_parser::parse(source).unwrap();
//! assert_eq!(document.kind_name(), "schematic");
//! ```

pub mod error;
pub mod span;
pub mod tokenizer;
pub mod tree;

mod reader;
mod schema;

use copperline_core::Document;

use crate::{error::ParseError, tokenizer::Tokenizer, tree::build_tree};

/// How the decoder treats children the schema does not describe.
///
/// This is forward-compatibility policy, not error suppression: anything
/// the schema *does* describe is always validated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Drop unrecognized children, logging each at debug level.
    #[default]
    Permissive,
    /// Keep unrecognized children as opaque s-expression text in the
    /// owning container's `unrecognized` bag.
    Capture,
    /// Fail on the first unrecognized child.
    Strict,
}

/// Decode configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub strictness: Strictness,
}

/// Decodes a complete design file with default options.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    parse_with(source, &ParseOptions::default())
}

/// Decodes a complete design file.
///
/// The root tag selects the document kind: `kicad_sch` decodes to a
/// schematic, `kicad_pcb` to a board. Any other root tag is a
/// [`error::SchemaError::UnknownTag`].
pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    let root = build_tree(Tokenizer::new(source))?;
    schema::decode_document(&root, options).map_err(Into::into)
}
