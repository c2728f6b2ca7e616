//! Error types for the decoding pipeline.
//!
//! Each pipeline stage has its own error enum — [`LexError`] from
//! tokenizing, [`StructureError`] from tree building, [`SchemaError`] from
//! schema mapping — and [`ParseError`] wraps all three for the public API.
//! Every stage fails fast: the first error aborts the whole parse, because
//! a renderer cannot safely walk a partially-typed graph.

use thiserror::Error;

use crate::span::Span;

/// A lexical error: the character stream could not be tokenized.
///
/// Carries the byte offset and a short context window (the enclosing
/// line, or the next 20 characters when no newline is nearby). The
/// context is diagnostic only; lexing never recovers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character `{ch}` at offset {offset}: {context}")]
    UnexpectedChar {
        ch: char,
        offset: usize,
        context: String,
    },

    #[error("unterminated {kind} at end of input (started at offset {start}): {context}")]
    UnterminatedToken {
        /// Which token was in progress. In practice only a string can be
        /// unterminated; bare tokens are flushed at end of input.
        kind: &'static str,
        start: usize,
        context: String,
    },

    #[error("malformed number `{text}` at offset {offset}")]
    InvalidNumber { text: String, offset: usize },
}

impl LexError {
    /// The span of the offending text.
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar { offset, ch, .. } => Span::new(*offset, offset + ch.len_utf8()),
            Self::UnterminatedToken { start, .. } => Span::at(*start),
            Self::InvalidNumber { offset, text } => Span::new(*offset, offset + text.len()),
        }
    }
}

/// A structural error: tokens did not form exactly one balanced group.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    #[error("unmatched closing paren at offset {offset}")]
    UnmatchedClose { offset: usize },

    #[error("unterminated group at end of input (opened at offset {start})")]
    UnterminatedGroup { start: usize },

    #[error("document contains no top-level group")]
    EmptyDocument,

    #[error("document contains more than one top-level group (second starts at offset {offset})")]
    MultipleRoots { offset: usize },

    #[error("token outside of any group at offset {offset}")]
    TokenOutsideGroup { offset: usize },
}

impl StructureError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnmatchedClose { offset } => Span::new(*offset, offset + 1),
            Self::UnterminatedGroup { start } => Span::new(*start, start + 1),
            Self::EmptyDocument => Span::at(0),
            Self::MultipleRoots { offset } => Span::new(*offset, offset + 1),
            Self::TokenOutsideGroup { offset } => Span::at(*offset),
        }
    }
}

/// A schema-mapping error: the tree is well formed but does not match the
/// record shapes the dialect defines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("unknown tag `{tag}` where a {context} was required")]
    UnknownTag {
        tag: String,
        /// What kind of record was expected at this position.
        context: &'static str,
        span: Span,
    },

    #[error("list has no leading identifier tag")]
    MissingTag { span: Span },

    #[error("field `{field}` of `{tag}`: expected {expected}, found {found}")]
    TypeMismatch {
        tag: String,
        field: &'static str,
        expected: &'static str,
        found: String,
        span: Span,
    },

    #[error("missing required field `{field}` of `{tag}`")]
    MissingField {
        tag: String,
        field: &'static str,
        span: Span,
    },

    #[error("field `{field}` of `{tag}`: {message}")]
    InvalidEnum {
        tag: String,
        field: &'static str,
        /// The vocabulary error produced by the enum's `FromStr`.
        message: String,
        span: Span,
    },

    #[error("unsupported item `{tag}` in {slot}")]
    UnsupportedItem {
        tag: String,
        /// Which polymorphic slot rejected the tag.
        slot: &'static str,
        span: Span,
    },

    #[error("unrecognized child `{tag}` of `{parent}` (strict mode)")]
    UnrecognizedChild {
        tag: String,
        parent: String,
        span: Span,
    },
}

impl SchemaError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnknownTag { span, .. }
            | Self::MissingTag { span }
            | Self::TypeMismatch { span, .. }
            | Self::MissingField { span, .. }
            | Self::InvalidEnum { span, .. }
            | Self::UnsupportedItem { span, .. }
            | Self::UnrecognizedChild { span, .. } => *span,
        }
    }
}

/// Any failure of the decoding pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ParseError {
    /// The source span the error points at, for diagnostic rendering.
    pub fn span(&self) -> Span {
        match self {
            Self::Lex(e) => e.span(),
            Self::Structure(e) => e.span(),
            Self::Schema(e) => e.span(),
        }
    }
}
