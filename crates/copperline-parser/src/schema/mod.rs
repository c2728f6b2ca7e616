//! Schema-driven mapping from list trees to typed records.
//!
//! This is the dialect-specific heart of the decoder. Each record type has
//! a decode function built on [`ListReader`](crate::reader::ListReader);
//! polymorphic positions (schematic items, board items, symbol drawing
//! lists) dispatch purely by tag through ordered registries. Adding a new
//! item kind means adding a variant, a decode function, and a registry
//! entry — never touching a dispatch chain.

mod board;
mod common;
mod schematic;
mod symbol;

use copperline_core::Document;
use log::debug;

use crate::{
    ParseOptions, Strictness,
    error::SchemaError,
    tree::ListNode,
};

/// Decodes the document root, selecting board or schematic by tag.
pub(crate) fn decode_document(
    root: &ListNode,
    options: &ParseOptions,
) -> Result<Document, SchemaError> {
    let Some(tag) = root.tag() else {
        return Err(SchemaError::MissingTag { span: root.span });
    };

    match tag {
        "kicad_sch" => Ok(Document::Schematic(schematic::decode(root, options)?)),
        "kicad_pcb" => Ok(Document::Board(board::decode(root, options)?)),
        other => Err(SchemaError::UnknownTag {
            tag: other.to_string(),
            context: "document root (kicad_sch or kicad_pcb)",
            span: root.span,
        }),
    }
}

/// Applies the unknown-child policy to one sub-list a container's schema
/// does not describe.
pub(crate) fn handle_unknown(
    parent: &str,
    node: &ListNode,
    options: &ParseOptions,
    sink: Option<&mut Vec<String>>,
) -> Result<(), SchemaError> {
    let tag = node.tag().unwrap_or("<untagged>");
    match options.strictness {
        Strictness::Strict => Err(SchemaError::UnrecognizedChild {
            tag: tag.to_string(),
            parent: parent.to_string(),
            span: node.span,
        }),
        Strictness::Capture => {
            if let Some(sink) = sink {
                sink.push(node.render());
            } else {
                debug!(parent = parent, child = tag; "no passthrough bag, dropping unrecognized child");
            }
            Ok(())
        }
        Strictness::Permissive => {
            debug!(parent = parent, child = tag; "ignoring unrecognized child");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tokenizer::Tokenizer, tree::build_tree};

    fn root(input: &str) -> ListNode {
        build_tree(Tokenizer::new(input)).unwrap()
    }

    #[test]
    fn test_root_dispatch_rejects_unknown_tag() {
        let err = decode_document(&root("(kicad_wks (version 9))"), &ParseOptions::default())
            .unwrap_err();
        match err {
            SchemaError::UnknownTag { tag, .. } => assert_eq!(tag, "kicad_wks"),
            other => panic!("expected UnknownTag, got {other:?}"),
        }
    }

    #[test]
    fn test_root_dispatch_requires_tag() {
        let err = decode_document(&root("(1 2 3)"), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingTag { .. }));
    }
}
