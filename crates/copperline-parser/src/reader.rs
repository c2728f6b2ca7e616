//! Field extraction over a single list node.
//!
//! [`ListReader`] is the engine behind every record decoder: it reads
//! positional fields in declared order, locates keyword sub-lists by tag,
//! collects repeated sub-lists in source order, validates enumerated
//! atoms, and tracks which children were consumed so that anything left
//! over can be dropped, captured, or rejected according to the configured
//! strictness.

use std::str::FromStr;

use log::debug;

use crate::{
    ParseOptions, Strictness,
    error::SchemaError,
    span::Span,
    tree::{ListNode, Node},
};

/// A cursor over one tagged list.
pub(crate) struct ListReader<'a> {
    node: &'a ListNode,
    tag: &'a str,
    /// Index of the next positional element (element 0 is the tag).
    cursor: usize,
    consumed: Vec<bool>,
}

impl<'a> ListReader<'a> {
    /// Opens a reader over a node, which must have a leading atom tag.
    pub fn open(node: &'a ListNode) -> Result<Self, SchemaError> {
        let tag = node.tag().ok_or(SchemaError::MissingTag { span: node.span })?;
        let mut consumed = vec![false; node.elements.len()];
        consumed[0] = true;
        Ok(Self {
            node,
            tag,
            cursor: 1,
            consumed,
        })
    }

    /// Opens a reader over a node with no leading tag, such as the
    /// board's layer-table entries `(0 "F.Cu" signal)`. The label is used
    /// in error messages in place of a tag.
    pub fn open_untagged(node: &'a ListNode, label: &'static str) -> Self {
        Self {
            node,
            tag: label,
            cursor: 0,
            consumed: vec![false; node.elements.len()],
        }
    }

    pub fn tag(&self) -> &str {
        self.tag
    }

    pub fn span(&self) -> Span {
        self.node.span
    }

    fn missing(&self, field: &'static str) -> SchemaError {
        SchemaError::MissingField {
            tag: self.tag.to_string(),
            field,
            span: self.node.span,
        }
    }

    fn mismatch(&self, field: &'static str, expected: &'static str, found: &Node) -> SchemaError {
        SchemaError::TypeMismatch {
            tag: self.tag.to_string(),
            field,
            expected,
            found: found.describe(),
            span: self.node.span,
        }
    }

    /// Elements consumed out of band (by [`flag`](Self::flag)) are
    /// skipped, so a leading flag atom does not shift positional fields.
    fn next_positional(&self) -> Option<&'a Node> {
        let mut idx = self.cursor;
        while matches!(self.consumed.get(idx), Some(true)) {
            idx += 1;
        }
        self.node.elements.get(idx)
    }

    fn take_positional(&mut self) -> &'a Node {
        while matches!(self.consumed.get(self.cursor), Some(true)) {
            self.cursor += 1;
        }
        let node = &self.node.elements[self.cursor];
        self.consumed[self.cursor] = true;
        self.cursor += 1;
        node
    }

    /// Required positional number.
    pub fn number(&mut self, field: &'static str) -> Result<f64, SchemaError> {
        match self.next_positional() {
            Some(Node::Number(v)) => {
                let v = *v;
                self.take_positional();
                Ok(v)
            }
            Some(other) => Err(self.mismatch(field, "number", other)),
            None => Err(self.missing(field)),
        }
    }

    /// Required positional number, truncated to an integer.
    pub fn integer(&mut self, field: &'static str) -> Result<i64, SchemaError> {
        Ok(self.number(field)? as i64)
    }

    /// Optional positional number, `None` when the next element is not a
    /// number.
    pub fn maybe_number(&mut self) -> Option<f64> {
        match self.next_positional() {
            Some(Node::Number(v)) => {
                let v = *v;
                self.take_positional();
                Some(v)
            }
            _ => None,
        }
    }

    /// Optional positional number with a default.
    pub fn opt_number(&mut self, default: f64) -> f64 {
        match self.next_positional() {
            Some(Node::Number(v)) => {
                let v = *v;
                self.take_positional();
                v
            }
            _ => default,
        }
    }

    /// Required positional quoted string.
    pub fn string(&mut self, field: &'static str) -> Result<String, SchemaError> {
        match self.next_positional() {
            Some(Node::Text(s)) => {
                let s = s.clone();
                self.take_positional();
                Ok(s)
            }
            Some(other) => Err(self.mismatch(field, "string", other)),
            None => Err(self.missing(field)),
        }
    }

    /// Required positional identifier.
    pub fn atom(&mut self, field: &'static str) -> Result<String, SchemaError> {
        match self.next_positional() {
            Some(Node::Atom(s)) => {
                let s = s.clone();
                self.take_positional();
                Ok(s)
            }
            Some(other) => Err(self.mismatch(field, "identifier", other)),
            None => Err(self.missing(field)),
        }
    }

    /// Required positional text: accepts either an identifier or a quoted
    /// string. Older format revisions wrote bare atoms where newer ones
    /// quote.
    pub fn text(&mut self, field: &'static str) -> Result<String, SchemaError> {
        match self.next_positional() {
            Some(Node::Atom(s)) | Some(Node::Text(s)) => {
                let s = s.clone();
                self.take_positional();
                Ok(s)
            }
            Some(other) => Err(self.mismatch(field, "identifier or string", other)),
            None => Err(self.missing(field)),
        }
    }

    /// Optional positional text (atom or string).
    pub fn opt_text(&mut self) -> Option<String> {
        match self.next_positional() {
            Some(Node::Atom(s)) | Some(Node::Text(s)) => {
                let s = s.clone();
                self.take_positional();
                Some(s)
            }
            _ => None,
        }
    }

    /// Consumes all remaining positional leaves as text, in source order.
    pub fn rest_texts(&mut self) -> Vec<String> {
        let mut values = Vec::new();
        while let Some(value) = self.opt_text() {
            values.push(value);
        }
        values
    }

    /// Required positional enumerated identifier with a closed vocabulary.
    pub fn enum_atom<T>(&mut self, field: &'static str) -> Result<T, SchemaError>
    where
        T: FromStr<Err = String>,
    {
        let value = self.atom(field)?;
        value.parse().map_err(|message| SchemaError::InvalidEnum {
            tag: self.tag.to_string(),
            field,
            message,
            span: self.node.span,
        })
    }

    /// Optional positional enumerated identifier that falls back to the
    /// type's default on an unrecognized value (forward compatibility for
    /// vocabularies that grow across revisions).
    pub fn enum_atom_or_default<T>(&mut self, field: &'static str) -> T
    where
        T: FromStr + Default,
    {
        match self.next_positional() {
            Some(Node::Atom(s)) => {
                let parsed = s.parse().unwrap_or_else(|_| {
                    debug!(tag = self.tag, field = field, value = s.as_str(); "unknown enum value, using default");
                    T::default()
                });
                self.take_positional();
                parsed
            }
            _ => T::default(),
        }
    }

    /// Locates the first unconsumed sub-list with the given tag.
    pub fn child(&mut self, tag: &str) -> Option<&'a ListNode> {
        for (idx, element) in self.node.elements.iter().enumerate() {
            if self.consumed[idx] {
                continue;
            }
            if let Node::List(list) = element {
                if list.tag() == Some(tag) {
                    self.consumed[idx] = true;
                    return Some(list);
                }
            }
        }
        None
    }

    /// Collects every unconsumed sub-list with the given tag, in source
    /// order. Later entries do not override earlier ones; all are kept.
    pub fn children(&mut self, tag: &str) -> Vec<&'a ListNode> {
        let mut found = Vec::new();
        for (idx, element) in self.node.elements.iter().enumerate() {
            if self.consumed[idx] {
                continue;
            }
            if let Node::List(list) = element {
                if list.tag() == Some(tag) {
                    self.consumed[idx] = true;
                    found.push(list);
                }
            }
        }
        found
    }

    /// Consumes every remaining unconsumed sub-list, in source order.
    /// Used by polymorphic slots that dispatch on each child's own tag.
    pub fn remaining_lists(&mut self) -> Vec<&'a ListNode> {
        let mut found = Vec::new();
        for (idx, element) in self.node.elements.iter().enumerate() {
            if self.consumed[idx] {
                continue;
            }
            if let Node::List(list) = element {
                self.consumed[idx] = true;
                found.push(list);
            }
        }
        found
    }

    /// True when a bare atom flag such as `hide` is present.
    pub fn flag(&mut self, name: &str) -> bool {
        for (idx, element) in self.node.elements.iter().enumerate() {
            if self.consumed[idx] {
                continue;
            }
            if matches!(element, Node::Atom(s) if s == name) {
                self.consumed[idx] = true;
                return true;
            }
        }
        false
    }

    /// Reads a `(tag yes|no)` boolean sub-list, with a default when the
    /// sub-list is absent.
    pub fn bool_child(&mut self, tag: &'static str, default: bool) -> Result<bool, SchemaError> {
        let Some(list) = self.child(tag) else {
            return Ok(default);
        };
        let mut reader = ListReader::open(list)?;
        let value = reader.atom("value")?;
        match value.as_str() {
            "yes" => Ok(true),
            "no" => Ok(false),
            other => Err(SchemaError::InvalidEnum {
                tag: tag.to_string(),
                field: "value",
                message: format!("invalid boolean `{other}`, valid values: yes, no"),
                span: list.span,
            }),
        }
    }

    /// Applies the unknown-child policy to everything left unconsumed.
    ///
    /// Permissive drops leftovers (logged at debug), capture renders them
    /// into `sink`, strict fails on the first one.
    pub fn finish(
        self,
        options: &ParseOptions,
        mut sink: Option<&mut Vec<String>>,
    ) -> Result<(), SchemaError> {
        for (idx, element) in self.node.elements.iter().enumerate() {
            if self.consumed[idx] {
                continue;
            }
            match options.strictness {
                Strictness::Strict => {
                    let span = match element {
                        Node::List(list) => list.span,
                        _ => self.node.span,
                    };
                    return Err(SchemaError::UnrecognizedChild {
                        tag: element.describe(),
                        parent: self.tag.to_string(),
                        span,
                    });
                }
                Strictness::Capture => {
                    if let Some(sink) = sink.as_deref_mut() {
                        sink.push(element.render());
                    } else {
                        debug!(parent = self.tag, child = element.describe().as_str(); "no passthrough bag, dropping unrecognized child");
                    }
                }
                Strictness::Permissive => {
                    debug!(parent = self.tag, child = element.describe().as_str(); "ignoring unrecognized child");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tokenizer::Tokenizer, tree::build_tree};

    fn node(input: &str) -> ListNode {
        build_tree(Tokenizer::new(input)).unwrap()
    }

    #[test]
    fn test_positional_order_and_types() {
        let n = node("(at 1.0 2.5 90)");
        let mut r = ListReader::open(&n).unwrap();
        assert_eq!(r.tag(), "at");
        assert_eq!(r.number("x").unwrap(), 1.0);
        assert_eq!(r.number("y").unwrap(), 2.5);
        assert_eq!(r.opt_number(0.0), 90.0);
    }

    #[test]
    fn test_optional_positional_default() {
        let n = node("(at 1.0 2.5)");
        let mut r = ListReader::open(&n).unwrap();
        r.number("x").unwrap();
        r.number("y").unwrap();
        assert_eq!(r.opt_number(0.0), 0.0);
    }

    #[test]
    fn test_type_mismatch_names_field_and_found() {
        let n = node("(at one 2)");
        let mut r = ListReader::open(&n).unwrap();
        let err = r.number("x").unwrap_err();
        match err {
            SchemaError::TypeMismatch { field, expected, found, .. } => {
                assert_eq!(field, "x");
                assert_eq!(expected, "number");
                assert!(found.contains("one"));
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_field() {
        let n = node("(net 1)");
        let mut r = ListReader::open(&n).unwrap();
        r.integer("number").unwrap();
        assert!(matches!(
            r.string("name").unwrap_err(),
            SchemaError::MissingField { field: "name", .. }
        ));
    }

    #[test]
    fn test_children_preserve_source_order() {
        let n = node("(footprint (pad \"1\") (other) (pad \"2\"))");
        let mut r = ListReader::open(&n).unwrap();
        let pads = r.children("pad");
        assert_eq!(pads.len(), 2);
        let mut first = ListReader::open(pads[0]).unwrap();
        let mut second = ListReader::open(pads[1]).unwrap();
        assert_eq!(first.string("number").unwrap(), "1");
        assert_eq!(second.string("number").unwrap(), "2");
    }

    #[test]
    fn test_flag_and_bool_child() {
        let n = node("(pin hide (in_bom yes))");
        let mut r = ListReader::open(&n).unwrap();
        assert!(r.flag("hide"));
        assert!(!r.flag("hide"));
        assert!(r.bool_child("in_bom", false).unwrap());
        assert!(r.bool_child("on_board", true).unwrap());
    }

    #[test]
    fn test_flag_does_not_shift_positionals() {
        let n = node("(drill oval 1.0 1.8)");
        let mut r = ListReader::open(&n).unwrap();
        assert!(r.flag("oval"));
        assert_eq!(r.number("diameter").unwrap(), 1.0);
        assert_eq!(r.maybe_number(), Some(1.8));
    }

    #[test]
    fn test_strict_rejects_unknown_children() {
        let n = node("(junction (at 1 2) (frob 3))");
        let mut r = ListReader::open(&n).unwrap();
        let _ = r.child("at");
        let options = ParseOptions {
            strictness: Strictness::Strict,
        };
        let err = r.finish(&options, None).unwrap_err();
        assert!(matches!(err, SchemaError::UnrecognizedChild { .. }));
    }

    #[test]
    fn test_capture_renders_unknown_children() {
        let n = node("(junction (at 1 2) (frob 3 \"x\"))");
        let mut r = ListReader::open(&n).unwrap();
        let _ = r.child("at");
        let options = ParseOptions {
            strictness: Strictness::Capture,
        };
        let mut bag = Vec::new();
        r.finish(&options, Some(&mut bag)).unwrap();
        assert_eq!(bag, vec!["(frob 3 \"x\")".to_string()]);
    }

    #[test]
    fn test_permissive_ignores_unknown_children() {
        let n = node("(junction (frob 3))");
        let r = ListReader::open(&n).unwrap();
        r.finish(&ParseOptions::default(), None).unwrap();
    }
}
