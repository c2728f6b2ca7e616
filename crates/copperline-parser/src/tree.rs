//! Structural parsing: tokens into a nested list tree.
//!
//! [`build_tree`] consumes the tokenizer's stream and assembles balanced
//! `(...)` groups into [`ListNode`]s. It drives an explicit stack rather
//! than recursing, so symbol libraries that nest hundreds of levels deep
//! cannot exhaust the call stack. A well-formed document produces exactly
//! one root node.

use crate::{
    error::{LexError, ParseError, StructureError},
    span::Span,
    tokenizer::{PositionedToken, Token},
};

/// One element of a list: a leaf token or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Atom(String),
    Number(f64),
    Text(String),
    List(ListNode),
}

impl Node {
    /// A short description of the node for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Atom(s) => format!("atom `{s}`"),
            Self::Number(n) => format!("number `{n}`"),
            Self::Text(s) => format!("string `{s}`"),
            Self::List(list) => match list.tag() {
                Some(tag) => format!("list `({tag} ...)`"),
                None => "list".to_string(),
            },
        }
    }
}

impl Node {
    /// Renders the node back to s-expression text.
    ///
    /// Used to fill the passthrough bags: children the schema does not
    /// describe can be kept as opaque text for later reserialization.
    pub fn render(&self) -> String {
        match self {
            Self::Atom(s) => s.clone(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Text(s) => {
                let escaped = s
                    .replace('\\', "\\\\")
                    .replace('"', "\\\"")
                    .replace('\n', "\\n");
                format!("\"{escaped}\"")
            }
            Self::List(list) => list.render(),
        }
    }
}

/// A balanced `(...)` group: an ordered sequence of leaves and sub-groups.
#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    pub elements: Vec<Node>,
    /// Source span from the opening to the closing paren, inclusive.
    pub span: Span,
}

impl ListNode {
    /// The leading atom, which conventionally identifies the record type
    /// this list decodes to.
    pub fn tag(&self) -> Option<&str> {
        match self.elements.first() {
            Some(Node::Atom(tag)) => Some(tag),
            _ => None,
        }
    }

    /// Iterates the elements after the tag.
    pub fn body(&self) -> impl Iterator<Item = &Node> {
        self.elements.iter().skip(if self.tag().is_some() { 1 } else { 0 })
    }

    /// Renders the whole group back to s-expression text.
    pub fn render(&self) -> String {
        let parts: Vec<String> = self.elements.iter().map(Node::render).collect();
        format!("({})", parts.join(" "))
    }
}

/// Assembles one token stream into a single root list.
///
/// # Errors
///
/// - [`StructureError::UnmatchedClose`] for a `)` with no open group
/// - [`StructureError::UnterminatedGroup`] for EOF inside a group
/// - [`StructureError::EmptyDocument`] / [`StructureError::MultipleRoots`]
///   when the input does not contain exactly one top-level group
/// - [`StructureError::TokenOutsideGroup`] for a leaf outside any group
/// - any [`LexError`] the tokenizer reports, passed through
pub fn build_tree<I>(tokens: I) -> Result<ListNode, ParseError>
where
    I: IntoIterator<Item = Result<PositionedToken, LexError>>,
{
    // In-progress groups, innermost last. Deliberately iterative.
    let mut stack: Vec<ListNode> = Vec::new();
    let mut root: Option<ListNode> = None;

    for token in tokens {
        let PositionedToken { token, span } = token?;

        match token {
            Token::Open => {
                if root.is_some() && stack.is_empty() {
                    return Err(StructureError::MultipleRoots { offset: span.start }.into());
                }
                stack.push(ListNode {
                    elements: Vec::new(),
                    span,
                });
            }
            Token::Close => {
                let Some(mut finished) = stack.pop() else {
                    return Err(StructureError::UnmatchedClose { offset: span.start }.into());
                };
                finished.span = finished.span.union(span);
                match stack.last_mut() {
                    Some(parent) => parent.elements.push(Node::List(finished)),
                    None => root = Some(finished),
                }
            }
            Token::Atom(value) => {
                attach_leaf(&mut stack, Node::Atom(value), span)?;
            }
            Token::Number(value) => {
                attach_leaf(&mut stack, Node::Number(value), span)?;
            }
            Token::Text(value) => {
                attach_leaf(&mut stack, Node::Text(value), span)?;
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(StructureError::UnterminatedGroup {
            start: open.span.start,
        }
        .into());
    }

    root.ok_or_else(|| StructureError::EmptyDocument.into())
}

fn attach_leaf(stack: &mut [ListNode], node: Node, span: Span) -> Result<(), StructureError> {
    match stack.last_mut() {
        Some(top) => {
            top.elements.push(node);
            Ok(())
        }
        None => Err(StructureError::TokenOutsideGroup { offset: span.start }),
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::tokenizer::{Token, Tokenizer};

    /// Strategy producing well-formed s-expression documents.
    fn document_strategy() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            "[a-z][a-z0-9_]{0,8}".prop_map(|s| s),
            (-999i64..999).prop_map(|n| n.to_string()),
        ];
        leaf.prop_recursive(6, 64, 8, |inner| {
            prop::collection::vec(inner, 0..8)
                .prop_map(|children| format!("(tag {})", children.join(" ")))
        })
        .prop_map(|body| {
            if body.starts_with('(') {
                body
            } else {
                format!("({body})")
            }
        })
    }

    proptest! {
        #[test]
        fn balanced_inputs_have_equal_open_close_counts(doc in document_strategy()) {
            let tokens: Vec<_> = Tokenizer::new(&doc)
                .collect::<Result<Vec<_>, _>>()
                .unwrap();
            let opens = tokens.iter().filter(|t| t.token == Token::Open).count();
            let closes = tokens.iter().filter(|t| t.token == Token::Close).count();
            prop_assert_eq!(opens, closes);
        }

        #[test]
        fn balanced_inputs_build_exactly_one_root(doc in document_strategy()) {
            prop_assert!(build_tree(Tokenizer::new(&doc)).is_ok());
        }
    }
}
