//! Document decoding: a byte stream of one or more YAML documents is turned
//! into an ordered [`Node`] forest.
//!
//! Decoding is event-driven: `saphyr-parser` produces a flat event stream and
//! [`parse_documents`] assembles it into one tree per document. Scalar styles
//! are kept on the nodes so the emitter can reproduce or strip quoting, and
//! quoted/tagged strings are marked so unquoting never changes a value's
//! resolved type.
//!
//! Anchors are resolved eagerly: an alias becomes a copy of the anchored
//! node, so the canonical output contains no anchor syntax.

use std::collections::HashMap;

use saphyr_parser::{Event, Parser, ScalarStyle};

use crate::error::{Error, Result};
use crate::node::{Node, Scalar};

/// Decodes every document in `input`.
///
/// The whole stream is validated before any tree is returned: a malformed
/// document anywhere in the stream yields a [`Error::Decode`] and no output,
/// keeping multi-document formatting all-or-nothing.
///
/// # Errors
///
/// Returns [`Error::Decode`] with the underlying parser message when the
/// input is not well-formed YAML.
pub fn parse_documents(input: &str) -> Result<Vec<Node>> {
    let parser = Parser::new_from_str(input);
    let mut events = Vec::new();
    for result in parser {
        let (event, _span) = result.map_err(Error::decode)?;
        events.push(event);
    }

    TreeBuilder::new(&events).build_stream()
}

struct TreeBuilder<'a, 'b> {
    events: &'b [Event<'a>],
    pos: usize,
    anchors: HashMap<usize, Node>,
}

impl<'a, 'b> TreeBuilder<'a, 'b> {
    fn new(events: &'b [Event<'a>]) -> Self {
        TreeBuilder {
            events,
            pos: 0,
            anchors: HashMap::new(),
        }
    }

    fn peek(&self) -> Result<&'b Event<'a>> {
        self.events
            .get(self.pos)
            .ok_or_else(|| Error::decode("unexpected end of event stream"))
    }

    fn next(&mut self) -> Result<&'b Event<'a>> {
        let event = self.peek()?;
        self.pos += 1;
        Ok(event)
    }

    fn build_stream(mut self) -> Result<Vec<Node>> {
        let mut documents = Vec::new();
        loop {
            match self.next()? {
                Event::StreamStart => {}
                Event::StreamEnd => break,
                Event::DocumentStart(_) => {
                    // `--- --- ...` style empty documents have no content
                    // events at all; their root is an implicit null.
                    let root = if matches!(self.peek()?, Event::DocumentEnd) {
                        Node::plain("")
                    } else {
                        self.build_node()?
                    };
                    match self.next()? {
                        Event::DocumentEnd => {}
                        other => {
                            return Err(Error::decode(format!(
                                "expected end of document, got {other:?}"
                            )))
                        }
                    }
                    documents.push(Node::Document(Box::new(root)));
                }
                other => return Err(Error::decode(format!("unexpected event {other:?}"))),
            }
        }
        Ok(documents)
    }

    fn build_node(&mut self) -> Result<Node> {
        match self.next()? {
            Event::Scalar(value, style, anchor_id, tag) => {
                let known_string = matches!(
                    style,
                    ScalarStyle::SingleQuoted
                        | ScalarStyle::DoubleQuoted
                        | ScalarStyle::Literal
                        | ScalarStyle::Folded
                ) || tag.as_deref().is_some_and(|t| t.suffix == "str");
                let node = Node::Scalar(Scalar {
                    value: value.to_string(),
                    style: *style,
                    known_string,
                });
                self.register_anchor(*anchor_id, &node);
                Ok(node)
            }
            Event::SequenceStart(anchor_id, _tag) => {
                let anchor_id = *anchor_id;
                let mut items = Vec::new();
                while !matches!(self.peek()?, Event::SequenceEnd) {
                    items.push(self.build_node()?);
                }
                self.pos += 1; // consume SequenceEnd
                let node = Node::Sequence(items);
                self.register_anchor(anchor_id, &node);
                Ok(node)
            }
            Event::MappingStart(anchor_id, _tag) => {
                let anchor_id = *anchor_id;
                let mut pairs = Vec::new();
                while !matches!(self.peek()?, Event::MappingEnd) {
                    let key = self.build_node()?;
                    let value = self.build_node()?;
                    pairs.push((key, value));
                }
                self.pos += 1; // consume MappingEnd
                let node = Node::Mapping(pairs);
                self.register_anchor(anchor_id, &node);
                Ok(node)
            }
            Event::Alias(id) => self
                .anchors
                .get(id)
                .cloned()
                .ok_or_else(|| Error::decode(format!("unresolved alias (anchor id {id})"))),
            other => Err(Error::decode(format!("unexpected event {other:?}"))),
        }
    }

    fn register_anchor(&mut self, anchor_id: usize, node: &Node) {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_mapping_tree() {
        let docs = parse_documents("kind: Task\nmetadata:\n  name: build\n").unwrap();
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.find("kind").and_then(Node::scalar_value), Some("Task"));
        assert_eq!(
            doc.find("metadata")
                .and_then(|m| m.find("name"))
                .and_then(Node::scalar_value),
            Some("build")
        );
    }

    #[test]
    fn keeps_scalar_styles() {
        let docs = parse_documents("a: \"quoted\"\nb: plain\nc: |\n  block\n").unwrap();
        let doc = &docs[0];
        let a = doc.find("a").and_then(Node::as_scalar).unwrap();
        assert_eq!(a.style, ScalarStyle::DoubleQuoted);
        assert!(a.known_string);
        let b = doc.find("b").and_then(Node::as_scalar).unwrap();
        assert_eq!(b.style, ScalarStyle::Plain);
        assert!(!b.known_string);
        let c = doc.find("c").and_then(Node::as_scalar).unwrap();
        assert_eq!(c.style, ScalarStyle::Literal);
        assert_eq!(c.value, "block\n");
    }

    #[test]
    fn parses_multiple_documents() {
        let docs = parse_documents("---\na: 1\n---\nb: 2\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].find("b").and_then(Node::scalar_value), Some("2"));
    }

    #[test]
    fn resolves_aliases_to_copies() {
        let docs = parse_documents("base: &x\n  name: n\nother: *x\n").unwrap();
        let doc = &docs[0];
        assert_eq!(doc.find("base"), doc.find("other"));
    }

    #[test]
    fn sequences_and_flow_collections() {
        let docs = parse_documents("items: [1, 2]\nempty: {}\n").unwrap();
        let doc = &docs[0];
        assert_eq!(doc.find("items").and_then(Node::items).map(<[_]>::len), Some(2));
        assert!(!doc.find("empty").unwrap().has_children());
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        let err = parse_documents("a: [unclosed\n").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
