//! Document tree model.
//!
//! This module provides the [`Node`] enum, an ordered tree representation of
//! a YAML document. It is the structure every canonicalization rule operates
//! on: mappings keep their key/value pairs as an ordered list so sorts can
//! reorder the original nodes without copying or losing identity.
//!
//! ## Core Types
//!
//! - [`Node`]: a tagged variant (Document, Mapping, Sequence, Scalar)
//! - [`Scalar`]: a literal string plus its serialization style
//!
//! ## Examples
//!
//! ```rust
//! use tekfmt::node::{Node, Scalar};
//!
//! let doc = Node::Document(Box::new(Node::Mapping(vec![(
//!     Node::plain("name"),
//!     Node::plain("build"),
//! )])));
//!
//! assert_eq!(doc.find("name").and_then(Node::scalar_value), Some("build"));
//! assert!(doc.find("missing").is_none());
//! ```

use saphyr_parser::ScalarStyle;

/// A scalar leaf: the literal string value plus its quoting/style attribute.
///
/// `known_string` records that the input marked the value as a string
/// (quoting, a block style, or an explicit `!!str` tag). The emitter uses it
/// to keep quotes on values such as `"true"` or `"123"` whose plain form
/// would resolve to a different type.
#[derive(Clone, Debug, PartialEq)]
pub struct Scalar {
    pub value: String,
    pub style: ScalarStyle,
    pub known_string: bool,
}

impl Scalar {
    /// Creates a plain (unquoted) scalar.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Scalar {
            value: value.into(),
            style: ScalarStyle::Plain,
            known_string: false,
        }
    }

    /// Creates a scalar known to hold a string value.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Scalar {
            value: value.into(),
            style: ScalarStyle::Plain,
            known_string: true,
        }
    }

    /// Returns `true` if the value is an explicit YAML null (`null` or `~`)
    /// or an empty plain scalar. Quoted `"null"` is a string, not a null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        !self.known_string && matches!(self.value.as_str(), "" | "~" | "null" | "Null" | "NULL")
    }
}

/// An ordered document tree node.
///
/// A `Mapping` holds an ordered list of `(key, value)` pairs; keys are always
/// scalars. A `Sequence` holds an ordered list of nodes. A `Document` wraps
/// the root node of one document in a multi-document stream.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Document(Box<Node>),
    Mapping(Vec<(Node, Node)>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    /// Creates a plain scalar node.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::plain(value))
    }

    /// Creates a string-typed scalar node.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::string(value))
    }

    #[inline]
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    /// Returns the scalar string value, or `None` for non-scalar nodes.
    #[must_use]
    pub fn scalar_value(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(&s.value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scalar_mut(&mut self) -> Option<&mut Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the ordered pair list of a mapping, descending through a
    /// document into its root.
    #[must_use]
    pub fn entries(&self) -> Option<&[(Node, Node)]> {
        match self {
            Node::Document(root) => root.entries(),
            Node::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Mutable access to a mapping's ordered pair list.
    #[must_use]
    pub fn entries_mut(&mut self) -> Option<&mut Vec<(Node, Node)>> {
        match self {
            Node::Document(root) => root.entries_mut(),
            Node::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Returns the elements of a sequence node.
    #[must_use]
    pub fn items(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable access to the elements of a sequence node.
    #[must_use]
    pub fn items_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the value node of the first pair whose key matches `name`,
    /// descending into the root when called on a document. Returns `None`
    /// when the key is missing or the node has no mapping structure.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Document(root) => root.find(name),
            Node::Mapping(pairs) => pairs
                .iter()
                .find(|(key, _)| key.scalar_value() == Some(name))
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Mutable variant of [`Node::find`].
    #[must_use]
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Node> {
        match self {
            Node::Document(root) => root.find_mut(name),
            Node::Mapping(pairs) => pairs
                .iter_mut()
                .find(|(key, _)| key.scalar_value() == Some(name))
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Returns `true` if the node has at least one child (pair or element).
    /// Scalars have no children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        match self {
            Node::Document(root) => root.has_children(),
            Node::Mapping(pairs) => !pairs.is_empty(),
            Node::Sequence(items) => !items.is_empty(),
            Node::Scalar(_) => false,
        }
    }

    /// Returns `true` if the node is an explicit null scalar.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.as_scalar().is_some_and(Scalar::is_null)
    }

    /// The node kind as a display name, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Node::Document(_) => "document",
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(_) => "scalar",
        }
    }
}
