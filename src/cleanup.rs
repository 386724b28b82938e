//! Cleanup rules: conditional key deletion and quote stripping.

use saphyr_parser::ScalarStyle;

use crate::node::Node;

/// Removes the pair stored under `key` when `cond` holds for its value.
///
/// The key and value nodes are removed together; nothing happens when the
/// field is absent or the condition does not hold. The predicate is supplied
/// per call site, e.g. "has zero children" for an empty `computeResources`
/// block or [`Node::is_null`] for an explicit null `creationTimestamp`.
pub fn delete_if<F>(node: &mut Node, key: &str, cond: F)
where
    F: Fn(&Node) -> bool,
{
    let Some(pairs) = node.entries_mut() else {
        return;
    };
    let Some(index) = pairs
        .iter()
        .position(|(k, _)| k.scalar_value() == Some(key))
    else {
        return;
    };
    if cond(&pairs[index].1) {
        pairs.remove(index);
    }
}

/// Clears the quoting/style attribute of every value scalar reachable from
/// `node`, forcing the plain style. Keys are left as written. The scalar's
/// semantic value never changes: the emitter re-quotes any value whose plain
/// form would be unsafe or would resolve to a different type.
pub fn unquote(node: &mut Node) {
    match node {
        Node::Document(root) => unquote(root),
        Node::Mapping(pairs) => {
            for (_, value) in pairs.iter_mut() {
                unquote(value);
            }
        }
        Node::Sequence(items) => {
            for item in items {
                unquote(item);
            }
        }
        Node::Scalar(scalar) => scalar.style = ScalarStyle::Plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Scalar;

    fn step_with_resources(resources: Node) -> Node {
        Node::Mapping(vec![
            (Node::plain("name"), Node::plain("build")),
            (Node::plain("computeResources"), resources),
        ])
    }

    #[test]
    fn deletes_key_and_value_together() {
        let mut step = step_with_resources(Node::Mapping(vec![]));
        delete_if(&mut step, "computeResources", |n| !n.has_children());
        assert!(step.find("computeResources").is_none());
        assert_eq!(step.entries().unwrap().len(), 1);
        assert_eq!(step.find("name").and_then(Node::scalar_value), Some("build"));
    }

    #[test]
    fn keeps_key_when_condition_fails() {
        let resources = Node::Mapping(vec![(
            Node::plain("limits"),
            Node::Mapping(vec![(Node::plain("cpu"), Node::plain("1"))]),
        )]);
        let mut step = step_with_resources(resources);
        delete_if(&mut step, "computeResources", |n| !n.has_children());
        assert!(step.find("computeResources").is_some());
    }

    #[test]
    fn absent_key_is_a_noop() {
        let mut node = Node::Mapping(vec![(Node::plain("name"), Node::plain("x"))]);
        let before = node.clone();
        delete_if(&mut node, "computeResources", |_| true);
        assert_eq!(node, before);
    }

    #[test]
    fn null_scalar_resources_count_as_empty() {
        let mut step = step_with_resources(Node::plain(""));
        delete_if(&mut step, "computeResources", |n| !n.has_children());
        assert!(step.find("computeResources").is_none());
    }

    #[test]
    fn unquote_clears_value_styles_recursively() {
        let mut doc = Node::Document(Box::new(Node::Mapping(vec![(
            Node::plain("spec"),
            Node::Sequence(vec![Node::Scalar(Scalar {
                value: "x".into(),
                style: ScalarStyle::DoubleQuoted,
                known_string: true,
            })]),
        )])));
        unquote(&mut doc);
        let item = &doc.find("spec").unwrap().items().unwrap()[0];
        assert_eq!(item.as_scalar().unwrap().style, ScalarStyle::Plain);
        // string-ness survives so the emitter can still protect the value
        assert!(item.as_scalar().unwrap().known_string);
    }

    #[test]
    fn unquote_leaves_keys_as_written() {
        let quoted_key = Node::Scalar(Scalar {
            value: "on".into(),
            style: ScalarStyle::DoubleQuoted,
            known_string: true,
        });
        let mut node = Node::Mapping(vec![(quoted_key.clone(), Node::plain("v"))]);
        unquote(&mut node);
        assert_eq!(node.entries().unwrap()[0].0, quoted_key);
    }
}
