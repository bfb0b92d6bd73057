//! Decoding of already-canonical network trees.

use serde_json::Value;

use super::NetworkNode;
use crate::error::{DiagramError, Result};

const KNOWN_TAGS: [&str; 3] = ["transistor", "series", "parallel"];

/// Decode a canonical network tree from JSON text.
pub fn from_json(input: &str) -> Result<NetworkNode> {
    let value: Value = serde_json::from_str(input)?;
    from_value(value)
}

/// Decode a canonical network tree from a JSON value.
///
/// Every `type` tag is checked before deserializing so that a tag outside
/// the three canonical kinds is reported as such rather than as a generic
/// JSON error. A node that is not an object, or whose `children` is not an
/// array, is a [`DiagramError::MalformedNetwork`] naming its path.
pub fn from_value(value: Value) -> Result<NetworkNode> {
    check_kinds(&value, "$")?;
    Ok(serde_json::from_value(value)?)
}

fn check_kinds(value: &Value, path: &str) -> Result<()> {
    let Some(node) = value.as_object() else {
        return Err(DiagramError::malformed(path, "expected a node object"));
    };
    let tag = node.get("type").and_then(Value::as_str).unwrap_or_default();
    if !KNOWN_TAGS.contains(&tag) {
        return Err(DiagramError::unknown_kind(tag));
    }
    match node.get("children") {
        None => {}
        Some(Value::Array(children)) => {
            for (i, child) in children.iter().enumerate() {
                check_kinds(child, &format!("{path}.children[{i}]"))?;
            }
        }
        Some(_) => {
            return Err(DiagramError::malformed(path, "'children' must be an array"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{DeviceType, NodeKind};

    #[test]
    fn test_decode_canonical_tree() {
        let input = r#"{
            "type": "parallel",
            "children": [
                { "type": "transistor", "name": "A", "deviceType": "nmos" },
                { "type": "series", "children": [] }
            ]
        }"#;
        let net = from_json(input).unwrap();
        assert_eq!(net.kind(), NodeKind::Parallel);
        assert_eq!(
            net.children()[0],
            NetworkNode::transistor("A", DeviceType::Nmos)
        );
        assert_eq!(net.children()[1], NetworkNode::series(vec![]));
    }

    #[test]
    fn test_unknown_tag_is_reported() {
        let input = r#"{ "type": "series", "children": [ { "type": "bridge", "children": [] } ] }"#;
        match from_json(input) {
            Err(DiagramError::UnknownNodeKind { kind }) => assert_eq!(kind, "bridge"),
            other => panic!("expected UnknownNodeKind, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_tag_is_unknown() {
        let err = from_json(r#"{ "children": [] }"#).unwrap_err();
        assert!(matches!(err, DiagramError::UnknownNodeKind { .. }));
    }

    #[test]
    fn test_non_object_is_a_shape_error() {
        for input in ["[]", "42", r#""series""#] {
            match from_json(input) {
                Err(DiagramError::MalformedNetwork { path, .. }) => assert_eq!(path, "$"),
                other => panic!("expected MalformedNetwork for {input}, got {other:?}"),
            }
        }

        let err = from_json(r#"{ "type": "parallel", "children": [ { "type": "series", "children": [ 3 ] } ] }"#)
            .unwrap_err();
        assert!(matches!(err, DiagramError::MalformedNetwork { ref path, .. } if path == "$.children[0].children[0]"));

        let err = from_json(r#"{ "type": "series", "children": { "a": 1 } }"#).unwrap_err();
        assert!(matches!(err, DiagramError::MalformedNetwork { .. }));
    }

    #[test]
    fn test_roundtrip_preserves_attributes() {
        let mut t = crate::network::Transistor::new("!B", DeviceType::Pmos);
        t.gate = Some("B".to_string());
        t.gate_inverted = true;
        t.on_when = Some(0);
        let net = NetworkNode::series(vec![NetworkNode::Transistor(t)]);
        let text = serde_json::to_string(&net).unwrap();
        assert_eq!(from_json(&text).unwrap(), net);
    }
}
