//! Normalization of synthesis-service output into the canonical model.
//!
//! The synthesis service has emitted several incompatible shapes for the same
//! logical network over time. This module reads any of them and resolves
//! gate-inversion markers into display names.
//!
//! # Accepted documents
//!
//! | Document | Shape |
//! |----------|-------|
//! | Synthesis response | `{ "input": {...}, "steps": { "pun": {"network": N}, "pdn": {"network": N}, ... } }` |
//! | Network pair | `{ "pun": N, "pdn": N }` |
//! | Single network | `N` |
//!
//! where `N` is any node shape listed on [`RawNode`].
//!
//! # Example
//!
//! ```
//! use cmos_diagram::normalize::{self, Document};
//!
//! let doc = normalize::parse_document(
//!     r#"{ "type": "transistor", "kind": "pmos", "gate": "A", "gateInverted": true }"#,
//! ).unwrap();
//! let Document::Single(raw) = doc else { unreachable!() };
//! let node = normalize::normalize(&raw, "!").unwrap();
//! assert_eq!(node.to_string(), "!A");
//! ```

mod normalizer;
mod upstream;

pub use normalizer::{normalize, to_cmos_network, Normalizer};
pub use upstream::*;

use serde_json::Value;

use crate::error::Result;
use crate::network::CmosNetwork;

/// Inversion glyph used when neither the caller nor the response names one.
pub const DEFAULT_NOT_GLYPH: &str = "~";

/// Any input document the renderer accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// Full synthesis response
    Response(Box<SynthesisResponse>),
    /// Bare PUN/PDN pair
    Pair { pun: RawNode, pdn: RawNode },
    /// A single network
    Single(RawNode),
}

impl Document {
    /// Normalize a document that carries both networks.
    ///
    /// Returns `None` for a single-network document.
    pub fn to_cmos_network(&self, not_override: Option<&str>) -> Option<Result<CmosNetwork>> {
        match self {
            Document::Response(resp) => Some(to_cmos_network(resp, not_override)),
            Document::Pair { pun, pdn } => {
                let normalizer = Normalizer::new(not_override.unwrap_or(DEFAULT_NOT_GLYPH));
                Some(normalizer.normalize_pair(pun, pdn))
            }
            Document::Single(_) => None,
        }
    }
}

/// Parse JSON text into a [`Document`], detecting which kind it is.
///
/// Text that is not JSON, or a response missing a required block, is
/// [`DiagramError::InvalidJson`](crate::error::DiagramError::InvalidJson); a
/// network node of the wrong JSON type is reported with its path.
pub fn parse_document(input: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(input)?;
    if value.get("steps").is_some() {
        return Ok(Document::Response(Box::new(serde_json::from_value(value)?)));
    }
    if let (Some(pun), Some(pdn)) = (value.get("pun"), value.get("pdn")) {
        return Ok(Document::Pair {
            pun: RawNode::from_value(pun, normalizer::PAIR_PUN_PATH)?,
            pdn: RawNode::from_value(pdn, normalizer::PAIR_PDN_PATH)?,
        });
    }
    Ok(Document::Single(RawNode::from_value(&value, "$")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagramError;
    use crate::network::NetworkNode;

    #[test]
    fn test_detects_pair() {
        let doc = parse_document(
            r#"{
                "pun": { "type": "transistor", "kind": "pmos", "gate": "A" },
                "pdn": { "type": "transistor", "kind": "nmos", "gate": "A" }
            }"#,
        )
        .unwrap();
        assert!(matches!(doc, Document::Pair { .. }));
        let cmos = doc.to_cmos_network(None).unwrap().unwrap();
        assert_eq!(cmos.pun.transistor_count(), 1);
    }

    #[test]
    fn test_detects_single() {
        let doc = parse_document(r#"{ "type": "series", "children": [] }"#).unwrap();
        assert!(matches!(doc, Document::Single(_)));
        assert!(doc.to_cmos_network(None).is_none());
    }

    #[test]
    fn test_detects_response() {
        let doc = parse_document(
            r#"{ "input": { "expression": "A" }, "steps": {
                "pdn": { "network": { "type": "transistor", "kind": "nmos", "gate": "A" } },
                "pun": { "network": { "type": "transistor", "kind": "pmos", "gate": "A" } }
            } }"#,
        )
        .unwrap();
        assert!(matches!(doc, Document::Response(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_document("{ not json").unwrap_err();
        assert!(matches!(err, DiagramError::InvalidJson { .. }));
    }

    fn single(input: &str) -> Result<NetworkNode> {
        match parse_document(input)? {
            Document::Single(raw) => normalize(&raw, DEFAULT_NOT_GLYPH),
            other => panic!("expected a single network, got {other:?}"),
        }
    }

    fn malformed_path(result: Result<NetworkNode>) -> String {
        match result {
            Err(DiagramError::MalformedNetwork { path, .. }) => path,
            other => panic!("expected MalformedNetwork, got {other:?}"),
        }
    }

    #[test]
    fn test_wrongly_typed_nodes_report_their_path() {
        assert_eq!(malformed_path(single(r#"{ "type": 7 }"#)), "$");
        assert_eq!(
            malformed_path(single(r#"{ "type": "series", "children": ["A"] }"#)),
            "$.children[0]"
        );
        assert_eq!(
            malformed_path(single(
                r#"{ "type": "series", "children": [ { "type": "parallel", "children": { "x": 1 } } ] }"#
            )),
            "$.children[0]"
        );
        assert_eq!(
            malformed_path(single(
                r#"{ "type": "node", "kind": "parallel", "children": [
                    { "type": "transistor", "kind": "nmos", "gate": "A" },
                    { "type": "transistor", "kind": "nmos", "gate": "B", "onWhen": 300 }
                ] }"#
            )),
            "$.children[1]"
        );
    }

    #[test]
    fn test_out_of_range_on_when_matches_invalid_bit() {
        let big = single(r#"{ "type": "transistor", "kind": "nmos", "gate": "A", "onWhen": 300 }"#);
        let two = single(r#"{ "type": "transistor", "kind": "nmos", "gate": "A", "onWhen": 2 }"#);
        assert_eq!(malformed_path(big), "$");
        assert_eq!(malformed_path(two), "$");
    }

    #[test]
    fn test_non_object_document_is_malformed() {
        let err = parse_document("[1, 2]").unwrap_err();
        assert!(matches!(err, DiagramError::MalformedNetwork { ref path, .. } if path == "$"));
    }

    #[test]
    fn test_pair_errors_name_the_network() {
        let err = parse_document(r#"{ "pun": "A", "pdn": { "type": "transistor", "kind": "nmos", "gate": "A" } }"#)
            .unwrap_err();
        assert!(matches!(err, DiagramError::MalformedNetwork { ref path, .. } if path == "$.pun"));

        let doc = parse_document(
            r#"{
                "pun": { "type": "transistor", "kind": "pmos", "gate": "A" },
                "pdn": { "type": "series", "children": [ { "type": "transistor", "gate": true } ] }
            }"#,
        )
        .unwrap();
        match doc.to_cmos_network(None) {
            Some(Err(DiagramError::MalformedNetwork { path, message })) => {
                assert_eq!(path, "$.pdn.children[0]");
                assert!(message.contains("'gate' must be a string"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_response_with_backend_count_still_normalizes() {
        let doc = parse_document(
            r#"{ "input": { "expression": "A & !B" }, "steps": {
                "pdn": { "network": { "type": "node", "kind": "series", "children": [
                    { "type": "transistor", "kind": "nmos", "gate": "A" },
                    { "type": "transistor", "kind": "nmos", "gate": "B", "gateInverted": true }
                ] } },
                "pun": { "network": { "type": "node", "kind": "parallel", "children": [
                    { "type": "transistor", "kind": "pmos", "gate": "A" },
                    { "type": "transistor", "kind": "pmos", "gate": "B", "gateInverted": true }
                ] } },
                "count": { "pdn_leaves": 2, "pun_leaves": 2, "inverters": 1, "inverter_transistors": 2, "total": 6 }
            } }"#,
        )
        .unwrap();
        let Document::Response(resp) = &doc else {
            panic!("expected a response");
        };
        let cmos = doc.to_cmos_network(None).unwrap().unwrap();
        let computed = crate::network::TransistorCount::from_network(&cmos);
        let reported = resp.steps.reported_count().unwrap();
        assert_eq!(reported.total_transistors, computed.total_transistors);
        assert_eq!(cmos.pdn.to_string(), "A & ~B");
    }

    #[test]
    fn test_response_network_of_wrong_type() {
        let doc = parse_document(
            r#"{ "steps": {
                "pdn": { "network": [] },
                "pun": { "network": { "type": "transistor", "kind": "pmos", "gate": "A" } }
            } }"#,
        )
        .unwrap();
        match doc.to_cmos_network(None) {
            Some(Err(DiagramError::MalformedNetwork { path, .. })) => {
                assert_eq!(path, "$.steps.pdn.network")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
