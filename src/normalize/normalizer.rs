//! Upstream → canonical network conversion.

use serde_json::Value;
use tracing::{debug, trace};

use super::upstream::{json_type, RawNode, SynthesisResponse};
use super::DEFAULT_NOT_GLYPH;
use crate::error::{DiagramError, Result};
use crate::network::{CmosNetwork, DeviceType, NetworkNode, Transistor};

/// Converts upstream nodes into [`NetworkNode`]s.
///
/// The normalizer matches exhaustively over the discriminants it knows and
/// rejects everything else, so schema drift upstream fails loudly instead of
/// producing a wrong diagram.
#[derive(Debug, Clone)]
pub struct Normalizer {
    not_glyph: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_NOT_GLYPH)
    }
}

impl Normalizer {
    /// Create a normalizer that prefixes inverted gates with `not_glyph`.
    pub fn new(not_glyph: impl Into<String>) -> Self {
        Self {
            not_glyph: not_glyph.into(),
        }
    }

    /// The inversion glyph in use.
    pub fn not_glyph(&self) -> &str {
        &self.not_glyph
    }

    /// Normalize one upstream tree.
    pub fn normalize(&self, raw: &RawNode) -> Result<NetworkNode> {
        self.normalize_at(raw, "$")
    }

    /// Normalize the upstream tree found at `path` of the input document.
    ///
    /// `path` only labels errors; it is extended with `.children[i]` on the
    /// way down.
    pub fn normalize_at(&self, raw: &RawNode, path: &str) -> Result<NetworkNode> {
        let tag = string_field(raw.node_type.as_ref(), "type", path)?
            .ok_or_else(|| DiagramError::malformed(path, "missing node 'type'"))?;
        trace!(path, tag, "normalizing node");

        match tag.to_ascii_lowercase().as_str() {
            "transistor" => self.transistor(raw, path).map(NetworkNode::Transistor),
            "node" => {
                let kind = string_field(raw.kind.as_ref(), "kind", path)?
                    .ok_or_else(|| DiagramError::malformed(path, "composite node has no 'kind'"))?;
                self.composite(kind, raw, path)
            }
            "series" | "parallel" => self.composite(tag, raw, path),
            _ => Err(DiagramError::malformed(
                path,
                format!("unrecognized node type '{tag}'"),
            )),
        }
    }

    fn transistor(&self, raw: &RawNode, path: &str) -> Result<Transistor> {
        let gate = match string_field(raw.gate.as_ref(), "gate", path)? {
            Some(gate) => gate,
            None => string_field(raw.name.as_ref(), "name", path)?
                .ok_or_else(|| DiagramError::malformed(path, "transistor has no 'gate'"))?,
        };

        let device = match string_field(raw.kind.as_ref(), "kind", path)? {
            Some(kind) => kind,
            None => string_field(raw.device_type.as_ref(), "deviceType", path)?
                .ok_or_else(|| DiagramError::malformed(path, "transistor has no device kind"))?,
        };
        let device_type = parse_device(device).ok_or_else(|| {
            DiagramError::malformed(path, format!("unrecognized device kind '{device}'"))
        })?;

        let on_when = on_when(raw.on_when.as_ref(), path)?;

        let gate_inverted = match raw.gate_inverted.as_ref() {
            None | Some(Value::Null) => false,
            Some(Value::Bool(inverted)) => *inverted,
            Some(other) => {
                return Err(DiagramError::malformed(
                    path,
                    format!("'gateInverted' must be a boolean, got {}", json_type(other)),
                ))
            }
        };
        let name = if gate_inverted {
            format!("{}{}", self.not_glyph, gate)
        } else {
            gate.to_string()
        };

        Ok(Transistor {
            name,
            device_type,
            gate: gate_inverted.then(|| gate.to_string()),
            gate_inverted,
            on_when,
        })
    }

    fn composite(&self, kind: &str, raw: &RawNode, path: &str) -> Result<NetworkNode> {
        let raw_children = match raw.children.as_ref() {
            None | Some(Value::Null) => {
                return Err(DiagramError::malformed(
                    path,
                    format!("{kind} block has no 'children'"),
                ))
            }
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(DiagramError::malformed(
                    path,
                    format!("'children' must be an array, got {}", json_type(other)),
                ))
            }
        };

        let children = raw_children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                let child_path = format!("{path}.children[{i}]");
                let node = RawNode::from_value(child, &child_path)?;
                self.normalize_at(&node, &child_path)
            })
            .collect::<Result<Vec<_>>>()?;

        match kind.to_ascii_lowercase().as_str() {
            "series" => Ok(NetworkNode::Series { children }),
            "parallel" => Ok(NetworkNode::Parallel { children }),
            _ => Err(DiagramError::malformed(
                path,
                format!("unrecognized composite kind '{kind}'"),
            )),
        }
    }

    /// Normalize a bare PUN/PDN pair document.
    pub fn normalize_pair(&self, pun: &RawNode, pdn: &RawNode) -> Result<CmosNetwork> {
        Ok(CmosNetwork {
            pun: self.normalize_at(pun, PAIR_PUN_PATH)?,
            pdn: self.normalize_at(pdn, PAIR_PDN_PATH)?,
        })
    }

    /// Normalize both networks of a synthesis response.
    ///
    /// The glyph given to this normalizer wins; callers that want the
    /// response's own notation should use [`to_cmos_network`].
    pub fn normalize_response(&self, resp: &SynthesisResponse) -> Result<CmosNetwork> {
        let pun = self.normalize_value(&resp.steps.pun.network, RESPONSE_PUN_PATH)?;
        let pdn = self.normalize_value(&resp.steps.pdn.network, RESPONSE_PDN_PATH)?;
        debug!(
            expression = %resp.input.expression,
            pun_transistors = pun.transistor_count(),
            pdn_transistors = pdn.transistor_count(),
            "normalized synthesis response"
        );
        Ok(CmosNetwork { pun, pdn })
    }

    fn normalize_value(&self, value: &Value, path: &str) -> Result<NetworkNode> {
        self.normalize_at(&RawNode::from_value(value, path)?, path)
    }
}

/// Path of the pull-up network in a pair document.
pub(crate) const PAIR_PUN_PATH: &str = "$.pun";
/// Path of the pull-down network in a pair document.
pub(crate) const PAIR_PDN_PATH: &str = "$.pdn";
const RESPONSE_PUN_PATH: &str = "$.steps.pun.network";
const RESPONSE_PDN_PATH: &str = "$.steps.pdn.network";

fn parse_device(kind: &str) -> Option<DeviceType> {
    match kind.to_ascii_lowercase().as_str() {
        "nmos" => Some(DeviceType::Nmos),
        "pmos" => Some(DeviceType::Pmos),
        _ => None,
    }
}

/// A field that must be a string when present.
fn string_field<'r>(value: Option<&'r Value>, field: &str, path: &str) -> Result<Option<&'r str>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(DiagramError::malformed(
            path,
            format!("'{field}' must be a string, got {}", json_type(other)),
        )),
    }
}

fn on_when(value: Option<&Value>, path: &str) -> Result<Option<u8>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(bit) => match bit.as_u64() {
            Some(0) => Ok(Some(0)),
            Some(1) => Ok(Some(1)),
            _ => Err(DiagramError::malformed(
                path,
                format!("'onWhen' must be 0 or 1, got {bit}"),
            )),
        },
    }
}

/// Normalize one upstream tree with the given inversion glyph.
pub fn normalize(raw: &RawNode, not_glyph: &str) -> Result<NetworkNode> {
    Normalizer::new(not_glyph).normalize(raw)
}

/// Normalize a synthesis response into a PUN/PDN pair.
///
/// The inversion glyph is `not_override` if given, else the response's
/// notation style, else `~`.
pub fn to_cmos_network(resp: &SynthesisResponse, not_override: Option<&str>) -> Result<CmosNetwork> {
    let glyph = not_override
        .or(resp.input.style.as_ref().map(|s| s.not.as_str()))
        .unwrap_or(DEFAULT_NOT_GLYPH);
    Normalizer::new(glyph).normalize_response(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NodeKind;

    fn raw(json: &str) -> RawNode {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_plain_transistor() {
        let net = normalize(
            &raw(r#"{ "type": "transistor", "kind": "nmos", "gate": "A" }"#),
            "~",
        )
        .unwrap();
        assert_eq!(net, NetworkNode::transistor("A", DeviceType::Nmos));
    }

    #[test]
    fn test_inversion_uses_caller_glyph() {
        let node = raw(r#"{ "type": "transistor", "kind": "pmos", "gate": "A", "gateInverted": true, "onWhen": 0 }"#);

        let bang = normalize(&node, "!").unwrap();
        let tilde = normalize(&node, "~").unwrap();
        match (&bang, &tilde) {
            (NetworkNode::Transistor(b), NetworkNode::Transistor(t)) => {
                assert_eq!(b.name, "!A");
                assert_eq!(t.name, "~A");
                assert_eq!(b.gate(), "A");
                assert!(b.gate_inverted);
                assert_eq!(b.on_when, Some(0));
                assert_eq!(b.device_type, DeviceType::Pmos);
            }
            _ => panic!("expected transistors"),
        }
    }

    #[test]
    fn test_service_composite_preserves_order() {
        let net = normalize(
            &raw(
                r#"{ "type": "node", "kind": "series", "children": [
                    { "type": "transistor", "kind": "nmos", "gate": "B" },
                    { "type": "node", "kind": "parallel", "children": [
                        { "type": "transistor", "kind": "nmos", "gate": "C" },
                        { "type": "transistor", "kind": "nmos", "gate": "A" }
                    ] }
                ] }"#,
            ),
            "~",
        )
        .unwrap();
        assert_eq!(net.kind(), NodeKind::Series);
        assert_eq!(net.to_string(), "B & (C | A)");
    }

    #[test]
    fn test_flat_and_legacy_shapes() {
        let flat = normalize(
            &raw(r#"{ "type": "parallel", "children": [ { "type": "transistor", "name": "X", "deviceType": "pmos" } ] }"#),
            "~",
        )
        .unwrap();
        assert_eq!(
            flat,
            NetworkNode::parallel(vec![NetworkNode::transistor("X", DeviceType::Pmos)])
        );

        let legacy = normalize(
            &raw(r#"{ "type": "SERIES", "children": [ { "type": "TRANSISTOR", "gate": "Y", "mos_type": "NMOS" } ] }"#),
            "~",
        )
        .unwrap();
        assert_eq!(
            legacy,
            NetworkNode::series(vec![NetworkNode::transistor("Y", DeviceType::Nmos)])
        );
    }

    #[test]
    fn test_empty_composite_is_accepted() {
        let net = normalize(&raw(r#"{ "type": "node", "kind": "parallel", "children": [] }"#), "~").unwrap();
        assert_eq!(net, NetworkNode::parallel(vec![]));
    }

    #[test]
    fn test_unknown_type_is_rejected_with_path() {
        let err = normalize(
            &raw(r#"{ "type": "node", "kind": "series", "children": [
                { "type": "transistor", "kind": "nmos", "gate": "A" },
                { "type": "resistor" }
            ] }"#),
            "~",
        )
        .unwrap_err();
        match err {
            DiagramError::MalformedNetwork { path, message } => {
                assert_eq!(path, "$.children[1]");
                assert!(message.contains("resistor"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_children_is_rejected() {
        let err = normalize(&raw(r#"{ "type": "node", "kind": "series" }"#), "~").unwrap_err();
        assert!(matches!(err, DiagramError::MalformedNetwork { .. }));
    }

    #[test]
    fn test_unknown_composite_kind_is_rejected() {
        let err = normalize(&raw(r#"{ "type": "node", "kind": "bridge", "children": [] }"#), "~").unwrap_err();
        assert!(err.to_string().contains("bridge"));
    }

    #[test]
    fn test_bad_device_and_on_when_rejected() {
        let err = normalize(&raw(r#"{ "type": "transistor", "kind": "jfet", "gate": "A" }"#), "~").unwrap_err();
        assert!(err.to_string().contains("jfet"));

        let err = normalize(
            &raw(r#"{ "type": "transistor", "kind": "nmos", "gate": "A", "onWhen": 2 }"#),
            "~",
        )
        .unwrap_err();
        assert!(matches!(err, DiagramError::MalformedNetwork { .. }));
    }

    #[test]
    fn test_wrongly_typed_transistor_fields_name_the_field() {
        for (json, field) in [
            (r#"{ "type": "transistor", "kind": 1, "gate": "A" }"#, "'kind'"),
            (r#"{ "type": "transistor", "kind": "nmos", "gate": ["A"] }"#, "'gate'"),
            (r#"{ "type": "transistor", "kind": "nmos", "gate": "A", "gateInverted": "yes" }"#, "'gateInverted'"),
            (r#"{ "type": "transistor", "kind": "nmos", "gate": "A", "onWhen": -1 }"#, "'onWhen'"),
            (r#"{ "type": "transistor", "kind": "nmos", "gate": "A", "onWhen": true }"#, "'onWhen'"),
        ] {
            match normalize(&raw(json), "~") {
                Err(DiagramError::MalformedNetwork { path, message }) => {
                    assert_eq!(path, "$");
                    assert!(message.contains(field), "{message} should mention {field}");
                }
                other => panic!("expected MalformedNetwork for {json}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_null_optional_fields_are_absent() {
        let net = normalize(
            &raw(r#"{ "type": "transistor", "kind": "nmos", "gate": "A", "gateInverted": null, "onWhen": null }"#),
            "~",
        )
        .unwrap();
        assert_eq!(net, NetworkNode::transistor("A", DeviceType::Nmos));
    }

    #[test]
    fn test_pair_paths() {
        let normalizer = Normalizer::new("!");
        let pun = raw(r#"{ "type": "transistor", "kind": "pmos", "gate": "A" }"#);
        let pdn = raw(r#"{ "type": "node", "kind": "series" }"#);
        match normalizer.normalize_pair(&pun, &pdn) {
            Err(DiagramError::MalformedNetwork { path, .. }) => assert_eq!(path, "$.pdn"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_response_glyph_precedence() {
        let resp: SynthesisResponse = serde_json::from_str(
            r#"{
                "input": { "expression": "!A", "style": { "not": "!", "and": "&", "or": "|" } },
                "steps": {
                    "pdn": { "network": { "type": "transistor", "kind": "nmos", "gate": "A", "gateInverted": true } },
                    "pun": { "network": { "type": "transistor", "kind": "pmos", "gate": "A", "gateInverted": false } }
                }
            }"#,
        )
        .unwrap();

        let cmos = to_cmos_network(&resp, None).unwrap();
        assert_eq!(cmos.pdn.to_string(), "!A");
        assert_eq!(cmos.pun.to_string(), "A");

        let cmos = to_cmos_network(&resp, Some("~")).unwrap();
        assert_eq!(cmos.pdn.to_string(), "~A");
    }

    #[test]
    fn test_response_error_path_names_network() {
        let resp: SynthesisResponse = serde_json::from_str(
            r#"{ "steps": {
                "pdn": { "network": { "type": "transistor", "kind": "nmos", "gate": "A" } },
                "pun": { "network": { "type": "node", "kind": "series" } }
            } }"#,
        )
        .unwrap();
        match to_cmos_network(&resp, None) {
            Err(DiagramError::MalformedNetwork { path, .. }) => assert_eq!(path, "$.steps.pun.network"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
