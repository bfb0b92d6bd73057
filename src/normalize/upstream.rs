//! Upstream document types as produced by the synthesis service.
//!
//! These types deliberately accept every field any known schema revision
//! uses; deciding what a node *is* happens in the normalizer, not here.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{DiagramError, Result};
use crate::network::TransistorCount;

/// One node of an upstream network description, in any known shape.
///
/// | Shape | Transistor | Composite |
/// |-------|------------|-----------|
/// | service | `{type:"transistor", kind:"nmos", gate, gateInverted?, onWhen?}` | `{type:"node", kind:"series", children}` |
/// | flat tags | `{type:"transistor", name, deviceType}` | `{type:"parallel", children}` |
/// | legacy | `{type:"TRANSISTOR", gate, mos_type:"NMOS"}` | `{type:"SERIES", children}` |
///
/// Fields are kept as raw JSON values so that a wrongly typed field is
/// reported by the normalizer against the node's path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    /// Node discriminant
    #[serde(rename = "type")]
    pub node_type: Option<Value>,
    /// Device polarity (transistor) or composite kind (`type: "node"`)
    pub kind: Option<Value>,
    /// Gate signal name
    pub gate: Option<Value>,
    /// Display name (flat-tag shape)
    pub name: Option<Value>,
    /// Device polarity (flat-tag and legacy shapes)
    #[serde(alias = "mos_type")]
    pub device_type: Option<Value>,
    /// Whether the gate signal is negated
    #[serde(alias = "gate_inverted")]
    pub gate_inverted: Option<Value>,
    /// Conduction sense bit
    #[serde(alias = "on_when")]
    pub on_when: Option<Value>,
    /// Child nodes of a composite
    pub children: Option<Value>,
}

impl RawNode {
    /// Read the node at `path` out of a JSON value.
    ///
    /// Anything but an object is a [`DiagramError::MalformedNetwork`].
    pub fn from_value(value: &Value, path: &str) -> Result<Self> {
        if !value.is_object() {
            return Err(DiagramError::malformed(
                path,
                format!("expected a node object, got {}", json_type(value)),
            ));
        }
        RawNode::deserialize(value).map_err(|e| DiagramError::malformed(path, e.to_string()))
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Operator glyphs chosen by the user's notation style.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotationStyle {
    pub not: String,
    pub and: String,
    pub or: String,
}

impl Default for NotationStyle {
    fn default() -> Self {
        Self {
            not: super::DEFAULT_NOT_GLYPH.to_string(),
            and: "&".to_string(),
            or: "|".to_string(),
        }
    }
}

/// Echo of the request that produced a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResponseInput {
    pub expression: String,
    pub style: Option<NotationStyle>,
}

/// One intermediate boolean expression of the synthesis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StepExpr {
    pub expr: String,
}

/// A synthesized network, left as JSON until it is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkStep {
    pub network: Value,
}

/// All pipeline stages reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisSteps {
    pub parse: Option<StepExpr>,
    pub simplify: Option<StepExpr>,
    pub complement: Option<StepExpr>,
    pub nnf: Option<StepExpr>,
    pub nnf_complement: Option<StepExpr>,
    pub factor: Option<StepExpr>,
    pub factor_complement: Option<StepExpr>,
    pub pdn: NetworkStep,
    pub pun: NetworkStep,
    /// Device totals as computed by the service, in whatever shape it sent
    pub count: Option<Value>,
}

impl SynthesisSteps {
    /// The service's device totals, if the `count` block has a known shape.
    pub fn reported_count(&self) -> Option<TransistorCount> {
        self.count
            .as_ref()
            .and_then(|count| TransistorCount::deserialize(count).ok())
    }

    /// Labelled intermediate expressions, in pipeline order, skipping absent ones.
    pub fn expressions(&self) -> Vec<(&'static str, &str)> {
        [
            ("Parse", &self.parse),
            ("Simplify", &self.simplify),
            ("Complement", &self.complement),
            ("NNF", &self.nnf),
            ("NNF (complement)", &self.nnf_complement),
            ("Factor", &self.factor),
            ("Factor (complement)", &self.factor_complement),
        ]
        .into_iter()
        .filter_map(|(label, step)| step.as_ref().map(|s| (label, s.expr.as_str())))
        .collect()
    }
}

/// Full response of the synthesis service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SynthesisResponse {
    #[serde(default)]
    pub input: ResponseInput,
    pub steps: SynthesisSteps,
}
