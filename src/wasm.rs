//! WASM bindings for the CMOS diagram renderer.
//!
//! This module provides JavaScript-friendly bindings so a web front end can
//! draw a synthesis response without reimplementing layout.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmDiagram } from 'cmos_diagram';
//!
//! await init();
//!
//! const response = await fetch('/synthesize', {
//!   method: 'POST',
//!   headers: { 'content-type': 'application/json' },
//!   body: JSON.stringify({ expr: 'A & (B | !C)' }),
//! }).then((r) => r.text());
//!
//! const diagram = new WasmDiagram(response, '!');
//! document.getElementById('pun').innerHTML = diagram.pun_svg();
//! document.getElementById('pdn').innerHTML = diagram.pdn_svg();
//! ```

use wasm_bindgen::prelude::*;

use crate::error::DiagramError;
use crate::network::{CmosNetwork, TransistorCount};
use crate::normalize::{self, Document};
use crate::render::{render_cmos, svg, CmosDiagram};
use crate::Config;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_err(e: DiagramError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A rendered PUN/PDN pair.
///
/// Layout happens once, in the constructor; a new response needs a new
/// `WasmDiagram`.
#[wasm_bindgen]
pub struct WasmDiagram {
    network: CmosNetwork,
    diagram: CmosDiagram,
}

#[wasm_bindgen]
impl WasmDiagram {
    /// Render a synthesis response or `{pun, pdn}` pair.
    ///
    /// # Arguments
    /// * `input_json` - The response body as text
    /// * `not_glyph` - Inversion glyph; defaults to the response's style, then `~`
    #[wasm_bindgen(constructor)]
    pub fn new(input_json: &str, not_glyph: Option<String>) -> Result<WasmDiagram, JsValue> {
        Self::with_config(input_json, not_glyph, None)
    }

    /// Render with a JSON configuration (same shape as the CLI config file).
    #[wasm_bindgen]
    pub fn with_config(
        input_json: &str,
        not_glyph: Option<String>,
        config_json: Option<String>,
    ) -> Result<WasmDiagram, JsValue> {
        let config = match config_json {
            Some(text) => Config::from_json(&text).map_err(js_err)?,
            None => Config::default(),
        };
        let glyph = not_glyph.or_else(|| config.not_glyph.clone());

        let document = normalize::parse_document(input_json).map_err(js_err)?;
        let network = document
            .to_cmos_network(glyph.as_deref())
            .ok_or_else(|| {
                js_err(DiagramError::WasmError {
                    message: "input carries a single network, expected a PUN/PDN pair"
                        .to_string(),
                })
            })?
            .map_err(js_err)?;

        let diagram = render_cmos(&network, &config);
        Ok(WasmDiagram { network, diagram })
    }

    /// Both panels side by side.
    #[wasm_bindgen]
    pub fn svg(&self) -> String {
        svg::cmos_to_svg(&self.diagram)
    }

    /// The pull-up panel alone.
    #[wasm_bindgen]
    pub fn pun_svg(&self) -> String {
        svg::to_svg(&self.diagram.pun)
    }

    /// The pull-down panel alone.
    #[wasm_bindgen]
    pub fn pdn_svg(&self) -> String {
        svg::to_svg(&self.diagram.pdn)
    }

    /// Positioned primitives of one panel (`"pun"` or `"pdn"`) as JSON.
    #[wasm_bindgen]
    pub fn primitives_json(&self, network: &str) -> Result<String, JsValue> {
        let panel = match network {
            "pun" => &self.diagram.pun,
            "pdn" => &self.diagram.pdn,
            other => {
                return Err(js_err(DiagramError::WasmError {
                    message: format!("unknown network '{other}', expected 'pun' or 'pdn'"),
                }))
            }
        };
        serde_json::to_string(panel).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Device totals as JSON, in the service's `count` block shape.
    #[wasm_bindgen]
    pub fn transistor_count_json(&self) -> Result<String, JsValue> {
        let count = TransistorCount::from_network(&self.network);
        serde_json::to_string(&count).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Pull-up network as an expression, e.g. `A | B`.
    #[wasm_bindgen(getter)]
    pub fn pun_expression(&self) -> String {
        self.network.pun.to_string()
    }

    /// Pull-down network as an expression.
    #[wasm_bindgen(getter)]
    pub fn pdn_expression(&self) -> String {
        self.network.pdn.to_string()
    }
}

/// Parse a document and report its kind: `"response"`, `"pair"` or `"single"`.
#[wasm_bindgen]
pub fn document_kind(input_json: &str) -> Result<String, JsValue> {
    let kind = match normalize::parse_document(input_json).map_err(js_err)? {
        Document::Response(_) => "response",
        Document::Pair { .. } => "pair",
        Document::Single(_) => "single",
    };
    Ok(kind.to_string())
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
