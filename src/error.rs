//! Error types for the CMOS diagram renderer.
//!
//! This module provides a unified error type [`DiagramError`] that covers
//! all error conditions that can occur while normalizing upstream networks,
//! decoding canonical trees, configuring layout, and writing output.

use thiserror::Error;

/// Result type alias using [`DiagramError`].
pub type Result<T> = std::result::Result<T, DiagramError>;

/// Unified error type for all diagram operations.
#[derive(Error, Debug)]
pub enum DiagramError {
    // ============ Input Errors ============
    /// Upstream network node has a shape the normalizer does not recognize
    #[error("Malformed network at {path}: {message}")]
    MalformedNetwork { path: String, message: String },

    /// Canonical tree carries a node tag outside transistor/series/parallel
    #[error("Unknown node kind '{kind}'")]
    UnknownNodeKind { kind: String },

    /// Input is not valid JSON, or does not fit the expected document shape
    #[error("Invalid JSON input: {source}")]
    InvalidJson {
        #[from]
        source: serde_json::Error,
    },

    // ============ Configuration Errors ============
    /// Invalid layout or render setting
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ============ I/O Errors ============
    /// Error reading an input or config file
    #[error("Failed to read '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing rendered output
    #[error("Output error: {message}")]
    OutputError { message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl DiagramError {
    /// Create a malformed network error
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedNetwork {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unknown node kind error
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownNodeKind { kind: kind.into() }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
