//! Common types used across CLI modules

use std::path::PathBuf;

use anyhow::{Context, Result};
use tandem_core::domain::job::ProofInput;

/// Where the proof input comes from: inline JSON or `@path/to/input.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// JSON given directly on the command line
    Inline(String),
    /// JSON read from a file
    File(PathBuf),
}

impl InputSource {
    /// Parse a command-line value into an InputSource
    pub fn parse(input: &str) -> Self {
        match input.strip_prefix('@') {
            Some(path) => InputSource::File(PathBuf::from(path)),
            None => InputSource::Inline(input.to_string()),
        }
    }

    /// Load and check the input document
    pub fn load(&self) -> Result<ProofInput> {
        let raw = match self {
            InputSource::Inline(json) => json.clone(),
            InputSource::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read proof input {}", path.display()))?,
        };

        let value: serde_json::Value =
            serde_json::from_str(&raw).context("Proof input is not valid JSON")?;

        Ok(ProofInput::from_json(&value))
    }
}
