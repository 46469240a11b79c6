//! Subcommand bodies
//!
//! Each command returns an [`Outcome`] carrying the text for stdout; I/O and
//! parse failures come back as `Err` and map to exit code 2.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde_json::json;
use spectab_engine::{EngineConfig, SpecEngine};
use spectab_model::SpecificationDraft;

/// Result of a command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Document accepted
    Accepted(String),
    /// Document rejected; the text is the structured error
    Rejected(String),
}

impl Outcome {
    pub(crate) fn output(&self) -> &str {
        match self {
            Self::Accepted(text) | Self::Rejected(text) => text,
        }
    }
}

/// Engine with the configuration at `config`, or the defaults
pub(crate) fn load_engine(config: Option<&Path>) -> anyhow::Result<SpecEngine> {
    let config = match config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(SpecEngine::new(config))
}

/// Read a draft from `path`, or from stdin for `-`
pub(crate) fn read_draft(path: &Path) -> anyhow::Result<SpecificationDraft> {
    let source = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };

    serde_json::from_str(&source).with_context(|| format!("parsing {}", path.display()))
}

/// Check a document and print a short summary
pub(crate) fn validate(engine: &SpecEngine, path: &Path) -> anyhow::Result<Outcome> {
    let draft = read_draft(path)?;
    tracing::debug!(path = %path.display(), "validating");

    Ok(match engine.validate_and_normalize(&draft) {
        Ok(doc) => Outcome::Accepted(
            json!({
                "valid": true,
                "title": &doc.title,
                "type": doc.content_type,
                "columnCount": doc.column_count(),
            })
            .to_string(),
        ),
        Err(e) => Outcome::Rejected(serde_json::to_string(&e)?),
    })
}

/// Print the canonical form of a document
pub(crate) fn normalize(engine: &SpecEngine, path: &Path, pretty: bool) -> anyhow::Result<Outcome> {
    let draft = read_draft(path)?;
    tracing::debug!(path = %path.display(), pretty, "normalizing");

    Ok(match engine.validate_and_normalize(&draft) {
        Ok(doc) if pretty => Outcome::Accepted(serde_json::to_string_pretty(&doc)?),
        Ok(doc) => Outcome::Accepted(serde_json::to_string(&doc)?),
        Err(e) => Outcome::Rejected(serde_json::to_string(&e)?),
    })
}
