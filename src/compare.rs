//! Top-level comparison entry points.
//!
//! [`try_compare`] reports failures as [`CompareError`]. [`compare`] keeps
//! the legacy contract of always returning a string: any failure, including
//! a panic inside the comparison, becomes the empty string. A successful
//! comparison is never empty, because it is wrapped in `{"diff": [...]}`.
//!
//! # Examples
//!
//! ```
//! use inline_diff_json::compare;
//!
//! assert_eq!(compare("same", "same"), r#"{"diff": []}"#);
//! assert!(compare("cat sat", "cat ran").contains(r#""text": "cat satran""#));
//! ```

use crate::align::run_diff;
use crate::config::DiffConfig;
use crate::error::CompareError;
use crate::inline_json::InlineJsonRenderer;
use crate::terminal::TextRenderer;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Output format of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `{"diff": [...]}` document of inline diff records
    Json,
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// Plain text, no colors (suitable for piping)
    Plain,
}

/// Wraps a renderer body into the comparison document.
pub fn json_document(body: &str) -> String {
    format!("{{\"diff\": [{}]}}", body)
}

/// Compares two revisions and returns the JSON document.
pub fn try_compare(old: &str, new: &str, config: &DiffConfig) -> Result<String, CompareError> {
    try_compare_with_format(old, new, config, OutputFormat::Json)
}

/// Compares two revisions and renders the result in `format`.
pub fn try_compare_with_format(
    old: &str,
    new: &str,
    config: &DiffConfig,
    format: OutputFormat,
) -> Result<String, CompareError> {
    config.validate()?;

    let actual = old.len().saturating_add(new.len());
    if actual > config.max_input_bytes {
        return Err(CompareError::InputTooLarge {
            limit: config.max_input_bytes,
            actual,
        });
    }

    match format {
        OutputFormat::Json => {
            let mut renderer = InlineJsonRenderer::new(config);
            renderer
                .buffer_mut()
                .try_reserve(actual)
                .map_err(|source| CompareError::OutOfMemory { source })?;
            let events = run_diff(old, new, config, &mut renderer);
            tracing::debug!(events, bytes = renderer.body().len(), "rendered JSON diff");
            Ok(json_document(renderer.body()))
        }
        OutputFormat::Terminal | OutputFormat::Plain => {
            let mut renderer = if format == OutputFormat::Terminal {
                TextRenderer::terminal(config)
            } else {
                TextRenderer::plain(config)
            };
            run_diff(old, new, config, &mut renderer);
            Ok(renderer.finish())
        }
    }
}

/// Runs `f`, turning a panic into [`CompareError::Internal`].
pub fn run_guarded<F>(f: F) -> Result<String, CompareError>
where
    F: FnOnce() -> Result<String, CompareError>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(CompareError::Internal {
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Compares two revisions with the default configuration.
///
/// Returns the empty string on any failure.
pub fn compare(old: &str, new: &str) -> String {
    compare_with_config(old, new, &DiffConfig::default())
}

/// Like [`compare`], with an explicit configuration.
pub fn compare_with_config(old: &str, new: &str, config: &DiffConfig) -> String {
    match run_guarded(|| try_compare(old, new, config)) {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!(error = %err, "comparison failed, returning empty result");
            String::new()
        }
    }
}
