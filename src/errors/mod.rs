//! Error type definitions for the IPTV aggregator
//!
//! Two layers: `AppError` covers run-fatal failures (template, output,
//! configuration), `SourceError` covers per-source failures that are
//! isolated at the source boundary and never abort the run.

use thiserror::Error;

/// Top-level application error type
///
/// Any of these aborts the current run. Per-source failures are *not*
/// represented here; they are collected into `SourceReport`s instead.
#[derive(Error, Debug)]
pub enum AppError {
    /// Template file missing or unreadable
    #[error("Template error: {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Output files cannot be created or written
    #[error("Output error: {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Per-source errors, isolated at the source boundary
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network/HTTP failure while retrieving a source
    #[error("Acquisition failed: {url} - {message}")]
    Acquisition { url: String, message: String },

    /// Failure while processing a source's payload
    #[error("Parse failed: {url} - {message}")]
    Parse { url: String, message: String },
}

impl AppError {
    /// Create a configuration error with a custom message
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a template error for a specific path
    pub fn template<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::Template {
            path: path.into(),
            source,
        }
    }

    /// Create an output error for a specific path
    pub fn output<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}

impl SourceError {
    /// Create an acquisition error
    pub fn acquisition<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Acquisition {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Parse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// The source URL this error belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::Acquisition { url, .. } | Self::Parse { url, .. } => url,
        }
    }
}
