//! Fixed heuristic descriptions of declaration source text
//!
//! Classification is plain substring matching on the verbatim source. The
//! buckets are checked in order and the first match wins.

/// Bucket a piece of source text falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Mentions the web framework
    WebEndpoint,
    /// Mentions the HTTP client or an external API
    ApiIntegration,
    BackendLogic,
}

impl Category {
    #[must_use]
    pub fn classify(source_text: &str) -> Self {
        if source_text.contains("Flask") {
            Self::WebEndpoint
        } else if source_text.contains("requests") || source_text.contains("API") {
            Self::ApiIntegration
        } else {
            Self::BackendLogic
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::WebEndpoint => "This code defines a Flask web server exposing an endpoint for currency conversion. It fetches live rates, performs conversion, validates numerical inputs, and handles errors gracefully.",
            Self::ApiIntegration => "This function/module integrates a third-party API (Alpha Vantage) to fetch live currency rates for conversion.",
            Self::BackendLogic => "This function or class is part of the currency converter backend logic.",
        }
    }
}

/// One-sentence functionality highlight
#[must_use]
pub fn summarize(source_text: &str) -> &'static str {
    Category::classify(source_text).description()
}

/// One-sentence error handling highlight, keyed on the `except` keyword
#[must_use]
pub fn error_handling(source_text: &str) -> &'static str {
    if source_text.contains("except") {
        "This module uses try/except blocks to catch and gracefully handle errors, e.g., invalid inputs, API failures."
    } else {
        "No explicit error handling."
    }
}
