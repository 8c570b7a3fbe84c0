// Version information for the FAQ Embedding Node

/// Human-readable service name reported by the API index
pub const SERVICE_NAME: &str = "MiniLM Text Embedding API";

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-faq-matching-2026-10-18";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Build date
pub const BUILD_DATE: &str = "2026-10-18";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "sentence-embeddings",
    "faq-matching",
    "lazy-model-loading",
    "onnx-runtime",
    "hf-hub-download",
    "cors",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("FAQ Embedding Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
