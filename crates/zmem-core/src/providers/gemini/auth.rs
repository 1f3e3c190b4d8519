//! Gemini authentication

use reqwest::RequestBuilder;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Authentication method for Gemini API
#[derive(Clone)]
pub enum GeminiAuth {
    /// API Key authentication (for generativelanguage.googleapis.com)
    ApiKey(String),
}

impl GeminiAuth {
    /// Apply authentication to a request builder.
    ///
    /// The key travels in a header so it never becomes part of the request URL,
    /// which reqwest echoes back in its transport errors.
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            GeminiAuth::ApiKey(key) => builder.header(API_KEY_HEADER, key.as_str()),
        }
    }
}

// Credentials never end up in logs
impl std::fmt::Debug for GeminiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeminiAuth::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}
