use serde::Deserialize;
use std::time::Duration;

use super::Translator;
use crate::error::TranslationError;

const API_URL: &str = "https://api.mymemory.translated.net/get";

/// Prefix MyMemory puts in `translatedText` when the free quota is used up
const QUOTA_WARNING: &str = "MYMEMORY WARNING";

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// MyMemory `/get` response structure
#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
    /// Sent as a number on success, sometimes as a string on errors
    #[serde(rename = "responseStatus")]
    response_status: serde_json::Value,
    #[serde(rename = "responseDetails", default)]
    response_details: serde_json::Value,
}

fn status_code(value: &serde_json::Value) -> Option<u16> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn details_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turn a decoded provider response into a translation or an explicit error
fn interpret_response(response: MyMemoryResponse) -> Result<String, TranslationError> {
    let status = status_code(&response.response_status).ok_or_else(|| {
        TranslationError::MalformedResponse(format!(
            "unexpected responseStatus {}",
            response.response_status
        ))
    })?;
    let details = details_text(&response.response_details);

    if status == 429 {
        return Err(TranslationError::RateLimited(details));
    }
    if status != 200 {
        return Err(TranslationError::Status { status, details });
    }

    let text = response
        .response_data
        .and_then(|data| data.translated_text)
        .ok_or_else(|| TranslationError::MalformedResponse("missing translatedText".to_string()))?;

    if text.starts_with(QUOTA_WARNING) {
        return Err(TranslationError::RateLimited(text));
    }
    if text.trim().is_empty() {
        return Err(TranslationError::MalformedResponse(
            "empty translatedText".to_string(),
        ));
    }

    Ok(text)
}

/// Translation provider backed by the MyMemory HTTP API
pub struct MyMemoryTranslator {
    agent: ureq::Agent,
    source_language: String,
    target_language: String,
    email: Option<String>,
}

impl MyMemoryTranslator {
    pub fn new(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        timeout: Option<Duration>,
        email: Option<String>,
    ) -> Self {
        let mut builder = ureq::AgentBuilder::new()
            .user_agent(&format!("live-text-translator/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            email,
        }
    }

    fn language_pair(&self) -> String {
        format!("{}|{}", self.source_language, self.target_language)
    }
}

impl Translator for MyMemoryTranslator {
    fn translate(&self, text: &str) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyInput);
        }

        if self.source_language.eq_ignore_ascii_case(&self.target_language) {
            return Ok(text.to_string());
        }

        let pair = self.language_pair();
        let mut request = self
            .agent
            .get(API_URL)
            .query("q", text)
            .query("langpair", &pair);
        if let Some(email) = &self.email {
            request = request.query("de", email);
        }

        let response = match request.call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(429, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                return Err(TranslationError::RateLimited(body));
            }
            Err(ureq::Error::Status(status, resp)) => {
                let details = resp.into_string().unwrap_or_default();
                return Err(TranslationError::Status { status, details });
            }
            Err(ureq::Error::Transport(e)) => {
                return Err(TranslationError::Transport(e.to_string()));
            }
        };

        let parsed: MyMemoryResponse = response
            .into_json()
            .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;

        let translated = interpret_response(parsed)?;
        tracing::debug!("[translate] {:?} -> {:?} ({})", text, translated, pair);
        Ok(translated)
    }

    fn target_language(&self) -> &str {
        &self.target_language
    }
}
