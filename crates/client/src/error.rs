//! Errors from the inventory REST layer.

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body
    /// decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {message}")]
    Status {
        status: u16,
        /// Message extracted from the response body, shown to users as is.
        message: String,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ApiError {
    /// Build a [`ApiError::Status`] from a failed response's status and body.
    pub fn from_status(status: u16, body: String) -> Self {
        let message = extract_message(&body).unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unexpected response")
                .to_string()
        });
        Self::Status {
            status,
            message,
            body,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// HTTP 429: the backend asked us to slow down.
    pub fn is_throttled(&self) -> bool {
        self.status() == Some(429)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Text for an alert banner. Server messages such as
    /// "Serial Number already exists" are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Request(e) if e.is_timeout() => "The server took too long to respond.".to_string(),
            Self::Request(e) if e.is_connect() => "Could not reach the server.".to_string(),
            Self::Request(_) => "Unexpected error talking to the server.".to_string(),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": "..."}`, `{"message": ["...", "..."]}` and
/// `{"error": "..."}`; any other non-empty body is returned trimmed.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(json) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };
    let field = json.get("message").or_else(|| json.get("error"))?;
    match field {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}
