use thiserror::Error;

/// Errors surfaced by the provider and config layers.
///
/// The pure parts of the core (search ranking, forecast aggregation) never
/// error; they degrade to empty results instead.
#[derive(Debug, Error)]
pub enum SkycastError {
    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `skycast configure` and enter your API key."
    )]
    MissingApiKey,

    #[error("OpenWeather request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to reach OpenWeather: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse OpenWeather response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed OpenWeather response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_message_points_at_configure() {
        let msg = SkycastError::MissingApiKey.to_string();
        assert!(msg.contains("skycast configure"));
    }

    #[test]
    fn api_error_carries_status_and_body() {
        let err = SkycastError::Api { status: 401, body: "Invalid API key".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key"));
    }
}
