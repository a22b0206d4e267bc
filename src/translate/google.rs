//! Google Translate client (unauthenticated `gtx` endpoint).

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{TranslateError, Translator};
use crate::config::TranslationSettings;

/// Translator backed by the public `translate_a/single` endpoint
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(settings: &TranslationSettings) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("truepedia/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, to: &str, from: &str) -> Result<String, TranslateError> {
        debug!(bytes = text.len(), to, from, "Translating");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", from),
                ("tl", to),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        parse_translation(&response.text().await?)
    }
}

/// Join the translated segments of a `dt=t` response.
///
/// The body is a nested array whose first element lists
/// `[translated, original, ...]` pairs, one per sentence.
pub fn parse_translation(body: &str) -> Result<String, TranslateError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| TranslateError::InvalidResponse(format!("malformed JSON: {}", e)))?;

    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::InvalidResponse("missing sentence list".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translation_joins_segments() {
        let body = r#"[[["Bonjour le monde. ","Hello world. ",null,null,10],
            ["Comment allez-vous?","How are you?",null,null,10]],null,"en"]"#;
        assert_eq!(
            parse_translation(body).unwrap(),
            "Bonjour le monde. Comment allez-vous?"
        );
    }

    #[test]
    fn test_parse_translation_skips_non_text_segments() {
        let body = r#"[[["Hallo","Hello"],[null,null,"Halo"]],null,"en"]"#;
        assert_eq!(parse_translation(body).unwrap(), "Hallo");
    }

    #[test]
    fn test_parse_translation_rejects_unexpected_shape() {
        assert!(matches!(
            parse_translation(r#"{"error":"quota"}"#),
            Err(TranslateError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_translation("not json"),
            Err(TranslateError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_stalled_endpoint_times_out() {
        // Accepts connections but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let settings = TranslationSettings {
            endpoint: format!("http://{}/translate", listener.local_addr().unwrap()),
            timeout_seconds: 1,
            ..TranslationSettings::default()
        };
        let translator = GoogleTranslator::new(&settings).unwrap();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            translator.translate("Hello", "fr", "en"),
        )
        .await
        .expect("request should give up on its own");

        assert!(matches!(result, Err(TranslateError::Network(_))));
        drop(listener);
    }

    #[test]
    fn test_new_uses_configured_endpoint() {
        let settings = TranslationSettings {
            endpoint: "http://localhost:1/translate".to_string(),
            ..TranslationSettings::default()
        };
        let translator = GoogleTranslator::new(&settings).unwrap();
        assert_eq!(translator.endpoint, "http://localhost:1/translate");
    }
}
