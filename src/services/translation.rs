// SPDX-License-Identifier: MIT

//! Text translation and language detection through the generative
//! backend. No dedicated translation API: the model does the work.

use serde::Serialize;

use crate::error::AppError;
use crate::services::GenAiClient;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub original_text: String,
    pub translated_text: String,
    pub from_language: String,
    pub to_language: String,
}

#[derive(Clone)]
pub struct TranslationService {
    client: GenAiClient,
}

impl TranslationService {
    pub fn new(client: GenAiClient) -> Self {
        Self { client }
    }

    /// Translate text between languages. `from` defaults to letting the
    /// model detect the source language.
    pub async fn translate(
        &self,
        text: &str,
        to: &str,
        from: Option<&str>,
    ) -> Result<Translation, AppError> {
        let from_language = from.unwrap_or("auto").to_string();
        let prompt = build_translate_prompt(text, to, &from_language);

        let translated = self.client.generate(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, "Translation request failed");
            AppError::Upstream("Failed to translate text".to_string())
        })?;

        Ok(Translation {
            original_text: text.to_string(),
            translated_text: translated.trim().to_string(),
            from_language,
            to_language: to.to_string(),
        })
    }

    /// Detect the language of a text, returned as a lowercase ISO 639-1
    /// code.
    pub async fn detect_language(&self, text: &str) -> Result<String, AppError> {
        let prompt = format!(
            "Detect the language of the following text. Respond with only \
             the two-letter ISO 639-1 language code, nothing else.\n\n\
             Text: {text}"
        );

        let reply = self.client.generate(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, "Language detection request failed");
            AppError::Upstream("Failed to detect language".to_string())
        })?;

        Ok(reply.trim().to_lowercase())
    }
}

fn build_translate_prompt(text: &str, to: &str, from: &str) -> String {
    let source = if from == "auto" {
        "Detect the source language.".to_string()
    } else {
        format!("The source language is {from}.")
    };

    format!(
        "Translate the following text to {to}. {source} Respond with only \
         the translated text, no explanations or quotes.\n\n\
         Text: {text}"
    )
}
