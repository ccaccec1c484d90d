// SPDX-License-Identifier: MIT

//! Generative text backend client and the itinerary/chat/suggestion
//! operations built on it.
//!
//! The backend is asked for structured JSON, but its replies are not
//! guaranteed to parse. Itinerary parsing degrades to a minimal
//! structure carrying the raw text; destination suggestions fail
//! outright, matching how callers treat them (best-effort enrichment).

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;
use crate::models::trip::DestinationGuide;
use crate::models::{GeneratedItinerary, NamedLocation, Trip, TripPreferences};
use crate::models::user::UserPreferences;

const MAX_CHAT_SUGGESTIONS: usize = 3;

/// Low-level client for the generative text API.
#[derive(Clone)]
pub struct GenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

impl GenAiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.genai_base_url.clone(),
            api_key: config.genai_api_key.clone(),
            model: config.genai_model.clone(),
        }
    }

    /// Send a single prompt and return the reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Generative API request failed");
                AppError::Upstream("Failed to generate content".to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, detail, "Generative API returned an error");
            return Err(AppError::Upstream("Failed to generate content".to_string()));
        }

        let reply: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Generative API reply was not valid JSON");
            AppError::Upstream("Failed to generate content".to_string())
        })?;

        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                tracing::error!("Generative API reply carried no candidates");
                AppError::Upstream("Failed to generate content".to_string())
            })
    }
}

/// Reply to a chat message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Optional context woven into a chat prompt.
#[derive(Debug, Default)]
pub struct PromptContext<'a> {
    pub trip: Option<&'a Trip>,
    pub preferences: Option<&'a UserPreferences>,
}

/// Itinerary, chat, and destination-suggestion generation.
#[derive(Clone)]
pub struct GenerationService {
    client: GenAiClient,
}

impl GenerationService {
    pub fn new(client: GenAiClient) -> Self {
        Self { client }
    }

    /// Generate a day-by-day itinerary for a trip. Unparseable replies
    /// degrade to a minimal structure rather than failing the request.
    pub async fn generate_itinerary(&self, trip: &Trip) -> Result<GeneratedItinerary, AppError> {
        let prompt = build_itinerary_prompt(trip);
        let text = self
            .client
            .generate(&prompt)
            .await
            .map_err(|_| AppError::Upstream("Failed to generate itinerary".to_string()))?;
        Ok(parse_itinerary(&text))
    }

    /// Answer a free-text travel question.
    pub async fn chat(
        &self,
        message: &str,
        context: &PromptContext<'_>,
    ) -> Result<ChatReply, AppError> {
        let prompt = build_chat_prompt(message, context);
        let text = self
            .client
            .generate(&prompt)
            .await
            .map_err(|_| AppError::Upstream("Failed to process chat message".to_string()))?;

        let suggestions = extract_suggestions(&text);
        Ok(ChatReply {
            message: text,
            suggestions,
        })
    }

    /// Detailed suggestions for a destination. The reply must parse;
    /// callers doing enrichment swallow the failure.
    pub async fn destination_suggestions(
        &self,
        destination: &NamedLocation,
        preferences: &TripPreferences,
    ) -> Result<DestinationGuide, AppError> {
        let prompt = build_suggestions_prompt(destination, preferences);
        let text = self
            .client
            .generate(&prompt)
            .await
            .map_err(|_| AppError::Upstream("Failed to get destination suggestions".to_string()))?;

        serde_json::from_str(strip_code_fences(&text)).map_err(|e| {
            tracing::error!(error = %e, "Destination suggestions did not parse");
            AppError::Upstream("Failed to get destination suggestions".to_string())
        })
    }
}

fn build_itinerary_prompt(trip: &Trip) -> String {
    format!(
        "Create a detailed {days}-day travel itinerary for {destination}.\n\
         \n\
         Trip Details:\n\
         - Dates: {start} to {end}\n\
         - Budget: {budget_total} {budget_currency}\n\
         - Travel Style: {style:?}\n\
         - Group Size: {group_size}\n\
         - Interests: {interests}\n\
         - Pace: {pace:?}\n\
         \n\
         Requirements:\n\
         1. Create a day-by-day itinerary\n\
         2. Include specific attractions, restaurants, and activities\n\
         3. Provide estimated costs for each activity\n\
         4. Consider opening hours and seasonal factors\n\
         5. Balance must-see attractions with local experiences\n\
         \n\
         Respond with JSON only, in this shape:\n\
         {{\n\
           \"overview\": {{\"totalDays\": 0, \"highlights\": [], \"estimatedCost\": \"\"}},\n\
           \"days\": [\n\
             {{\n\
               \"day\": 1,\n\
               \"date\": \"YYYY-MM-DD\",\n\
               \"theme\": \"\",\n\
               \"activities\": [\n\
                 {{\"time\": \"\", \"title\": \"\", \"description\": \"\", \
                    \"location\": {{\"name\": \"\", \"coordinates\": {{\"lat\": 0, \"lng\": 0}}}}, \
                    \"duration\": \"\", \"cost\": 0, \"category\": \"\", \"tips\": \"\"}}\n\
               ],\n\
               \"meals\": [{{\"type\": \"\", \"restaurant\": \"\", \"cuisine\": \"\", \"cost\": \"\"}}],\n\
               \"transportation\": \"\"\n\
             }}\n\
           ],\n\
           \"packingList\": [],\n\
           \"importantNotes\": []\n\
         }}",
        days = trip.duration_days(),
        destination = trip.destination.name,
        start = trip.start_date,
        end = trip.end_date,
        budget_total = trip.budget.total,
        budget_currency = trip.budget.currency,
        style = trip.preferences.travel_style,
        group_size = trip.preferences.group_size,
        interests = trip.preferences.interests.join(", "),
        pace = trip.preferences.pace,
    )
}

fn build_chat_prompt(message: &str, context: &PromptContext<'_>) -> String {
    let mut context_info = String::new();
    if let Some(trip) = context.trip {
        context_info.push_str(&format!(
            "Current trip context: {} from {} to {}. ",
            trip.destination.name, trip.start_date, trip.end_date
        ));
    }
    if let Some(preferences) = context.preferences {
        context_info.push_str(&format!(
            "User preferences: {}. ",
            serde_json::to_string(preferences).unwrap_or_default()
        ));
    }

    format!(
        "You are an expert AI travel assistant. {context_info}\n\
         \n\
         User message: \"{message}\"\n\
         \n\
         Provide helpful, personalized travel advice. Be conversational but informative. \
         Keep responses concise but helpful. Always end with a follow-up question to keep \
         the conversation engaging."
    )
}

fn build_suggestions_prompt(destination: &NamedLocation, preferences: &TripPreferences) -> String {
    format!(
        "Act as an expert travel guide. Provide detailed suggestions for {name} based on \
         these preferences: {prefs}.\n\
         \n\
         Include top attractions, local cuisine, cultural etiquette tips, neighborhoods to \
         stay in, transportation tips, safety considerations, and budget estimates.\n\
         \n\
         Respond with JSON only, in this shape:\n\
         {{\n\
           \"attractions\": [{{\"name\": \"\", \"description\": \"\", \"category\": \"\", \
              \"estimatedTime\": \"\", \"cost\": \"\"}}],\n\
           \"cuisine\": [{{\"dish\": \"\", \"description\": \"\", \"whereToTry\": \"\"}}],\n\
           \"etiquette\": [\"\"],\n\
           \"neighborhoods\": [{{\"name\": \"\", \"description\": \"\", \"priceRange\": \"\"}}],\n\
           \"transportation\": {{\"local\": \"\", \"fromAirport\": \"\", \"tips\": \"\"}},\n\
           \"safety\": {{\"tips\": [\"\"]}},\n\
           \"budgetEstimates\": {{\"budget\": \"\", \"midRange\": \"\", \"luxury\": \"\"}}\n\
         }}",
        name = destination.name,
        prefs = serde_json::to_string(preferences).unwrap_or_default(),
    )
}

/// Parse the backend's itinerary reply, degrading to a minimal
/// structure carrying the raw text when it does not parse.
pub(crate) fn parse_itinerary(text: &str) -> GeneratedItinerary {
    match serde_json::from_str(strip_code_fences(text)) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Itinerary reply did not parse, degrading to raw text");
            GeneratedItinerary {
                important_notes: vec![text.to_string()],
                ..GeneratedItinerary::default()
            }
        }
    }
}

/// Models often wrap JSON in a markdown code fence.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Pick up to three actionable lines out of a chat reply. Inherently
/// fragile keyword scan, kept from the source system.
pub(crate) fn extract_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            lower.contains("suggest") || lower.contains("recommend") || lower.contains("consider")
        })
        .map(|line| line.trim().to_string())
        .take(MAX_CHAT_SUGGESTIONS)
        .collect()
}
