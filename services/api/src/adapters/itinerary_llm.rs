//! services/api/src/adapters/itinerary_llm.rs
//!
//! This module contains the adapter for the itinerary-writing LLM.
//! It implements the `ItineraryGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::info;
use trip_planner_core::{
    domain::TripRequest,
    ports::{ItineraryGenerationService, PortError, PortResult},
};

const SYSTEM_PROMPT: &str = "You are a professional travel guide. You will be given a location, purpose of trip, and date range. Provide a detailed itinerary for the user. Each day should be titled in this format: Day: All Locations planned. Don't provide a general title nor conclusion for the trip";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ItineraryGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiItineraryAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiItineraryAdapter {
    /// Creates a new `OpenAiItineraryAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// The user message: destination, purpose and date range, one per line.
pub fn user_prompt(request: &TripRequest) -> String {
    format!(
        "Location: {}\nPurpose: {}\nDate Range: {} to {}",
        request.location, request.purpose, request.start_date, request.end_date
    )
}

//=========================================================================================
// `ItineraryGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ItineraryGenerationService for OpenAiItineraryAdapter {
    async fn generate_itinerary(&self, request: &TripRequest) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt(request))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.0)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let itinerary = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Itinerary LLM response contained no text content.".to_string())
            })?;

        info!("Generated itinerary of {} characters", itinerary.len());
        Ok(itinerary)
    }
}
