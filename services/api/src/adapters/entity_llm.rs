//! services/api/src/adapters/entity_llm.rs
//!
//! Named-entity tagging backed by a chat-completion model.
//! It implements the `EntityRecognitionService` port from the `core` crate.
//!
//! The model is asked for OntoNotes labels so that the core's category mapping
//! (`LOC`, `GPE`, `FAC`, `ORG`) applies unchanged.

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
use serde::Deserialize;
use tracing::debug;
use trip_planner_core::{
    domain::{Entity, EntityCategory},
    ports::{EntityRecognitionService, PortError, PortResult},
};

const SYSTEM_PROMPT: &str = r#"You are a named-entity recognizer. Tag every named entity in the user's text using OntoNotes labels (PERSON, NORP, FAC, ORG, GPE, LOC, PRODUCT, EVENT, WORK_OF_ART, LAW, LANGUAGE, DATE, TIME, PERCENT, MONEY, QUANTITY, ORDINAL, CARDINAL).
Respond with ONLY a JSON array of objects of the form {"text": "<exact span from the input>", "label": "<LABEL>"}. Respond with [] if there are no entities. No explanation, no code fences."#;

#[derive(Deserialize)]
struct TaggedSpan {
    text: String,
    label: String,
}

/// An adapter that implements `EntityRecognitionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiEntityAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiEntityAdapter {
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// Parses the model's JSON reply, tolerating prose or fences around the array.
pub fn parse_entities(reply: &str) -> PortResult<Vec<Entity>> {
    let start = reply.find('[');
    let end = reply.rfind(']');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &reply[s..=e],
        _ => {
            return Err(PortError::Unexpected(format!(
                "Entity reply is not a JSON array: {}",
                reply
            )))
        }
    };

    let spans: Vec<TaggedSpan> =
        serde_json::from_str(json).map_err(|e| PortError::Unexpected(e.to_string()))?;

    Ok(spans
        .into_iter()
        .map(|span| Entity::new(span.text, EntityCategory::from_label(&span.label)))
        .collect())
}

#[async_trait]
impl EntityRecognitionService for OpenAiEntityAdapter {
    async fn recognize_entities(&self, text: &str) -> PortResult<Vec<Entity>> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(text)
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

        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let entities = parse_entities(&reply)?;
        debug!("Tagged {} entities in '{}'", entities.len(), text);
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_array() {
        let entities =
            parse_entities(r#"[{"text": "Eiffel Tower", "label": "FAC"}, {"text": "Monday", "label": "DATE"}]"#)
                .unwrap();
        assert_eq!(
            entities,
            vec![
                Entity::new("Eiffel Tower", EntityCategory::Facility),
                Entity::new("Monday", EntityCategory::Other),
            ]
        );
    }

    #[test]
    fn parses_fenced_reply() {
        let reply = "```json\n[{\"text\": \"Kyoto\", \"label\": \"GPE\"}]\n```";
        let entities = parse_entities(reply).unwrap();
        assert_eq!(entities, vec![Entity::new("Kyoto", EntityCategory::GeopoliticalEntity)]);
    }

    #[test]
    fn empty_array_is_no_entities() {
        assert!(parse_entities("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_entities("I found the Louvre").is_err());
    }
}
