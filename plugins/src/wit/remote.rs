//! The seam between the sync operations and the Wit.ai HTTP API.

use async_trait::async_trait;
use serde_json::Value;
use witsync_core::api::{EntityDocument, IntentDocument, WitApiError};

/// Remote store operations, one HTTP request each.
#[async_trait]
pub trait WitRemote: Send + Sync {
    /// `GET /entities/{name}`.
    async fn get_entity(&self, name: &str) -> Result<Value, WitApiError>;

    /// `POST /entities` with the full document.
    async fn create_entity(&self, doc: &EntityDocument) -> Result<Value, WitApiError>;

    /// `PUT /entities/{name}`, replacing the whole document.
    async fn update_entity(&self, name: &str, doc: &EntityDocument) -> Result<Value, WitApiError>;

    /// `DELETE /entities/{name}`.
    async fn delete_entity(&self, name: &str) -> Result<Value, WitApiError>;

    /// `GET /intents/{name}`.
    async fn get_intent(&self, name: &str) -> Result<Value, WitApiError>;

    /// `POST /intents`.
    async fn create_intent(&self, doc: &IntentDocument) -> Result<Value, WitApiError>;

    /// `DELETE /intents/{name}`.
    async fn delete_intent(&self, name: &str) -> Result<Value, WitApiError>;

    /// `POST /utterances` with a one-element array.
    async fn post_utterance(&self, utterance: &Value) -> Result<Value, WitApiError>;

    /// `POST /train`.
    async fn train(&self) -> Result<Value, WitApiError>;
}
