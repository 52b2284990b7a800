//! Wit.ai client and the remote half of the entity synchronizer.

pub mod http_client;
pub mod import;
pub mod remote;
pub mod sync;

pub use http_client::WitClient;
pub use import::{import_all, import_entities, import_intents, import_utterances, ImportSummary};
pub use remote::WitRemote;
pub use sync::{
    create_or_update_entity, delete_entity, delete_intent, ensure_intent, force_upload_entity,
    recreate_entity, recreate_intent, upload_utterances, upsert_entity, DeleteOutcome,
    EnsureOutcome, UpsertOutcome,
};
