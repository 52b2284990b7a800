//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `witsync_core::api` instead of reaching into internal modules.

pub use crate::config::{
    get_witsync_data_dir, load, load_from_path, AppConfig, EntityProfile, ImportConfig,
    LoggingConfig, PathsConfig, WitConfig,
};
pub use crate::diff::{stats, synchronize, CasePolicy, DiffResult, SyncStats};
pub use crate::error::{CliError, TransportKind, WitApiError};
pub use crate::json_file::{read_json, write_json};
pub use crate::mirror::{
    add, build_entry, clean, reset, sync_document, MirrorFile, SyncOutcome, SynonymStyle,
};
pub use crate::model::{
    canonical_names, load_canonical, CanonicalRecord, EntityDocument, IntentDocument, KeywordEntry,
};
pub use crate::utterance::{
    batch_items, validate_utterance, UtteranceFailure, UtteranceReport, ValidationError,
};
