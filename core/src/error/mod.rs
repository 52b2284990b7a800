#[allow(clippy::module_inception)]
pub mod error;
pub mod wit;

pub use error::CliError;
pub use wit::{preview_body, TransportKind, WitApiError};
