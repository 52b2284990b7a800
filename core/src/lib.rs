//! Core logic for witsync: configuration, error taxonomy, the entity diff
//! and the local mirror documents it is applied to.

pub mod api;
pub mod config;
pub mod diff;
pub mod error;
pub mod json_file;
pub mod mirror;
pub mod model;
pub mod utterance;
