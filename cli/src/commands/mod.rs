pub mod cli;
pub mod entity;
pub mod import;
