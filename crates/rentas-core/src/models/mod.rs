//! Data models shared by the pipeline, its transports and the record store.

pub mod config;
pub mod record;
pub mod wire;
