//! Data model for configuration documents

mod entry;

pub use entry::ConfigEntry;
