pub mod serde_json;
