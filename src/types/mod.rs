pub mod token;

pub const MIME_JSON: &str = "application/json";
