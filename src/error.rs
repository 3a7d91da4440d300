use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Configuration error: category not recognized: {0}")]
    UnknownCategory(String),

    #[error("Restaurant '{name}' has no cuisine tags")]
    EmptyCuisine { name: String },

    #[error("Restaurant '{name}' has invalid cuisine tag string '{cuisine}'")]
    InvalidCuisineTag { name: String, cuisine: String },

    #[error("Restaurant '{name}' has invalid veg flag '{value}' (expected \"yes\" or \"no\")")]
    InvalidVegFlag { name: String, value: String },

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
