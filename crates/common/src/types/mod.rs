use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body served at the API root.
#[derive(Serialize, Deserialize, Debug)]
pub struct Welcome {
    pub message: String,
}

impl Default for Welcome {
    fn default() -> Self {
        Self { message: "Welcome to the marketplace API! Visit /api-docs for documentation.".into() }
    }
}

/// Generic `{ "message": ... }` acknowledgement body.
#[derive(Serialize, Deserialize, Debug)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
