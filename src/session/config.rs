use serde::{Deserialize, Serialize};

/// Configuration for transcription runs issued by the coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Language code handed to the engine; None lets it detect
    pub language: Option<String>,

    /// Word timestamp probability threshold
    pub word_threshold: f32,

    /// Maximum context tokens (-1 = engine maximum)
    pub max_context_tokens: i32,

    /// Maximum segment length in characters (0 = unlimited)
    pub max_segment_length: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: None,
            word_threshold: 0.01,
            max_context_tokens: -1,
            max_segment_length: 0,
        }
    }
}
