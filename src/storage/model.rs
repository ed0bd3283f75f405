use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::TranscriptItem;

/// A recorded meeting with its transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Duration of the recording in seconds
    pub duration_seconds: f64,
    /// Path to the audio artifact, if still on disk
    pub audio_path: Option<String>,
    pub transcript: Vec<TranscriptItem>,
    pub tags: Vec<String>,
    pub is_archived: bool,
}

impl Meeting {
    pub fn new(title: String, duration_seconds: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            created_at: Utc::now(),
            duration_seconds,
            audio_path: None,
            transcript: Vec::new(),
            tags: Vec::new(),
            is_archived: false,
        }
    }
}

/// Partial update applied to a stored meeting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub transcript: Option<Vec<TranscriptItem>>,
    pub tags: Option<Vec<String>>,
    pub is_archived: Option<bool>,
    pub audio_path: Option<Option<String>>,
}

/// Account information mirrored from the auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub subscription: Subscription,
    /// Remote storage used, in megabytes
    #[serde(default)]
    pub storage_used_mb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    Free,
    Pro,
}

/// UI theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}
