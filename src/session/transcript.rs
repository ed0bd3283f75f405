use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::TranscriptionResult;

/// One entry of a meeting transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptItem {
    pub id: Uuid,
    /// Segment start on the engine's timeline, in seconds
    pub timestamp_seconds: f64,
    pub text: String,
    pub speaker_id: Option<String>,
    pub is_highlighted: bool,
}

/// Map a transcription result to transcript items
///
/// Segment timestamps are used verbatim; they originate from the engine's
/// own timeline relative to the submitted artifact and are not re-aligned
/// with capture-side elapsed time.
pub fn items_from_result(result: &TranscriptionResult) -> Vec<TranscriptItem> {
    if result.segments.is_empty() {
        return vec![TranscriptItem {
            id: Uuid::new_v4(),
            timestamp_seconds: 0.0,
            text: result.full_text.clone(),
            speaker_id: None,
            is_highlighted: false,
        }];
    }

    result
        .segments
        .iter()
        .map(|segment| TranscriptItem {
            id: Uuid::new_v4(),
            timestamp_seconds: segment.start_seconds,
            text: segment.text.clone(),
            speaker_id: None,
            is_highlighted: false,
        })
        .collect()
}

/// Toggle the highlight flag on one item; returns the new state if found
pub fn toggle_highlight(items: &mut [TranscriptItem], item_id: Uuid) -> Option<bool> {
    for item in items.iter_mut() {
        if item.id == item_id {
            item.is_highlighted = !item.is_highlighted;
            return Some(item.is_highlighted);
        }
    }
    None
}
