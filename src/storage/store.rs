use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::model::{Meeting, MeetingPatch, Theme, User};
use crate::error::StorageError;

const KEY_MEETINGS: &str = "meetings";
const KEY_USER: &str = "user";
const KEY_TOKEN: &str = "token";
const KEY_IS_ONBOARDED: &str = "is_onboarded";
const KEY_THEME: &str = "theme";

/// Key-value persistence over one serialized JSON blob per key
///
/// Each key maps to `<root>/<key>.json`. Writes replace the whole blob;
/// there are no transactional guarantees across keys.
pub struct KvStore {
    root: PathBuf,
}

impl KvStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        info!("Key-value store opened at {}", root.display());
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.key_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(self.key_path(key), bytes).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // Meetings

    pub async fn get_meetings(&self) -> Result<Vec<Meeting>, StorageError> {
        Ok(self.get(KEY_MEETINGS).await?.unwrap_or_default())
    }

    pub async fn save_meetings(&self, meetings: &[Meeting]) -> Result<(), StorageError> {
        self.put(KEY_MEETINGS, &meetings).await
    }

    /// Prepend a meeting so the most recent comes first
    pub async fn add_meeting(&self, meeting: Meeting) -> Result<(), StorageError> {
        let mut meetings = self.get_meetings().await?;
        meetings.insert(0, meeting);
        self.save_meetings(&meetings).await
    }

    pub async fn get_meeting(&self, id: Uuid) -> Result<Option<Meeting>, StorageError> {
        Ok(self.get_meetings().await?.into_iter().find(|m| m.id == id))
    }

    /// Apply a partial update; returns false when the meeting is unknown
    pub async fn update_meeting(
        &self,
        id: Uuid,
        patch: MeetingPatch,
    ) -> Result<bool, StorageError> {
        let mut meetings = self.get_meetings().await?;
        let Some(meeting) = meetings.iter_mut().find(|m| m.id == id) else {
            return Ok(false);
        };

        if let Some(title) = patch.title {
            meeting.title = title;
        }
        if let Some(transcript) = patch.transcript {
            meeting.transcript = transcript;
        }
        if let Some(tags) = patch.tags {
            meeting.tags = tags;
        }
        if let Some(is_archived) = patch.is_archived {
            meeting.is_archived = is_archived;
        }
        if let Some(audio_path) = patch.audio_path {
            meeting.audio_path = audio_path;
        }

        self.save_meetings(&meetings).await?;
        Ok(true)
    }

    pub async fn delete_meeting(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut meetings = self.get_meetings().await?;
        let before = meetings.len();
        meetings.retain(|m| m.id != id);
        if meetings.len() == before {
            return Ok(false);
        }
        self.save_meetings(&meetings).await?;
        Ok(true)
    }

    /// Toggle the highlight flag on one transcript item
    ///
    /// Returns the new flag when both meeting and item exist.
    pub async fn toggle_highlight(
        &self,
        meeting_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<bool>, StorageError> {
        let mut meetings = self.get_meetings().await?;
        let Some(meeting) = meetings.iter_mut().find(|m| m.id == meeting_id) else {
            return Ok(None);
        };

        let toggled = crate::session::toggle_highlight(&mut meeting.transcript, item_id);
        if toggled.is_some() {
            self.save_meetings(&meetings).await?;
        }
        Ok(toggled)
    }

    // User / auth token

    pub async fn get_user(&self) -> Result<Option<User>, StorageError> {
        self.get(KEY_USER).await
    }

    pub async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.put(KEY_USER, user).await
    }

    pub async fn get_token(&self) -> Result<Option<String>, StorageError> {
        self.get(KEY_TOKEN).await
    }

    /// Saving `None` removes the stored token
    pub async fn save_token(&self, token: Option<&str>) -> Result<(), StorageError> {
        match token {
            Some(token) => self.put(KEY_TOKEN, &token).await,
            None => self.remove(KEY_TOKEN).await,
        }
    }

    // Onboarding / theme

    pub async fn get_is_onboarded(&self) -> Result<bool, StorageError> {
        Ok(self.get(KEY_IS_ONBOARDED).await?.unwrap_or(false))
    }

    pub async fn set_is_onboarded(&self, value: bool) -> Result<(), StorageError> {
        self.put(KEY_IS_ONBOARDED, &value).await
    }

    pub async fn get_theme(&self) -> Result<Theme, StorageError> {
        Ok(self.get(KEY_THEME).await?.unwrap_or_default())
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.put(KEY_THEME, &theme).await
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }
}
