// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_repr::{Deserialize_repr, Serialize_repr};
use url::Url;

use super::de;
use super::podcast::Podcast;
use crate::error::Error;

/// Listen state of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum PlayingStatus {
    #[default]
    Unplayed = 0,
    Playing = 2,
    Played = 3,
}

impl TryFrom<u8> for PlayingStatus {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unplayed),
            2 => Ok(Self::Playing),
            3 => Ok(Self::Played),
            other => Err(Error::InvalidArgument(format!(
                "invalid playing status {other}, expected 0, 2 or 3"
            ))),
        }
    }
}

impl From<PlayingStatus> for u8 {
    fn from(status: PlayingStatus) -> Self {
        status as u8
    }
}

/// A single episode, linked to the podcast it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub uuid: String,
    pub podcast: Arc<Podcast>,
    pub title: String,
    /// Media file URL
    pub url: Option<Url>,
    /// Media file size in bytes
    pub size: u64,
    /// Duration in seconds
    pub duration: Option<u64>,
    pub published_at: Option<DateTime<Utc>>,
    /// Playback position in seconds
    pub played_position: u64,
    pub playing_status: PlayingStatus,
    pub starred: bool,
    /// MIME type of the media file
    pub file_type: Option<String>,
    pub is_deleted: bool,
    pub is_video: bool,
}

/// Episode fields as sent by the API, without the UUID
#[derive(Debug, Deserialize)]
pub(crate) struct EpisodeFields {
    #[serde(default, deserialize_with = "de::string_or_empty")]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(
        default,
        alias = "file_size",
        alias = "fileSize",
        deserialize_with = "de::u64_or_zero"
    )]
    size: u64,
    #[serde(default, deserialize_with = "de::optional_u64")]
    duration: Option<u64>,
    #[serde(
        default,
        alias = "publishedAt",
        alias = "published",
        deserialize_with = "de::timestamp"
    )]
    published_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "playedUpTo",
        alias = "played_position",
        deserialize_with = "de::u64_or_zero"
    )]
    played_up_to: u64,
    #[serde(default, alias = "playingStatus")]
    playing_status: Option<PlayingStatus>,
    #[serde(default, deserialize_with = "de::flag")]
    starred: bool,
    #[serde(default, alias = "fileType")]
    file_type: Option<String>,
    #[serde(default, alias = "isDeleted", deserialize_with = "de::flag")]
    is_deleted: bool,
    #[serde(default, alias = "isVideo", deserialize_with = "de::flag")]
    is_video: bool,
}

impl EpisodeFields {
    pub(crate) fn into_episode(self, uuid: impl Into<String>, podcast: Arc<Podcast>) -> Episode {
        Episode {
            uuid: uuid.into(),
            podcast,
            title: self.title,
            url: self.url.as_deref().and_then(|u| Url::parse(u.trim()).ok()),
            size: self.size,
            duration: self.duration,
            published_at: self.published_at,
            played_position: self.played_up_to,
            playing_status: self.playing_status.unwrap_or_default(),
            starred: self.starred,
            file_type: self.file_type.filter(|s| !s.is_empty()),
            is_deleted: self.is_deleted,
            is_video: self.is_video,
        }
    }
}

/// An episode entry inside a list payload
///
/// User lists name the owning podcast `podcastUuid`, the up next list
/// names it `podcast`.
#[derive(Debug, Deserialize)]
pub(crate) struct EpisodeEntry {
    uuid: String,
    #[serde(default, alias = "podcastUuid", alias = "podcast")]
    podcast_uuid: Option<String>,
    #[serde(flatten)]
    fields: EpisodeFields,
}

impl EpisodeEntry {
    pub(crate) fn podcast_uuid(&self) -> Option<&str> {
        self.podcast_uuid.as_deref()
    }

    pub(crate) fn into_episode(self, podcast: Arc<Podcast>) -> Episode {
        self.fields.into_episode(self.uuid, podcast)
    }
}
