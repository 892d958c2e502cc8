// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Deserialize;
use url::Url;

use super::de;

/// A podcast as known to Pocket Casts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Podcast {
    pub uuid: String,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<Url>,
    /// The podcast's website
    pub url: Option<Url>,
    pub category: Option<String>,
}

/// Order in which episodes of a podcast are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SortOrder {
    #[default]
    NewestToOldest = 3,
    OldestToNewest = 2,
}

/// Descriptive podcast fields as sent by the API, without the UUID
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PodcastFields {
    #[serde(default, deserialize_with = "de::string_or_empty")]
    title: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "thumbnailUrl")]
    thumbnail_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl PodcastFields {
    pub(crate) fn into_podcast(self, uuid: impl Into<String>) -> Podcast {
        Podcast {
            uuid: uuid.into(),
            title: self.title,
            author: self.author.filter(|s| !s.is_empty()),
            description: self.description.filter(|s| !s.is_empty()),
            thumbnail_url: self.thumbnail_url.as_deref().and_then(parse_url),
            url: self.url.as_deref().and_then(parse_url),
            category: self.category.filter(|s| !s.is_empty()),
        }
    }
}

/// A podcast entry inside a list payload, where the UUID is mandatory
#[derive(Debug, Deserialize)]
pub(crate) struct PodcastEntry {
    uuid: String,
    #[serde(flatten)]
    fields: PodcastFields,
}

impl From<PodcastEntry> for Podcast {
    fn from(entry: PodcastEntry) -> Self {
        entry.fields.into_podcast(entry.uuid)
    }
}

fn parse_url(raw: &str) -> Option<Url> {
    Url::parse(raw.trim()).ok()
}
