// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::Client;
use crate::error::Result;
use crate::http::{HttpClient, RequestMethod};
use crate::model::{
    Episode, EpisodeEntry, EpisodeFields, Podcast, PodcastEntry, PodcastFields, SortOrder,
};

/// Paging and version segments of the podcast detail endpoint.
///
/// The server treats them as opaque; this combination returns the
/// podcast with its most recent episodes.
const PODCAST_DETAIL_WINDOW: &str = "0/3/2000";

#[derive(Debug, Deserialize)]
pub(super) struct PodcastList {
    pub podcasts: Vec<PodcastEntry>,
}

impl PodcastList {
    pub fn into_podcasts(self) -> Vec<Podcast> {
        self.podcasts.into_iter().map(Podcast::from).collect()
    }
}

#[derive(Debug, Deserialize)]
struct PodcastDetail {
    podcast: PodcastDetailBody,
}

#[derive(Debug, Deserialize)]
struct PodcastDetailBody {
    episodes: Vec<EpisodeEntry>,
    #[serde(flatten)]
    fields: PodcastFields,
}

#[derive(Debug, Deserialize)]
struct ShowNotes {
    show_notes: String,
}

impl<C: HttpClient> Client<C> {
    /// The most popular podcasts, in chart order
    pub async fn get_top_charts(&self) -> Result<Vec<Podcast>> {
        self.get_list("popular.json").await
    }

    /// Podcasts featured by Pocket Casts
    pub async fn get_featured(&self) -> Result<Vec<Podcast>> {
        self.get_list("featured.json").await
    }

    /// Podcasts currently trending
    pub async fn get_trending(&self) -> Result<Vec<Podcast>> {
        self.get_list("trending.json").await
    }

    async fn get_list(&self, name: &str) -> Result<Vec<Podcast>> {
        let url = self.lists_url(name)?;
        let list: PodcastList = self.request(RequestMethod::Get, url, None).await?;
        Ok(list.into_podcasts())
    }

    /// Search the podcast directory
    pub async fn search_podcasts(&self, term: &str) -> Result<Vec<Podcast>> {
        let url = self.api_url("discover/search")?;
        let list: PodcastList = self
            .request(RequestMethod::Json, url, Some(json!({ "term": term })))
            .await?;
        Ok(list.into_podcasts())
    }

    /// Fetch a podcast by UUID
    ///
    /// The returned podcast always carries `uuid`, whatever the payload
    /// itself reports.
    pub async fn get_podcast(&self, uuid: &str) -> Result<Podcast> {
        let detail = self.get_podcast_detail(uuid).await?;
        Ok(detail.fields.into_podcast(uuid))
    }

    /// Fetch the episodes of `podcast`
    ///
    /// The server offers no sort parameter on this endpoint, so `order` is
    /// applied to the returned window by publish date. Episodes without a
    /// publish date come last, in server order.
    ///
    /// Every episode shares the `podcast` passed in.
    pub async fn get_podcast_episodes(
        &self,
        podcast: &Arc<Podcast>,
        order: SortOrder,
    ) -> Result<Vec<Episode>> {
        let detail = self.get_podcast_detail(&podcast.uuid).await?;

        let mut episodes: Vec<Episode> = detail
            .episodes
            .into_iter()
            .map(|entry| entry.into_episode(Arc::clone(podcast)))
            .collect();

        sort_episodes(&mut episodes, order);
        Ok(episodes)
    }

    async fn get_podcast_detail(&self, uuid: &str) -> Result<PodcastDetailBody> {
        let url = self.podcast_detail_url(uuid)?;
        let detail: PodcastDetail = self.request(RequestMethod::Get, url, None).await?;
        Ok(detail.podcast)
    }

    fn podcast_detail_url(&self, uuid: &str) -> Result<Url> {
        self.podcast_api_url(&format!("podcast/full/{uuid}/{PODCAST_DETAIL_WINDOW}"))
    }

    /// Fetch a single episode including the user's listening state
    pub async fn get_episode(&self, podcast: &Arc<Podcast>, uuid: &str) -> Result<Episode> {
        let url = self.api_url("user/episode")?;
        let fields: EpisodeFields = self
            .request(RequestMethod::Json, url, Some(json!({ "uuid": uuid })))
            .await?;
        Ok(fields.into_episode(uuid, Arc::clone(podcast)))
    }

    /// Show notes of an episode, as sent by the server (usually HTML)
    pub async fn get_episode_notes(&self, episode_uuid: &str) -> Result<String> {
        let url = self.podcast_api_url(&format!("episode/show_notes/{episode_uuid}"))?;
        let notes: ShowNotes = self.request(RequestMethod::Get, url, None).await?;
        Ok(notes.show_notes)
    }
}

fn sort_episodes(episodes: &mut [Episode], order: SortOrder) {
    episodes.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(a), Some(b)) => match order {
            SortOrder::NewestToOldest => b.cmp(&a),
            SortOrder::OldestToNewest => a.cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
