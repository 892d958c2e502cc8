// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use serde::de::Error as _;
use serde_json::{Value, json};

use super::Client;
use super::catalog::PodcastList;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestMethod};
use crate::model::{Episode, EpisodeEntry, Podcast};

#[derive(Debug, Deserialize)]
struct EpisodeList {
    episodes: Vec<EpisodeEntry>,
}

impl<C: HttpClient> Client<C> {
    /// Podcasts the user is subscribed to
    pub async fn get_subscribed_podcasts(&self) -> Result<Vec<Podcast>> {
        let url = self.api_url("user/podcast/list")?;
        let list: PodcastList = self.request(RequestMethod::Json, url, None).await?;
        Ok(list.into_podcasts())
    }

    /// Recent episodes of subscribed podcasts
    pub async fn get_new_releases(&self) -> Result<Vec<Episode>> {
        self.get_episode_list("user/new_releases", None).await
    }

    /// Episodes the user has started but not finished
    pub async fn get_in_progress(&self) -> Result<Vec<Episode>> {
        self.get_episode_list("user/in_progress", None).await
    }

    /// Starred episodes
    pub async fn get_starred(&self) -> Result<Vec<Episode>> {
        self.get_episode_list("user/starred", None).await
    }

    /// The user's up next queue, in queue order
    pub async fn get_up_next(&self) -> Result<Vec<Episode>> {
        self.get_episode_list("up_next/list", Some(json!({ "version": 2 })))
            .await
    }

    /// Fetch an episode list and link every episode to its podcast.
    ///
    /// Each distinct podcast is fetched once per call. The lookup table
    /// lives only for the duration of this call.
    async fn get_episode_list(&self, path: &str, payload: Option<Value>) -> Result<Vec<Episode>> {
        let url = self.api_url(path)?;
        let url_str = url.to_string();
        let list: EpisodeList = self.request(RequestMethod::Json, url, payload).await?;

        let mut podcasts: HashMap<String, Arc<Podcast>> = HashMap::new();
        let mut episodes = Vec::with_capacity(list.episodes.len());

        for entry in list.episodes {
            let podcast_uuid = entry.podcast_uuid().ok_or_else(|| Error::Decode {
                url: url_str.clone(),
                source: serde_json::Error::custom("episode without podcast reference"),
            })?;

            if !podcasts.contains_key(podcast_uuid) {
                let podcast = self.get_podcast(podcast_uuid).await?;
                podcasts.insert(podcast_uuid.to_string(), Arc::new(podcast));
            }
            let podcast = Arc::clone(&podcasts[podcast_uuid]);

            episodes.push(entry.into_episode(podcast));
        }

        debug!(
            "{path}: {} episodes across {} podcasts",
            episodes.len(),
            podcasts.len()
        );

        Ok(episodes)
    }
}
