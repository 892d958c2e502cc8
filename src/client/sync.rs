// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Calls that change the user's state on the server.
//!
//! Only [`Client::update_played_position`] gets a response worth checking.
//! The other calls succeed as soon as the server accepted the request;
//! whether it applied the change cannot be told from the response.

use log::warn;
use serde::Deserialize;
use serde_json::json;

use super::Client;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestMethod};
use crate::model::{Episode, PlayingStatus, Podcast};

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: Option<String>,
}

impl<C: HttpClient> Client<C> {
    /// Star or unstar an episode
    pub async fn update_starred(
        &self,
        podcast: &Podcast,
        episode: &Episode,
        starred: bool,
    ) -> Result<()> {
        let url = self.api_url("sync/update_episode_star")?;
        let payload = json!({
            "star": u8::from(starred),
            "podcast": podcast.uuid,
            "uuid": episode.uuid,
        });
        self.send(RequestMethod::Json, url, Some(payload)).await
    }

    /// Set the playing status of an episode
    ///
    /// Accepts a [`PlayingStatus`] or a raw status code. Codes other than
    /// 0, 2 and 3 fail with [`Error::InvalidArgument`] and nothing is sent.
    pub async fn update_playing_status<S>(
        &self,
        podcast: &Podcast,
        episode: &Episode,
        status: S,
    ) -> Result<()>
    where
        S: TryInto<PlayingStatus>,
        Error: From<S::Error>,
    {
        let status: PlayingStatus = status.try_into()?;

        let url = self.api_url("sync/update_episode")?;
        let payload = json!({
            "status": status,
            "podcast": podcast.uuid,
            "uuid": episode.uuid,
        });
        self.send(RequestMethod::Json, url, Some(payload)).await
    }

    /// Set the playback position of an episode, in seconds
    ///
    /// Returns `true` once the server confirmed the update. The episode
    /// itself is left untouched.
    pub async fn update_played_position(
        &self,
        podcast: &Podcast,
        episode: &Episode,
        position: u64,
    ) -> Result<bool> {
        let url = self.api_url("sync/update_episode")?;
        let payload = json!({
            "status": episode.playing_status,
            "podcast": podcast.uuid,
            "uuid": episode.uuid,
            "position": position,
        });

        let response: StatusResponse = self.request(RequestMethod::Json, url, Some(payload)).await?;
        match response.status.as_deref() {
            Some("ok") => Ok(true),
            other => {
                let status = other.unwrap_or("<missing>").to_string();
                warn!("Position update for {} rejected: {status}", episode.uuid);
                Err(Error::ServerRejected { status })
            }
        }
    }

    pub async fn subscribe_podcast(&self, podcast: &Podcast) -> Result<()> {
        let url = self.api_url("user/podcast/subscribe")?;
        self.send(RequestMethod::Json, url, Some(json!({ "uuid": podcast.uuid })))
            .await
    }

    pub async fn unsubscribe_podcast(&self, podcast: &Podcast) -> Result<()> {
        let url = self.api_url("user/podcast/unsubscribe")?;
        self.send(RequestMethod::Json, url, Some(json!({ "uuid": podcast.uuid })))
            .await
    }
}
