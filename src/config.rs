// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

use crate::error::Result;

/// Base URLs of the Pocket Casts hosts a [`Client`](crate::Client) talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Account, library and sync endpoints
    pub api_base: Url,
    /// Static discovery lists (charts, featured, trending)
    pub lists_base: Url,
    /// Podcast detail and show notes
    pub podcast_api_base: Url,
}

impl ClientOptions {
    pub const DEFAULT_API_BASE: &'static str = "https://api.pocketcasts.com/";
    pub const DEFAULT_LISTS_BASE: &'static str = "https://lists.pocketcasts.com/";
    pub const DEFAULT_PODCAST_API_BASE: &'static str = "https://podcast-api.pocketcasts.com/";

    /// Point all three hosts at the same base URL, e.g. a local mock server
    pub fn with_base(base: &str) -> Result<Self> {
        let base = normalize(Url::parse(base)?);
        Ok(Self {
            api_base: base.clone(),
            lists_base: base.clone(),
            podcast_api_base: base,
        })
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        let parse = |s: &str| Url::parse(s).expect("valid default base URL");
        Self {
            api_base: parse(Self::DEFAULT_API_BASE),
            lists_base: parse(Self::DEFAULT_LISTS_BASE),
            podcast_api_base: parse(Self::DEFAULT_PODCAST_API_BASE),
        }
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`
fn normalize(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
