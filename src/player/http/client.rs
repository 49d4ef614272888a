use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::player::{NowPlaying, PlayerClient, PlayerError, PlayerResult};

use super::config::HttpPlayerConfig;

/// [`PlayerClient`] backed by a `GET` on a now-playing endpoint.
#[derive(Clone)]
pub struct HttpPlayerClient {
    client: Client,
    url: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl HttpPlayerClient {
    /// Build the HTTP client. No request is sent until the first query.
    pub fn new(config: HttpPlayerConfig) -> PlayerResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| PlayerError::ClientBuilder { source })?;

        let url = Arc::<str>::from(config.url);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        Ok(Self { client, url, auth })
    }

    async fn fetch(&self) -> PlayerResult<NowPlaying> {
        let mut builder = self.client.get(self.url.as_ref());
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
        }

        let response = builder
            .send()
            .await
            .map_err(|source| PlayerError::Unreachable {
                url: self.url.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NO_CONTENT => Err(PlayerError::NothingPlaying),
            status if status.is_success() => {
                let payload = response
                    .json::<Option<NowPlaying>>()
                    .await
                    .map_err(|source| PlayerError::Decode {
                        url: self.url.to_string(),
                        source,
                    })?;
                let track = payload.ok_or(PlayerError::NothingPlaying)?;
                debug!(id = %track.id, artist = %track.artist, title = %track.title, "player reported track");
                Ok(track)
            }
            other => Err(PlayerError::Status {
                url: self.url.to_string(),
                status: other,
            }),
        }
    }
}

impl PlayerClient for HttpPlayerClient {
    fn now_playing(&self) -> BoxFuture<'static, PlayerResult<NowPlaying>> {
        let player = self.clone();
        Box::pin(async move { player.fetch().await })
    }
}
