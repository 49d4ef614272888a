use crate::player::{PlayerError, PlayerResult};

/// Runtime configuration describing where the now-playing endpoint lives.
#[derive(Debug, Clone)]
pub struct HttpPlayerConfig {
    /// Endpoint answering `GET` with the current track.
    pub url: String,
    /// Basic-auth user, if the endpoint is protected.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
}

impl HttpPlayerConfig {
    /// Construct a configuration pointing at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Attach basic-auth credentials to the configuration.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> PlayerResult<Self> {
        let url = std::env::var("PLAYER_NOW_PLAYING_URL").map_err(|_| {
            PlayerError::MissingEnvVar {
                var: "PLAYER_NOW_PLAYING_URL",
            }
        })?;

        let mut config = Self::new(url);

        if let (Some(username), Some(password)) = (
            std::env::var("PLAYER_USERNAME").ok(),
            std::env::var("PLAYER_PASSWORD").ok(),
        ) {
            config = config.with_credentials(username, password);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::http::HttpPlayerClient;

    #[test]
    fn credentials_are_optional() {
        let config = HttpPlayerConfig::new("http://localhost:9000/now-playing");
        assert!(config.username.is_none());

        let config = config.with_credentials("dj", "secret");
        assert_eq!(config.username.as_deref(), Some("dj"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert!(HttpPlayerClient::new(config).is_ok());
    }
}
