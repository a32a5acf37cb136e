use crate::error::ClientError;
use crate::http::StoreClient;
use crate::local_storage::{LocalStorage, PROFILE_CONFIG_KEY};
use biolink_models::ProfileConfig;

/// One place a profile document can come from.
#[derive(Clone)]
pub enum ConfigSource {
    /// `GET /api/config`.
    Server(StoreClient),
    /// The static `config.json` next to the pages.
    StaticFile(StoreClient),
    /// The `profileConfig` key of local storage.
    LocalStorage(LocalStorage),
    /// Built-in defaults. Never fails.
    Defaults,
}

impl ConfigSource {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Server(_) => "server",
            Self::StaticFile(_) => "static file",
            Self::LocalStorage(_) => "local storage",
            Self::Defaults => "defaults",
        }
    }

    pub async fn load(&self) -> Result<ProfileConfig, ClientError> {
        match self {
            Self::Server(client) => Ok(ProfileConfig::from_value(client.fetch_config().await?)?),
            Self::StaticFile(client) => Ok(ProfileConfig::from_value(
                client.fetch_static_config().await?,
            )?),
            Self::LocalStorage(storage) => {
                let text = storage
                    .get(PROFILE_CONFIG_KEY)
                    .ok_or(ClientError::MissingKey(PROFILE_CONFIG_KEY))?;
                Ok(ProfileConfig::from_json(&text)?)
            }
            Self::Defaults => Ok(ProfileConfig::defaults()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: ProfileConfig,
    /// [`ConfigSource::name`] of the source that answered.
    pub source: &'static str,
}

/// Tries each source in order and returns the first document that loads.
#[derive(Clone)]
pub struct SourceResolver {
    sources: Vec<ConfigSource>,
}

impl SourceResolver {
    pub fn new(sources: Vec<ConfigSource>) -> Self {
        Self { sources }
    }

    /// Server, then the local copy, then built-in defaults.
    pub fn editor_chain(client: StoreClient, storage: LocalStorage) -> Self {
        Self::new(vec![
            ConfigSource::Server(client),
            ConfigSource::LocalStorage(storage),
            ConfigSource::Defaults,
        ])
    }

    /// Server, then the static file.
    pub fn display_chain(client: StoreClient) -> Self {
        Self::new(vec![
            ConfigSource::Server(client.clone()),
            ConfigSource::StaticFile(client),
        ])
    }

    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// A server that answers with a document it cannot read stops the
    /// chain: falling back would hand the editor a document whose next save
    /// overwrites the stored one.
    pub async fn resolve(&self) -> Result<Resolved, ClientError> {
        let mut failures = Vec::new();
        for source in &self.sources {
            match source.load().await {
                Ok(config) => {
                    tracing::info!("config: loaded from {}", source.name());
                    return Ok(Resolved {
                        config,
                        source: source.name(),
                    });
                }
                Err(ClientError::Parse(e)) if matches!(source, ConfigSource::Server(_)) => {
                    tracing::error!(
                        "config: {} answered with an unreadable document: {}",
                        source.name(),
                        e
                    );
                    return Err(ClientError::Unreadable(source.name(), e));
                }
                Err(e) => {
                    tracing::warn!(
                        "config: {} unavailable, trying next source: {}",
                        source.name(),
                        e
                    );
                    failures.push(format!("{}: {}", source.name(), e));
                }
            }
        }
        Err(ClientError::NoSource(failures))
    }
}
