//! The admin page: load the document, edit it field by field, manage the
//! link and badge lists, and save it back.

mod input;

pub use input::{card_background, parse_hex_rgb, FormInput, DEFAULT_CARD_OPACITY};

use crate::controller::ConfigController;
use crate::error::ClientError;
use crate::http::StoreClient;
use crate::local_storage::{LocalStorage, PROFILE_CONFIG_KEY};
use crate::resolver::SourceResolver;
use biolink_models::{
    platform, preset_badge, Badge, ProfileConfig, SocialLink, CUSTOM_LINK_PREFIX,
    CUSTOM_PLATFORM_ID, FALLBACK_LINK_ICON, PRESET_BADGES,
};
use std::path::Path;
use thiserror::Error;

const CUSTOM_BADGE_PREFIX: &str = "custom-";

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Link already added!")]
    AlreadyAdded(String),
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
    #[error("no link at position {0}")]
    NoSuchLink(usize),
    #[error("link at position {0} is not a custom link")]
    NotCustom(usize),
    #[error("no badge with id {0}")]
    NoSuchBadge(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("Server reset failed: {0}")]
    ResetFailed(ClientError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl EditorError {
    /// The toast shown for this failure.
    pub fn notice(&self) -> Notice {
        Notice::error(self.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Operator feedback, one per completed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The store accepted the document; the local copy was refreshed too.
    Server,
    /// The store was unreachable or refused; only the local copy was written.
    LocalOnly,
}

impl SaveOutcome {
    pub fn notice(self) -> Notice {
        match self {
            Self::Server => Notice::success("Changes saved to server!"),
            Self::LocalOnly => Notice::success("Saved to Browser (Export required for perm save)"),
        }
    }
}

/// One row of the social links list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub url: String,
    pub enabled: bool,
    /// Custom rows expose editable name and icon fields.
    pub custom: bool,
}

/// A preset badge in the picker grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeTile {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomBadgeTile {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub enabled: bool,
}

pub struct AdminEditor {
    controller: ConfigController,
    client: StoreClient,
    storage: LocalStorage,
    resolver: SourceResolver,
}

impl AdminEditor {
    /// Starts on the built-in defaults until [`AdminEditor::load`] runs.
    pub fn new(client: StoreClient, storage: LocalStorage) -> Self {
        let resolver = SourceResolver::editor_chain(client.clone(), storage.clone());
        Self {
            controller: ConfigController::new(ProfileConfig::defaults()),
            client,
            storage,
            resolver,
        }
    }

    pub fn controller(&self) -> &ConfigController {
        &self.controller
    }

    pub fn document(&self) -> ProfileConfig {
        self.controller.get()
    }

    /// Resolve server, then local copy, then defaults, and install the
    /// result. Returns the name of the source used.
    pub async fn load(&self) -> Result<&'static str, EditorError> {
        let resolved = self.resolver.resolve().await?;
        self.controller.reset(resolved.config);
        Ok(resolved.source)
    }

    pub fn input(&self, input: FormInput) -> Result<(), EditorError> {
        self.controller.try_update(|doc| input.apply(doc))
    }

    // Links

    pub fn add_platform_link(&self, platform_id: &str) -> Result<Notice, EditorError> {
        if platform_id == CUSTOM_PLATFORM_ID {
            return self.controller.try_update(|doc| {
                let id = unique_id(CUSTOM_LINK_PREFIX, |id| {
                    doc.social_links.iter().any(|l| l.id == id)
                });
                doc.social_links.push(SocialLink {
                    id,
                    name: Some("My Link".into()),
                    url: Some(String::new()),
                    icon: Some(FALLBACK_LINK_ICON.into()),
                    color: Some("#ffffff".into()),
                    enabled: true,
                    ..Default::default()
                });
                Ok(Notice::success("Added Custom Link"))
            });
        }

        let known = platform(platform_id)
            .ok_or_else(|| EditorError::UnknownPlatform(platform_id.to_string()))?;
        self.controller.try_update(|doc| {
            if doc.social_links.iter().any(|l| l.id == known.id) {
                return Err(EditorError::AlreadyAdded(known.id.to_string()));
            }
            doc.social_links.push(SocialLink {
                id: known.id.into(),
                name: Some(known.name.into()),
                url: Some(String::new()),
                icon: Some(known.icon.into()),
                color: Some(known.color.into()),
                enabled: true,
                ..Default::default()
            });
            Ok(Notice::success(format!("Added {}", known.name)))
        })
    }

    pub fn set_link_url(&self, index: usize, url: impl Into<String>) -> Result<(), EditorError> {
        let url = url.into();
        self.with_link(index, |link| {
            link.url = Some(url);
            Ok(())
        })
    }

    pub fn set_custom_link_name(
        &self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), EditorError> {
        let name = name.into();
        self.with_link(index, |link| {
            if !link.is_custom() {
                return Err(EditorError::NotCustom(index));
            }
            link.name = Some(name);
            Ok(())
        })
    }

    /// Stored exactly as typed, e.g. `fas fa-globe`.
    pub fn set_custom_link_icon(
        &self,
        index: usize,
        icon: impl Into<String>,
    ) -> Result<(), EditorError> {
        let icon = icon.into();
        self.with_link(index, |link| {
            if !link.is_custom() {
                return Err(EditorError::NotCustom(index));
            }
            link.icon = Some(icon);
            Ok(())
        })
    }

    /// Returns the new enabled state.
    pub fn toggle_link(&self, index: usize) -> Result<bool, EditorError> {
        self.with_link(index, |link| {
            link.enabled = !link.enabled;
            Ok(link.enabled)
        })
    }

    pub fn remove_link(&self, index: usize) -> Result<SocialLink, EditorError> {
        self.controller.try_update(|doc| {
            if index >= doc.social_links.len() {
                return Err(EditorError::NoSuchLink(index));
            }
            Ok(doc.social_links.remove(index))
        })
    }

    fn with_link<R>(
        &self,
        index: usize,
        f: impl FnOnce(&mut SocialLink) -> Result<R, EditorError>,
    ) -> Result<R, EditorError> {
        self.controller.try_update(|doc| {
            let link = doc
                .social_links
                .get_mut(index)
                .ok_or(EditorError::NoSuchLink(index))?;
            f(link)
        })
    }

    pub fn link_rows(&self) -> Vec<LinkRow> {
        self.controller.read(|doc| {
            doc.social_links
                .iter()
                .enumerate()
                .map(|(index, link)| link_row(index, link))
                .collect()
        })
    }

    // Badges

    /// Flip a preset badge, adding it enabled if the document has no record
    /// of it yet. Returns the new state.
    pub fn toggle_preset_badge(&self, id: &str) -> Result<bool, EditorError> {
        if preset_badge(id).is_none() {
            return Err(EditorError::NoSuchBadge(id.to_string()));
        }
        self.controller.try_update(|doc| {
            match doc.badges.iter_mut().find(|b| b.id == id) {
                Some(badge) => {
                    badge.enabled = !badge.enabled;
                    Ok(badge.enabled)
                }
                None => {
                    doc.badges.push(Badge::preset(id));
                    Ok(true)
                }
            }
        })
    }

    /// Add an uploaded image badge. `file_name` loses its extension to become
    /// the badge name. Returns the new badge id.
    pub fn add_custom_badge(
        &self,
        file_name: &str,
        image_data: impl Into<String>,
    ) -> Result<String, EditorError> {
        let image_data = image_data.into();
        self.controller.try_update(|doc| {
            let id = unique_id(CUSTOM_BADGE_PREFIX, |id| doc.badges.iter().any(|b| b.id == id));
            doc.badges.push(Badge {
                id: id.clone(),
                enabled: true,
                is_custom: Some(true),
                image_url: Some(image_data),
                name: Some(strip_extension(file_name).to_string()),
                ..Default::default()
            });
            Ok(id)
        })
    }

    /// Returns the new enabled state of the first badge with this id.
    pub fn toggle_badge(&self, id: &str) -> Result<bool, EditorError> {
        self.controller.try_update(|doc| {
            let badge = doc
                .badges
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or_else(|| EditorError::NoSuchBadge(id.to_string()))?;
            badge.enabled = !badge.enabled;
            Ok(badge.enabled)
        })
    }

    /// Removes exactly one record, the first with this id.
    pub fn remove_badge(&self, id: &str) -> Result<Badge, EditorError> {
        self.controller.try_update(|doc| {
            let index = doc
                .badges
                .iter()
                .position(|b| b.id == id)
                .ok_or_else(|| EditorError::NoSuchBadge(id.to_string()))?;
            Ok(doc.badges.remove(index))
        })
    }

    pub fn badge_tiles(&self) -> Vec<BadgeTile> {
        self.controller.read(|doc| {
            PRESET_BADGES
                .iter()
                .map(|preset| BadgeTile {
                    id: preset.id,
                    name: preset.name,
                    icon: preset.icon,
                    color: preset.color,
                    description: preset.description,
                    active: doc
                        .badges
                        .iter()
                        .find(|b| b.id == preset.id)
                        .is_some_and(|b| b.enabled),
                })
                .collect()
        })
    }

    pub fn custom_badges(&self) -> Vec<CustomBadgeTile> {
        self.controller.read(|doc| {
            doc.badges
                .iter()
                .filter(|b| b.is_custom())
                .map(|b| CustomBadgeTile {
                    id: b.id.clone(),
                    name: b
                        .name
                        .clone()
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "Custom".into()),
                    image_url: b.image_url.clone(),
                    enabled: b.enabled,
                })
                .collect()
        })
    }

    // Persistence

    /// POST the whole document, then refresh the local copy so the display
    /// page in this browser sees the change. Once the store has accepted the
    /// document a failed local write is only logged; without the store the
    /// local copy is the save, so its failure is an error.
    pub async fn save(&self) -> Result<SaveOutcome, EditorError> {
        let doc = self.controller.get();
        let text = serde_json::to_string(&doc).map_err(ClientError::from)?;

        match self.client.save_config(&doc).await {
            Ok(()) => {
                tracing::info!("config: saved to server");
                if let Err(e) = self.storage.set(PROFILE_CONFIG_KEY, text) {
                    tracing::warn!("config: saved to server but local copy not updated: {}", e);
                }
                Ok(SaveOutcome::Server)
            }
            Err(e) => {
                tracing::warn!("config: server save failed, falling back to local storage: {}", e);
                self.storage.set(PROFILE_CONFIG_KEY, text)?;
                Ok(SaveOutcome::LocalOnly)
            }
        }
    }

    /// Empty both lists, drop the local copy and push the result to the
    /// store straight away. A store failure is reported, not swallowed.
    pub async fn hard_reset(&self) -> Result<Notice, EditorError> {
        let doc = self.controller.update(|doc| {
            doc.badges.clear();
            doc.social_links.clear();
            doc.clone()
        })?;
        self.storage.remove(PROFILE_CONFIG_KEY)?;

        match self.client.save_config(&doc).await {
            Ok(()) => {
                tracing::info!("config: factory reset pushed to server");
                Ok(Notice::success("Factory Reset Complete"))
            }
            Err(e) => {
                tracing::error!("config: factory reset failed to reach server: {}", e);
                Err(EditorError::ResetFailed(e))
            }
        }
    }

    /// Forget the local copy and load again from the chain.
    pub async fn soft_reset(&self) -> Result<&'static str, EditorError> {
        self.storage.remove(PROFILE_CONFIG_KEY)?;
        self.load().await
    }

    /// Write the document as pretty JSON, the format of `config.json`.
    pub async fn export(&self, path: impl AsRef<Path>) -> Result<Notice, EditorError> {
        let text = serde_json::to_string_pretty(&self.controller.get()).map_err(ClientError::from)?;
        tokio::fs::write(path.as_ref(), text)
            .await
            .map_err(ClientError::from)?;
        tracing::info!("config: exported to {}", path.as_ref().display());
        Ok(Notice::success("Config file exported!"))
    }
}

fn link_row(index: usize, link: &SocialLink) -> LinkRow {
    let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

    let (name, icon, color) = if link.is_custom() {
        (
            non_empty(&link.name).unwrap_or_else(|| "Custom Link".into()),
            non_empty(&link.icon).unwrap_or_else(|| FALLBACK_LINK_ICON.into()),
            non_empty(&link.color).unwrap_or_else(|| "#ffffff".into()),
        )
    } else if let Some(known) = platform(&link.id) {
        (known.name.into(), known.icon.into(), known.color.into())
    } else {
        (link.id.clone(), FALLBACK_LINK_ICON.into(), "#666".into())
    };

    LinkRow {
        index,
        id: link.id.clone(),
        name,
        icon,
        color,
        url: link.url.clone().unwrap_or_default(),
        enabled: link.enabled,
        custom: link.is_custom(),
    }
}

/// `<prefix><millis>`, bumped until no existing id matches.
fn unique_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut millis = chrono::Utc::now().timestamp_millis();
    loop {
        let id = format!("{prefix}{millis}");
        if !taken(&id) {
            return id;
        }
        millis += 1;
    }
}

/// `cat.final.png` -> `cat.final`, `.png` -> ``. Names without a final
/// `.ext` stay as they are.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() && !file_name[dot + 1..].contains('/') => {
            &file_name[..dot]
        }
        _ => file_name,
    }
}
