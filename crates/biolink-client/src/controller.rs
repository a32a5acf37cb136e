use crate::error::ClientError;
use biolink_models::ProfileConfig;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

const CHANGE_CAPACITY: usize = 64;

/// Sent after every accepted change to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigChange {
    pub revision: u64,
}

struct Versioned {
    document: ProfileConfig,
    revision: u64,
}

/// Owns the document being edited. Every change goes through here, is
/// validated, and bumps the revision.
pub struct ConfigController {
    state: RwLock<Versioned>,
    changes: broadcast::Sender<ConfigChange>,
}

impl ConfigController {
    pub fn new(document: ProfileConfig) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            state: RwLock::new(Versioned {
                document,
                revision: 0,
            }),
            changes,
        }
    }

    /// A snapshot of the current document.
    pub fn get(&self) -> ProfileConfig {
        self.read_state().document.clone()
    }

    /// Borrow the document without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&ProfileConfig) -> R) -> R {
        f(&self.read_state().document)
    }

    pub fn revision(&self) -> u64 {
        self.read_state().revision
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConfigChange> {
        self.changes.subscribe()
    }

    /// Install a freshly loaded document without validating it. Documents
    /// from the store are taken as they are.
    pub fn reset(&self, document: ProfileConfig) -> ConfigChange {
        let change = {
            let mut state = self.write_state();
            state.document = document;
            state.revision += 1;
            ConfigChange {
                revision: state.revision,
            }
        };
        self.notify(change);
        change
    }

    /// Replace the document. Rejected (and nothing changes) if it fails
    /// validation.
    pub fn set(&self, document: ProfileConfig) -> Result<ConfigChange, ClientError> {
        let problems = violations(&document);
        if !problems.is_empty() {
            return Err(ClientError::Validation(problems.join("; ")));
        }
        Ok(self.reset(document))
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ProfileConfig) -> R) -> Result<R, ClientError> {
        self.try_update(|doc| Ok::<_, ClientError>(f(doc)))
    }

    /// Apply `f` to a draft of the document and commit it only if `f`
    /// succeeds and the edit introduces no new validation problem. Problems
    /// already present in the loaded document do not block unrelated edits.
    pub fn try_update<R, E>(
        &self,
        f: impl FnOnce(&mut ProfileConfig) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<ClientError>,
    {
        let (out, change) = {
            let mut state = self.write_state();
            let mut draft = state.document.clone();
            let out = f(&mut draft)?;
            draft.drop_shadowed();

            let existing = violations(&state.document);
            let introduced: Vec<String> = violations(&draft)
                .into_iter()
                .filter(|p| !existing.contains(p))
                .collect();
            if !introduced.is_empty() {
                return Err(ClientError::Validation(introduced.join("; ")).into());
            }

            state.document = draft;
            state.revision += 1;
            (
                out,
                ConfigChange {
                    revision: state.revision,
                },
            )
        };
        self.notify(change);
        Ok(out)
    }

    fn notify(&self, change: ConfigChange) {
        let _ = self.changes.send(change);
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Versioned> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Versioned> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Check the numeric fields the pages rely on.
pub fn validate(document: &ProfileConfig) -> Result<(), ClientError> {
    let problems = violations(document);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Validation(problems.join("; ")))
    }
}

fn violations(document: &ProfileConfig) -> Vec<String> {
    let mut problems = Vec::new();

    if let Some(volume) = document.audio.as_ref().and_then(|a| a.volume()) {
        if !(0.0..=1.0).contains(&volume) {
            problems.push(format!("audio.volume {volume} is outside 0..=1"));
        }
    }

    if let Some(theme) = &document.theme {
        for (field, value) in [
            ("cardBlur", theme.card_blur()),
            ("cardTransparency", theme.card_transparency()),
            ("cardBorderRadius", theme.card_border_radius()),
        ] {
            if let Some(v) = value.filter(|v| *v < 0.0) {
                problems.push(format!("theme.{field} {v} is negative"));
            }
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use biolink_models::Theme;

    #[test]
    fn update_commits_and_bumps_revision() {
        let controller = ConfigController::new(ProfileConfig::default());
        let mut changes = controller.subscribe();

        controller
            .update(|doc| doc.profile_mut().username = Some("a".into()))
            .unwrap();

        assert_eq!(controller.revision(), 1);
        assert_eq!(changes.try_recv().unwrap(), ConfigChange { revision: 1 });
        let username = controller.read(|doc| doc.profile.as_ref().and_then(|p| p.username.clone()));
        assert_eq!(username.as_deref(), Some("a"));
    }

    #[test]
    fn invalid_edit_leaves_document_unchanged() {
        let controller = ConfigController::new(ProfileConfig::default());
        let before = controller.get();

        let err = controller
            .update(|doc| {
                doc.profile_mut().username = Some("lost".into());
                doc.audio_mut().set_volume(1.5);
            })
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(controller.get(), before);
        assert_eq!(controller.revision(), 0);
    }

    #[test]
    fn edits_replace_unreadable_stored_values() {
        let loaded = ProfileConfig::from_json(r#"{"theme":{"cardBlur":"soft"}}"#).unwrap();
        let controller = ConfigController::new(loaded);

        controller
            .update(|doc| doc.theme_mut().card_blur = Some(8.into()))
            .unwrap();

        let theme = controller.get().theme.unwrap();
        assert!(theme.extra.is_empty());
        assert_eq!(theme.card_blur(), Some(8.0));
        assert_eq!(
            serde_json::to_string(&theme).unwrap(),
            r#"{"cardBlur":8}"#
        );
    }

    #[test]
    fn set_rejects_negative_theme_numbers() {
        let controller = ConfigController::new(ProfileConfig::default());
        let doc = ProfileConfig {
            theme: Some(Theme {
                card_blur: Some((-1).into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(controller.set(doc.clone()).is_err());
        assert!(validate(&doc).is_err());
        assert!(validate(&ProfileConfig::defaults()).is_ok());
    }

    #[test]
    fn loaded_problems_do_not_block_other_edits() {
        let mut loaded = ProfileConfig::default();
        loaded.audio_mut().set_volume(50.0);

        let controller = ConfigController::new(ProfileConfig::default());
        controller.reset(loaded);

        controller
            .update(|doc| doc.profile_mut().bio = Some("hi".into()))
            .unwrap();
        assert!(controller
            .update(|doc| {
                doc.audio_mut().set_volume(60.0);
            })
            .is_err());
        controller
            .update(|doc| {
                doc.audio_mut().set_volume(0.6);
            })
            .unwrap();
    }

    #[test]
    fn failed_closure_discards_draft() {
        let controller = ConfigController::new(ProfileConfig::default());
        let result: Result<(), ClientError> = controller.try_update(|doc| {
            doc.badges.clear();
            doc.profile_mut().username = Some("x".into());
            Err(ClientError::MissingKey("test"))
        });

        assert!(result.is_err());
        assert_eq!(controller.get(), ProfileConfig::default());
    }
}
