pub mod error;
pub mod events;
pub mod store;
pub mod views;

use std::path::Path;
use std::sync::Arc;

pub use store::ConfigStore;
pub use views::ViewCounter;

/// File name of the profile document inside the data directory.
pub const CONFIG_FILE: &str = "config.json";
/// File name of the `{count}` view counter inside the data directory.
pub const VIEWS_FILE: &str = "views.json";

#[derive(Clone)]
pub struct AppState {
    pub config_store: Arc<ConfigStore>,
    pub view_counter: Arc<ViewCounter>,
    pub event_bus: events::EventBus,
}

impl AppState {
    /// Both state files live side by side in `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            config_store: Arc::new(ConfigStore::new(data_dir.join(CONFIG_FILE))),
            view_counter: Arc::new(ViewCounter::new(data_dir.join(VIEWS_FILE))),
            event_bus: events::EventBus::default(),
        }
    }
}
