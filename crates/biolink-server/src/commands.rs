use anyhow::Result;
use biolink_client::{
    AdminEditor, DisplayRenderer, LiveSync, LocalStorage, RenderedProfile, SourceResolver,
    StoreClient,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn open_storage(path: Option<&Path>) -> Result<LocalStorage> {
    Ok(match path {
        Some(path) => LocalStorage::open(path)?,
        None => LocalStorage::in_memory(),
    })
}

/// Behave like an open profile page: load, count the visit, then follow live
/// updates until ctrl-c.
pub async fn watch(url: &str, storage: Option<&Path>, interval: Duration) -> Result<()> {
    let client = StoreClient::new(url)?;
    let storage = open_storage(storage)?;
    let renderer = Arc::new(DisplayRenderer::new(SourceResolver::display_chain(
        client.clone(),
    )));

    match renderer.load().await {
        Ok(source) => tracing::info!("Loaded profile from {}", source),
        Err(_) => tracing::warn!("No config available yet, showing defaults"),
    }

    let views = match client.record_view().await {
        Ok(count) => count,
        Err(e) => {
            tracing::debug!("View counter unavailable ({}), counting locally", e);
            storage.bump_views()?
        }
    };
    tracing::info!("Views: {}", views);
    log_view(&renderer.view());

    let _sync = LiveSync::spawn(renderer.clone(), &storage, client, interval);
    let mut applied = renderer.subscribe();
    loop {
        tokio::select! {
            changed = applied.changed() => {
                if changed.is_err() {
                    break;
                }
                let n = *applied.borrow_and_update();
                tracing::info!("✓ Live Updated (#{})", n);
                log_view(&renderer.view());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

/// Resolve the document like the admin page (server, local copy, defaults)
/// and write it out.
pub async fn export(url: &str, out: &Path, storage: Option<&Path>) -> Result<()> {
    let editor = AdminEditor::new(StoreClient::new(url)?, open_storage(storage)?);
    let source = editor.load().await?;
    let notice = editor.export(out).await?;
    tracing::info!("{} ({} from {})", notice.message, out.display(), source);
    Ok(())
}

fn log_view(view: &RenderedProfile) {
    tracing::info!(
        username = %view.username,
        display_name = %view.display_name,
        badges = view.badges.len(),
        links = view.links.len(),
        accent = view.root_vars.get("--accent-primary").map(String::as_str).unwrap_or("default"),
        cursor = %view.cursor_effect,
        "profile rendered"
    );
}
