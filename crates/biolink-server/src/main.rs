use anyhow::Result;
use biolink_core::{events::StoreEvent, AppState, CONFIG_FILE, VIEWS_FILE};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod web;

use cli::Command;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biolink=info,tower_http=debug")),
        )
        .init();

    let args = cli::Args::parse();
    let mut config = config::Config::load(&args.config)?;
    args.apply(&mut config);

    match args.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Watch {
            url,
            interval_ms,
            storage,
        } => {
            let interval = interval_ms
                .map(|ms| std::time::Duration::from_millis(ms.max(1)))
                .unwrap_or_else(|| config.sync.poll_interval());
            commands::watch(&url, storage.as_deref(), interval).await
        }
        Command::Export { url, out, storage } => {
            commands::export(&url, &out, storage.as_deref()).await
        }
    }
}

async fn serve(config: config::Config) -> Result<()> {
    let data_dir = &config.storage.data_dir;
    if let Err(e) = std::fs::create_dir_all(data_dir) {
        tracing::warn!("Could not create data directory '{}': {}", data_dir.display(), e);
    }

    let web_dir: Option<PathBuf> = Some(config.server.web_dir.clone()).filter(|p| {
        if p.is_dir() {
            true
        } else {
            tracing::warn!("Web directory {:?} does not exist, serving the API only", p);
            false
        }
    });

    let state = AppState::new(data_dir);
    spawn_event_logger(&state);

    let app = web::build_app(state, web_dir.as_deref());
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;

    print_startup_banner(&config.server.bind_address, data_dir, web_dir.as_deref());

    let shutdown_signal = async {
        let _ = tokio::signal::ctrl_c().await;
        println!();
        tracing::info!("Shutting down...");
    };

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

fn spawn_event_logger(state: &AppState) {
    let mut events = state.event_bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                StoreEvent::ConfigSaved { bytes } => {
                    tracing::debug!("store: config replaced ({} bytes)", bytes)
                }
                StoreEvent::ViewRecorded { count } => tracing::debug!("store: view #{}", count),
            }
        }
    });
}

fn print_startup_banner(bind_address: &str, data_dir: &Path, web_dir: Option<&Path>) {
    println!();
    println!("  _     _       _ _       _");
    println!(" | |__ (_) ___ | (_)_ __ | | __");
    println!(" | '_ \\| |/ _ \\| | | '_ \\| |/ /");
    println!(" | |_) | | (_) | | | | | |   <");
    println!(" |_.__/|_|\\___/|_|_|_| |_|_|\\_\\");
    println!();
    println!("  Listening:   http://{}", bind_address);
    println!("  Profile:     {}", data_dir.join(CONFIG_FILE).display());
    println!("  Views:       {}", data_dir.join(VIEWS_FILE).display());
    match web_dir {
        Some(dir) => {
            println!("  Web root:    {}", dir.display());
            println!("  Admin:       http://{}/admin", bind_address);
        }
        None => println!("  Web root:    None (API-only mode)"),
    }
    println!();
}
