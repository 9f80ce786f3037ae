mod common;
mod config;
mod console;
mod network;
mod session;
mod ui;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use network::{ChatClient, HttpNode, OllamaDrafter};
use tokio::sync::mpsc;
use ui::ChatApp;

use crate::common::{SessionEvent, UserCommand};
use crate::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "rust_copilot_chat",
    version,
    about = "Chat client for a local P2P node with AI reply suggestions"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Chat node HTTP address (overrides NODE_HTTP)
    #[arg(long, value_name = "URL")]
    node_http: Option<String>,
    /// Ollama address (overrides OLLAMA_URL)
    #[arg(long, value_name = "URL")]
    ollama_url: Option<String>,
    /// Model used for reply drafts (overrides LLM_MODEL)
    #[arg(long)]
    model: Option<String>,
    /// Inbox polling interval in milliseconds
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Run without a window: commands on stdin, transcript on stdout
    Console,
    /// Write the effective configuration to the config file and exit
    InitConfig,
}

impl Cli {
    fn resolve_config(&self) -> AppConfig {
        let mut app_config = config::load_config(&self.config);
        app_config.apply_env();
        if let Some(node_http) = &self.node_http {
            app_config.node_http = node_http.clone();
        }
        if let Some(ollama_url) = &self.ollama_url {
            app_config.ollama_url = ollama_url.clone();
        }
        if let Some(model) = &self.model {
            app_config.llm_model = model.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            app_config.poll_interval_ms = interval_ms;
        }
        app_config
    }
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = cli.resolve_config();

    match cli.mode {
        Some(Mode::InitConfig) => {
            match config::save_config(&cli.config, &app_config) {
                Ok(()) => log::info!("Wrote config to {}", cli.config),
                Err(err) => log::error!("Failed to write config {}: {err}", cli.config),
            }
            Ok(())
        }
        Some(Mode::Console) => {
            run_console(app_config).await;
            Ok(())
        }
        None => run_window(app_config).await,
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C ({err}); stop by closing the front end");
        std::future::pending::<()>().await;
    }
}

fn spawn_session(
    app_config: &AppConfig,
) -> (
    mpsc::Sender<UserCommand>,
    mpsc::Receiver<SessionEvent>,
    tokio::task::JoinHandle<session::ChatSession>,
) {
    // Front end -> session
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Session -> front end
    let (event_tx, event_rx) = mpsc::channel(100);

    let client = ChatClient::new(
        Arc::new(HttpNode::new(app_config.node_http.clone())),
        Arc::new(OllamaDrafter::new(
            app_config.ollama_url.clone(),
            app_config.llm_model.clone(),
        )),
        event_tx,
        cmd_rx,
        app_config.poll_interval(),
        app_config.suggestion_timeout(),
    );
    let handle = tokio::spawn(client.run(shutdown_signal()));

    (cmd_tx, event_rx, handle)
}

async fn run_console(app_config: AppConfig) {
    let (cmd_tx, event_rx, handle) = spawn_session(&app_config);
    console::run(&app_config.default_recipient, cmd_tx, event_rx).await;

    match handle.await {
        Ok(session) => log::info!(
            "Session closed after sending {} messages",
            session.outbound().len()
        ),
        Err(err) => log::error!("Session task failed: {err}"),
    }
}

async fn run_window(app_config: AppConfig) -> Result<(), eframe::Error> {
    let (cmd_tx, event_rx, _handle) = spawn_session(&app_config);

    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let default_recipient = app_config.default_recipient.clone();

    log::info!(
        "Using node {} and model {} at {}",
        app_config.node_http,
        app_config.llm_model,
        app_config.ollama_url
    );

    eframe::run_native(
        "P2P LLM Chat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            Ok(Box::new(ChatApp::new(
                cc,
                &default_recipient,
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )
}
