//! Friday agent binary: the entry point for the voice assistant.
//!
//! Loads configuration and credentials, selects a provider, joins the
//! configured LiveKit room and greets the user, then stays in the room until
//! SIGTERM/SIGINT.

use friday_agent::backend::{self, BackendError};
use friday_agent::config::{self, Config, Secrets};
use friday_agent::tools::{ToolSet, ToolSettings};
use friday_agent::{
    init_tracing, probe_capabilities, selector, AgentError, AgentSession, Assistant,
    BootstrapOutcome,
};
use friday_types::Capabilities;
use friday_voice::{LiveKitChannel, VoiceService};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    let (config_path, config_source) = config::resolve_config_path();
    let config = match config::load_config(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => return finish(Err(AgentError::from(e))),
    };

    init_tracing(&config.logging);

    tracing::info!(
        source = config_source,
        path = %config_path,
        "resolved startup configuration path"
    );

    let secrets = match Secrets::from_env() {
        Ok(secrets) => secrets,
        Err(e) => return finish(Err(e)),
    };

    finish(run(config, secrets, probe_capabilities()).await)
}

async fn run(config: Config, secrets: Secrets, capabilities: Capabilities) -> Result<(), AgentError> {
    for status in selector::diagnose(&capabilities, &secrets.credentials) {
        tracing::info!(
            provider = %status.provider,
            state = %status.diagnostic,
            "provider status"
        );
    }

    let http = reqwest::Client::builder()
        .user_agent(concat!("friday-agent/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(BackendError::from)?;

    let tools = ToolSet::standard(
        http.clone(),
        ToolSettings {
            weather_url: config.endpoints.weather.clone(),
            search_url: config.endpoints.search.clone(),
            mail: secrets.mail.clone(),
        },
    );
    let assistant = Assistant::new(&capabilities, &secrets.credentials, tools)?;
    let backend = backend::build(
        assistant.provider(),
        &secrets.credentials,
        &config.endpoints,
        http,
    )?;

    let service = Arc::new(VoiceService::new(secrets.livekit.clone()));
    let channel = LiveKitChannel::new(
        service,
        config.room.name.as_str(),
        config.room.identity.as_str(),
        config.room.display_name.as_str(),
    );

    let mut session = AgentSession::new(assistant, backend);
    let started = session
        .bootstrap_until(channel, &capabilities, shutdown_signal())
        .await?;
    if started == BootstrapOutcome::Interrupted {
        return Ok(());
    }

    tracing::info!(
        session_id = %session.id(),
        room = %config.room.name,
        "friday is active in the room"
    );

    shutdown_signal().await;
    session.close().await;
    Ok(())
}

/// Exit status of a finished run and the lines to print on stderr.
fn outcome(result: &Result<(), AgentError>) -> (u8, Vec<String>) {
    match result {
        Ok(()) => (0, Vec::new()),
        Err(error) => {
            let mut lines = vec![
                format!("error: {}", error),
                String::new(),
                "Troubleshooting:".to_string(),
            ];
            lines.extend(error.troubleshooting().iter().map(|line| format!("  {}", line)));
            (1, lines)
        }
    }
}

fn finish(result: Result<(), AgentError>) -> ExitCode {
    match &result {
        Ok(()) => tracing::info!("friday agent shut down"),
        Err(e) => tracing::error!("{}", e),
    }
    let (code, lines) = outcome(&result);
    for line in lines {
        eprintln!("{}", line);
    }
    ExitCode::from(code)
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
