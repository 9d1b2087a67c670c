//! Connection check: verifies LiveKit credentials and reports which provider
//! the assistant would use, without starting a session.

use friday_agent::config::{self, Secrets};
use friday_agent::{init_tracing, probe_capabilities, selector, AgentError};
use friday_voice::{LiveKitConfig, VoiceService};
use std::process::ExitCode;

/// Room created to confirm the credentials can manage rooms.
const TEST_ROOM: &str = "friday-test-room";

/// Identity of the person joining the test room from the playground.
const CHECK_IDENTITY: &str = "friday-playground-user";

/// Shows the first ten characters of a credential.
fn mask(value: &str) -> String {
    let prefix: String = value.chars().take(10).collect();
    format!("{}...", prefix)
}

fn print_troubleshooting() {
    println!();
    println!("Troubleshooting:");
    println!("  1. Check your LiveKit credentials at https://cloud.livekit.io");
    println!("  2. Make sure your project is active");
    println!("  3. Verify your internet connection");
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let (config_path, _) = config::resolve_config_path();
    let config = match config::load_config(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging);

    println!("Testing LiveKit connection...");

    let secrets = match Secrets::from_env() {
        Ok(secrets) => secrets,
        Err(AgentError::MissingCredentials(missing)) => {
            println!("Missing LiveKit credentials: {}", missing.join(", "));
            println!();
            println!("Please set in your environment or .env file:");
            println!("  {}=wss://your-project.livekit.cloud", LiveKitConfig::URL_VAR);
            println!("  {}=your-api-key", LiveKitConfig::API_KEY_VAR);
            println!("  {}=your-secret", LiveKitConfig::API_SECRET_VAR);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("URL: {}", secrets.livekit.url);
    println!("API Key: {}", mask(&secrets.livekit.api_key));
    println!("Secret: {}", mask(&secrets.livekit.api_secret));

    let service = VoiceService::new(secrets.livekit.clone());

    match service.list_rooms().await {
        Ok(rooms) => println!("Connection successful, found {} rooms", rooms.len()),
        Err(e) => {
            println!("Connection failed: {}", e);
            print_troubleshooting();
            return ExitCode::FAILURE;
        }
    }

    match service.create_room(TEST_ROOM).await {
        Ok(room) => println!("Test room ready: {}", room.name),
        Err(e) => println!("Could not create test room: {}", e),
    }

    // Lets a person join the test room from the LiveKit playground.
    match service.generate_join_token(TEST_ROOM, CHECK_IDENTITY, CHECK_IDENTITY) {
        Ok(token) => println!("Playground join token for {}: {}", TEST_ROOM, token),
        Err(e) => println!("Could not mint a join token: {}", e),
    }

    let capabilities = probe_capabilities();
    println!();
    println!("Providers:");
    for status in selector::diagnose(&capabilities, &secrets.credentials) {
        println!("  - {}", status);
    }

    match selector::select_provider(&capabilities, &secrets.credentials) {
        Ok(provider) => println!("Selected provider: {} ({})", provider.provider(), provider.kind()),
        Err(_) => {
            println!("No provider is usable: set OPENAI_API_KEY or GOOGLE_API_KEY");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
