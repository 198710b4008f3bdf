use std::sync::Arc;

use welcome_bot::config::BotConfig;
use welcome_bot::dispatcher::Dispatcher;
use welcome_bot::filter::WordFilter;
use welcome_bot::gateway::SlackGateway;
use welcome_bot::schedule;
use welcome_bot::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env()?;

    eprintln!("🤖 Welcome Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Events:  http://0.0.0.0:{}/slack/events", config.port);
    eprintln!("   Command: http://0.0.0.0:{}/message-count\n", config.port);

    let gateway = Arc::new(SlackGateway::new(config.bot_token.clone()));

    // Resolve our own identity once so the dispatcher can skip our messages.
    let bot_user_id = gateway.auth_test().await?;
    tracing::info!(bot_user_id = %bot_user_id, "authenticated with Slack");

    // Scheduling runs before the server binds; a failure here is logged
    // but does not keep the bot from serving events.
    if let Some(channel) = &config.schedule_channel {
        let messages = schedule::startup_messages(channel);
        match schedule::schedule_all(gateway.as_ref(), &messages).await {
            Ok(ids) => tracing::info!(count = ids.len(), "startup messages scheduled"),
            Err(e) => tracing::warn!("startup scheduling failed: {e}"),
        }
    } else {
        tracing::info!("no schedule channel configured, skipping startup messages");
    }

    let dispatcher = Arc::new(Dispatcher::with_filter(
        gateway,
        bot_user_id,
        WordFilter::default_terms(),
    ));
    let app = server::router(AppState {
        dispatcher,
        signing_secret: config.signing_secret.clone(),
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "events server started");
    axum::serve(listener, app).await?;

    Ok(())
}
