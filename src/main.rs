use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use activity_comments::config::AppConfig;
use activity_comments::core::{CancellationSignal, Dispatch};
use activity_comments::domain::activity::{ActivityId, ActivityInput, CreateActivity};
use activity_comments::domain::comment::CreateComment;
use activity_comments::domain::user::{AppUser, Photo};
use activity_comments::identity::FixedUserAccessor;
use activity_comments::mapping::ProfileMapper;
use activity_comments::metrics::{self, Metrics};
use activity_comments::persistence::{ContextFactory, InMemoryStore, PgStore};
use activity_comments::utils::{retry_with_backoff, RetryConfig};
use activity_comments::Mediator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,activity_comments=debug")),
        )
        .init();

    let config = AppConfig::parse();
    tracing::info!("🚀 Starting activity comments pipeline");

    // === 1. Initialize Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // Start metrics HTTP server in background thread
    let metrics_registry = Arc::new(metrics.registry().clone());
    let metrics_port = config.metrics_port;
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("Metrics runtime error: {}", e);
                return;
            }
        };
        rt.block_on(async {
            if let Err(e) = metrics::start_metrics_server(metrics_registry, metrics_port).await {
                tracing::error!("Metrics server error: {}", e);
            }
        });
    });

    // === 2. Open the store ===
    let users = demo_users();
    let contexts: Arc<dyn ContextFactory> = match config.database_url.as_deref() {
        Some(url) if config.uses_postgres() => {
            tracing::info!("Connecting to Postgres...");
            let store = retry_with_backoff(
                RetryConfig::connect(config.connect_attempts),
                "postgres_connect",
                Some(&metrics),
                |_attempt| PgStore::connect(url, config.max_connections),
            )
            .await?;
            store.ensure_schema().await?;
            for user in &users {
                store.ensure_user(user).await?;
            }
            Arc::new(store)
        }
        _ => {
            tracing::info!("No database configured, using the in-memory store");
            let store = InMemoryStore::new();
            for user in users {
                store.seed_user(user).await;
            }
            Arc::new(store)
        }
    };

    // === 3. Build the mediator ===
    let mediator = Mediator::new(
        contexts,
        Arc::new(FixedUserAccessor::new(config.current_user.clone())),
        Arc::new(ProfileMapper),
        Some(Arc::clone(&metrics)),
    );
    let cancel = CancellationSignal::never();

    // === 4. Demonstrate the pipeline ===
    tracing::info!("📝 Demonstrating activity comments as {}", config.current_user);

    let activity_id = ActivityId::random();
    let created = mediator
        .send(
            CreateActivity {
                id: activity_id,
                activity: ActivityInput {
                    title: "Future Activity 1".to_string(),
                    date: Utc::now() + Duration::days(30),
                    description: "Activity 1 month in future".to_string(),
                    category: "culture".to_string(),
                    city: "London".to_string(),
                    venue: "Natural History Museum".to_string(),
                },
            },
            &cancel,
        )
        .await?;
    tracing::info!(?created, "✅ Activity created: {}", activity_id);

    let comment = mediator
        .send(CreateComment::new(activity_id, "Nice event!"), &cancel)
        .await?;
    match comment.value() {
        Some(dto) => tracing::info!(comment_id = %dto.id, author = %dto.username, "✅ Comment added"),
        None => tracing::warn!(message = ?comment.message(), "Comment not added"),
    }

    let empty = mediator.send(CreateComment::new(activity_id, ""), &cancel).await?;
    tracing::info!(message = ?empty.message(), "❌ Empty body rejected");

    let missing = mediator
        .send(CreateComment::new(ActivityId::random(), "Nice event!"), &cancel)
        .await?;
    tracing::info!(message = ?missing.message(), "❌ Unknown activity rejected");

    // Keep serving /metrics until interrupted
    tracing::info!("⏳ Metrics available on port {}, press Ctrl+C to exit", metrics_port);
    tokio::signal::ctrl_c().await?;

    tracing::info!("🎉 Demo complete!");
    Ok(())
}

fn demo_users() -> Vec<AppUser> {
    vec![
        AppUser::new("alice", "Alice").with_photo(Photo {
            id: "alice-main".to_string(),
            url: "https://res.cloudinary.com/demo/image/upload/alice.jpg".to_string(),
            is_main: true,
        }),
        AppUser::new("bob", "Bob"),
    ]
}
