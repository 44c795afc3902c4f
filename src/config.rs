use clap::Parser;

// ============================================================================
// Application Configuration
// ============================================================================
//
// Flags win over environment variables, which win over defaults.
// Without a database URL the binary runs against the in-memory store.
//
// ============================================================================

#[derive(Parser, Debug, Clone)]
#[command(name = "activity_comments", about = "Activity comment command pipeline")]
pub struct AppConfig {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Port for the /metrics and /health endpoints
    #[arg(long, env = "METRICS_PORT", default_value_t = 9090)]
    pub metrics_port: u16,

    /// Username the identity accessor reports as logged in
    #[arg(long, env = "CURRENT_USER", default_value = "alice")]
    pub current_user: String,

    /// Attempts made to reach Postgres before giving up
    #[arg(long, default_value_t = 5)]
    pub connect_attempts: u32,

    /// Upper bound for the Postgres pool
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,
}

impl AppConfig {
    pub fn uses_postgres(&self) -> bool {
        self.database_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}
