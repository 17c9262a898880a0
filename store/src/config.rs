use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub max_connections: u32,
}

impl StoreConfig {
    /// CLI argument wins over `DATABASE_URL`; an in-memory database is the
    /// last resort so the demo binary works with no setup at all.
    pub fn from_cli_or_env(cli_arg: Option<String>) -> Self {
        let url = if let Some(arg) = cli_arg {
            arg
        } else if let Ok(env) = std::env::var("DATABASE_URL") {
            env
        } else {
            "sqlite::memory:".to_string()
        };

        Self {
            url,
            max_connections: 5,
        }
    }

    pub async fn create_pool(&self) -> Result<sqlx::SqlitePool, sqlx::Error> {
        let options = sqlx::sqlite::SqliteConnectOptions::from_str(&self.url)?
            .create_if_missing(true)
            // Cascades and orphan detection rely on SQLite enforcing
            // foreign keys on every connection.
            .foreign_keys(true);
        sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await
    }
}
