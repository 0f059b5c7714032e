//! Bootstraps an admin account straight against the database.
//!
//! `create-user <username> <password> [email]`
use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use gallery_cms::{
    auth::{jwt::JwtKeys, repo::PgUserStore, services::AuthService},
    config::AppConfig,
    db, telemetry,
};

#[derive(Debug, Parser)]
#[command(name = "create-user", about = "Create an admin user for the gallery CMS")]
struct Cli {
    /// Login name
    username: String,
    /// Plain-text password; hashed before it is stored
    password: String,
    /// Optional contact email
    email: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    let username = cli.username.trim();
    if username.is_empty() {
        bail!("username must not be empty");
    }
    if cli.password.chars().count() < config.auth.min_password_len {
        bail!(
            "password must be at least {} characters",
            config.auth.min_password_len
        );
    }
    let email = cli
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());

    let pool = db::connect(&config.database_url).await?;
    db::migrate(&pool).await?;

    let auth = AuthService::new(
        Arc::new(PgUserStore::new(pool)),
        JwtKeys::from_config(&config.jwt),
        config.auth,
    );
    let user = auth
        .create_user(username, &cli.password, email.as_deref())
        .await?;

    println!(
        "created user {} (id {}, role {})",
        user.username, user.id, user.role
    );
    Ok(())
}
