//! CLI administration tool for partner-links.
//!
//! Provides commands for managing API tokens, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Workspace token with selected scopes
//! cargo run --bin admin -- token create --workspace ws_1 --scopes links.read,analytics.read
//!
//! # Partner token
//! cargo run --bin admin -- token create --partner pn_1
//!
//! # List all tokens
//! cargo run --bin admin -- token list
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke "Dashboard"
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server

use partner_links::application::services::auth_service::hash_token;
use partner_links::domain::principal::Scope;
use partner_links::domain::repositories::{ApiToken, NewApiToken, TokenRepository};
use partner_links::infrastructure::persistence::PgTokenRepository;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;

/// CLI tool for managing partner-links.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Dashboard", "Partner portal")
        #[arg(short, long)]
        name: Option<String>,

        /// Workspace the token acts for
        #[arg(short, long, conflicts_with = "partner")]
        workspace: Option<String>,

        /// Partner profile the token acts for
        #[arg(short, long)]
        partner: Option<String>,

        /// Comma-separated scopes for workspace tokens (default: all)
        #[arg(short, long, value_delimiter = ',')]
        scopes: Vec<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

/// Owner and scopes of a token about to be created.
struct TokenOwner {
    workspace_id: Option<String>,
    partner_id: Option<String>,
    scopes: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create {
            name,
            workspace,
            partner,
            scopes,
            yes,
        } => {
            let owner = token_owner(workspace, partner, scopes)?;
            create_token(repo, name, owner, yes).await?;
        }
        TokenAction::List => list_tokens(repo).await?,
        TokenAction::Revoke { name_or_id } => revoke_token(repo, name_or_id).await?,
    }

    Ok(())
}

/// Validates the owner flags and normalizes scopes.
///
/// Partner tokens carry no scopes; workspace tokens default to every scope.
fn token_owner(
    workspace: Option<String>,
    partner: Option<String>,
    scopes: Vec<String>,
) -> Result<TokenOwner> {
    match (workspace, partner) {
        (Some(workspace_id), None) => {
            let scopes = if scopes.is_empty() {
                Scope::ALL.iter().map(|s| s.as_str().to_string()).collect()
            } else {
                scopes
                    .iter()
                    .map(|s| {
                        Scope::from_str(s.trim())
                            .map(|scope| scope.as_str().to_string())
                            .map_err(|e| anyhow::anyhow!(e))
                    })
                    .collect::<Result<Vec<_>>>()?
            };
            Ok(TokenOwner {
                workspace_id: Some(workspace_id),
                partner_id: None,
                scopes,
            })
        }
        (None, Some(partner_id)) => {
            if !scopes.is_empty() {
                bail!("Partner tokens do not take scopes");
            }
            Ok(TokenOwner {
                workspace_id: None,
                partner_id: Some(partner_id),
                scopes: Vec::new(),
            })
        }
        _ => bail!("Pass exactly one of --workspace or --partner"),
    }
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC of the token is stored; the raw value is shown once.
async fn create_token(
    repo: Arc<PgTokenRepository>,
    name: Option<String>,
    owner: TokenOwner,
    skip_confirm: bool,
) -> Result<()> {
    let signing_secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to create tokens")?;

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Dashboard")
            .interact_text()?,
    };

    let token_value = generate_token();

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:   {}", token_name.cyan());
    match (&owner.workspace_id, &owner.partner_id) {
        (Some(ws), _) => {
            println!("  Owner:  workspace {}", ws.cyan());
            println!("  Scopes: {}", owner.scopes.join(", ").cyan());
        }
        (_, Some(pn)) => println!("  Owner:  partner {}", pn.cyan()),
        _ => {}
    }
    println!("  Token:  {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.create_token(NewApiToken {
        name: token_name,
        token_hash: hash_token(&signing_secret, &token_value),
        workspace_id: owner.workspace_id,
        partner_id: owner.partner_id,
        scopes: owner.scopes,
    })
    .await
    .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/domains/default",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<24} {:<22} {:<17} {:<8}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<4} {:<24} {:<22} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            owner_label(token),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

fn owner_label(token: &ApiToken) -> String {
    match (&token.workspace_id, &token.partner_id) {
        (Some(ws), _) => format!("ws:{ws}"),
        (_, Some(pn)) => format!("partner:{pn}"),
        _ => "-".to_string(),
    }
}

/// Revokes a token by name or numeric ID after confirmation.
async fn revoke_token(repo: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let counts = [
        ("Links", "SELECT COUNT(*) FROM links"),
        ("Partner links", "SELECT COUNT(*) FROM links WHERE partner_id IS NOT NULL"),
        ("Events", "SELECT COUNT(*) FROM link_events"),
        ("Commissions", "SELECT COUNT(*) FROM commissions"),
        (
            "Active tokens",
            "SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL",
        ),
    ];

    for (label, sql) in counts {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
        println!(
            "  {:<15}{}",
            format!("{label}:"),
            count.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a 48-character alphanumeric token (~286 bits of entropy).
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
