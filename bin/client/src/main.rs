//! User administration client

mod constants;
mod users;

use anyhow::Context;
use clap::{Parser, Subcommand};
use common::fields::{BACK_ID, FRONT_ID, PHOTO_OF_INDIVIDUAL};
use common::get_current_timestamp_ms;
use constants::DEFAULT_SERVER_URL;
use std::fs;
use std::path::PathBuf;
use users::UsersClient;

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "User administration client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute an upload signature the way the server does
    Sign {
        /// Eager transformations
        #[arg(short, long)]
        eager: String,
        /// API secret
        #[arg(short, long)]
        secret: String,
        /// Timestamp (also used as public id); defaults to now
        #[arg(short, long)]
        timestamp: Option<String>,
        /// Public id, when it differs from the timestamp
        #[arg(short, long)]
        public_id: Option<String>,
    },
    /// Create a user, optionally with identity images
    CreateUser {
        /// File containing the user JSON
        #[arg(short, long)]
        json: PathBuf,
        /// Photo of the individual
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Front of the identity document
        #[arg(long)]
        front_id: Option<PathBuf>,
        /// Back of the identity document
        #[arg(long)]
        back_id: Option<PathBuf>,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },
    /// List users
    ListUsers {
        /// Comma-separated fields to return
        #[arg(short, long)]
        fields: Option<String>,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },
    /// Show one user
    GetUser {
        user_id: u64,
        /// Include template data (allowed offices)
        #[arg(short, long)]
        template: bool,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },
    /// Delete a user
    DeleteUser {
        user_id: u64,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        server: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sign {
            eager,
            secret,
            timestamp,
            public_id,
        } => {
            let timestamp = timestamp.unwrap_or_else(|| get_current_timestamp_ms().to_string());
            let public_id = public_id.unwrap_or_else(|| timestamp.clone());
            println!(
                "Signed payload: {}",
                crypto::build_signature_payload(&timestamp, &public_id, &eager)
            );
            println!(
                "Signature: {}",
                crypto::sign_upload_params(&timestamp, &public_id, &eager, &secret)
            );
        }
        Commands::CreateUser {
            json,
            photo,
            front_id,
            back_id,
            server,
        } => {
            let body = fs::read_to_string(&json)
                .with_context(|| format!("Failed to read user JSON from {:?}", json))?;
            let images: Vec<(&str, PathBuf)> = [
                (PHOTO_OF_INDIVIDUAL, photo),
                (FRONT_ID, front_id),
                (BACK_ID, back_id),
            ]
            .into_iter()
            .filter_map(|(field, path)| path.map(|p| (field, p)))
            .collect();

            let result = UsersClient::new(&server).create_user(body, &images)?;
            match result.resource_id {
                Some(id) => println!("✓ User created: {}", id),
                None => println!("✓ User created"),
            }
        }
        Commands::ListUsers { fields, server } => {
            let users = UsersClient::new(&server).list_users(fields.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
        Commands::GetUser {
            user_id,
            template,
            server,
        } => {
            let user = UsersClient::new(&server).get_user(user_id, template)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Commands::DeleteUser { user_id, server } => {
            UsersClient::new(&server).delete_user(user_id)?;
            println!("✓ User deleted: {}", user_id);
        }
    }

    Ok(())
}
