use clap::Subcommand;
use serde_json::json;

use crate::api::RegisterUserRequest;
use crate::auth::hash_password;
use crate::cli::utils::{output_success, output_users};
use crate::cli::{connect, OutputFormat};
use crate::database::{models::NewUser, CredentialStore, PgCredentialStore};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Create {
        #[arg(long, help = "Username (stored lowercased)")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "Role, e.g. administrador")]
        role: String,
    },

    #[command(about = "List user accounts")]
    List,
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create { username, password, role } => {
            // Same normalization and checks as self-service registration
            let registration = RegisterUserRequest { username, password, role }.validate()?;

            let store = PgCredentialStore::new(connect().await?);
            if store.username_taken(&registration.username, None).await? {
                anyhow::bail!("El nombre de usuario ya existe.");
            }

            let user = store
                .insert(NewUser {
                    username: registration.username,
                    password_hash: hash_password(&registration.password)?,
                    role: registration.role,
                })
                .await?;

            output_success(
                &output_format,
                &format!("Created user '{}' with role '{}'", user.username, user.role),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::List => {
            let store = PgCredentialStore::new(connect().await?);
            let users = store.list().await?;
            output_users(&output_format, &users)
        }
    }
}
