//! Admin account management commands.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use rand::distr::{Alphanumeric, SampleString};
use secrecy::SecretString;
use thiserror::Error;

use furnspace_admin::db::{AdminUserRepository, RepositoryError, create_pool};
use furnspace_admin::models::admin_user::AdminRole;
use furnspace_core::{Email, EmailError};

/// Length of generated admin passwords.
const GENERATED_PASSWORD_LENGTH: usize = 20;

/// Errors that can occur while creating an admin user.
#[derive(Debug, Error)]
pub enum AdminCommandError {
    #[error("missing environment variable: ADMIN_DATABASE_URL (or DATABASE_URL)")]
    MissingEnvVar,
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("invalid role '{0}' (expected super_admin, admin, or viewer)")]
    InvalidRole(String),
    #[error("password hashing failed")]
    PasswordHash,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("an admin with this email already exists")]
    AlreadyExists,
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

/// Create an admin user, generating a password when none is supplied.
///
/// # Errors
///
/// Returns `AdminCommandError` on validation failure, hashing failure, or
/// database errors.
#[allow(clippy::print_stdout)] // the generated password must reach the operator
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: Option<&str>,
) -> Result<(), AdminCommandError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    let role = role
        .parse::<AdminRole>()
        .map_err(|_| AdminCommandError::InvalidRole(role.to_owned()))?;

    let (password, generated) = match password {
        Some(p) => (p.to_owned(), false),
        None => (
            Alphanumeric.sample_string(&mut rand::rng(), GENERATED_PASSWORD_LENGTH),
            true,
        ),
    };
    let password_hash = hash_password(&password)?;

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminCommandError::MissingEnvVar)?;
    let pool = create_pool(&SecretString::from(database_url)).await?;

    let repo = AdminUserRepository::new(&pool);
    let admin = repo
        .create(&email, name, role, &password_hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminCommandError::AlreadyExists,
            other => AdminCommandError::Repository(other),
        })?;

    tracing::info!(admin_id = %admin.id, email = %admin.email, role = %admin.role, "admin user created");
    if generated {
        println!("Generated password for {}: {password}", admin.email);
        println!("Store it now - it is not shown again.");
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AdminCommandError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminCommandError::PasswordHash)
}
