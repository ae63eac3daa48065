use tracing::info;

use crate::auth::{hash_password, AuthError, Role};
use crate::database::models::NewUser;
use crate::database::repository::UserRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table already held users
    Skipped { existing: i64 },
    Seeded { created: usize },
}

/// Default accounts: one per role, leader and operator on the pressing line.
const DEFAULT_USERS: &[(&str, Role, Option<&str>)] = &[
    ("manager", Role::Manager, None),
    ("leader_prs", Role::Leader, Some("PRESSING")),
    ("op_prs_01", Role::Operator, Some("PRESSING")),
];

/// Create the schema and insert the default accounts unless users exist.
pub async fn seed_users(repo: &UserRepository, password: &str) -> Result<SeedOutcome, AuthError> {
    repo.ensure_schema().await?;

    let existing = repo.count().await?;
    if existing > 0 {
        info!("Credential store already has {} users, skipping seed", existing);
        return Ok(SeedOutcome::Skipped { existing });
    }

    info!("Seeding default users");
    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))??;

    let users: Vec<NewUser> = DEFAULT_USERS
        .iter()
        .map(|(username, role, department)| NewUser {
            username: username.to_string(),
            password_hash: password_hash.clone(),
            role: role.as_str().to_string(),
            department: department.map(str::to_string),
        })
        .collect();

    repo.insert_all(&users).await?;

    for (username, role, _) in DEFAULT_USERS {
        info!("  created {} ({})", username, role);
    }
    Ok(SeedOutcome::Seeded { created: users.len() })
}
