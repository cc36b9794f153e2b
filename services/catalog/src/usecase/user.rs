use chrono::Utc;

use shelf_domain::id::UserId;
use shelf_domain::kind::EntityKind;
use shelf_domain::lifecycle::Visibility;
use shelf_domain::user::UserRole;

use crate::domain::repository::{PasswordHasher, SequencePort, UserRepository};
use crate::domain::types::User;
use crate::error::CatalogError;
use crate::usecase::sequence::next_id;

// ── CreateUser (signup) ──────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<UserRole>,
}

pub struct CreateUserUseCase<U: UserRepository, S: SequencePort, H: PasswordHasher> {
    pub users: U,
    pub sequence: S,
    pub hasher: H,
}

impl<U: UserRepository, S: SequencePort, H: PasswordHasher> CreateUserUseCase<U, S, H> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, CatalogError> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(CatalogError::InvalidInput("username must not be blank"));
        }
        if input.password.is_empty() {
            return Err(CatalogError::InvalidInput("password must not be empty"));
        }
        if self
            .users
            .find_visible_by_username(username)
            .await?
            .is_some()
        {
            return Err(CatalogError::Conflict(EntityKind::User));
        }
        let password_hash = self.hasher.hash(&input.password)?;

        let user = User {
            id: next_id(&self.sequence).await?,
            username: username.to_owned(),
            email: input.email,
            avatar: input.avatar,
            password_hash,
            role: input.role.unwrap_or_default(),
            created_at: Utc::now(),
            visibility: Visibility::Visible,
        };
        self.users.insert(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, id: UserId) -> Result<User, CatalogError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::User))
    }
}
