use tracing::info;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{RegisterRequest, User};

pub(crate) struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<User, DomainError> {
        let req = req.validate()?;
        let user = self
            .repo
            .create_user(NewUser {
                username: req.username,
                email: req.email,
            })
            .await?;
        info!(user_id = user.id, username = %user.username, "author registered");
        Ok(user)
    }

    pub(crate) async fn find_by_username(&self, username: &str) -> Result<User, DomainError> {
        let username = username.trim();
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))
    }
}
