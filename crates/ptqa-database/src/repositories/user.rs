//! User repository implementation.

use std::sync::Arc;

use serde_json::json;

use ptqa_core::error::AppError;
use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::types::id::UserId;
use ptqa_core::types::query::CollectionQuery;
use ptqa_core::types::sorting::SortField;
use ptqa_entity::user::model::{CreateUser, UpdateUser};
use ptqa_entity::user::{User, UserStatus};

use super::{decode_row, decode_rows, encode_row};

const COLLECTION: &str = "users";

/// Repository for the `users` collection.
#[derive(Debug, Clone)]
pub struct UserRepository {
    adapter: Arc<dyn CollectionAdapter>,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(adapter: Arc<dyn CollectionAdapter>) -> Self {
        Self { adapter }
    }

    /// Find the single active user whose stored credential equals `password`.
    ///
    /// Returns `None` unless exactly one row matches.
    pub async fn find_active_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<User>> {
        let query = CollectionQuery::new()
            .eq("username", username)
            .eq("password", password)
            .eq("status", UserStatus::Active.as_str())
            .limit(2);
        Ok(single(self.adapter.fetch(COLLECTION, &query).await?))
    }

    /// Find the single active user with the given username.
    pub async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let query = CollectionQuery::new()
            .eq("username", username)
            .eq("status", UserStatus::Active.as_str())
            .limit(2);
        Ok(single(self.adapter.fetch(COLLECTION, &query).await?))
    }

    /// Find a user by username regardless of status.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let query = CollectionQuery::new().eq("username", username).limit(1);
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows).into_iter().next())
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let query = CollectionQuery::new().eq("id", id.as_str()).limit(1);
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows).into_iter().next())
    }

    /// List all users, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<User>> {
        let query = CollectionQuery::new().order_by(SortField::desc("created_at"));
        let rows = self.adapter.fetch(COLLECTION, &query).await?;
        Ok(decode_rows(COLLECTION, rows))
    }

    /// Insert a new user.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let row = self.adapter.insert(COLLECTION, encode_row(data)?).await?;
        decode_row(COLLECTION, row)
    }

    /// Update profile fields.
    pub async fn update(&self, id: &UserId, data: &UpdateUser) -> AppResult<User> {
        let row = self
            .adapter
            .update(COLLECTION, id.as_str(), encode_row(data)?)
            .await?;
        decode_row(COLLECTION, row)
    }

    /// Replace the stored credential.
    pub async fn update_password(&self, id: &UserId, password: &str) -> AppResult<()> {
        self.adapter
            .update(COLLECTION, id.as_str(), json!({ "password": password }))
            .await?;
        Ok(())
    }

    /// Delete a user.
    pub async fn delete(&self, id: &UserId) -> AppResult<()> {
        self.adapter.delete(COLLECTION, id.as_str()).await
    }

    /// Fail with `Conflict` if the username is taken.
    pub async fn ensure_username_available(&self, username: &str) -> AppResult<()> {
        match self.find_by_username(username).await? {
            Some(_) => Err(AppError::conflict(format!(
                "Username '{username}' is already taken"
            ))),
            None => Ok(()),
        }
    }
}

fn single(rows: Vec<serde_json::Value>) -> Option<User> {
    let mut users: Vec<User> = decode_rows(COLLECTION, rows);
    if users.len() == 1 { users.pop() } else { None }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::MemoryCollectionAdapter;

    async fn repo() -> UserRepository {
        let adapter = MemoryCollectionAdapter::new();
        adapter
            .seed(
                COLLECTION,
                vec![
                    json!({"id": "u1", "username": "admin", "password": "admin123", "name": "Admin", "role": "admin", "status": "active"}),
                    json!({"id": "u2", "username": "lama", "password": "lama", "name": "Lama", "role": "user", "status": "inactive"}),
                ],
            )
            .await;
        UserRepository::new(Arc::new(adapter))
    }

    #[tokio::test]
    async fn test_credentials_must_match_an_active_row() {
        let repo = repo().await;
        let user = repo
            .find_active_by_credentials("admin", "admin123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id.as_str(), "u1");

        assert!(repo.find_active_by_credentials("admin", "wrong").await.unwrap().is_none());
        assert!(repo.find_active_by_credentials("lama", "lama").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let repo = repo().await;
        let err = repo.ensure_username_available("lama").await.unwrap_err();
        assert_eq!(err.kind, ptqa_core::error::ErrorKind::Conflict);
        repo.ensure_username_available("baru").await.unwrap();
    }
}
