//! Admin user management: create, edit, password changes, deletion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use ptqa_auth::password::{CredentialHandler, PasswordValidator};
use ptqa_auth::rbac::{Capability, RbacEnforcer};
use ptqa_core::error::AppError;
use ptqa_core::result::AppResult;
use ptqa_core::types::id::UserId;
use ptqa_database::repositories::UserRepository;
use ptqa_entity::audit::AuditAction;
use ptqa_entity::user::{CreateUser, UpdateUser, User, UserRole, UserStatus};

use crate::audit::AuditRecorder;
use crate::context::RequestContext;

/// Handles administrative user management operations.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Stored-credential handling.
    credentials: Arc<CredentialHandler>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Audit recorder.
    audit: Arc<AuditRecorder>,
    /// RBAC enforcer.
    rbac: Arc<RbacEnforcer>,
}

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Username (unique).
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Role assignment.
    pub role: UserRole,
    /// Initial status, active unless given.
    #[serde(default)]
    pub status: UserStatus,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        credentials: Arc<CredentialHandler>,
        validator: Arc<PasswordValidator>,
        audit: Arc<AuditRecorder>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            user_repo,
            credentials,
            validator,
            audit,
            rbac,
        }
    }

    /// Lists all users.
    pub async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        self.rbac.require(&ctx.principal, Capability::Admin)?;
        self.user_repo.find_all().await
    }

    /// Gets a single user by ID.
    pub async fn get_user(&self, ctx: &RequestContext, user_id: &UserId) -> AppResult<User> {
        self.rbac.require(&ctx.principal, Capability::Admin)?;
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{user_id}' not found")))
    }

    /// Creates a new user.
    pub async fn create_user(&self, ctx: &RequestContext, req: CreateUserRequest) -> AppResult<User> {
        self.rbac.require(&ctx.principal, Capability::Admin)?;

        let username = req.username.trim();
        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        self.validator.validate(&req.password)?;

        self.user_repo.ensure_username_available(username).await?;

        let data = CreateUser {
            id: UserId::generate(),
            username: username.to_string(),
            password: self.credentials.to_stored(&req.password)?,
            name: req.name.trim().to_string(),
            role: req.role,
            status: req.status,
        };
        let user = self.user_repo.create(&data).await?;

        self.audit
            .record(ctx, AuditAction::TambahUser, format!("User {} ditambahkan", user.display_name()))
            .await;

        info!(
            admin = %ctx.principal.username,
            new_user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "User created by admin"
        );

        Ok(user)
    }

    /// Updates a user's name, role or status.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: &UserId,
        req: UpdateUser,
    ) -> AppResult<User> {
        self.get_user(ctx, user_id).await?;

        if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Name must not be empty"));
        }

        let user = self.user_repo.update(user_id, &req).await?;

        self.audit
            .record(ctx, AuditAction::EditUser, format!("User {} diupdate", user.display_name()))
            .await;

        info!(admin = %ctx.principal.username, target_id = %user_id, "User updated by admin");

        Ok(user)
    }

    /// Replaces a user's password. Policy violations fail before any I/O.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        user_id: &UserId,
        password: &str,
        confirmation: &str,
    ) -> AppResult<()> {
        self.rbac.require(&ctx.principal, Capability::Admin)?;
        self.validator.validate_with_confirmation(password, confirmation)?;

        let user = self.get_user(ctx, user_id).await?;
        let stored = self.credentials.to_stored(password)?;
        self.user_repo.update_password(user_id, &stored).await?;

        self.audit
            .record(
                ctx,
                AuditAction::GantiPassword,
                format!("Password {} diubah", user.display_name()),
            )
            .await;

        info!(admin = %ctx.principal.username, target_id = %user_id, "Password changed by admin");

        Ok(())
    }

    /// Deletes a user. Admins cannot delete themselves.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: &UserId) -> AppResult<()> {
        self.rbac.require(&ctx.principal, Capability::Admin)?;

        if *user_id == ctx.principal.id {
            return Err(AppError::validation("Cannot delete your own account"));
        }

        let user = self.get_user(ctx, user_id).await?;
        self.user_repo.delete(user_id).await?;

        self.audit
            .record(ctx, AuditAction::HapusUser, format!("User {} dihapus", user.display_name()))
            .await;

        info!(admin = %ctx.principal.username, target_id = %user_id, "User deleted");

        Ok(())
    }
}
