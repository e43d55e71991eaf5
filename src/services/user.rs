use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Map;
use uuid::Uuid;

use crate::api::{ChangePasswordRequest, CreateUserRequest, LoginRequest, ResetPasswordRequest, UpdateUserRequest};
use crate::auth::{hash_password, verify_password, Claims, JwtKeys};
use crate::database::models::{LoginStatus, NewLoginActivity, NewUser, User, UserChanges};
use crate::repository::UserRepository;
use crate::types::{Actor, ListParams, Page};

use super::audit::AuditService;
use super::error::{ServiceError, ServiceResult};

pub const LOGIN_SUCCESS: &str = "LOGIN_SUCCESS";
pub const LOGIN_USER_NOT_FOUND: &str = "LOGIN_USER_NOT_FOUND";
pub const LOGIN_WRONG_PASSWORD: &str = "LOGIN_WRONG_PASSWORD";
pub const LOGIN_TOKEN_FAILED: &str = "LOGIN_TOKEN_FAILED";

const MODUL: &str = "user";

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

/// Where a login attempt came from
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    audit: AuditService,
    keys: Arc<JwtKeys>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, audit: AuditService, keys: Arc<JwtKeys>, bcrypt_cost: u32) -> Self {
        Self { users, audit, keys, bcrypt_cost }
    }

    /// Authenticate and issue a token; every call writes exactly one `login_activity` row.
    pub async fn login(&self, req: LoginRequest, client: ClientInfo) -> ServiceResult<LoginResult> {
        let username = req.username.trim().to_string();
        let attempt = |id_user: Option<Uuid>, status: LoginStatus, message_code: &'static str| NewLoginActivity {
            id_user,
            username: username.clone(),
            status,
            message_code,
            ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        };

        let Some(user) = self.users.find_active_by_username(&username).await? else {
            self.audit.login_attempt(attempt(None, LoginStatus::Failed, LOGIN_USER_NOT_FOUND)).await?;
            return Err(ServiceError::not_found("User tidak ditemukan"));
        };

        if !verify_password(&req.password, &user.password) {
            self.audit.login_attempt(attempt(Some(user.id), LoginStatus::Failed, LOGIN_WRONG_PASSWORD)).await?;
            return Err(ServiceError::PasswordMismatch);
        }

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            id_role: user.id_role,
            id_bidang: user.id_bidang,
            id_cabang: user.id_cabang,
            id_pegawai: user.id_pegawai,
            iat: 0,
            exp: 0,
        };
        let token = match self.keys.issue(claims) {
            Ok((token, _)) => token,
            Err(e) => {
                tracing::error!(username = %username, "Token generation failed: {}", e);
                self.audit.login_attempt(attempt(Some(user.id), LoginStatus::Failed, LOGIN_TOKEN_FAILED)).await?;
                return Err(e.into());
            }
        };

        self.audit.login_attempt(attempt(Some(user.id), LoginStatus::Success, LOGIN_SUCCESS)).await?;
        Ok(LoginResult { token, token_type: "Bearer", expires_in: self.keys.expires_in_seconds(), user })
    }

    pub async fn list(&self, params: &ListParams) -> ServiceResult<Page<User>> {
        let filter = params.to_filter_data(User::SEARCH_COLUMNS, Map::new(), "nama asc")?;
        Ok(self.users.list(filter).await?)
    }

    /// Soft-deleted users stay readable here for audit purposes
    pub async fn get(&self, id: Uuid) -> ServiceResult<User> {
        self.users.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("User tidak ditemukan"))
    }

    pub async fn profile(&self, actor: &Actor) -> ServiceResult<User> {
        self.live_user(actor.id_user).await
    }

    pub async fn create(&self, req: CreateUserRequest, actor: &Actor) -> ServiceResult<User> {
        let username = req.username.trim().to_string();
        if self.users.username_taken(&username, None).await? {
            return Err(ServiceError::conflict("Username sudah digunakan"));
        }

        let password_hash = hash_password(&req.password, self.bcrypt_cost)?;
        let user = self
            .users
            .create(
                NewUser {
                    id_pegawai: req.id_pegawai,
                    id_role: req.id_role,
                    id_bidang: req.id_bidang,
                    id_cabang: req.id_cabang,
                    username,
                    password_hash,
                    nama: req.nama,
                    email: req.email,
                    active: req.active,
                },
                actor.id_user,
            )
            .await?;

        self.audit.record(actor, MODUL, "create", format!("Tambah user {}", user.username)).await;
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, req: UpdateUserRequest, actor: &Actor) -> ServiceResult<User> {
        self.live_user(id).await?;

        let username = req.username.trim().to_string();
        if self.users.username_taken(&username, Some(id)).await? {
            return Err(ServiceError::conflict("Username sudah digunakan"));
        }

        let changes = UserChanges {
            id_pegawai: req.id_pegawai,
            id_role: req.id_role,
            id_bidang: req.id_bidang,
            id_cabang: req.id_cabang,
            username,
            nama: req.nama,
            email: req.email,
            active: req.active,
        };
        let user = self
            .users
            .update(id, changes, actor.id_user)
            .await?
            .ok_or_else(|| ServiceError::not_found("User tidak ditemukan"))?;

        self.audit.record(actor, MODUL, "update", format!("Ubah user {}", user.username)).await;
        Ok(user)
    }

    /// Deactivates the account and frees its username by suffixing a unix timestamp
    pub async fn delete(&self, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        let user = self.live_user(id).await?;
        let renamed = format!("{}_{}", user.username, Utc::now().timestamp());

        if !self.users.soft_delete(id, &renamed, actor.id_user).await? {
            return Err(ServiceError::not_found("User tidak ditemukan"));
        }

        self.audit.record(actor, MODUL, "delete", format!("Hapus user {}", user.username)).await;
        Ok(())
    }

    pub async fn change_password(&self, req: ChangePasswordRequest, actor: &Actor) -> ServiceResult<()> {
        let user = self.live_user(actor.id_user).await?;

        if !verify_password(&req.old_password, &user.password) {
            return Err(ServiceError::PasswordMismatch);
        }
        if req.new_password == req.old_password {
            return Err(ServiceError::conflict("Password baru tidak boleh sama dengan password lama"));
        }

        let hash = hash_password(&req.new_password, self.bcrypt_cost)?;
        if !self.users.update_password(user.id, &hash, actor.id_user).await? {
            return Err(ServiceError::not_found("User tidak ditemukan"));
        }

        self.audit.record(actor, MODUL, "change_password", "Ganti password").await;
        Ok(())
    }

    /// Administrative reset: sets a new password without knowing the current one
    pub async fn reset_password(&self, id: Uuid, req: ResetPasswordRequest, actor: &Actor) -> ServiceResult<()> {
        let user = self.live_user(id).await?;

        let hash = hash_password(&req.new_password, self.bcrypt_cost)?;
        if !self.users.update_password(user.id, &hash, actor.id_user).await? {
            return Err(ServiceError::not_found("User tidak ditemukan"));
        }

        self.audit.record(actor, MODUL, "reset_password", format!("Reset password user {}", user.username)).await;
        Ok(())
    }

    async fn live_user(&self, id: Uuid) -> ServiceResult<User> {
        match self.users.find_by_id(id).await? {
            Some(user) if !user.is_deleted => Ok(user),
            _ => Err(ServiceError::not_found("User tidak ditemukan")),
        }
    }
}
