// src/api/auth.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::client::ApiClient;
use super::error::{ApiError, ApiResult};
use crate::model::User;
use crate::validate::{validate_password_change, ValidationError};

/// `{success, token?, user?, message?}`: auth endpoints put fields at the top level.
#[derive(Debug, Clone, Default, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthResponse {
    fn check(self, fallback: &str) -> ApiResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    mobile: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordChange<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordChangeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Exchange credentials for a token and store it in the client's session.
pub async fn login(api: &ApiClient, mobile: &str, password: &str) -> ApiResult<User> {
    let resp: AuthResponse = api
        .post("auth/login", &Credentials { mobile, password })
        .await?;
    let resp = resp.check("Login failed")?;

    let token = resp
        .token
        .ok_or_else(|| ApiError::Rejected("login response carried no token".to_string()))?;
    let user = resp.user.unwrap_or_default();
    if let Err(e) = api.session().establish(token, Some(user.clone())) {
        warn!(error = %e, "could not persist session");
    }
    info!(user = user.display_name(), "logged in");
    Ok(user)
}

/// Drop the local session. The server keeps no logout state.
pub fn logout(api: &ApiClient) -> anyhow::Result<()> {
    api.session().clear()
}

pub async fn me(api: &ApiClient) -> ApiResult<User> {
    let resp: AuthResponse = api.get("auth/me", None).await?;
    let resp = resp.check("Could not load profile")?;
    Ok(resp.user.unwrap_or_default())
}

/// Check a restored token against `auth/me`. Any failure signs the session out.
pub async fn verify_session(api: &ApiClient) -> Option<User> {
    api.session().token()?;
    match me(api).await {
        Ok(user) => {
            if let Err(e) = api.session().update_user(user.clone()) {
                warn!(error = %e, "could not persist session");
            }
            Some(user)
        }
        Err(e) => {
            warn!(error = %e, "stored session is no longer valid");
            if let Err(e) = api.session().clear() {
                warn!(error = %e, "failed to clear session");
            }
            None
        }
    }
}

pub async fn update_profile(api: &ApiClient, updates: &Value) -> ApiResult<User> {
    let resp: AuthResponse = api.put("auth/profile", updates).await?;
    let resp = resp.check("Failed to update profile")?;
    let user = resp.user.unwrap_or_default();
    if let Err(e) = api.session().update_user(user.clone()) {
        warn!(error = %e, "could not persist session");
    }
    Ok(user)
}

/// Validates locally first; nothing is sent if the new password is rejected.
pub async fn change_password(
    api: &ApiClient,
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), PasswordChangeError> {
    validate_password_change(new, confirm)?;
    let resp: AuthResponse = api
        .put(
            "auth/password",
            &PasswordChange {
                current_password: current,
                new_password: new,
            },
        )
        .await?;
    resp.check("Failed to change password")?;
    info!("password changed");
    Ok(())
}
