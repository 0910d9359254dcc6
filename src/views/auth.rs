//! Signup, login and logout flows.

use super::{Notice, Outcome};
use crate::api::AuthApi;
use crate::error::ValidationError;
use crate::guard::Route;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::session::SessionManager;
use secrecy::{ExposeSecret, SecretString};

pub const PASSWORD_MIN_CHARS: usize = 6;

#[derive(Debug)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

impl SignupForm {
    pub fn new(username: &str, email: &str, password: SecretString) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password,
        }
    }

    pub fn validate(&self) -> Result<SignupRequest, ValidationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ValidationError::Required("Username"));
        }
        let email = validate_email(&self.email)?;
        let password = self.password.expose_secret();
        if password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        if password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(ValidationError::TooShort {
                field: "Password",
                min: PASSWORD_MIN_CHARS,
            });
        }

        Ok(SignupRequest {
            username: username.to_string(),
            email,
            password: password.to_string(),
        })
    }
}

#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn new(email: &str, password: SecretString) -> Self {
        Self {
            email: email.to_string(),
            password,
        }
    }

    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = validate_email(&self.email)?;
        let password = self.password.expose_secret();
        if password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        Ok(LoginRequest {
            email,
            password: password.to_string(),
        })
    }
}

fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(ValidationError::Required("Email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(ValidationError::InvalidEmail(email.to_string())),
    }
}

/// Turns auth responses into session transitions.
pub struct AuthController {
    session: SessionManager,
}

impl AuthController {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub async fn signup<A: AuthApi + ?Sized>(&self, api: &A, form: &SignupForm) -> Outcome {
        let request = match form.validate() {
            Ok(r) => r,
            Err(e) => return Outcome::stay(Notice::error(e.to_string())),
        };
        let result = api.signup(&request).await;
        self.finish(result, "Signup successful!", "Signup failed")
    }

    pub async fn login<A: AuthApi + ?Sized>(&self, api: &A, form: &LoginForm) -> Outcome {
        let request = match form.validate() {
            Ok(r) => r,
            Err(e) => return Outcome::stay(Notice::error(e.to_string())),
        };
        let result = api.login(&request).await;
        self.finish(result, "Login successful!", "Login failed")
    }

    /// Tell the server, then drop the local session whatever it answered.
    pub async fn logout<A: AuthApi + ?Sized>(&self, api: &A) -> Outcome {
        if self.session.token().is_some() {
            if let Err(e) = api.logout().await {
                tracing::warn!("server logout failed: {}", e);
            }
        }
        if let Err(e) = self.session.clear_session() {
            return Outcome::stay(Notice::error(format!("Failed to clear session: {:#}", e)));
        }
        Outcome::go(Notice::success("Logged out successfully"), Route::Login)
    }

    fn finish(
        &self,
        result: Result<AuthResponse, crate::error::ApiError>,
        success: &str,
        fallback: &str,
    ) -> Outcome {
        match result {
            Ok(auth) => match self.session.set_session(&auth.token, &auth.user) {
                Ok(()) => Outcome::go(Notice::success(success), Route::Home),
                Err(e) => Outcome::stay(Notice::error(format!("Failed to save session: {:#}", e))),
            },
            Err(e) => Outcome::stay(Notice::error(e.user_message(fallback))),
        }
    }
}
