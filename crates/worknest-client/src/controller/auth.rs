use tracing::{error, info};

use worknest_types::Role;
use worknest_types::api::{AuthResponse, LoginRequest, RegisterRequest};

use super::PageContext;
use crate::error::ClientError;
use crate::host::{LOGIN_PATH, PageHost, REGISTER_PATH, USER_PATH};
use crate::render;
use crate::session::home_path;
use crate::storage::Storage;

pub const LOGIN_ALERT: &str = "loginAlert";
pub const REGISTER_ALERT: &str = "registerAlert";

const TRANSPORT_ERROR: &str = "Network error. Please try again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login and registration pages.
pub struct AuthController<S, H> {
    ctx: PageContext<S, H>,
}

impl<S: Storage, H: PageHost> AuthController<S, H> {
    pub fn new(ctx: PageContext<S, H>) -> Self {
        Self { ctx }
    }

    pub fn ctx(&self) -> &PageContext<S, H> {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut PageContext<S, H> {
        &mut self.ctx
    }

    /// Someone already signed in who lands on `/login` or `/register` is sent
    /// to their dashboard. Returns whether a redirect happened.
    pub fn on_page_load(&mut self, path: &str) -> bool {
        if !self.ctx.session.is_authenticated() || (path != LOGIN_PATH && path != REGISTER_PATH) {
            return false;
        }

        if !self.ctx.session.has_profile() {
            return false;
        }

        let role = self.ctx.session.current_user().role;
        self.ctx.host.redirect(home_path(role));
        true
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let auth = match self.ctx.api.login(&req).await {
            Ok(auth) => auth,
            Err(e) => {
                error!("Login failed: {}", e);
                let message = self.failure_message(&e, "Login failed");
                self.ctx.document.set_html(LOGIN_ALERT, render::alert(&message, "danger"));
                return Err(e);
            }
        };

        self.ctx.session.store(&auth)?;
        info!("Logged in as {}", auth.user.email);
        self.ctx
            .document
            .set_html(LOGIN_ALERT, render::alert("Login successful! Redirecting...", "success"));
        self.ctx.host.redirect(home_path(Some(auth.user.role)));
        Ok(auth)
    }

    /// Self-registration always requests the `user` role and lands on `/user`.
    ///
    /// Mismatched passwords are rejected locally; no request is sent.
    pub async fn register(&mut self, form: &RegisterForm) -> Result<Option<AuthResponse>, ClientError> {
        if form.password != form.confirm_password {
            self.ctx
                .document
                .set_html(REGISTER_ALERT, render::alert("Passwords do not match", "danger"));
            return Ok(None);
        }

        let req = RegisterRequest {
            name: form.name.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            role: Role::User,
        };

        let auth = match self.ctx.api.register(&req).await {
            Ok(auth) => auth,
            Err(e) => {
                error!("Registration failed: {}", e);
                let message = self.failure_message(&e, "Registration failed");
                self.ctx.document.set_html(REGISTER_ALERT, render::alert(&message, "danger"));
                return Err(e);
            }
        };

        self.ctx.session.store(&auth)?;
        info!("Registered {}", auth.user.email);
        self.ctx.document.set_html(
            REGISTER_ALERT,
            render::alert("Registration successful! Redirecting...", "success"),
        );
        self.ctx.host.redirect(USER_PATH);
        Ok(Some(auth))
    }

    fn failure_message(&self, err: &ClientError, fallback: &str) -> String {
        if err.is_network() {
            TRANSPORT_ERROR.to_string()
        } else {
            err.display_message(fallback)
        }
    }
}
