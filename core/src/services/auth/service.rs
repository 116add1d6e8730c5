//! Main authentication service implementation

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::user::normalize_email;
use crate::domain::value_objects::{AuthResult, ClientContext, SessionInfo};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{RefreshTokenRepository, UserStore};
use crate::services::events::{AuthEvent, AuthEventPublisher, NoOpEventPublisher};
use crate::services::token::JwtService;

use super::commands::{ChangePasswordCommand, RegisterCommand};
use super::config::{
    AuthServiceConfig, REVOKE_REASON_LOGOUT, REVOKE_REASON_LOGOUT_ALL,
    REVOKE_REASON_PASSWORD_CHANGED,
};

/// Authentication service driving register, login, refresh, logout and
/// password change
pub struct AuthService<U, R, P = NoOpEventPublisher>
where
    U: UserStore,
    R: RefreshTokenRepository,
    P: AuthEventPublisher + 'static,
{
    /// Identity store
    user_store: Arc<U>,
    /// Token issuance and refresh token lifecycle
    jwt_service: Arc<JwtService<R>>,
    /// Optional sink for auth events
    events: Option<Arc<P>>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, R> AuthService<U, R, NoOpEventPublisher>
where
    U: UserStore,
    R: RefreshTokenRepository,
{
    /// Create a new authentication service without event publishing
    pub fn new(user_store: Arc<U>, jwt_service: Arc<JwtService<R>>, config: AuthServiceConfig) -> Self {
        Self {
            user_store,
            jwt_service,
            events: None,
            config,
        }
    }
}

impl<U, R, P> AuthService<U, R, P>
where
    U: UserStore,
    R: RefreshTokenRepository,
    P: AuthEventPublisher + 'static,
{
    /// Create a new authentication service that publishes auth events
    pub fn with_events(
        user_store: Arc<U>,
        jwt_service: Arc<JwtService<R>>,
        events: Arc<P>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_store,
            jwt_service,
            events: Some(events),
            config,
        }
    }

    /// Register a new account and open its first session
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::ValidationErr)` - Malformed email, password outside
    ///   6..=100 characters or name outside 1..=100 characters
    /// * `Err(AuthError::DuplicateEmail)` - Email already registered
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        client: &ClientContext,
    ) -> DomainResult<AuthResult> {
        if !self.config.allow_registration {
            return Err(DomainError::Validation {
                message: "Registration is currently disabled".to_string(),
            });
        }

        let command = RegisterCommand::new(email, password, full_name);
        command.validate()?;

        if self.user_store.exists_by_email(&command.email).await? {
            debug!("Registration rejected for an existing email");
            return Err(AuthError::DuplicateEmail.into());
        }

        let user = self
            .user_store
            .create(
                &command.email,
                &command.password,
                &command.full_name,
                &[self.config.default_role],
            )
            .await?;

        let pair = self.jwt_service.issue_token_pair(&user, client).await?;
        info!(user_id = %user.id, "User registered");

        self.publish(AuthEvent::UserRegistered {
            user_id: user.id,
            email: user.email.clone(),
            at: user.created_at,
        });

        Ok(AuthResult::from_token_pair(pair, &user))
    }

    /// Verify credentials and open a new, independent session
    ///
    /// Unknown emails and wrong passwords fail identically with
    /// `InvalidCredentials`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: &ClientContext,
    ) -> DomainResult<AuthResult> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials.into());
        }

        let Some(mut user) = self.user_store.verify_credentials(&email, password).await? else {
            debug!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !user.is_active {
            warn!(user_id = %user.id, "Login attempt on a disabled account");
            return Err(AuthError::AccountDisabled.into());
        }

        let now = Utc::now();
        self.user_store.record_login(user.id, now).await?;
        user.update_last_login(now);

        let pair = self.jwt_service.issue_token_pair(&user, client).await?;
        info!(user_id = %user.id, "User logged in");

        self.publish(AuthEvent::UserLoggedIn {
            user_id: user.id,
            at: now,
        });

        Ok(AuthResult::from_token_pair(pair, &user))
    }

    /// Exchange an (expired) access token and its paired refresh secret for a
    /// new pair
    ///
    /// The old refresh token is consumed whether or not the new pair reaches
    /// the client.
    ///
    /// # Returns
    ///
    /// * `Err(TokenError::InvalidToken)` - Access token fails signature,
    ///   issuer, audience or algorithm checks
    /// * `Err(TokenError::InvalidRefreshToken)` - Refresh secret unknown,
    ///   unpaired, inactive, or redeemed concurrently by another caller
    /// * `Err(AuthError::UserNotFoundOrDisabled)` - Owner is gone or inactive
    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_secret: &str,
        client: &ClientContext,
    ) -> DomainResult<AuthResult> {
        let claims = self.jwt_service.validate_expired_access_token(access_token)?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;

        if !self
            .jwt_service
            .validate_refresh_token(refresh_secret, &claims.jti)
            .await?
        {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let user = self
            .user_store
            .find_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(DomainError::Auth(AuthError::UserNotFoundOrDisabled))?;

        if !self.jwt_service.mark_used(refresh_secret).await? {
            warn!(%user_id, "Refresh token redeemed concurrently by another request");
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let pair = self.jwt_service.issue_token_pair(&user, client).await?;
        info!(%user_id, "Token pair rotated");

        self.publish(AuthEvent::TokenRefreshed {
            user_id,
            at: Utc::now(),
        });

        Ok(AuthResult::from_token_pair(pair, &user))
    }

    /// Change the password and end every session of the user
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let command = ChangePasswordCommand::new(current_password, new_password);
        command.validate()?;

        let changed = self
            .user_store
            .change_password(user_id, &command.current_password, &command.new_password)
            .await?;
        if !changed {
            debug!(%user_id, "Password change rejected by user store");
            return Err(AuthError::PasswordChangeRejected.into());
        }

        self.jwt_service
            .revoke_all_for_user(user_id, REVOKE_REASON_PASSWORD_CHANGED)
            .await?;

        self.publish(AuthEvent::PasswordChanged {
            user_id,
            at: Utc::now(),
        });

        Ok(())
    }

    /// End one session
    ///
    /// A secret that is unknown or belongs to another user is ignored.
    pub async fn logout(&self, user_id: Uuid, refresh_secret: &str) -> DomainResult<()> {
        let owned = self
            .jwt_service
            .find_refresh_token(refresh_secret)
            .await?
            .is_some_and(|token| token.user_id == user_id);

        if !owned {
            debug!(%user_id, "Logout ignored for a token the user does not own");
            return Ok(());
        }

        if self
            .jwt_service
            .revoke_refresh_token(refresh_secret, REVOKE_REASON_LOGOUT)
            .await?
        {
            info!(%user_id, "User logged out");
            self.publish(AuthEvent::LoggedOut {
                user_id,
                at: Utc::now(),
            });
        }

        Ok(())
    }

    /// End every session of the user
    ///
    /// # Returns
    ///
    /// The number of sessions revoked
    pub async fn logout_all_devices(&self, user_id: Uuid) -> DomainResult<usize> {
        let revoked = self
            .jwt_service
            .revoke_all_for_user(user_id, REVOKE_REASON_LOGOUT_ALL)
            .await?;

        self.publish(AuthEvent::AllSessionsRevoked {
            user_id,
            revoked,
            at: Utc::now(),
        });

        Ok(revoked)
    }

    /// Active sessions of the user, newest first
    pub async fn active_sessions(&self, user_id: Uuid) -> DomainResult<Vec<SessionInfo>> {
        self.jwt_service.active_sessions(user_id).await
    }

    /// Number of active sessions of the user
    pub async fn count_active_sessions(&self, user_id: Uuid) -> DomainResult<usize> {
        self.jwt_service.count_active(user_id).await
    }

    /// Hand the event to the publisher on its own task
    ///
    /// The flow never waits on the hub; a failed publish is only logged.
    fn publish(&self, event: AuthEvent) {
        let Some(events) = &self.events else {
            return;
        };

        let events = Arc::clone(events);
        tokio::spawn(async move {
            let name = event.name();
            if let Err(e) = events.publish(event).await {
                warn!(event = name, error = %e, "Failed to publish auth event");
            }
        });
    }
}
