// src/middleware/session.rs
// DOCUMENTATION: Cookie-backed server-side sessions and flash messages
// PURPOSE: Load the session before routing, persist changes after the handler

use actix_web::body::MessageBody;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::cell::RefCell;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{FlashKind, FlashMessage, SessionRecord, User, UserSummary};
use crate::services::{new_token, session_key, SESSION_COOKIE};
use crate::state::AppState;

/// Per-request session state
/// The store record is created lazily, the first time something needs saving.
#[derive(Default)]
pub struct SessionState {
    /// Cookie token matching `record`
    token: Option<String>,
    record: Option<SessionRecord>,
    user: Option<User>,
    /// Flash loaded with the session; shown by this request only
    shown_flash: Vec<FlashMessage>,
    /// Store id replaced by a rotation, deleted on persist
    stale_id: Option<String>,
    dirty: bool,
    send_cookie: bool,
}

/// Store writes collected after the handler ran
struct PendingWrite {
    save: Option<SessionRecord>,
    destroy: Option<String>,
    cookie_token: Option<String>,
}

/// Values every rendered view receives
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewLocals {
    pub current_user: Option<UserSummary>,
    pub success: Vec<String>,
    pub error: Vec<String>,
}

impl SessionState {
    /// Resolve the cookie token to a live session, consuming its flash
    async fn load(state: &AppState, token: Option<String>) -> Result<Self, AppError> {
        let mut session = SessionState::default();
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(session),
        };

        let id = session_key(&state.config.session_secret, &token);
        let mut record = match state.sessions.load(&id).await? {
            Some(record) => record,
            None => return Ok(session),
        };

        if !record.flash.is_empty() {
            session.shown_flash = std::mem::take(&mut record.flash);
            session.dirty = true;
        }

        if let Some(user_id) = record.user_id {
            session.user = state.users.find_by_id(user_id).await?;
            if session.user.is_none() {
                log::warn!("Session references missing user {}, signing out", user_id);
                record.user_id = None;
                session.dirty = true;
            }
        }

        let now = Utc::now();
        if now - record.updated_at >= Duration::seconds(state.config.session_touch_after_secs) {
            session.dirty = true;
            session.send_cookie = true;
        }

        session.token = Some(token);
        session.record = Some(record);
        Ok(session)
    }

    fn record_mut(&mut self, secret: &str, ttl: i64) -> &mut SessionRecord {
        self.dirty = true;
        let token = &mut self.token;
        let send_cookie = &mut self.send_cookie;
        self.record.get_or_insert_with(|| {
            let fresh = new_token();
            let now = Utc::now();
            let record = SessionRecord {
                id: session_key(secret, &fresh),
                user_id: None,
                flash: Vec::new(),
                return_to: None,
                expires_at: now + Duration::seconds(ttl),
                updated_at: now,
            };
            *token = Some(fresh);
            *send_cookie = true;
            record
        })
    }

    /// New token for the same record; the old store entry is dropped
    fn rotate(&mut self, secret: &str) {
        if let Some(record) = self.record.as_mut() {
            let token = new_token();
            let previous = std::mem::replace(&mut record.id, session_key(secret, &token));
            if self.stale_id.is_none() {
                self.stale_id = Some(previous);
            }
            self.token = Some(token);
            self.send_cookie = true;
            self.dirty = true;
        }
    }

    fn pending(&mut self, ttl: i64) -> PendingWrite {
        let save = if self.dirty {
            self.record.as_mut().map(|record| {
                let now = Utc::now();
                record.updated_at = now;
                record.expires_at = now + Duration::seconds(ttl);
                record.clone()
            })
        } else {
            None
        };

        PendingWrite {
            save,
            destroy: self.stale_id.take(),
            cookie_token: if self.send_cookie { self.token.clone() } else { None },
        }
    }
}

/// Handle to the current request's session, extracted in handlers
#[derive(Clone)]
pub struct RequestContext {
    session: Rc<RefCell<SessionState>>,
    secret: Rc<str>,
    ttl: i64,
}

impl RequestContext {
    pub fn current_user(&self) -> Option<User> {
        self.session.borrow().user.clone()
    }

    pub fn flash_success(&self, message: impl Into<String>) {
        self.push_flash(FlashMessage::success(message));
    }

    pub fn flash_error(&self, message: impl Into<String>) {
        self.push_flash(FlashMessage::error(message));
    }

    fn push_flash(&self, message: FlashMessage) {
        let mut session = self.session.borrow_mut();
        session.record_mut(&self.secret, self.ttl).flash.push(message);
    }

    /// Remember where to go after login
    pub fn set_return_to(&self, path: impl Into<String>) {
        let mut session = self.session.borrow_mut();
        session.record_mut(&self.secret, self.ttl).return_to = Some(path.into());
    }

    pub fn take_return_to(&self) -> Option<String> {
        let mut session = self.session.borrow_mut();
        let target = session.record.as_mut().and_then(|record| record.return_to.take());
        if target.is_some() {
            session.dirty = true;
        }
        target
    }

    /// Bind the session to `user` under a fresh token
    pub fn log_in(&self, user: User) {
        let mut session = self.session.borrow_mut();
        session.record_mut(&self.secret, self.ttl).user_id = Some(user.id);
        session.rotate(&self.secret);
        session.user = Some(user);
    }

    /// Drop the identity and rotate the token; flash and return_to survive
    pub fn log_out(&self) {
        let mut session = self.session.borrow_mut();
        session.user = None;
        if let Some(record) = session.record.as_mut() {
            record.user_id = None;
        }
        session.rotate(&self.secret);
    }

    pub fn locals(&self) -> ViewLocals {
        let session = self.session.borrow();
        let messages = |kind: FlashKind| -> Vec<String> {
            session
                .shown_flash
                .iter()
                .filter(|flash| flash.kind == kind)
                .map(|flash| flash.message.clone())
                .collect()
        };

        ViewLocals {
            current_user: session.user.as_ref().map(UserSummary::from),
            success: messages(FlashKind::Success),
            error: messages(FlashKind::Error),
        }
    }
}

impl FromRequest for RequestContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<RequestContext>()
                .cloned()
                .ok_or_else(|| AppError::Unhandled("Session middleware is not installed".to_string())),
        )
    }
}

fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.is_production())
        .max_age(CookieDuration::seconds(config.session_ttl_secs))
        .finish()
}

/// Session middleware
/// DOCUMENTATION: Runs after method override and before routing. Persistence
/// happens even when the handler answered with an error response
pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::Unhandled("Application state is not registered".to_string()))?;

    let token = req.cookie(SESSION_COOKIE).map(|cookie| cookie.value().to_string());
    let session = Rc::new(RefCell::new(SessionState::load(&state, token).await?));

    req.extensions_mut().insert(RequestContext {
        session: session.clone(),
        secret: Rc::from(state.config.session_secret.as_str()),
        ttl: state.config.session_ttl_secs,
    });

    let mut res = next.call(req).await?;

    let pending = session.borrow_mut().pending(state.config.session_ttl_secs);
    if let Some(stale) = pending.destroy {
        state.sessions.destroy(&stale).await?;
    }
    if let Some(record) = pending.save {
        state.sessions.save(&record).await?;
    }
    if let Some(token) = pending.cookie_token {
        res.response_mut()
            .add_cookie(&session_cookie(token, &state.config))?;
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn context() -> RequestContext {
        RequestContext {
            session: Rc::new(RefCell::new(SessionState::default())),
            secret: Rc::from("secret"),
            ttl: 60,
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "falcon".into(),
            email: "falcon@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn untouched_session_writes_nothing() {
        let ctx = context();
        assert!(ctx.current_user().is_none());
        let pending = ctx.session.borrow_mut().pending(60);
        assert!(pending.save.is_none());
        assert!(pending.destroy.is_none());
        assert!(pending.cookie_token.is_none());
    }

    #[test]
    fn first_flash_creates_the_session_lazily() {
        let ctx = context();
        ctx.flash_success("Saved");
        let pending = ctx.session.borrow_mut().pending(60);

        let record = pending.save.unwrap();
        let token = pending.cookie_token.unwrap();
        assert_eq!(record.id, session_key("secret", &token));
        assert_eq!(record.flash, vec![FlashMessage::success("Saved")]);
        assert!(record.expires_at > Utc::now());
    }

    #[test]
    fn login_rotates_and_keeps_pending_flash() {
        let ctx = context();
        ctx.flash_error("You must be signed in first!");
        let original = ctx.session.borrow().record.as_ref().unwrap().id.clone();

        ctx.log_in(user());
        let pending = ctx.session.borrow_mut().pending(60);
        let record = pending.save.unwrap();

        assert_eq!(pending.destroy, Some(original.clone()));
        assert_ne!(record.id, original);
        assert!(record.user_id.is_some());
        assert_eq!(record.flash.len(), 1);
        assert_eq!(ctx.locals().current_user.unwrap().username, "falcon");
    }

    #[test]
    fn logout_clears_identity() {
        let ctx = context();
        ctx.log_in(user());
        ctx.log_out();
        assert!(ctx.current_user().is_none());
        let record = ctx.session.borrow_mut().pending(60).save.unwrap();
        assert!(record.user_id.is_none());
    }

    #[test]
    fn return_to_is_taken_once() {
        let ctx = context();
        assert!(ctx.take_return_to().is_none());
        ctx.set_return_to("/campgrounds/new");
        assert_eq!(ctx.take_return_to().as_deref(), Some("/campgrounds/new"));
        assert!(ctx.take_return_to().is_none());
    }
}
