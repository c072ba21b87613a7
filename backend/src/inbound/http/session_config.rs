//! Session cookie configuration and validation.
//!
//! The raw toggles come from [`AppSettings`]; this module validates them per
//! build mode. Debug builds tolerate missing or malformed values and warn,
//! release builds refuse to start with anything but an explicit, secure
//! configuration.

pub mod fingerprint;
mod parsing;

use std::path::{Path, PathBuf};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::AppSettings;

use self::parsing::{BoolToggle, debug_warn_or_error, parse_bool_toggle, parse_same_site_value};

const SESSION_KEY_MIN_LEN: usize = 64;
const SESSION_COOKIE_NAME: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;
// `Key::derive_from` panics below this length.
const KEY_DERIVE_MIN_LEN: usize = 32;
pub(crate) const COOKIE_SECURE_SETTING: &str = "BOOKLINK_SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_SETTING: &str = "BOOKLINK_SESSION_SAME_SITE";
pub(crate) const ALLOW_EPHEMERAL_SETTING: &str = "BOOKLINK_SESSION_ALLOW_EPHEMERAL";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Unvalidated session toggles as configured.
#[derive(Debug, Clone, Default)]
pub struct SessionToggles {
    pub cookie_secure: Option<String>,
    pub same_site: Option<String>,
    pub allow_ephemeral: Option<String>,
    pub key_file: PathBuf,
}

impl SessionToggles {
    /// Extract the session toggles from the loaded settings.
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            cookie_secure: settings.session_cookie_secure.clone(),
            same_site: settings.session_same_site.clone(),
            allow_ephemeral: settings.session_allow_ephemeral.clone(),
            key_file: settings.session_key_file(),
        }
    }
}

/// Validated session cookie settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Private, HTTP-only cookie session lasting two hours.
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.into())
            .cookie_path("/".into())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("BOOKLINK_SESSION_SAME_SITE=None requires BOOKLINK_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("BOOKLINK_SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Validate session toggles for the given build mode.
///
/// # Examples
///
/// ```rust
/// use backend::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
///
/// let toggles = SessionToggles {
///     key_file: std::env::temp_dir().join("booklink-missing-key"),
///     ..SessionToggles::default()
/// };
/// let settings = session_settings(&toggles, BuildMode::Debug).expect("debug tolerates defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parse_bool_toggle(
        toggles.cookie_secure.as_deref(),
        mode,
        BoolToggle::new(COOKIE_SECURE_SETTING, true),
    )?;
    let same_site = same_site(toggles.same_site.as_deref(), mode, cookie_secure)?;
    let allow_ephemeral = parse_bool_toggle(
        toggles.allow_ephemeral.as_deref(),
        mode,
        BoolToggle::new(ALLOW_EPHEMERAL_SETTING, false),
    )?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(&toggles.key_file, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    match value {
        Some(value) => parse_same_site_value(value, mode, cookie_secure, default_same_site),
        None => debug_warn_or_error(
            mode,
            default_same_site,
            SessionConfigError::Missing {
                name: SAMESITE_SETTING,
            },
            || warn!("{SAMESITE_SETTING} not set; using default"),
        ),
    }
}

fn session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            if length < KEY_DERIVE_MIN_LEN {
                bytes.zeroize();
                warn!(path = %path.display(), length, "session key too short; using temporary key");
                return Ok(Key::generate());
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SessionConfigError::KeyRead {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }
}
