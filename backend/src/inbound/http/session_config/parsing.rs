//! Toggle parsing helpers for session configuration.

use actix_web::cookie::SameSite;
use tracing::warn;

use super::{BuildMode, SAMESITE_SETTING, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// A boolean setting and the value debug builds fall back to.
pub(super) struct BoolToggle {
    name: &'static str,
    default_value: bool,
}

impl BoolToggle {
    pub(super) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }
}

pub(super) fn parse_bool_toggle(
    value: Option<&str>,
    mode: BuildMode,
    toggle: BoolToggle,
) -> Result<bool, SessionConfigError> {
    let default_label = if toggle.default_value {
        "enabled"
    } else {
        "disabled"
    };
    match value {
        Some(raw) => match parse_bool(raw) {
            Some(flag) => Ok(flag),
            None => debug_warn_or_error(
                mode,
                toggle.default_value,
                SessionConfigError::Invalid {
                    name: toggle.name,
                    value: raw.to_owned(),
                    expected: BOOL_EXPECTED,
                },
                || {
                    warn!(
                        value = %raw,
                        "invalid {}; defaulting to {}",
                        toggle.name,
                        default_label
                    );
                },
            ),
        },
        None => debug_warn_or_error(
            mode,
            toggle.default_value,
            SessionConfigError::Missing { name: toggle.name },
            || warn!("{} not set; defaulting to {}", toggle.name, default_label),
        ),
    }
}

/// Debug builds warn and fall back; release builds fail.
pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site_value(
    value: &str,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !cookie_secure {
                debug_warn_or_error(mode, (), SessionConfigError::InsecureSameSiteNone, || {
                    warn!("SameSite=None without Secure; browsers may reject the cookie");
                })?;
            }
            Ok(SameSite::None)
        }
        _ => debug_warn_or_error(
            mode,
            default_same_site,
            SessionConfigError::Invalid {
                name: SAMESITE_SETTING,
                value: value.to_owned(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %value, "invalid {SAMESITE_SETTING}, using default"),
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
