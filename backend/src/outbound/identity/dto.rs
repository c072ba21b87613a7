//! DTOs for decoding identity provider responses.

use serde::Deserialize;

use crate::domain::{Email, UserId, VerifiedIdentity};

/// Body of a successful `GET /v1/sessions/verify`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VerifiedSessionDto {
    pub(super) user_id: String,
    pub(super) email: String,
}

impl VerifiedSessionDto {
    pub(super) fn into_identity(self) -> Result<VerifiedIdentity, String> {
        let user_id = UserId::new(self.user_id).map_err(|err| format!("userId: {err}"))?;
        let email = Email::new(self.email).map_err(|err| format!("email: {err}"))?;
        Ok(VerifiedIdentity::new(user_id, email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decodes_camel_case_identity() {
        let dto: VerifiedSessionDto =
            serde_json::from_str(r#"{"userId":"user_2abc","email":"nimal@example.com","extra":1}"#)
                .expect("valid body");
        let identity = dto.into_identity().expect("valid identity");
        assert_eq!(identity.user_id.as_ref(), "user_2abc");
        assert_eq!(identity.email.as_ref(), "nimal@example.com");
    }

    #[rstest]
    #[case(r#"{"userId":"","email":"nimal@example.com"}"#, "userId")]
    #[case(r#"{"userId":"user_2abc","email":"nimal"}"#, "email")]
    fn invalid_fields_name_the_culprit(#[case] body: &str, #[case] field: &str) {
        let dto: VerifiedSessionDto = serde_json::from_str(body).expect("shape is valid");
        let err = dto.into_identity().expect_err("identity rejected");
        assert!(err.starts_with(field), "{err}");
    }
}
