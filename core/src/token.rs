//! Access-token reissue: `POST /token/reissue/{company}`.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::endpoint::{Credentials, EncodedRequest, Endpoint, Resource};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::wire_time::WireTime;

/// Reissue the access token in `credentials`. The old token stops working
/// once the call succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenReissueParams {
    pub credentials: Credentials,
}

impl TokenReissueParams {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl Endpoint for TokenReissueParams {
    type Output = ReissuedToken;

    const RESOURCE: Resource = Resource::TokenReissue;

    fn validate(&self) -> Result<(), ApiError> {
        self.credentials.validate()
    }

    fn encode(&self) -> EncodedRequest {
        EncodedRequest {
            method: HttpMethod::Post,
            path: format!("/token/reissue/{}", self.credentials.company_code),
            query: String::new(),
            body: Some(json!({ "token": self.credentials.token })),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReissuedToken {
    pub login_company_code: String,
    pub staff_id: i64,
    pub agency_manager_id: i64,
    pub token: String,
    pub expired_at: Option<WireTime>,
}

impl ReissuedToken {
    /// Credentials carrying the new token, ready for the next request.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.login_company_code.as_str(), self.token.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::decode;
    use time::macros::datetime;

    #[test]
    fn validation_order() {
        assert!(TokenReissueParams::new(Credentials::new("foo", "bar")).validate().is_ok());

        let err = TokenReissueParams::new(Credentials::new("", "bar")).validate().unwrap_err();
        assert_eq!(err.to_string(), "LoginCompanyCode must be set");

        let err = TokenReissueParams::new(Credentials::new("foo", "")).validate().unwrap_err();
        assert_eq!(err.to_string(), "Token must be set");
    }

    #[test]
    fn company_code_goes_in_the_path_only() {
        let encoded = TokenReissueParams::new(Credentials::new("foo", "bar")).encode();
        assert_eq!(encoded.method, HttpMethod::Post);
        assert_eq!(encoded.path_and_query(), "/token/reissue/foo");
        assert_eq!(encoded.body, Some(json!({"token": "bar"})));
    }

    #[test]
    fn decodes_reissued_token() {
        let body = br#"{"success":true,"response":{"login_company_code":"foo","staff_id":123,"agency_manager_id":456,"token":"new_token","expired_at":"2000/01/02 03:04:05"}}"#;
        let token: ReissuedToken = decode(body, Resource::TokenReissue).unwrap();
        assert_eq!(
            token,
            ReissuedToken {
                login_company_code: "foo".to_string(),
                staff_id: 123,
                agency_manager_id: 456,
                token: "new_token".to_string(),
                expired_at: Some(WireTime::from(datetime!(2000-01-02 03:04:05))),
            }
        );
        assert_eq!(token.credentials(), Credentials::new("foo", "new_token"));
    }

    #[test]
    fn failure_keeps_error_details() {
        let body = br#"{"success":false,"response":{},"errors":[{"code":"error","message":"error"}]}"#;
        let err = decode::<ReissuedToken>(body, Resource::TokenReissue).unwrap_err();
        assert_eq!(err.to_string(), "Requesting Token Reissue API failed");
        assert_eq!(err.details().len(), 1);
        assert_eq!(err.details()[0].code, "error");
    }
}
