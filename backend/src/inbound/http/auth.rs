//! Bearer-token guard for HTTP handlers.
//!
//! [`AuthContext`] is an extractor: declaring it as a handler parameter is
//! what makes the route authenticated. Verification is a pure signature
//! check against shared state, so extraction completes synchronously.
//! Role checks chain off the extracted context, keeping the two rejection
//! classes distinct: a bad token is 401, a valid token with the wrong
//! role is 403.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::{Ready, err, ok};

use crate::domain::{Error, Identity, Role};
use crate::inbound::http::state::HttpState;

const NO_TOKEN: &str = "No token provided";
const INVALID_TOKEN: &str = "Invalid token";
const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions";

/// Verified requester identity, extracted from the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    identity: Identity,
}

impl AuthContext {
    /// The verified identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Require the requester's role to permit `required`.
    ///
    /// Admin passes every check; any other role must match exactly.
    pub fn require_role(&self, required: Role) -> Result<&Identity, Error> {
        if self.identity.role.permits(required) {
            Ok(&self.identity)
        } else {
            Err(Error::forbidden(INSUFFICIENT_PERMISSIONS))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized(NO_TOKEN))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized(INVALID_TOKEN))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized(INVALID_TOKEN))
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            return err(Error::internal("http state not configured"));
        };
        let token = match bearer_token(req) {
            Ok(token) => token,
            Err(error) => return err(error),
        };
        match state.tokens.verify(token) {
            Ok(identity) => ok(Self { identity }),
            Err(_) => err(Error::unauthorized(INVALID_TOKEN)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, UserId};
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn missing_header_is_distinct_from_a_bad_one() {
        let bare = TestRequest::default().to_http_request();
        let error = bearer_token(&bare).expect_err("no header");
        assert_eq!(error.message(), NO_TOKEN);

        let basic = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        let error = bearer_token(&basic).expect_err("wrong scheme");
        assert_eq!(error.message(), INVALID_TOKEN);
    }

    #[rstest]
    fn empty_bearer_token_is_rejected() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert!(bearer_token(&req).is_err());
    }

    #[rstest]
    fn bearer_token_is_extracted_verbatim() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).expect("token"), "abc.def.ghi");
    }

    #[rstest]
    #[case(Role::Admin, Role::Editor, true)]
    #[case(Role::Editor, Role::Editor, true)]
    #[case(Role::Viewer, Role::Editor, false)]
    #[case(Role::User, Role::Viewer, false)]
    fn role_checks_gate_on_permits(
        #[case] held: Role,
        #[case] required: Role,
        #[case] allowed: bool,
    ) {
        let context = AuthContext {
            identity: Identity::new(UserId::random(), held),
        };
        let result = context.require_role(required);
        match result {
            Ok(identity) => {
                assert!(allowed);
                assert_eq!(identity.role, held);
            }
            Err(error) => {
                assert!(!allowed);
                assert_eq!(error.code(), ErrorCode::Forbidden);
                assert_eq!(error.message(), INSUFFICIENT_PERMISSIONS);
            }
        }
    }
}
