//! Request authentication.
//!
//! Every request made on behalf of a [`User`] carries three headers:
//! `Access-Id`, `Access-Time`, and `Access-Signature`. The signature is the
//! base64 DER ECDSA signature of `"<access id>:<access time>:<body>"` under
//! the user's private key, with an empty body for `GET`.

use std::fmt::{self, Display, Formatter};
use std::time::{Duration, SystemTime};

use http::{HeaderMap, HeaderName, HeaderValue};
use starkbank::User;

use crate::constants::{ACCESS_ID, ACCESS_SIGNATURE, ACCESS_TIME};
use crate::error::HttpError;

/// Request time sent in `Access-Time`, with microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AccessTime(Duration);

impl AccessTime {
    /// The current system time.
    ///
    /// A clock set before the Unix epoch yields the epoch itself.
    #[must_use]
    pub fn now() -> Self {
        Self(
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default(),
        )
    }

    /// A fixed time since the Unix epoch.
    #[must_use]
    pub const fn from_duration(since_epoch: Duration) -> Self {
        Self(since_epoch)
    }
}

impl Display for AccessTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.0.as_secs(), self.0.subsec_micros())
    }
}

/// The message signed for a request: `"<access id>:<access time>:<body>"`.
#[must_use]
pub fn signing_message(access_id: &str, access_time: AccessTime, body: &str) -> String {
    format!("{access_id}:{access_time}:{body}")
}

/// Builds the `Access-*` headers authenticating a request as `user`.
///
/// # Errors
///
/// Returns [`HttpError::InvalidHeaderValue`] if the user id contains
/// characters not allowed in a header.
pub fn access_headers(
    user: &User,
    access_time: AccessTime,
    body: &str,
) -> Result<HeaderMap, HttpError> {
    let access_id = user.access_id();
    let signature = user
        .private_key()
        .sign(signing_message(&access_id, access_time, body).as_bytes());

    let mut headers = HeaderMap::with_capacity(3);
    insert(&mut headers, ACCESS_ID, &access_id)?;
    insert(&mut headers, ACCESS_TIME, &access_time.to_string())?;
    insert(&mut headers, ACCESS_SIGNATURE, &signature.to_base64())?;
    Ok(headers)
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) -> Result<(), HttpError> {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
            Ok(())
        }
        Err(source) => Err(HttpError::InvalidHeaderValue { name, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starkbank::testutil::private_key;
    use starkbank::{Environment, Signature};

    #[test]
    fn test_access_time_format() {
        let time = AccessTime::from_duration(Duration::new(1_700_000_000, 123_456_789));
        assert_eq!(time.to_string(), "1700000000.123456");

        let whole = AccessTime::from_duration(Duration::from_secs(5));
        assert_eq!(whole.to_string(), "5.000000");
    }

    #[test]
    fn test_access_headers_are_verifiable() {
        let key = private_key(9);
        let user = User::project(Environment::Sandbox, "5656565656565656", key.clone());
        let time = AccessTime::from_duration(Duration::from_secs(1_700_000_000));

        let headers = access_headers(&user, time, "").unwrap();
        assert_eq!(headers[&ACCESS_ID], "project/5656565656565656");
        assert_eq!(headers[&ACCESS_TIME], "1700000000.000000");

        let signature: Signature = headers[&ACCESS_SIGNATURE].to_str().unwrap().parse().unwrap();
        let message = "project/5656565656565656:1700000000.000000:";
        assert!(signature.verify(message.as_bytes(), &key.public_key()));
        assert!(!signature.verify(b"project/5656565656565656:1700000001.000000:", &key.public_key()));
    }

    #[test]
    fn test_body_is_part_of_the_signature() {
        let key = private_key(9);
        let user = User::organization(Environment::Production, "4242", key.clone())
            .with_workspace("77");
        let time = AccessTime::from_duration(Duration::from_secs(1));
        let body = r#"{"amount":100}"#;

        let headers = access_headers(&user, time, body).unwrap();
        let signature: Signature = headers[&ACCESS_SIGNATURE].to_str().unwrap().parse().unwrap();
        let message = signing_message("organization/4242/workspace/77", time, body);
        assert!(signature.verify(message.as_bytes(), &key.public_key()));
    }

    #[test]
    fn test_invalid_access_id_is_rejected() {
        let user = User::project(Environment::Sandbox, "bad\nid", private_key(9));
        let err = access_headers(&user, AccessTime::now(), "").unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderValue { .. }));
    }
}
