use hmac::{Hmac, Mac};
use lambda_http::http::Method;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::WebhookError;
use crate::types::SlackCommand;

type HmacSha256 = Hmac<Sha256>;

const MAX_SIGNATURE_AGE_SECS: u64 = 60 * 5;

pub fn verify_method(method: &Method) -> Result<(), WebhookError> {
    if *method != Method::POST {
        return Err(WebhookError::MethodNotAllowed);
    }
    Ok(())
}

/// Slack's legacy verification token. An absent payload is rejected too.
pub fn verify_token(
    payload: Option<SlackCommand>,
    expected: &str,
) -> Result<SlackCommand, WebhookError> {
    match payload {
        Some(command) if !command.token.is_empty() && command.token == expected => Ok(command),
        _ => Err(WebhookError::Unauthorized),
    }
}

pub fn verify_slack_signature(
    signing_secret: &str,
    body: &str,
    timestamp: &str,
    signature: &str,
) -> Result<(), WebhookError> {
    let current_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| WebhookError::Unauthorized)?
        .as_secs();

    let request_timestamp: u64 = timestamp
        .parse()
        .map_err(|_| WebhookError::Unauthorized)?;

    if current_time.abs_diff(request_timestamp) > MAX_SIGNATURE_AGE_SECS {
        return Err(WebhookError::Unauthorized);
    }

    let expected = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or(WebhookError::Unauthorized)?;

    let base_string = format!("v0:{}:{}", timestamp, body);

    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|_| WebhookError::Unauthorized)?;
    mac.update(base_string.as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| WebhookError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, timestamp: &str, body: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("v0:{}:{}", timestamp, body).as_bytes());
        format!("v0={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn now() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            .to_string()
    }

    fn command(token: &str) -> SlackCommand {
        SlackCommand {
            token: token.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn only_post_is_accepted() {
        assert!(verify_method(&Method::POST).is_ok());
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            assert!(matches!(
                verify_method(&method),
                Err(WebhookError::MethodNotAllowed)
            ));
        }
    }

    #[test]
    fn token_must_match() {
        let accepted = verify_token(Some(command("secret")), "secret").unwrap();
        assert_eq!(accepted.token, "secret");
        assert!(matches!(
            verify_token(Some(command("nope")), "secret"),
            Err(WebhookError::Unauthorized)
        ));
        assert!(matches!(
            verify_token(None, "secret"),
            Err(WebhookError::Unauthorized)
        ));
    }

    #[test]
    fn empty_token_never_matches() {
        assert!(verify_token(Some(command("")), "").is_err());
    }

    #[test]
    fn valid_signature_passes() {
        let ts = now();
        let body = "token=abc&text=%3C%40U1%7Cada%3E";
        let signature = sign("shh", &ts, body);

        assert!(verify_slack_signature("shh", body, &ts, &signature).is_ok());
    }

    #[test]
    fn tampered_body_fails() {
        let ts = now();
        let signature = sign("shh", &ts, "text=a");

        assert!(verify_slack_signature("shh", "text=b", &ts, &signature).is_err());
    }

    #[test]
    fn stale_timestamp_fails() {
        let ts = "1500000000";
        let signature = sign("shh", ts, "text=a");

        assert!(verify_slack_signature("shh", "text=a", ts, &signature).is_err());
    }

    #[test]
    fn garbage_headers_fail() {
        assert!(verify_slack_signature("shh", "text=a", "", "").is_err());
        assert!(verify_slack_signature("shh", "text=a", &now(), "v0=zz").is_err());
    }
}
