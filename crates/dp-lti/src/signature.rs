//! OAuth 1.0 HMAC-SHA1 signatures over launch parameters (RFC 5849 §3.4).

use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;

use crate::{LtiError, LtiResult};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay literal; everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

fn oauth_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Build the signature base string: method, base URL, and the normalized
/// parameter list (all parameters except `oauth_signature`, encoded, sorted,
/// and `&`-joined).
fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .filter(|(k, _)| k != "oauth_signature")
        .map(|(k, v)| (oauth_encode(k), oauth_encode(v)))
        .collect();
    pairs.sort();

    let normalized =
        pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        oauth_encode(url),
        oauth_encode(&normalized)
    )
}

/// Compute the base64 HMAC-SHA1 signature for a request. The token secret is
/// empty for LTI launches, leaving the trailing `&` in the key.
pub fn sign(method: &str, url: &str, params: &[(String, String)], consumer_secret: &str) -> String {
    let base = signature_base_string(method, url, params);
    let key = format!("{}&", oauth_encode(consumer_secret));

    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(base.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify the `oauth_signature` carried in a launch request against the
/// shared consumer secret.
pub fn verify_signature(
    method: &str,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
) -> LtiResult<()> {
    let submitted = params
        .iter()
        .find(|(k, _)| k == "oauth_signature")
        .map(|(_, v)| v.as_str())
        .ok_or(LtiError::MissingSignature)?;

    if let Some((_, sig_method)) = params.iter().find(|(k, _)| k == "oauth_signature_method") {
        if sig_method != "HMAC-SHA1" {
            return Err(LtiError::UnsupportedSignatureMethod(sig_method.clone()));
        }
    }

    let expected = sign(method, url, params, consumer_secret);
    if expected.as_bytes() == submitted.as_bytes() {
        Ok(())
    } else {
        Err(LtiError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch_params(secret: &str) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = [
            ("oauth_consumer_key", "test"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1700000000"),
            ("oauth_nonce", "a1b2c3"),
            ("oauth_version", "1.0"),
            ("custom_canvas_course_id", "5"),
            ("custom_canvas_user_id", "1"),
            ("lis_person_sourcedid", "u1abc123"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let signature = sign("POST", "https://tool.example.com/start", &params, secret);
        params.push(("oauth_signature".to_string(), signature));
        params
    }

    #[test]
    fn correctly_signed_request_verifies() {
        let params = launch_params("secret");
        assert!(verify_signature("POST", "https://tool.example.com/start", &params, "secret")
            .is_ok());
    }

    #[test]
    fn tampered_parameter_fails_verification() {
        let mut params = launch_params("secret");
        for (k, v) in &mut params {
            if k == "custom_canvas_user_id" {
                *v = "9999".to_string();
            }
        }
        assert!(matches!(
            verify_signature("POST", "https://tool.example.com/start", &params, "secret"),
            Err(LtiError::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_consumer_secret_fails_verification() {
        let params = launch_params("secret");
        assert!(matches!(
            verify_signature("POST", "https://tool.example.com/start", &params, "other"),
            Err(LtiError::InvalidSignature)
        ));
    }

    #[test]
    fn unsupported_signature_method_is_rejected() {
        let mut params = launch_params("secret");
        for (k, v) in &mut params {
            if k == "oauth_signature_method" {
                *v = "PLAINTEXT".to_string();
            }
        }
        assert!(matches!(
            verify_signature("POST", "https://tool.example.com/start", &params, "secret"),
            Err(LtiError::UnsupportedSignatureMethod(_))
        ));
    }

    #[test]
    fn unsigned_request_is_rejected() {
        let params = vec![("roles".to_string(), "Learner".to_string())];
        assert!(matches!(
            verify_signature("POST", "https://tool.example.com/start", &params, "secret"),
            Err(LtiError::MissingSignature)
        ));
    }

    #[test]
    fn base_string_sorts_encoded_parameters() {
        let params = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ];
        let base = signature_base_string("post", "https://tool.example.com/start", &params);
        assert_eq!(
            base,
            "POST&https%3A%2F%2Ftool.example.com%2Fstart&a%3D1%26b%3D2"
        );
    }
}
