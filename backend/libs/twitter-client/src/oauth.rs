//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Every user-context call to Twitter carries an `Authorization: OAuth ...`
//! header whose signature covers the method, the base URL, the oauth_*
//! protocol parameters, query parameters and url-encoded form parameters.
//! JSON and multipart bodies are not covered.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use url::Url;

use crate::error::{TwitterError, TwitterResult};
use crate::types::Credentials;

type HmacSha1 = Hmac<Sha1>;

/// Signs requests on behalf of the application and, optionally, a user.
#[derive(Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
}

impl OAuthSigner {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Build the Authorization header value for a request.
    ///
    /// `params` holds extra protocol parameters (`oauth_callback`,
    /// `oauth_verifier`) together with form parameters; only the `oauth_*`
    /// entries end up in the header.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        token: Option<&Credentials>,
    ) -> TwitterResult<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TwitterError::OAuth(format!("Failed to get timestamp: {e}")))?
            .as_secs()
            .to_string();

        self.sign_with(method, url, params, token, &generate_nonce(), &timestamp)
    }

    /// Deterministic variant of [`OAuthSigner::sign`].
    pub fn sign_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        token: Option<&Credentials>,
        nonce: &str,
        timestamp: &str,
    ) -> TwitterResult<String> {
        let mut oauth_params: Vec<(String, String)> = vec![
            ("oauth_consumer_key".into(), self.consumer_key.clone()),
            ("oauth_nonce".into(), nonce.to_string()),
            ("oauth_signature_method".into(), "HMAC-SHA1".into()),
            ("oauth_timestamp".into(), timestamp.to_string()),
            ("oauth_version".into(), "1.0".into()),
        ];
        if let Some(token) = token {
            oauth_params.push(("oauth_token".into(), token.token.clone()));
        }
        oauth_params.extend(
            params
                .iter()
                .filter(|(k, _)| k.starts_with("oauth_"))
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        );

        let mut signed_params = oauth_params.clone();
        signed_params.extend(
            params
                .iter()
                .filter(|(k, _)| !k.starts_with("oauth_"))
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        );

        let base_string = signature_base_string(method, url, &signed_params)?;
        let signature = self.signature(&base_string, token.map(|t| t.secret.as_str()))?;
        oauth_params.push(("oauth_signature".into(), signature));
        oauth_params.sort();

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {header}"))
    }

    fn signature(&self, base_string: &str, token_secret: Option<&str>) -> TwitterResult<String> {
        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(token_secret.unwrap_or(""))
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| TwitterError::OAuth(e.to_string()))?;
        mac.update(base_string.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer_key", &self.consumer_key)
            .finish_non_exhaustive()
    }
}

/// `METHOD&enc(base_url)&enc(sorted params)`; query parameters of `url`
/// are folded into the parameter set.
pub fn signature_base_string(
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> TwitterResult<String> {
    let parsed = Url::parse(url).map_err(|e| TwitterError::OAuth(format!("Invalid URL {url}: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| TwitterError::OAuth(format!("URL has no host: {url}")))?;
    let base_url = match parsed.port() {
        Some(port) => format!("{}://{}:{}{}", parsed.scheme(), host, port, parsed.path()),
        None => format!("{}://{}{}", parsed.scheme(), host, parsed.path()),
    };

    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(
            parsed
                .query_pairs()
                .map(|(k, v)| (percent_encode(&k), percent_encode(&v))),
        )
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&base_url),
        percent_encode(&param_string)
    ))
}

/// RFC 3986 percent-encoding: everything except ALPHA / DIGIT / `-._~`.
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
