// S3 presigned URLs (AWS Signature Version 4, query-string auth)
// Decision: The payload is UNSIGNED-PAYLOAD. When the client names a content
//           type it is signed along with host and must be sent on the PUT.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use super::SigningError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Lifetime of presigned URLs in seconds
    pub expires_secs: u64,
}

/// A presigned upload handed to the client
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub url: String,
    pub key: String,
    pub expires_in: u64,
    /// Content-Type the upload must be sent with, when one was signed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl S3Config {
    /// Virtual-hosted style endpoint of the bucket
    pub fn host(&self) -> String {
        if self.region == "us-east-1" {
            format!("{}.s3.amazonaws.com", self.bucket)
        } else {
            format!("{}.s3.{}.amazonaws.com", self.bucket, self.region)
        }
    }

    pub fn presign(
        &self,
        method: &str,
        key: &str,
        content_type: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<PresignedUpload, SigningError> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{date}/{}/{SERVICE}/aws4_request", self.region);
        let host = self.host();
        let path = format!("/{}", uri_encode(key, false));
        let content_type = content_type.map(str::trim).filter(|ct| !ct.is_empty());

        let (canonical_headers, signed_headers) = match content_type {
            Some(ct) => (
                format!("content-type:{ct}\nhost:{host}\n"),
                "content-type;host",
            ),
            None => (format!("host:{host}\n"), "host"),
        };

        let mut query = vec![
            ("X-Amz-Algorithm", ALGORITHM.to_string()),
            (
                "X-Amz-Credential",
                format!("{}/{scope}", self.access_key_id),
            ),
            ("X-Amz-Date", amz_date.clone()),
            ("X-Amz-Expires", self.expires_secs.to_string()),
            ("X-Amz-SignedHeaders", signed_headers.to_string()),
        ];
        query.sort_by(|a, b| a.0.cmp(b.0));
        let canonical_query = query
            .iter()
            .map(|(k, v)| format!("{}={}", uri_encode(k, true), uri_encode(v, true)))
            .collect::<Vec<_>>()
            .join("&");

        let canonical_request = format!(
            "{method}\n{path}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{UNSIGNED_PAYLOAD}"
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = self.signing_key(&date)?;
        let signature = hex::encode(hmac(&signing_key, string_to_sign.as_bytes())?);

        Ok(PresignedUpload {
            url: format!("https://{host}{path}?{canonical_query}&X-Amz-Signature={signature}"),
            key: key.to_string(),
            expires_in: self.expires_secs,
            content_type: content_type.map(str::to_string),
        })
    }

    fn signing_key(&self, date: &str) -> Result<Vec<u8>, SigningError> {
        let secret = format!("AWS4{}", self.secret_access_key);
        let k_date = hmac(secret.as_bytes(), date.as_bytes())?;
        let k_region = hmac(&k_date, self.region.as_bytes())?;
        let k_service = hmac(&k_region, SERVICE.as_bytes())?;
        hmac(&k_service, b"aws4_request")
    }
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| SigningError::InvalidKey)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// RFC 3986 encoding as SigV4 expects it. `/` is kept in object keys.
fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Reduce a client-supplied file name to a safe object key segment
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(100)
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
