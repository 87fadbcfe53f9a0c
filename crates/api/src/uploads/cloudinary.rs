// Cloudinary signed upload parameters
// Decision: SHA-256 signatures (the client must send signature_algorithm=sha256)

use serde::Serialize;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Everything a client needs to upload directly to Cloudinary
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloudinarySignature {
    pub signature: String,
    pub timestamp: i64,
    pub api_key: String,
    pub cloud_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    pub signature_algorithm: String,
}

/// Hex SHA-256 of `k1=v1&k2=v2...` (keys sorted) followed by the API secret.
/// Empty values are not signed.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut params: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    params.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl CloudinaryConfig {
    pub fn sign_upload(
        &self,
        folder: Option<String>,
        public_id: Option<String>,
        timestamp: i64,
    ) -> CloudinarySignature {
        let timestamp_str = timestamp.to_string();
        let mut params = vec![("timestamp", timestamp_str.as_str())];
        if let Some(folder) = folder.as_deref() {
            params.push(("folder", folder));
        }
        if let Some(public_id) = public_id.as_deref() {
            params.push(("public_id", public_id));
        }

        CloudinarySignature {
            signature: sign_params(&params, &self.api_secret),
            timestamp,
            api_key: self.api_key.clone(),
            cloud_name: self.cloud_name.clone(),
            folder,
            public_id,
            signature_algorithm: "sha256".to_string(),
        }
    }
}
