// Upload signing
// Decision: The server never receives file bytes; it signs direct-to-provider uploads
// Decision: Each provider is optional and configured independently from the environment

pub mod cloudinary;
pub mod s3;

use crate::auth::config::ConfigError;

pub use cloudinary::{CloudinaryConfig, CloudinarySignature};
pub use s3::{PresignedUpload, S3Config};

/// Default lifetime of a presigned S3 URL (15 minutes)
pub const DEFAULT_PRESIGN_EXPIRES_SECS: u64 = 900;

/// Longest lifetime SigV4 accepts for a presigned URL (7 days)
pub const MAX_PRESIGN_EXPIRES_SECS: u64 = 604_800;

/// Region used when `S3_REGION` is not set
pub const DEFAULT_S3_REGION: &str = "us-east-1";

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("invalid signing key")]
    InvalidKey,
}

/// Upload provider configuration
#[derive(Debug, Clone, Default)]
pub struct UploadConfig {
    pub cloudinary: Option<CloudinaryConfig>,
    pub s3: Option<S3Config>,
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// A provider is enabled only when all of its credentials are present
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let cloudinary = match (
            non_empty("CLOUDINARY_CLOUD_NAME"),
            non_empty("CLOUDINARY_API_KEY"),
            non_empty("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        let s3 = match (
            non_empty("S3_BUCKET"),
            non_empty("AWS_ACCESS_KEY_ID"),
            non_empty("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Some(bucket), Some(access_key_id), Some(secret_access_key)) => {
                let expires_secs = match non_empty("S3_PRESIGN_EXPIRES") {
                    None => DEFAULT_PRESIGN_EXPIRES_SECS,
                    Some(raw) => match raw.parse::<u64>() {
                        Ok(secs) if (1..=MAX_PRESIGN_EXPIRES_SECS).contains(&secs) => secs,
                        _ => {
                            return Err(ConfigError::InvalidValue {
                                name: "S3_PRESIGN_EXPIRES",
                                value: raw,
                            })
                        }
                    },
                };
                Some(S3Config {
                    bucket,
                    region: non_empty("S3_REGION").unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
                    access_key_id,
                    secret_access_key,
                    expires_secs,
                })
            }
            _ => None,
        };

        Ok(Self { cloudinary, s3 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_nothing_configured() {
        let config = UploadConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.cloudinary.is_none());
        assert!(config.s3.is_none());
    }

    #[test]
    fn test_partial_cloudinary_is_disabled() {
        let config = UploadConfig::from_lookup(lookup(&[
            ("CLOUDINARY_CLOUD_NAME", "ondas"),
            ("CLOUDINARY_API_KEY", "123"),
        ]))
        .unwrap();
        assert!(config.cloudinary.is_none());
    }

    #[test]
    fn test_s3_defaults() {
        let config = UploadConfig::from_lookup(lookup(&[
            ("S3_BUCKET", "ondas-media"),
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]))
        .unwrap();
        let s3 = config.s3.unwrap();
        assert_eq!(s3.region, "us-east-1");
        assert_eq!(s3.expires_secs, 900);
    }

    #[test]
    fn test_s3_expiry_out_of_range() {
        let err = UploadConfig::from_lookup(lookup(&[
            ("S3_BUCKET", "ondas-media"),
            ("AWS_ACCESS_KEY_ID", "AKID"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("S3_PRESIGN_EXPIRES", "999999999"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "S3_PRESIGN_EXPIRES",
                ..
            }
        ));
    }
}
