use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub s3: S3Config,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit for the multipart routes
    pub upload_max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    /// Custom endpoint for S3-compatible services (MinIO, LocalStack)
    pub endpoint: Option<String>,
    /// Base URL under which uploaded objects are publicly reachable
    pub public_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bucket = required("AWS_S3_BUCKET_NAME")?;
        let public_url = std::env::var("AWS_S3_PUBLIC_URL")
            .unwrap_or_else(|_| default_public_url(&bucket));
        url::Url::parse(&public_url)
            .with_context(|| format!("AWS_S3_PUBLIC_URL is not a valid URL: {}", public_url))?;

        Ok(Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                upload_max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                    .unwrap_or_else(|_| (25 * 1024 * 1024).to_string())
                    .parse()?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
            },
            s3: S3Config {
                region: required("AWS_REGION")?,
                access_key_id: required("AWS_ACCESS_KEY_ID")?,
                secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
                bucket,
                endpoint: std::env::var("AWS_S3_ENDPOINT").ok().filter(|e| !e.is_empty()),
                public_url,
            },
        })
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{} must be set", name))
}

/// Virtual-hosted style URL used when no explicit public base is configured
pub fn default_public_url(bucket: &str) -> String {
    format!("https://{}.s3.amazonaws.com", bucket)
}
