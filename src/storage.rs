use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    presigning::PresigningConfig,
    Client,
};
use thiserror::Error;

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid file extension")]
    InvalidFileExtension,
    #[error(transparent)]
    Presign(#[from] anyhow::Error),
}

#[async_trait]
pub trait StorageClient: Send + Sync {
    /// URL the browser can PUT the object to directly.
    async fn presign_put(
        &self,
        key: &str,
        content_type: Option<&str>,
        expires_in: Duration,
    ) -> anyhow::Result<String>;
    /// Where the object is readable once uploaded.
    fn public_url(&self, key: &str) -> String;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
    endpoint_url: String,
}

impl Storage {
    pub async fn new(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let endpoint_url = cfg.endpoint_url();
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&endpoint_url)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&endpoint_url)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(conf);
        client
            .head_bucket()
            .bucket(&cfg.bucket)
            .send()
            .await
            .with_context(|| format!("bucket {} is not reachable", cfg.bucket))?;

        Ok(Self {
            client,
            bucket: cfg.bucket.clone(),
            endpoint_url,
        })
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn presign_put(
        &self,
        key: &str,
        content_type: Option<&str>,
        expires_in: Duration,
    ) -> anyhow::Result<String> {
        let mut req = self.client.put_object().bucket(&self.bucket).key(key);
        if let Some(ct) = content_type {
            req = req.content_type(ct);
        }
        let presigned = req
            .presigned(PresigningConfig::expires_in(expires_in)?)
            .await
            .context("s3 presign_put")?;
        Ok(presigned.uri().to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint_url, self.bucket, key)
    }
}
