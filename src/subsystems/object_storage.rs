//! Object storage subsystem
//!
//! Amazon S3 connectivity. The probe heads the configured bucket.

use crate::bootstrap::subsystem::{Criticality, Subsystem};
use crate::config::ObjectStorageConfig;
use crate::utils::error::{AppError, Result};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use tracing::{debug, info};

/// S3 object storage handle
pub struct ObjectStorage {
    config: ObjectStorageConfig,
    client: ArcSwapOption<aws_sdk_s3::Client>,
}

impl ObjectStorage {
    /// Create an unconnected handle; no I/O happens until `connect`
    pub fn new(config: &ObjectStorageConfig) -> Self {
        Self {
            config: config.clone(),
            client: ArcSwapOption::empty(),
        }
    }
}

#[async_trait]
impl Subsystem for ObjectStorage {
    fn name(&self) -> &'static str {
        "object_storage"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Optional
    }

    async fn connect(&self) -> Result<()> {
        if self.client.load().is_some() {
            debug!("Object storage already connected");
            return Ok(());
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.config.region.clone()));
        if let Some(endpoint) = &self.config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let aws_config = loader.load().await;

        let client = aws_sdk_s3::Client::new(&aws_config);

        // Verify the bucket is reachable before treating the subsystem as connected
        client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| {
                AppError::ObjectStorage(format!(
                    "S3 verification failed for bucket {}: {}",
                    self.config.bucket, e
                ))
            })?;

        info!(
            "S3 object storage connected: bucket={}, region={}",
            self.config.bucket, self.config.region
        );
        self.client.store(Some(std::sync::Arc::new(client)));
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        let client = self
            .client
            .load_full()
            .ok_or_else(|| AppError::probe("object_storage", "not connected"))?;

        client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| AppError::ObjectStorage(format!("S3 probe failed: {}", e)))?;

        Ok(())
    }
}
