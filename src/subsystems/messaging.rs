//! Messaging subsystem
//!
//! Amazon SNS connectivity. The probe lists topics, the cheapest call that
//! exercises credentials and reachability.

use crate::bootstrap::subsystem::{Criticality, Subsystem};
use crate::config::MessagingConfig;
use crate::utils::error::{AppError, Result};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use tracing::{debug, info};

/// SNS messaging handle
pub struct Messaging {
    config: MessagingConfig,
    client: ArcSwapOption<aws_sdk_sns::Client>,
}

impl Messaging {
    /// Create an unconnected handle; no I/O happens until `connect`
    pub fn new(config: &MessagingConfig) -> Self {
        Self {
            config: config.clone(),
            client: ArcSwapOption::empty(),
        }
    }
}

#[async_trait]
impl Subsystem for Messaging {
    fn name(&self) -> &'static str {
        "messaging"
    }

    fn criticality(&self) -> Criticality {
        Criticality::Optional
    }

    async fn connect(&self) -> Result<()> {
        if self.client.load().is_some() {
            debug!("Messaging already connected");
            return Ok(());
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.config.region.clone()));
        if let Some(endpoint) = &self.config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let aws_config = loader.load().await;

        let client = aws_sdk_sns::Client::new(&aws_config);

        // Verify reachability before treating the subsystem as connected
        client
            .list_topics()
            .send()
            .await
            .map_err(|e| AppError::Messaging(format!("SNS verification failed: {}", e)))?;

        info!("SNS messaging connected: region={}", self.config.region);
        self.client.store(Some(std::sync::Arc::new(client)));
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        let client = self
            .client
            .load_full()
            .ok_or_else(|| AppError::probe("messaging", "not connected"))?;

        client
            .list_topics()
            .send()
            .await
            .map_err(|e| AppError::Messaging(format!("SNS probe failed: {}", e)))?;

        Ok(())
    }
}
