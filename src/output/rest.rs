//! REST API delivery sink

use crate::config::DeliveryConfig;
use crate::output::traits::{DeliveryError, DeliveryResult, DeliverySink};
use crate::record::CandidateRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

/// Posts batches as `{"<request-param>": [records...]}` JSON
pub struct RestApiSink {
    client: Client,
    endpoint: String,
    request_param: String,
}

impl RestApiSink {
    pub fn new(client: Client, config: &DeliveryConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint(),
            request_param: config.request_param.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn body(&self, records: &[CandidateRecord]) -> DeliveryResult<Value> {
        let mut body = Map::new();
        body.insert(self.request_param.clone(), serde_json::to_value(records)?);
        Ok(Value::Object(body))
    }
}

#[async_trait]
impl DeliverySink for RestApiSink {
    async fn deliver(&self, records: &[CandidateRecord]) -> DeliveryResult<bool> {
        let body = self.body(records)?;

        debug!("Posting {} record(s) to {}", records.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|source| DeliveryError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            info!("Delivered {} record(s) to {}", records.len(), self.endpoint);
            return Ok(true);
        }

        let text = response.text().await.unwrap_or_default();
        error!(
            "Delivery to {} rejected with HTTP {}: {}",
            self.endpoint,
            status.as_u16(),
            text
        );
        Ok(false)
    }
}

/// Sink used when delivery is switched off
///
/// Reports every batch as not delivered, so nothing is marked seen.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSink;

#[async_trait]
impl DeliverySink for DisabledSink {
    async fn deliver(&self, records: &[CandidateRecord]) -> DeliveryResult<bool> {
        info!("Delivery disabled, dropping batch of {} record(s)", records.len());
        Ok(false)
    }
}
