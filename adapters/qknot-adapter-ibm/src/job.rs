//! IBM runtime jobs.

use std::sync::Arc;

use async_trait::async_trait;
use qknot_hal::{HalError, HalResult, RuntimeJob, SamplerResult};

use crate::api::IbmClient;
use crate::decode::decode_results;

/// Handle to a job on the IBM API. Every call re-reads remote state.
#[derive(Debug)]
pub struct IbmJob {
    client: Arc<IbmClient>,
    id: String,
    backend: Option<String>,
}

impl IbmJob {
    pub fn new(client: Arc<IbmClient>, id: String, backend: Option<String>) -> Self {
        Self {
            client,
            id,
            backend,
        }
    }
}

#[async_trait]
impl RuntimeJob for IbmJob {
    fn job_id(&self) -> &str {
        &self.id
    }

    async fn status(&self) -> HalResult<String> {
        Ok(self.client.job_status(&self.id).await?.status)
    }

    async fn backend_name(&self) -> Option<String> {
        if self.backend.is_some() {
            return self.backend.clone();
        }
        self.client.job_status(&self.id).await.ok()?.backend
    }

    async fn error_message(&self) -> Option<String> {
        self.client.job_status(&self.id).await.ok()?.error_message()
    }

    async fn result(&self) -> HalResult<SamplerResult> {
        let response = self.client.job_results(&self.id).await?;
        Ok(decode_results(&response))
    }

    async fn cancel(&self) -> HalResult<()> {
        self.client
            .cancel_job(&self.id)
            .await
            .map_err(HalError::from)
    }
}
