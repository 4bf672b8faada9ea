//! Emergency outbound calling
//!
//! [`EmergencyDialer`] places one call to the emergency contact fixed at
//! deployment time. Unlike the other tools it reports failure: errors are
//! logged at `error` and returned to the caller.

pub mod twilio;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::Result;
use crate::config::{TelephonyConfig, required};

pub use twilio::TwilioClient;

/// Everything needed to place one outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub to: String,
    pub from: String,
    /// Voice response document fetched by the provider when the call connects
    pub twiml_url: String,
}

/// Provider acknowledgement for a requested call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReceipt {
    pub call_sid: String,
    pub status: Option<String>,
}

/// Outbound calling backend
#[async_trait]
pub trait CallPlacer: Send + Sync {
    async fn place_call(&self, request: &CallRequest) -> Result<CallReceipt>;
}

pub struct EmergencyDialer {
    placer: Arc<dyn CallPlacer>,
    request: CallRequest,
}

impl EmergencyDialer {
    pub fn new(placer: Arc<dyn CallPlacer>, request: CallRequest) -> Self {
        Self { placer, request }
    }

    /// Build a dialer backed by Twilio; every telephony credential must be set
    pub fn from_config(config: &TelephonyConfig) -> Result<Self> {
        let request = CallRequest {
            to: required(&config.emergency_contact, "telephony.emergency_contact")?.to_string(),
            from: required(&config.from_number, "telephony.from_number")?.to_string(),
            twiml_url: config.twiml_url.clone(),
        };
        let placer = Arc::new(TwilioClient::new(config)?);
        Ok(Self::new(placer, request))
    }

    /// Request the emergency call. Takes no input: the destination is fixed.
    #[instrument(skip(self))]
    pub async fn trigger_emergency_call(&self) -> Result<CallReceipt> {
        info!("Placing emergency call");
        match self.placer.place_call(&self.request).await {
            Ok(receipt) => {
                info!(call_sid = %receipt.call_sid, status = ?receipt.status, "Emergency call requested");
                Ok(receipt)
            }
            Err(e) => {
                error!("Emergency call could not be placed: {}", e);
                Err(e)
            }
        }
    }
}
