//! Twilio REST client for the Calls resource

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::{CallPlacer, CallReceipt, CallRequest};
use crate::config::{TelephonyConfig, required};
use crate::{CareCompassError, Result};

pub struct TwilioClient {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

#[derive(Debug, Deserialize)]
struct CallResource {
    sid: String,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<u32>,
    message: Option<String>,
}

impl TwilioClient {
    pub fn new(config: &TelephonyConfig) -> Result<Self> {
        let account_sid = required(&config.account_sid, "telephony.account_sid")?.to_string();
        let auth_token = required(&config.auth_token, "telephony.auth_token")?.to_string();

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CareCompassError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_sid,
            auth_token,
        })
    }

    fn calls_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.base_url, self.account_sid
        )
    }
}

#[async_trait]
impl CallPlacer for TwilioClient {
    #[instrument(skip(self, request))]
    async fn place_call(&self, request: &CallRequest) -> Result<CallReceipt> {
        let form = [
            ("To", request.to.as_str()),
            ("From", request.from.as_str()),
            ("Url", request.twiml_url.as_str()),
        ];

        let response = self
            .client
            .post(self.calls_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CareCompassError::call(describe_error(status, &body)));
        }

        let call: CallResource = serde_json::from_str(&body)?;
        Ok(CallReceipt {
            call_sid: call.sid,
            status: call.status,
        })
    }
}

fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<TwilioErrorBody>(body) {
        Ok(TwilioErrorBody {
            code: Some(code),
            message: Some(message),
        }) => format!("Twilio HTTP {status} (code {code}): {message}"),
        _ => format!("Twilio HTTP {status}: {body}"),
    }
}
