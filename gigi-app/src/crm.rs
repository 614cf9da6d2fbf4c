//! REST client for the CRM collaborator.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use gigi_core::{CalloutRecord, CrmError, CrmStore, LeadRecord, ShiftRecord};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HttpCrmStore {
    client: Client,
    base_url: String,
    api_token: String,
}

#[derive(Deserialize)]
struct CreatedRecord {
    id: String,
}

impl HttpCrmStore {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_token,
        }
    }

    async fn get_shifts(&self, path: String, date: Option<NaiveDate>) -> Result<Vec<ShiftRecord>, CrmError> {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_token)
            .timeout(REQUEST_TIMEOUT);
        if let Some(date) = date {
            request = request.query(&[("date", date.to_string())]);
        }
        let response = request
            .send()
            .await
            .map_err(|e| CrmError::Request(e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CrmError::NotFound(path));
        }
        if !response.status().is_success() {
            return Err(CrmError::Request(format!("{}: {}", response.status(), path)));
        }
        response
            .json()
            .await
            .map_err(|e| CrmError::Request(e.to_string()))
    }

    async fn post_record<T: serde::Serialize>(
        &self,
        path: &str,
        record: &T,
    ) -> Result<String, CrmError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_token)
            .timeout(REQUEST_TIMEOUT)
            .json(record)
            .send()
            .await
            .map_err(|e| CrmError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CrmError::Request(format!("{}: {}", response.status(), path)));
        }
        let created: CreatedRecord = response
            .json()
            .await
            .map_err(|e| CrmError::Request(e.to_string()))?;
        Ok(created.id)
    }
}

#[async_trait]
impl CrmStore for HttpCrmStore {
    async fn record_callout(&self, callout: CalloutRecord) -> Result<String, CrmError> {
        self.post_record("/callouts", &callout).await
    }

    async fn client_shifts(
        &self,
        client_name: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<ShiftRecord>, CrmError> {
        self.get_shifts(format!("/clients/{client_name}/shifts"), date)
            .await
    }

    async fn caregiver_shifts(
        &self,
        caregiver_name: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<ShiftRecord>, CrmError> {
        self.get_shifts(format!("/caregivers/{caregiver_name}/shifts"), date)
            .await
    }

    async fn open_shifts(&self) -> Result<Vec<ShiftRecord>, CrmError> {
        self.get_shifts("/shifts/open".to_string(), None).await
    }

    async fn record_lead(&self, lead: LeadRecord) -> Result<String, CrmError> {
        self.post_record("/leads", &lead).await
    }
}
