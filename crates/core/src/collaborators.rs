//! Traits for the externally owned systems handlers call into.
//!
//! The CRM and the telephony provider are collaborators, not part of this
//! repo. Handlers receive them as trait objects so tests can inject fakes.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Channel;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("CRM request failed: {0}")]
    Request(String),

    #[error("record not found: {0}")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum SmsError {
    #[error("outbound send failed: {0}")]
    Send(String),
}

/// A caregiver calling out of a scheduled shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalloutRecord {
    pub caregiver_name: String,
    pub shift_date: NaiveDate,
    pub reason: Option<String>,
    pub reported_via: Channel,
    pub reported_at: DateTime<Utc>,
}

/// One scheduled (or open) shift as the CRM reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub client_name: String,
    pub caregiver_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

/// An inbound sales inquiry captured as a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub name: String,
    pub phone: String,
    pub care_type: Option<String>,
    pub source: Channel,
    pub received_at: DateTime<Utc>,
}

/// CRM/record store operations the tool handlers need.
#[async_trait]
pub trait CrmStore: Send + Sync {
    /// Record a callout; returns the new record's id.
    async fn record_callout(&self, callout: CalloutRecord) -> Result<String, CrmError>;

    /// Shifts scheduled for a client, optionally narrowed to one date.
    async fn client_shifts(
        &self,
        client_name: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<ShiftRecord>, CrmError>;

    /// Shifts assigned to a caregiver, optionally narrowed to one date.
    async fn caregiver_shifts(
        &self,
        caregiver_name: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<ShiftRecord>, CrmError>;

    /// Currently uncovered shifts.
    async fn open_shifts(&self) -> Result<Vec<ShiftRecord>, CrmError>;

    /// Record a sales lead; returns the new record's id.
    async fn record_lead(&self, lead: LeadRecord) -> Result<String, CrmError>;
}

/// Outbound SMS send through the telephony provider.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError>;
}
