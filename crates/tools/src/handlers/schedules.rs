//! Schedule lookups: a client's upcoming shifts, a caregiver's assigned
//! shifts, and the open-shift coverage report.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::handlers::parse_date;
use crate::traits::ToolHandler;
use gigi_core::{CallContext, Channel, CrmStore, ShiftRecord, ToolError};

#[derive(Deserialize)]
struct ClientScheduleInput {
    client_name: String,
    date: Option<String>,
}

pub struct ClientScheduleHandler {
    crm: Arc<dyn CrmStore>,
}

impl ClientScheduleHandler {
    pub fn new(crm: Arc<dyn CrmStore>) -> Self {
        Self { crm }
    }
}

#[async_trait]
impl ToolHandler for ClientScheduleHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        _channel: Channel,
        _ctx: &CallContext,
    ) -> Result<Value, ToolError> {
        let input: ClientScheduleInput = serde_json::from_value(Value::Object(args.clone()))
            .map_err(|e| ToolError::Validation(e.to_string()))?;
        let date = input
            .date
            .as_deref()
            .map(|d| parse_date("date", d))
            .transpose()?;

        let shifts = self
            .crm
            .client_shifts(&input.client_name, date)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        Ok(shifts_payload("client_name", &input.client_name, shifts))
    }
}

#[derive(Deserialize)]
struct CaregiverScheduleInput {
    caregiver_name: String,
    date: Option<String>,
}

pub struct CaregiverScheduleHandler {
    crm: Arc<dyn CrmStore>,
}

impl CaregiverScheduleHandler {
    pub fn new(crm: Arc<dyn CrmStore>) -> Self {
        Self { crm }
    }
}

#[async_trait]
impl ToolHandler for CaregiverScheduleHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        _channel: Channel,
        _ctx: &CallContext,
    ) -> Result<Value, ToolError> {
        let input: CaregiverScheduleInput = serde_json::from_value(Value::Object(args.clone()))
            .map_err(|e| ToolError::Validation(e.to_string()))?;
        let date = input
            .date
            .as_deref()
            .map(|d| parse_date("date", d))
            .transpose()?;

        let shifts = self
            .crm
            .caregiver_shifts(&input.caregiver_name, date)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        Ok(shifts_payload("caregiver_name", &input.caregiver_name, shifts))
    }
}

/// Lists currently uncovered shifts. Takes no arguments.
pub struct ShiftCoverageHandler {
    crm: Arc<dyn CrmStore>,
}

impl ShiftCoverageHandler {
    pub fn new(crm: Arc<dyn CrmStore>) -> Self {
        Self { crm }
    }
}

#[async_trait]
impl ToolHandler for ShiftCoverageHandler {
    async fn execute(
        &self,
        _args: &Map<String, Value>,
        _channel: Channel,
        _ctx: &CallContext,
    ) -> Result<Value, ToolError> {
        let shifts = self
            .crm
            .open_shifts()
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        Ok(json!({
            "open_count": shifts.len(),
            "shifts": shifts,
        }))
    }
}

fn shifts_payload(key: &str, name: &str, shifts: Vec<ShiftRecord>) -> Value {
    json!({
        key: name,
        "count": shifts.len(),
        "shifts": shifts,
    })
}
