use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::traits::ToolHandler;
use gigi_core::{CallContext, Channel, CrmStore, LeadRecord, ToolError};

#[derive(Deserialize)]
struct InquiryInput {
    name: String,
    phone: String,
    care_type: Option<String>,
}

/// Captures an inbound sales inquiry as a CRM lead.
pub struct LogInquiryHandler {
    crm: Arc<dyn CrmStore>,
}

impl LogInquiryHandler {
    pub fn new(crm: Arc<dyn CrmStore>) -> Self {
        Self { crm }
    }
}

#[async_trait]
impl ToolHandler for LogInquiryHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        channel: Channel,
        ctx: &CallContext,
    ) -> Result<Value, ToolError> {
        let input: InquiryInput = serde_json::from_value(Value::Object(args.clone()))
            .map_err(|e| ToolError::Validation(e.to_string()))?;

        let lead = LeadRecord {
            name: input.name.clone(),
            phone: input.phone,
            care_type: input.care_type,
            source: channel,
            received_at: ctx.timestamp,
        };

        let lead_id = self
            .crm
            .record_lead(lead)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        info!(lead_id, conversation = %ctx.conversation_id, "captured sales lead");

        Ok(json!({
            "lead_id": lead_id,
            "name": input.name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigi_core::CrmError;

    struct MockCrm;

    #[async_trait]
    impl CrmStore for MockCrm {
        async fn record_callout(
            &self,
            _callout: gigi_core::CalloutRecord,
        ) -> Result<String, CrmError> {
            unimplemented!()
        }

        async fn client_shifts(
            &self,
            _client_name: &str,
            _date: Option<chrono::NaiveDate>,
        ) -> Result<Vec<gigi_core::ShiftRecord>, CrmError> {
            unimplemented!()
        }

        async fn caregiver_shifts(
            &self,
            _caregiver_name: &str,
            _date: Option<chrono::NaiveDate>,
        ) -> Result<Vec<gigi_core::ShiftRecord>, CrmError> {
            unimplemented!()
        }

        async fn open_shifts(&self) -> Result<Vec<gigi_core::ShiftRecord>, CrmError> {
            unimplemented!()
        }

        async fn record_lead(&self, lead: LeadRecord) -> Result<String, CrmError> {
            assert_eq!(lead.source, Channel::Sms);
            assert_eq!(lead.care_type.as_deref(), Some("companion"));
            Ok("lead-7".into())
        }
    }

    #[tokio::test]
    async fn captures_lead_with_source_channel() {
        let handler = LogInquiryHandler::new(Arc::new(MockCrm));
        let ctx = CallContext::new("+15550123", "sms-9");
        let mut args = Map::new();
        args.insert("name".into(), json!("Pat Quinn"));
        args.insert("phone".into(), json!("+15550123"));
        args.insert("care_type".into(), json!("companion"));
        let out = handler.execute(&args, Channel::Sms, &ctx).await.unwrap();
        assert_eq!(out["lead_id"], "lead-7");
    }
}
