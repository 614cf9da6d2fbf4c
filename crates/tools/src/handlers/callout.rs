use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::handlers::parse_date;
use crate::traits::ToolHandler;
use gigi_core::{CallContext, CalloutRecord, Channel, CrmStore, ToolError};

#[derive(Deserialize)]
struct CallOutInput {
    caregiver_name: String,
    shift_date: String,
    reason: Option<String>,
}

/// Records a caregiver calling out of a shift so the office can arrange
/// coverage.
pub struct ReportCallOutHandler {
    crm: Arc<dyn CrmStore>,
}

impl ReportCallOutHandler {
    pub fn new(crm: Arc<dyn CrmStore>) -> Self {
        Self { crm }
    }
}

#[async_trait]
impl ToolHandler for ReportCallOutHandler {
    async fn execute(
        &self,
        args: &Map<String, Value>,
        channel: Channel,
        ctx: &CallContext,
    ) -> Result<Value, ToolError> {
        let input: CallOutInput = serde_json::from_value(Value::Object(args.clone()))
            .map_err(|e| ToolError::Validation(e.to_string()))?;
        let shift_date = parse_date("shift_date", &input.shift_date)?;

        let record = CalloutRecord {
            caregiver_name: input.caregiver_name.clone(),
            shift_date,
            reason: input.reason,
            reported_via: channel,
            reported_at: ctx.timestamp,
        };

        let callout_id = self
            .crm
            .record_callout(record)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        info!(
            callout_id,
            caregiver = %input.caregiver_name,
            conversation = %ctx.conversation_id,
            "recorded caregiver callout"
        );

        Ok(json!({
            "callout_id": callout_id,
            "caregiver_name": input.caregiver_name,
            "shift_date": shift_date.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigi_core::CrmError;
    use serde_json::json;

    struct MockCrm {
        fail: bool,
    }

    #[async_trait]
    impl CrmStore for MockCrm {
        async fn record_callout(&self, callout: CalloutRecord) -> Result<String, CrmError> {
            if self.fail {
                return Err(CrmError::Request("CRM unavailable".into()));
            }
            assert_eq!(callout.reported_via, Channel::Voice);
            Ok("co-42".into())
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

        async fn record_lead(&self, _lead: gigi_core::LeadRecord) -> Result<String, CrmError> {
            unimplemented!()
        }
    }

    fn args() -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("caregiver_name".into(), json!("Dana Reyes"));
        m.insert("shift_date".into(), json!("2026-08-27"));
        m
    }

    #[tokio::test]
    async fn records_callout_via_crm() {
        let handler = ReportCallOutHandler::new(Arc::new(MockCrm { fail: false }));
        let ctx = CallContext::new("+15550100", "call-1");
        let out = handler.execute(&args(), Channel::Voice, &ctx).await.unwrap();
        assert_eq!(out["callout_id"], "co-42");
        assert_eq!(out["shift_date"], "2026-08-27");
    }

    #[tokio::test]
    async fn bad_date_is_validation_error() {
        let handler = ReportCallOutHandler::new(Arc::new(MockCrm { fail: false }));
        let ctx = CallContext::new("+15550100", "call-1");
        let mut bad = args();
        bad.insert("shift_date".into(), json!("tomorrow"));
        let err = handler.execute(&bad, Channel::Voice, &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }

    #[tokio::test]
    async fn crm_failure_is_execution_error() {
        let handler = ReportCallOutHandler::new(Arc::new(MockCrm { fail: true }));
        let ctx = CallContext::new("+15550100", "call-1");
        let err = handler
            .execute(&args(), Channel::Voice, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Execution(_)));
    }
}
