//! The static tool declaration and its handler wiring.
//!
//! Adding a capability means adding one definition here plus one handler
//! registration in [`build_registry`]; dispatch logic never changes.

use std::sync::Arc;

use crate::handlers::{
    CaregiverScheduleHandler, ClientScheduleHandler, DirectoryQueryHandler, LogInquiryHandler,
    ReportCallOutHandler, ShiftCoverageHandler,
};
use crate::registry::HandlerRegistry;
use gigi_catalog::{ParamKind, ParamSpec, ToolDefinition};
use gigi_core::{Channel, CrmStore};
use gigi_executor::AdminCliExecutor;
use gigi_policy::CommandGuard;

/// External clients handlers depend on, built once in main and injected
/// here. No lazy globals.
pub struct Resources {
    pub crm: Arc<dyn CrmStore>,
    pub guard: Arc<CommandGuard>,
    pub admin_cli: Arc<AdminCliExecutor>,
}

pub fn builtin_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "report_call_out",
            "Report that a caregiver is calling out of a scheduled shift so staffing can arrange coverage.",
            vec![
                ParamSpec::required("caregiver_name", ParamKind::String, "Full name of the caregiver calling out"),
                ParamSpec::required("shift_date", ParamKind::String, "Date of the missed shift, YYYY-MM-DD"),
                ParamSpec::optional("reason", ParamKind::String, "Reason the caregiver gave, if any"),
            ],
            &[Channel::Voice, Channel::Sms],
            "report_call_out",
        ),
        ToolDefinition::new(
            "client_schedule",
            "Look up a client's scheduled shifts, optionally for a single date.",
            vec![
                ParamSpec::required("client_name", ParamKind::String, "Full name of the client"),
                ParamSpec::optional("date", ParamKind::String, "Limit to one date, YYYY-MM-DD"),
            ],
            &Channel::ALL,
            "client_schedule",
        ),
        ToolDefinition::new(
            "caregiver_schedule",
            "Look up the shifts assigned to a caregiver, optionally for a single date.",
            vec![
                ParamSpec::required("caregiver_name", ParamKind::String, "Full name of the caregiver"),
                ParamSpec::optional("date", ParamKind::String, "Limit to one date, YYYY-MM-DD"),
            ],
            // Broadly declared; the SMS override list suppresses it there
            // because same-name caregivers need interactive disambiguation.
            &Channel::ALL,
            "caregiver_schedule",
        ),
        ToolDefinition::new(
            "shift_coverage_report",
            "List currently uncovered shifts across all clients.",
            vec![],
            // Declared everywhere; the voice override list suppresses it on
            // calls because the tabular output cannot be spoken.
            &Channel::ALL,
            "shift_coverage_report",
        ),
        ToolDefinition::new(
            "log_inquiry",
            "Capture a new care inquiry as a sales lead.",
            vec![
                ParamSpec::required("name", ParamKind::String, "Name of the person inquiring"),
                ParamSpec::required("phone", ParamKind::String, "Callback phone number"),
                ParamSpec::optional("care_type", ParamKind::String, "Kind of care requested")
                    .with_allowed(&["companion", "personal", "skilled"]),
            ],
            &[Channel::Sms, Channel::Chat],
            "log_inquiry",
        ),
        ToolDefinition::new(
            "directory_query",
            "Run a read-only query against the workspace directory admin CLI.",
            vec![ParamSpec::required(
                "query",
                ParamKind::String,
                "Admin CLI command line, e.g. 'info user jdoe@example.com'",
            )],
            &[Channel::Chat],
            "directory_query",
        ),
    ]
}

pub fn build_registry(resources: Resources) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry
        .register(
            "report_call_out",
            Arc::new(ReportCallOutHandler::new(resources.crm.clone())),
        )
        .register(
            "client_schedule",
            Arc::new(ClientScheduleHandler::new(resources.crm.clone())),
        )
        .register(
            "caregiver_schedule",
            Arc::new(CaregiverScheduleHandler::new(resources.crm.clone())),
        )
        .register(
            "shift_coverage_report",
            Arc::new(ShiftCoverageHandler::new(resources.crm.clone())),
        )
        .register(
            "log_inquiry",
            Arc::new(LogInquiryHandler::new(resources.crm)),
        )
        .register(
            "directory_query",
            Arc::new(DirectoryQueryHandler::new(
                resources.guard,
                resources.admin_cli,
            )),
        );
    registry
}
