pub mod callout;
pub mod directory;
pub mod inquiry;
pub mod schedules;

pub use callout::ReportCallOutHandler;
pub use directory::DirectoryQueryHandler;
pub use inquiry::LogInquiryHandler;
pub use schedules::{CaregiverScheduleHandler, ClientScheduleHandler, ShiftCoverageHandler};

use chrono::NaiveDate;
use gigi_core::ToolError;

/// Dates arrive from the conversation engine as ISO strings.
pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ToolError::Validation(format!("{field} must be a YYYY-MM-DD date, got '{value}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso() {
        assert!(parse_date("shift_date", "2026-08-26").is_ok());
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        let err = parse_date("shift_date", "08/26/2026").unwrap_err();
        assert!(err.to_string().contains("shift_date"));
        assert!(err.to_string().contains("08/26/2026"));
    }
}
