//! Argument validation against a tool's declared parameters.
//!
//! Violations are reported one at a time in a fixed order (declared
//! parameters first, then unknown keys sorted by name) so error messages
//! stay deterministic and testable.

use serde_json::{Map, Value};

use gigi_catalog::{ParamKind, ToolDefinition};

pub fn validate_arguments(
    def: &ToolDefinition,
    args: &Map<String, Value>,
) -> Result<(), String> {
    for param in &def.params {
        match args.get(&param.name) {
            None => {
                if param.required {
                    return Err(format!("missing required parameter '{}'", param.name));
                }
            }
            Some(value) => {
                if !param.kind.matches(value) {
                    return Err(format!(
                        "parameter '{}' must be a {}",
                        param.name,
                        param.kind.as_str()
                    ));
                }
                if let (Some(allowed), Some(s)) = (&param.allowed, value.as_str()) {
                    if !allowed.iter().any(|a| a == s) {
                        return Err(format!(
                            "parameter '{}' must be one of [{}], got '{}'",
                            param.name,
                            allowed.join(", "),
                            s
                        ));
                    }
                }
            }
        }
    }

    // Unknown parameters are rejected, never silently passed through.
    let mut unknown: Vec<&String> = args
        .keys()
        .filter(|k| !def.params.iter().any(|p| &p.name == *k))
        .collect();
    unknown.sort();
    if let Some(first) = unknown.first() {
        return Err(format!("unknown parameter '{first}'"));
    }

    Ok(())
}
