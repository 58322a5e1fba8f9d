//! Exit codes and error categorization.

use cfnkit_core::CoreError;
use cfnkit_schema::SchemaError;
use cfnkit_template::TemplateError;
use thiserror::Error;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const PARSE_ERROR: u8 = 4;
}

/// Failures raised by the commands themselves.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Validation failed with {0} error(s)")]
    ValidationFailed(usize),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown resource type: {0}")]
    UnknownType(String),
}

/// Pick the exit code for an error by looking through its cause chain.
pub fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<CliError>() {
            return match err {
                CliError::ValidationFailed(_) => ExitCodes::VALIDATION_FAILURE,
                CliError::InvalidArgument(_) | CliError::UnknownType(_) => ExitCodes::INVALID_ARGS,
            };
        }
        if let Some(err) = cause.downcast_ref::<TemplateError>() {
            return match err {
                TemplateError::Core(core) => core_exit_code(core),
                TemplateError::MalformedTemplate(_)
                | TemplateError::Yaml(_)
                | TemplateError::Json(_)
                | TemplateError::InvalidLogicalId(_)
                | TemplateError::DuplicateLogicalId(_) => ExitCodes::PARSE_ERROR,
                TemplateError::InvalidOverridePath(_) | TemplateError::PropertyNotDeclared { .. } => {
                    ExitCodes::INVALID_ARGS
                }
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if let Some(err) = cause.downcast_ref::<CoreError>() {
            return core_exit_code(err);
        }
        if let Some(SchemaError::NotFound(_)) = cause.downcast_ref::<SchemaError>() {
            return ExitCodes::INVALID_ARGS;
        }
    }
    ExitCodes::GENERAL_ERROR
}

fn core_exit_code(err: &CoreError) -> u8 {
    match err {
        CoreError::Validation(_) => ExitCodes::VALIDATION_FAILURE,
        CoreError::Parse { .. } => ExitCodes::PARSE_ERROR,
        CoreError::Unresolved(_) => ExitCodes::INVALID_ARGS,
        CoreError::Schema(_) => ExitCodes::GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_categorize_through_context() {
        let err: anyhow::Result<()> =
            Err(CliError::ValidationFailed(2)).context("Validating properties.json");
        assert_eq!(categorize_error(&err.unwrap_err()), ExitCodes::VALIDATION_FAILURE);

        let parse = TemplateError::Core(CoreError::Parse {
            path: "Retries".to_string(),
            expected: "number".to_string(),
            actual: "string \"many\"".to_string(),
        });
        assert_eq!(categorize_error(&anyhow::Error::new(parse)), ExitCodes::PARSE_ERROR);

        let unknown = anyhow::Error::new(CliError::UnknownType("AWS::Nope::Thing".to_string()));
        assert_eq!(categorize_error(&unknown), ExitCodes::INVALID_ARGS);

        assert_eq!(categorize_error(&anyhow::anyhow!("boom")), ExitCodes::GENERAL_ERROR);
    }
}
