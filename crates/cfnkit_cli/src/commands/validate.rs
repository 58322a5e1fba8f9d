//! Validate command - Check a property file against a resource schema.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use cfnkit_core::PropertyValidator;

use super::{load_properties, Session};
use crate::error::CliError;

#[derive(Args)]
pub struct ValidateArgs {
    /// Resource type, e.g. AWS::Oam::Link
    #[arg(short = 't', long = "type")]
    type_name: String,

    /// Property file (JSON or YAML, camelCase keys)
    #[arg(short, long)]
    properties: PathBuf,
}

pub fn execute(args: ValidateArgs, session: &Session) -> Result<()> {
    info!("Validating {} against {}", args.properties.display(), args.type_name);

    let schema = session.resource_schema(&args.type_name)?;
    let properties = load_properties(&args.properties)?;

    let result = PropertyValidator::new(&session.registry)
        .allow_unknown(!session.config.strict_unknown)
        .validate(schema, &properties);

    if result.is_success() {
        println!("✅ Properties are valid for {}", args.type_name);
        return Ok(());
    }

    println!("❌ Properties are not valid for {}:", args.type_name);
    for error in result.errors() {
        println!("   - {}", error);
    }
    Err(CliError::ValidationFailed(result.errors().len()).into())
}
