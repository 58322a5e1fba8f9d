//! Schemas command - List or describe the loaded schemas.

use anyhow::Result;
use clap::Args;

use cfnkit_schema::{PropertySchema, SchemaCategory};

use super::Session;
use crate::error::CliError;

#[derive(Args)]
pub struct SchemasArgs {
    /// Describe one type instead of listing all of them
    #[arg(short = 't', long = "type")]
    type_name: Option<String>,

    /// Include nested structure types in the listing
    #[arg(long)]
    all: bool,
}

pub fn execute(args: SchemasArgs, session: &Session) -> Result<()> {
    if let Some(type_name) = &args.type_name {
        let schema = session
            .registry
            .get(type_name)
            .ok_or_else(|| CliError::UnknownType(type_name.clone()))?;
        describe(schema);
        return Ok(());
    }

    let schemas = if args.all {
        session.registry.list()
    } else {
        session.registry.by_category(SchemaCategory::Resource)
    };

    if schemas.is_empty() {
        println!("⚠️  No schemas loaded from {:?}", session.config.schema_dirs);
        return Ok(());
    }

    println!("📚 {} schema(s):", schemas.len());
    for schema in schemas {
        println!("   {} ({} fields)", schema.type_name, schema.fields().len());
    }
    Ok(())
}

fn describe(schema: &PropertySchema) {
    println!("{}", schema.type_name);
    for field in schema.fields() {
        let required = if field.required { " (required)" } else { "" };
        println!("   {} / {}: {}{}", field.name, field.wire_name, field.kind, required);
    }
}
