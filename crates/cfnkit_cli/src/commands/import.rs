//! Import command - Parse a template into idiomatic property bags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use tracing::info;

use cfnkit_template::{load_structured_file, CfnResource, Scope, Template};

use super::{emit, Session};
use crate::config::OutputFormat;

#[derive(Args)]
pub struct ImportArgs {
    /// Template file (JSON or YAML)
    #[arg(short, long)]
    template: PathBuf,

    /// Print the imported property bags instead of a summary
    #[arg(long)]
    bags: bool,

    /// Output format for --bags (defaults to the configured one)
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,
}

pub fn execute(args: ImportArgs, session: &Session) -> Result<()> {
    info!("Importing {}", args.template.display());

    let source = load_structured_file(&args.template)?;
    let template = Template::import(&source, &session.registry, &Scope::root())
        .with_context(|| format!("Failed to import {}", args.template.display()))?;

    if args.bags {
        let bags: Map<String, Value> = template
            .resources()
            .map(|r| (r.logical_id().to_string(), describe(r)))
            .collect();
        return emit(&Value::Object(bags), session.output(args.output), None);
    }

    println!("📦 Imported {} resource(s) from {}", template.resource_count(), args.template.display());
    for resource in template.resources() {
        let known = !resource.schema().fields().is_empty();
        let marker = if known { "✅" } else { "⚠️ " };
        println!("   {} {} ({})", marker, resource.logical_id(), resource.type_name());
        for o in resource.overrides() {
            println!("      + {} (carried as override)", o.path());
        }
    }

    Ok(())
}

/// Idiomatic view of one imported resource.
fn describe(resource: &CfnResource) -> Value {
    let mut out = Map::new();
    out.insert("type".to_string(), Value::String(resource.type_name().to_string()));
    out.insert("properties".to_string(), resource.properties().to_json());

    let extras: Map<String, Value> = resource
        .overrides()
        .iter()
        .filter_map(|o| o.value().map(|v| (o.path().to_string(), v.clone())))
        .collect();
    if !extras.is_empty() {
        out.insert("extraProperties".to_string(), Value::Object(extras));
    }
    Value::Object(out)
}
