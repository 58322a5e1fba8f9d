//! Render command - Render a property file into a template fragment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use tracing::info;

use cfnkit_core::PropertyRenderer;
use cfnkit_template::is_valid_logical_id;

use super::{emit, load_properties, parse_binding, resolver_with, Session};
use crate::config::OutputFormat;
use crate::error::CliError;

#[derive(Args)]
pub struct RenderArgs {
    /// Resource type, e.g. AWS::Oam::Link
    #[arg(short = 't', long = "type")]
    type_name: String,

    /// Property file (JSON or YAML, camelCase keys)
    #[arg(short, long)]
    properties: PathBuf,

    /// Emit a full resource entry with this logical ID instead of the bare properties
    #[arg(long)]
    logical_id: Option<String>,

    /// Context binding for deferred values (repeatable)
    #[arg(long = "bind", value_name = "KEY=VALUE", value_parser = parse_binding)]
    bindings: Vec<(String, Value)>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Write to a file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

pub fn execute(args: RenderArgs, session: &Session) -> Result<()> {
    info!("Rendering {} as {}", args.properties.display(), args.type_name);

    if let Some(id) = args.logical_id.as_deref().filter(|id| !is_valid_logical_id(id)) {
        return Err(CliError::InvalidArgument(format!("{:?} is not a valid logical ID", id)).into());
    }

    let schema = session.resource_schema(&args.type_name)?;
    let properties = load_properties(&args.properties)?;
    let resolver = resolver_with(&args.bindings);

    let fragment = PropertyRenderer::new(&session.registry, &resolver)
        .allow_unknown(!session.config.strict_unknown)
        .render(schema, &properties)
        .with_context(|| format!("Failed to render {}", args.properties.display()))?;

    let document = match &args.logical_id {
        Some(id) => {
            let mut entry = Map::new();
            entry.insert("Type".to_string(), Value::String(args.type_name.clone()));
            entry.insert("Properties".to_string(), fragment);
            let mut resources = Map::new();
            resources.insert(id.clone(), Value::Object(entry));
            let mut document = Map::new();
            document.insert("Resources".to_string(), Value::Object(resources));
            Value::Object(document)
        }
        None => fragment,
    };

    emit(&document, session.output(args.output), args.out.as_deref())
}
