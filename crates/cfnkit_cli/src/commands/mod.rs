//! CLI command definitions.
//!
//! Every command works against the schema registry loaded from the
//! configured catalog directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use cfnkit_core::{IntrinsicResolver, PropertyValue};
use cfnkit_schema::{PropertySchema, SchemaLoader, SchemaRegistry};
use cfnkit_template::{deserialize_structure, serialize_structure};

use crate::config::{CliConfig, OutputFormat};
use crate::error::CliError;

pub mod import;
pub mod render;
pub mod schemas;
pub mod synth;
pub mod validate;

/// cfnkit - schema-driven CloudFormation resource properties
#[derive(Parser)]
#[command(name = "cfnkit")]
#[command(version, about = "cfnkit - schema-driven CloudFormation resource properties")]
#[command(long_about = r#"
cfnkit validates, renders and imports CloudFormation resource properties
using declarative schema catalogs instead of per-resource code.

COMMANDS:
  validate  → Check a property file against a resource schema
  render    → Render a property file into a template fragment
  import    → Parse a template into idiomatic property bags
  synth     → Import a template and synthesize it again
  schemas   → List or describe the loaded schemas

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Parse or import failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a cfnkit.toml file
    #[arg(long, global = true, env = "CFNKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Schema catalog directory (repeatable; replaces the configured ones)
    #[arg(long = "schemas", global = true, value_name = "DIR")]
    pub schema_dirs: Vec<PathBuf>,

    /// Accept property names the schema does not declare
    #[arg(long, global = true)]
    pub allow_unknown: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a property file against a resource schema
    Validate(validate::ValidateArgs),

    /// Render a property file into a template fragment
    Render(render::RenderArgs),

    /// Import a template into idiomatic property bags
    Import(import::ImportArgs),

    /// Import a template and synthesize it again
    Synth(synth::SynthArgs),

    /// List or describe the loaded schemas
    Schemas(schemas::SchemasArgs),
}

/// Configuration and schemas shared by every command.
pub struct Session {
    pub config: CliConfig,
    pub registry: SchemaRegistry,
}

impl Session {
    pub fn open(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = CliConfig::load(cli.config.as_deref(), &cwd)?
            .with_schema_dirs(cli.schema_dirs.clone())
            .allow_unknown(cli.allow_unknown);

        let registry = load_registry(&config.schema_dirs)?;
        Ok(Self { config, registry })
    }

    /// Resource schema for `type_name`.
    pub fn resource_schema(&self, type_name: &str) -> Result<&PropertySchema> {
        self.registry
            .get(type_name)
            .filter(|s| s.is_resource())
            .ok_or_else(|| CliError::UnknownType(type_name.to_string()).into())
    }

    pub fn output(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.unwrap_or(self.config.output)
    }
}

fn load_registry(dirs: &[PathBuf]) -> Result<SchemaRegistry> {
    let Some((first, rest)) = dirs.split_first() else {
        return Ok(SchemaRegistry::new());
    };
    let loader = rest
        .iter()
        .fold(SchemaLoader::new(first), |loader, dir| loader.with_path(dir));
    Ok(loader.load_all()?)
}

/// Read an idiomatic (camelCase) property file, JSON or YAML.
pub fn load_properties(path: &Path) -> Result<PropertyValue> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read properties from {}", path.display()))?;
    let value = deserialize_structure(&content)
        .with_context(|| format!("Failed to parse properties from {}", path.display()))?;
    Ok(PropertyValue::from_json(&value))
}

/// Parse a `KEY=VALUE` context binding; the value is JSON when it parses as
/// JSON and a plain string otherwise.
pub fn parse_binding(input: &str) -> std::result::Result<(String, Value), String> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", input))?;
    if key.is_empty() {
        return Err(format!("empty key in binding {:?}", input));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

pub fn resolver_with(bindings: &[(String, Value)]) -> IntrinsicResolver {
    bindings
        .iter()
        .fold(IntrinsicResolver::new(), |resolver, (key, value)| {
            resolver.with_binding(key.clone(), value.clone())
        })
}

/// Write a document to `out`, or to stdout when no path is given.
pub fn emit(value: &Value, format: OutputFormat, out: Option<&Path>) -> Result<()> {
    let text = serialize_structure(value, format.is_json())?;
    match out {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", text.trim_end()),
    }
    Ok(())
}
