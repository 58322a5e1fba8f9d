//! Synth command - Import a template and synthesize it again.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tracing::info;

use cfnkit_template::{load_structured_file, obscure_template, Scope, Template};

use super::{emit, parse_binding, resolver_with, Session};
use crate::config::OutputFormat;

#[derive(Args)]
pub struct SynthArgs {
    /// Template file (JSON or YAML)
    #[arg(short, long)]
    template: PathBuf,

    /// Context binding for deferred values (repeatable)
    #[arg(long = "bind", value_name = "KEY=VALUE", value_parser = parse_binding)]
    bindings: Vec<(String, Value)>,

    /// Drop bootstrap-version rules from the output
    #[arg(long)]
    obscure: bool,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Write to a file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

pub fn execute(args: SynthArgs, session: &Session) -> Result<()> {
    info!("Synthesizing {}", args.template.display());

    let source = load_structured_file(&args.template)?;
    let mut template = Template::import(&source, &session.registry, &Scope::root())
        .with_context(|| format!("Failed to import {}", args.template.display()))?;

    let resolver = resolver_with(&args.bindings);
    let mut document = template
        .synthesize(&session.registry, &resolver)
        .with_context(|| format!("Failed to synthesize {}", args.template.display()))?;

    if args.obscure {
        document = obscure_template(document);
    }

    emit(&document, session.output(args.output), args.out.as_deref())
}
