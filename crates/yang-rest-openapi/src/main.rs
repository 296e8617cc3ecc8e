//! CLI for `yang-rest-openapi`.
//!
//! # Subcommands
//!
//! ```text
//! # Compile a tree description into an OpenAPI 3 document (YAML on stdout)
//! yang-rest-openapi generate --tree testdevice.tree.yaml --model-type testdevice
//!
//! # Settings from a file, flags override, JSON to a file
//! yang-rest-openapi generate \
//!   --tree testdevice.tree.yaml \
//!   --config openapi/settings.yaml \
//!   --model-version 1.0.x \
//!   --format json -o openapi.json
//!
//! # Node counts and list paths of a tree
//! yang-rest-openapi inspect --tree testdevice.tree.yaml
//! ```

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use yang_rest_core::{NodeKind, SchemaTree};
use yang_rest_openapi::{Document, GeneratorSettings};

/// `OpenAPI` 3 generator for onos-config model plugins.
#[derive(Parser)]
#[command(name = "yang-rest-openapi", version, about)]
enum Cli {
    /// Compile a schema tree into an `OpenAPI` document.
    Generate(GenerateArgs),

    /// Print a summary of a schema tree.
    Inspect(InspectArgs),
}

#[derive(Parser)]
struct GenerateArgs {
    /// Tree description file (YAML, or JSON with a `.json` extension).
    #[arg(short, long)]
    tree: PathBuf,

    /// Generator settings YAML file. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model type, e.g. `testdevice`.
    #[arg(long)]
    model_type: Option<String>,

    /// Model version, e.g. `1.0.x`.
    #[arg(long)]
    model_version: Option<String>,

    /// Document title.
    #[arg(long)]
    title: Option<String>,

    /// Document description.
    #[arg(long)]
    description: Option<String>,

    /// Name of the device-selecting path parameter.
    #[arg(long)]
    target_alias: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Write the document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File whose lines are prepended as `#` comments (YAML output only).
    #[arg(long)]
    license_header: Option<PathBuf>,

    /// Log the tree walk (`debug` level).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser)]
struct InspectArgs {
    /// Tree description file (YAML, or JSON with a `.json` extension).
    #[arg(short, long)]
    tree: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli {
        Cli::Generate(args) => {
            init_tracing(args.verbose);
            run_generate(&args)
        }
        Cli::Inspect(args) => {
            init_tracing(false);
            run_inspect(&args)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => {
            eprintln!("Loading settings: {}", path.display());
            GeneratorSettings::load(path)
                .with_context(|| format!("Failed to load settings: {}", path.display()))?
        }
        None => GeneratorSettings::default(),
    };
    let settings = apply_cli_overrides(settings, args);

    let tree = yang_rest_openapi::load_tree(&args.tree)
        .with_context(|| format!("Failed to load tree: {}", args.tree.display()))?;
    eprintln!("Loaded {} schema nodes from {}", tree.len(), args.tree.display());

    let doc = yang_rest_openapi::build_openapi(&tree, &settings)
        .context("Failed to generate OpenAPI document")?;
    eprintln!(
        "Generated {} paths, {} schemas",
        doc.paths.len(),
        doc.components.schemas.len(),
    );

    let rendered = render(&doc, args)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            eprintln!("Wrote OpenAPI document to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Apply CLI flags that override settings file values.
fn apply_cli_overrides(mut settings: GeneratorSettings, args: &GenerateArgs) -> GeneratorSettings {
    if let Some(ref v) = args.model_type {
        settings = settings.model_type(v);
    }
    if let Some(ref v) = args.model_version {
        settings = settings.model_version(v);
    }
    if let Some(ref v) = args.title {
        settings = settings.title(v);
    }
    if let Some(ref v) = args.description {
        settings = settings.description(v);
    }
    if let Some(ref v) = args.target_alias {
        settings = settings.target_alias(v);
    }
    settings
}

fn render(doc: &Document, args: &GenerateArgs) -> anyhow::Result<String> {
    match args.format {
        Format::Json => {
            let mut out =
                serde_json::to_string_pretty(doc).context("Failed to serialize document")?;
            out.push('\n');
            Ok(out)
        }
        Format::Yaml => {
            let body = serde_yaml_ng::to_string(doc).context("Failed to serialize document")?;
            let Some(path) = &args.license_header else {
                return Ok(body);
            };
            let header = fs::read_to_string(path)
                .with_context(|| format!("Failed to read license header: {}", path.display()))?;
            let mut out = String::new();
            for line in header.lines() {
                if line.is_empty() {
                    out.push_str("#\n");
                } else {
                    out.push_str("# ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            out.push('\n');
            out.push_str(&body);
            Ok(out)
        }
    }
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let tree = yang_rest_openapi::load_tree(&args.tree)
        .with_context(|| format!("Failed to load tree: {}", args.tree.display()))?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, node) in tree.iter().skip(1) {
        *counts.entry(node.kind.keyword()).or_default() += 1;
    }

    println!("{}: {} nodes", tree.node(tree.root()).name, tree.len());
    for (kind, count) in &counts {
        println!("  {kind:<10} {count}");
    }

    let lists = list_paths(&tree);
    if !lists.is_empty() {
        println!("lists:");
        for (path, keys) in lists {
            println!("  {path} [{}]", keys.join(" "));
        }
    }
    Ok(())
}

fn list_paths(tree: &SchemaTree) -> Vec<(String, Vec<String>)> {
    tree.iter()
        .filter_map(|(id, node)| match &node.kind {
            NodeKind::List(attr) => Some((tree.path_of(id), attr.keys.clone())),
            _ => None,
        })
        .collect()
}
