use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use facetq::editor::hydrate_definition;
use facetq::{
    binding_choices, build_execution_request, evaluate, grouping_value_options, parser, Calculation, CatalogService,
    Edit, QueryConfiguration, QueryEditor, RegistrySnapshot, Runnability, ScopedVars, StaticCatalog,
};

#[derive(Parser)]
#[command(name = "facetq")]
#[command(about = "Inspect, build and resolve faceted query configurations")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a stored configuration can run, and why not
    Check {
        /// Query configuration (YAML or JSON)
        query: PathBuf,

        /// Catalog document used to attach the filter definition
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Resolve a stored configuration into an execution request
    Resolve {
        /// Query configuration (YAML or JSON)
        query: PathBuf,

        #[arg(long)]
        catalog: PathBuf,

        /// Variable registry snapshot
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Scoped override as REGISTRY_ID=VALUE (repeatable)
        #[arg(long = "scoped", value_parser = parse_scoped)]
        scoped: Vec<(String, String)>,
    },
    /// Build a configuration step by step and print each request it runs
    Build {
        #[arg(long)]
        catalog: PathBuf,

        /// Filter definition id
        #[arg(long)]
        filter: String,

        /// Aggregation id, if the filter offers several
        #[arg(long)]
        aggregation: Option<i64>,

        /// Calculation, e.g. SUM or PERCENTILES
        #[arg(long)]
        calculation: Option<String>,

        #[arg(long)]
        percentile: Option<String>,

        #[arg(long)]
        limit: Option<String>,
    },
    /// List what a grouping can be bound to
    Choices {
        /// Variable registry snapshot
        registry: PathBuf,
    },
    /// List candidate values of a grouping
    Values {
        #[arg(long)]
        catalog: PathBuf,

        #[arg(long)]
        filter: String,

        #[arg(long)]
        grouping: String,

        /// Prepend the "Aggregate All" option
        #[arg(long)]
        aggregate: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("facetq=info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Check { query, catalog } => handle_check(query, catalog),
        Commands::Resolve { query, catalog, registry, scoped } => handle_resolve(query, catalog, registry, scoped),
        Commands::Build { catalog, filter, aggregation, calculation, percentile, limit } => {
            handle_build(catalog, filter, aggregation, calculation, percentile, limit)
        }
        Commands::Choices { registry } => handle_choices(registry),
        Commands::Values { catalog, filter, grouping, aggregate } => handle_values(catalog, filter, grouping, aggregate),
    }
}

/// Load a stored configuration and attach its definition from the catalog
fn load_query(query: &Path, catalog: &Path) -> Result<QueryConfiguration> {
    let config = parser::parse_query_file(query).with_context(|| format!("loading {}", query.display()))?;
    let catalog = parser::parse_catalog_file(catalog).with_context(|| format!("loading {}", catalog.display()))?;
    Ok(hydrate_definition(config, &catalog.filter_definitions))
}

fn handle_check(query: PathBuf, catalog: PathBuf) -> Result<()> {
    let config = load_query(&query, &catalog)?;

    match evaluate(&config) {
        Runnability::Runnable => {
            println!("runnable: {}", config.display_label().unwrap_or("-"));
            Ok(())
        }
        Runnability::Blocked(blocker) => {
            println!("blocked: {}", blocker);
            std::process::exit(1);
        }
    }
}

fn handle_resolve(
    query: PathBuf,
    catalog: PathBuf,
    registry: Option<PathBuf>,
    scoped: Vec<(String, String)>,
) -> Result<()> {
    let config = load_query(&query, &catalog)?;
    let snapshot = match registry {
        Some(path) => parser::parse_registry_file(&path).with_context(|| format!("loading {}", path.display()))?,
        None => RegistrySnapshot::default(),
    };
    let scoped: ScopedVars = scoped.into_iter().collect();

    if let Runnability::Blocked(blocker) = evaluate(&config) {
        bail!("configuration cannot run: {}", blocker);
    }

    let request = build_execution_request(&config, &snapshot, &scoped);
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

fn handle_build(
    catalog: PathBuf,
    filter: String,
    aggregation: Option<i64>,
    calculation: Option<String>,
    percentile: Option<String>,
    limit: Option<String>,
) -> Result<()> {
    let catalog = StaticCatalog::from(parser::parse_catalog_file(&catalog)?);
    let definition = catalog
        .get_definition(&filter)
        .cloned()
        .with_context(|| format!("unknown filter '{}'", filter))?;

    // 1. Collect the edits in the order a user would make them
    let mut edits = vec![Edit::Filter(definition)];
    if let Some(id) = aggregation {
        edits.push(Edit::AggregationId(id));
    }
    if let Some(calculation) = calculation {
        let calculation = calculation.parse::<Calculation>()?;
        edits.push(Edit::Calculation(Some(calculation)));
    }
    if let Some(text) = percentile {
        edits.push(Edit::Percentile(text));
    }
    if let Some(text) = limit {
        edits.push(Edit::Limit(text));
    }

    // 2. Apply them, printing every request the editor runs
    let snapshot = RegistrySnapshot::default();
    let scoped = ScopedVars::new();
    let mut editor = QueryEditor::new(QueryConfiguration::new(), |config: &QueryConfiguration| {
        let request = build_execution_request(config, &snapshot, &scoped);
        match serde_json::to_string(&request) {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("failed to encode request: {}", err),
        }
    });

    for edit in edits {
        let outcome = editor.apply(edit)?;
        match &outcome.state {
            Runnability::Runnable => info!(triggered = outcome.triggered, "runnable"),
            Runnability::Blocked(blocker) => info!(%blocker, "blocked"),
        }
    }

    if let Runnability::Blocked(blocker) = editor.state() {
        bail!("configuration still blocked: {}", blocker);
    }
    Ok(())
}

fn handle_choices(registry: PathBuf) -> Result<()> {
    let snapshot = parser::parse_registry_file(&registry)?;
    for choice in binding_choices(&snapshot) {
        println!(
            "{:<12} {:<24} {}{}",
            choice.id,
            choice.label,
            choice.description.as_deref().unwrap_or(""),
            if choice.disabled { " (disabled)" } else { "" }
        );
    }
    Ok(())
}

fn handle_values(catalog: PathBuf, filter: String, grouping: String, aggregate: bool) -> Result<()> {
    let catalog = StaticCatalog::from(parser::parse_catalog_file(&catalog)?);
    let values = catalog.list_grouping_values(&filter, &grouping)?;
    for option in grouping_value_options(&values, aggregate) {
        println!("{}\t{}", option.value, option.text);
    }
    Ok(())
}

fn parse_scoped(s: &str) -> Result<(String, String), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected REGISTRY_ID=VALUE, got '{}'", s))?;
    Ok((id.to_string(), value.to_string()))
}
