//! Churnlens investigation CLI
//!
//! Runs one investigation through the pipeline and prints the why-aware
//! response.
//!
//! Examples:
//!   churnlens-investigate --fixture graph.json --query "Why did 7590-VHVEG churn?" \
//!       --source internet:fiber-optic --target churn:7590-VHVEG
//!   churnlens-investigate --query "Who churned?" \
//!       --cypher 'MATCH (c:Customer {customerStatus: $status}) RETURN c.id AS id' \
//!       --param status=Churned --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use churnlens_kb::{context, DataPacket};
use churnlens_pipeline::{
    build_store, InvestigationRequest, Pipeline, PipelineConfig, Settings, StoreSource,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Investigate churn causes over a causal knowledge graph",
    long_about = None
)]
struct Cli {
    /// Question being investigated
    #[arg(long, default_value = "")]
    query: String,

    /// Retrieval query whose rows become observed facts
    #[arg(long)]
    cypher: Option<String>,

    /// Bound parameter for the retrieval query, as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, DataPacket)>,

    /// Start node (id or name) for causal path explanation
    #[arg(long)]
    source: Option<String>,

    /// Outcome node (id or name) to explain and find interventions for
    #[arg(long)]
    target: Option<String>,

    /// Hop bound for causal path explanation
    #[arg(long)]
    max_depth: Option<i64>,

    /// Maximum number of interventions to rank
    #[arg(long)]
    limit: Option<usize>,

    /// Load the graph from a JSON fixture instead of connecting to Neo4j
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Run without any graph store
    #[arg(long, conflicts_with = "fixture")]
    offline: bool,

    /// Print the assembled context as JSON instead of the rendered text
    #[arg(long)]
    json: bool,

    /// Print the available context tools and exit
    #[arg(long)]
    list_tools: bool,
}

/// Parses `key=value`. Values that read as JSON scalars keep their type;
/// everything else is a string.
fn parse_param(raw: &str) -> Result<(String, DataPacket), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let packet = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) if !json.is_object() && !json.is_array() => DataPacket::from_json(json),
        _ => DataPacket::from(value),
    };
    Ok((key.to_string(), packet))
}

impl Cli {
    fn store_source(&self) -> StoreSource {
        match (&self.fixture, self.offline) {
            (_, true) => StoreSource::Offline,
            (Some(path), false) => StoreSource::Fixture(path.clone()),
            (None, false) => StoreSource::Neo4j,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env();
    churnlens_kb::init_tracing(&settings.log_filter);

    if cli.list_tools {
        println!("{}", serde_json::to_string_pretty(&context::tools())?);
        return Ok(());
    }

    let mut config = PipelineConfig::from_settings(&settings);
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    if let Some(limit) = cli.limit {
        config.intervention_limit = limit;
    }
    let source = cli.store_source();
    let store = build_store(&source, &settings)
        .await
        .with_context(|| format!("Failed to build graph store from {:?}", source))?;
    if let Some(store) = store {
        config = config.with_client(store);
    }

    let mut request = InvestigationRequest::new(cli.query.clone());
    request.cypher = cli.cypher.clone();
    request.source_id = cli.source.clone();
    request.target_id = cli.target.clone();
    request.params = cli.params.iter().cloned().collect();

    let outcome = Pipeline::new(config).invoke(request).await;
    for error in &outcome.state.errors {
        warn!("Degraded stage: {}", error);
    }

    if cli.json {
        let ctx = outcome
            .context()
            .context("Pipeline finished without a context")?;
        println!("{}", serde_json::to_string_pretty(ctx)?);
    } else {
        println!("{}", outcome.response());
    }
    Ok(())
}
