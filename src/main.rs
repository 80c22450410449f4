//! congo CLI: symbolic reasoning over knowledge-graph triples.
//!
//! Requests arrive as flags or `--json` payloads; every response is JSON on
//! stdout. The process exits 0 whenever a well-formed request was served:
//! a failed proof or an error-typed query result is a result, not an error.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;

use congo_core::engine::{Engine, EngineConfig};
use congo_core::error::RequestError;
use congo_core::graph::Triple;
use congo_core::proof::ProofTree;
use congo_core::query::QueryResult;
use congo_core::request::{PathRequest, PatternRequest, ProveRequest};

#[derive(Parser)]
#[command(
    name = "congo",
    version,
    about = "Symbolic reasoning core: triple queries and proof search"
)]
struct Cli {
    /// Connection string for the external triple table
    /// (overrides the CLOUD_DB_URL environment variable).
    #[arg(long, global = true)]
    db_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Triple pattern query; absent positions are wildcards.
    Pattern {
        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        predicate: Option<String>,

        #[arg(long)]
        object: Option<String>,

        /// Full request as JSON (may also carry triples to populate the
        /// store); overrides the individual flags.
        #[arg(long)]
        json: Option<String>,
    },

    /// Follow a predicate path from a start node.
    Path {
        /// Start node name.
        #[arg(long)]
        start: Option<String>,

        /// Comma-separated predicate names.
        #[arg(long)]
        path: Option<String>,

        /// Full request as JSON; overrides the individual flags.
        #[arg(long)]
        json: Option<String>,
    },

    /// Run a SPARQL query (SELECT, CONSTRUCT, or ASK).
    Sparql {
        /// Inline SPARQL query string.
        #[arg(long)]
        query: Option<String>,

        /// Path to a SPARQL query file (.rq).
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Translate a natural-language query with string heuristics.
    Natural {
        /// The query text.
        query: Vec<String>,
    },

    /// Prove a goal from facts and rules.
    Prove {
        /// Full request as JSON: {goal, facts, rules, strategy}.
        #[arg(long)]
        json: Option<String>,

        /// Goal text (no facts or rules; backward chaining).
        goal: Vec<String>,
    },

    /// Show store statistics.
    Stats,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,oxigraph=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Explicit --db-url wins; the environment variable is read here, at the
    // edge, and threaded through the configuration.
    let db_url = cli
        .db_url
        .clone()
        .or_else(|| std::env::var("CLOUD_DB_URL").ok());
    let config = EngineConfig {
        db_url,
        ..Default::default()
    };

    match cli.command {
        Commands::Pattern {
            subject,
            predicate,
            object,
            json,
        } => {
            let request: PatternRequest = match json {
                Some(payload) => parse_json(&payload)?,
                None => PatternRequest {
                    subject,
                    predicate,
                    object,
                    triples: Vec::new(),
                },
            };
            let mut engine = Engine::new(config);
            engine.add_triples(request.triples.into_iter().map(Triple::from));
            let result = engine.query_pattern(
                request.subject.as_deref(),
                request.predicate.as_deref(),
                request.object.as_deref(),
            );
            emit_query(&engine, &result)
        }

        Commands::Path { start, path, json } => {
            let request: PathRequest = match json {
                Some(payload) => parse_json(&payload)?,
                None => PathRequest {
                    start: start.ok_or(RequestError::MissingField {
                        field: "start".to_string(),
                    })
                    .map_err(miette::Report::new)?,
                    path: path
                        .map(|p| p.split(',').map(|s| s.trim().to_string()).collect())
                        .unwrap_or_default(),
                    triples: Vec::new(),
                },
            };
            let mut engine = Engine::new(config);
            engine.add_triples(request.triples.into_iter().map(Triple::from));
            let result = engine.query_path(&request.start, &request.path);
            emit_query(&engine, &result)
        }

        Commands::Sparql { query, file } => {
            let query = match (query, file) {
                (Some(q), _) => q,
                (None, Some(path)) => std::fs::read_to_string(path).into_diagnostic()?,
                (None, None) => {
                    return Err(miette::Report::new(RequestError::MissingField {
                        field: "query".to_string(),
                    }));
                }
            };
            let engine = Engine::new(config);
            let result = engine.query_sparql(&query);
            emit_query(&engine, &result)
        }

        Commands::Natural { query } => {
            let engine = Engine::new(config);
            let result = engine.query_natural(&query.join(" "));
            emit_query(&engine, &result)
        }

        Commands::Prove { json, goal } => {
            let request: ProveRequest = match json {
                Some(payload) => parse_json(&payload)?,
                None => ProveRequest {
                    goal: goal.join(" "),
                    facts: Vec::new(),
                    rules: Vec::new(),
                    strategy: None,
                },
            };
            let engine = Engine::new(config);
            let tree = engine.prove(
                &request.goal,
                &request.facts(),
                &request.rules(),
                request.strategy(),
            );
            emit_proof(&request.goal, &tree)
        }

        Commands::Stats => {
            let engine = Engine::new(config);
            let output = serde_json::json!({
                "success": true,
                "statistics": engine.stats(),
            });
            print_json(&output)
        }
    }
}

fn parse_json<T: DeserializeOwned>(payload: &str) -> Result<T> {
    serde_json::from_str(payload).map_err(|e| {
        miette::Report::new(RequestError::MalformedJson {
            message: e.to_string(),
        })
    })
}

fn emit_query(engine: &Engine, result: &QueryResult) -> Result<()> {
    let output = serde_json::json!({
        "success": true,
        "result": result,
        "statistics": engine.stats(),
    });
    print_json(&output)
}

fn emit_proof(goal: &str, tree: &ProofTree) -> Result<()> {
    let output = serde_json::json!({
        "success": true,
        "goal": goal,
        "proof": tree,
    });
    print_json(&output)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).into_diagnostic()?
    );
    Ok(())
}
