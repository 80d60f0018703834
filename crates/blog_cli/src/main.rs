//! Command-line entry point.
//!
//! Opens the blog database, builds the GraphQL schema once and executes one
//! document against it, printing the JSON response to stdout.

use anyhow::{anyhow, bail, Context, Result};
use async_graphql::{Request, Response, Variables};
use blog_core::db::{open_db, open_db_in_memory};
use blog_core::{default_log_level, init_logging, BlogService, SqliteBlogRepository};
use blog_graphql::build_schema;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "blog_cli", version, about = "Run a GraphQL document against the blog database")]
struct Args {
    /// SQLite database file; an in-memory database is used when omitted.
    #[arg(long, env = "BLOG_DB_PATH")]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "BLOG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when omitted.
    #[arg(long, env = "BLOG_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// JSON object with the document's variables.
    #[arg(long)]
    variables: Option<String>,

    /// GraphQL query or mutation document.
    document: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, args.log_dir.as_deref()).map_err(|err| anyhow!(err))?;
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        blog_core::core_version()
    );

    let response = run(args).await?;
    let failed = response.is_err();
    info!(
        "event=cli_execute module=cli status={} error_count={}",
        if failed { "error" } else { "ok" },
        response.errors.len()
    );

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Opens the configured database and executes the document once.
///
/// Domain failures live in the response payloads; only engine-level errors
/// show up in `Response::errors`.
async fn run(args: Args) -> Result<Response> {
    let conn = match &args.db {
        Some(path) => open_db(path)
            .with_context(|| format!("failed to open database `{}`", path.display()))?,
        None => open_db_in_memory().context("failed to open in-memory database")?,
    };
    let repo = SqliteBlogRepository::try_new(conn).context("database is not ready")?;
    let schema = build_schema(BlogService::new(repo));

    let mut request = Request::new(args.document);
    if let Some(raw) = args.variables.as_deref() {
        request = request.variables(parse_variables(raw)?);
    }

    Ok(schema.execute(request).await)
}

fn parse_variables(raw: &str) -> Result<Variables> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("--variables must be a JSON object")?;
    match value {
        serde_json::Value::Object(_) => Ok(Variables::from_json(value)),
        other => bail!("--variables must be a JSON object, got `{other}`"),
    }
}
