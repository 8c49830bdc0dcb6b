//! stmtc command-line front end.
//!
//! Compiles entity snapshots and update/delete queries into the statements a
//! live migration would replay, using a schema described in JSON.

mod error;
mod formatter;
mod params;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use formatter::OutputFormat;
use std::path::{Path, PathBuf};
use stmtc::{
    tokenize, BuilderConfig, Catalog, EntityObject, Query, SchemaBundle, StatementBuilder,
    StatementKind,
};

/// stmtc statement compiler
#[derive(Parser, Debug)]
#[command(name = "stmtc")]
#[command(version, about = "Compile entities and queries into migration statements")]
pub struct Args {
    /// Schema file (JSON entity mappings)
    #[arg(short = 's', long, global = true)]
    pub schema: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    /// Do not follow cascade policies
    #[arg(long, global = true)]
    pub no_cascades: bool,

    /// Maximum cascade depth
    #[arg(long, default_value_t = stmtc::DEFAULT_MAX_CASCADE_DEPTH, global = true)]
    pub max_depth: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile an UPDATE or DELETE query
    #[command(alias = "compile-query")]
    Query {
        /// Query text
        text: String,

        /// Parameter binding, repeatable (name=value)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },
    /// Compile an entity snapshot (JSON) into ordered statements
    #[command(alias = "compile-entity")]
    Entity {
        /// Entity file
        file: PathBuf,

        /// Statement kind to build
        #[arg(short = 'k', long, value_enum, default_value = "insert")]
        kind: Kind,
    },
    /// Print the tokens of a query
    Tokens {
        /// Query text
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Insert,
    Update,
    Delete,
}

impl From<Kind> for StatementKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Insert => StatementKind::Insert,
            Kind::Update => StatementKind::Update,
            Kind::Delete => StatementKind::Delete,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stmtc=info")),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<String, CliError> {
    let config = BuilderConfig::new()
        .with_follow_cascades(!args.no_cascades)
        .with_max_cascade_depth(args.max_depth);

    match args.command {
        Command::Tokens { text } => Ok(tokenize(&text)
            .iter()
            .filter(|t| t.is_significant())
            .map(|t| {
                format!(
                    "{:>4}..{:<4} {:<20} {}",
                    t.span.start,
                    t.span.end,
                    t.kind.to_string(),
                    t.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
        Command::Query { text, params } => {
            let catalog = load_catalog(args.schema.as_deref())?;
            let mut query = Query::new(text.as_str());
            for param in &params {
                let (name, value) = params::parse_param(param)?;
                query.set_parameter(name, value);
            }
            let statements = StatementBuilder::for_query(&catalog, &query)
                .map(|b| b.with_config(config))
                .and_then(|b| b.build_query(&query))
                .map_err(|e| match e {
                    stmtc::Error::MalformedQuery(_) => CliError::Input {
                        what: "query",
                        message: e.format_with_source(&text),
                    },
                    other => other.into(),
                })?;
            formatter::format_statements(statements, args.format)
        }
        Command::Entity { file, kind } => {
            let catalog = load_catalog(args.schema.as_deref())?;
            let entity: EntityObject = serde_json::from_str(&read(&file)?).map_err(|e| {
                CliError::Input {
                    what: "entity file",
                    message: e.to_string(),
                }
            })?;
            let statements = StatementBuilder::new(&catalog, kind.into())
                .with_config(config)
                .build_entity(&entity)?;
            formatter::format_statements(statements, args.format)
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, CliError> {
    let path = path.ok_or_else(|| CliError::Input {
        what: "arguments",
        message: "--schema is required".to_string(),
    })?;
    let bundle = SchemaBundle::from_json(&read(path)?)?;
    tracing::debug!(
        path = %path.display(),
        entities = bundle.entities.len(),
        "schema loaded"
    );
    Ok(Catalog::new(bundle)?)
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/schema.json");
    const ALICE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/alice.json");

    fn run_args(args: &[&str]) -> Result<String, CliError> {
        run(Args::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_compile_entity() {
        let out = run_args(&["stmtc", "--schema", SCHEMA, "entity", ALICE, "--kind", "delete"])
            .unwrap();
        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec![
                "DELETE FROM EMPLOYEE_PROJECT WHERE EMPLOYEE_ID = 'E1' AND PROJECT_ID = 'P1'",
                "DELETE FROM EMPLOYEE_PROJECT WHERE EMPLOYEE_ID = 'E1' AND PROJECT_ID = 'P2'",
                "DELETE FROM EMPLOYEE WHERE EMPLOYEE_ID = 'E1'",
                "DELETE FROM PHONE WHERE PHONE_ID = 1",
            ]
        );
    }

    #[test]
    fn test_compile_entity_without_cascades() {
        let out = run_args(&["stmtc", "--schema", SCHEMA, "--no-cascades", "entity", ALICE])
            .unwrap();
        assert_eq!(out.lines().count(), 3);
        assert!(out.starts_with("INSERT INTO EMPLOYEE "));
    }

    #[test]
    fn test_compile_query() {
        let out = run_args(&[
            "stmtc",
            "query",
            "UPDATE Employee e SET e.salary = :s WHERE e.name = :n",
            "-p",
            "s=5000",
            "-p",
            "n=Bob",
            "--schema",
            SCHEMA,
        ])
        .unwrap();
        assert_eq!(out, "UPDATE EMPLOYEE SET SALARY = 5000 WHERE NAME = 'Bob'");
    }

    #[test]
    fn test_malformed_query_shows_source() {
        let err = run_args(&["stmtc", "-s", SCHEMA, "query", "DELETE FROM Employee"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("expected identifier, found end of input"), "{}", message);
        assert!(message.contains("line 1:21"), "{}", message);
    }

    #[test]
    fn test_schema_required() {
        let err = run_args(&["stmtc", "query", "DELETE FROM Employee e"]).unwrap_err();
        assert!(matches!(err, CliError::Input { what: "arguments", .. }));
    }

    #[test]
    fn test_tokens() {
        let out = run_args(&["stmtc", "tokens", "DELETE FROM e"]).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("DELETE"));
        assert!(lines[2].contains("identifier"));
        assert!(lines[2].ends_with(" e"));
    }
}
