// Wrapper around the wrangler d1 CLI, invoked through npx
use serde::Deserialize;
use std::ffi::OsString;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Failure modes of a single `wrangler d1 execute` invocation
#[derive(Debug, Error)]
pub enum D1Error {
    #[error("Failed to launch {program}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {stderr}")]
    CommandFailed { stderr: String },

    #[error("Unexpected output from wrangler: {0}")]
    BadOutput(String),
}

/// One result set from `wrangler d1 execute --json`. The CLI prints a JSON
/// array of these on stdout, one per executed statement.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub results: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Handle for ad-hoc SQL against a local D1 database instance
pub struct D1Database {
    database: String,
    program: OsString,
}

impl D1Database {
    /// Open a handle to the named local database. Verifies that npx is
    /// available up front so the failure is reported before any SQL runs.
    pub fn open(database: &str) -> anyhow::Result<Self> {
        if which::which("npx").is_err() {
            anyhow::bail!("'npx' not found in PATH (wrangler is invoked through npx)");
        }

        Ok(Self {
            database: database.to_string(),
            program: "npx".into(),
        })
    }

    /// Handle that invokes `program` instead of npx. Lets tests substitute
    /// a recording shim for the real wrangler CLI.
    pub fn with_program(database: &str, program: impl Into<OsString>) -> Self {
        Self {
            database: database.to_string(),
            program: program.into(),
        }
    }

    /// Run one SQL statement against the local database, blocking until the
    /// subprocess exits, and parse the result sets from its stdout.
    pub fn execute(&self, sql: &str) -> Result<Vec<ResultSet>, D1Error> {
        debug!(database = %self.database, %sql, "running wrangler d1 execute");

        let output = Command::new(&self.program)
            .args(["wrangler", "d1", "execute", "--local", "--json"])
            .arg(&self.database)
            .arg("--command")
            .arg(sql)
            .output()
            .map_err(|source| D1Error::Launch {
                program: self.program.to_string_lossy().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(D1Error::CommandFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| D1Error::BadOutput(format!("not valid result-set JSON: {}", e)))
    }
}

/// Escape a value for interpolation into a single-quoted SQL literal.
/// The wrangler CLI takes whole statements only, with no parameter binding,
/// so quoting is done here: embedded single quotes are doubled.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}
