// src/config.rs

use crate::auth::LocalAccount;
use crate::editor::FormInput;
use crate::models::{Difficulty, TestCase};
use crate::store::{SqliteStore, StoreError};
use clap::{Parser, Subcommand};

/// Competitive programming problem catalog
#[derive(Parser, Debug, Clone)]
#[command(name = "cp-catalog")]
#[command(about = "Browse, add and edit competitive programming problems")]
pub struct Args {
    /// SQLite database path (":memory:" for a throwaway store)
    #[arg(long, env = "CP_CATALOG_DB", default_value = "cp_catalog.db")]
    pub db: String,

    /// Uid of the local account the auth provider signs in
    #[arg(long, env = "CP_CATALOG_USER")]
    pub user: Option<String>,

    /// Display name of the local account
    #[arg(long, env = "CP_CATALOG_USER_NAME")]
    pub user_name: Option<String>,

    #[arg(long, env = "CP_CATALOG_USER_EMAIL")]
    pub user_email: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Do not sign in; render as an anonymous visitor
    #[arg(long)]
    pub signed_out: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the HTML for a route ("/" or "/problem/<id>")
    Render {
        #[arg(default_value = "/")]
        route: String,
    },

    /// Add a new problem
    Add(ProblemFields),

    /// Edit an existing problem; only the given fields change
    Edit {
        id: String,
        #[command(flatten)]
        fields: ProblemFields,
    },
}

/// Form fields settable from the command line.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProblemFields {
    #[arg(long)]
    pub name: Option<String>,

    /// easy, medium, hard (or 0, 1, 2)
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Comma separated
    #[arg(long)]
    pub tags: Option<String>,

    #[arg(long)]
    pub list: Option<String>,

    #[arg(long)]
    pub statement: Option<String>,

    #[arg(long)]
    pub input_format: Option<String>,

    #[arg(long)]
    pub output_format: Option<String>,

    #[arg(long)]
    pub constraints: Option<String>,

    /// Test case as "input|output" or "input|output|explanation". Repeatable;
    /// replaces all existing test cases.
    #[arg(long = "case", value_parser = parse_test_case)]
    pub cases: Vec<TestCase>,
}

impl ProblemFields {
    /// Overwrites the form fields that were given.
    pub fn apply(&self, form: &mut FormInput) {
        let text = [
            (&self.name, &mut form.problem_name),
            (&self.tags, &mut form.tags),
            (&self.list, &mut form.list),
            (&self.statement, &mut form.problem_statement),
            (&self.input_format, &mut form.input_format),
            (&self.output_format, &mut form.output_format),
            (&self.constraints, &mut form.constraints),
        ];
        for (given, field) in text {
            if let Some(value) = given {
                *field = value.clone();
            }
        }
        if let Some(difficulty) = self.difficulty {
            form.difficulty = difficulty;
        }
        if !self.cases.is_empty() {
            form.test_cases = self.cases.clone();
        }
    }
}

fn parse_test_case(raw: &str) -> Result<TestCase, String> {
    let unescaped = raw.replace("\\n", "\n");
    let mut parts = unescaped.splitn(3, '|');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(input), Some(output), explanation) => Ok(TestCase {
            input: input.to_string(),
            output: output.to_string(),
            explanation: explanation.map(str::to_string),
        }),
        _ => Err(format!("expected \"input|output[|explanation]\", got {raw:?}")),
    }
}

impl Args {
    /// The account to sign in, if a uid was configured.
    pub fn account(&self) -> Option<LocalAccount> {
        let uid = self.user.clone()?;
        Some(LocalAccount {
            display_name: self.user_name.clone().unwrap_or_else(|| uid.clone()),
            email: self.user_email.clone(),
            uid,
        })
    }

    pub fn open_store(&self) -> Result<SqliteStore, StoreError> {
        if self.db == ":memory:" {
            SqliteStore::open_in_memory()
        } else {
            SqliteStore::open(&self.db)
        }
    }
}
