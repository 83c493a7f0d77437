// src/main.rs

use clap::Parser;
use cp_catalog::auth::LocalAuthProvider;
use cp_catalog::config::{Args, Command, ProblemFields};
use cp_catalog::constants::PROBLEMS_COLLECTION;
use cp_catalog::editor::{ProblemEditor, SubmitOutcome};
use cp_catalog::models::DocId;
use cp_catalog::routes::Route;
use cp_catalog::store::{DocumentStore, SqliteStore};
use cp_catalog::AppContext;
use std::sync::Arc;

use log::{debug, error, info, warn};

fn render(app: &mut AppContext, route: &str) -> Result<String, String> {
    let route: Route = route.parse().map_err(|e: cp_catalog::routes::RouteError| e.to_string())?;
    Ok(app.render_route(&route))
}

fn add_problem(store: &dyn DocumentStore, fields: &ProblemFields) -> Result<SubmitOutcome, String> {
    let mut editor = ProblemEditor::create();
    editor.open();
    fields.apply(editor.form_mut());
    editor.submit(store).map_err(|e| e.to_string())
}

fn edit_problem(
    store: &dyn DocumentStore,
    id: DocId,
    fields: &ProblemFields,
) -> Result<SubmitOutcome, String> {
    let mut editor = ProblemEditor::edit(store, id);
    editor.pump(store).map_err(|e| e.to_string())?;
    editor.open();
    fields.apply(editor.form_mut());
    editor.submit(store).map_err(|e| e.to_string())
}

fn describe(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Skipped => "Nothing written: problem name is empty".to_string(),
        SubmitOutcome::Created { problem, meta } => format!("Created problem {problem} (meta {meta})"),
        SubmitOutcome::Updated { problem, meta } => {
            format!("Updated problem {problem} (meta {})", meta.path())
        }
    }
}

fn log_last_modified(store: &SqliteStore, outcome: &SubmitOutcome) {
    let problem = match outcome {
        SubmitOutcome::Skipped => return,
        SubmitOutcome::Created { problem, .. } | SubmitOutcome::Updated { problem, .. } => problem,
    };
    match store.last_modified(PROBLEMS_COLLECTION, problem) {
        Ok(Some(at)) => info!("Problem {} last modified at {}", problem, at.to_rfc3339()),
        Ok(None) => warn!("Problem {} has no stored timestamp", problem),
        Err(e) => warn!("Could not read timestamp of {}: {}", problem, e),
    }
}

fn run(args: Args) -> Result<(), String> {
    let store = Arc::new(args.open_store().map_err(|e| e.to_string())?);
    info!("Database: {}", args.db);
    let auth = LocalAuthProvider::new(args.account());
    let mut app = AppContext::start(store.clone(), Arc::new(auth));

    if args.signed_out {
        debug!("Staying signed out");
    } else if args.user.is_some() {
        if let Err(e) = app.sign_in() {
            debug!("Continuing signed out: {}", e);
        }
    }

    let result = match &args.command {
        Command::Render { route } => render(&mut app, route),
        Command::Add(fields) => add_problem(app.store.as_ref(), fields).map(|o| {
            log_last_modified(&store, &o);
            describe(&o)
        }),
        Command::Edit { id, fields } => {
            edit_problem(app.store.as_ref(), DocId::new(id.as_str()), fields).map(|o| {
                log_last_modified(&store, &o);
                describe(&o)
            })
        }
    };
    app.shutdown();

    println!("{}", result?);
    Ok(())
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    info!("Starting cp-catalog...");
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
