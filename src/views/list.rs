// src/views/list.rs

use super::{difficulty_badge, error_html, loading_html, status_badge, Badge};
use crate::auth::SessionContext;
use crate::constants::{APP_TITLE, PROBLEMS_COLLECTION};
use crate::editor::ProblemEditor;
use crate::models::{DocId, ProblemRecord};
use crate::render::{escape_html, tag_chips};
use crate::routes::Route;
use crate::store::{CollectionFeed, CollectionSnapshot, DocumentStore};
use log::{debug, warn};

/// One table row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRow {
    pub id: DocId,
    pub status: Badge,
    pub name: String,
    pub tags: Vec<String>,
    pub difficulty: Badge,
    pub list: String,
}

impl ProblemRow {
    pub fn from_record(id: DocId, record: &ProblemRecord) -> Self {
        ProblemRow {
            id,
            status: status_badge(record.status),
            name: record.problem_name.clone(),
            tags: record.tags.clone(),
            difficulty: difficulty_badge(record.difficulty),
            list: record.list.clone(),
        }
    }
}

/// What the list view shows, in precedence order.
#[derive(Debug, PartialEq, Eq)]
pub enum ListState<'a> {
    SignInRequired,
    Loading,
    Failed(&'a str),
    Ready(&'a [ProblemRow]),
}

/// Filter controls. They are displayed but not applied to the rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBar {
    pub search: String,
}

impl FilterBar {
    pub fn to_html(&self) -> String {
        let mut out = String::from("<div class=\"w-full flex items-center justify-center gap-4\">");
        for label in ["List", "Difficulty", "Tags"] {
            out.push_str(&format!(
                "<button class=\"p-4 pl-6 pr-5 border-2 border-zinc-700 flex justify-between items-center gap-2\">{label}</button>"
            ));
        }
        out.push_str(&format!(
            "<search class=\"w-full p-4 border-2 border-zinc-700 flex items-center gap-4\"><input type=\"text\" placeholder=\"Search for problems\" value=\"{}\"/></search>",
            escape_html(&self.search)
        ));
        out.push_str("<button class=\"p-4 border-2 border-zinc-700\">Settings</button></div>");
        out
    }
}

/// The catalog table. Holds a live feed of the problems collection for as long
/// as the view exists.
pub struct ListView {
    feed: CollectionFeed,
    rows: Option<Result<Vec<ProblemRow>, String>>,
    pub filters: FilterBar,
}

impl ListView {
    pub fn mount(store: &dyn DocumentStore) -> Self {
        debug!("ListView: subscribing to {}", PROBLEMS_COLLECTION);
        ListView {
            feed: store.watch_collection(PROBLEMS_COLLECTION),
            rows: None,
            filters: FilterBar::default(),
        }
    }

    /// Applies the newest pending snapshot. Returns true if anything changed.
    pub fn pump(&mut self) -> bool {
        let Some(next) = self.feed.latest() else {
            return false;
        };
        self.rows = Some(
            next.map(|snapshot| rows_from_snapshot(&snapshot))
                .map_err(|e| e.to_string()),
        );
        true
    }

    pub fn state(&self, session: &SessionContext) -> ListState<'_> {
        if !session.is_signed_in() {
            return ListState::SignInRequired;
        }
        match &self.rows {
            None => ListState::Loading,
            Some(Err(message)) => ListState::Failed(message),
            Some(Ok(rows)) => ListState::Ready(rows),
        }
    }

    pub fn rows(&self) -> &[ProblemRow] {
        match &self.rows {
            Some(Ok(rows)) => rows,
            _ => &[],
        }
    }

    /// Where clicking row `index` navigates.
    pub fn route_for_row(&self, index: usize) -> Option<Route> {
        self.rows()
            .get(index)
            .map(|row| Route::Problem(row.id.clone()))
    }

    /// The "Add Question" affordance: a blank editor, already open.
    pub fn add_question(&self) -> ProblemEditor {
        let mut editor = ProblemEditor::create();
        editor.open();
        editor
    }

    pub fn render(&self, session: &SessionContext) -> String {
        match self.state(session) {
            ListState::SignInRequired => sign_in_html(),
            ListState::Loading => loading_html(),
            ListState::Failed(message) => error_html(message),
            ListState::Ready(rows) => {
                let mut out = header_html();
                out.push_str(&self.filters.to_html());
                out.push_str(&table_html(rows));
                out
            }
        }
    }
}

fn rows_from_snapshot(snapshot: &CollectionSnapshot) -> Vec<ProblemRow> {
    snapshot
        .docs
        .iter()
        .filter_map(|doc| match doc.decode::<ProblemRecord>() {
            Ok(record) => Some(ProblemRow::from_record(doc.id.clone(), &record)),
            Err(e) => {
                warn!("Skipping undecodable problem: {}", e);
                None
            }
        })
        .collect()
}

fn sign_in_html() -> String {
    "<div class=\"w-full h-full flex items-center justify-center\"><button class=\"p-4 px-6 border-2 border-zinc-700 flex items-center gap-2\">Sign in with Google</button></div>".to_string()
}

fn header_html() -> String {
    format!(
        "<div class=\"flex items-center justify-between\"><h1 class=\"flex items-center gap-4 justify-center text-2xl\">{}</h1><button class=\"p-4 px-6 border-2 border-zinc-700 flex items-center gap-2\">Add Question</button></div>",
        escape_html(APP_TITLE)
    )
}

fn table_html(rows: &[ProblemRow]) -> String {
    let mut out = String::from(
        "<table class=\"w-full\"><thead><tr><th>Status</th><th>Problem</th><th>Difficulty</th><th>List</th></tr></thead><tbody>",
    );
    for row in rows {
        out.push_str(&format!(
            "<tr data-href=\"{}\" class=\"cursor-pointer\"><td class=\"py-4 px-6 border-b border-zinc-700 {}\">{}</td><td class=\"py-5 px-6 border-b border-zinc-700\"><div class=\"flex w-full flex-col gap-2\">{}<div class=\"flex w-full flex-wrap gap-2\">{}</div></div></td><td class=\"py-4 px-6 border-b border-zinc-700 {}\">{}</td><td class=\"py-4 px-6 border-b border-zinc-700\">{}</td></tr>",
            escape_html(&Route::Problem(row.id.clone()).to_string()),
            row.status.class,
            row.status.label,
            escape_html(&row.name),
            tag_chips(&row.tags),
            row.difficulty.class,
            row.difficulty.label,
            escape_html(&row.list),
        ));
    }
    out.push_str("</tbody></table>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthProvider, LocalAccount, LocalAuthProvider};
    use crate::store::{to_fields, DocumentStore, MemoryStore};
    use serde_json::json;

    fn signed_in() -> (LocalAuthProvider, SessionContext) {
        let provider = LocalAuthProvider::new(Some(LocalAccount {
            uid: "u1".to_string(),
            display_name: "Ada".to_string(),
            email: None,
        }));
        provider.sign_in_with_popup().unwrap();
        let session = SessionContext::init(&provider);
        (provider, session)
    }

    fn add(store: &MemoryStore, value: serde_json::Value) -> DocId {
        store
            .create_document(PROBLEMS_COLLECTION, to_fields(&value).unwrap())
            .unwrap()
    }

    #[test]
    fn gated_by_session() {
        let store = MemoryStore::new();
        let provider = LocalAuthProvider::new(None);
        let session = SessionContext::init(&provider);
        let mut view = ListView::mount(&store);
        view.pump();
        assert_eq!(view.state(&session), ListState::SignInRequired);
        assert!(view.render(&session).contains("Sign in with Google"));
    }

    #[test]
    fn loading_until_first_snapshot_is_applied() {
        let store = MemoryStore::new();
        let (_provider, session) = signed_in();
        let mut view = ListView::mount(&store);
        assert_eq!(view.state(&session), ListState::Loading);
        assert!(view.pump());
        assert_eq!(view.state(&session), ListState::Ready(&[]));
    }

    #[test]
    fn maps_records_to_rows() {
        let store = MemoryStore::new();
        let (_provider, session) = signed_in();
        let id = add(
            &store,
            json!({
                "status": "attempted",
                "problemName": "Two Sum",
                "difficulty": 1,
                "tags": ["Array", "Hash Table"],
                "list": "LeetCode"
            }),
        );
        let mut view = ListView::mount(&store);
        view.pump();

        let rows = view.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status.label, "Attempted");
        assert_eq!(rows[0].status.class, "text-yellow-600");
        assert_eq!(rows[0].difficulty.label, "Medium");
        assert_eq!(rows[0].tags, vec!["Array", "Hash Table"]);
        assert_eq!(view.route_for_row(0), Some(Route::Problem(id)));
        assert_eq!(view.route_for_row(1), None);

        let html = view.render(&session);
        assert!(html.contains("Competitive Programming Training Platform"));
        assert!(html.contains("Two Sum"));
        assert!(html.contains("Hash Table"));
    }

    #[test]
    fn follows_live_updates() {
        let store = MemoryStore::new();
        let mut view = ListView::mount(&store);
        view.pump();
        assert!(view.rows().is_empty());

        add(
            &store,
            json!({"status": "solved", "problemName": "A", "difficulty": 2, "tags": [], "list": "X"}),
        );
        assert!(view.pump());
        assert_eq!(view.rows().len(), 1);
        assert!(!view.pump());
    }

    #[test]
    fn skips_records_that_do_not_decode() {
        let store = MemoryStore::new();
        add(&store, json!({"status": "bogus", "problemName": "A"}));
        add(
            &store,
            json!({"status": "solved", "problemName": "B", "difficulty": 0, "tags": [], "list": ""}),
        );
        let mut view = ListView::mount(&store);
        view.pump();
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.rows()[0].name, "B");
    }

    #[test]
    fn subscription_failure_is_shown_literally() {
        let store = MemoryStore::new();
        let (_provider, session) = signed_in();
        let mut view = ListView::mount(&store);
        view.pump();
        store.deny(PROBLEMS_COLLECTION);
        view.pump();
        assert_eq!(
            view.state(&session),
            ListState::Failed("Missing or insufficient permissions.")
        );
        assert_eq!(
            view.render(&session),
            "<div>Error: Missing or insufficient permissions.</div>"
        );
    }

    #[test]
    fn search_text_does_not_filter() {
        let store = MemoryStore::new();
        add(
            &store,
            json!({"status": "solved", "problemName": "A", "difficulty": 0, "tags": [], "list": ""}),
        );
        let mut view = ListView::mount(&store);
        view.pump();
        view.filters.search = "zzz".to_string();
        assert_eq!(view.rows().len(), 1);
    }

    #[test]
    fn add_question_opens_a_blank_editor() {
        let store = MemoryStore::new();
        let view = ListView::mount(&store);
        let editor = view.add_question();
        assert!(editor.is_open());
        assert_eq!(editor.mode(), &crate::editor::EditorMode::Create);
        assert!(editor.form().problem_name.is_empty());
    }

    #[test]
    fn unmount_releases_the_feed() {
        let store = MemoryStore::new();
        let view = ListView::mount(&store);
        assert_eq!(store.watcher_count(), 1);
        drop(view);
        assert_eq!(store.watcher_count(), 0);
    }
}
