// src/views/detail.rs

use super::{difficulty_badge, error_html, loading_html, status_badge};
use crate::constants::PROBLEMS_COLLECTION;
use crate::editor::ProblemEditor;
use crate::models::{DocId, DocRef, MetaRecord, ProblemRecord};
use crate::render::{article, escape_html, tag_chips};
use crate::routes::Route;
use crate::store::{DocumentFeed, DocumentStore, DocumentSnapshot, StoreError};
use log::{debug, warn};

/// Progress of one subscription stage.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Stage<T> {
    Pending,
    Loaded(T),
    Failed(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum DetailState<'a> {
    Loading,
    Failed(&'a str),
    Ready {
        problem: &'a ProblemRecord,
        meta: &'a MetaRecord,
    },
}

/// One problem page. Stage one follows the problem document; stage two follows
/// whatever meta document the problem currently references, and only exists
/// while there is such a reference.
pub struct DetailView {
    id: DocId,
    problem_feed: DocumentFeed,
    problem: Stage<ProblemRecord>,
    meta_feed: Option<(DocRef, DocumentFeed)>,
    meta: Stage<MetaRecord>,
}

impl DetailView {
    pub fn mount(store: &dyn DocumentStore, id: DocId) -> Self {
        debug!("DetailView: subscribing to {}/{}", PROBLEMS_COLLECTION, id);
        DetailView {
            problem_feed: store.watch_document(PROBLEMS_COLLECTION, &id),
            id,
            problem: Stage::Pending,
            meta_feed: None,
            meta: Stage::Pending,
        }
    }

    pub fn id(&self) -> &DocId {
        &self.id
    }

    /// The meta document stage two is following, if any.
    pub fn meta_target(&self) -> Option<&DocRef> {
        self.meta_feed.as_ref().map(|(target, _)| target)
    }

    /// Applies pending snapshots of both stages. Returns true if anything changed.
    pub fn pump(&mut self, store: &dyn DocumentStore) -> bool {
        let mut changed = false;
        if let Some(next) = self.problem_feed.latest() {
            self.apply_problem(store, next);
            changed = true;
        }
        let pending_meta = self
            .meta_feed
            .as_ref()
            .and_then(|(_, feed)| feed.latest());
        if let Some(next) = pending_meta {
            self.apply_meta(next);
            changed = true;
        }
        changed
    }

    fn apply_problem(
        &mut self,
        store: &dyn DocumentStore,
        next: Result<DocumentSnapshot, StoreError>,
    ) {
        let decoded = next.and_then(|snapshot| snapshot.decode::<ProblemRecord>());
        match decoded {
            Err(e) => {
                self.problem = Stage::Failed(e.to_string());
            }
            Ok(None) => {
                // A problem that does not exist has nothing to link to.
                self.problem = Stage::Pending;
                self.release_meta();
            }
            Ok(Some(problem)) => {
                match &problem.meta {
                    None => {
                        debug!("DetailView: {} has no meta reference yet", self.id);
                        self.release_meta();
                    }
                    Some(target) if self.meta_target() == Some(target) => {}
                    Some(target) => {
                        debug!("DetailView: following {}", target.path());
                        let feed = store.watch_document(&target.collection, &target.id);
                        self.meta_feed = Some((target.clone(), feed));
                        self.meta = Stage::Pending;
                    }
                }
                self.problem = Stage::Loaded(problem);
            }
        }
    }

    fn apply_meta(&mut self, next: Result<DocumentSnapshot, StoreError>) {
        self.meta = match next.and_then(|snapshot| snapshot.decode::<MetaRecord>()) {
            Ok(Some(meta)) => Stage::Loaded(meta),
            Ok(None) => {
                warn!(
                    "DetailView: meta for {} does not resolve, still loading",
                    self.id
                );
                Stage::Pending
            }
            Err(e) => Stage::Failed(e.to_string()),
        };
    }

    fn release_meta(&mut self) {
        self.meta_feed = None;
        self.meta = Stage::Pending;
    }

    pub fn state(&self) -> DetailState<'_> {
        match (&self.problem, &self.meta) {
            (Stage::Failed(e), _) | (_, Stage::Failed(e)) => DetailState::Failed(e),
            (Stage::Loaded(problem), Stage::Loaded(meta)) => DetailState::Ready { problem, meta },
            _ => DetailState::Loading,
        }
    }

    /// The edit affordance: an editor targeted at this problem, already open.
    pub fn open_editor(&self, store: &dyn DocumentStore) -> ProblemEditor {
        let mut editor = ProblemEditor::edit(store, self.id.clone());
        editor.open();
        editor
    }

    pub fn render(&self) -> String {
        match self.state() {
            DetailState::Loading => loading_html(),
            DetailState::Failed(message) => error_html(message),
            DetailState::Ready { problem, meta } => render_page(problem, meta),
        }
    }
}

fn render_page(problem: &ProblemRecord, meta: &MetaRecord) -> String {
    let mut out = String::new();

    out.push_str("<div class=\"w-full flex items-center justify-between\"><div class=\"flex flex-col gap-4\">");
    out.push_str(&format!(
        "<a href=\"{}\" class=\"flex items-center gap-2\">Back</a>",
        Route::List
    ));
    out.push_str(&format!(
        "<span class=\"uppercase text-sm text-zinc-500\">{}</span>",
        escape_html(&problem.list)
    ));
    out.push_str(&format!(
        "<h1 class=\"text-3xl font-medium\">{}</h1>",
        escape_html(&problem.problem_name)
    ));
    out.push_str(&format!(
        "<div class=\"flex gap-8\"><div>Difficulty: {}</div><div>Status: {}</div></div>",
        difficulty_badge(problem.difficulty).to_html(),
        status_badge(problem.status).to_html()
    ));
    out.push_str(&format!(
        "<div class=\"flex items-center flex-wrap gap-2\">Tags: {}</div>",
        tag_chips(&problem.tags)
    ));
    out.push_str("</div><div class=\"flex items-center gap-2\">");
    out.push_str("<button class=\"p-4 px-6 border-2 border-zinc-700\">Submit Solution</button>");
    out.push_str("<button class=\"p-4 px-6 border-2 border-zinc-700\">Edit</button>");
    out.push_str("</div></div>");

    out.push_str("<div class=\"flex items-center\">");
    out.push_str("<div class=\"w-1/3 border-b-2 border-zinc-700\">Statement</div>");
    out.push_str("<div class=\"w-1/3 border-b border-zinc-400 text-zinc-400\">Initial Code</div>");
    out.push_str("<div class=\"w-1/3 border-b border-zinc-400 text-zinc-400\">Submissions</div>");
    out.push_str("</div>");

    let content = &meta.content;
    out.push_str(&article(&content.problem_statement));
    for (title, body) in [
        ("Input Format", &content.input_format),
        ("Output Format", &content.output_format),
        ("Constraints", &content.constraints),
    ] {
        out.push_str(&format!("<h2 class=\"text-xl font-medium\">{title}</h2>"));
        out.push_str(&article(body));
    }

    for (index, case) in content.test_cases.iter().enumerate() {
        out.push_str(&format!(
            "<h2 class=\"text-xl font-medium\">Sample {}</h2>",
            index + 1
        ));
        out.push_str(&format!(
            "<table class=\"w-full\"><thead><tr><th>Input</th><th>Output</th></tr></thead><tbody><tr><td><pre class=\"whitespace-pre-wrap\">{}</pre></td><td><pre class=\"whitespace-pre-wrap\">{}</pre></td></tr></tbody></table>",
            escape_html(&case.input),
            escape_html(&case.output)
        ));
        if let Some(explanation) = case.visible_explanation() {
            out.push_str("<h2 class=\"text-xl font-medium\">Explanation</h2>");
            out.push_str(&article(explanation));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::META_COLLECTION;
    use crate::store::{to_fields, MemoryStore};
    use serde_json::json;

    fn problem_json(meta: Option<&str>) -> serde_json::Value {
        let mut v = json!({
            "status": "solved",
            "problemName": "Two Sum",
            "difficulty": 0,
            "tags": ["Array"],
            "list": "LeetCode"
        });
        if let Some(meta) = meta {
            v["meta"] = json!(meta);
        }
        v
    }

    fn meta_json(statement: &str) -> serde_json::Value {
        json!({
            "problemStatement": statement,
            "inputFormat": "A line with $n$.",
            "outputFormat": "One integer.",
            "constraints": "$1 \\le n \\le 10^5$",
            "testCases": [
                {"input": "3 22\n7 8 15", "output": "7 15", "explanation": "The two numbers are 7 and 15."},
                {"input": "1", "output": "1", "explanation": ""}
            ]
        })
    }

    fn create(store: &MemoryStore, collection: &str, v: serde_json::Value) -> DocId {
        store
            .create_document(collection, to_fields(&v).unwrap())
            .unwrap()
    }

    #[test]
    fn loads_problem_then_meta() {
        let store = MemoryStore::new();
        let meta_id = create(&store, META_COLLECTION, meta_json("Find two numbers."));
        let id = create(
            &store,
            PROBLEMS_COLLECTION,
            problem_json(Some(&format!("problems_meta/{meta_id}"))),
        );

        let mut view = DetailView::mount(&store, id);
        assert_eq!(view.state(), DetailState::Loading);
        assert!(view.pump(&store));

        match view.state() {
            DetailState::Ready { problem, meta } => {
                assert_eq!(problem.problem_name, "Two Sum");
                assert_eq!(meta.content.test_cases.len(), 2);
            }
            other => panic!("unexpected state: {other:?}"),
        }

        let html = view.render();
        assert!(html.contains("Find two numbers."));
        assert!(html.contains("Sample 1"));
        assert!(html.contains("Sample 2"));
        assert!(html.contains("The two numbers are 7 and 15."));
        assert_eq!(html.matches("Explanation").count(), 1);
        assert!(html.contains("<span class=\"text-green-600\">Easy</span>"));
        assert!(html.contains("<span class=\"text-green-600\">Solved</span>"));
        assert!(html.contains("math-inline"));
    }

    #[test]
    fn unresolved_meta_reference_stays_loading() {
        let store = MemoryStore::new();
        let id = create(
            &store,
            PROBLEMS_COLLECTION,
            problem_json(Some("problems_meta/does-not-exist")),
        );
        let mut view = DetailView::mount(&store, id);
        view.pump(&store);
        view.pump(&store);
        assert_eq!(view.state(), DetailState::Loading);
        assert_eq!(view.render(), "<div>Loading...</div>");
    }

    #[test]
    fn missing_reference_never_starts_stage_two() {
        let store = MemoryStore::new();
        let id = create(&store, PROBLEMS_COLLECTION, problem_json(None));
        let mut view = DetailView::mount(&store, id);
        view.pump(&store);
        assert_eq!(view.meta_target(), None);
        assert_eq!(view.state(), DetailState::Loading);
        assert_eq!(store.watcher_count(), 1);
    }

    #[test]
    fn missing_problem_is_loading_not_error() {
        let store = MemoryStore::new();
        let mut view = DetailView::mount(&store, DocId::new("nope"));
        view.pump(&store);
        assert_eq!(view.state(), DetailState::Loading);
    }

    #[test]
    fn late_link_completes_the_page() {
        let store = MemoryStore::new();
        let id = create(&store, PROBLEMS_COLLECTION, problem_json(None));
        let mut view = DetailView::mount(&store, id.clone());
        view.pump(&store);
        assert_eq!(view.state(), DetailState::Loading);

        let meta_id = create(&store, META_COLLECTION, meta_json("Late."));
        store
            .update_document(
                PROBLEMS_COLLECTION,
                &id,
                to_fields(&json!({"meta": format!("problems_meta/{meta_id}")})).unwrap(),
            )
            .unwrap();
        view.pump(&store);
        assert!(matches!(view.state(), DetailState::Ready { .. }));
    }

    #[test]
    fn reference_change_replaces_stage_two() {
        let store = MemoryStore::new();
        let first = create(&store, META_COLLECTION, meta_json("First."));
        let second = create(&store, META_COLLECTION, meta_json("Second."));
        let id = create(
            &store,
            PROBLEMS_COLLECTION,
            problem_json(Some(&format!("problems_meta/{first}"))),
        );
        let mut view = DetailView::mount(&store, id.clone());
        view.pump(&store);
        assert!(view.render().contains("First."));

        store
            .update_document(
                PROBLEMS_COLLECTION,
                &id,
                to_fields(&json!({"meta": format!("problems_meta/{second}")})).unwrap(),
            )
            .unwrap();
        view.pump(&store);
        assert_eq!(view.meta_target().unwrap().id, second);
        assert!(view.render().contains("Second."));
        // one feed for the problem, one for the current meta
        assert_eq!(store.watcher_count(), 2);
    }

    #[test]
    fn meta_failure_surfaces_as_combined_error() {
        let store = MemoryStore::new();
        let meta_id = create(&store, META_COLLECTION, meta_json("x"));
        let id = create(
            &store,
            PROBLEMS_COLLECTION,
            problem_json(Some(&format!("problems_meta/{meta_id}"))),
        );
        let mut view = DetailView::mount(&store, id);
        view.pump(&store);
        store.deny(META_COLLECTION);
        view.pump(&store);
        assert_eq!(
            view.state(),
            DetailState::Failed("Missing or insufficient permissions.")
        );
    }

    #[test]
    fn problem_failure_surfaces_as_error() {
        let store = MemoryStore::new();
        store.deny(PROBLEMS_COLLECTION);
        let mut view = DetailView::mount(&store, DocId::new("x"));
        view.pump(&store);
        assert!(view.render().starts_with("<div>Error: "));
    }

    #[test]
    fn markup_in_samples_is_escaped() {
        let store = MemoryStore::new();
        let meta_id = create(
            &store,
            META_COLLECTION,
            json!({"testCases": [{"input": "<script>", "output": "a & b"}]}),
        );
        let id = create(
            &store,
            PROBLEMS_COLLECTION,
            problem_json(Some(&format!("problems_meta/{meta_id}"))),
        );
        let mut view = DetailView::mount(&store, id);
        view.pump(&store);
        let html = view.render();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }
}
