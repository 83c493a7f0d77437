// src/editor/mod.rs

mod form;

pub use form::{FormInput, TestCaseField};

use crate::constants::{
    EDITOR_DESCRIPTION, EDITOR_TITLE, META_COLLECTION, PLACEHOLDER_CONSTRAINTS,
    PLACEHOLDER_INPUT_FORMAT, PLACEHOLDER_LIST, PLACEHOLDER_NAME, PLACEHOLDER_OUTPUT_FORMAT,
    PLACEHOLDER_STATEMENT, PLACEHOLDER_TAGS, PROBLEMS_COLLECTION,
};
use crate::models::{Difficulty, DocId, DocRef, MetaLink, MetaRecord, ProblemRecord};
use crate::render::escape_html;
use crate::store::{to_fields, DocumentFeed, DocumentStore, StoreError};
use log::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(DocId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was written because the name was empty.
    Skipped,
    Created { problem: DocId, meta: DocId },
    Updated { problem: DocId, meta: DocRef },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Editor is not open")]
    NotOpen,
    #[error("Problem {0} has not loaded")]
    NotLoaded(DocId),
    #[error("Problem {0} has no meta document")]
    MetaUnresolved(DocId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Modal form for adding a problem or editing an existing one.
///
/// In edit mode the editor follows the target problem and re-hydrates the form
/// from every snapshot, fetching the referenced meta document once per snapshot.
/// `close` discards unsaved edits by restoring the last hydrated (or blank) form.
pub struct ProblemEditor {
    mode: EditorMode,
    phase: EditorPhase,
    form: FormInput,
    baseline: FormInput,
    feed: Option<DocumentFeed>,
    current: Option<ProblemRecord>,
}

impl ProblemEditor {
    pub fn create() -> Self {
        ProblemEditor {
            mode: EditorMode::Create,
            phase: EditorPhase::Closed,
            form: FormInput::default(),
            baseline: FormInput::default(),
            feed: None,
            current: None,
        }
    }

    pub fn edit(store: &dyn DocumentStore, id: DocId) -> Self {
        debug!("ProblemEditor: following {}/{}", PROBLEMS_COLLECTION, id);
        ProblemEditor {
            feed: Some(store.watch_document(PROBLEMS_COLLECTION, &id)),
            mode: EditorMode::Edit(id),
            phase: EditorPhase::Closed,
            form: FormInput::default(),
            baseline: FormInput::default(),
            current: None,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != EditorPhase::Closed
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormInput {
        &mut self.form
    }

    pub fn open(&mut self) {
        if self.phase == EditorPhase::Closed {
            self.phase = EditorPhase::Open;
        }
    }

    pub fn close(&mut self) {
        if self.phase == EditorPhase::Open {
            self.phase = EditorPhase::Closed;
            self.form = self.baseline.clone();
        }
    }

    /// Hydrates the form from the newest problem snapshot, if one is pending.
    /// Returns true when a snapshot was applied.
    pub fn pump(&mut self, store: &dyn DocumentStore) -> Result<bool, StoreError> {
        let Some(next) = self.feed.as_ref().and_then(|feed| feed.latest()) else {
            return Ok(false);
        };
        let Some(problem) = next?.decode::<ProblemRecord>()? else {
            self.current = None;
            return Ok(true);
        };
        let meta_ref = problem.meta.clone();
        self.current = Some(problem);

        let Some(meta_ref) = meta_ref else {
            warn!("ProblemEditor: problem has no meta reference, form not hydrated");
            return Ok(true);
        };
        let Some(meta) = store
            .get_document(&meta_ref.collection, &meta_ref.id)?
            .decode::<MetaRecord>()?
        else {
            warn!("ProblemEditor: {} not found, form not hydrated", meta_ref.path());
            return Ok(true);
        };

        if let Some(problem) = &self.current {
            let hydrated = FormInput::hydrate(problem, &meta.content);
            self.form = hydrated.clone();
            self.baseline = hydrated;
        }
        Ok(true)
    }

    /// Writes the form. Create issues three sequential writes (problem, meta,
    /// link); edit issues two updates (problem fields, referenced meta).
    ///
    /// An empty name writes nothing and leaves the editor open. On a failed
    /// write the editor returns to `Open` with the form intact; writes already
    /// made are not rolled back.
    pub fn submit(&mut self, store: &dyn DocumentStore) -> Result<SubmitOutcome, EditorError> {
        if self.phase != EditorPhase::Open {
            return Err(EditorError::NotOpen);
        }
        if self.form.problem_name.is_empty() {
            debug!("ProblemEditor: empty problem name, nothing written");
            return Ok(SubmitOutcome::Skipped);
        }

        let result = match self.mode.clone() {
            EditorMode::Create => {
                self.phase = EditorPhase::Submitting;
                self.write_new(store)
            }
            EditorMode::Edit(id) => {
                let problem = self
                    .current
                    .as_ref()
                    .ok_or_else(|| EditorError::NotLoaded(id.clone()))?;
                let meta_ref = problem
                    .meta
                    .clone()
                    .ok_or_else(|| EditorError::MetaUnresolved(id.clone()))?;
                self.phase = EditorPhase::Submitting;
                self.write_existing(store, id, meta_ref)
            }
        };

        match result {
            Ok(outcome) => {
                info!("ProblemEditor: saved {:?}", outcome);
                self.baseline = match self.mode {
                    EditorMode::Create => FormInput::default(),
                    EditorMode::Edit(_) => self.form.clone(),
                };
                self.form = self.baseline.clone();
                self.phase = EditorPhase::Closed;
                Ok(outcome)
            }
            Err(e) => {
                error!("ProblemEditor: save failed: {}", e);
                self.phase = EditorPhase::Open;
                Err(e)
            }
        }
    }

    fn write_new(&self, store: &dyn DocumentStore) -> Result<SubmitOutcome, EditorError> {
        let problem = store.create_document(
            PROBLEMS_COLLECTION,
            to_fields(&self.form.new_problem())?,
        )?;
        let meta = store.create_document(
            META_COLLECTION,
            to_fields(&MetaRecord {
                problem_id: Some(problem.clone()),
                content: self.form.meta_content(),
            })?,
        )?;
        store.update_document(
            PROBLEMS_COLLECTION,
            &problem,
            to_fields(&MetaLink {
                meta: DocRef::new(META_COLLECTION, meta.clone()),
            })?,
        )?;
        Ok(SubmitOutcome::Created { problem, meta })
    }

    fn write_existing(
        &self,
        store: &dyn DocumentStore,
        id: DocId,
        meta: DocRef,
    ) -> Result<SubmitOutcome, EditorError> {
        store.update_document(PROBLEMS_COLLECTION, &id, to_fields(&self.form.patch())?)?;
        store.update_document(
            &meta.collection,
            &meta.id,
            to_fields(&self.form.meta_content())?,
        )?;
        Ok(SubmitOutcome::Updated { problem: id, meta })
    }

    /// The modal markup, or an empty string while closed.
    pub fn render(&self) -> String {
        if !self.is_open() {
            return String::new();
        }
        let form = &self.form;
        let mut out = String::from("<div role=\"dialog\" class=\"w-full max-w-3xl\">");
        out.push_str(&format!(
            "<h2 class=\"text-2xl\">{}</h2><p class=\"text-zinc-500\">{}</p><form>",
            EDITOR_TITLE, EDITOR_DESCRIPTION
        ));

        out.push_str(&text_input("Problem Name", "problemName", PLACEHOLDER_NAME, &form.problem_name));
        out.push_str("<label>Difficulty<select name=\"difficulty\">");
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let selected = if difficulty == form.difficulty { " selected" } else { "" };
            out.push_str(&format!(
                "<option value=\"{}\"{selected}>{}</option>",
                u8::from(difficulty),
                difficulty.label()
            ));
        }
        out.push_str("</select></label>");
        out.push_str(&text_input("Tags", "tags", PLACEHOLDER_TAGS, &form.tags));
        out.push_str(&text_input("List", "list", PLACEHOLDER_LIST, &form.list));
        out.push_str(&text_area("Problem Statement", "problemStatement", PLACEHOLDER_STATEMENT, &form.problem_statement));
        out.push_str(&text_area("Input Format", "inputFormat", PLACEHOLDER_INPUT_FORMAT, &form.input_format));
        out.push_str(&text_area("Output Format", "outputFormat", PLACEHOLDER_OUTPUT_FORMAT, &form.output_format));
        out.push_str(&text_area("Constraints", "constraints", PLACEHOLDER_CONSTRAINTS, &form.constraints));

        for (index, case) in form.test_cases.iter().enumerate() {
            out.push_str(&format!(
                "<fieldset data-index=\"{index}\"><legend>Test Case {}</legend>",
                index + 1
            ));
            out.push_str(&text_area("Input", "input", "", &case.input));
            out.push_str(&text_area("Output", "output", "", &case.output));
            out.push_str(&text_area(
                "Explanation",
                "explanation",
                "",
                case.explanation.as_deref().unwrap_or_default(),
            ));
            out.push_str("<button type=\"button\">Remove</button></fieldset>");
        }

        let submit = if self.phase == EditorPhase::Submitting { " disabled" } else { "" };
        out.push_str("<button type=\"button\">Add Test Case</button>");
        out.push_str(&format!("<button type=\"submit\"{submit}>Submit</button></form></div>"));
        out
    }
}

fn text_input(label: &str, name: &str, placeholder: &str, value: &str) -> String {
    format!(
        "<label>{label}<input type=\"text\" name=\"{name}\" placeholder=\"{}\" value=\"{}\"/></label>",
        escape_html(placeholder),
        escape_html(value)
    )
}

fn text_area(label: &str, name: &str, placeholder: &str, value: &str) -> String {
    format!(
        "<label>{label}<textarea name=\"{name}\" placeholder=\"{}\">{}</textarea></label>",
        escape_html(placeholder),
        escape_html(value)
    )
}
