// src/editor/form.rs

use crate::models::{Difficulty, MetaContent, ProblemPatch, ProblemRecord, Status, TestCase};

/// Which text of a test case an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestCaseField {
    Input,
    Output,
    Explanation,
}

/// Local, unsaved state of the editor form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub problem_name: String,
    pub difficulty: Difficulty,
    /// Comma separated, as typed.
    pub tags: String,
    pub list: String,
    pub problem_statement: String,
    pub input_format: String,
    pub output_format: String,
    pub constraints: String,
    pub test_cases: Vec<TestCase>,
}

impl FormInput {
    pub fn hydrate(problem: &ProblemRecord, meta: &MetaContent) -> Self {
        FormInput {
            problem_name: problem.problem_name.clone(),
            difficulty: problem.difficulty,
            tags: problem.tags.join(", "),
            list: problem.list.clone(),
            problem_statement: meta.problem_statement.clone(),
            input_format: meta.input_format.clone(),
            output_format: meta.output_format.clone(),
            constraints: meta.constraints.clone(),
            test_cases: meta.test_cases.clone(),
        }
    }

    /// Tags split on commas, each trimmed.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.split(',').map(|tag| tag.trim().to_string()).collect()
    }

    /// Appends a blank test case and returns its index.
    pub fn add_test_case(&mut self) -> usize {
        self.test_cases.push(TestCase {
            input: String::new(),
            output: String::new(),
            explanation: Some(String::new()),
        });
        self.test_cases.len() - 1
    }

    /// Removes the test case at `index`; later entries move down by one.
    pub fn remove_test_case(&mut self, index: usize) -> Option<TestCase> {
        if index < self.test_cases.len() {
            Some(self.test_cases.remove(index))
        } else {
            None
        }
    }

    /// Sets one field of the test case at `index`. Returns false if there is none.
    pub fn set_test_case(&mut self, index: usize, field: TestCaseField, value: String) -> bool {
        let Some(case) = self.test_cases.get_mut(index) else {
            return false;
        };
        match field {
            TestCaseField::Input => case.input = value,
            TestCaseField::Output => case.output = value,
            TestCaseField::Explanation => case.explanation = Some(value),
        }
        true
    }

    /// The problem document written by the create flow, not yet linked.
    pub fn new_problem(&self) -> ProblemRecord {
        ProblemRecord {
            status: Status::Unattempted,
            problem_name: self.problem_name.clone(),
            difficulty: self.difficulty,
            tags: self.tag_list(),
            list: self.list.clone(),
            meta: None,
        }
    }

    pub fn patch(&self) -> ProblemPatch {
        ProblemPatch {
            problem_name: self.problem_name.clone(),
            difficulty: self.difficulty,
            tags: self.tag_list(),
            list: self.list.clone(),
        }
    }

    pub fn meta_content(&self) -> MetaContent {
        MetaContent {
            problem_statement: self.problem_statement.clone(),
            input_format: self.input_format.clone(),
            output_format: self.output_format.clone(),
            constraints: self.constraints.clone(),
            test_cases: self.test_cases.clone(),
        }
    }
}
