// src/views/mod.rs

pub mod detail;
pub mod list;

pub use detail::{DetailState, DetailView};
pub use list::{FilterBar, ListState, ListView, ProblemRow};

use crate::models::{Difficulty, Status};
use crate::render::escape_html;

/// A colored label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub class: &'static str,
}

impl Badge {
    pub fn to_html(&self) -> String {
        format!(
            "<span class=\"{}\">{}</span>",
            self.class,
            escape_html(self.label)
        )
    }
}

pub fn status_badge(status: Status) -> Badge {
    Badge {
        label: status.label(),
        class: status.color_class(),
    }
}

pub fn difficulty_badge(difficulty: Difficulty) -> Badge {
    Badge {
        label: difficulty.label(),
        class: difficulty.color_class(),
    }
}

pub(crate) fn loading_html() -> String {
    "<div>Loading...</div>".to_string()
}

pub(crate) fn error_html(message: &str) -> String {
    format!("<div>Error: {}</div>", escape_html(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges_match_the_color_table() {
        assert_eq!(
            status_badge(Status::Unattempted).to_html(),
            "<span class=\"text-red-600\">Unattempted</span>"
        );
        assert_eq!(
            difficulty_badge(Difficulty::Hard).to_html(),
            "<span class=\"text-red-600\">Hard</span>"
        );
        assert_eq!(difficulty_badge(Difficulty::Easy).class, "text-green-600");
        assert_eq!(status_badge(Status::Solved).class, "text-green-600");
        assert_eq!(status_badge(Status::Attempted).class, "text-yellow-600");
        assert_eq!(difficulty_badge(Difficulty::Medium).class, "text-yellow-600");
    }

    #[test]
    fn error_message_is_literal() {
        assert_eq!(error_html("boom <x>"), "<div>Error: boom &lt;x&gt;</div>");
    }
}
