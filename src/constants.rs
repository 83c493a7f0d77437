// src/constants.rs

// --- Collections ---
pub const PROBLEMS_COLLECTION: &str = "problems";
pub const META_COLLECTION: &str = "problems_meta";

// --- Labels ---
pub const APP_TITLE: &str = "Competitive Programming Training Platform";
pub const LABEL_EASY: &str = "Easy";
pub const LABEL_MEDIUM: &str = "Medium";
pub const LABEL_HARD: &str = "Hard";
pub const LABEL_UNATTEMPTED: &str = "Unattempted";
pub const LABEL_ATTEMPTED: &str = "Attempted";
pub const LABEL_SOLVED: &str = "Solved";

pub const EDITOR_TITLE: &str = "Add a new problem";
pub const EDITOR_DESCRIPTION: &str = "Fill in the details to add a new problem";

// --- Color Classes ---
pub const COLOR_GREEN: &str = "text-green-600";
pub const COLOR_YELLOW: &str = "text-yellow-600";
pub const COLOR_RED: &str = "text-red-600";

// --- Form Placeholders ---
pub const PLACEHOLDER_NAME: &str = r#"Eg: "Two Sum" or "Maximum Subarray""#;
pub const PLACEHOLDER_TAGS: &str = r#"Eg: "Array, Hash Table, Two Pointers" (comma separated)"#;
pub const PLACEHOLDER_LIST: &str = r#"Eg: "LeetCode, HackerRank, Codeforces""#;
pub const PLACEHOLDER_STATEMENT: &str = r#"Eg: "Given an array of integers, return indices of the two numbers such that they add up to a specific target.""#;
pub const PLACEHOLDER_INPUT_FORMAT: &str = r#"Eg: "The first line contains an integer n, the size of the array. The second line contains n space-separated integers.""#;
pub const PLACEHOLDER_OUTPUT_FORMAT: &str =
    r#"Eg: "Return the two numbers such that they add up to a specific target.""#;
pub const PLACEHOLDER_CONSTRAINTS: &str = r#"Eg: "The array contains only unique numbers.""#;
