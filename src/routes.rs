// src/routes.rs

use crate::models::DocId;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// The two navigable views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Problem(DocId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No route matches {0:?}")]
pub struct RouteError(pub String);

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        static RE_PROBLEM: OnceLock<Regex> = OnceLock::new();
        let re_problem = RE_PROBLEM.get_or_init(|| {
            Regex::new(r"^/problem/([^/?#]+)/?$").expect("valid problem route regex")
        });

        let path = path.trim();
        if path.is_empty() || path == "/" {
            return Ok(Route::List);
        }
        re_problem
            .captures(path)
            .and_then(|cap| cap.get(1))
            .map(|id| Route::Problem(DocId::new(id.as_str())))
            .ok_or_else(|| RouteError(path.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => f.write_str("/"),
            Route::Problem(id) => write!(f, "/problem/{id}"),
        }
    }
}
