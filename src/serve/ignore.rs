//! SPA ignore predicates
//!
//! An ordered set of patterns checked against the raw request path. A match
//! means "this looks like a real file request", so a miss stays a miss instead
//! of falling back to the SPA shell.

use regex::{Regex, RegexBuilder};

use super::error::ServeError;
use super::options::Ignores;

/// Last segment looks like `name.ext`
const FILE_LIKE: &str = r"[/]([A-Za-z\s\d~$._-]+\.\w+){1,}$";
/// Any dot-prefixed segment (dotfiles served)
const DOT_SEGMENT: &str = r"/\.\w";
/// The reserved well-known segment (dotfiles hidden)
const WELL_KNOWN: &str = r"/\.well-known";

#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Regex>,
}

impl IgnoreSet {
    pub fn new(ignores: &Ignores, dotfiles: bool) -> Result<Self, ServeError> {
        let Ignores::Patterns(user) = ignores else {
            return Ok(Self::default());
        };

        let defaults = [FILE_LIKE, if dotfiles { DOT_SEGMENT } else { WELL_KNOWN }];
        let mut patterns = Vec::with_capacity(defaults.len() + user.len());
        for pattern in defaults {
            patterns.push(compile(pattern, false)?);
        }
        for pattern in user {
            patterns.push(compile(pattern, true)?);
        }

        Ok(Self { patterns })
    }

    /// First matching predicate short-circuits
    pub fn is_match(&self, pathname: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(pathname))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn compile(pattern: &str, case_insensitive: bool) -> Result<Regex, ServeError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| ServeError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}
