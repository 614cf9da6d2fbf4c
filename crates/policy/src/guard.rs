//! Allow-list guard for the workspace admin CLI.
//!
//! The directory-query tool forwards a free-form command line to a
//! read-only admin CLI. Before anything is spawned, the leading action
//! verb is located (skipping target-specifier tokens) and checked against
//! an explicit deny list first, then an allow list. Anything not on the
//! allow list is rejected; validation never spawns a process.

use std::collections::HashSet;
use thiserror::Error;
use tracing::warn;

/// Read-only verbs the wrapped CLI accepts.
const DEFAULT_ALLOWED: &[&str] = &["info", "print", "show", "report"];

/// Mutating verbs, denied even if misconfiguration ever adds them to the
/// allow list.
const DEFAULT_BLOCKED: &[&str] = &[
    "create",
    "update",
    "delete",
    "undelete",
    "suspend",
    "unsuspend",
    "add",
    "remove",
    "sync",
    "deprovision",
    "clear",
    "wipe",
];

/// Target-specifier tokens and how many tokens each consumes. Quantifier
/// and plural forms stand alone; singular object-type words are followed
/// by an identifier argument and consume it too.
const TARGET_SPECIFIERS: &[(&str, usize)] = &[
    ("all", 1),
    ("users", 1),
    ("groups", 1),
    ("domains", 1),
    ("aliases", 1),
    ("orgs", 1),
    ("user", 2),
    ("group", 2),
    ("domain", 2),
    ("alias", 2),
    ("org", 2),
    ("ou", 2),
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GuardError {
    #[error("Empty command")]
    Empty,

    #[error("no verb found in command: '{0}'")]
    NoVerb(String),

    #[error("BLOCKED: '{0}' is a write operation and is not permitted")]
    Blocked(String),

    #[error("'{0}' is not on the read-only allow-list")]
    NotAllowed(String),
}

pub struct CommandGuard {
    program: String,
    allowed: HashSet<String>,
    blocked: HashSet<String>,
}

impl Default for CommandGuard {
    fn default() -> Self {
        Self::new("gam")
    }
}

impl CommandGuard {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_lowercase(),
            allowed: DEFAULT_ALLOWED.iter().map(|s| s.to_string()).collect(),
            blocked: DEFAULT_BLOCKED.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Extends the default verb sets. The deny list still wins: adding a
    /// verb to both sets leaves it blocked.
    pub fn with_extra_verbs(mut self, allowed: &[String], blocked: &[String]) -> Self {
        self.allowed.extend(allowed.iter().map(|v| v.to_lowercase()));
        self.blocked.extend(blocked.iter().map(|v| v.to_lowercase()));
        self
    }

    /// Validates one command line, returning its whitespace tokens (with a
    /// redundant leading program name stripped) for the executor. Pure
    /// apart from audit logging; no process is spawned here.
    pub fn validate(&self, command: &str) -> Result<Vec<String>, GuardError> {
        let mut tokens: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            warn!(command, "rejected admin command: empty");
            return Err(GuardError::Empty);
        }

        // Callers sometimes include the program name themselves.
        if tokens[0].to_lowercase() == self.program {
            tokens.remove(0);
        }

        let verb = match self.find_verb(&tokens) {
            Some(v) => v,
            None => {
                warn!(command, "rejected admin command: no verb found");
                return Err(GuardError::NoVerb(command.trim().to_string()));
            }
        };

        // Deny takes precedence over the allow list.
        if self.blocked.contains(&verb) {
            warn!(command, verb = %verb, "rejected admin command: blocked verb");
            return Err(GuardError::Blocked(verb));
        }
        if !self.allowed.contains(&verb) {
            warn!(command, verb = %verb, "rejected admin command: not allow-listed");
            return Err(GuardError::NotAllowed(verb));
        }

        Ok(tokens)
    }

    /// Skips target-specifier tokens to locate the action verb. A
    /// two-token specifier with no following identifier runs past the end
    /// of the command; the bounds check turns that into "no verb" instead
    /// of an index panic.
    fn find_verb(&self, tokens: &[String]) -> Option<String> {
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].to_lowercase();
            match specifier_skip(&token) {
                Some(skip) => {
                    if i + skip > tokens.len() {
                        return None;
                    }
                    i += skip;
                }
                None => return Some(token),
            }
        }
        None
    }
}

fn specifier_skip(token: &str) -> Option<usize> {
    TARGET_SPECIFIERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|&(_, skip)| skip)
}
