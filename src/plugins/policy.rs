// Command policy
//
// Blocks commands by program name (allow/deny lists) or by regex over the
// whole line. The plugin is registered first so blocked commands never reach
// the shell; plugins that run lines of their own (aliases) check the same
// `Policy` before spawning anything.

use crate::config::Config;
use crate::core::{Command, ExecutionResult, Plugin};
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeSet;

/// Exit status shells use for "found it but won't run it"
const NOT_PERMITTED_EXIT_CODE: i32 = 126;

/// Allow/deny rules compiled from the config
#[derive(Debug, Clone, Default)]
pub struct Policy {
    allow: BTreeSet<String>,
    deny: BTreeSet<String>,
    deny_patterns: Vec<Regex>,
}

impl Policy {
    pub fn new(config: &Config) -> Self {
        // Compile once. A bad pattern in the config is skipped, not fatal.
        let deny_patterns = config
            .deny_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!("ignoring deny pattern {:?}: {}", pattern, e);
                    None
                }
            })
            .collect();

        Self {
            allow: config.allowlist.iter().cloned().collect(),
            deny: config.denylist.iter().cloned().collect(),
            deny_patterns,
        }
    }

    fn is_denied(&self, program: &str) -> bool {
        self.deny.contains(program) || (!self.allow.is_empty() && !self.allow.contains(program))
    }

    /// First program in `line` that may not run, if any.
    ///
    /// Every `;`, `&&`, `||` and `|` separated part is checked, so a denied
    /// program can't ride along behind an allowed one.
    pub fn blocked_program<'a>(&self, line: &'a str) -> Option<&'a str> {
        let programs: Vec<&str> = segments(line)
            .into_iter()
            .filter_map(|segment| segment.split_whitespace().next())
            .collect();

        if let Some(program) = programs.iter().copied().find(|program| self.is_denied(program)) {
            return Some(program);
        }

        match programs.first() {
            Some(program) if self.deny_patterns.iter().any(|regex| regex.is_match(line)) => {
                Some(*program)
            }
            _ => None,
        }
    }

    /// The refusal for `line`, or None when it may run
    pub fn check(&self, line: &str) -> Option<ExecutionResult> {
        self.blocked_program(line).map(|program| {
            ExecutionResult::failure(
                format!("{}: command not permitted", program),
                NOT_PERMITTED_EXIT_CODE,
            )
        })
    }
}

/// Split a command line on `;`, `&&`, `||`, `|` and newlines outside quotes
fn segments(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                ';' | '\n' | '|' | '&' => {
                    let doubled = chars.peek().map(|(_, next)| *next) == Some(c);
                    // A lone `&` backgrounds or redirects (`2>&1`); leave it alone
                    if c == '&' && !doubled {
                        continue;
                    }
                    parts.push(&line[start..i]);
                    start = i + c.len_utf8();
                    if doubled && (c == '&' || c == '|') {
                        chars.next();
                        start += c.len_utf8();
                    }
                }
                _ => {}
            },
        }
    }
    parts.push(&line[start..]);
    parts
}

pub struct PolicyPlugin {
    policy: Policy,
}

impl PolicyPlugin {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl Plugin for PolicyPlugin {
    fn name(&self) -> &str {
        "policy"
    }

    fn should_handle(&self, command: &Command) -> bool {
        self.policy.blocked_program(command.text()).is_some()
    }

    async fn execute(&self, command: &Command) -> anyhow::Result<ExecutionResult> {
        Ok(self
            .policy
            .check(command.text())
            .unwrap_or_else(ExecutionResult::decline))
    }
}
