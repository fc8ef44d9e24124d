// Command enhancers
//
// Rewrites applied to commands that fall through to the shell, e.g. turning
// on color for ls. They run after dispatch, never on handled commands.

use tracing::debug;

pub trait CommandEnhancer: Send + Sync {
    fn name(&self) -> &str;

    /// Rewritten command, or None to leave it alone
    fn enhance(&self, command: &str) -> Option<String>;
}

/// Adds `--color=auto` to one program unless the user already passed a
/// color flag of their own
pub struct ColorFlagEnhancer {
    name: &'static str,
    program: &'static str,
}

impl ColorFlagEnhancer {
    /// `ls` with color
    pub fn ls() -> Self {
        Self {
            name: "ls_color",
            program: "ls",
        }
    }

    /// `grep` with color
    pub fn grep() -> Self {
        Self {
            name: "grep_color",
            program: "grep",
        }
    }
}

fn is_color_flag(word: &str) -> bool {
    ["--color", "--colour"]
        .iter()
        .any(|flag| word == *flag || word.starts_with(&format!("{}=", flag)))
}

impl CommandEnhancer for ColorFlagEnhancer {
    fn name(&self) -> &str {
        self.name
    }

    fn enhance(&self, command: &str) -> Option<String> {
        let trimmed = command.trim();
        let mut words = trimmed.split_whitespace();
        if words.next() != Some(self.program) {
            return None;
        }
        if words.any(is_color_flag) {
            return None;
        }

        let rest = trimmed[self.program.len()..].trim();
        if rest.is_empty() {
            Some(format!("{} --color=auto", self.program))
        } else {
            Some(format!("{} --color=auto {}", self.program, rest))
        }
    }
}

/// Runs enhancers in registration order, each seeing the previous one's output
#[derive(Default)]
pub struct EnhancerManager {
    enhancers: Vec<Box<dyn CommandEnhancer>>,
}

impl EnhancerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E: CommandEnhancer + 'static>(&mut self, enhancer: E) {
        self.enhancers.push(Box::new(enhancer));
    }

    pub fn names(&self) -> Vec<&str> {
        self.enhancers.iter().map(|e| e.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.enhancers.is_empty()
    }

    pub fn enhance(&self, command: &str) -> String {
        let mut current = command.to_string();
        for enhancer in &self.enhancers {
            if let Some(next) = enhancer.enhance(&current) {
                debug!(enhancer = enhancer.name(), from = %current, to = %next, "enhanced command");
                current = next;
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ls_color() {
        let ls = ColorFlagEnhancer::ls();
        assert_eq!(ls.enhance("ls").as_deref(), Some("ls --color=auto"));
        assert_eq!(ls.enhance("ls -la src").as_deref(), Some("ls --color=auto -la src"));
        assert_eq!(ls.enhance("ls --color=never"), None);
        assert_eq!(ls.enhance("lsblk"), None);
        assert_eq!(ls.enhance("echo ls"), None);
    }

    #[test]
    fn test_grep_color() {
        let grep = ColorFlagEnhancer::grep();
        assert_eq!(
            grep.enhance("grep -rn TODO .").as_deref(),
            Some("grep --color=auto -rn TODO .")
        );
        assert_eq!(grep.enhance("grep --colour=always x"), None);
    }

    #[test]
    fn test_manager_chains_in_order() {
        struct Suffix(&'static str);

        impl CommandEnhancer for Suffix {
            fn name(&self) -> &str {
                self.0
            }

            fn enhance(&self, command: &str) -> Option<String> {
                Some(format!("{} {}", command, self.0))
            }
        }

        let mut manager = EnhancerManager::new();
        manager.register(Suffix("one"));
        manager.register(Suffix("two"));

        assert_eq!(manager.enhance("echo"), "echo one two");
        assert_eq!(manager.names(), vec!["one", "two"]);
    }

    #[test]
    fn test_empty_manager_is_identity() {
        let manager = EnhancerManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.enhance("make test"), "make test");
    }
}
