use std::collections::HashMap;

use super::context::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Command lookup table that remembers registration order for help output.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.order.clone()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.commands.get(name).map(|entry| entry.handler)
    }

    /// Closest registered name to a mistyped command, if any is similar enough.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_ascii_lowercase();
        self.order
            .iter()
            .map(|name| (*name, strsim::jaro_winkler(&needle, name)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("expense", "", "", noop));
        registry.register(CommandEntry::new("income", "", "", noop));
        registry.register(CommandEntry::new("breakdown", "", "", noop));
        registry
    }

    #[test]
    fn keeps_registration_order_without_duplicates() {
        let mut registry = registry();
        registry.register(CommandEntry::new("income", "again", "", noop));
        assert_eq!(registry.names(), vec!["expense", "income", "breakdown"]);
        assert_eq!(registry.get("income").map(|e| e.description), Some("again"));
    }

    #[test]
    fn suggests_close_matches_only() {
        let registry = registry();
        assert_eq!(registry.suggest("expnse"), Some("expense"));
        assert_eq!(registry.suggest("INCOM"), Some("income"));
        assert_eq!(registry.suggest("zzz"), None);
    }
}
