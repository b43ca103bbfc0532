// A single command-block instruction

use std::fmt;

/// One command destined for one command block.
///
/// Placement is not part of the command: it is assigned when the chain that
/// holds the command is written out. An empty command is a placeholder, a
/// command block that exists but does nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Command {
    text: String,
}

impl Command {
    pub fn new(text: impl Into<String>) -> Self {
        Command { text: text.into() }
    }

    /// An empty command block reserving one position in a chain
    pub fn placeholder() -> Self {
        Command {
            text: String::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for Command {
    fn from(text: &str) -> Self {
        Command::new(text)
    }
}

impl From<String> for Command {
    fn from(text: String) -> Self {
        Command::new(text)
    }
}
