// Chain contexts and the emission scope stack
//
// The stack is LIFO. The top element receives every emitted command; nesting
// order is the only thing routing a command to the right chain.

use crate::codegen::session::CodeGen;
use crate::codegen::command::Command;
use crate::codegen::error::CompilerError;
use log::debug;

/// An ordered, append-only list of commands that will become one chain of
/// command blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainContext {
    label: String,
    contents: Vec<Command>,
    /// When set the chain has no impulse start block: every unit is an
    /// always-active chain block. Used for chains that only ever run after
    /// being relocated into another chain.
    only_chain: bool,
}

impl ChainContext {
    pub fn new(label: impl Into<String>, only_chain: bool) -> Self {
        ChainContext {
            label: label.into(),
            contents: Vec::new(),
            only_chain,
        }
    }

    pub fn with_commands(label: impl Into<String>, contents: Vec<Command>, only_chain: bool) -> Self {
        ChainContext {
            label: label.into(),
            contents,
            only_chain,
        }
    }

    pub fn add(&mut self, command: Command) {
        self.contents.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.contents.extend(commands);
    }

    pub fn contents(&self) -> &[Command] {
        &self.contents
    }

    pub fn into_contents(self) -> Vec<Command> {
        self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn only_chain(&self) -> bool {
        self.only_chain
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_only_chain(&mut self, only_chain: bool) {
        self.only_chain = only_chain;
    }
}

/// A group of command block chains, placed at positions increasing on the Z axis.
#[derive(Debug, Clone, Default)]
pub struct ChainGroup {
    label: String,
    chains: Vec<ChainContext>,
    only_chain: bool,
}

impl ChainGroup {
    pub fn new(label: impl Into<String>, only_chain: bool) -> Self {
        ChainGroup {
            label: label.into(),
            chains: Vec::new(),
            only_chain,
        }
    }

    /// Records a new chain at the end of the group, returning its index
    pub fn new_chain<F>(&mut self, cg: &mut CodeGen, name: &str, f: F) -> Result<usize, CompilerError>
    where
        F: FnOnce(&mut CodeGen) -> Result<(), CompilerError>,
    {
        let label = format!("{}/{}", self.label, name);
        let chain = cg.chain(&label, self.only_chain, f)?;
        self.chains.push(chain);
        Ok(self.chains.len() - 1)
    }

    /// Adds an externally-created chain context to the group
    pub fn add(&mut self, chain: ChainContext) {
        self.chains.push(chain);
    }

    pub fn insert(&mut self, index: usize, chain: ChainContext) {
        self.chains.insert(index, chain);
    }

    pub fn chains(&self) -> &[ChainContext] {
        &self.chains
    }

    pub fn chain(&self, index: usize) -> Option<&ChainContext> {
        self.chains.get(index)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn only_chain(&self) -> bool {
        self.only_chain
    }
}

impl CodeGen {
    /// Pushes a fresh scope; later emissions land in it until `exit`
    pub fn enter(&mut self) {
        self.scopes.push(ChainContext::default());
        debug!("scope enter: depth {}", self.scopes.len());
    }

    pub fn exit(&mut self) -> Result<ChainContext, CompilerError> {
        let scope = self.scopes.pop().ok_or(CompilerError::NoActiveScope)?;
        debug!(
            "scope exit: depth {} ({} commands)",
            self.scopes.len() + 1,
            scope.len()
        );
        Ok(scope)
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Appends a command to the scope on top of the stack
    pub fn emit(&mut self, command: impl Into<Command>) -> Result<(), CompilerError> {
        let command = command.into();
        let scope = self.scopes.last_mut().ok_or(CompilerError::NoActiveScope)?;
        scope.add(command);
        Ok(())
    }

    /// Runs `f` in a nested scope and hands back what it emitted, without
    /// flushing it to the enclosing scope.
    pub fn capture<F>(&mut self, f: F) -> Result<Vec<Command>, CompilerError>
    where
        F: FnOnce(&mut CodeGen) -> Result<(), CompilerError>,
    {
        let depth = self.scopes.len();
        self.enter();
        let result = f(self);
        // a failing body may leave inner scopes behind
        self.scopes.truncate(depth + 1);
        let scope = self.exit()?;
        result?;
        Ok(scope.into_contents())
    }

    /// Captures `f` as a labelled chain
    pub fn chain<F>(&mut self, label: &str, only_chain: bool, f: F) -> Result<ChainContext, CompilerError>
    where
        F: FnOnce(&mut CodeGen) -> Result<(), CompilerError>,
    {
        let contents = self.capture(f)?;
        debug!("chain '{}': {} commands", label, contents.len());
        Ok(ChainContext::with_commands(label, contents, only_chain))
    }

    /// Runs `f` with its emissions appended to the initialization chain
    pub fn in_init<T, F>(&mut self, f: F) -> Result<T, CompilerError>
    where
        F: FnOnce(&mut CodeGen) -> Result<T, CompilerError>,
    {
        let depth = self.scopes.len();
        self.enter();
        let result = f(self);
        self.scopes.truncate(depth + 1);
        let scope = self.exit()?;
        let value = result?;
        self.init.extend(scope.into_contents());
        Ok(value)
    }

    /// Appends a command straight to the initialization chain, whatever
    /// scope is currently active
    pub fn init_command(&mut self, command: impl Into<Command>) {
        self.init.add(command.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_scope_fails() {
        let mut cg = CodeGen::new();
        assert_eq!(cg.emit("say hi"), Err(CompilerError::NoActiveScope));
        assert!(matches!(cg.exit(), Err(CompilerError::NoActiveScope)));
    }

    #[test]
    fn test_emit_goes_to_top_scope() {
        let mut cg = CodeGen::new();
        cg.enter();
        cg.emit("say outer").unwrap();
        cg.enter();
        cg.emit("say inner").unwrap();
        let inner = cg.exit().unwrap();
        let outer = cg.exit().unwrap();
        assert_eq!(inner.contents(), &[Command::new("say inner")]);
        assert_eq!(outer.contents(), &[Command::new("say outer")]);
    }

    #[test]
    fn test_capture_does_not_flush() {
        let mut cg = CodeGen::new();
        cg.enter();
        cg.emit("say before").unwrap();
        let captured = cg
            .capture(|cg| {
                cg.emit("say captured")?;
                cg.emit("say captured again")
            })
            .unwrap();
        cg.emit("say after").unwrap();
        let outer = cg.exit().unwrap();

        assert_eq!(captured.len(), 2);
        assert_eq!(
            outer.contents(),
            &[Command::new("say before"), Command::new("say after")]
        );
    }

    #[test]
    fn test_capture_restores_depth_on_error() {
        let mut cg = CodeGen::new();
        cg.enter();
        let result = cg.capture(|cg| {
            cg.enter();
            cg.emit("say lost")?;
            Err(CompilerError::UnknownName("lost".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(cg.scope_depth(), 1);
    }

    #[test]
    fn test_in_init_appends_to_init_chain() {
        let mut cg = CodeGen::new();
        let before = cg.init_len();
        let value = cg
            .in_init(|cg| {
                cg.emit("say setup")?;
                Ok(7)
            })
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(cg.init_len(), before + 1);
        assert_eq!(cg.scope_depth(), 0);
    }

    #[test]
    fn test_group_places_chains_in_order() {
        let mut cg = CodeGen::new();
        let mut group = ChainGroup::new("ops", true);
        let first = group.new_chain(&mut cg, "first", |cg| cg.emit("say 1")).unwrap();
        let second = group.new_chain(&mut cg, "second", |cg| cg.emit("say 2")).unwrap();
        assert_eq!((first, second), (0, 1));
        assert_eq!(group.chain(1).unwrap().label(), "ops/second");
        assert!(group.chain(0).unwrap().only_chain());
    }
}
