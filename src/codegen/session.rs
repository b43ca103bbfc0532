// Generation session
//
// Everything one program generation needs to remember lives here: the scope
// stack, the initialization chain, the variable name registry, memoized
// constants and the entity tag counter. Sessions are independent values, so
// two generations never see each other's names or constants.

use crate::codegen::chain_context::ChainContext;
use crate::codegen::command::Command;
use crate::codegen::error::CompilerError;
use crate::codegen::variable::{Variable, OBJECTIVE};
use indexmap::IndexSet;
use log::debug;

pub struct CodeGen {
    pub(crate) scopes: Vec<ChainContext>,
    pub(crate) init: ChainContext,
    names: IndexSet<String>,
    constants: IndexSet<i32>,
    next_tag: u32,
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGen {
    pub fn new() -> Self {
        let mut init = ChainContext::new("init", false);
        init.add(Command::new(format!(
            "scoreboard objectives add {} dummy",
            OBJECTIVE
        )));
        CodeGen {
            scopes: Vec::new(),
            init,
            names: IndexSet::new(),
            constants: IndexSet::new(),
            next_tag: 0,
        }
    }

    /// Claims a variable name, failing if another variable already holds it
    pub fn register_name(&mut self, name: &str) -> Result<(), CompilerError> {
        if !self.names.insert(name.to_string()) {
            return Err(CompilerError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    pub fn free_name(&mut self, name: &str) -> Result<(), CompilerError> {
        if !self.names.shift_remove(name) {
            return Err(CompilerError::UnknownName(name.to_string()));
        }
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns `name` if it is free, otherwise the first free `name0`, `name1`, ...
    pub fn find_name(&self, name: &str) -> String {
        if !self.names.contains(name) {
            return name.to_string();
        }
        let mut n = 0u32;
        loop {
            let trial = format!("{}{}", name, n);
            if !self.names.contains(&trial) {
                return trial;
            }
            n += 1;
        }
    }

    /// The score holding `value`, materialized in the init chain on first use
    pub fn constant(&mut self, value: i32) -> Variable {
        if self.constants.insert(value) {
            debug!("materializing constant {}", value);
            self.init_command(format!(
                "scoreboard players set {} {} {}",
                value, OBJECTIVE, value
            ));
        }
        Variable::constant_handle(value)
    }

    pub fn constants(&self) -> impl Iterator<Item = i32> + '_ {
        self.constants.iter().copied()
    }

    /// Hands out a new unique entity tag
    pub fn new_tag(&mut self) -> String {
        let tag = format!("e{}", self.next_tag);
        self.next_tag += 1;
        tag
    }

    pub fn init_len(&self) -> usize {
        self.init.len()
    }

    pub fn init_chain(&self) -> &ChainContext {
        &self.init
    }

    /// Ends the session, returning the initialization chain
    pub fn into_init(self) -> ChainContext {
        self.init
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_chain_creates_objective() {
        let cg = CodeGen::new();
        assert_eq!(
            cg.init_chain().contents()[0].text(),
            "scoreboard objectives add vars dummy"
        );
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut cg = CodeGen::new();
        cg.register_name("ip").unwrap();
        assert_eq!(
            cg.register_name("ip"),
            Err(CompilerError::DuplicateName("ip".to_string()))
        );
        cg.free_name("ip").unwrap();
        assert!(cg.register_name("ip").is_ok());
    }

    #[test]
    fn test_find_name_appends_suffix() {
        let mut cg = CodeGen::new();
        assert_eq!(cg.find_name("var_"), "var_");
        cg.register_name("var_").unwrap();
        cg.register_name("var_0").unwrap();
        assert_eq!(cg.find_name("var_"), "var_1");
    }

    #[test]
    fn test_constants_are_memoized() {
        let mut cg = CodeGen::new();
        let before = cg.init_len();
        let a = cg.constant(64);
        let b = cg.constant(64);
        cg.constant(-3);
        assert_eq!(a, b);
        assert_eq!(a.name(), "64");
        assert_eq!(cg.init_len(), before + 2);
        assert_eq!(
            cg.init_chain().contents()[before].text(),
            "scoreboard players set 64 vars 64"
        );
        assert_eq!(cg.constants().collect::<Vec<_>>(), vec![64, -3]);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut first = CodeGen::new();
        let mut second = CodeGen::new();
        first.register_name("a").unwrap();
        assert!(second.register_name("a").is_ok());
        assert_eq!(first.new_tag(), "e0");
        assert_eq!(first.new_tag(), "e1");
        assert_eq!(second.new_tag(), "e0");
    }
}
