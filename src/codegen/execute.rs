// Execute builder and structured control emulation
//
// A command block can only guard the single command it holds. "if" blocks are
// emulated by capturing a scope and re-emitting each of its commands with the
// same guard prefix.

use crate::codegen::command::Command;
use crate::codegen::coordinates::Coordinates;
use crate::codegen::entity::Entity;
use crate::codegen::error::CompilerError;
use crate::codegen::session::CodeGen;
use crate::codegen::variable::{IntRange, Variable, OBJECTIVE};
use std::fmt;

/// Comparison operators understood by `execute if score`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Less => "<",
            CompareOp::LessEqual => "<=",
            CompareOp::Equal => "=",
            CompareOp::GreaterEqual => ">=",
            CompareOp::Greater => ">",
        }
    }
}

/// Something that can be tested by `execute if` / `execute unless`.
///
/// Conditions are never materialized; they are rendered into guard text when
/// an `Execute` consumes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        left: Variable,
        op: CompareOp,
        right: Variable,
    },
    Matches {
        variable: Variable,
        range: IntRange,
    },
    EntityExists(Entity),
}

impl Condition {
    pub fn render(&self) -> String {
        match self {
            Condition::Compare { left, op, right } => format!(
                "score {} {} {} {} {}",
                left.name(),
                OBJECTIVE,
                op.symbol(),
                right.name(),
                OBJECTIVE
            ),
            Condition::Matches { variable, range } => {
                format!("score {} {} matches {}", variable.name(), OBJECTIVE, range)
            }
            Condition::EntityExists(entity) => format!("entity {}", entity.selector()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// NBT numeric types used when storing a result into NBT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NbtType {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl fmt::Display for NbtType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            NbtType::Byte => "byte",
            NbtType::Short => "short",
            NbtType::Int => "int",
            NbtType::Long => "long",
            NbtType::Float => "float",
            NbtType::Double => "double",
        };
        write!(f, "{}", name)
    }
}

/// Somewhere `execute store` can put a command's result
#[derive(Debug, Clone, PartialEq)]
pub enum StoreTarget {
    Score(Variable),
    Entity {
        entity: Entity,
        path: String,
        kind: NbtType,
        scale: f64,
    },
    Block {
        position: Coordinates,
        path: String,
        kind: NbtType,
        scale: f64,
    },
}

impl StoreTarget {
    pub fn render(&self) -> String {
        match self {
            StoreTarget::Score(variable) => format!("score {} {}", variable.name(), OBJECTIVE),
            StoreTarget::Entity {
                entity,
                path,
                kind,
                scale,
            } => format!("entity {} {} {} {}", entity.selector(), path, kind, scale),
            StoreTarget::Block {
                position,
                path,
                kind,
                scale,
            } => format!("block {} {} {} {}", position, path, kind, scale),
        }
    }
}

/// Builder for one `execute ... run ...` emission.
///
/// Qualifiers are order sensitive and accumulate as text. Every terminal
/// method consumes the builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Execute {
    parts: Vec<String>,
}

impl Execute {
    pub fn new() -> Self {
        Execute { parts: Vec::new() }
    }

    pub fn at_entity(mut self, entity: &Entity) -> Self {
        self.parts.push(format!("at {}", entity.selector()));
        self
    }

    pub fn as_entity(mut self, entity: &Entity) -> Self {
        self.parts.push(format!("as {}", entity.selector()));
        self
    }

    pub fn if_condition(mut self, condition: &Condition) -> Self {
        self.parts.push(format!("if {}", condition.render()));
        self
    }

    pub fn unless_condition(mut self, condition: &Condition) -> Self {
        self.parts.push(format!("unless {}", condition.render()));
        self
    }

    pub fn store_result(mut self, target: &StoreTarget) -> Self {
        self.parts.push(format!("store result {}", target.render()));
        self
    }

    pub fn store_success(mut self, target: &StoreTarget) -> Self {
        self.parts.push(format!("store success {}", target.render()));
        self
    }

    /// Wraps one command with the accumulated qualifiers. Placeholders stay
    /// placeholders: they only reserve a position.
    pub fn wrap(&self, command: &Command) -> Command {
        if command.is_placeholder() || self.parts.is_empty() {
            return command.clone();
        }
        Command::new(format!("execute {} run {}", self.parts.join(" "), command))
    }

    pub fn run(self, cg: &mut CodeGen, command: impl Into<Command>) -> Result<(), CompilerError> {
        let wrapped = self.wrap(&command.into());
        cg.emit(wrapped)
    }

    pub fn run_all<I>(self, cg: &mut CodeGen, commands: I) -> Result<(), CompilerError>
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            cg.emit(self.wrap(&command))?;
        }
        Ok(())
    }

    /// Captures everything `f` emits and re-emits each command individually
    /// guarded by this builder's qualifiers
    pub fn run_block<F>(self, cg: &mut CodeGen, f: F) -> Result<(), CompilerError>
    where
        F: FnOnce(&mut CodeGen) -> Result<(), CompilerError>,
    {
        let captured = cg.capture(f)?;
        self.run_all(cg, captured)
    }
}

/// The guard of an emitted `run_if` / `run_unless` block, kept so an else
/// block can replay its opposite.
///
/// The opposite guard is evaluated per command after the first block ran, so
/// a first block that changes the condition's operands also changes which
/// else commands fire.
#[derive(Debug, Clone, PartialEq)]
pub struct IfChain {
    condition: Condition,
    negated: bool,
}

impl IfChain {
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn or_else<F>(self, cg: &mut CodeGen, f: F) -> Result<(), CompilerError>
    where
        F: FnOnce(&mut CodeGen) -> Result<(), CompilerError>,
    {
        let execute = if self.negated {
            Execute::new().if_condition(&self.condition)
        } else {
            Execute::new().unless_condition(&self.condition)
        };
        execute.run_block(cg, f)
    }
}

impl CodeGen {
    pub fn run_if<F>(&mut self, condition: Condition, f: F) -> Result<IfChain, CompilerError>
    where
        F: FnOnce(&mut CodeGen) -> Result<(), CompilerError>,
    {
        Execute::new().if_condition(&condition).run_block(self, f)?;
        Ok(IfChain {
            condition,
            negated: false,
        })
    }

    pub fn run_unless<F>(&mut self, condition: Condition, f: F) -> Result<IfChain, CompilerError>
    where
        F: FnOnce(&mut CodeGen) -> Result<(), CompilerError>,
    {
        Execute::new().unless_condition(&condition).run_block(self, f)?;
        Ok(IfChain {
            condition,
            negated: true,
        })
    }
}
