// Addressable entities
//
// Entities are the only things in the world that can be moved to a position
// computed at runtime, so every runtime-addressed access (memory, dispatch,
// register bank) goes through one.

use crate::codegen::command::Command;
use crate::codegen::coordinates::Coordinates;
use crate::codegen::error::CompilerError;
use crate::codegen::execute::{Condition, Execute, NbtType, StoreTarget};
use crate::codegen::session::CodeGen;
use crate::codegen::variable::Variable;
use crate::codegen::vector_variable::VectorVariable;

/// Markers have no gravity or hitbox, so a moved entity stays exactly where
/// it was put
pub const DEFAULT_KIND: &str = "minecraft:marker";

/// A uniquely tagged entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    kind: String,
    tag: String,
}

impl Entity {
    pub fn new(cg: &mut CodeGen) -> Self {
        Self::with_kind(cg, DEFAULT_KIND)
    }

    pub fn with_kind(cg: &mut CodeGen, kind: &str) -> Self {
        Entity {
            kind: kind.to_string(),
            tag: cg.new_tag(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Selector matching exactly this entity
    pub fn selector(&self) -> String {
        format!("@e[tag={},limit=1]", self.tag)
    }

    pub fn exists(&self) -> Condition {
        Condition::EntityExists(self.clone())
    }

    fn summon(&self) -> Command {
        Command::new(format!(
            "summon {} ~ ~ ~ {{Tags:['{}']}}",
            self.kind, self.tag
        ))
    }

    /// Summons the entity at the current position unless it already exists
    pub fn create(&self, cg: &mut CodeGen) -> Result<(), CompilerError> {
        Execute::new()
            .unless_condition(&self.exists())
            .run(cg, self.summon())
    }

    pub fn destroy(&self, cg: &mut CodeGen) -> Result<(), CompilerError> {
        cg.emit(format!("kill {}", self.selector()))
    }

    pub fn store_target(&self, path: &str, kind: NbtType, scale: f64) -> StoreTarget {
        StoreTarget::Entity {
            entity: self.clone(),
            path: path.to_string(),
            kind,
            scale,
        }
    }

    /// Copies a variable into an NBT path of this entity
    pub fn store_nbt(
        &self,
        cg: &mut CodeGen,
        path: &str,
        value: &Variable,
        kind: NbtType,
    ) -> Result<(), CompilerError> {
        Execute::new()
            .store_result(&self.store_target(path, kind, 1.0))
            .run(cg, value.get())
    }

    /// Moves the entity to a block corner known only at runtime
    pub fn set_pos(&self, cg: &mut CodeGen, position: &VectorVariable) -> Result<(), CompilerError> {
        for (axis, value) in position.axes().into_iter().enumerate() {
            self.store_nbt(cg, &format!("Pos[{}]", axis), value, NbtType::Double)?;
        }
        Ok(())
    }

    /// Moves the entity to a block corner known at generation time; one
    /// command instead of three
    pub fn teleport(&self, cg: &mut CodeGen, position: Coordinates) -> Result<(), CompilerError> {
        cg.emit(format!("tp {} {}", self.selector(), position.exact()))
    }
}
