// Block entities and their inventory slots

use crate::codegen::command::Command;
use crate::codegen::coordinates::Coordinates;
use crate::codegen::execute::{NbtType, StoreTarget};

/// A block entity at a fixed or relative position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    position: Coordinates,
}

impl Block {
    pub fn new(position: Coordinates) -> Self {
        Block { position }
    }

    pub fn position(&self) -> Coordinates {
        self.position
    }

    pub fn store_target(&self, path: &str, kind: NbtType, scale: f64) -> StoreTarget {
        StoreTarget::Block {
            position: self.position,
            path: path.to_string(),
            kind,
            scale,
        }
    }

    pub fn slot(&self, slot: u8) -> ItemSlot {
        ItemSlot { block: *self, slot }
    }
}

/// The item count of one inventory slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSlot {
    block: Block,
    slot: u8,
}

impl ItemSlot {
    pub fn path(&self) -> String {
        format!("Items[{}].Count", self.slot)
    }

    pub fn store_target(&self) -> StoreTarget {
        self.block.store_target(&self.path(), NbtType::Byte, 1.0)
    }

    /// A command whose result is the item count
    pub fn get(&self) -> Command {
        Command::new(format!(
            "data get block {} {}",
            self.block.position,
            self.path()
        ))
    }
}
