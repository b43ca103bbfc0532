// World layout of the generated computer

use crate::codegen::coordinates::Coordinates;

// chain groups
pub const MAIN_GROUP_POS: Coordinates = Coordinates::new(0, 0, 0);
pub const ARITHMETIC_GROUP_POS: Coordinates = Coordinates::new(0, 1, 0);
pub const JUMP_GROUP_POS: Coordinates = Coordinates::new(0, 2, 0);
pub const CONSTANT_GROUP_POS: Coordinates = Coordinates::new(0, 3, 0);
pub const CARD_GROUP_POS: Coordinates = Coordinates::new(0, 4, 0);
pub const REGISTER_BANK_POS: Coordinates = Coordinates::new(0, 6, 0);

/// Z offset of the first binary arithmetic chain; the group's dispatch chain
/// sits at z = 0
pub const BINARY_OP_Z: i32 = 1;
/// Binary arithmetic operations occupy opcode bits 9..6 values 0..=13
pub const BINARY_OP_COUNT: i32 = 14;
/// Z offset of the first unary arithmetic chain
pub const UNARY_OP_Z: i32 = BINARY_OP_Z + BINARY_OP_COUNT;
pub const UNARY_OP_COUNT: i32 = 16;

/// Scratch region every relocation copies through
pub const BUFFER_POS: Coordinates = Coordinates::new(0, -32, 0);

// barrel memory
pub const MEM_BASE: Coordinates = Coordinates::new(0, 128, 0);
pub const MEM_SIZE: Coordinates = Coordinates::new(16, 16, 16);
pub const MEM_WORDS: i32 = 16 * 16 * 16;

/// Position of the chain group an opcode's top two bits select
pub fn group_position(group: i32) -> Coordinates {
    Coordinates::new(0, group + 1, 0)
}

/// Inclusive far corner of the memory cube
pub fn mem_end() -> Coordinates {
    MEM_BASE + MEM_SIZE - Coordinates::new(1, 1, 1)
}
