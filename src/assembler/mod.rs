// Assembler
// Packs one mnemonic line at a time into a 12-bit word

pub mod instruction;
pub mod listings;

pub use instruction::{Bitfield, Instruction, OperandKind};
pub use listings::{encode, encode_program, halves};
