// Instruction encodings
//
// A word is 12 bits. Each encoding is a fixed opcode prefix of
// `opcode_width` bits followed by operand bitfields.

use crate::codegen::error::CompilerError;
use crate::computer::registers::{GPR_NAMES, SCRATCH_NAMES};
use bitvec::prelude::*;
use std::fmt;

pub const WORD_BITS: u32 = 12;

/// `width` bits starting `skip` bits from the least significant end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitfield {
    pub width: u32,
    pub skip: u32,
}

impl Bitfield {
    pub const fn new(width: u32, skip: u32) -> Self {
        Bitfield { width, skip }
    }

    fn range(&self) -> std::ops::Range<usize> {
        self.skip as usize..(self.skip + self.width) as usize
    }

    pub fn get(&self, word: u16) -> u16 {
        word.view_bits::<Lsb0>()[self.range()].load_le::<u16>()
    }

    /// Replaces the field's bits. Negative values are stored in two's
    /// complement and must fit in `width` bits as signed numbers.
    pub fn set(&self, word: u16, value: i64) -> Result<u16, CompilerError> {
        let limit = 1i64 << self.width;
        if value >= limit || value < -(limit / 2) {
            return Err(CompilerError::FieldOverflow(value, self.width));
        }
        let raw = value.rem_euclid(limit) as u16;
        let mut word = word;
        word.view_bits_mut::<Lsb0>()[self.range()].store_le::<u16>(raw);
        Ok(word)
    }
}

/// Operand kinds an encoding can accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Imm,
    /// General-purpose register
    Gpr,
    /// Memory at the address in a general-purpose register
    Pointer,
    Scratch,
    ScratchPointer,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OperandKind::Imm => "imm",
            OperandKind::Gpr => "r32",
            OperandKind::Pointer => "p32",
            OperandKind::Scratch => "s32",
            OperandKind::ScratchPointer => "ps32",
        };
        write!(f, "{}", name)
    }
}

fn register_index(names: &[&str], name: &str) -> Option<i64> {
    names.iter().position(|n| *n == name).map(|i| i as i64)
}

/// Classifies one operand: `*reg` is a pointer, register names are
/// registers, everything else must be an integer
pub fn parse_field(text: &str) -> Result<(OperandKind, i64), CompilerError> {
    if let Some(reg) = text.strip_prefix('*') {
        if let Some(i) = register_index(&GPR_NAMES, reg) {
            return Ok((OperandKind::Pointer, i));
        }
        if let Some(i) = register_index(&SCRATCH_NAMES, reg) {
            return Ok((OperandKind::ScratchPointer, i));
        }
        return Err(CompilerError::InvalidOperand(text.to_string()));
    }
    if let Some(i) = register_index(&GPR_NAMES, text) {
        return Ok((OperandKind::Gpr, i));
    }
    if let Some(i) = register_index(&SCRATCH_NAMES, text) {
        return Ok((OperandKind::Scratch, i));
    }
    text.parse::<i64>()
        .map(|value| (OperandKind::Imm, value))
        .map_err(|_| CompilerError::InvalidOperand(text.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub name: &'static str,
    pub opcode: u16,
    pub opcode_width: u32,
    pub fields: Vec<(OperandKind, Bitfield)>,
}

impl Instruction {
    pub fn new(name: &'static str, opcode: u16, opcode_width: u32, fields: &[(OperandKind, Bitfield)]) -> Self {
        Instruction {
            name,
            opcode,
            opcode_width,
            fields: fields.to_vec(),
        }
    }

    pub fn field_kinds(&self) -> Vec<OperandKind> {
        self.fields.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn can_encode(&self, kinds: &[OperandKind]) -> bool {
        self.fields.len() == kinds.len() && self.fields.iter().zip(kinds).all(|((k, _), other)| k == other)
    }

    pub fn encode(&self, args: &[i64]) -> Result<u16, CompilerError> {
        let mut word = self.opcode << (WORD_BITS - self.opcode_width);
        for ((_, field), arg) in self.fields.iter().zip(args) {
            word = field.set(word, *arg)?;
        }
        Ok(word)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kinds: Vec<String> = self.field_kinds().iter().map(|k| k.to_string()).collect();
        write!(
            f,
            "{} {:0width$b} [{}]",
            self.name,
            self.opcode,
            kinds.join(", "),
            width = self.opcode_width as usize
        )
    }
}
