// The instruction table and the line encoder

use crate::assembler::instruction::{parse_field, Bitfield, Instruction, OperandKind};
use crate::codegen::error::CompilerError;
use indexmap::IndexMap;
use log::debug;

use OperandKind::{Gpr, Imm, Pointer, Scratch};

const IMM8: &[(OperandKind, Bitfield)] = &[(Imm, Bitfield::new(8, 0))];
const IMM7: &[(OperandKind, Bitfield)] = &[(Imm, Bitfield::new(7, 0))];
const IMM4: &[(OperandKind, Bitfield)] = &[(Imm, Bitfield::new(4, 0))];
const IMM4_IMM6: &[(OperandKind, Bitfield)] = &[(Imm, Bitfield::new(4, 6)), (Imm, Bitfield::new(6, 0))];
const R32: &[(OperandKind, Bitfield)] = &[(Gpr, Bitfield::new(3, 0))];

/// Two register operands: destination in bits 5..3, source in bits 2..0
const fn binary(dst: OperandKind, src: OperandKind) -> [(OperandKind, Bitfield); 2] {
    [(dst, Bitfield::new(3, 3)), (src, Bitfield::new(3, 0))]
}

const R32_R32: [(OperandKind, Bitfield); 2] = binary(Gpr, Gpr);
const R32_S32: [(OperandKind, Bitfield); 2] = binary(Gpr, Scratch);
const S32_R32: [(OperandKind, Bitfield); 2] = binary(Scratch, Gpr);
const R32_P32: [(OperandKind, Bitfield); 2] = binary(Gpr, Pointer);
const P32_R32: [(OperandKind, Bitfield); 2] = binary(Pointer, Gpr);

fn build_instructions() -> Vec<Instruction> {
    let mut table = vec![
        Instruction::new("mov", 0b000000, 6, &R32_R32),
        Instruction::new("add", 0b000001, 6, &R32_R32),
        Instruction::new("sub", 0b000010, 6, &R32_R32),
        Instruction::new("mul", 0b000011, 6, &R32_R32),
        Instruction::new("div", 0b000100, 6, &R32_R32),
        Instruction::new("mod", 0b000101, 6, &R32_R32),
        Instruction::new("min", 0b000110, 6, &R32_R32),
        Instruction::new("max", 0b000111, 6, &R32_R32),
        Instruction::new("split", 0b001000, 6, &R32_R32),
        Instruction::new("cmp", 0b001001, 6, &R32_R32),
        Instruction::new("mov", 0b001010, 6, &R32_S32),
        Instruction::new("mov", 0b001011, 6, &S32_R32),
        Instruction::new("mov", 0b001100, 6, &R32_P32),
        Instruction::new("mov", 0b001101, 6, &P32_R32),
        Instruction::new("ldc", 0b001110_000, 9, R32),
        Instruction::new("inc", 0b001110_001, 9, R32),
        Instruction::new("dec", 0b001110_010, 9, R32),
        Instruction::new("neg", 0b001110_011, 9, R32),
        Instruction::new("clr", 0b001110_100, 9, R32),
        Instruction::new("asr12", 0b001110_101, 9, R32),
        Instruction::new("asl12", 0b001110_110, 9, R32),
        Instruction::new("cmp", 0b001111_000, 9, R32),
        Instruction::new("push", 0b001111_001, 9, R32),
        Instruction::new("pop", 0b001111_010, 9, R32),
        Instruction::new("ret", 0b001111_110000, 12, &[]),
        Instruction::new("jlt", 0b01000, 5, IMM7),
        Instruction::new("jle", 0b01001, 5, IMM7),
        Instruction::new("jeq", 0b01010, 5, IMM7),
        Instruction::new("jge", 0b01011, 5, IMM7),
        Instruction::new("jgt", 0b01100, 5, IMM7),
        Instruction::new("jne", 0b01101, 5, IMM7),
        Instruction::new("jmp", 0b01110, 5, IMM7),
        Instruction::new("jlta", 0b01111000, 8, IMM4),
        Instruction::new("jlea", 0b01111001, 8, IMM4),
        Instruction::new("jeqa", 0b01111010, 8, IMM4),
        Instruction::new("jgea", 0b01111011, 8, IMM4),
        Instruction::new("jgta", 0b01111100, 8, IMM4),
        Instruction::new("jnea", 0b01111101, 8, IMM4),
        Instruction::new("jmpa", 0b01111110, 8, IMM4),
        Instruction::new("call", 0b01111111, 8, IMM4),
        Instruction::new("const", 0b1000, 4, IMM8),
        Instruction::new("sconst", 0b1001, 4, IMM8),
        Instruction::new("econst", 0b1010, 4, IMM8),
        Instruction::new("card", 0b11, 2, IMM4_IMM6),
    ];
    // reserved encodings keep their slots so the table covers the word space
    table.push(Instruction::new("RES0", 0b001110_111, 9, R32));
    for (i, low) in (0b011..=0b101).enumerate() {
        table.push(Instruction::new(RESERVED_UNARY[i], 0b001111_000 | low, 9, R32));
    }
    for (i, low) in (0b110001..=0b111111).enumerate() {
        table.push(Instruction::new(RESERVED_NULLARY[i], (0b001111 << 6) | low, 12, &[]));
    }
    table.push(Instruction::new("RES19", 0b1011, 4, IMM8));
    table
}

const RESERVED_UNARY: [&str; 3] = ["RES1", "RES2", "RES3"];
const RESERVED_NULLARY: [&str; 15] = [
    "RES4", "RES5", "RES6", "RES7", "RES8", "RES9", "RES10", "RES11", "RES12", "RES13", "RES14",
    "RES15", "RES16", "RES17", "RES18",
];

lazy_static! {
    pub static ref INSTRUCTIONS: Vec<Instruction> = build_instructions();
    /// Mnemonic to candidate encodings, tried in table order
    pub static ref BY_NAME: IndexMap<&'static str, Vec<&'static Instruction>> = {
        let mut m: IndexMap<&'static str, Vec<&'static Instruction>> = IndexMap::new();
        for inst in INSTRUCTIONS.iter() {
            m.entry(inst.name).or_default().push(inst);
        }
        m
    };
}

/// Encodes one line such as `add a0 a1` or `mov *a0 t1`
pub fn encode(line: &str) -> Result<u16, CompilerError> {
    let mut parts = line.split_whitespace();
    let mnemonic = parts
        .next()
        .ok_or_else(|| CompilerError::UnknownMnemonic(line.to_string()))?;

    let mut kinds = Vec::new();
    let mut values = Vec::new();
    for raw in parts {
        let (kind, value) = parse_field(raw.trim_end_matches(','))?;
        kinds.push(kind);
        values.push(value);
    }

    let candidates = BY_NAME
        .get(mnemonic)
        .ok_or_else(|| CompilerError::UnknownMnemonic(mnemonic.to_string()))?;
    for inst in candidates {
        if inst.can_encode(&kinds) {
            let word = inst.encode(&values)?;
            debug!("{} -> {:04o}", line.trim(), word);
            return Ok(word);
        }
    }
    Err(CompilerError::NoEncoding(
        mnemonic.to_string(),
        kinds.iter().map(|k| k.to_string()).collect(),
        candidates.iter().map(|c| c.to_string()).collect(),
    ))
}

/// Encodes a program, one instruction per line. Blank lines and lines
/// starting with `#` are skipped.
pub fn encode_program(source: &str) -> Result<Vec<u16>, CompilerError> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(encode)
        .collect()
}

/// Item-count halves of a word as stored in memory, without the bias
pub fn halves(word: u16) -> (u16, u16) {
    (word / 64, word % 64)
}
