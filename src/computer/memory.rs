// Barrel memory
//
// 4096 twelve-bit words in a 16x16x16 cube of barrels. A word is split into
// two six-bit halves held as the item counts of slots 0 and 1. Counts can't
// be zero without the slot vanishing, so both halves are stored with a bias
// of one.

use crate::codegen::block::Block;
use crate::codegen::coordinates::{Coordinates, CURRENT};
use crate::codegen::entity::Entity;
use crate::codegen::error::CompilerError;
use crate::codegen::execute::Execute;
use crate::codegen::session::CodeGen;
use crate::codegen::variable::Variable;
use crate::codegen::vector_variable::VectorVariable;
use crate::computer::layout::{mem_end, MEM_BASE, MEM_WORDS};
use log::debug;

/// Pure model of the word <-> item-count encoding
pub struct MemoryCodec;

impl MemoryCodec {
    pub const BIAS: i32 = 1;
    pub const HALF: i32 = 64;
    pub const WORD: i32 = MEM_WORDS;

    /// Item counts for a word; values outside 0..4096 wrap
    pub fn encode(word: i32) -> (i32, i32) {
        let word = word.rem_euclid(Self::WORD);
        (
            word / Self::HALF + Self::BIAS,
            word % Self::HALF + Self::BIAS,
        )
    }

    pub fn decode(high: i32, low: i32) -> i32 {
        (high - Self::BIAS) * Self::HALF + (low - Self::BIAS)
    }

    pub fn decode_signed(high: i32, low: i32) -> i32 {
        let word = Self::decode(high, low);
        if word >= Self::WORD / 2 {
            word - Self::WORD
        } else {
            word
        }
    }
}

/// The memory head and the scores used while addressing it.
///
/// All of them are created once, in the init chain, and reused by every
/// access.
#[derive(Debug, Clone)]
pub struct Memory {
    head: Entity,
    address: VectorVariable,
    high: Variable,
    low: Variable,
}

impl Memory {
    pub fn new(cg: &mut CodeGen) -> Result<Self, CompilerError> {
        cg.in_init(|cg| {
            let memory = Memory {
                head: Entity::new(cg),
                address: VectorVariable::new(cg, "mem_index", MEM_BASE)?,
                high: Variable::new(cg, "mem_high", 0)?,
                low: Variable::new(cg, "mem_low", 0)?,
            };
            memory.initialize(cg)?;
            Ok(memory)
        })
    }

    pub fn head(&self) -> &Entity {
        &self.head
    }

    /// Fills the cube with zeroed barrels and summons the head
    pub fn initialize(&self, cg: &mut CodeGen) -> Result<(), CompilerError> {
        cg.emit(format!(
            "fill {} {} minecraft:barrel{{Items:[\
             {{Slot:0b,id:\"minecraft:stone\",Count:1b}},\
             {{Slot:1b,id:\"minecraft:stone\",Count:1b}}]}}",
            MEM_BASE,
            mem_end()
        ))?;
        self.head.create(cg)
    }

    /// Position of the barrel holding word `index`
    pub fn cell_position(index: i32) -> Coordinates {
        MEM_BASE + Coordinates::new(index % 16, (index / 16) % 16, (index / 256) % 16)
    }

    /// Writes a program image into the first words of memory, in the init
    /// chain, after the cube has been zeroed
    pub fn preload(&self, cg: &mut CodeGen, words: &[u16]) -> Result<(), CompilerError> {
        if words.len() > MEM_WORDS as usize {
            return Err(CompilerError::InvalidOperand(format!(
                "program of {} words does not fit in memory",
                words.len()
            )));
        }
        cg.in_init(|cg| {
            for (index, word) in words.iter().enumerate() {
                let position = Self::cell_position(index as i32);
                let (high, low) = MemoryCodec::encode(*word as i32);
                for (slot, count) in [(0, high), (1, low)] {
                    cg.emit(format!(
                        "data modify block {} Items[{}].Count set value {}b",
                        position, slot, count
                    ))?;
                }
            }
            Ok(())
        })?;
        debug!("preloaded {} words", words.len());
        Ok(())
    }

    /// Moves the head onto the barrel holding word `index`
    fn seek(&self, cg: &mut CodeGen, index: &Variable) -> Result<(), CompilerError> {
        let (x, y, z) = (self.address.x(), self.address.y(), self.address.z());
        x.set(cg, index)?;
        x.bitslice(cg, 0, 4, false)?;
        y.set(cg, index)?;
        y.bitslice(cg, 4, 4, false)?;
        // wraps instead of walking off the cube
        z.set(cg, index)?;
        z.bitslice(cg, 8, 4, false)?;
        self.address.offset(cg, MEM_BASE)?;
        self.head.set_pos(cg, &self.address)
    }

    /// `dest = mem[index]`, unsigned
    pub fn load(&self, cg: &mut CodeGen, index: &Variable, dest: &Variable) -> Result<(), CompilerError> {
        debug!("memory load {} -> {}", index, dest);
        self.seek(cg, index)?;
        let barrel = Block::new(CURRENT);
        Execute::new()
            .at_entity(&self.head)
            .store_result(&self.high.store_target())
            .run(cg, barrel.slot(0).get())?;
        Execute::new()
            .at_entity(&self.head)
            .store_result(&self.low.store_target())
            .run(cg, barrel.slot(1).get())?;

        dest.set(cg, &self.high)?;
        dest.sub_assign(cg, MemoryCodec::BIAS)?;
        dest.mul_assign(cg, MemoryCodec::HALF)?;
        dest.add_assign(cg, &self.low)?;
        dest.sub_assign(cg, MemoryCodec::BIAS)
    }

    /// `mem[index] = src mod 4096`
    pub fn store(&self, cg: &mut CodeGen, index: &Variable, src: &Variable) -> Result<(), CompilerError> {
        debug!("memory store {} -> {}", src, index);
        self.high.set(cg, src)?;
        self.high.rem_assign(cg, MemoryCodec::WORD)?;
        self.low.set(cg, &self.high)?;
        self.low.rem_assign(cg, MemoryCodec::HALF)?;
        self.low.add_assign(cg, MemoryCodec::BIAS)?;
        self.high.div_assign(cg, MemoryCodec::HALF)?;
        self.high.add_assign(cg, MemoryCodec::BIAS)?;

        self.seek(cg, index)?;
        let barrel = Block::new(CURRENT);
        Execute::new()
            .at_entity(&self.head)
            .store_result(&barrel.slot(0).store_target())
            .run(cg, self.high.get())?;
        Execute::new()
            .at_entity(&self.head)
            .store_result(&barrel.slot(1).store_target())
            .run(cg, self.low.get())
    }

    /// Stores at `sp`, then moves `sp` down
    pub fn push(&self, cg: &mut CodeGen, sp: &Variable, src: &Variable) -> Result<(), CompilerError> {
        self.store(cg, sp, src)?;
        sp.sub_assign(cg, 1)
    }

    /// Moves `sp` up, then loads from it
    pub fn pop(&self, cg: &mut CodeGen, sp: &Variable, dest: &Variable) -> Result<(), CompilerError> {
        sp.add_assign(cg, 1)?;
        self.load(cg, sp, dest)
    }
}
