// Registers and the register bank
//
// Every register is a score created in the init chain. General-purpose and
// scratch registers can also be selected by a runtime index: the bank holds
// one row of transfer commands per access kind, and the unit at x = index is
// spliced into the running chain.

use crate::codegen::chain_context::ChainGroup;
use crate::codegen::coordinates::Coordinates;
use crate::codegen::entity::Entity;
use crate::codegen::error::CompilerError;
use crate::codegen::execute::NbtType;
use crate::codegen::session::CodeGen;
use crate::codegen::variable::Variable;
use crate::computer::clone::{RelocationWindow, Splicer};
use crate::computer::layout::REGISTER_BANK_POS;
use crate::computer::Computer;

pub const GPR_NAMES: [&str; 8] = ["a0", "a1", "a2", "t0", "t1", "s0", "s1", "s2"];
pub const SCRATCH_NAMES: [&str; 8] = ["x0", "x1", "x2", "x3", "y0", "y1", "y2", "y3"];

/// Top of the downward-growing stack
pub const STACK_TOP: i32 = 4095;

/// Row of the register bank, and so the z offset from its base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankOp {
    /// `reg_src = gpr[index]`
    LoadGpr = 0,
    /// `gpr[index] = reg_dst`
    StoreGpr = 1,
    LoadScratch = 2,
    StoreScratch = 3,
}

#[derive(Debug, Clone)]
pub struct Flags {
    pub lf: Variable,
    pub le: Variable,
    pub eq: Variable,
    pub ne: Variable,
    pub ge: Variable,
    pub gt: Variable,
}

#[derive(Debug, Clone)]
pub struct Registers {
    /// Constant register, filled by the constant instructions
    pub cr: Variable,
    pub ip: Variable,
    pub sp: Variable,
    pub bp: Variable,
    pub opcode: Variable,
    pub jumped: Variable,
    pub reg_src: Variable,
    pub reg_dst: Variable,
    pub gpr: Vec<Variable>,
    pub scratch: Vec<Variable>,
    pub flags: Flags,
    pub card_arg: Variable,
}

impl Registers {
    pub fn new(cg: &mut CodeGen) -> Result<Self, CompilerError> {
        cg.in_init(|cg| {
            let mut gpr = Vec::with_capacity(GPR_NAMES.len());
            for name in GPR_NAMES {
                gpr.push(Variable::new(cg, name, 0)?);
            }
            let mut scratch = Vec::with_capacity(SCRATCH_NAMES.len());
            for name in SCRATCH_NAMES {
                scratch.push(Variable::new(cg, name, 0)?);
            }
            Ok(Registers {
                cr: Variable::new(cg, "cr", 0)?,
                ip: Variable::new(cg, "ip", 0)?,
                sp: Variable::new(cg, "sp", STACK_TOP)?,
                bp: Variable::new(cg, "bp", STACK_TOP)?,
                opcode: Variable::new(cg, "opcode", 0)?,
                jumped: Variable::new(cg, "jumped", 0)?,
                reg_src: Variable::new(cg, "reg_src", 0)?,
                reg_dst: Variable::new(cg, "reg_dst", 0)?,
                gpr,
                scratch,
                flags: Flags {
                    lf: Variable::new(cg, "LF", 0)?,
                    le: Variable::new(cg, "LE", 0)?,
                    eq: Variable::new(cg, "EQ", 0)?,
                    ne: Variable::new(cg, "NE", 0)?,
                    ge: Variable::new(cg, "GE", 0)?,
                    gt: Variable::new(cg, "GT", 0)?,
                },
                card_arg: Variable::new(cg, "card_arg", 0)?,
            })
        })
    }

    pub fn gpr_named(&self, name: &str) -> Option<&Variable> {
        GPR_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| &self.gpr[i])
    }

    pub fn scratch_named(&self, name: &str) -> Option<&Variable> {
        SCRATCH_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| &self.scratch[i])
    }
}

/// The fetcher entity used to address the bank
#[derive(Debug, Clone)]
pub struct RegisterBank {
    fetcher: Entity,
}

impl RegisterBank {
    pub fn new(cg: &mut CodeGen) -> Result<Self, CompilerError> {
        let fetcher = cg.in_init(|cg| {
            let fetcher = Entity::new(cg);
            fetcher.create(cg)?;
            Ok(fetcher)
        })?;
        Ok(RegisterBank { fetcher })
    }

    /// Splices in the bank unit for `op` and register `index`
    pub fn access(
        &self,
        cg: &mut CodeGen,
        splicer: &Splicer,
        op: BankOp,
        index: &Variable,
    ) -> Result<(), CompilerError> {
        self.fetcher
            .teleport(cg, REGISTER_BANK_POS + Coordinates::new(0, 0, op as i32))?;
        // the bank starts at x = 0, so x is the index itself
        self.fetcher.store_nbt(cg, "Pos[0]", index, NbtType::Double)?;
        splicer.splice_from(cg, &self.fetcher, RelocationWindow::single())
    }

    /// One row per `BankOp`, each unit moving one register
    pub fn group(cg: &mut CodeGen, registers: &Registers) -> Result<ChainGroup, CompilerError> {
        let mut group = ChainGroup::new("registers", true);
        group.new_chain(cg, "load_gpr", |cg| {
            for r in &registers.gpr {
                registers.reg_src.set(cg, r)?;
            }
            Ok(())
        })?;
        group.new_chain(cg, "store_gpr", |cg| {
            for r in &registers.gpr {
                r.set(cg, &registers.reg_dst)?;
            }
            Ok(())
        })?;
        group.new_chain(cg, "load_scratch", |cg| {
            for r in &registers.scratch {
                registers.reg_src.set(cg, r)?;
            }
            Ok(())
        })?;
        group.new_chain(cg, "store_scratch", |cg| {
            for r in &registers.scratch {
                r.set(cg, &registers.reg_dst)?;
            }
            Ok(())
        })?;
        Ok(group)
    }
}

impl Computer {
    /// `dest = gpr[index]`
    pub fn get_gpr(&self, cg: &mut CodeGen, index: &Variable, dest: &Variable) -> Result<(), CompilerError> {
        self.bank.access(cg, &self.splicer, BankOp::LoadGpr, index)?;
        dest.set(cg, &self.registers.reg_src)
    }

    /// `gpr[index] = src`
    pub fn set_gpr(&self, cg: &mut CodeGen, index: &Variable, src: &Variable) -> Result<(), CompilerError> {
        self.registers.reg_dst.set(cg, src)?;
        self.bank.access(cg, &self.splicer, BankOp::StoreGpr, index)
    }

    pub fn get_scratch(&self, cg: &mut CodeGen, index: &Variable, dest: &Variable) -> Result<(), CompilerError> {
        self.bank.access(cg, &self.splicer, BankOp::LoadScratch, index)?;
        dest.set(cg, &self.registers.reg_src)
    }

    pub fn set_scratch(&self, cg: &mut CodeGen, index: &Variable, src: &Variable) -> Result<(), CompilerError> {
        self.registers.reg_dst.set(cg, src)?;
        self.bank.access(cg, &self.splicer, BankOp::StoreScratch, index)
    }

    pub fn push(&self, cg: &mut CodeGen, src: &Variable) -> Result<(), CompilerError> {
        self.memory.push(cg, &self.registers.sp, src)
    }

    pub fn pop(&self, cg: &mut CodeGen, dest: &Variable) -> Result<(), CompilerError> {
        self.memory.pop(cg, &self.registers.sp, dest)
    }
}
