// The generated CPU
//
// One instruction per run of the primary chain: fetch the word at ip, pick
// the instruction group from its top two bits, splice that group's dispatch
// chain in, and retire.

pub mod arithmetic;
pub mod card;
pub mod clone;
pub mod constant;
pub mod jump;
pub mod layout;
pub mod memory;
pub mod registers;


use crate::codegen::chain_context::{ChainContext, ChainGroup};
use crate::codegen::error::CompilerError;
use crate::codegen::output::Listing;
use crate::codegen::session::CodeGen;
use crate::codegen::vector_variable::VectorVariable;
use card::Card;
use clone::{RelocationWindow, Splicer};
use layout::{
    ARITHMETIC_GROUP_POS, CARD_GROUP_POS, CONSTANT_GROUP_POS, JUMP_GROUP_POS, MAIN_GROUP_POS,
    REGISTER_BANK_POS,
};
use log::info;
use memory::Memory;
use registers::{RegisterBank, Registers};

/// Everything instruction chains share at runtime
#[derive(Debug, Clone)]
pub struct Computer {
    pub registers: Registers,
    pub memory: Memory,
    pub splicer: Splicer,
    pub bank: RegisterBank,
}

impl Computer {
    /// Creates registers, memory and the helper entities in the init chain
    pub fn new(cg: &mut CodeGen) -> Result<Self, CompilerError> {
        let memory = Memory::new(cg)?;
        let splicer = Splicer::new(cg)?;
        let bank = RegisterBank::new(cg)?;
        let registers = Registers::new(cg)?;
        Ok(Computer {
            registers,
            memory,
            splicer,
            bank,
        })
    }

    /// Fetch, decode, dispatch and retire one instruction.
    ///
    /// `groups` are the instruction groups in opcode order; chain 0 of each
    /// is its dispatch chain.
    pub fn primary_chain(&self, cg: &mut CodeGen, groups: &[&ChainGroup]) -> Result<ChainContext, CompilerError> {
        let dispatchers: Vec<ChainContext> = groups.iter().filter_map(|g| g.chain(0).cloned()).collect();
        let window = RelocationWindow::covering("dispatch", &dispatchers)?;
        let position = cg.in_init(|cg| VectorVariable::new(cg, "dispatch_position", ARITHMETIC_GROUP_POS))?;
        let regs = &self.registers;

        cg.chain("main/primary", false, |cg| {
            self.memory.load(cg, &regs.ip, &regs.opcode)?;

            let y = position.y();
            y.set(cg, &regs.opcode)?;
            y.bitslice(cg, 10, 2, true)?;
            y.add_assign(cg, ARITHMETIC_GROUP_POS.y.value)?;
            self.splicer.execute_arbitrary_code(cg, &position, window)?;

            cg.run_if(regs.jumped.equals(0), |cg| regs.ip.add_assign(cg, 1))?
                .or_else(cg, |cg| regs.jumped.set(cg, 0))
        })
    }
}

/// Generates the whole computer with `program` preloaded at address 0 and
/// lays it out
pub fn build_computer(
    mut cg: CodeGen,
    cards: &[Box<dyn Card>],
    program: &[u16],
) -> Result<Listing, CompilerError> {
    let computer = Computer::new(&mut cg)?;
    computer.memory.preload(&mut cg, program)?;

    let arithmetic = computer.arithmetic_instructions(&mut cg)?;
    let jump = computer.jump_instructions(&mut cg)?;
    let constant = computer.constant_instructions(&mut cg)?;
    let card = computer.card_instructions(&mut cg, cards)?;
    let bank = RegisterBank::group(&mut cg, &computer.registers)?;

    let primary = computer.primary_chain(&mut cg, &[&arithmetic, &jump, &constant, &card])?;

    let mut main = ChainGroup::new("main", false);
    main.add(cg.into_init());
    main.add(primary);

    let mut listing = Listing::new();
    listing.write_group(MAIN_GROUP_POS, &main)?;
    listing.write_group(ARITHMETIC_GROUP_POS, &arithmetic)?;
    listing.write_group(JUMP_GROUP_POS, &jump)?;
    listing.write_group(CONSTANT_GROUP_POS, &constant)?;
    listing.write_group(CARD_GROUP_POS, &card)?;
    listing.write_group(REGISTER_BANK_POS, &bank)?;
    info!("computer: {} command blocks", listing.len());
    Ok(listing)
}
