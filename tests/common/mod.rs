#![allow(dead_code)]

pub mod substrate;

use chainforge::assembler::encode;
use chainforge::codegen::session::CodeGen;
use chainforge::computer::build_computer;
use chainforge::computer::card::{Card, PrintRegisterCard};
use substrate::{BlockPos, World};

pub const INIT_CHAIN: BlockPos = (0, 0, 0);
pub const PRIMARY_CHAIN: BlockPos = (0, 0, 1);

/// Assembles `lines`, builds a computer with them preloaded and runs its
/// init chain
pub fn boot(lines: &[&str]) -> World {
    boot_with_cards(lines, false)
}

pub fn boot_with_cards(lines: &[&str], printer: bool) -> World {
    let program: Vec<u16> = lines
        .iter()
        .map(|line| encode(line).unwrap_or_else(|e| panic!("{}: {}", line, e)))
        .collect();
    let mut cg = CodeGen::new();
    let mut cards: Vec<Box<dyn Card>> = Vec::new();
    if printer {
        cards.push(Box::new(PrintRegisterCard::new(&mut cg).unwrap()));
    }
    let listing = build_computer(cg, &cards, &program).unwrap();
    let mut world = World::from_listing(&listing);
    world.run_chain(INIT_CHAIN);
    world
}

/// One fetch-dispatch-retire cycle
pub fn step(world: &mut World) {
    world.run_chain(PRIMARY_CHAIN);
}

pub fn run(world: &mut World, cycles: usize) {
    for _ in 0..cycles {
        step(world);
    }
}
