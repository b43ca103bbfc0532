// Runtime-selected execution of pre-built chains
//
// The substrate has no computed jump. Instead, the chain to run is copied
// into placeholder units directly ahead of the running block, runs as part
// of the current chain, and is then overwritten with neutral blocks so the
// next relocation starts clean.
//
// Copy order matters: source -> buffer first, buffer -> destination second.
// The destination is relative to the executing block and the source is
// addressed through an entity, so the two copies cannot be fused.

use crate::codegen::chain_context::{ChainContext, ChainGroup};
use crate::codegen::command::Command;
use crate::codegen::coordinates::{Coordinates, CURRENT};
use crate::codegen::entity::Entity;
use crate::codegen::error::CompilerError;
use crate::codegen::execute::Execute;
use crate::codegen::output::CHAIN_BLOCK;
use crate::codegen::session::CodeGen;
use crate::codegen::vector_variable::VectorVariable;
use crate::computer::layout::BUFFER_POS;
use log::debug;

/// Number of units a relocation reserves ahead of the running block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationWindow {
    length: usize,
}

impl RelocationWindow {
    pub fn new(length: usize) -> Result<Self, CompilerError> {
        if length == 0 {
            return Err(CompilerError::EmptyRelocation(format!("{} units", length)));
        }
        Ok(RelocationWindow { length })
    }

    /// Window for a single unit, as used by the register bank
    pub fn single() -> Self {
        RelocationWindow { length: 1 }
    }

    /// The smallest window every one of `chains` fits in
    pub fn covering(label: &str, chains: &[ChainContext]) -> Result<Self, CompilerError> {
        let length = chains.iter().map(|c| c.len()).max().unwrap_or(0);
        if length == 0 {
            return Err(CompilerError::EmptyRelocation(label.to_string()));
        }
        debug!("relocation window for '{}': {} units", label, length);
        Ok(RelocationWindow { length })
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn verify(&self, chain: &ChainContext) -> Result<(), CompilerError> {
        if chain.len() > self.length {
            return Err(CompilerError::RelocationOverflow(
                chain.label().to_string(),
                chain.len(),
                self.length,
            ));
        }
        Ok(())
    }
}

impl ChainGroup {
    /// Checks that every chain a dispatcher can select fits in `window`
    pub fn check_window(&self, window: RelocationWindow) -> Result<(), CompilerError> {
        for chain in self.chains() {
            window.verify(chain)?;
        }
        Ok(())
    }
}

/// Owns the cloner entity; the copy buffer lives at a fixed position
#[derive(Debug, Clone)]
pub struct Splicer {
    cloner: Entity,
    buffer: Coordinates,
}

impl Splicer {
    /// Creates the cloner in the init chain
    pub fn new(cg: &mut CodeGen) -> Result<Self, CompilerError> {
        let cloner = cg.in_init(|cg| {
            let cloner = Entity::new(cg);
            cloner.create(cg)?;
            Ok(cloner)
        })?;
        Ok(Splicer {
            cloner,
            buffer: BUFFER_POS,
        })
    }

    pub fn cloner(&self) -> &Entity {
        &self.cloner
    }

    /// Runs the `window.len()` units starting at `source` as part of the
    /// current chain
    pub fn execute_arbitrary_code(
        &self,
        cg: &mut CodeGen,
        source: &VectorVariable,
        window: RelocationWindow,
    ) -> Result<(), CompilerError> {
        self.cloner.set_pos(cg, source)?;
        self.splice_from(cg, &self.cloner, window)
    }

    /// Splices in the units starting at the block `anchor` stands in
    pub fn splice_from(
        &self,
        cg: &mut CodeGen,
        anchor: &Entity,
        window: RelocationWindow,
    ) -> Result<(), CompilerError> {
        let length = window.len() as i32;
        let extent = Coordinates::new(length - 1, 0, 0);

        // source -> buffer
        Execute::new().at_entity(anchor).run(
            cg,
            format!(
                "clone {} {} {}",
                CURRENT,
                CURRENT + extent,
                self.buffer
            ),
        )?;
        // buffer -> the units right after this one
        cg.emit(format!(
            "clone {} {} {} masked",
            self.buffer,
            self.buffer + extent,
            Coordinates::relative(1, 0, 0)
        ))?;
        for _ in 0..window.len() {
            cg.emit(Command::placeholder())?;
        }
        // neutralize what just ran
        cg.emit(format!(
            "fill {} {} {}{{auto:1b}}",
            Coordinates::relative(-1, 0, 0),
            Coordinates::relative(-length, 0, 0),
            CHAIN_BLOCK
        ))
    }
}
