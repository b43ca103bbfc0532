// Expansion cards
//
// Opcodes 0o6000..0o7777 hand control to one of up to sixteen user-supplied
// chains. Bits 9..6 pick the card, bits 5..0 are left in card_arg.

use crate::codegen::chain_context::ChainGroup;
use crate::codegen::error::CompilerError;
use crate::codegen::session::CodeGen;
use crate::codegen::variable::{Variable, OBJECTIVE};
use crate::codegen::vector_variable::VectorVariable;
use crate::computer::clone::RelocationWindow;
use crate::computer::layout::CARD_GROUP_POS;
use crate::computer::Computer;
use log::{debug, warn};

pub const MAX_CARDS: usize = 16;

/// A device plugged into the card slots
pub trait Card {
    fn name(&self) -> &str;

    /// Emits the card's chain. `card_arg` holds the low six opcode bits when
    /// it runs.
    fn generate(&self, cg: &mut CodeGen, computer: &Computer) -> Result<(), CompilerError>;
}

/// Shows the general-purpose register numbered by `card_arg` in chat
pub struct PrintRegisterCard {
    value: Variable,
}

impl PrintRegisterCard {
    pub fn new(cg: &mut CodeGen) -> Result<Self, CompilerError> {
        let value = cg.in_init(|cg| {
            let name = cg.find_name("card_print");
            Variable::new(cg, &name, 0)
        })?;
        Ok(PrintRegisterCard { value })
    }
}

impl Card for PrintRegisterCard {
    fn name(&self) -> &str {
        "print"
    }

    fn generate(&self, cg: &mut CodeGen, computer: &Computer) -> Result<(), CompilerError> {
        computer.get_gpr(cg, &computer.registers.card_arg, &self.value)?;
        cg.emit(format!(
            "tellraw @a {{\"score\":{{\"name\":\"{}\",\"objective\":\"{}\"}}}}",
            self.value.name(),
            OBJECTIVE
        ))
    }
}

impl Computer {
    pub fn card_instructions(&self, cg: &mut CodeGen, cards: &[Box<dyn Card>]) -> Result<ChainGroup, CompilerError> {
        if cards.len() > MAX_CARDS {
            return Err(CompilerError::InvalidOperand(format!(
                "{} cards, only {} slots",
                cards.len(),
                MAX_CARDS
            )));
        }
        let regs = &self.registers;
        let position = cg.in_init(|cg| VectorVariable::new(cg, "card_position", CARD_GROUP_POS))?;

        let mut group = ChainGroup::new("card", true);
        for card in cards {
            group.new_chain(cg, card.name(), |cg| card.generate(cg, self))?;
        }
        let window = if group.chains().iter().any(|c| !c.is_empty()) {
            let window = RelocationWindow::covering(group.label(), group.chains())?;
            group.check_window(window)?;
            Some(window)
        } else {
            warn!("no card chains; card opcodes only set card_arg");
            None
        };

        let dispatch = cg.chain("card/dispatch", true, |cg| {
            regs.card_arg.set(cg, &regs.opcode)?;
            regs.card_arg.bitslice(cg, 0, 6, false)?;
            if let Some(window) = window {
                let z = position.z();
                z.set(cg, &regs.opcode)?;
                z.bitslice(cg, 6, 4, false)?;
                z.add_assign(cg, 1)?;
                self.splicer.execute_arbitrary_code(cg, &position, window)?;
            }
            Ok(())
        })?;
        group.insert(0, dispatch);
        debug!("card group: {} cards", cards.len());
        Ok(group)
    }
}
