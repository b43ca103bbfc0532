// Constant instruction group
//
// Opcodes 0o4000..0o5777 load an 8-bit immediate (bits 7..0) into cr.
// Bits 9..8 select const, sconst (sign extended) or econst (shifted in).

use crate::codegen::chain_context::ChainGroup;
use crate::codegen::error::CompilerError;
use crate::codegen::session::CodeGen;
use crate::codegen::variable::Variable;
use crate::codegen::vector_variable::VectorVariable;
use crate::computer::clone::RelocationWindow;
use crate::computer::layout::CONSTANT_GROUP_POS;
use crate::computer::Computer;

impl Computer {
    pub fn constant_instructions(&self, cg: &mut CodeGen) -> Result<ChainGroup, CompilerError> {
        let regs = &self.registers;
        let (imm, position) = cg.in_init(|cg| {
            Ok((
                Variable::new(cg, "const_imm", 0)?,
                VectorVariable::new(cg, "const_position", CONSTANT_GROUP_POS)?,
            ))
        })?;

        let mut group = ChainGroup::new("constant", true);
        group.new_chain(cg, "const", |cg| regs.cr.set(cg, &imm))?;
        group.new_chain(cg, "sconst", |cg| {
            imm.sign_extend(cg, 8)?;
            regs.cr.set(cg, &imm)
        })?;
        group.new_chain(cg, "econst", |cg| {
            regs.cr.mul_assign(cg, 256)?;
            regs.cr.add_assign(cg, &imm)
        })?;
        group.new_chain(cg, "reserved", |_| Ok(()))?;

        let window = RelocationWindow::covering(group.label(), group.chains())?;
        group.check_window(window)?;

        let dispatch = cg.chain("constant/dispatch", true, |cg| {
            imm.set(cg, &regs.opcode)?;
            imm.bitslice(cg, 0, 8, false)?;
            let z = position.z();
            z.set(cg, &regs.opcode)?;
            z.bitslice(cg, 8, 2, false)?;
            z.add_assign(cg, 1)?;
            self.splicer.execute_arbitrary_code(cg, &position, window)
        })?;
        group.insert(0, dispatch);
        Ok(group)
    }
}
