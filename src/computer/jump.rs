// Jump instruction group
//
// Opcodes 0o2000..0o3577 jump relative to ip: bits 9..7 are the condition
// and bits 6..0 a signed offset. Opcodes 0o3600..0o3777 jump to
// (bits 3..0) * 256 + cr with the condition in bits 6..4.

use crate::codegen::chain_context::ChainGroup;
use crate::codegen::error::CompilerError;
use crate::codegen::session::CodeGen;
use crate::codegen::variable::Variable;
use crate::codegen::vector_variable::VectorVariable;
use crate::computer::clone::RelocationWindow;
use crate::computer::layout::JUMP_GROUP_POS;
use crate::computer::Computer;
use log::debug;

pub const ABSOLUTE_BASE: i32 = 0o3600;

impl Computer {
    /// `ip = target` and mark the cycle as jumped
    fn take_jump(&self, cg: &mut CodeGen, target: &Variable) -> Result<(), CompilerError> {
        self.registers.ip.set(cg, target)?;
        self.registers.jumped.set(cg, 1)
    }

    pub fn jump_instructions(&self, cg: &mut CodeGen) -> Result<ChainGroup, CompilerError> {
        let regs = &self.registers;
        let (target, offset, return_address, position) = cg.in_init(|cg| {
            Ok((
                Variable::new(cg, "jump_target", 0)?,
                Variable::new(cg, "jump_offset", 0)?,
                Variable::new(cg, "return_address", 0)?,
                VectorVariable::new(cg, "jump_position", JUMP_GROUP_POS)?,
            ))
        })?;

        let mut group = ChainGroup::new("jump", true);
        let flags = &regs.flags;
        let conditional = [
            ("lt", &flags.lf),
            ("le", &flags.le),
            ("eq", &flags.eq),
            ("ge", &flags.ge),
            ("gt", &flags.gt),
            ("ne", &flags.ne),
        ];
        for (name, flag) in conditional {
            group.new_chain(cg, name, |cg| {
                cg.run_if(flag.gt(0), |cg| self.take_jump(cg, &target))?;
                Ok(())
            })?;
        }
        group.new_chain(cg, "jmp", |cg| self.take_jump(cg, &target))?;
        group.new_chain(cg, "call", |cg| {
            return_address.set(cg, &regs.ip)?;
            return_address.add_assign(cg, 1)?;
            self.push(cg, &return_address)?;
            self.take_jump(cg, &target)
        })?;

        let window = RelocationWindow::covering(group.label(), group.chains())?;
        group.check_window(window)?;

        let dispatch = cg.chain("jump/dispatch", true, |cg| {
            let opcode = &regs.opcode;
            let z = position.z();
            cg.run_if(opcode.lt(ABSOLUTE_BASE), |cg| {
                offset.set(cg, opcode)?;
                offset.rem_assign(cg, 128)?;
                offset.sign_extend(cg, 7)?;
                target.set(cg, &regs.ip)?;
                target.add_assign(cg, &offset)?;
                z.set(cg, opcode)?;
                z.bitslice(cg, 7, 3, false)?;
                z.add_assign(cg, 1)
            })?
            .or_else(cg, |cg| {
                target.set(cg, opcode)?;
                target.rem_assign(cg, 16)?;
                target.mul_assign(cg, 256)?;
                target.add_assign(cg, &regs.cr)?;
                z.set(cg, opcode)?;
                z.bitslice(cg, 4, 3, false)?;
                z.add_assign(cg, 1)
            })?;
            self.splicer.execute_arbitrary_code(cg, &position, window)
        })?;
        group.insert(0, dispatch);
        debug!("jump group: {} chains", group.len());
        Ok(group)
    }
}
