// Arithmetic instruction group
//
// Opcodes 0o0000..0o1777. Binary operations select their chain with bits
// 9..6 and their registers with bits 5..3 (dst) and 2..0 (src). Opcodes
// 0o1600 and up are unary: bits 8..3 pick one of sixteen operations, bits
// 2..0 the register.

use crate::codegen::chain_context::ChainGroup;
use crate::codegen::error::CompilerError;
use crate::codegen::session::CodeGen;
use crate::codegen::variable::{Operand, Variable};
use crate::codegen::vector_variable::VectorVariable;
use crate::computer::clone::RelocationWindow;
use crate::computer::layout::{ARITHMETIC_GROUP_POS, BINARY_OP_Z, UNARY_OP_Z};
use crate::computer::registers::Flags;
use crate::computer::Computer;
use log::debug;

pub const UNARY_BASE: i32 = 0o1600;

/// Scores shared by every arithmetic chain
struct Operands {
    src: Variable,
    dst: Variable,
    a: Variable,
    b: Variable,
    target: VectorVariable,
}

impl Operands {
    fn new(cg: &mut CodeGen) -> Result<Self, CompilerError> {
        cg.in_init(|cg| {
            Ok(Operands {
                src: Variable::new(cg, "arith_src", 0)?,
                dst: Variable::new(cg, "arith_dst", 0)?,
                a: Variable::new(cg, "arith_a", 0)?,
                b: Variable::new(cg, "arith_b", 0)?,
                target: VectorVariable::new(cg, "arith_target", ARITHMETIC_GROUP_POS)?,
            })
        })
    }
}

/// Sets all six flags from comparing `left` with `right`
pub fn compare(cg: &mut CodeGen, flags: &Flags, left: &Variable, right: impl Into<Operand>) -> Result<(), CompilerError> {
    let right = right.into();
    let checks = [
        (&flags.lf, left.lt(right.clone())),
        (&flags.le, left.le(right.clone())),
        (&flags.ge, left.ge(right.clone())),
        (&flags.gt, left.gt(right.clone())),
    ];
    for (flag, condition) in checks {
        cg.run_if(condition, |cg| flag.set(cg, 1))?
            .or_else(cg, |cg| flag.set(cg, 0))?;
    }
    cg.run_if(left.equals(right), |cg| {
        flags.eq.set(cg, 1)?;
        flags.ne.set(cg, 0)
    })?
    .or_else(cg, |cg| {
        flags.eq.set(cg, 0)?;
        flags.ne.set(cg, 1)
    })
}

impl Computer {
    /// `dst op= src` on general-purpose registers
    fn binary_op<F>(
        &self,
        group: &mut ChainGroup,
        cg: &mut CodeGen,
        ops: &Operands,
        name: &str,
        f: F,
    ) -> Result<usize, CompilerError>
    where
        F: FnOnce(&mut CodeGen, &Variable, &Variable) -> Result<(), CompilerError>,
    {
        group.new_chain(cg, name, |cg| {
            self.get_gpr(cg, &ops.dst, &ops.a)?;
            self.get_gpr(cg, &ops.src, &ops.b)?;
            f(cg, &ops.a, &ops.b)?;
            self.set_gpr(cg, &ops.dst, &ops.a)
        })
    }

    /// `r = f(r)` on the general-purpose register in bits 2..0
    fn unary_op<F>(
        &self,
        group: &mut ChainGroup,
        cg: &mut CodeGen,
        ops: &Operands,
        name: &str,
        f: F,
    ) -> Result<usize, CompilerError>
    where
        F: FnOnce(&mut CodeGen, &Variable) -> Result<(), CompilerError>,
    {
        group.new_chain(cg, name, |cg| {
            self.get_gpr(cg, &ops.src, &ops.a)?;
            f(cg, &ops.a)?;
            self.set_gpr(cg, &ops.src, &ops.a)
        })
    }

    fn reserved(group: &mut ChainGroup, cg: &mut CodeGen) -> Result<usize, CompilerError> {
        group.new_chain(cg, "reserved", |_| Ok(()))
    }

    pub fn arithmetic_instructions(&self, cg: &mut CodeGen) -> Result<ChainGroup, CompilerError> {
        let ops = Operands::new(cg)?;
        let regs = &self.registers;
        let mut group = ChainGroup::new("arithmetic", true);

        // binary, z = 1 + bits 9..6
        self.binary_op(&mut group, cg, &ops, "mov", |cg, a, b| a.set(cg, b))?;
        self.binary_op(&mut group, cg, &ops, "add", |cg, a, b| a.add_assign(cg, b))?;
        self.binary_op(&mut group, cg, &ops, "sub", |cg, a, b| a.sub_assign(cg, b))?;
        self.binary_op(&mut group, cg, &ops, "mul", |cg, a, b| a.mul_assign(cg, b))?;
        self.binary_op(&mut group, cg, &ops, "div", |cg, a, b| a.div_assign(cg, b))?;
        self.binary_op(&mut group, cg, &ops, "mod", |cg, a, b| a.rem_assign(cg, b))?;
        self.binary_op(&mut group, cg, &ops, "min", |cg, a, b| a.min_assign(cg, b))?;
        self.binary_op(&mut group, cg, &ops, "max", |cg, a, b| a.max_assign(cg, b))?;
        group.new_chain(cg, "split", |cg| {
            self.get_gpr(cg, &ops.src, &ops.b)?;
            ops.a.set(cg, &ops.b)?;
            ops.a.rem_assign(cg, 0o1000)?;
            ops.b.div_assign(cg, 0o1000)?;
            self.set_gpr(cg, &ops.dst, &ops.a)?;
            self.set_gpr(cg, &ops.src, &ops.b)
        })?;
        group.new_chain(cg, "cmp", |cg| {
            self.get_gpr(cg, &ops.dst, &ops.a)?;
            self.get_gpr(cg, &ops.src, &ops.b)?;
            compare(cg, &regs.flags, &ops.a, &ops.b)
        })?;
        group.new_chain(cg, "mov_from_scratch", |cg| {
            self.get_scratch(cg, &ops.src, &ops.a)?;
            self.set_gpr(cg, &ops.dst, &ops.a)
        })?;
        group.new_chain(cg, "mov_to_scratch", |cg| {
            self.get_gpr(cg, &ops.src, &ops.a)?;
            self.set_scratch(cg, &ops.dst, &ops.a)
        })?;
        group.new_chain(cg, "load", |cg| {
            self.get_gpr(cg, &ops.src, &ops.a)?;
            self.memory.load(cg, &ops.a, &ops.b)?;
            self.set_gpr(cg, &ops.dst, &ops.b)
        })?;
        group.new_chain(cg, "store", |cg| {
            self.get_gpr(cg, &ops.dst, &ops.a)?;
            self.get_gpr(cg, &ops.src, &ops.b)?;
            self.memory.store(cg, &ops.a, &ops.b)
        })?;

        // simple unary, z = 15 + bits 5..3
        group.new_chain(cg, "ldc", |cg| self.set_gpr(cg, &ops.src, &regs.cr))?;
        self.unary_op(&mut group, cg, &ops, "inc", |cg, a| a.add_assign(cg, 1))?;
        self.unary_op(&mut group, cg, &ops, "dec", |cg, a| a.sub_assign(cg, 1))?;
        self.unary_op(&mut group, cg, &ops, "neg", |cg, a| a.mul_assign(cg, -1))?;
        group.new_chain(cg, "clr", |cg| {
            ops.a.set(cg, 0)?;
            self.set_gpr(cg, &ops.src, &ops.a)
        })?;
        self.unary_op(&mut group, cg, &ops, "asr12", |cg, a| a.div_assign(cg, 4096))?;
        self.unary_op(&mut group, cg, &ops, "asl12", |cg, a| a.mul_assign(cg, 4096))?;
        Self::reserved(&mut group, cg)?;

        // complex unary, z = 23 + bits 5..3
        group.new_chain(cg, "cmp0", |cg| {
            self.get_gpr(cg, &ops.src, &ops.a)?;
            compare(cg, &regs.flags, &ops.a, 0)
        })?;
        group.new_chain(cg, "push", |cg| {
            self.get_gpr(cg, &ops.src, &ops.a)?;
            self.push(cg, &ops.a)
        })?;
        group.new_chain(cg, "pop", |cg| {
            self.pop(cg, &ops.a)?;
            self.set_gpr(cg, &ops.src, &ops.a)
        })?;
        for _ in 0..3 {
            Self::reserved(&mut group, cg)?;
        }
        group.new_chain(cg, "ret", |cg| {
            cg.run_if(ops.src.equals(0), |cg| {
                self.pop(cg, &regs.ip)?;
                regs.jumped.set(cg, 1)
            })?;
            Ok(())
        })?;
        Self::reserved(&mut group, cg)?;

        let window = RelocationWindow::covering(group.label(), group.chains())?;
        group.check_window(window)?;

        let dispatch = cg.chain("arithmetic/dispatch", true, |cg| {
            let opcode = &regs.opcode;
            let z = ops.target.z();
            ops.src.set(cg, opcode)?;
            ops.src.bitslice(cg, 0, 3, false)?;
            ops.dst.set(cg, opcode)?;
            ops.dst.bitslice(cg, 3, 3, false)?;
            cg.run_if(opcode.lt(UNARY_BASE), |cg| {
                z.set(cg, opcode)?;
                z.bitslice(cg, 6, 4, false)?;
                z.add_assign(cg, BINARY_OP_Z)
            })?
            .or_else(cg, |cg| {
                z.set(cg, opcode)?;
                z.sub_assign(cg, UNARY_BASE)?;
                z.div_assign(cg, 8)?;
                z.add_assign(cg, UNARY_OP_Z)
            })?;
            self.splicer.execute_arbitrary_code(cg, &ops.target, window)
        })?;
        group.insert(0, dispatch);
        debug!("arithmetic group: {} chains", group.len());
        Ok(group)
    }
}
