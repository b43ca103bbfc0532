// Scoreboard-backed integer variables
//
// A Variable is a score holder in the `vars` objective. Arithmetic lowers to
// `scoreboard players operation`, comparisons produce Conditions.

use crate::codegen::command::Command;
use crate::codegen::error::CompilerError;
use crate::codegen::execute::{CompareOp, Condition, StoreTarget};
use crate::codegen::session::CodeGen;
use std::fmt;

/// The scoreboard objective every variable lives in
pub const OBJECTIVE: &str = "vars";

/// Operators accepted by `scoreboard players operation`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOp {
    Assign,
    Add,
    Sub,
    Mul,
    /// Floor division
    Div,
    /// Floor modulo
    Mod,
    Min,
    Max,
    Swap,
}

impl ScoreOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ScoreOp::Assign => "=",
            ScoreOp::Add => "+=",
            ScoreOp::Sub => "-=",
            ScoreOp::Mul => "*=",
            ScoreOp::Div => "/=",
            ScoreOp::Mod => "%=",
            ScoreOp::Min => "<",
            ScoreOp::Max => ">",
            ScoreOp::Swap => "><",
        }
    }
}

/// Right-hand side of a variable operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Variable(Variable),
    Literal(i32),
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Literal(value)
    }
}

impl From<&Variable> for Operand {
    fn from(variable: &Variable) -> Self {
        Operand::Variable(variable.clone())
    }
}

impl From<Variable> for Operand {
    fn from(variable: Variable) -> Self {
        Operand::Variable(variable)
    }
}

/// An inclusive integer range as accepted by `matches`. At least one bound is
/// always present. Bounds are i64 so that `k - 1` and `k + 1` never overflow
/// for any i32 `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    min: Option<i64>,
    max: Option<i64>,
}

impl IntRange {
    pub fn exactly(value: i64) -> Self {
        IntRange {
            min: Some(value),
            max: Some(value),
        }
    }

    pub fn at_most(max: i64) -> Self {
        IntRange {
            min: None,
            max: Some(max),
        }
    }

    pub fn at_least(min: i64) -> Self {
        IntRange {
            min: Some(min),
            max: None,
        }
    }

    pub fn between(min: i64, max: i64) -> Self {
        IntRange {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn min(&self) -> Option<i64> {
        self.min
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => write!(f, "{}", min),
            (Some(min), Some(max)) => write!(f, "{}..{}", min, max),
            (Some(min), None) => write!(f, "{}..", min),
            (None, Some(max)) => write!(f, "..{}", max),
            (None, None) => write!(f, ".."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: String,
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Variable {
    /// Registers `name` and emits its initialization
    pub fn new(cg: &mut CodeGen, name: &str, value: i32) -> Result<Variable, CompilerError> {
        cg.register_name(name)?;
        let variable = Variable {
            name: name.to_string(),
        };
        variable.initialize(cg, value)?;
        Ok(variable)
    }

    /// A fresh, uniquely-named variable initialized to zero
    pub fn temporary(cg: &mut CodeGen) -> Result<Variable, CompilerError> {
        let name = cg.find_name("var_");
        Variable::new(cg, &name, 0)
    }

    pub(crate) fn constant_handle(value: i32) -> Variable {
        Variable {
            name: value.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resets the score and frees the name
    pub fn release(self, cg: &mut CodeGen) -> Result<(), CompilerError> {
        cg.free_name(&self.name)?;
        cg.emit(format!("scoreboard players reset {} {}", self.name, OBJECTIVE))
    }

    pub fn initialize(&self, cg: &mut CodeGen, value: i32) -> Result<(), CompilerError> {
        cg.emit(format!(
            "scoreboard players set {} {} {}",
            self.name, OBJECTIVE, value
        ))
    }

    /// Applies `op` in place. Literal additions use `add`/`remove`, other
    /// literal operands go through a memoized constant.
    pub fn operation(
        &self,
        cg: &mut CodeGen,
        op: ScoreOp,
        src: impl Into<Operand>,
    ) -> Result<(), CompilerError> {
        let src = match (op, src.into()) {
            (ScoreOp::Assign, Operand::Literal(value)) => return self.initialize(cg, value),
            (ScoreOp::Add, Operand::Literal(value)) => return self.add_literal(cg, value as i64),
            (ScoreOp::Sub, Operand::Literal(value)) => return self.add_literal(cg, -(value as i64)),
            (ScoreOp::Swap, Operand::Literal(value)) => {
                return Err(CompilerError::InvalidOperand(format!(
                    "cannot swap {} with literal {}",
                    self.name, value
                )))
            }
            (_, Operand::Literal(value)) => cg.constant(value),
            (_, Operand::Variable(variable)) => variable,
        };
        cg.emit(format!(
            "scoreboard players operation {} {} {} {} {}",
            self.name,
            OBJECTIVE,
            op.symbol(),
            src.name,
            OBJECTIVE
        ))
    }

    fn add_literal(&self, cg: &mut CodeGen, amount: i64) -> Result<(), CompilerError> {
        let (verb, magnitude) = if amount >= 0 {
            ("add", amount)
        } else {
            ("remove", -amount)
        };
        if magnitude > i32::MAX as i64 {
            // add/remove only accept non-negative ints
            let constant = cg.constant(amount as i32);
            return self.operation(cg, ScoreOp::Add, &constant);
        }
        cg.emit(format!(
            "scoreboard players {} {} {} {}",
            verb, self.name, OBJECTIVE, magnitude
        ))
    }

    pub fn set(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<(), CompilerError> {
        self.operation(cg, ScoreOp::Assign, src)
    }

    pub fn add_assign(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<(), CompilerError> {
        self.operation(cg, ScoreOp::Add, src)
    }

    pub fn sub_assign(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<(), CompilerError> {
        self.operation(cg, ScoreOp::Sub, src)
    }

    pub fn mul_assign(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<(), CompilerError> {
        self.operation(cg, ScoreOp::Mul, src)
    }

    pub fn div_assign(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<(), CompilerError> {
        self.operation(cg, ScoreOp::Div, src)
    }

    pub fn rem_assign(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<(), CompilerError> {
        self.operation(cg, ScoreOp::Mod, src)
    }

    pub fn min_assign(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<(), CompilerError> {
        self.operation(cg, ScoreOp::Min, src)
    }

    pub fn max_assign(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<(), CompilerError> {
        self.operation(cg, ScoreOp::Max, src)
    }

    pub fn swap(&self, cg: &mut CodeGen, other: &Variable) -> Result<(), CompilerError> {
        self.operation(cg, ScoreOp::Swap, other)
    }

    /// Copies this variable into a fresh temporary
    pub fn cloned(&self, cg: &mut CodeGen) -> Result<Variable, CompilerError> {
        let variable = Variable::temporary(cg)?;
        variable.set(cg, self)?;
        Ok(variable)
    }

    /// Non-mutating form of `operation`: the result lands in a new temporary
    pub fn binary(
        &self,
        cg: &mut CodeGen,
        op: ScoreOp,
        src: impl Into<Operand>,
    ) -> Result<Variable, CompilerError> {
        let variable = self.cloned(cg)?;
        variable.operation(cg, op, src)?;
        Ok(variable)
    }

    pub fn add(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<Variable, CompilerError> {
        self.binary(cg, ScoreOp::Add, src)
    }

    pub fn sub(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<Variable, CompilerError> {
        self.binary(cg, ScoreOp::Sub, src)
    }

    pub fn mul(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<Variable, CompilerError> {
        self.binary(cg, ScoreOp::Mul, src)
    }

    pub fn div(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<Variable, CompilerError> {
        self.binary(cg, ScoreOp::Div, src)
    }

    pub fn rem(&self, cg: &mut CodeGen, src: impl Into<Operand>) -> Result<Variable, CompilerError> {
        self.binary(cg, ScoreOp::Mod, src)
    }

    fn compare(&self, op: CompareOp, rhs: Operand) -> Condition {
        match rhs {
            Operand::Variable(right) => Condition::Compare {
                left: self.clone(),
                op,
                right,
            },
            Operand::Literal(k) => {
                let k = k as i64;
                let range = match op {
                    CompareOp::Less => IntRange::at_most(k - 1),
                    CompareOp::LessEqual => IntRange::at_most(k),
                    CompareOp::Equal => IntRange::exactly(k),
                    CompareOp::GreaterEqual => IntRange::at_least(k),
                    CompareOp::Greater => IntRange::at_least(k + 1),
                };
                Condition::Matches {
                    variable: self.clone(),
                    range,
                }
            }
        }
    }

    pub fn lt(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::Less, rhs.into())
    }

    pub fn le(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::LessEqual, rhs.into())
    }

    pub fn equals(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::Equal, rhs.into())
    }

    pub fn ge(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::GreaterEqual, rhs.into())
    }

    pub fn gt(&self, rhs: impl Into<Operand>) -> Condition {
        self.compare(CompareOp::Greater, rhs.into())
    }

    pub fn in_range(&self, range: IntRange) -> Condition {
        Condition::Matches {
            variable: self.clone(),
            range,
        }
    }

    /// Keeps `length` bits starting at bit `skip`, in place.
    ///
    /// `last` promises that no bits above the field can be set, which makes
    /// the modulo unnecessary.
    pub fn bitslice(
        &self,
        cg: &mut CodeGen,
        skip: u32,
        length: u32,
        last: bool,
    ) -> Result<(), CompilerError> {
        if length == 0 || skip + length > 31 {
            return Err(CompilerError::InvalidWidth(skip + length));
        }
        if skip > 0 {
            self.div_assign(cg, 1 << skip)?;
        }
        if !last {
            self.rem_assign(cg, 1 << length)?;
        }
        Ok(())
    }

    pub fn sliced(
        &self,
        cg: &mut CodeGen,
        skip: u32,
        length: u32,
        last: bool,
    ) -> Result<Variable, CompilerError> {
        let variable = self.cloned(cg)?;
        variable.bitslice(cg, skip, length, last)?;
        Ok(variable)
    }

    /// Interprets the low `width` bits as two's complement, in place.
    /// The value must already be within `0..2^width`.
    pub fn sign_extend(&self, cg: &mut CodeGen, width: u32) -> Result<(), CompilerError> {
        if width == 0 || width > 30 {
            return Err(CompilerError::InvalidWidth(width));
        }
        let half = 1i32 << (width - 1);
        cg.run_if(self.ge(half), |cg| self.sub_assign(cg, half * 2))?;
        Ok(())
    }

    pub fn sign_extended(&self, cg: &mut CodeGen, width: u32) -> Result<Variable, CompilerError> {
        let variable = self.cloned(cg)?;
        variable.sign_extend(cg, width)?;
        Ok(variable)
    }

    /// A command whose result is this variable's value
    pub fn get(&self) -> Command {
        Command::new(format!("scoreboard players get {} {}", self.name, OBJECTIVE))
    }

    pub fn store_target(&self) -> StoreTarget {
        StoreTarget::Score(self.clone())
    }
}
