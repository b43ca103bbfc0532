// Three variables holding a position computed at runtime

use crate::codegen::coordinates::Coordinates;
use crate::codegen::error::CompilerError;
use crate::codegen::session::CodeGen;
use crate::codegen::variable::Variable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorVariable {
    name: String,
    x: Variable,
    y: Variable,
    z: Variable,
}

impl VectorVariable {
    /// Creates `name_x`, `name_y` and `name_z` initialized from `initial`
    pub fn new(cg: &mut CodeGen, name: &str, initial: Coordinates) -> Result<Self, CompilerError> {
        Ok(VectorVariable {
            name: name.to_string(),
            x: Variable::new(cg, &format!("{}_x", name), initial.x.value)?,
            y: Variable::new(cg, &format!("{}_y", name), initial.y.value)?,
            z: Variable::new(cg, &format!("{}_z", name), initial.z.value)?,
        })
    }

    /// Groups three existing variables
    pub fn from_variables(name: &str, x: Variable, y: Variable, z: Variable) -> Self {
        VectorVariable {
            name: name.to_string(),
            x,
            y,
            z,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> &Variable {
        &self.x
    }

    pub fn y(&self) -> &Variable {
        &self.y
    }

    pub fn z(&self) -> &Variable {
        &self.z
    }

    pub fn axes(&self) -> [&Variable; 3] {
        [&self.x, &self.y, &self.z]
    }

    pub fn release(self, cg: &mut CodeGen) -> Result<(), CompilerError> {
        self.x.release(cg)?;
        self.y.release(cg)?;
        self.z.release(cg)
    }

    pub fn set(&self, cg: &mut CodeGen, other: &VectorVariable) -> Result<(), CompilerError> {
        self.x.set(cg, &other.x)?;
        self.y.set(cg, &other.y)?;
        self.z.set(cg, &other.z)
    }

    pub fn set_coordinates(&self, cg: &mut CodeGen, position: Coordinates) -> Result<(), CompilerError> {
        self.x.set(cg, position.x.value)?;
        self.y.set(cg, position.y.value)?;
        self.z.set(cg, position.z.value)
    }

    pub fn add_assign(&self, cg: &mut CodeGen, other: &VectorVariable) -> Result<(), CompilerError> {
        self.x.add_assign(cg, &other.x)?;
        self.y.add_assign(cg, &other.y)?;
        self.z.add_assign(cg, &other.z)
    }

    pub fn sub_assign(&self, cg: &mut CodeGen, other: &VectorVariable) -> Result<(), CompilerError> {
        self.x.sub_assign(cg, &other.x)?;
        self.y.sub_assign(cg, &other.y)?;
        self.z.sub_assign(cg, &other.z)
    }

    /// Adds an offset known at generation time
    pub fn offset(&self, cg: &mut CodeGen, by: Coordinates) -> Result<(), CompilerError> {
        for (axis, amount) in [(&self.x, by.x.value), (&self.y, by.y.value), (&self.z, by.z.value)] {
            if amount != 0 {
                axis.add_assign(cg, amount)?;
            }
        }
        Ok(())
    }
}
