// Code generation layer
// Structured control, variables and entities lowered to command-block chains

pub mod block;
pub mod chain_context;
pub mod command;
pub mod coordinates;
pub mod entity;
pub mod error;
pub mod execute;
pub mod output;
pub mod session;
pub mod variable;
pub mod vector_variable;


pub use chain_context::{ChainContext, ChainGroup};
pub use command::Command;
pub use coordinates::Coordinates;
pub use entity::Entity;
pub use error::CompilerError;
pub use execute::{Condition, Execute, IfChain, StoreTarget};
pub use output::Listing;
pub use session::CodeGen;
pub use variable::{IntRange, Operand, Variable};
pub use vector_variable::VectorVariable;
