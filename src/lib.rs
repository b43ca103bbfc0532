#![crate_name = "chainforge"]

#[macro_use]
extern crate lazy_static;

pub mod assembler;
pub mod codegen;
pub mod computer;
pub mod config;

pub use codegen::error::CompilerError;

/*
Layout of a generated computer (block coordinates)
    0   0  0    init chain (impulse), z=1 primary chain (impulse)
    0   1  0    arithmetic group: dispatch, 14 binary, 16 unary
    0   2  0    jump group: dispatch, 6 conditions, jmp, call
    0   3  0    constant group: dispatch, const, sconst, econst, reserved
    0   4  0    card group: dispatch, one chain per card
    0   6  0    register bank: 4 rows of 8 units
    0 -32  0    relocation buffer
    0 128  0    memory cube, 16x16x16 barrels
*/
