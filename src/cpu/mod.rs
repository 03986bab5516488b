mod alu;
mod cpu;
mod decode;
mod execute;
mod instruction;
mod register;

pub use alu::{reset, set};
pub use cpu::Cpu;
pub use decode::{decode, decode_prefixed, CB_PREFIX};
pub use instruction::{
    Bit, BranchStatus, Condition, InstrArgByte, InstrArgWord, Instruction, OpArg, Reg, WReg,
};
pub use register::{FlagRegister, Registers};
