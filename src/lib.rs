mod component;
mod error;

pub mod cartridge;
pub mod cpu;
mod memory;

pub use cartridge::CartridgeDescriptor;
pub use component::{Address, Addressable, ElapsedTime, Steppable, T_CYCLES_PER_M_CYCLE};
pub use cpu::{Cpu, FlagRegister, Registers};
pub use error::{Error, Result};
pub use memory::MemoryBus;
