use crate::error::Result;

pub type Address = u16;

/// Machine cycles consumed by one step.
pub type ElapsedTime = u32;

pub const T_CYCLES_PER_M_CYCLE: u32 = 4;

/// Byte-addressable storage the CPU fetches from and writes to.
///
/// Reads must not have side effects beyond what address decoding requires. Writes may trigger
/// side effects (bank switching, serial transfer) that the CPU never observes directly.
pub trait Addressable {
    fn read_u8(&mut self, address: Address) -> Result<u8>;

    fn write_u8(&mut self, address: Address, data: u8) -> Result<()>;
}

pub trait Steppable<C: ?Sized> {
    /// Runs one indivisible unit of work against `context`, returning elapsed machine cycles.
    fn step(&mut self, context: &mut C) -> Result<ElapsedTime>;
}
