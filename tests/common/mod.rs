use gameboy_cpu::{Cpu, MemoryBus, Steppable};

pub const PROGRAM_START: u16 = 0x100;

/// A cleared CPU with `program` loaded at 0x100 and the stack at the top of memory.
pub fn cpu_with_program(program: &[u8]) -> (Cpu, MemoryBus) {
    let mut memory_bus = MemoryBus::new();
    memory_bus.load(PROGRAM_START, program);
    let mut cpu = Cpu::new();
    cpu.set_pc(PROGRAM_START);
    cpu.set_sp(0xfffe);
    (cpu, memory_bus)
}

/// Steps until `pc` reaches `stop_at`, returning the machine cycles spent.
pub fn run_until(cpu: &mut Cpu, memory_bus: &mut MemoryBus, stop_at: u16, max_steps: usize) -> u32 {
    let mut cycles = 0;
    for _ in 0..max_steps {
        if cpu.pc() == stop_at {
            return cycles;
        }
        cycles += cpu.step(memory_bus).unwrap();
    }
    panic!("pc never reached {:#06x}, stuck at {:#06x}", stop_at, cpu.pc());
}
