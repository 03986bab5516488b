use crate::component::{Address, Addressable, ElapsedTime, Steppable};
use crate::cpu::decode::{decode, decode_prefixed, CB_PREFIX};
use crate::cpu::instruction::{Instruction, OpArg, Reg, WReg};
use crate::cpu::register::Registers;
use crate::error::{Error, Result};
use log::{debug, info, trace};

const INTERRUPT_ENABLE_ADDRESS: Address = 0xffff;
const INTERRUPT_FLAG_ADDRESS: Address = 0xff0f;

/// Machine cycles spent jumping to an interrupt vector.
const INTERRUPT_DISPATCH_CYCLES: ElapsedTime = 5;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cpu {
    pub registers: Registers,
    pub(crate) interrupt_enabled: bool,
    /// Set by EI, IME turns on after the next instruction.
    pub(crate) enable_interrupts_after_next: bool,
    pub(crate) halted: bool,
}

impl Cpu {
    /// A CPU with every register cleared.
    pub fn new() -> Cpu {
        Cpu::default()
    }

    /// A CPU in the state the DMG boot ROM leaves it in.
    pub fn post_boot() -> Cpu {
        let mut cpu = Cpu::new();
        cpu.emulate_bootrom();
        cpu
    }

    /// Initialize the CPU's flags to post-bootrom values
    fn emulate_bootrom(&mut self) {
        self.registers.pc = 0x100;
        self.registers.set_af(0x01B0);
        self.registers.set_bc(0x0013);
        self.registers.set_de(0x00D8);
        self.registers.set_hl(0x014D);
        self.registers.sp = 0xFFFE;
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn set_pc(&mut self, value: u16) {
        self.registers.pc = value;
    }

    pub fn sp(&self) -> u16 {
        self.registers.sp
    }

    pub fn set_sp(&mut self, value: u16) {
        self.registers.sp = value;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.interrupt_enabled
    }

    pub fn set_register(&mut self, reg: Reg, value: u8) {
        match reg {
            Reg::A => self.registers.a = value,
            Reg::B => self.registers.b = value,
            Reg::C => self.registers.c = value,
            Reg::D => self.registers.d = value,
            Reg::E => self.registers.e = value,
            Reg::H => self.registers.h = value,
            Reg::L => self.registers.l = value,
        }
    }

    pub fn get_register(&self, reg: Reg) -> u8 {
        match reg {
            Reg::A => self.registers.a,
            Reg::B => self.registers.b,
            Reg::C => self.registers.c,
            Reg::D => self.registers.d,
            Reg::E => self.registers.e,
            Reg::H => self.registers.h,
            Reg::L => self.registers.l,
        }
    }

    pub fn set_word_register(&mut self, word_reg: WReg, value: u16) {
        match word_reg {
            WReg::AF => self.registers.set_af(value),
            WReg::BC => self.registers.set_bc(value),
            WReg::DE => self.registers.set_de(value),
            WReg::HL => self.registers.set_hl(value),
            WReg::SP => self.registers.sp = value,
        }
    }

    pub fn get_word_register(&self, word_reg: WReg) -> u16 {
        match word_reg {
            WReg::AF => self.registers.get_af(),
            WReg::BC => self.registers.get_bc(),
            WReg::DE => self.registers.get_de(),
            WReg::HL => self.registers.get_hl(),
            WReg::SP => self.registers.sp,
        }
    }

    pub(crate) fn push<B: Addressable + ?Sized>(&mut self, memory_bus: &mut B, value: u16) -> Result<()> {
        let [low, high] = value.to_le_bytes();
        // High byte goes in first so the low byte ends up on top of the stack.
        self.registers.sp = self.registers.sp.wrapping_sub(1);
        memory_bus.write_u8(self.registers.sp, high)?;
        self.registers.sp = self.registers.sp.wrapping_sub(1);
        memory_bus.write_u8(self.registers.sp, low)
    }

    pub(crate) fn pop<B: Addressable + ?Sized>(&mut self, memory_bus: &mut B) -> Result<u16> {
        let low = memory_bus.read_u8(self.registers.sp)?;
        self.registers.sp = self.registers.sp.wrapping_add(1);
        let high = memory_bus.read_u8(self.registers.sp)?;
        self.registers.sp = self.registers.sp.wrapping_add(1);
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Reads the instruction at `pc` without executing it. Returns the decoded instruction and its
    /// operand bytes.
    pub fn fetch<B: Addressable + ?Sized>(&self, memory_bus: &mut B) -> Result<(Instruction, OpArg)> {
        let pc = self.registers.pc;
        let opcode = memory_bus.read_u8(pc)?;

        if opcode == CB_PREFIX {
            let opcode = memory_bus.read_u8(pc.wrapping_add(1))?;
            return Ok((decode_prefixed(opcode), OpArg::default()));
        }

        let instruction = decode(opcode).ok_or_else(|| Error::decode(opcode, pc))?;
        let arg = match instruction.length() {
            2 => OpArg::from_byte(memory_bus.read_u8(pc.wrapping_add(1))?),
            3 => {
                let bytes = [
                    memory_bus.read_u8(pc.wrapping_add(1))?,
                    memory_bus.read_u8(pc.wrapping_add(2))?,
                ];
                OpArg::from_word(u16::from_le_bytes(bytes))
            }
            _ => OpArg::default(),
        };

        Ok((instruction, arg))
    }

    fn pending_interrupts<B: Addressable + ?Sized>(&self, memory_bus: &mut B) -> Result<u8> {
        let ie_flag = memory_bus.read_u8(INTERRUPT_ENABLE_ADDRESS)?;
        let if_flag = memory_bus.read_u8(INTERRUPT_FLAG_ADDRESS)?;
        Ok(ie_flag & if_flag & 0x1f)
    }

    /// Wakes a halted CPU and jumps to the highest priority pending interrupt if IME is set.
    fn check_interrupts<B: Addressable + ?Sized>(&mut self, memory_bus: &mut B) -> Result<ElapsedTime> {
        if !self.interrupt_enabled && !self.halted {
            return Ok(0);
        }

        let pending = self.pending_interrupts(memory_bus)?;
        if pending == 0 {
            return Ok(0);
        }

        if self.halted {
            info!("Unhalting");
            self.halted = false;
        }

        if !self.interrupt_enabled {
            return Ok(0);
        }

        // Bit 0 (V-Blank) has the highest priority
        let bit = pending.trailing_zeros() as u8;
        let vector = 0x40 + u16::from(bit) * 0x8;
        debug!(
            "Handling interrupt: {}",
            match bit {
                0 => "vblank",
                1 => "lcdc",
                2 => "timer",
                3 => "serial",
                _ => "joypad",
            }
        );

        // The request stays pending if the return address cannot be pushed.
        self.push(memory_bus, self.registers.pc)?;
        let if_flag = memory_bus.read_u8(INTERRUPT_FLAG_ADDRESS)?;
        memory_bus.write_u8(INTERRUPT_FLAG_ADDRESS, if_flag & !(1 << bit))?;

        self.interrupt_enabled = false;
        self.registers.pc = vector;

        Ok(INTERRUPT_DISPATCH_CYCLES)
    }

    fn run_step<B: Addressable + ?Sized>(&mut self, memory_bus: &mut B) -> Result<ElapsedTime> {
        let mut elapsed_cycles = if !self.halted {
            let enable_interrupts = self.enable_interrupts_after_next;
            self.enable_interrupts_after_next = false;

            let pc = self.registers.pc;
            let (instruction, arg) = self.fetch(memory_bus)?;
            trace!("{:#06x}: {} {:?}", pc, instruction.as_ref(), arg);

            // Control flow overwrites pc after this.
            self.registers.pc = pc.wrapping_add(instruction.length().into());
            let branch_status = self.execute_instruction(memory_bus, instruction, arg)?;

            // A DI right after EI cancels the pending enable.
            if enable_interrupts && instruction != Instruction::DI {
                self.interrupt_enabled = true;
            }

            ElapsedTime::from(instruction.elapsed_cycles(branch_status))
        } else {
            1
        };

        elapsed_cycles += self.check_interrupts(memory_bus)?;

        Ok(elapsed_cycles)
    }
}

impl<B: Addressable + ?Sized> Steppable<B> for Cpu {
    /// Fetches, decodes and executes one instruction, then services interrupts.
    ///
    /// On error the CPU state is rolled back to what it was before the call, so `pc` still points
    /// at the faulting instruction. Bus writes that already succeeded are not undone.
    fn step(&mut self, memory_bus: &mut B) -> Result<ElapsedTime> {
        let snapshot = self.clone();
        let result = self.run_step(memory_bus);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}
