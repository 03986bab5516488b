use crate::component::{Address, Addressable};
use crate::cpu::alu;
use crate::cpu::instruction::*;
use crate::cpu::Cpu;
use crate::error::{Error, Result};
use log::{info, warn};

/// Resolved location of an 8-bit operand.
enum Location {
    Immediate(u8),
    Register(Reg),
    Memory(Address),
}

impl InstrArgByte {
    fn locate(&self, cpu: &Cpu, arg: OpArg) -> Location {
        match self {
            Self::ImmediateByte => Location::Immediate(arg.u8),
            Self::Register(reg) => Location::Register(*reg),
            Self::AddressDirect => Location::Memory(arg.u16),
            Self::AddressRegister(wreg) => Location::Memory(cpu.get_word_register(*wreg)),
            Self::Offset(reg) => Location::Memory(0xff00 | Address::from(cpu.get_register(*reg))),
            Self::OffsetImmediate => Location::Memory(0xff00 | Address::from(arg.u8)),
        }
    }

    fn get_u8<B: Addressable + ?Sized>(&self, cpu: &Cpu, memory_bus: &mut B, arg: OpArg) -> Result<u8> {
        match self.locate(cpu, arg) {
            Location::Immediate(byte) => Ok(byte),
            Location::Register(reg) => Ok(cpu.get_register(reg)),
            Location::Memory(address) => memory_bus.read_u8(address),
        }
    }

    fn set_u8<B: Addressable + ?Sized>(
        &self,
        cpu: &mut Cpu,
        memory_bus: &mut B,
        arg: OpArg,
        value: u8,
    ) -> Result<()> {
        match self.locate(cpu, arg) {
            Location::Immediate(_) => panic!("immediate operand used as a destination"),
            Location::Register(reg) => {
                cpu.set_register(reg, value);
                Ok(())
            }
            Location::Memory(address) => memory_bus.write_u8(address, value),
        }
    }
}

impl Cpu {
    fn test_condition(&self, condition: Condition) -> bool {
        let flags = self.registers.f;
        match condition {
            Condition::Always => true,
            Condition::Z => flags.zero,
            Condition::NZ => !flags.zero,
            Condition::C => flags.carry,
            Condition::NC => !flags.carry,
        }
    }

    /// Read-modify-write on an 8-bit operand.
    fn modify_u8<B, F>(&mut self, memory_bus: &mut B, target: InstrArgByte, arg: OpArg, op: F) -> Result<()>
    where
        B: Addressable + ?Sized,
        F: FnOnce(&mut Cpu, u8) -> u8,
    {
        let value = target.get_u8(self, memory_bus, arg)?;
        let result = op(self, value);
        target.set_u8(self, memory_bus, arg, result)
    }

    /// Runs a decoded instruction. `pc` must already point past it.
    pub fn execute_instruction<B: Addressable + ?Sized>(
        &mut self,
        memory_bus: &mut B,
        instruction: Instruction,
        arg: OpArg,
    ) -> Result<BranchStatus> {
        let mut branch_status = BranchStatus::NoBranch;
        match instruction {
            Instruction::LD(target, source) => {
                let value = source.get_u8(self, memory_bus, arg)?;
                target.set_u8(self, memory_bus, arg, value)?;
            }
            Instruction::LD_16(target, source) => match (target, source) {
                (InstrArgWord::WordRegister(wreg), InstrArgWord::ImmediateWord) => {
                    self.set_word_register(wreg, arg.u16)
                }
                (InstrArgWord::WordRegister(wreg), InstrArgWord::WordRegister(source)) => {
                    let value = self.get_word_register(source);
                    self.set_word_register(wreg, value)
                }
                (InstrArgWord::AddressDirect, InstrArgWord::WordRegister(source)) => {
                    let [low, high] = self.get_word_register(source).to_le_bytes();
                    memory_bus.write_u8(arg.u16, low)?;
                    memory_bus.write_u8(arg.u16.wrapping_add(1), high)?;
                }
                _ => panic!("unsupported 16-bit load"),
            },
            Instruction::LDHL_SP => {
                let sum = self.registers.add_sp(arg.i8);
                self.registers.set_hl(sum);
            }
            Instruction::LDD_A_FROM_HL | Instruction::LDI_A_FROM_HL => {
                let hl = self.registers.get_hl();
                self.registers.a = memory_bus.read_u8(hl)?;
                self.step_hl(instruction, hl);
            }
            Instruction::LDD_A_INTO_HL | Instruction::LDI_A_INTO_HL => {
                let hl = self.registers.get_hl();
                memory_bus.write_u8(hl, self.registers.a)?;
                self.step_hl(instruction, hl);
            }
            Instruction::PUSH(wreg) => {
                let value = self.get_word_register(wreg);
                self.push(memory_bus, value)?;
            }
            Instruction::POP(wreg) => {
                let value = self.pop(memory_bus)?;
                self.set_word_register(wreg, value);
            }

            /* Arithmetic */
            Instruction::ADD(source) => {
                let value = source.get_u8(self, memory_bus, arg)?;
                self.registers.a = self.registers.add(value);
            }
            Instruction::ADD_HL(wreg) => {
                let value = self.get_word_register(wreg);
                let sum = self.registers.add_pair(value);
                self.registers.set_hl(sum);
            }
            Instruction::ADD_SP => {
                self.registers.sp = self.registers.add_sp(arg.i8);
            }
            Instruction::ADC(source) => {
                let value = source.get_u8(self, memory_bus, arg)?;
                self.registers.a = self.registers.adc(value);
            }
            Instruction::SUB(source) => {
                let value = source.get_u8(self, memory_bus, arg)?;
                self.registers.a = self.registers.sub(value);
            }
            Instruction::SBC(source) => {
                let value = source.get_u8(self, memory_bus, arg)?;
                self.registers.a = self.registers.sbc(value);
            }
            Instruction::AND(source) => {
                let value = source.get_u8(self, memory_bus, arg)?;
                self.registers.a = self.registers.and(value);
            }
            Instruction::OR(source) => {
                let value = source.get_u8(self, memory_bus, arg)?;
                self.registers.a = self.registers.or(value);
            }
            Instruction::XOR(source) => {
                let value = source.get_u8(self, memory_bus, arg)?;
                self.registers.a = self.registers.xor(value);
            }
            Instruction::CP(source) => {
                let value = source.get_u8(self, memory_bus, arg)?;
                self.registers.cp(value);
            }
            Instruction::INC(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.inc8(value))?;
            }
            Instruction::DEC(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.dec8(value))?;
            }
            Instruction::INC_WORD(wreg) => {
                let value = self.get_word_register(wreg).wrapping_add(1);
                self.set_word_register(wreg, value);
            }
            Instruction::DEC_WORD(wreg) => {
                let value = self.get_word_register(wreg).wrapping_sub(1);
                self.set_word_register(wreg, value);
            }

            /* Miscellaneous */
            Instruction::DAA => self.registers.a = self.registers.daa(),
            Instruction::CPL => self.registers.a = self.registers.cpl(),
            Instruction::CCF => self.registers.ccf(),
            Instruction::SCF => self.registers.scf(),
            Instruction::NOP => {}
            Instruction::HALT => {
                info!("Halting");
                self.halted = true;
            }
            Instruction::STOP => {
                info!("Stopping");
                self.halted = true;
            }
            Instruction::DI => {
                self.interrupt_enabled = false;
                self.enable_interrupts_after_next = false;
            }
            Instruction::EI => self.enable_interrupts_after_next = true,

            /* Rotates & shifts */
            Instruction::RLCA => self.registers.a = self.registers.rlca(),
            Instruction::RLA => self.registers.a = self.registers.rla(),
            Instruction::RRCA => self.registers.a = self.registers.rrca(),
            Instruction::RRA => self.registers.a = self.registers.rra(),
            Instruction::RLC(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.rlc(value))?
            }
            Instruction::RRC(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.rrc(value))?
            }
            Instruction::RL(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.rl(value))?
            }
            Instruction::RR(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.rr(value))?
            }
            Instruction::SLA(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.sla(value))?
            }
            Instruction::SRA(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.sra(value))?
            }
            Instruction::SWAP(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.swap(value))?
            }
            Instruction::SRL(target) => {
                self.modify_u8(memory_bus, target, arg, |cpu, value| cpu.registers.srl(value))?
            }

            /* Bit opcodes */
            Instruction::BIT(bit, target) => {
                let value = target.get_u8(self, memory_bus, arg)?;
                self.registers.bit(value, bit);
            }
            Instruction::SET(bit, target) => {
                self.modify_u8(memory_bus, target, arg, |_, value| alu::set(value, bit))?
            }
            Instruction::RES(bit, target) => {
                self.modify_u8(memory_bus, target, arg, |_, value| alu::reset(value, bit))?
            }

            /* Jumps */
            Instruction::JP(condition) => {
                if self.test_condition(condition) {
                    self.registers.pc = arg.u16;
                    branch_status = BranchStatus::Branch;
                }
            }
            Instruction::JP_HL => {
                self.registers.pc = self.registers.get_hl();
            }
            Instruction::JR(condition) => {
                if self.test_condition(condition) {
                    self.registers.pc = self.registers.pc.wrapping_add_signed(arg.i8.into());
                    branch_status = BranchStatus::Branch;
                }
            }

            /* Calls */
            Instruction::CALL(condition) => {
                if self.test_condition(condition) {
                    // pc already holds the address of the next instruction
                    self.push(memory_bus, self.registers.pc)?;
                    self.registers.pc = arg.u16;
                    branch_status = BranchStatus::Branch;
                }
            }
            Instruction::RST(vector) => {
                self.push(memory_bus, self.registers.pc)?;
                self.registers.pc = vector;
            }

            /* Returns */
            Instruction::RET(condition) => {
                if self.test_condition(condition) {
                    self.registers.pc = self.pop(memory_bus)?;
                    branch_status = BranchStatus::Branch;
                }
            }
            Instruction::RETI => {
                self.registers.pc = self.pop(memory_bus)?;
                self.interrupt_enabled = true;
            }

            Instruction::ILLEGAL(opcode) => {
                let address = self.registers.pc.wrapping_sub(1);
                warn!("Illegal opcode {:#04x} at {:#06x}", opcode, address);
                return Err(Error::decode(opcode, address));
            }
        }

        Ok(branch_status)
    }

    /// Post-increment or post-decrement of HL for the LDI/LDD family.
    fn step_hl(&mut self, instruction: Instruction, hl: u16) {
        let hl = match instruction {
            Instruction::LDI_A_FROM_HL | Instruction::LDI_A_INTO_HL => hl.wrapping_add(1),
            _ => hl.wrapping_sub(1),
        };
        self.registers.set_hl(hl);
    }
}
