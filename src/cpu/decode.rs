/*!
 * Opcode tables. `decode` covers the base opcode space, `decode_prefixed` covers the byte that
 * follows the 0xcb prefix. Both resolve every operand location at decode time.
 */

use crate::cpu::instruction::{
    Condition, InstrArgByte, InstrArgWord, Instruction, Reg, WReg,
};

pub const CB_PREFIX: u8 = 0xcb;

/// Operand encoded in the low three bits of an opcode: B, C, D, E, H, L, (HL), A.
fn byte_arg(index: u8) -> InstrArgByte {
    match index & 0b111 {
        0 => InstrArgByte::Register(Reg::B),
        1 => InstrArgByte::Register(Reg::C),
        2 => InstrArgByte::Register(Reg::D),
        3 => InstrArgByte::Register(Reg::E),
        4 => InstrArgByte::Register(Reg::H),
        5 => InstrArgByte::Register(Reg::L),
        6 => InstrArgByte::AddressRegister(WReg::HL),
        _ => InstrArgByte::Register(Reg::A),
    }
}

/// Register pair encoded in bits 4-5 of 16-bit load/arithmetic opcodes.
fn word_reg(opcode: u8) -> WReg {
    match (opcode >> 4) & 0b11 {
        0 => WReg::BC,
        1 => WReg::DE,
        2 => WReg::HL,
        _ => WReg::SP,
    }
}

/// Register pair encoded in bits 4-5 of PUSH/POP opcodes, where AF replaces SP.
fn stack_reg(opcode: u8) -> WReg {
    match (opcode >> 4) & 0b11 {
        0 => WReg::BC,
        1 => WReg::DE,
        2 => WReg::HL,
        _ => WReg::AF,
    }
}

/// Condition encoded in bits 3-4 of conditional jumps, calls and returns.
fn condition(opcode: u8) -> Condition {
    match (opcode >> 3) & 0b11 {
        0 => Condition::NZ,
        1 => Condition::Z,
        2 => Condition::NC,
        _ => Condition::C,
    }
}

/// Decodes a byte from the base table. Returns `None` only for the 0xcb prefix, which is not an
/// instruction on its own.
pub fn decode(opcode: u8) -> Option<Instruction> {
    use InstrArgByte::{AddressRegister, ImmediateByte, Register};

    let instruction = match opcode {
        0x00 => Instruction::NOP,
        0x10 => Instruction::STOP,
        0x76 => Instruction::HALT,
        0xf3 => Instruction::DI,
        0xfb => Instruction::EI,

        0x01 | 0x11 | 0x21 | 0x31 => Instruction::LD_16(
            InstrArgWord::WordRegister(word_reg(opcode)),
            InstrArgWord::ImmediateWord,
        ),
        0x08 => Instruction::LD_16(
            InstrArgWord::AddressDirect,
            InstrArgWord::WordRegister(WReg::SP),
        ),
        0xf9 => Instruction::LD_16(
            InstrArgWord::WordRegister(WReg::SP),
            InstrArgWord::WordRegister(WReg::HL),
        ),
        0xf8 => Instruction::LDHL_SP,

        0x02 => Instruction::LD(AddressRegister(WReg::BC), Register(Reg::A)),
        0x12 => Instruction::LD(AddressRegister(WReg::DE), Register(Reg::A)),
        0x22 => Instruction::LDI_A_INTO_HL,
        0x32 => Instruction::LDD_A_INTO_HL,
        0x0a => Instruction::LD(Register(Reg::A), AddressRegister(WReg::BC)),
        0x1a => Instruction::LD(Register(Reg::A), AddressRegister(WReg::DE)),
        0x2a => Instruction::LDI_A_FROM_HL,
        0x3a => Instruction::LDD_A_FROM_HL,

        0x03 | 0x13 | 0x23 | 0x33 => Instruction::INC_WORD(word_reg(opcode)),
        0x0b | 0x1b | 0x2b | 0x3b => Instruction::DEC_WORD(word_reg(opcode)),
        0x09 | 0x19 | 0x29 | 0x39 => Instruction::ADD_HL(word_reg(opcode)),

        0x04 | 0x0c | 0x14 | 0x1c | 0x24 | 0x2c | 0x34 | 0x3c => {
            Instruction::INC(byte_arg(opcode >> 3))
        }
        0x05 | 0x0d | 0x15 | 0x1d | 0x25 | 0x2d | 0x35 | 0x3d => {
            Instruction::DEC(byte_arg(opcode >> 3))
        }
        0x06 | 0x0e | 0x16 | 0x1e | 0x26 | 0x2e | 0x36 | 0x3e => {
            Instruction::LD(byte_arg(opcode >> 3), ImmediateByte)
        }

        0x07 => Instruction::RLCA,
        0x0f => Instruction::RRCA,
        0x17 => Instruction::RLA,
        0x1f => Instruction::RRA,
        0x27 => Instruction::DAA,
        0x2f => Instruction::CPL,
        0x37 => Instruction::SCF,
        0x3f => Instruction::CCF,

        0x18 => Instruction::JR(Condition::Always),
        0x20 | 0x28 | 0x30 | 0x38 => Instruction::JR(condition(opcode)),

        // 0x76 is HALT, matched above
        0x40..=0x7f => Instruction::LD(byte_arg(opcode >> 3), byte_arg(opcode)),

        0x80..=0x87 => Instruction::ADD(byte_arg(opcode)),
        0x88..=0x8f => Instruction::ADC(byte_arg(opcode)),
        0x90..=0x97 => Instruction::SUB(byte_arg(opcode)),
        0x98..=0x9f => Instruction::SBC(byte_arg(opcode)),
        0xa0..=0xa7 => Instruction::AND(byte_arg(opcode)),
        0xa8..=0xaf => Instruction::XOR(byte_arg(opcode)),
        0xb0..=0xb7 => Instruction::OR(byte_arg(opcode)),
        0xb8..=0xbf => Instruction::CP(byte_arg(opcode)),

        0xc6 => Instruction::ADD(ImmediateByte),
        0xce => Instruction::ADC(ImmediateByte),
        0xd6 => Instruction::SUB(ImmediateByte),
        0xde => Instruction::SBC(ImmediateByte),
        0xe6 => Instruction::AND(ImmediateByte),
        0xee => Instruction::XOR(ImmediateByte),
        0xf6 => Instruction::OR(ImmediateByte),
        0xfe => Instruction::CP(ImmediateByte),

        0xc0 | 0xc8 | 0xd0 | 0xd8 => Instruction::RET(condition(opcode)),
        0xc9 => Instruction::RET(Condition::Always),
        0xd9 => Instruction::RETI,

        0xc2 | 0xca | 0xd2 | 0xda => Instruction::JP(condition(opcode)),
        0xc3 => Instruction::JP(Condition::Always),
        0xe9 => Instruction::JP_HL,

        0xc4 | 0xcc | 0xd4 | 0xdc => Instruction::CALL(condition(opcode)),
        0xcd => Instruction::CALL(Condition::Always),

        0xc1 | 0xd1 | 0xe1 | 0xf1 => Instruction::POP(stack_reg(opcode)),
        0xc5 | 0xd5 | 0xe5 | 0xf5 => Instruction::PUSH(stack_reg(opcode)),

        0xc7 | 0xcf | 0xd7 | 0xdf | 0xe7 | 0xef | 0xf7 | 0xff => {
            Instruction::RST(u16::from(opcode & 0x38))
        }

        0xe0 => Instruction::LD(InstrArgByte::OffsetImmediate, Register(Reg::A)),
        0xf0 => Instruction::LD(Register(Reg::A), InstrArgByte::OffsetImmediate),
        0xe2 => Instruction::LD(InstrArgByte::Offset(Reg::C), Register(Reg::A)),
        0xf2 => Instruction::LD(Register(Reg::A), InstrArgByte::Offset(Reg::C)),
        0xea => Instruction::LD(InstrArgByte::AddressDirect, Register(Reg::A)),
        0xfa => Instruction::LD(Register(Reg::A), InstrArgByte::AddressDirect),

        0xe8 => Instruction::ADD_SP,

        CB_PREFIX => return None,

        0xd3 | 0xdb | 0xdd | 0xe3 | 0xe4 | 0xeb | 0xec | 0xed | 0xf4 | 0xfc | 0xfd => {
            Instruction::ILLEGAL(opcode)
        }
    };

    Some(instruction)
}

/// Decodes the byte following a 0xcb prefix. Every byte has an entry: bits 6-7 pick the family,
/// bits 3-5 the operation or bit position, bits 0-2 the operand.
pub fn decode_prefixed(opcode: u8) -> Instruction {
    let target = byte_arg(opcode);
    let bit = (opcode >> 3) & 0b111;

    match opcode >> 6 {
        0b00 => match bit {
            0 => Instruction::RLC(target),
            1 => Instruction::RRC(target),
            2 => Instruction::RL(target),
            3 => Instruction::RR(target),
            4 => Instruction::SLA(target),
            5 => Instruction::SRA(target),
            6 => Instruction::SWAP(target),
            _ => Instruction::SRL(target),
        },
        0b01 => Instruction::BIT(bit, target),
        0b10 => Instruction::RES(bit, target),
        _ => Instruction::SET(bit, target),
    }
}
