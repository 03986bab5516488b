use strum_macros::{AsRefStr, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Reg {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum WReg {
    AF,
    BC,
    DE,
    HL,
    SP,
}

/// Where an 8-bit operand lives. Immediate forms take their value from the `OpArg` fetched after
/// the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrArgByte {
    ImmediateByte,
    /// The byte at the 16-bit immediate address.
    AddressDirect,
    AddressRegister(WReg),
    Register(Reg),
    /// The byte at 0xff00 + register.
    Offset(Reg),
    /// The byte at 0xff00 + 8-bit immediate.
    OffsetImmediate,
}

impl InstrArgByte {
    /// Number of operand bytes following the opcode.
    fn operand_bytes(&self) -> u8 {
        match self {
            Self::ImmediateByte | Self::OffsetImmediate => 1,
            Self::AddressDirect => 2,
            Self::AddressRegister(_) | Self::Register(_) | Self::Offset(_) => 0,
        }
    }

    /// Machine cycles spent fetching operand bytes plus one memory access, if any.
    fn access_cycles(&self) -> u8 {
        match self {
            Self::Register(_) => 0,
            Self::ImmediateByte | Self::AddressRegister(_) | Self::Offset(_) => 1,
            Self::OffsetImmediate => 2,
            Self::AddressDirect => 3,
        }
    }

    fn is_memory(&self) -> bool {
        !matches!(self, Self::Register(_) | Self::ImmediateByte)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrArgWord {
    ImmediateWord,
    /// Two bytes at the 16-bit immediate address, little endian.
    AddressDirect,
    WordRegister(WReg),
}

/// Condition tested by jumps, calls and returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Condition {
    Always,
    NZ,
    Z,
    NC,
    C,
}

pub type Bit = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchStatus {
    Branch,
    NoBranch,
}

/// Operand bytes that followed an opcode, viewed three ways. A decoded instruction consumes at
/// most one of these, depending on its length.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpArg {
    pub u8: u8,
    pub i8: i8,
    pub u16: u16,
}

impl OpArg {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            u8: byte,
            i8: byte as i8,
            u16: byte.into(),
        }
    }

    pub fn from_word(word: u16) -> Self {
        let [low, _] = word.to_le_bytes();
        Self {
            u8: low,
            i8: low as i8,
            u16: word,
        }
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Instruction {
    /* LD nn,n */
    LD(InstrArgByte, InstrArgByte),
    LD_16(InstrArgWord, InstrArgWord),

    /* LD HL,SP+e */
    LDHL_SP,

    /* LDD */
    LDD_A_FROM_HL,
    LDD_A_INTO_HL,

    /* LDI */
    LDI_A_FROM_HL,
    LDI_A_INTO_HL,

    PUSH(WReg),
    POP(WReg),

    /* ADD */
    ADD(InstrArgByte),
    ADD_HL(WReg),
    ADD_SP,

    ADC(InstrArgByte),
    SUB(InstrArgByte),
    SBC(InstrArgByte),
    AND(InstrArgByte),
    OR(InstrArgByte),
    XOR(InstrArgByte),
    CP(InstrArgByte),

    INC(InstrArgByte),
    INC_WORD(WReg),

    DEC(InstrArgByte),
    DEC_WORD(WReg),

    DAA,
    CPL,
    CCF,
    SCF,

    NOP,
    HALT,
    STOP,
    DI,
    EI,

    RLCA,
    RLA,
    RRCA,
    RRA,

    /* CB prefixed */
    RLC(InstrArgByte),
    RRC(InstrArgByte),
    RL(InstrArgByte),
    RR(InstrArgByte),
    SLA(InstrArgByte),
    SRA(InstrArgByte),
    SWAP(InstrArgByte),
    SRL(InstrArgByte),
    BIT(Bit, InstrArgByte),
    SET(Bit, InstrArgByte),
    RES(Bit, InstrArgByte),

    /* Jumps */
    JP(Condition),
    JP_HL,
    JR(Condition),

    CALL(Condition),
    RST(u16),

    RET(Condition),
    RETI,

    /// An opcode with no defined behaviour. Executing it locks up the CPU.
    ILLEGAL(u8),
}

impl Instruction {
    pub fn is_prefixed(&self) -> bool {
        matches!(
            self,
            Self::RLC(_)
                | Self::RRC(_)
                | Self::RL(_)
                | Self::RR(_)
                | Self::SLA(_)
                | Self::SRA(_)
                | Self::SWAP(_)
                | Self::SRL(_)
                | Self::BIT(..)
                | Self::SET(..)
                | Self::RES(..)
        )
    }

    /// Instructions that may overwrite the program counter.
    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            Self::JP(_)
                | Self::JP_HL
                | Self::JR(_)
                | Self::CALL(_)
                | Self::RST(_)
                | Self::RET(_)
                | Self::RETI
        )
    }

    /// Total size in bytes, including the 0xcb prefix and any immediate operand.
    pub fn length(&self) -> u8 {
        if self.is_prefixed() {
            return 2;
        }
        let operand_bytes = match self {
            Self::LD(target, source) => target.operand_bytes() + source.operand_bytes(),
            Self::LD_16(target, source) => match (target, source) {
                (InstrArgWord::WordRegister(_), InstrArgWord::WordRegister(_)) => 0,
                _ => 2,
            },
            Self::ADD(arg)
            | Self::ADC(arg)
            | Self::SUB(arg)
            | Self::SBC(arg)
            | Self::AND(arg)
            | Self::OR(arg)
            | Self::XOR(arg)
            | Self::CP(arg) => arg.operand_bytes(),
            Self::LDHL_SP | Self::ADD_SP | Self::STOP => 1,
            Self::JR(_) => 1,
            Self::JP(_) | Self::CALL(_) => 2,
            _ => 0,
        };
        1 + operand_bytes
    }

    /// Machine cycles when no branch is taken.
    pub fn cycles(&self) -> u8 {
        match self {
            Self::LD(target, source) => 1 + target.access_cycles() + source.access_cycles(),
            Self::LD_16(target, source) => match (target, source) {
                (InstrArgWord::WordRegister(_), InstrArgWord::WordRegister(_)) => 2,
                (InstrArgWord::AddressDirect, _) => 5,
                _ => 3,
            },
            Self::LDHL_SP => 3,
            Self::LDD_A_FROM_HL | Self::LDD_A_INTO_HL => 2,
            Self::LDI_A_FROM_HL | Self::LDI_A_INTO_HL => 2,
            Self::PUSH(_) => 4,
            Self::POP(_) => 3,
            Self::ADD(arg)
            | Self::ADC(arg)
            | Self::SUB(arg)
            | Self::SBC(arg)
            | Self::AND(arg)
            | Self::OR(arg)
            | Self::XOR(arg)
            | Self::CP(arg) => 1 + arg.access_cycles(),
            Self::ADD_HL(_) => 2,
            Self::ADD_SP => 4,
            Self::INC(arg) | Self::DEC(arg) => 1 + 2 * arg.access_cycles(),
            Self::INC_WORD(_) | Self::DEC_WORD(_) => 2,
            Self::DAA | Self::CPL | Self::CCF | Self::SCF => 1,
            Self::NOP | Self::HALT | Self::STOP | Self::DI | Self::EI => 1,
            Self::RLCA | Self::RLA | Self::RRCA | Self::RRA => 1,
            Self::RLC(arg)
            | Self::RRC(arg)
            | Self::RL(arg)
            | Self::RR(arg)
            | Self::SLA(arg)
            | Self::SRA(arg)
            | Self::SWAP(arg)
            | Self::SRL(arg)
            | Self::SET(_, arg)
            | Self::RES(_, arg) => {
                if arg.is_memory() {
                    4
                } else {
                    2
                }
            }
            Self::BIT(_, arg) => {
                if arg.is_memory() {
                    3
                } else {
                    2
                }
            }
            Self::JP(Condition::Always) => 4,
            Self::JP(_) => 3,
            Self::JP_HL => 1,
            Self::JR(Condition::Always) => 3,
            Self::JR(_) => 2,
            Self::CALL(Condition::Always) => 6,
            Self::CALL(_) => 3,
            Self::RST(_) => 4,
            Self::RET(Condition::Always) => 4,
            Self::RET(_) => 2,
            Self::RETI => 4,
            Self::ILLEGAL(_) => 1,
        }
    }

    /// Machine cycles when a conditional branch is taken.
    pub fn branch_cycles(&self) -> u8 {
        match self {
            Self::JP(_) => 4,
            Self::JR(_) => 3,
            Self::CALL(_) => 6,
            Self::RET(Condition::Always) => 4,
            Self::RET(_) => 5,
            _ => self.cycles(),
        }
    }

    pub fn elapsed_cycles(&self, branch_status: BranchStatus) -> u8 {
        match branch_status {
            BranchStatus::Branch => self.branch_cycles(),
            BranchStatus::NoBranch => self.cycles(),
        }
    }
}
