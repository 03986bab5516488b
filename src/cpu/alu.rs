/*!
 * Arithmetic and logic operations.
 *
 * Every operation reads its operands, recomputes the flag register and returns the result; the
 * caller decides where the result is stored. Arithmetic wraps, overflow only shows up in flags.
 */

use crate::cpu::instruction::Bit;
use crate::cpu::register::{FlagRegister, Registers};

impl Registers {
    pub fn add(&mut self, value: u8) -> u8 {
        let a = self.a;
        let (sum, overflow) = a.overflowing_add(value);

        self.f = FlagRegister {
            zero: sum == 0,
            subtract: false,
            half_carry: (a & 0xf) + (value & 0xf) > 0xf,
            carry: overflow,
        };
        sum
    }

    /// Adds `value` to HL. The half carry comes out of bit 11.
    pub fn add_pair(&mut self, value: u16) -> u16 {
        let hl = self.get_hl();
        let (sum, overflow) = hl.overflowing_add(value);

        self.f = FlagRegister {
            zero: sum == 0,
            subtract: false,
            half_carry: (hl & 0x0fff) + (value & 0x0fff) > 0x0fff,
            carry: overflow,
        };
        sum
    }

    pub fn adc(&mut self, value: u8) -> u8 {
        let a = self.a;
        let carry_in = u8::from(self.f.carry);
        let (partial_sum, overflow1) = a.overflowing_add(value);
        let (sum, overflow2) = partial_sum.overflowing_add(carry_in);

        self.f = FlagRegister {
            zero: sum == 0,
            subtract: false,
            half_carry: (a & 0xf) + (value & 0xf) + carry_in > 0xf,
            carry: overflow1 || overflow2,
        };
        sum
    }

    pub fn sub(&mut self, value: u8) -> u8 {
        let a = self.a;
        let diff = a.wrapping_sub(value);

        self.f = FlagRegister {
            zero: diff == 0,
            subtract: true,
            half_carry: (a & 0xf) < (value & 0xf),
            carry: a < value,
        };
        diff
    }

    pub fn sbc(&mut self, value: u8) -> u8 {
        let a = self.a;
        let carry_in = u8::from(self.f.carry);
        let (partial_diff, overflow1) = a.overflowing_sub(value);
        let (diff, overflow2) = partial_diff.overflowing_sub(carry_in);

        self.f = FlagRegister {
            zero: diff == 0,
            subtract: true,
            half_carry: (a & 0xf) < (value & 0xf) + carry_in,
            carry: overflow1 || overflow2,
        };
        diff
    }

    pub fn and(&mut self, value: u8) -> u8 {
        let result = self.a & value;
        self.f = FlagRegister::new(result == 0, false, true, false);
        result
    }

    pub fn or(&mut self, value: u8) -> u8 {
        let result = self.a | value;
        self.f = FlagRegister::new(result == 0, false, false, false);
        result
    }

    pub fn xor(&mut self, value: u8) -> u8 {
        let result = self.a ^ value;
        self.f = FlagRegister::new(result == 0, false, false, false);
        result
    }

    /// Compares A with `value`. A itself is left untouched.
    pub fn cp(&mut self, value: u8) {
        let a = self.a;
        self.f = FlagRegister {
            zero: a == value,
            subtract: true,
            half_carry: (a & 0xf) < (value & 0xf),
            carry: a < value,
        };
    }

    pub fn inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.f.zero = result == 0;
        self.f.subtract = false;
        self.f.half_carry = value & 0xf == 0xf;
        result
    }

    pub fn dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.f.zero = result == 0;
        self.f.subtract = true;
        self.f.half_carry = value & 0xf == 0;
        result
    }

    pub fn ccf(&mut self) {
        self.f.subtract = false;
        self.f.half_carry = false;
        self.f.carry = !self.f.carry;
    }

    pub fn scf(&mut self) {
        self.f.subtract = false;
        self.f.half_carry = false;
        self.f.carry = true;
    }

    pub fn cpl(&mut self) -> u8 {
        self.f.subtract = true;
        self.f.half_carry = true;
        !self.a
    }

    /// Decimal adjust of A after a BCD addition or subtraction.
    pub fn daa(&mut self) -> u8 {
        let mut a = self.a;
        let mut carry = self.f.carry;

        if !self.f.subtract {
            // After an addition, adjust if (half-)carry occured or result is out of bounds.
            if carry || a > 0x99 {
                a = a.wrapping_add(0x60);
                carry = true;
            }
            if self.f.half_carry || (a & 0x0f) > 0x09 {
                a = a.wrapping_add(0x06);
            }
        } else {
            // After a subtraction, only adjust if (half-)carry occured.
            if carry {
                a = a.wrapping_sub(0x60);
            }
            if self.f.half_carry {
                a = a.wrapping_sub(0x06);
            }
        }

        self.f.zero = a == 0;
        self.f.half_carry = false;
        self.f.carry = carry;
        a
    }

    /// SP plus a signed offset. Half carry and carry come from the unsigned low byte addition.
    pub fn add_sp(&mut self, offset: i8) -> u16 {
        let sp = self.sp;
        let unsigned_offset = offset as i16 as u16;
        let sum = sp.wrapping_add(unsigned_offset);

        self.f = FlagRegister {
            zero: false,
            subtract: false,
            half_carry: (sp ^ unsigned_offset ^ sum) & 0x10 == 0x10,
            carry: (sp ^ unsigned_offset ^ sum) & 0x100 == 0x100,
        };
        sum
    }

    pub fn rla(&mut self) -> u8 {
        self.rl(self.a)
    }

    pub fn rra(&mut self) -> u8 {
        self.rr(self.a)
    }

    pub fn rlca(&mut self) -> u8 {
        self.rlc(self.a)
    }

    pub fn rrca(&mut self) -> u8 {
        self.rrc(self.a)
    }

    /// Rotate left through carry.
    pub fn rl(&mut self, value: u8) -> u8 {
        let result = (value << 1) | u8::from(self.f.carry);
        self.set_shift_flags(result, value >> 7 == 1)
    }

    /// Rotate right through carry.
    pub fn rr(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | (u8::from(self.f.carry) << 7);
        self.set_shift_flags(result, value & 0b1 == 1)
    }

    pub fn rlc(&mut self, value: u8) -> u8 {
        self.set_shift_flags(value.rotate_left(1), value >> 7 == 1)
    }

    pub fn rrc(&mut self, value: u8) -> u8 {
        self.set_shift_flags(value.rotate_right(1), value & 0b1 == 1)
    }

    pub fn sla(&mut self, value: u8) -> u8 {
        self.set_shift_flags(value << 1, value >> 7 == 1)
    }

    /// Arithmetic shift right, bit 7 is kept.
    pub fn sra(&mut self, value: u8) -> u8 {
        self.set_shift_flags((value >> 1) | (value & 0x80), value & 0b1 == 1)
    }

    pub fn srl(&mut self, value: u8) -> u8 {
        self.set_shift_flags(value >> 1, value & 0b1 == 1)
    }

    pub fn swap(&mut self, value: u8) -> u8 {
        let result = value.rotate_left(4);
        self.f = FlagRegister::new(result == 0, false, false, false);
        result
    }

    /// Tests bit `bit` of `value`; the carry flag is left as is.
    pub fn bit(&mut self, value: u8, bit: Bit) {
        self.f.zero = (value >> bit) & 0b1 == 0;
        self.f.subtract = false;
        self.f.half_carry = true;
    }

    fn set_shift_flags(&mut self, result: u8, carry: bool) -> u8 {
        self.f = FlagRegister::new(result == 0, false, false, carry);
        result
    }
}

/// `value` with bit `bit` forced to 1. No flag is affected.
pub fn set(value: u8, bit: Bit) -> u8 {
    value | (1 << bit)
}

/// `value` with bit `bit` forced to 0. No flag is affected.
pub fn reset(value: u8, bit: Bit) -> u8 {
    value & !(1 << bit)
}
