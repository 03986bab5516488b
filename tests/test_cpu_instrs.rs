mod common;

use common::{cpu_with_program, run_until, PROGRAM_START};
use gameboy_cpu::cpu::{decode, decode_prefixed, Instruction, Reg, WReg, CB_PREFIX};
use gameboy_cpu::{Addressable, Cpu, Error, MemoryBus, Steppable};

#[test]
fn pc_advances_by_instruction_length() {
    for opcode in 0..=u8::MAX {
        if opcode == CB_PREFIX {
            continue;
        }
        let instruction = decode(opcode).unwrap();
        if instruction.is_control_flow() {
            continue;
        }
        let (mut cpu, mut memory_bus) = cpu_with_program(&[opcode, 0x00, 0x00]);
        if let Instruction::ILLEGAL(_) = instruction {
            assert_eq!(
                cpu.step(&mut memory_bus),
                Err(Error::decode(opcode, PROGRAM_START))
            );
            assert_eq!(cpu.pc(), PROGRAM_START);
            continue;
        }
        cpu.step(&mut memory_bus).unwrap();
        assert_eq!(
            cpu.pc(),
            PROGRAM_START + u16::from(instruction.length()),
            "opcode {:#04x}",
            opcode
        );
    }
}

#[test]
fn prefixed_instructions_are_two_bytes() {
    for opcode in 0..=u8::MAX {
        let (mut cpu, mut memory_bus) = cpu_with_program(&[CB_PREFIX, opcode]);
        let cycles = cpu.step(&mut memory_bus).unwrap();
        assert_eq!(cpu.pc(), PROGRAM_START + 2);
        assert_eq!(cycles, u32::from(decode_prefixed(opcode).cycles()));
    }
}

#[test]
fn taken_jumps_land_on_target() {
    // JP 0x0150
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0xc3, 0x50, 0x01]);
    assert_eq!(cpu.step(&mut memory_bus).unwrap(), 4);
    assert_eq!(cpu.pc(), 0x0150);

    // JR -2 loops on itself
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0x18, 0xfe]);
    assert_eq!(cpu.step(&mut memory_bus).unwrap(), 3);
    assert_eq!(cpu.pc(), PROGRAM_START);

    // JP HL
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0xe9]);
    cpu.set_word_register(WReg::HL, 0x4000);
    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(cpu.pc(), 0x4000);
}

#[test]
fn conditional_branch_timing() {
    // JR NZ,+5 with zero clear
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0x20, 0x05]);
    assert_eq!(cpu.step(&mut memory_bus).unwrap(), 3);
    assert_eq!(cpu.pc(), PROGRAM_START + 2 + 5);

    // JR Z,+5 with zero clear
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0x28, 0x05]);
    assert_eq!(cpu.step(&mut memory_bus).unwrap(), 2);
    assert_eq!(cpu.pc(), PROGRAM_START + 2);

    // CALL C,0x2000 with carry clear
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0xdc, 0x00, 0x20]);
    assert_eq!(cpu.step(&mut memory_bus).unwrap(), 3);
    assert_eq!(cpu.pc(), PROGRAM_START + 3);
    assert_eq!(cpu.sp(), 0xfffe);

    // SCF; CALL C,0x2000
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0x37, 0xdc, 0x00, 0x20]);
    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(cpu.step(&mut memory_bus).unwrap(), 6);
    assert_eq!(cpu.pc(), 0x2000);
    assert_eq!(cpu.sp(), 0xfffc);
}

#[test]
fn add_register_c() {
    // LD C,0x01; ADD A,C
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0x0e, 0x01, 0x81]);
    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(cpu.step(&mut memory_bus).unwrap(), 1);
    assert_eq!(cpu.get_register(Reg::A), 0x01);
    let flags = cpu.registers.f;
    assert!(!(flags.zero || flags.subtract || flags.half_carry || flags.carry));
}

#[test]
fn counting_loop() {
    // LD B,10; XOR A; loop: ADD A,B; DEC B; JR NZ,loop; HALT
    let program = [0x06, 0x0a, 0xaf, 0x80, 0x05, 0x20, 0xfc, 0x76];
    let (mut cpu, mut memory_bus) = cpu_with_program(&program);
    run_until(&mut cpu, &mut memory_bus, PROGRAM_START + 7, 100);
    assert_eq!(cpu.get_register(Reg::A), 55);
    assert_eq!(cpu.get_register(Reg::B), 0);
    assert!(cpu.registers.f.zero);
}

#[test]
fn memory_copy_loop() {
    // LD HL,0xc000; LD DE,0xc100; LD C,4
    // loop: LD A,(HL+); LD (DE),A; INC DE; DEC C; JR NZ,loop
    let program = [
        0x21, 0x00, 0xc0, 0x11, 0x00, 0xc1, 0x0e, 0x04, 0x2a, 0x12, 0x13, 0x0d, 0x20, 0xfa,
    ];
    let (mut cpu, mut memory_bus) = cpu_with_program(&program);
    memory_bus.load(0xc000, &[0xde, 0xad, 0xbe, 0xef]);
    run_until(&mut cpu, &mut memory_bus, PROGRAM_START + program.len() as u16, 100);

    for (offset, expected) in [0xde, 0xad, 0xbe, 0xef].iter().enumerate() {
        assert_eq!(memory_bus.read_u8(0xc100 + offset as u16).unwrap(), *expected);
    }
    assert_eq!(cpu.get_word_register(WReg::HL), 0xc004);
    assert_eq!(cpu.get_word_register(WReg::DE), 0xc104);
}

#[test]
fn call_push_pop_ret() {
    // 0x100: LD BC,0x1234; CALL 0x0110; HALT
    // 0x110: PUSH BC; POP DE; RET
    let mut program = vec![0x01, 0x34, 0x12, 0xcd, 0x10, 0x01, 0x76];
    program.resize(0x10, 0x00);
    program.extend_from_slice(&[0xc5, 0xd1, 0xc9]);
    let (mut cpu, mut memory_bus) = cpu_with_program(&program);

    let cycles = run_until(&mut cpu, &mut memory_bus, PROGRAM_START + 6, 10);
    assert_eq!(cycles, 3 + 6 + 4 + 3 + 4);
    assert_eq!(cpu.get_word_register(WReg::DE), 0x1234);
    assert_eq!(cpu.sp(), 0xfffe);
}

#[test]
fn prefixed_program() {
    // LD A,0x80; RLC A; BIT 0,A; SET 7,B; SWAP A
    let program = [0x3e, 0x80, 0xcb, 0x07, 0xcb, 0x47, 0xcb, 0xf8, 0xcb, 0x37];
    let (mut cpu, mut memory_bus) = cpu_with_program(&program);
    cpu.step(&mut memory_bus).unwrap();

    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(cpu.get_register(Reg::A), 0x01);
    assert!(cpu.registers.f.carry);

    cpu.step(&mut memory_bus).unwrap();
    assert!(!cpu.registers.f.zero);
    assert!(cpu.registers.f.half_carry);
    assert!(cpu.registers.f.carry);

    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(cpu.get_register(Reg::B), 0x80);

    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(cpu.get_register(Reg::A), 0x10);
    assert_eq!(cpu.pc(), PROGRAM_START + program.len() as u16);
}

#[test]
fn stack_pointer_arithmetic() {
    // LD SP,0xfff8; ADD SP,8; LD HL,SP-1
    let program = [0x31, 0xf8, 0xff, 0xe8, 0x08, 0xf8, 0xff];
    let (mut cpu, mut memory_bus) = cpu_with_program(&program);
    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(cpu.step(&mut memory_bus).unwrap(), 4);
    assert_eq!(cpu.sp(), 0x0000);
    assert!(cpu.registers.f.carry);

    assert_eq!(cpu.step(&mut memory_bus).unwrap(), 3);
    assert_eq!(cpu.get_word_register(WReg::HL), 0xffff);
    assert_eq!(cpu.sp(), 0x0000);
}

#[test]
fn rst_and_reti() {
    // 0x100: EI; RST 0x08
    // 0x008: RETI
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0xfb, 0xcf]);
    memory_bus.load(0x08, &[0xd9]);
    cpu.step(&mut memory_bus).unwrap();
    assert!(!cpu.interrupts_enabled());
    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(cpu.pc(), 0x08);
    assert!(cpu.interrupts_enabled());
    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(cpu.pc(), PROGRAM_START + 2);
}

#[test]
fn prefix_byte_has_no_base_entry() {
    assert!(decode(CB_PREFIX).is_none());
    assert_eq!(decode(0x00), Some(Instruction::NOP));
}

#[test]
fn bus_fault_on_operand_fetch() {
    // LD A,(a16) straddling the end of a 0x200 byte bus
    let mut memory_bus = MemoryBus::with_size(0x200);
    memory_bus.load(0x1fe, &[0xfa, 0x00]);
    let mut cpu = Cpu::new();
    cpu.set_pc(0x1fe);
    assert_eq!(cpu.step(&mut memory_bus), Err(Error::from_address(0x200)));
    assert_eq!(cpu.pc(), 0x1fe);
}

#[test]
fn bus_fault_on_data_access() {
    // LD A,(0xc000) on a 0x200 byte bus
    let mut memory_bus = MemoryBus::with_size(0x200);
    memory_bus.load(0x100, &[0xfa, 0x00, 0xc0]);
    let mut cpu = Cpu::new();
    cpu.set_pc(0x100);
    assert_eq!(cpu.step(&mut memory_bus), Err(Error::from_address(0xc000)));
    assert_eq!(cpu.pc(), 0x100);
}

#[test]
fn faulting_call_leaves_registers_untouched() {
    // CALL 0x0050 with the stack just past the end of a 0x200 byte bus
    let mut memory_bus = MemoryBus::with_size(0x200);
    memory_bus.load(0, &[0xcd, 0x50, 0x00]);
    let mut cpu = Cpu::new();
    cpu.set_sp(0x0201);

    for _ in 0..2 {
        assert_eq!(cpu.step(&mut memory_bus), Err(Error::from_address(0x200)));
        assert_eq!(cpu.pc(), 0x0000);
        assert_eq!(cpu.sp(), 0x0201);
    }
}

#[test]
fn faulting_push_leaves_registers_untouched() {
    // LD BC,0x1234; PUSH BC
    let mut memory_bus = MemoryBus::with_size(0x200);
    memory_bus.load(0, &[0x01, 0x34, 0x12, 0xc5]);
    let mut cpu = Cpu::new();
    cpu.set_sp(0x0202);
    cpu.step(&mut memory_bus).unwrap();

    assert_eq!(cpu.step(&mut memory_bus), Err(Error::from_address(0x201)));
    assert_eq!(cpu.pc(), 0x0003);
    assert_eq!(cpu.sp(), 0x0202);
    assert_eq!(cpu.get_word_register(WReg::BC), 0x1234);
}

#[test]
fn illegal_opcode_stops_the_program() {
    // INC A; 0xdd; INC A
    let (mut cpu, mut memory_bus) = cpu_with_program(&[0x3c, 0xdd, 0x3c]);
    cpu.step(&mut memory_bus).unwrap();
    assert_eq!(
        cpu.step(&mut memory_bus),
        Err(Error::decode(0xdd, PROGRAM_START + 1))
    );
    assert_eq!(cpu.pc(), PROGRAM_START + 1);
    assert_eq!(cpu.get_register(Reg::A), 1);
}
