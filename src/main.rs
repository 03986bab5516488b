use gameboy_cpu::cpu::Reg;
use gameboy_cpu::{CartridgeDescriptor, Cpu, MemoryBus, Steppable};
use log::*;
use strum::IntoEnumIterator;

use std::fs;
use std::io::Write;
use std::path::Path;

use clap::Parser;

/// Runs a rom image on the CPU over a flat memory bus, echoing serial output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to .gb rom file
    #[arg(short = 'r', long = "rom", required = true)]
    rom_path: String,

    /// Stop after this many instructions
    #[arg(short, long)]
    steps: Option<u64>,

    /// Debug mode
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn main() -> Result<(), String> {
    env_logger::init();

    let args = Args::parse();

    let bytes = fs::read(&args.rom_path).map_err(|e| e.to_string())?;
    let file_name = Path::new(&args.rom_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.rom_path.clone());
    let cartridge =
        CartridgeDescriptor::from_header(&bytes, &file_name).map_err(|e| e.to_string())?;
    print!("{}", &cartridge);

    let mut memory_bus = MemoryBus::new();
    // Only the first 32 KiB are visible without a bank controller.
    memory_bus.load(0, &bytes[..bytes.len().min(0x8000)]);

    let mut cpu = Cpu::post_boot();
    let mut total_cycles: u64 = 0;
    let mut steps: u64 = 0;
    let mut printed = 0;

    let result = loop {
        if args.steps.map_or(false, |limit| steps >= limit) {
            break Ok(());
        }
        match cpu.step(&mut memory_bus) {
            Ok(elapsed_cycles) => total_cycles += u64::from(elapsed_cycles),
            Err(e) => break Err(e.to_string()),
        }
        steps += 1;

        let serial = memory_bus.get_serial_port_data();
        if serial.len() > printed {
            print!("{}", String::from_utf8_lossy(&serial[printed..]));
            if let Err(e) = std::io::stdout().flush() {
                break Err(e.to_string());
            }
            printed = serial.len();
        }
    };

    info!("ran {} instructions in {} machine cycles", steps, total_cycles);
    if args.debug {
        dump_registers(&cpu);
    }
    result
}

fn dump_registers(cpu: &Cpu) {
    let flags = cpu.registers.f;
    let registers: Vec<String> = Reg::iter()
        .map(|reg| format!("{:?}={:#04x}", reg, cpu.get_register(reg)))
        .collect();
    println!("pc={:#06x} sp={:#06x} {}", cpu.pc(), cpu.sp(), registers.join(" "));
    println!(
        "z={} n={} h={} c={} halted={} ime={}",
        flags.zero,
        flags.subtract,
        flags.half_carry,
        flags.carry,
        cpu.is_halted(),
        cpu.interrupts_enabled()
    );
}
