//! Headless trace driver.
//!
//! Loads an iNES image (or a raw 6502 binary with --entry), runs the CPU, and can print
//! a nestest-style trace line per instruction or a disassembly listing.
//! Usage: ferrite [--trace | --disasm] [--steps N] [--entry 0x8000] path/to/image

use std::fs;
use std::path::PathBuf;

use ansi_term::Colour::{Cyan, Yellow};
use anyhow::Result;
use clap::Parser;

use ferrite::{
    bus::CpuBus,
    cartridge::rom::Rom,
    cpu::{cpu::Cpu, disasm},
    ppu::ppu::Ppu,
};

#[derive(Parser)]
#[command(name = "ferrite", about = "Run or disassemble a 6502 program, headless")]
struct Args {
    /// iNES image, or a raw 6502 binary when --entry is given
    path: PathBuf,

    /// Load the file as a raw image at this address and start there (hex, e.g. 0x8000)
    #[arg(long, value_parser = parse_hex)]
    entry: Option<u16>,

    /// Instructions to execute (or to list with --disasm)
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Print a trace line per instruction
    #[arg(long)]
    trace: bool,

    /// Disassemble instead of executing
    #[arg(long)]
    disasm: bool,
}

fn parse_hex(s: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut bus = CpuBus::new(Ppu::new());
    let entry = match args.entry {
        Some(entry) => {
            let data = fs::read(&args.path)?;
            bus.load_bytes(entry, &data);
            Some(entry)
        }
        None => {
            let rom = Rom::load(&args.path)?;
            bus.load_rom(&rom);
            None
        }
    };

    let mut cpu = Cpu::new(bus);
    cpu.reset();
    if let Some(entry) = entry {
        cpu.pc = entry;
    }

    if args.disasm {
        let mut addr = cpu.pc;
        for _ in 0..args.steps {
            let (text, len) = disasm::disassemble(&mut cpu.bus, addr);
            println!("{}  {}", Cyan.paint(format!("{:04X}", addr)), text);
            addr = addr.wrapping_add(len);
        }
        return Ok(());
    }

    for _ in 0..args.steps {
        if args.trace {
            let pc = cpu.pc;
            let (text, _) = disasm::disassemble(&mut cpu.bus, pc);
            println!(
                "{}  {:<11} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
                Cyan.paint(format!("{:04X}", pc)),
                text,
                cpu.a,
                cpu.x,
                cpu.y,
                cpu.status,
                cpu.sp,
                cpu.cycles
            );
        }
        cpu.step();
    }

    println!(
        "{} {} instructions, {} cycles",
        Yellow.bold().paint("DONE"),
        args.steps,
        cpu.cycles
    );
    Ok(())
}
