use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use micro16_rs::disasm::fmt_word;
use micro16_rs::{assemble, isa, Cpu};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble and run a micro16 program"
)]
struct Opts {
    /// Assembly source file
    #[arg(value_name = "ASMFILE")]
    input: String,
    /// Maximum number of steps before giving up
    #[arg(long, default_value_t = 10_000u64)]
    max_steps: u64,
    /// Print the assembled listing and exit without running
    #[arg(long)]
    listing: bool,
    /// Dump the final machine state as JSON
    #[arg(long)]
    dump_state: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let text = std::fs::read_to_string(&opts.input)?;
    let program = match assemble(&text) {
        Ok(words) => words,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    if opts.listing {
        println!("{}", micro16_rs::disasm::fmt_program(&program));
        return Ok(());
    }

    let mut cpu = Cpu::new(program);
    for _ in 0..opts.max_steps {
        if cpu.terminated {
            break;
        }
        if let Some(&word) = cpu.program.get(cpu.pc) {
            tracing::trace!(pc = cpu.pc, instr = %fmt_word(word), "step");
        }
        if let Err(trap) = cpu.step() {
            eprintln!("TRAP: {trap}");
            break;
        }
    }

    if opts.dump_state {
        println!("{}", serde_json::to_string_pretty(&cpu)?);
    } else {
        for (i, name) in isa::REGISTERS.iter().enumerate() {
            println!("{name:>6} = {}", cpu.regs[i]);
        }
        println!("    pc = {}", cpu.pc);
        println!("  halt = {}", cpu.terminated);
    }
    Ok(())
}
