use clap::Parser;
use colored::Colorize;
use pixvm::{ColorConfig, DebugMode, Exit, OpTable, PixelVm, RasterGrid, VmConfig};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "pixvm", version)]
#[command(about = "Run a program painted as a PNG image")]
struct Args {
    /// Path to the program image (.png)
    image: PathBuf,

    /// Report every step and wait for ENTER before the next one
    #[arg(short, long)]
    debug: bool,

    /// Report every step without waiting
    #[arg(short, long, conflicts_with = "debug")]
    trace: bool,

    /// Load custom operation colors from FILE_PATH
    #[arg(short, long, value_name = "FILE_PATH")]
    config: Option<PathBuf>,

    /// Maximum stack size, -1 for no limit
    #[arg(short, long = "max-size", default_value_t = -1, allow_negative_numbers = true)]
    max_size: i64,

    /// Edge length in pixels of one instruction block
    #[arg(short = 's', long = "instruction-size", default_value_t = 1)]
    instruction_size: usize,

    /// Fixed seed for random numbers
    #[arg(long)]
    seed: Option<u64>,
}

// Loading problems exit with 1, failures while running with 2
fn fail(e: pixvm::Error, code: i32) -> ! {
    println!();
    eprintln!("{}", format!("error: {}", e).red());
    process::exit(code);
}

fn load(args: &Args) -> pixvm::Result<(RasterGrid, OpTable, VmConfig)> {
    let table = match &args.config {
        Some(path) => {
            let table = ColorConfig::load(path)?.table()?;
            log::info!("color overrides loaded from {:?}", path);
            table
        }
        None => OpTable::new(),
    };
    let debug = if args.debug {
        DebugMode::Step
    } else if args.trace {
        DebugMode::Trace
    } else {
        DebugMode::Off
    };
    let config = VmConfig {
        max_stack: VmConfig::max_stack_from_flag(args.max_size)?,
        instruction_size: args.instruction_size,
        debug,
        seed: args.seed,
    };
    let grid = RasterGrid::load_png(&args.image)?;
    Ok((grid, table, config))
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let (grid, table, config) = match load(&args) {
        Ok(loaded) => loaded,
        Err(e) => fail(e, 1),
    };
    let mut vm = match PixelVm::new(grid, table, &config) {
        Ok(vm) => vm,
        Err(e) => fail(e, 1),
    };

    match vm.run() {
        Ok(Exit::Quit) => println!(),
        Ok(Exit::Finished) => {}
        Err(e) => fail(e, 2),
    }
}
