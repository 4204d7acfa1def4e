use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use sim_cec::aiger::{read_network, Reader};
use sim_cec::cec::{simulation_cec_with_params, CecParams, CecResult, MAX_INPUTS};
use sim_cec::network::{LogicNetwork, Network};

#[derive(Parser)]
#[command(author, version, about = "Simulation-based equivalence checking of two AIGER files")]
struct Cli {
    /// First network (ASCII AIGER)
    #[arg(value_name = "FILE")]
    first: PathBuf,

    /// Second network (ASCII AIGER)
    #[arg(value_name = "FILE")]
    second: PathBuf,

    /// Refuse networks with more inputs than this
    #[arg(long, value_name = "INT", default_value_t = MAX_INPUTS)]
    max_inputs: u32,

    /// Per-round memory budget, as a power of two (bytes)
    #[arg(long, value_name = "INT", default_value_t = 29)]
    memory_budget_log2: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load(path: &Path) -> Result<LogicNetwork> {
    let file = File::open(path).wrap_err_with(|| format!("cannot open {}", path.display()))?;
    let reader = Reader::from_reader(file)?;
    let ntk = read_network(reader).wrap_err_with(|| format!("cannot read {}", path.display()))?;
    Ok(ntk)
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        if cli.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let first = load(&cli.first)?;
    let second = load(&cli.second)?;
    println!("first  = {:?} (size {})", first, first.size());
    println!("second = {:?} (size {})", second, second.size());

    let params = CecParams {
        max_inputs: cli.max_inputs,
        memory_budget: 1u64.checked_shl(cli.memory_budget_log2).unwrap_or(u64::MAX),
    };
    let report = simulation_cec_with_params(&first, &second, &params);

    println!("result = {}", report.result);
    println!("split_var = {}", report.stats.split_var);
    println!("rounds = {}", report.stats.rounds);

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    std::process::exit(match report.result {
        CecResult::Equivalent => 0,
        CecResult::Different => 1,
        CecResult::Undetermined(_) => 2,
    });
}
