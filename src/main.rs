use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rusty_inflammation::{DataFormat, analyse};

/// Standard deviation, per day, of the daily mean inflammation across every
/// dataset in a directory.
#[derive(Parser)]
#[command(name = "rusty-inflammation", version)]
struct Cli {
    /// Directory holding `inflammation*` data files.
    #[arg(value_name = "DIR", default_value = "data")]
    dir: PathBuf,

    /// Format of the data files.
    #[arg(long, value_enum, default_value_t = DataFormat::Csv)]
    format: DataFormat,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let source = cli.format.data_source(&cli.dir);
    match analyse(source.as_ref()) {
        Ok(std_devs) => {
            println!("day\tstd_dev");
            for (day, value) in std_devs.iter().enumerate() {
                println!("{day}\t{value:.6}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Analysis of {} failed: {e}", cli.dir.display());
            eprintln!("{}: {e}", e.title());
            ExitCode::FAILURE
        }
    }
}
