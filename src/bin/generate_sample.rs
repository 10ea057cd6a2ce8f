use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rusty_inflammation::data::writer::{write_csv, write_json, write_parquet};
use rusty_inflammation::{DataFormat, Table};

/// Write synthetic inflammation datasets for trying out the analysis.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output directory (created if missing).
    #[arg(long, default_value = "data")]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = DataFormat::Csv)]
    format: DataFormat,

    /// Number of dataset files.
    #[arg(long, default_value_t = 12)]
    datasets: usize,

    /// Patients (rows) per dataset.
    #[arg(long, default_value_t = 60)]
    patients: usize,

    /// Days (columns) per dataset.
    #[arg(long, default_value_t = 40)]
    days: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Inflammation rises linearly to the middle of the trial and falls back,
/// scaled per patient, rounded to whole counts.
fn generate_dataset(patients: usize, days: usize, rng: &mut SimpleRng) -> Result<Table> {
    let peak = days as f64 / 2.0;
    let rows = (0..patients)
        .map(|_| {
            let severity = 0.5 + rng.next_f64();
            (0..days)
                .map(|day| {
                    let trend = peak - (day as f64 - peak).abs();
                    let noise = rng.next_f64() * 2.0 - 1.0;
                    (trend * severity / 2.0 + noise).round().max(0.0)
                })
                .collect()
        })
        .collect();
    Ok(Table::from_rows(rows)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    for i in 1..=args.datasets {
        let table = generate_dataset(args.patients, args.days, &mut rng)?;
        let path = args
            .out
            .join(format!("inflammation-{i:02}.{}", args.format.extension()));
        match args.format {
            DataFormat::Csv => write_csv(&table, &path),
            DataFormat::Json => write_json(&table, &path),
            DataFormat::Parquet => write_parquet(&table, &path),
        }
        .with_context(|| format!("writing {}", path.display()))?;
        log::debug!("Wrote {}: {table}", path.display());
    }

    println!(
        "Wrote {} {} dataset(s) ({} patients x {} days) to {}",
        args.datasets,
        args.format,
        args.patients,
        args.days,
        args.out.display()
    );
    Ok(())
}
