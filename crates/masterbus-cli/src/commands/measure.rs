//! Loudness measurement of a WAV file, without processing it.

use std::path::PathBuf;

use clap::Args;
use masterbus_meter::LoudnessMeter;

use crate::wav::read_stereo;

#[derive(Args)]
pub struct MeasureArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Analysis block size
    #[arg(long, default_value = "512")]
    block_size: usize,
}

pub fn run(args: MeasureArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (buffer, sample_rate) = read_stereo(&args.input)?;
    anyhow::ensure!(!buffer.is_empty(), "input file contains no audio");

    let mut meter = LoudnessMeter::new(sample_rate as f32);

    let mut max_momentary = f32::NEG_INFINITY;
    let mut max_short_term = f32::NEG_INFINITY;
    for (left, right) in buffer
        .left
        .chunks(args.block_size)
        .zip(buffer.right.chunks(args.block_size))
    {
        meter.process(left, right);
        max_momentary = max_momentary.max(meter.momentary_lufs());
        max_short_term = max_short_term.max(meter.short_term_lufs());
    }

    println!(
        "\n{} ({} Hz, {:.2}s)",
        args.input.display(),
        sample_rate,
        buffer.len() as f32 / sample_rate as f32
    );
    println!("  Integrated:     {:>7.1} LUFS", meter.integrated_lufs());
    println!("  Momentary max:  {:>7.1} LUFS", max_momentary);
    println!("  Short-term max: {:>7.1} LUFS", max_short_term);
    println!("  Loudness range: {:>7.1} LU", meter.loudness_range());
    println!("  Peak:           {:>7.1} dBFS", meter.true_peak_db());
    println!("  Correlation:    {:>7.2}", meter.correlation());
    println!("  Balance:        {:>+7.2}", meter.balance());

    Ok(())
}
