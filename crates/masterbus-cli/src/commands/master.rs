//! Offline mastering: run a WAV file through the EQ -> compressor
//! chain and report the resulting loudness.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use masterbus_meter::LoudnessMeter;
use masterbus_session::{Session, SlotId};

use crate::chain::MasteringChain;
use crate::commands::parse_param_override;
use crate::wav::{read_stereo, write_stereo};

#[derive(Args)]
pub struct MasterArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Session file (TOML) to load parameters from
    #[arg(short, long)]
    session: Option<PathBuf>,

    /// Recall a stored settings slot (A, B, C, or D) from the session
    #[arg(long, requires = "session")]
    slot: Option<String>,

    /// Parameter override (e.g., "comp_thresh=-18"); repeatable
    #[arg(long, value_parser = parse_param_override, number_of_values = 1)]
    param: Vec<(String, f32)>,

    /// Save the final parameter set as a session file
    #[arg(long)]
    save_session: Option<PathBuf>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: MasterArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (mut buffer, sample_rate) = read_stereo(&args.input)?;
    anyhow::ensure!(!buffer.is_empty(), "input file contains no audio");

    println!(
        "  {} frames, {} Hz, {:.2}s",
        buffer.len(),
        sample_rate,
        buffer.len() as f32 / sample_rate as f32
    );

    let mut chain = MasteringChain::new(sample_rate as f32);
    if let Some(path) = &args.session {
        let session = Session::load(path)
            .with_context(|| format!("failed to load session '{}'", path.display()))?;
        let applied = chain.apply_session(&session);
        println!("Loaded session: {} ({applied} parameters)", session.name);

        if let Some(slot) = &args.slot {
            let id: SlotId = slot.parse()?;
            let snapshot = session.slot(id).with_context(|| {
                format!("session '{}' has no stored slot {id}", session.name)
            })?;
            snapshot.apply_to(&mut chain.eq);
            snapshot.apply_to(&mut chain.comp);
            println!("Recalled slot {id}");
        }
    }
    for (key, value) in &args.param {
        chain.set_named_param(key, *value)?;
    }
    chain.prepare(sample_rate as f32, args.block_size);

    let mut meter = LoudnessMeter::new(sample_rate as f32);

    let total = buffer.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut max_gain_reduction = 0.0f32;
    let mut processed = 0usize;
    for (left, right) in buffer
        .left
        .chunks_mut(args.block_size)
        .zip(buffer.right.chunks_mut(args.block_size))
    {
        chain.process_block(left, right);
        meter.process(left, right);
        max_gain_reduction = max_gain_reduction.max(chain.comp.gain_reduction_db());

        processed += left.len();
        pb.set_position(processed as u64);
    }
    pb.finish_with_message("done");

    println!("\nLoudness:");
    println!("  Integrated: {:>7.1} LUFS", meter.integrated_lufs());
    println!("  Range:      {:>7.1} LU", meter.loudness_range());
    println!("  Peak:       {:>7.1} dBFS", meter.true_peak_db());
    println!("\nDynamics:");
    println!("  Max gain reduction: {:.1} dB", max_gain_reduction);

    println!("\nWriting {}...", args.output.display());
    write_stereo(&args.output, &buffer, sample_rate, args.bit_depth)?;

    if let Some(path) = &args.save_session {
        let name = path
            .file_stem()
            .map_or_else(|| "Untitled".to_string(), |s| s.to_string_lossy().into_owned());
        Session::new(name)
            .with_sample_rate(sample_rate)
            .with_params(chain.capture_params())
            .save(path)
            .with_context(|| format!("failed to save session '{}'", path.display()))?;
        println!("Saved session to {}", path.display());
    }

    println!("Done!");
    Ok(())
}
