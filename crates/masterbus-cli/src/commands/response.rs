//! Prints the EQ's magnitude response as a frequency/gain table.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use masterbus_session::Session;

use crate::chain::MasteringChain;
use crate::commands::parse_param_override;

#[derive(Args)]
pub struct ResponseArgs {
    /// Session file (TOML) to load parameters from
    #[arg(short, long)]
    session: Option<PathBuf>,

    /// Parameter override (e.g., "eq_b2_gain=3"); repeatable
    #[arg(long, value_parser = parse_param_override, number_of_values = 1)]
    param: Vec<(String, f32)>,

    /// Sample rate to evaluate at
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Number of points on the 20 Hz - 20 kHz log sweep
    #[arg(long, default_value = "32")]
    points: usize,
}

pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.points >= 2, "need at least 2 points");

    let mut chain = MasteringChain::new(args.sample_rate as f32);
    if let Some(path) = &args.session {
        let session = Session::load(path)
            .with_context(|| format!("failed to load session '{}'", path.display()))?;
        chain.apply_session(&session);
    }
    for (key, value) in &args.param {
        chain.set_named_param(key, *value)?;
    }

    let mut response = vec![0.0f32; args.points];
    chain.eq.magnitude_response(&mut response);

    println!("{:>10}  {:>8}", "Freq (Hz)", "Gain (dB)");
    for (i, &gain_db) in response.iter().enumerate() {
        // Same log sweep the response query uses
        let freq = 20.0 * 1000.0f32.powf(i as f32 / (args.points - 1) as f32);
        println!("{:>10.1}  {:>+8.2}", freq, gain_db);
    }

    Ok(())
}
