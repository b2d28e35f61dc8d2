//! audiomorph - add calibrated noise to audio samples.
//!
//! For a single input file, writes the original's three artifacts to the
//! output directory:
//!
//!   original_audio.wav   the input as loaded
//!   scaled_audio.wav     the input rescaled to the reference power
//!   noisy_audio.wav      the final mixture
//!
//! For a directory input, loads the whole corpus (honoring the exclude
//! patterns and the recursive flag) and writes one mixture per entry.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use audiomorph::dsp::power;
use audiomorph::io::{Decoder, Encoder, WavDecoder, WavEncoder};
use audiomorph::{
    Corpus, CorpusConfig, Error, MixMode, MixRequest, Mixer, MixerConfig, NoiseKind, PowerReport,
    SampleBuffer,
};

#[derive(Parser, Debug)]
#[command(name = "audiomorph")]
#[command(about = "Mix calibrated noise into audio samples", long_about = None)]
struct Args {
    /// Audio file (or directory of audio files) to augment
    input: PathBuf,

    /// Noise kind: uniform, gaussian, recorded-raw, recorded-filtered
    #[arg(long, default_value = "uniform")]
    noise: String,

    /// Target signal-to-noise ratio in dB
    #[arg(long, conflicts_with = "fraction")]
    snr: Option<f64>,

    /// Target noise-power fraction in [0, 1]
    #[arg(long)]
    fraction: Option<f64>,

    /// Ambient recording for the recorded-* noise kinds
    #[arg(long, value_name = "FILE")]
    ambient: Option<PathBuf>,

    /// High-pass cutoff for recorded-filtered noise, in Hz
    #[arg(long, default_value = "128.0")]
    cutoff: f64,

    /// RNG seed for reproducible mixtures
    #[arg(long)]
    seed: Option<u64>,

    /// Exclude pattern for directory input (repeatable)
    #[arg(long, value_name = "REGEX")]
    exclude: Vec<String>,

    /// Descend into subdirectories of a directory input
    #[arg(long)]
    recursive: bool,

    /// Directory the output files are written to
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let kind: NoiseKind = args.noise.parse()?;
    let mode = match (args.snr, args.fraction) {
        (_, Some(noise)) => MixMode::Fraction { noise },
        (Some(snr_db), None) => MixMode::Ratio { snr_db },
        (None, None) => MixMode::Ratio { snr_db: 0.0 },
    };
    let request = MixRequest {
        kind,
        mode,
        seed: args.seed,
    };

    let config = MixerConfig {
        highpass_cutoff_hz: args.cutoff,
        ..MixerConfig::default()
    };
    let mixer = match &args.ambient {
        Some(path) => Mixer::with_ambient(config, WavDecoder.decode(path)?),
        None => Mixer::new(config),
    };

    std::fs::create_dir_all(&args.out_dir)?;

    if args.input.is_dir() {
        mix_corpus(&args, &mixer, &request)
    } else if args.input.is_file() {
        mix_single(&args, &config, &mixer, &request)
    } else {
        Err(Error::PathNotFound(args.input.clone()).into())
    }
}

fn mix_single(
    args: &Args,
    config: &MixerConfig,
    mixer: &Mixer,
    request: &MixRequest,
) -> color_eyre::Result<()> {
    let signal = WavDecoder.decode(&args.input)?;
    info!(
        samples = signal.len(),
        sample_rate = signal.sample_rate,
        "loaded {}",
        args.input.display()
    );

    let encoder = WavEncoder;
    encoder.encode(&args.out_dir.join("original_audio.wav"), &signal)?;

    // The rescaled-but-unmixed copy, for A/B listening against the mixture.
    let mut scaled = signal.clone();
    power::rescale_to_power(&mut scaled.samples, config.reference_power);
    encoder.encode(&args.out_dir.join("scaled_audio.wav"), &scaled)?;

    let output = mixer.mix(&signal, request)?;
    encoder.encode(&args.out_dir.join("noisy_audio.wav"), &output.mixture)?;

    log_report(&output.report);
    info!("wrote 3 files to {}", args.out_dir.display());
    Ok(())
}

fn mix_corpus(args: &Args, mixer: &Mixer, request: &MixRequest) -> color_eyre::Result<()> {
    let mut corpus = Corpus::new();
    corpus.fetch(&CorpusConfig {
        include: vec![args.input.clone()],
        exclude: args.exclude.clone(),
        recursive: args.recursive,
        append: true,
    })?;
    info!(files = corpus.len(), "corpus loaded");
    corpus.summary();

    let mut mixtures: Vec<(String, SampleBuffer)> = Vec::with_capacity(corpus.len());
    for (key, signal) in corpus.buffers() {
        let output = mixer.mix(signal, request)?;
        info!(
            key = %key,
            noise_fraction = output.report.noise_fraction,
            snr_db = output.report.snr_db,
        );
        mixtures.push((key.to_owned(), output.mixture));
    }
    for (key, mixture) in mixtures {
        corpus.insert(key, mixture);
    }

    corpus.write(&args.out_dir, true)?;
    info!("wrote {} mixtures to {}", corpus.len(), args.out_dir.display());
    Ok(())
}

fn log_report(report: &PowerReport) {
    info!(
        "{:.3}% of the mixture's average power is noise",
        report.noise_fraction * 100.0
    );
    info!(
        "{:.3}% of the mixture's average power is signal",
        report.signal_fraction * 100.0
    );
    info!("average noise power = {:.6e}", report.noise_power);
    info!("average signal power = {:.6e}", report.signal_power);
    info!("signal-to-noise ratio = {} dB", report.snr_db);
}
