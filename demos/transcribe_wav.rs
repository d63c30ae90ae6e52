//! Example: Transcribe a WAV file
//!
//! Loads a mono WAV file, runs the transcription pipeline, prints the result
//! as JSON and writes a MIDI file next to the input. Multi-channel files are
//! rejected with the library's `NotImplemented` error.
//!
//! ```text
//! cargo run --example transcribe_wav -- input.wav [output.mid]
//! ```

use std::path::PathBuf;

use tonescribe::preprocessing::channel_mixer;
use tonescribe::{analyze, AnalysisError, AnalysisOptions, MidiExportOptions};

/// Load a WAV file and return (mono samples, sample_rate)
fn load_wav(path: &PathBuf) -> Result<(Vec<f32>, f32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let mono = channel_mixer::to_mono(&samples, spec.channels as usize)?;

    Ok((mono, spec.sample_rate as f32))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = match args.next() {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("usage: transcribe_wav <input.wav> [output.mid]");
            std::process::exit(2);
        }
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| input.with_extension("mid"));

    let (samples, sample_rate) = match load_wav(&input) {
        Ok(loaded) => loaded,
        Err(e) => {
            if let Some(AnalysisError::NotImplemented(msg)) = e.downcast_ref::<AnalysisError>() {
                eprintln!("{}: {}", input.display(), msg);
                std::process::exit(1);
            }
            return Err(e);
        }
    };
    log::info!(
        "Loaded {}: {} samples at {} Hz",
        input.display(),
        samples.len(),
        sample_rate
    );

    let result = analyze(&samples, sample_rate, AnalysisOptions::default())?;

    println!("{}", result.to_json()?);
    eprintln!("Transcription:");
    eprintln!("  Notes: {} ({} melody, {} harmony)", result.notes.len(), result.melody.len(), result.harmony.len());
    eprintln!("  Chords: {}", result.chords.len());
    match &result.key {
        Some(key) => eprintln!("  Key: {} (confidence: {:.2})", key.label, key.confidence),
        None => eprintln!("  Key: none"),
    }
    eprintln!("  Atonal score: {:.2} (atonal: {})", result.atonal_score, result.is_atonal);
    eprintln!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);

    let midi = result.to_midi(&MidiExportOptions::default())?;
    std::fs::write(&output, midi)?;
    eprintln!("Wrote {}", output.display());

    Ok(())
}
