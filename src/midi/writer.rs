//! Type-1 Standard MIDI File writer

use super::vlq::write_vlq;
use super::MidiExportOptions;
use crate::analysis::result::{ChordEvent, NoteEvent};
use crate::error::AnalysisError;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const META: u8 = 0xFF;
const META_TEMPO: u8 = 0x51;
const META_END_OF_TRACK: u8 = 0x2F;

/// One note-on or note-off at an absolute tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NoteMessage {
    tick: u64,
    on: bool,
    pitch: u8,
    velocity: u8,
}

/// Convert seconds to ticks at a fixed tempo, floored at 0
pub fn seconds_to_ticks(seconds: f32, tempo_bpm: f32, ppq: u16) -> u64 {
    let ticks = (seconds as f64 * tempo_bpm as f64 * ppq as f64 / 60.0).round();
    if ticks.is_finite() && ticks > 0.0 {
        ticks as u64
    } else {
        0
    }
}

/// Chord note velocity: `clamp(round(55 + confidence * 45), 40, 110)`
pub fn chord_velocity(confidence: f32) -> u8 {
    (55.0 + confidence * 45.0).round().clamp(40.0, 110.0) as u8
}

/// Melody note velocity: the note's own velocity, else `clamp(round(50 + confidence * 70), 40, 120)`
pub fn melody_velocity(note: &NoteEvent) -> u8 {
    match note.velocity {
        Some(v) => v.clamp(1, 127),
        None => (50.0 + note.confidence * 70.0).round().clamp(40.0, 120.0) as u8,
    }
}

// A note-off never lands on or before its own note-on
fn push_note(messages: &mut Vec<NoteMessage>, start: u64, end: u64, pitch: u8, velocity: u8) {
    messages.push(NoteMessage {
        tick: start,
        on: true,
        pitch,
        velocity,
    });
    messages.push(NoteMessage {
        tick: end.max(start + 1),
        on: false,
        pitch,
        velocity: 0,
    });
}

fn chord_messages(chords: &[ChordEvent], options: &MidiExportOptions) -> Vec<NoteMessage> {
    let mut messages = Vec::new();
    let base = options.chord_base_octave as i32 * 12;
    for chord in chords {
        let root = match chord.root_pitch_class {
            Some(root) => root as i32 % 12,
            None => continue,
        };
        let start = seconds_to_ticks(chord.start_sec, options.tempo_bpm, options.ppq);
        let end = seconds_to_ticks(chord.end_sec(), options.tempo_bpm, options.ppq);
        let velocity = chord_velocity(chord.confidence);
        for &interval in chord.quality.intervals() {
            let pitch = (base + root + interval as i32).clamp(0, 127) as u8;
            push_note(&mut messages, start, end, pitch, velocity);
        }
    }
    messages
}

fn melody_messages(notes: &[NoteEvent], options: &MidiExportOptions) -> Vec<NoteMessage> {
    let mut messages = Vec::new();
    for note in notes {
        let start = seconds_to_ticks(note.start_sec, options.tempo_bpm, options.ppq);
        let end = seconds_to_ticks(note.end_sec(), options.tempo_bpm, options.ppq);
        push_note(
            &mut messages,
            start,
            end,
            note.pitch_midi.min(127),
            melody_velocity(note),
        );
    }
    messages
}

fn write_delta(track: &mut Vec<u8>, delta: u64) -> Result<(), AnalysisError> {
    let delta = u32::try_from(delta).map_err(|_| {
        AnalysisError::EncodingError(format!("Delta time {} does not fit in 32 bits", delta))
    })?;
    write_vlq(track, delta)
}

fn end_of_track(track: &mut Vec<u8>) {
    track.extend_from_slice(&[0x00, META, META_END_OF_TRACK, 0x00]);
}

fn note_track(mut messages: Vec<NoteMessage>, channel: u8) -> Result<Vec<u8>, AnalysisError> {
    // Ties at one tick: note-off first, then by pitch
    messages.sort_by_key(|m| (m.tick, m.on, m.pitch));

    let mut track = Vec::with_capacity(messages.len() * 4 + 4);
    let mut last_tick = 0u64;
    for message in &messages {
        write_delta(&mut track, message.tick - last_tick)?;
        last_tick = message.tick;
        let status = if message.on { NOTE_ON } else { NOTE_OFF };
        track.push(status | (channel & 0x0F));
        track.push(message.pitch & 0x7F);
        track.push(message.velocity & 0x7F);
    }
    end_of_track(&mut track);
    Ok(track)
}

fn tempo_track(tempo_bpm: f32) -> Result<Vec<u8>, AnalysisError> {
    let micros = (60_000_000.0f64 / tempo_bpm as f64).round();
    if !(1.0..=0xFF_FFFF as f64).contains(&micros) {
        return Err(AnalysisError::EncodingError(format!(
            "Tempo {} BPM gives {} us per quarter, outside the 24-bit range",
            tempo_bpm, micros
        )));
    }
    let micros = micros as u32;

    let mut track = vec![0x00, META, META_TEMPO, 0x03];
    track.extend_from_slice(&micros.to_be_bytes()[1..]);
    end_of_track(&mut track);
    Ok(track)
}

fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], body: &[u8]) -> Result<(), AnalysisError> {
    let len = u32::try_from(body.len()).map_err(|_| {
        AnalysisError::EncodingError(format!("Chunk of {} bytes is too large", body.len()))
    })?;
    out.extend_from_slice(tag);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(body);
    Ok(())
}

/// Encode melody notes and chords as a Type-1 Standard MIDI File
///
/// Tracks, in order: tempo; chords (if `include_chords` and there are
/// chords); melody (if `include_melody` and there are notes). Chords without
/// a root are skipped.
///
/// Every note-off lands at least one tick after its note-on. An event shorter
/// than half a tick would otherwise round to a zero-length note, and sorting
/// note-offs first at a shared tick would emit the release before the strike
/// and leave the note hanging. Such events therefore encode as one-tick notes
/// rather than as a note-on and note-off on the same tick.
///
/// # Arguments
///
/// * `melody` - Melody notes
/// * `chords` - Chord events
/// * `options` - Export options
///
/// # Returns
///
/// The complete file as bytes, starting with `MThd`.
///
/// # Errors
///
/// - `InvalidInput` if the options fail validation
/// - `EncodingError` if a delta time or the tempo cannot be represented
///
/// # Example
///
/// ```
/// use tonescribe::{encode_midi, MidiExportOptions};
///
/// let bytes = encode_midi(&[], &[], &MidiExportOptions::default())?;
/// assert_eq!(&bytes[0..4], b"MThd");
/// # Ok::<(), tonescribe::AnalysisError>(())
/// ```
pub fn encode_midi(
    melody: &[NoteEvent],
    chords: &[ChordEvent],
    options: &MidiExportOptions,
) -> Result<Vec<u8>, AnalysisError> {
    options.validate()?;

    let mut tracks = vec![tempo_track(options.tempo_bpm)?];
    if options.include_chords && !chords.is_empty() {
        tracks.push(note_track(
            chord_messages(chords, options),
            options.chord_channel,
        )?);
    }
    if options.include_melody && !melody.is_empty() {
        tracks.push(note_track(
            melody_messages(melody, options),
            options.melody_channel,
        )?);
    }

    let mut header = Vec::with_capacity(6);
    header.extend_from_slice(&1u16.to_be_bytes()); // format 1
    header.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    header.extend_from_slice(&options.ppq.to_be_bytes());

    let mut out = Vec::with_capacity(14 + tracks.iter().map(|t| t.len() + 8).sum::<usize>());
    write_chunk(&mut out, b"MThd", &header)?;
    for track in &tracks {
        write_chunk(&mut out, b"MTrk", track)?;
    }

    log::debug!(
        "Encoded MIDI: {} tracks, {} melody notes, {} chords, {} bytes",
        tracks.len(),
        melody.len(),
        chords.len(),
        out.len()
    );

    Ok(out)
}
