//! Binary encode/decode for the recording format.

use std::io::{Read, Write};

use doccast_core::{DeltaSet, EventLog, Recording, Scroll, Step, ViewportPosition};

use crate::error::CodecError;
use crate::{FORMAT_VERSION, MAGIC};

// ── Primitive writers ───────────────────────────────────────────

fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), CodecError> {
    w.write_all(&[v])?;
    Ok(())
}

fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), CodecError> {
    write_u32_le(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn write_length_prefixed_bytes(w: &mut dyn Write, b: &[u8]) -> Result<(), CodecError> {
    write_u32_le(w, b.len() as u32)?;
    w.write_all(b)?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

fn read_u8(r: &mut dyn Read) -> Result<u8, CodecError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32_le(r: &mut dyn Read) -> Result<u32, CodecError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f64_le(r: &mut dyn Read) -> Result<f64, CodecError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn read_length_prefixed_str(r: &mut dyn Read) -> Result<String, CodecError> {
    let bytes = read_length_prefixed_bytes(r)?;
    String::from_utf8(bytes).map_err(|e| CodecError::Malformed {
        detail: format!("invalid UTF-8 string: {e}"),
    })
}

fn read_length_prefixed_bytes(r: &mut dyn Read) -> Result<Vec<u8>, CodecError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

// ── Recording encode/decode ─────────────────────────────────────

/// Encode a recording to its binary form.
///
/// Byte-identical output for equal inputs is not guaranteed across
/// versions; decoding always reproduces a value-equal [`Recording`] with
/// timestamps preserved bit-exactly.
pub fn encode_recording(w: &mut dyn Write, recording: &Recording) -> Result<(), CodecError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;

    match &recording.audio_url {
        Some(url) => {
            write_u8(w, 1)?;
            write_length_prefixed_str(w, url)?;
        }
        None => write_u8(w, 0)?,
    }

    write_length_prefixed_bytes(w, &recording.log.initial_snapshot)?;

    write_u32_le(w, recording.log.steps.len() as u32)?;
    for step in &recording.log.steps {
        write_f64_le(w, step.at)?;
        write_u32_le(w, step.delta.len() as u32)?;
        for op in step.delta.ops() {
            write_length_prefixed_bytes(w, op)?;
        }
    }

    write_u32_le(w, recording.log.scrolls.len() as u32)?;
    for scroll in &recording.log.scrolls {
        write_f64_le(w, scroll.at)?;
        write_length_prefixed_str(w, &scroll.position.anchor_id)?;
        write_f64_le(w, scroll.position.relative_offset)?;
    }

    Ok(())
}

/// Decode a recording from its binary form.
///
/// Fails with a recoverable [`CodecError`] on truncated or corrupt data,
/// wrong magic or version, trailing bytes, or timestamp sequences that
/// violate the log invariants.
pub fn decode_recording(r: &mut dyn Read) -> Result<Recording, CodecError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(CodecError::InvalidMagic);
    }

    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion { found: version });
    }

    let audio_url = match read_u8(r)? {
        0 => None,
        1 => Some(read_length_prefixed_str(r)?),
        flag => {
            return Err(CodecError::Malformed {
                detail: format!("invalid audio_url presence flag: {flag}"),
            })
        }
    };

    let initial_snapshot = read_length_prefixed_bytes(r)?;
    let mut log = EventLog::new(initial_snapshot);

    let step_count = read_u32_le(r)? as usize;
    log.steps.reserve(step_count.min(1 << 16));
    for _ in 0..step_count {
        let at = read_f64_le(r)?;
        let op_count = read_u32_le(r)? as usize;
        let mut delta = DeltaSet::new();
        for _ in 0..op_count {
            delta.push(read_length_prefixed_bytes(r)?);
        }
        log.steps.push(Step { at, delta });
    }

    let scroll_count = read_u32_le(r)? as usize;
    log.scrolls.reserve(scroll_count.min(1 << 16));
    for _ in 0..scroll_count {
        let at = read_f64_le(r)?;
        let anchor_id = read_length_prefixed_str(r)?;
        let relative_offset = read_f64_le(r)?;
        log.scrolls.push(Scroll {
            at,
            position: ViewportPosition {
                anchor_id,
                relative_offset,
            },
        });
    }

    // Strict decode: a well-formed blob is consumed exactly.
    let mut probe = [0u8; 1];
    match r.read(&mut probe) {
        Ok(0) => {}
        Ok(_) => {
            return Err(CodecError::Malformed {
                detail: "trailing bytes after recording".into(),
            })
        }
        Err(e) => return Err(CodecError::Io(e)),
    }

    log.validate()?;
    Ok(Recording { log, audio_url })
}
