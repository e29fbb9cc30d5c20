//! Duration probing with Symphonia

use std::fs::File;
use std::path::Path;

use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

/// Probe `path` and return the default track's length in milliseconds
///
/// Uses the declared frame count when the container has one, otherwise walks
/// the packets of the default track.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not a supported
/// container, or has no audio track
pub fn probe_duration_ms(path: &Path) -> Result<i64, SymphoniaError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SymphoniaError::Unsupported("no audio track"))?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let time_base = match (params.time_base, params.sample_rate) {
        (Some(time_base), _) => time_base,
        (None, Some(sample_rate)) => TimeBase::new(1, sample_rate),
        (None, None) => return Err(SymphoniaError::Unsupported("no time base")),
    };

    let frames = match params.n_frames {
        Some(n_frames) => n_frames,
        None => {
            // No declared length: the end of the last packet is the length
            let mut end = 0;
            loop {
                match format.next_packet() {
                    Ok(packet) if packet.track_id() == track_id => {
                        end = end.max(packet.ts() + packet.dur());
                    }
                    Ok(_) => {}
                    Err(SymphoniaError::IoError(e))
                        if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                    {
                        break
                    }
                    Err(e) => return Err(e),
                }
            }
            end
        }
    };

    Ok(to_millis(time_base, frames))
}

fn to_millis(time_base: TimeBase, frames: u64) -> i64 {
    let time = time_base.calc_time(frames);
    (time.seconds * 1000) as i64 + (time.frac * 1000.0) as i64
}
