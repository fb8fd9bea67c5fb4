/*!
    Conversion utilities between ffmpeg-next types and ffmpeg-types.
*/

use std::ffi::CStr;
use std::os::raw::c_char;
use std::time::Duration;

use ffmpeg_next::{ffi, media::Type};

use ffmpeg_types::{MediaDuration, MediaKind, Pts, Rational, SampleFormat};

/**
    Convert ffmpeg_next::Rational to our Rational.

    Returns `None` for the native "unknown" encodings (zero denominator).
*/
pub fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Option<Rational> {
    Rational::checked(r.numerator(), r.denominator())
}

/**
    Time base of a stream, falling back to microseconds when unset.
*/
pub fn time_base_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    rational_from_ffmpeg(r).unwrap_or(Rational::new(1, ffi::AV_TIME_BASE))
}

/**
    Frame rate of a stream; `0/x` and `x/0` both mean unknown.
*/
pub fn frame_rate_from_ffmpeg(r: ffmpeg_next::Rational) -> Option<Rational> {
    rational_from_ffmpeg(r).filter(|rate| !rate.is_zero())
}

/**
    Convert ffmpeg_next sample format to our SampleFormat.
*/
pub fn sample_format_from_ffmpeg(format: ffmpeg_next::format::Sample) -> Option<SampleFormat> {
    use ffmpeg_next::format::Sample;

    match format {
        Sample::U8(_) => Some(SampleFormat::U8),
        Sample::I16(_) => Some(SampleFormat::S16),
        Sample::I32(_) => Some(SampleFormat::S32),
        Sample::F32(_) => Some(SampleFormat::F32),
        Sample::F64(_) => Some(SampleFormat::F64),
        _ => None,
    }
}

pub fn media_kind_from_ffmpeg(medium: Type) -> MediaKind {
    match medium {
        Type::Audio => MediaKind::Audio,
        Type::Video => MediaKind::Video,
        Type::Subtitle => MediaKind::Subtitle,
        Type::Data => MediaKind::Data,
        Type::Attachment => MediaKind::Attachment,
        Type::Unknown => MediaKind::Unknown,
    }
}

/**
    Container duration (in `AV_TIME_BASE` units) as a Duration.

    Unknown (`AV_NOPTS_VALUE`) and non-positive values yield `None`.
*/
pub fn duration_from_av_time_base(duration: i64) -> Option<Duration> {
    if duration <= 0 {
        return None;
    }
    Some(Duration::from_secs_f64(
        duration as f64 / ffi::AV_TIME_BASE as f64,
    ))
}

/**
    Stream duration in stream time_base units as a Duration.
*/
pub fn stream_duration_from_ffmpeg(duration: i64, time_base: Rational) -> Option<Duration> {
    if duration <= 0 {
        return None;
    }
    Some(MediaDuration(duration).to_duration(time_base))
}

/**
    Create a Pts from an optional i64 timestamp.
*/
pub fn pts_from_ffmpeg(pts: Option<i64>) -> Option<Pts> {
    pts.map(Pts)
}

/**
    Create a MediaDuration from an i64 duration.
*/
pub fn duration_from_ffmpeg(duration: i64) -> MediaDuration {
    MediaDuration(duration)
}

/**
    Copy a possibly-null C string owned by FFmpeg.
*/
pub fn string_from_ptr(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: non-null pointers handed out by FFmpeg registries point at
    // static, NUL-terminated strings.
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rationals_are_none() {
        assert_eq!(rational_from_ffmpeg(ffmpeg_next::Rational::new(0, 0)), None);
        assert_eq!(
            frame_rate_from_ffmpeg(ffmpeg_next::Rational::new(0, 1)),
            None
        );
        assert_eq!(
            frame_rate_from_ffmpeg(ffmpeg_next::Rational::new(25, 1)),
            Some(Rational::new(25, 1))
        );
    }

    #[test]
    fn time_base_falls_back_to_microseconds() {
        assert_eq!(
            time_base_from_ffmpeg(ffmpeg_next::Rational::new(0, 0)),
            Rational::new(1, 1_000_000)
        );
        assert_eq!(
            time_base_from_ffmpeg(ffmpeg_next::Rational::new(1, 44100)),
            Rational::new(1, 44100)
        );
    }

    #[test]
    fn container_duration_divides_by_time_base() {
        assert_eq!(
            duration_from_av_time_base(2_500_000),
            Some(Duration::from_millis(2500))
        );
        assert_eq!(duration_from_av_time_base(ffi::AV_NOPTS_VALUE), None);
        assert_eq!(duration_from_av_time_base(0), None);
    }

    #[test]
    fn sample_formats_ignore_layout() {
        use ffmpeg_next::format::Sample;
        use ffmpeg_next::util::format::sample::Type as SampleType;

        assert_eq!(
            sample_format_from_ffmpeg(Sample::F32(SampleType::Planar)),
            Some(SampleFormat::F32)
        );
        assert_eq!(
            sample_format_from_ffmpeg(Sample::I16(SampleType::Packed)),
            Some(SampleFormat::S16)
        );
        assert_eq!(sample_format_from_ffmpeg(Sample::None), None);
    }

    #[test]
    fn null_string_is_empty() {
        assert_eq!(string_from_ptr(std::ptr::null()), "");
    }
}
