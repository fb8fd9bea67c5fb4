/*!
    Static queries about the linked FFmpeg build.
*/

use std::collections::BTreeMap;
use std::os::raw::c_void;
use std::ptr;

use ffmpeg_next::{Codec, ffi};
use tracing::debug;

use ffmpeg_types::{CodecDescriptor, CodecKind, Error, FormatCatalog, Rational, Result};

use crate::convert::string_from_ptr;
use crate::error::codec_error;

/**
    List every registered container format.

    Muxers land in `encoding` and demuxers in `decoding`, each keyed by short
    name with the long name as value.
*/
pub fn formats() -> FormatCatalog {
    let catalog = FormatCatalog {
        encoding: muxers(),
        decoding: demuxers(),
    };
    debug!(
        muxers = catalog.encoding.len(),
        demuxers = catalog.decoding.len(),
        "listed formats"
    );
    catalog
}

fn muxers() -> BTreeMap<String, String> {
    let mut formats = BTreeMap::new();
    let mut opaque: *mut c_void = ptr::null_mut();
    loop {
        // SAFETY: av_muxer_iterate only reads and advances the opaque cursor
        // and returns pointers to static registry entries.
        let format = unsafe { ffi::av_muxer_iterate(&mut opaque) };
        if format.is_null() {
            break;
        }
        // SAFETY: non-null entries point at valid, static AVOutputFormat values.
        let (name, long_name) = unsafe { ((*format).name, (*format).long_name) };
        formats.insert(string_from_ptr(name), string_from_ptr(long_name));
    }
    formats
}

fn demuxers() -> BTreeMap<String, String> {
    let mut formats = BTreeMap::new();
    let mut opaque: *mut c_void = ptr::null_mut();
    loop {
        // SAFETY: as for muxers.
        let format = unsafe { ffi::av_demuxer_iterate(&mut opaque) };
        if format.is_null() {
            break;
        }
        // SAFETY: non-null entries point at valid, static AVInputFormat values.
        let (name, long_name) = unsafe { ((*format).name, (*format).long_name) };
        formats.insert(string_from_ptr(name), string_from_ptr(long_name));
    }
    formats
}

/**
    Describe a codec by name.

    # Example

    ```ignore
    let codec = codec_info("mpeg2video", CodecKind::Encoder)?;
    println!("{}: {:?}", codec.long_name, codec.frame_rate_strings());
    ```
*/
pub fn codec_info(name: &str, kind: CodecKind) -> Result<CodecDescriptor> {
    ffmpeg_next::init().map_err(codec_error)?;

    let codec = match kind {
        CodecKind::Decoder => ffmpeg_next::decoder::find_by_name(name),
        CodecKind::Encoder => ffmpeg_next::encoder::find_by_name(name),
    }
    .ok_or_else(|| Error::CodecNotFound {
        kind,
        name: name.to_string(),
    })?;

    Ok(CodecDescriptor {
        kind,
        name: codec.name().to_string(),
        long_name: codec.description().to_string(),
        frame_rates: supported_frame_rates(&codec),
        pixel_formats: supported_pixel_formats(&codec),
        threads: None,
    })
}

/**
    Walk the codec's frame-rate list up to the zero-numerator sentinel.
*/
fn supported_frame_rates(codec: &Codec) -> Vec<Rational> {
    let mut rates = Vec::new();
    // SAFETY: the codec pointer comes from the static registry; the list is
    // either null or terminated by a {0, 0} entry.
    unsafe {
        let mut cursor = (*codec.as_ptr()).supported_framerates;
        if cursor.is_null() {
            return rates;
        }
        while (*cursor).num != 0 {
            if let Some(rate) = Rational::checked((*cursor).num, (*cursor).den) {
                rates.push(rate);
            }
            cursor = cursor.add(1);
        }
    }
    rates
}

/**
    Walk the codec's pixel-format list up to the `none` sentinel.
*/
fn supported_pixel_formats(codec: &Codec) -> Vec<String> {
    let mut formats = Vec::new();
    // SAFETY: as above, the list is null or terminated by AV_PIX_FMT_NONE.
    unsafe {
        let mut cursor = (*codec.as_ptr()).pix_fmts;
        if cursor.is_null() {
            return formats;
        }
        while *cursor != ffi::AVPixelFormat::AV_PIX_FMT_NONE {
            formats.push(string_from_ptr(ffi::av_get_pix_fmt_name(*cursor)));
            cursor = cursor.add(1);
        }
    }
    formats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_are_stable_and_include_wav() {
        ffmpeg_next::init().unwrap();
        let first = formats();
        let second = formats();
        assert_eq!(first, second);
        assert!(first.can_encode("wav"));
        assert!(first.can_decode("wav"));
        assert!(!first.encoding["wav"].is_empty());
    }

    #[test]
    fn unknown_codec_is_not_found() {
        let err = codec_info("no-such-codec-anywhere", CodecKind::Encoder).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unable to find encoder no-such-codec-anywhere"
        );
        assert!(matches!(
            err,
            Error::CodecNotFound {
                kind: CodecKind::Encoder,
                ..
            }
        ));
    }

    #[test]
    fn pcm_decoder_has_no_video_capabilities() {
        let codec = codec_info("pcm_s16le", CodecKind::Decoder).unwrap();
        assert!(codec.is_decoder());
        assert_eq!(codec.name, "pcm_s16le");
        assert!(!codec.long_name.is_empty());
        assert!(codec.frame_rates.is_empty());
        assert!(codec.pixel_formats.is_empty());
        assert_eq!(codec.threads, None);
    }
}
