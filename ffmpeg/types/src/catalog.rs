/*!
    Static catalog types: registered formats and codec capabilities.
*/

use std::collections::BTreeMap;
use std::fmt;

use crate::Rational;

/**
    Which side of a codec to look up.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CodecKind {
    #[default]
    Decoder,
    Encoder,
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decoder => f.write_str("decoder"),
            Self::Encoder => f.write_str("encoder"),
        }
    }
}

/**
    Container formats registered with the native library.

    Both maps are keyed by the short format name and hold the long,
    human-readable name. Keys are sorted, so two catalogs built from the
    same library compare equal.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatCatalog {
    /// Output formats (muxers).
    pub encoding: BTreeMap<String, String>,
    /// Input formats (demuxers).
    pub decoding: BTreeMap<String, String>,
}

impl FormatCatalog {
    /**
        Returns true if a muxer with this short name is registered.
    */
    pub fn can_encode(&self, name: &str) -> bool {
        self.encoding.contains_key(name)
    }

    /**
        Returns true if a demuxer with this short name is registered.
    */
    pub fn can_decode(&self, name: &str) -> bool {
        self.decoding.contains_key(name)
    }
}

/**
    Capabilities of a single codec, as reported by the native library.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecDescriptor {
    /// Whether this describes the decoder or encoder side.
    pub kind: CodecKind,
    /// Short codec name (e.g. `pcm_s16le`).
    pub name: String,
    /// Long, human-readable codec name.
    pub long_name: String,
    /// Supported frame rates, empty when the codec accepts any.
    pub frame_rates: Vec<Rational>,
    /// Supported pixel format names, empty when unrestricted or not video.
    pub pixel_formats: Vec<String>,
    /// Thread count; lookups never configure one.
    pub threads: Option<u32>,
}

impl CodecDescriptor {
    /**
        Supported frame rates rendered as `num/den` strings.
    */
    pub fn frame_rate_strings(&self) -> Vec<String> {
        self.frame_rates.iter().map(|r| r.to_string()).collect()
    }

    pub fn is_decoder(&self) -> bool {
        self.kind == CodecKind::Decoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> CodecDescriptor {
        CodecDescriptor {
            kind: CodecKind::Encoder,
            name: "mpeg2video".into(),
            long_name: "MPEG-2 video".into(),
            frame_rates: vec![Rational::new(24000, 1001), Rational::new(25, 1)],
            pixel_formats: vec!["yuv420p".into(), "yuv422p".into()],
            threads: None,
        }
    }

    #[test]
    fn frame_rate_strings_render_fractions() {
        assert_eq!(descriptor().frame_rate_strings(), ["24000/1001", "25/1"]);
    }

    #[test]
    fn codec_kind_display() {
        assert_eq!(CodecKind::Decoder.to_string(), "decoder");
        assert_eq!(CodecKind::Encoder.to_string(), "encoder");
        assert_eq!(CodecKind::default(), CodecKind::Decoder);
        assert!(!descriptor().is_decoder());
    }

    #[test]
    fn format_catalog_lookup() {
        let mut catalog = FormatCatalog::default();
        catalog
            .encoding
            .insert("wav".into(), "WAV / WAVE (Waveform Audio)".into());
        catalog
            .decoding
            .insert("matroska,webm".into(), "Matroska / WebM".into());

        assert!(catalog.can_encode("wav"));
        assert!(!catalog.can_decode("wav"));
        assert!(catalog.can_decode("matroska,webm"));
    }
}
