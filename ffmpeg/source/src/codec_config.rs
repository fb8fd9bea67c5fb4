/*!
    Opaque codec configuration for passing to decoders.
*/

use ffmpeg_next::codec;

use ffmpeg_types::{MediaKind, Rational};

use crate::convert::media_kind_from_ffmpeg;

/**
    Opaque codec configuration extracted from a source stream.

    This holds the codec parameters needed to create a decoder, together with
    the stream they came from. It hides ffmpeg-next types from the public API.

    Pass this to `ffmpeg-decode` to create a decoder for this stream.
*/
pub struct CodecConfig {
    parameters: codec::Parameters,
    stream_index: usize,
    time_base: Rational,
}

impl CodecConfig {
    pub(crate) fn new(
        parameters: codec::Parameters,
        stream_index: usize,
        time_base: Rational,
    ) -> Self {
        Self {
            parameters,
            stream_index,
            time_base,
        }
    }

    /**
        Index of the stream this configuration describes.
    */
    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    /**
        Time base of the stream's packets.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn kind(&self) -> MediaKind {
        media_kind_from_ffmpeg(self.parameters.medium())
    }

    /**
        Consume the configuration, returning the raw parameters.

        Used by `ffmpeg-decode` to open a codec context.
    */
    pub fn into_parameters(self) -> codec::Parameters {
        self.parameters
    }
}

impl Clone for CodecConfig {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            stream_index: self.stream_index,
            time_base: self.time_base,
        }
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("codec_id", &self.parameters.id())
            .field("stream_index", &self.stream_index)
            .field("time_base", &self.time_base)
            .finish_non_exhaustive()
    }
}
