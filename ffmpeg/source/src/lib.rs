/*!
    Media source and demuxing for the ffmpeg crate ecosystem.

    This crate handles the input side of the media pipeline. It opens media by
    name, reports container and stream information, and produces encoded
    packets that downstream crates can decode. It also answers static catalog
    questions about the linked FFmpeg build: which container formats exist and
    what a named codec supports.

    # Example

    ```ignore
    use ffmpeg_source::Media;

    let mut media = Media::open("song.mp3")?;
    let info = media.info();
    let audio = info.first_audio().expect("no audio");

    for packet in &mut media {
        let packet = packet?;
        if packet.stream_index == audio.index {
            // hand to ffmpeg-decode
        }
    }
    ```
*/

mod catalog;
mod codec_config;
mod convert;
mod error;
mod media;
mod probe;

#[cfg(any(test, feature = "test-fixtures"))]
#[doc(hidden)]
pub mod fixtures;

pub use catalog::{codec_info, formats};
pub use codec_config::CodecConfig;
pub use error::error_string;
pub use media::{LogLevel, Media, SourceConfig};
pub use probe::probe;

pub use ffmpeg_types::{
    AudioStreamInfo, CodecDescriptor, CodecKind, Error, FormatCatalog, MediaInfo, MediaKind,
    Metadata, OtherStreamInfo, Packet, ParseError, Result, StreamInfo, VideoStreamInfo,
};
