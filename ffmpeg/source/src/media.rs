/*!
    Media handle implementation.
*/

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ffmpeg_next::format::context::Input as InputContext;
use ffmpeg_next::util::log::Level;
use tracing::{debug, trace};

use ffmpeg_types::{Error, MediaInfo, Metadata, Packet, ParseError, Result, StreamInfo};

use crate::codec_config::CodecConfig;
use crate::convert::{duration_from_ffmpeg, pts_from_ffmpeg, time_base_from_ffmpeg};
use crate::error::{codec_error, open_error};
use crate::probe::{extract_media_info, extract_metadata, extract_stream_info};

/**
    Verbosity of FFmpeg's own log output.

    This is independent of the `tracing` output of these crates.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[default]
    Quiet,
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub const fn to_name(self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    fn to_ffmpeg(self) -> Level {
        match self {
            Self::Quiet => Level::Quiet,
            Self::Error => Level::Error,
            Self::Warning => Level::Warning,
            Self::Info => Level::Info,
            Self::Debug => Level::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

impl FromStr for LogLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(ParseError {
                kind: "log level",
                value: s.to_owned(),
            }),
        }
    }
}

/**
    Configuration for opening a media resource.
*/
#[derive(Clone, Debug, Default)]
pub struct SourceConfig {
    /// FFmpeg log verbosity, applied process-wide on open.
    pub log_level: LogLevel,
}

/**
    An opened media resource.

    Created by [`Media::open`]. Reports container and stream information and
    produces the encoded packets of every stream, in file order. The native
    input context is released when the handle is dropped.
*/
pub struct Media {
    /// The FFmpeg input context.
    input: InputContext,
    /// Resource name as given to `open`.
    name: String,
}

impl Media {
    /**
        Open a media file or URL with the default configuration.

        # Example

        ```ignore
        let media = Media::open("song.ogg")?;
        println!("Duration: {:?}", media.info().duration);
        ```
    */
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, SourceConfig::default())
    }

    /**
        Open a media file or URL with the given configuration.
    */
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: SourceConfig) -> Result<Self> {
        ffmpeg_next::init().map_err(codec_error)?;
        ffmpeg_next::util::log::set_level(config.log_level.to_ffmpeg());

        let path = path.as_ref();
        let name = path.display().to_string();

        let input = ffmpeg_next::format::input(&path).map_err(|e| open_error(&name, e))?;

        debug!(media = %name, streams = input.nb_streams(), "opened media");

        Ok(Self { input, name })
    }

    /**
        Name of the resource, as given to `open`.
    */
    pub fn name(&self) -> &str {
        &self.name
    }

    /**
        Snapshot the container and stream information.
    */
    pub fn info(&self) -> MediaInfo {
        extract_media_info(&self.input, &self.name)
    }

    /**
        Container-level metadata tags, in native order.
    */
    pub fn metadata(&self) -> Metadata {
        extract_metadata(&self.input)
    }

    /**
        Number of streams in the container.
    */
    pub fn stream_count(&self) -> usize {
        self.input.nb_streams() as usize
    }

    /**
        Information about a single stream.
    */
    pub fn stream_info(&self, index: usize) -> Result<StreamInfo> {
        self.input
            .stream(index)
            .map(|stream| extract_stream_info(&stream))
            .ok_or(Error::StreamNotFound { index })
    }

    /**
        Codec configuration for a stream.

        Pass this to `ffmpeg-decode` to create a decoder for the stream.
    */
    pub fn codec_config(&self, index: usize) -> Result<CodecConfig> {
        let stream = self
            .input
            .stream(index)
            .ok_or(Error::StreamNotFound { index })?;
        Ok(CodecConfig::new(
            stream.parameters(),
            index,
            time_base_from_ffmpeg(stream.time_base()),
        ))
    }

    /**
        Read the next packet from the resource.

        Returns `Ok(Some(packet))` for each packet, `Ok(None)` at end of stream,
        or an error if the demuxer fails.

        Packets are returned in file order, interleaved between streams.
        Use `packet.stream_index` to route them.
    */
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        let mut ffmpeg_packet = ffmpeg_next::Packet::empty();
        match ffmpeg_packet.read(&mut self.input) {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Eof) => return Ok(None),
            Err(e) => return Err(codec_error(e)),
        }

        // Streams can appear after open (headerless containers), so the
        // time base is looked up on the live context.
        let stream_index = ffmpeg_packet.stream();
        let time_base = self
            .input
            .stream(stream_index)
            .map(|stream| time_base_from_ffmpeg(stream.time_base()))
            .ok_or(Error::StreamNotFound {
                index: stream_index,
            })?;

        let packet = Packet {
            data: ffmpeg_packet.data().map(|d| d.to_vec()).unwrap_or_default(),
            stream_index,
            pts: pts_from_ffmpeg(ffmpeg_packet.pts()),
            dts: pts_from_ffmpeg(ffmpeg_packet.dts()),
            duration: duration_from_ffmpeg(ffmpeg_packet.duration()),
            time_base,
            is_keyframe: ffmpeg_packet.is_key(),
        };

        trace!(stream_index, size = packet.data.len(), "read packet");
        Ok(Some(packet))
    }
}

impl fmt::Debug for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Media")
            .field("name", &self.name)
            .field("streams", &self.stream_count())
            .finish_non_exhaustive()
    }
}

/**
    Iterator adapter for Media that yields packets.
*/
impl Iterator for Media {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use ffmpeg_types::{MediaKind, Rational};

    #[test]
    fn log_level_names() {
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::default().to_string(), "quiet");
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown log level 'loud'");
    }

    #[test]
    fn open_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ogg");
        let err = Media::open(&path).unwrap_err();
        assert!(matches!(err, Error::Open { .. }), "got {err:?}");
        assert!(err.to_string().contains("missing.ogg"));
    }

    #[test]
    fn info_keeps_name_and_audio_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_pcm_wav(dir.path(), "mono.wav", 1, 22050, 1);

        let media = Media::open(&path).unwrap();
        let info = media.info();
        assert_eq!(info.name, path.display().to_string());
        assert_eq!(media.name(), info.name);
        assert_eq!(media.stream_count(), info.streams.len());

        let audio = info.streams[0].as_audio().expect("audio variant");
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.bytes_per_sample, 2);
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.codec, "pcm_s16le");
    }

    #[test]
    fn stream_lookup_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_pcm_wav(dir.path(), "tone.wav", 2, 8000, 1);

        let media = Media::open(&path).unwrap();
        assert!(media.stream_info(0).is_ok());
        assert!(matches!(
            media.stream_info(7),
            Err(Error::StreamNotFound { index: 7 })
        ));
        assert!(matches!(
            media.codec_config(3),
            Err(Error::StreamNotFound { index: 3 })
        ));

        let config = media.codec_config(0).unwrap();
        assert_eq!(config.stream_index(), 0);
        assert_eq!(config.kind(), MediaKind::Audio);
        assert_eq!(config.time_base(), Rational::new(1, 8000));
    }

    #[test]
    fn packets_cover_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_pcm_wav(dir.path(), "tone.wav", 2, 8000, 1);

        let media = Media::open(&path).unwrap();
        let count = media.stream_count();

        let mut total = 0;
        for packet in media {
            let packet = packet.unwrap();
            assert!(packet.stream_index < count);
            total += packet.data.len();
        }
        assert_eq!(total, 8000 * 2 * 2);
    }

    #[test]
    fn subtitle_file_has_no_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_srt(dir.path(), "captions.srt");

        let media = Media::open(&path).unwrap();
        let info = media.info();
        assert!(info.first_audio().is_none());
        assert_eq!(media.stream_info(0).unwrap().kind(), MediaKind::Subtitle);
    }

    #[test]
    fn audio_after_subtitle_keeps_its_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_subtitle_then_audio(dir.path(), "mixed.mkv");

        let media = Media::open(&path).unwrap();
        let info = media.info();
        assert_eq!(media.stream_count(), 2);
        for (i, stream) in info.streams.iter().enumerate() {
            assert_eq!(stream.index(), i);
        }
        assert_eq!(info.streams[0].kind(), MediaKind::Subtitle);
        assert_eq!(info.first_audio().map(|a| a.index), Some(1));
    }

    #[test]
    fn packets_carry_their_stream_time_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_subtitle_then_audio(dir.path(), "mixed.mkv");

        let mut media = Media::open(&path).unwrap();
        let time_bases: Vec<Rational> = (0..media.stream_count())
            .map(|i| media.codec_config(i).unwrap().time_base())
            .collect();

        let mut audio_bytes = 0;
        while let Some(packet) = media.next_packet().unwrap() {
            assert_eq!(packet.time_base, time_bases[packet.stream_index]);
            if packet.stream_index == 1 {
                audio_bytes += packet.data.len();
            }
        }
        assert_eq!(audio_bytes, fixtures::MIXED_AUDIO_BYTES);
    }
}
