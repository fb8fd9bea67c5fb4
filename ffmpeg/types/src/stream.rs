/*!
    Stream information types.
*/

use std::fmt;
use std::time::Duration;

use crate::{Metadata, Rational, SampleFormat};

/**
    Native media type of a stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
    Subtitle,
    Data,
    Attachment,
    Unknown,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Subtitle => "subtitle",
            Self::Data => "data",
            Self::Attachment => "attachment",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/**
    Information about an audio stream.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct AudioStreamInfo {
    /// Index of the stream in the container.
    pub index: usize,
    /// Decoder name (e.g. `mp3float`, `pcm_s16le`).
    pub codec: String,
    /// Number of channels.
    pub channels: u16,
    /// Bytes per sample per channel, as the decoder will produce them.
    pub bytes_per_sample: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Decoded sample format, if it is one we understand.
    pub sample_format: Option<SampleFormat>,
    /// Time base for timestamps.
    pub time_base: Rational,
    /// Total duration (may be unavailable for some streams).
    pub duration: Option<Duration>,
    /// Bitrate in bits per second (if known).
    pub bit_rate: Option<u64>,
}

impl AudioStreamInfo {
    /**
        Number of bytes in one second of decoded, interleaved audio.
    */
    pub fn bytes_per_second(&self) -> u64 {
        self.channels as u64 * self.bytes_per_sample as u64 * self.sample_rate as u64
    }
}

/**
    Information about a video stream.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct VideoStreamInfo {
    /// Index of the stream in the container.
    pub index: usize,
    /// Decoder name (e.g. `h264`).
    pub codec: String,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate (may be approximate or unavailable).
    pub frame_rate: Option<Rational>,
    /// Time base for timestamps.
    pub time_base: Rational,
    /// Total duration (may be unavailable for some streams).
    pub duration: Option<Duration>,
}

impl VideoStreamInfo {
    /**
        Returns the aspect ratio as a float.
    */
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/**
    Information about a stream that is neither audio nor video.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct OtherStreamInfo {
    pub index: usize,
    pub codec: String,
    pub kind: MediaKind,
}

/**
    Snapshot of a single stream, tagged by media type.
*/
#[derive(Clone, Debug, PartialEq)]
pub enum StreamInfo {
    Audio(AudioStreamInfo),
    Video(VideoStreamInfo),
    Other(OtherStreamInfo),
}

impl StreamInfo {
    pub fn index(&self) -> usize {
        match self {
            Self::Audio(a) => a.index,
            Self::Video(v) => v.index,
            Self::Other(o) => o.index,
        }
    }

    pub fn codec(&self) -> &str {
        match self {
            Self::Audio(a) => &a.codec,
            Self::Video(v) => &v.codec,
            Self::Other(o) => &o.codec,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Audio(_) => MediaKind::Audio,
            Self::Video(_) => MediaKind::Video,
            Self::Other(o) => o.kind,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioStreamInfo> {
        match self {
            Self::Audio(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_video(&self) -> Option<&VideoStreamInfo> {
        match self {
            Self::Video(v) => Some(v),
            _ => None,
        }
    }
}

/**
    Combined information about an opened media resource.
*/
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaInfo {
    /// Name the resource was opened with.
    pub name: String,
    /// Total duration of the media (may be unavailable).
    pub duration: Option<Duration>,
    /// Container-level tags.
    pub metadata: Metadata,
    /// One entry per stream, ordered by stream index.
    pub streams: Vec<StreamInfo>,
}

impl MediaInfo {
    /**
        Duration in seconds, if known.
    */
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    pub fn audio_streams(&self) -> impl Iterator<Item = &AudioStreamInfo> {
        self.streams.iter().filter_map(StreamInfo::as_audio)
    }

    pub fn video_streams(&self) -> impl Iterator<Item = &VideoStreamInfo> {
        self.streams.iter().filter_map(StreamInfo::as_video)
    }

    /**
        The first audio stream in container order.
    */
    pub fn first_audio(&self) -> Option<&AudioStreamInfo> {
        self.audio_streams().next()
    }

    pub fn has_audio(&self) -> bool {
        self.first_audio().is_some()
    }

    pub fn has_video(&self) -> bool {
        self.video_streams().next().is_some()
    }
}
