/*!
    Shared types for the ffmpeg crate ecosystem.

    This crate defines the vocabulary of the ecosystem: the types that cross crate
    boundaries. It has no dependency on FFmpeg, making it lightweight and enabling
    consumers to depend on it without pulling in FFmpeg bindings.

    # Core Types

    - [`Rational`] - Rational numbers for time bases and frame rates
    - [`Pts`] and [`MediaDuration`] - Timestamps in time_base units
    - [`Packet`] - Encoded packet data tagged with its stream index
    - [`AudioFrame`] - Decoded, interleaved audio samples

    # Stream Information

    - [`StreamInfo`] - Tagged per-stream snapshot (audio, video, other)
    - [`MediaInfo`] - Container name, duration, metadata and streams
    - [`Metadata`] - Ordered container tags

    # Catalog

    - [`FormatCatalog`] - Registered muxers and demuxers
    - [`CodecDescriptor`] and [`CodecKind`] - Codec capability lookup results

    # Error Handling

    - [`Error`] and [`Result`] - Common error types
*/

mod catalog;
mod error;
mod format;
mod frame;
mod metadata;
mod packet;
mod rational;
mod stream;
mod timestamp;

pub use catalog::{CodecDescriptor, CodecKind, FormatCatalog};
pub use error::{Error, ParseError, Result};
pub use format::SampleFormat;
pub use frame::AudioFrame;
pub use metadata::Metadata;
pub use packet::Packet;
pub use rational::Rational;
pub use stream::{
    AudioStreamInfo, MediaInfo, MediaKind, OtherStreamInfo, StreamInfo, VideoStreamInfo,
};
pub use timestamp::{MediaDuration, Pts};
