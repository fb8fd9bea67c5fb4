/*!
    Encoded packet type.
*/

use crate::{MediaDuration, Pts, Rational};

/**
    An encoded media packet.

    Contains compressed data from a single stream, with timing information.
    `stream_index` is the index of the stream in the container, and matches
    the position of that stream in [`MediaInfo::streams`](crate::MediaInfo).
*/
#[derive(Clone, Debug)]
pub struct Packet {
    /// Compressed data.
    pub data: Vec<u8>,
    /// Index of the stream this packet belongs to.
    pub stream_index: usize,
    /// Presentation timestamp (when to play).
    pub pts: Option<Pts>,
    /// Decode timestamp.
    pub dts: Option<Pts>,
    /// Duration of this packet's content.
    pub duration: MediaDuration,
    /// Time base for interpreting timestamps.
    pub time_base: Rational,
    /// Whether this is a keyframe (can be decoded independently).
    pub is_keyframe: bool,
}

impl Packet {
    /**
        Returns the presentation time as a Duration, if PTS is set.
    */
    pub fn presentation_time(&self) -> Option<std::time::Duration> {
        self.pts.map(|pts| pts.to_duration(self.time_base))
    }

    /**
        Returns true if this packet carries no data (a drain marker).
    */
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

static_assertions::assert_impl_all!(Packet: Send, Sync);
