/*!
    Decoder configuration.
*/

/**
    Configuration for an audio decoder.
*/
#[derive(Clone, Debug, Default)]
pub struct AudioDecoderConfig {
    /// Codec thread count; `None` leaves the codec default.
    pub thread_count: Option<usize>,
}

impl AudioDecoderConfig {
    pub fn with_threads(mut self, count: usize) -> Self {
        self.thread_count = Some(count);
        self
    }
}
