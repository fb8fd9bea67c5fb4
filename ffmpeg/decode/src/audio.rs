/*!
    Audio decoder implementation.
*/

use ffmpeg_next::{
    codec::{self, decoder::Audio as AudioDecoderFFmpeg, threading},
    ffi,
    util::frame::audio::Audio as AudioFrameFFmpeg,
};
use tracing::{debug, warn};

use ffmpeg_source::CodecConfig;
use ffmpeg_types::{AudioFrame, Error, Packet, Pts, Rational, Result, SampleFormat};

use crate::config::AudioDecoderConfig;

/**
    Audio decoder.

    Decodes the packets of one audio stream into interleaved frames. The
    codec context is released when the decoder is dropped.
*/
pub struct AudioDecoder {
    decoder: AudioDecoderFFmpeg,
    stream_index: usize,
    time_base: Rational,
}

impl AudioDecoder {
    /**
        Create a new audio decoder from a stream's codec configuration.

        Fails with a codec error when the stream is not audio or no decoder
        is available for it.
    */
    pub fn new(codec_config: CodecConfig, config: AudioDecoderConfig) -> Result<Self> {
        ffmpeg_next::init().map_err(codec_error)?;

        let stream_index = codec_config.stream_index();
        let time_base = codec_config.time_base();
        let parameters = codec_config.into_parameters();

        let mut decoder_ctx =
            codec::context::Context::from_parameters(parameters).map_err(codec_error)?;

        if let Some(count) = config.thread_count {
            decoder_ctx.set_threading(threading::Config::count(count));
        }

        let decoder = decoder_ctx.decoder().audio().map_err(codec_error)?;

        debug!(
            stream_index,
            rate = decoder.rate(),
            channels = decoder.channels(),
            "opened audio decoder"
        );

        Ok(Self {
            decoder,
            stream_index,
            time_base,
        })
    }

    /**
        Index of the stream this decoder accepts packets from.
    */
    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    /**
        Get the time base for this decoder.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Get the sample rate of the decoded audio.
    */
    pub fn sample_rate(&self) -> u32 {
        self.decoder.rate()
    }

    /**
        Get the number of channels.
    */
    pub fn channels(&self) -> u16 {
        self.decoder.channels()
    }

    /**
        Decode a packet, returning decoded frames.

        May return zero, one, or multiple frames depending on codec.
        Packets from other streams are rejected. Empty packets carry no audio
        and are skipped; use [`flush`](Self::flush) to drain at end of stream.
        A decoder error after some frames were produced keeps those frames.
    */
    pub fn decode(&mut self, packet: &Packet) -> Result<Vec<AudioFrame>> {
        if packet.stream_index != self.stream_index {
            return Err(Error::invalid_data(format!(
                "packet from stream {} sent to decoder for stream {}",
                packet.stream_index, self.stream_index
            )));
        }
        if packet.is_empty() {
            debug!(stream_index = self.stream_index, pts = ?packet.pts, "skipping empty packet");
            return Ok(Vec::new());
        }

        let ffmpeg_pkt = to_ffmpeg_packet(packet);
        let mut frames = Vec::new();

        if let Err(e) = self.decoder.send_packet(&ffmpeg_pkt) {
            if !is_again(&e) {
                return Err(codec_error(e));
            }
            // Input queue full: drain, then retry once
            if let Err(e) = self.receive_into(&mut frames) {
                return keep_decoded(self.stream_index, frames, e);
            }
            match self.decoder.send_packet(&ffmpeg_pkt) {
                Ok(()) => {}
                Err(e) if is_again(&e) => {
                    warn!(stream_index = self.stream_index, "decoder still full, packet dropped");
                    return Ok(frames);
                }
                Err(e) => return Err(codec_error(e)),
            }
        }

        match self.receive_into(&mut frames) {
            Ok(()) => Ok(frames),
            Err(e) => keep_decoded(self.stream_index, frames, e),
        }
    }

    /**
        Flush the decoder to get any remaining buffered frames.

        Call this at end of stream.
    */
    pub fn flush(&mut self) -> Result<Vec<AudioFrame>> {
        let mut frames = Vec::new();
        self.receive_into(&mut frames)?;

        match self.decoder.send_eof() {
            Ok(()) | Err(ffmpeg_next::Error::Eof) => {}
            Err(e) if is_again(&e) => {
                self.receive_into(&mut frames)?;
                match self.decoder.send_eof() {
                    Ok(()) | Err(ffmpeg_next::Error::Eof) => {}
                    Err(e) => return Err(codec_error(e)),
                }
            }
            Err(e) => return Err(codec_error(e)),
        }

        self.receive_into(&mut frames)?;
        Ok(frames)
    }

    /**
        Reset the decoder.

        Clears internal buffers so decoding can restart from a new position.
    */
    pub fn reset(&mut self) {
        self.decoder.flush();
    }

    /**
        Pull every frame the decoder has ready.

        Frames that cannot be converted are skipped.
    */
    fn receive_into(&mut self, frames: &mut Vec<AudioFrame>) -> Result<()> {
        let mut decoded = AudioFrameFFmpeg::empty();
        loop {
            match self.decoder.receive_frame(&mut decoded) {
                Ok(()) => match self.convert_frame(&decoded) {
                    Ok(frame) => frames.push(frame),
                    Err(e @ Error::UnsupportedFormat { .. }) => {
                        warn!(stream_index = self.stream_index, "skipping frame: {e}");
                    }
                    Err(e) => {
                        debug!(stream_index = self.stream_index, "skipping frame: {e}");
                    }
                },
                Err(ffmpeg_next::Error::Eof) => return Ok(()),
                Err(e) if is_again(&e) => return Ok(()),
                Err(e) => return Err(codec_error(e)),
            }
        }
    }

    /**
        Convert an FFmpeg audio frame to our AudioFrame type.
    */
    fn convert_frame(&self, frame: &AudioFrameFFmpeg) -> Result<AudioFrame> {
        let samples = frame.samples();
        let sample_rate = frame.rate();
        let channels = frame.channels();

        if samples == 0 {
            return Err(Error::invalid_data("audio frame has zero samples"));
        }

        // Check that the frame actually has data planes allocated
        if frame.planes() == 0 {
            return Err(Error::invalid_data(
                "audio frame has no data planes (linesize is 0)",
            ));
        }

        // Get format
        let ffmpeg_format = frame.format();
        let format = sample_format_from_ffmpeg(ffmpeg_format).ok_or_else(|| {
            Error::unsupported_format(format!("unsupported sample format: {:?}", ffmpeg_format))
        })?;

        let data = copy_audio_data(frame, format, samples, channels)?;

        Ok(AudioFrame {
            data,
            samples,
            sample_rate,
            channels,
            format,
            pts: frame.pts().map(Pts),
            time_base: self.time_base,
        })
    }
}

/**
    Resolve a decoder error raised while draining.

    Frames received before the error are returned; the error only surfaces
    when nothing was decoded.
*/
fn keep_decoded(
    stream_index: usize,
    frames: Vec<AudioFrame>,
    err: Error,
) -> Result<Vec<AudioFrame>> {
    if frames.is_empty() {
        return Err(err);
    }
    warn!(stream_index, kept = frames.len(), "decoder failed after producing frames: {err}");
    Ok(frames)
}

fn is_again(err: &ffmpeg_next::Error) -> bool {
    matches!(err, ffmpeg_next::Error::Other { errno } if *errno == ffi::EAGAIN)
}

fn codec_error(err: ffmpeg_next::Error) -> Error {
    Error::codec(err.to_string())
}

/**
    Copy a packet into a native one, carrying its timing.
*/
fn to_ffmpeg_packet(packet: &Packet) -> ffmpeg_next::Packet {
    let mut ffmpeg_pkt = ffmpeg_next::Packet::copy(&packet.data);
    ffmpeg_pkt.set_stream(packet.stream_index);
    ffmpeg_pkt.set_pts(packet.pts.map(|pts| pts.0));
    ffmpeg_pkt.set_dts(packet.dts.map(|dts| dts.0));
    ffmpeg_pkt.set_duration(packet.duration.0);
    ffmpeg_pkt
}

/**
    Copy audio data from FFmpeg frame.

    Handles both planar and packed formats. Planar audio keeps each channel
    in its own plane, so the planes are interleaved into one buffer.

    In planar audio only linesize[0] is set and it applies to every plane.
    The plane data is read through the data pointers for that reason.
*/
fn copy_audio_data(
    frame: &AudioFrameFFmpeg,
    format: SampleFormat,
    samples: usize,
    channels: u16,
) -> Result<Vec<u8>> {
    let bytes_per_sample = format.bytes_per_sample();
    let total_bytes = samples * channels as usize * bytes_per_sample;
    let expected_plane_bytes = samples * bytes_per_sample;

    // For planar audio, check if we have the right number of planes
    let is_planar = frame.is_planar();
    let planes = frame.planes();

    if is_planar && planes >= channels as usize {
        let mut output = vec![0u8; total_bytes];

        // Get linesize[0] which applies to all planes in planar audio
        let plane0_data = frame.data(0);
        let plane_size = plane0_data.len();

        if plane_size < expected_plane_bytes {
            return Err(Error::invalid_data(format!(
                "audio plane size {} is less than expected {} bytes for {} samples",
                plane_size, expected_plane_bytes, samples
            )));
        }

        for ch in 0..channels as usize {
            // SAFETY: planar frames allocate one plane per channel, each of
            // linesize[0] bytes.
            let plane_data = unsafe {
                let ptr = (*frame.as_ptr()).data[ch];
                std::slice::from_raw_parts(ptr, plane_size)
            };

            for s in 0..samples {
                let src_offset = s * bytes_per_sample;
                let dst_offset = (s * channels as usize + ch) * bytes_per_sample;
                output[dst_offset..dst_offset + bytes_per_sample]
                    .copy_from_slice(&plane_data[src_offset..src_offset + bytes_per_sample]);
            }
        }

        Ok(output)
    } else {
        // Packed: already interleaved in plane 0
        let plane0_data = frame.data(0);
        if plane0_data.len() < total_bytes {
            return Err(Error::invalid_data(format!(
                "packed audio data has {} bytes, expected at least {}",
                plane0_data.len(),
                total_bytes
            )));
        }
        Ok(plane0_data[..total_bytes].to_vec())
    }
}

/**
    Convert FFmpeg sample format to our SampleFormat.
*/
fn sample_format_from_ffmpeg(format: ffmpeg_next::format::Sample) -> Option<SampleFormat> {
    use ffmpeg_next::format::Sample;

    match format {
        Sample::F32(_) => Some(SampleFormat::F32),
        Sample::F64(_) => Some(SampleFormat::F64),
        Sample::I16(_) => Some(SampleFormat::S16),
        Sample::I32(_) => Some(SampleFormat::S32),
        Sample::U8(_) => Some(SampleFormat::U8),
        _ => None,
    }
}

impl std::fmt::Debug for AudioDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDecoder")
            .field("stream_index", &self.stream_index)
            .field("time_base", &self.time_base)
            .field("sample_rate", &self.decoder.rate())
            .field("channels", &self.decoder.channels())
            .finish_non_exhaustive()
    }
}
