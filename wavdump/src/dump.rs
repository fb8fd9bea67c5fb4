/*!
    Decode driver: select the first audio stream, decode up to a byte
    budget and write the result as WAV.
*/

use std::path::PathBuf;

use ffmpeg_decode::{AudioDecoder, AudioDecoderConfig, AudioFrame};
use ffmpeg_source::{AudioStreamInfo, LogLevel, Media, MediaInfo, SourceConfig};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::wav::{WavError, WavSpec, WavWriter};

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("No audio stream in {name}")]
    NoAudioStream { name: String },
    #[error(transparent)]
    Wav(#[from] WavError),
    #[error(transparent)]
    Media(#[from] ffmpeg_source::Error),
}

impl DumpError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoAudioStream { .. } => 2,
            Self::Wav(_) | Self::Media(_) => 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DumpConfig {
    /// Media file or URL to read.
    pub media: PathBuf,
    /// Seconds of audio to decode.
    pub length: u64,
    /// WAV file to write.
    pub output: PathBuf,
    /// FFmpeg's own log level.
    pub log_level: LogLevel,
}

#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    pub stream_index: usize,
    pub bytes_written: u64,
    pub packets_decoded: usize,
    pub spec: WavSpec,
}

/**
    Decoded audio, kept as the chunks the decoder produced.
*/
#[derive(Debug, Default)]
pub struct SampleBuffer {
    chunks: Vec<Vec<u8>>,
    len: u64,
}

impl SampleBuffer {
    pub fn push(&mut self, chunk: Vec<u8>) {
        if chunk.is_empty() {
            return;
        }
        debug!("writing {} bytes", chunk.len());
        self.len += chunk.len() as u64;
        self.chunks.push(chunk);
    }

    pub fn extend_frames(&mut self, frames: Vec<AudioFrame>) {
        for frame in frames {
            self.push(frame.data);
        }
    }

    /// Total bytes buffered.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.chunks.iter().map(Vec::as_slice)
    }
}

/**
    Number of decoded bytes after which decoding stops.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteBudget {
    limit: u64,
}

impl ByteBudget {
    pub fn new(seconds: u64, spec: &WavSpec) -> Self {
        let per_second = u64::from(spec.channels)
            * u64::from(spec.bytes_per_sample)
            * u64::from(spec.sample_rate);
        Self {
            limit: seconds.saturating_mul(per_second),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn is_exhausted(&self, total: u64) -> bool {
        total >= self.limit
    }
}

/**
    First audio stream of the media, in index order.
*/
pub fn select_audio_stream(info: &MediaInfo) -> Result<&AudioStreamInfo, DumpError> {
    info.first_audio().ok_or_else(|| DumpError::NoAudioStream {
        name: info.name.clone(),
    })
}

/**
    Open the media, decode its first audio stream and write the WAV file.
*/
pub fn run(config: &DumpConfig) -> Result<RunSummary, DumpError> {
    let mut media = Media::open_with_config(
        &config.media,
        SourceConfig {
            log_level: config.log_level,
        },
    )?;

    let info = media.info();
    let stream = select_audio_stream(&info)?;
    let spec = WavSpec::from_stream(stream)?;
    spec.validate()?;

    info!(
        media = %info.name,
        stream = stream.index,
        codec = %stream.codec,
        "decoding {}",
        spec
    );

    let mut decoder = AudioDecoder::new(
        media.codec_config(stream.index)?,
        AudioDecoderConfig::default(),
    )?;
    let budget = ByteBudget::new(config.length, &spec);

    let (buffer, packets_decoded) =
        decode_loop(&mut media, &mut decoder, budget, SampleBuffer::default());
    if buffer.is_empty() {
        warn!(media = %info.name, "no audio could be decoded");
    }

    let mut writer = WavWriter::create(&config.output, spec)?;
    for chunk in buffer.chunks() {
        writer.write_samples(chunk)?;
    }
    let bytes_written = u64::from(writer.data_len());
    writer.finalize()?;

    Ok(RunSummary {
        stream_index: stream.index,
        bytes_written,
        packets_decoded,
        spec,
    })
}

/**
    Feed the selected stream's packets to the decoder until the budget is
    spent or the media ends.

    Returns the buffer and the number of packets that produced audio.
*/
fn decode_loop(
    media: &mut Media,
    decoder: &mut AudioDecoder,
    budget: ByteBudget,
    mut buffer: SampleBuffer,
) -> (SampleBuffer, usize) {
    let mut packets_decoded = 0;

    loop {
        let packet = match media.next_packet() {
            Ok(Some(packet)) => packet,
            Ok(None) => break,
            Err(e) => {
                warn!("stopped reading: {e}");
                break;
            }
        };
        if packet.stream_index != decoder.stream_index() {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(frames) if frames.is_empty() => {
                debug!(pts = ?packet.pts, "packet produced no frame");
                continue;
            }
            Ok(frames) => {
                packets_decoded += 1;
                buffer.extend_frames(frames);
            }
            Err(e) => {
                debug!(pts = ?packet.pts, "skipping packet: {e}");
                continue;
            }
        }

        if budget.is_exhausted(buffer.len()) {
            debug!(limit = budget.limit(), total = buffer.len(), "budget reached");
            return (buffer, packets_decoded);
        }
    }

    match decoder.flush() {
        Ok(frames) => buffer.extend_frames(frames),
        Err(e) => debug!("flush failed: {e}"),
    }
    (buffer, packets_decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::WavEncoding;
    use std::path::Path;

    fn pcm_spec(channels: u16, sample_rate: u32) -> WavSpec {
        WavSpec {
            channels,
            bytes_per_sample: 2,
            sample_rate,
            encoding: WavEncoding::Pcm,
        }
    }

    /// Stereo 16-bit input, written with the crate's own writer.
    fn write_input(dir: &Path, seconds: u32) -> PathBuf {
        let path = dir.join("input.wav");
        let mut writer = WavWriter::create(&path, pcm_spec(2, 8000)).unwrap();
        let second: Vec<u8> = (0..8000u32)
            .flat_map(|i| {
                let v = ((i % 100) as i16 - 50) * 300;
                let [a, b] = v.to_le_bytes();
                [a, b, a, b]
            })
            .collect();
        for _ in 0..seconds {
            writer.write_samples(&second).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    fn config(dir: &Path, media: PathBuf, length: u64) -> DumpConfig {
        DumpConfig {
            media,
            length,
            output: dir.join("out.wav"),
            log_level: LogLevel::Quiet,
        }
    }

    fn header_field(bytes: &[u8], offset: usize, len: usize) -> u32 {
        bytes[offset..offset + len]
            .iter()
            .rev()
            .fold(0, |acc, b| (acc << 8) | u32::from(*b))
    }

    #[test]
    fn budget_from_spec() {
        let budget = ByteBudget::new(90, &pcm_spec(2, 44100));
        assert_eq!(budget.limit(), 90 * 2 * 2 * 44100);
        assert!(!budget.is_exhausted(budget.limit() - 1));
        assert!(budget.is_exhausted(budget.limit()));
        assert!(ByteBudget::new(0, &pcm_spec(1, 8000)).is_exhausted(0));
    }

    #[test]
    fn sample_buffer_keeps_order() {
        let mut buffer = SampleBuffer::default();
        assert!(buffer.is_empty());
        buffer.push(vec![1, 2]);
        buffer.push(Vec::new());
        buffer.push(vec![3]);
        assert_eq!(buffer.len(), 3);
        let chunks: Vec<&[u8]> = buffer.chunks().collect();
        assert_eq!(chunks, [&[1u8, 2][..], &[3][..]]);
    }

    #[test]
    fn exit_codes() {
        let missing = DumpError::NoAudioStream {
            name: "talk.srt".into(),
        };
        assert_eq!(missing.exit_code(), 2);
        assert_eq!(missing.to_string(), "No audio stream in talk.srt");
        assert_eq!(
            DumpError::from(WavError::InvalidParameters("x".into())).exit_code(),
            1
        );
        assert_eq!(
            DumpError::from(ffmpeg_source::Error::open("a", "b")).exit_code(),
            1
        );
    }

    #[test]
    fn dumps_one_second() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), 3);
        let config = config(dir.path(), input, 1);

        let summary = run(&config).unwrap();
        assert_eq!(summary.stream_index, 0);
        assert_eq!(summary.spec, pcm_spec(2, 8000));
        assert!(summary.packets_decoded > 0);

        let bytes = std::fs::read(&config.output).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(header_field(&bytes, 22, 2), 2);
        assert_eq!(header_field(&bytes, 24, 4), 8000);
        assert_eq!(header_field(&bytes, 34, 2), 16);

        let data_len = header_field(&bytes, 40, 4);
        assert_eq!(u64::from(data_len), summary.bytes_written);
        assert!(data_len >= 32_000, "only {data_len} bytes");
        assert!(data_len < 3 * 32_000, "budget ignored: {data_len} bytes");
    }

    #[test]
    fn short_media_is_dumped_whole() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), 2);
        let config = config(dir.path(), input, 90);

        let summary = run(&config).unwrap();
        assert_eq!(summary.bytes_written, 2 * 32_000);
        let bytes = std::fs::read(&config.output).unwrap();
        assert_eq!(bytes.len(), 44 + 2 * 32_000);
    }

    #[test]
    fn no_audio_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("captions.srt");
        std::fs::write(&input, "1\n00:00:00,000 --> 00:00:02,000\nHi\n\n").unwrap();
        let config = config(dir.path(), input, 1);

        let err = run(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(matches!(err, DumpError::NoAudioStream { .. }));
        assert!(!config.output.exists());
    }

    #[test]
    fn missing_media_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), dir.path().join("gone.mp3"), 1);

        let err = run(&config).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(!config.output.exists());
    }

    #[test]
    fn audio_behind_a_subtitle_stream_is_selected() {
        let dir = tempfile::tempdir().unwrap();
        let input = ffmpeg_source::fixtures::write_subtitle_then_audio(dir.path(), "mixed.mkv");
        let config = config(dir.path(), input, 90);

        let summary = run(&config).unwrap();
        assert_eq!(summary.stream_index, 1);
        assert_eq!(summary.spec, pcm_spec(2, 8000));

        let expected = ffmpeg_source::fixtures::MIXED_AUDIO_BYTES as u64;
        assert_eq!(summary.bytes_written, expected);
        let bytes = std::fs::read(&config.output).unwrap();
        assert_eq!(header_field(&bytes, 22, 2), 2);
        assert_eq!(header_field(&bytes, 24, 4), 8000);
        assert_eq!(header_field(&bytes, 34, 2), 16);
        assert_eq!(u64::from(header_field(&bytes, 40, 4)), expected);
    }
}
