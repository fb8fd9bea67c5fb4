/*!
    Minimal RIFF/WAVE writer.

    The header is written with zero sizes up front and patched by
    [`WavWriter::finalize`] once the data length is known.
*/

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use ffmpeg_types::AudioStreamInfo;
use thiserror::Error;

const HEADER_LEN: u32 = 44;
const RIFF_SIZE_OFFSET: u64 = 4;
const DATA_SIZE_OFFSET: u64 = 40;
// RIFF size must fit in u32, including the pad byte
const MAX_DATA_LEN: u32 = u32::MAX - (HEADER_LEN - 8) - 1;

const WAVE_FORMAT_PCM: u16 = 1;
const WAVE_FORMAT_IEEE_FLOAT: u16 = 3;

#[derive(Debug, Error)]
pub enum WavError {
    #[error("wrong parameters for wav file: {0}")]
    InvalidParameters(String),
    #[error("wav data exceeds {} bytes", MAX_DATA_LEN)]
    TooLarge,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/**
    How samples are stored in the data chunk.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavEncoding {
    /// Integer samples (`WAVE_FORMAT_PCM`).
    Pcm,
    /// IEEE float samples (`WAVE_FORMAT_IEEE_FLOAT`).
    Float,
}

/**
    Header parameters of a WAV file.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavSpec {
    pub channels: u16,
    pub bytes_per_sample: u16,
    pub sample_rate: u32,
    pub encoding: WavEncoding,
}

impl WavSpec {
    /**
        Header parameters matching a decoded audio stream.

        Float sample formats select IEEE float storage, everything else PCM.
        Call [`validate`](Self::validate) before writing.
    */
    pub fn from_stream(stream: &AudioStreamInfo) -> Result<Self, WavError> {
        let bytes_per_sample = u16::try_from(stream.bytes_per_sample).map_err(|_| {
            WavError::InvalidParameters(format!(
                "{} bytes per sample is out of range",
                stream.bytes_per_sample
            ))
        })?;
        let encoding = match stream.sample_format {
            Some(format) if format.is_float() => WavEncoding::Float,
            _ => WavEncoding::Pcm,
        };
        Ok(Self {
            channels: stream.channels,
            bytes_per_sample,
            sample_rate: stream.sample_rate,
            encoding,
        })
    }

    pub fn validate(&self) -> Result<(), WavError> {
        if self.channels == 0 {
            return Err(WavError::InvalidParameters(
                "channel count must be at least 1".into(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(WavError::InvalidParameters(
                "sample rate must be at least 1".into(),
            ));
        }
        let valid = match self.encoding {
            WavEncoding::Pcm => (1..=4).contains(&self.bytes_per_sample),
            WavEncoding::Float => matches!(self.bytes_per_sample, 4 | 8),
        };
        if !valid {
            return Err(WavError::InvalidParameters(format!(
                "{} bytes per sample is not supported for {} data",
                self.bytes_per_sample,
                match self.encoding {
                    WavEncoding::Pcm => "PCM",
                    WavEncoding::Float => "float",
                }
            )));
        }
        if u32::from(self.channels) * u32::from(self.bytes_per_sample) > u32::from(u16::MAX) {
            return Err(WavError::InvalidParameters(format!(
                "{} channels do not fit in a frame",
                self.channels
            )));
        }
        if self.byte_rate().is_none() {
            return Err(WavError::InvalidParameters(format!(
                "sample rate {} is too high",
                self.sample_rate
            )));
        }
        Ok(())
    }

    /// Bytes in one frame (one sample of every channel).
    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(self.bytes_per_sample)
    }

    /// Bytes per second of audio.
    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate
            .checked_mul(u32::from(self.channels))?
            .checked_mul(u32::from(self.bytes_per_sample))
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bytes_per_sample * 8
    }

    fn format_tag(&self) -> u16 {
        match self.encoding {
            WavEncoding::Pcm => WAVE_FORMAT_PCM,
            WavEncoding::Float => WAVE_FORMAT_IEEE_FLOAT,
        }
    }
}

impl fmt::Display for WavSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.encoding {
            WavEncoding::Pcm => "pcm",
            WavEncoding::Float => "float",
        };
        write!(
            f,
            "{} Hz, {} ch, {}-bit {}",
            self.sample_rate,
            self.channels,
            self.bits_per_sample(),
            kind
        )
    }
}

/**
    Streaming WAV writer.
*/
pub struct WavWriter<W: Write + Seek> {
    inner: W,
    data_len: u32,
}

impl WavWriter<BufWriter<File>> {
    /**
        Validate `spec`, then create the file at `path` and write its header.

        Nothing is created when the parameters are rejected.
    */
    pub fn create<P: AsRef<Path>>(path: P, spec: WavSpec) -> Result<Self, WavError> {
        spec.validate()?;
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), spec)
    }
}

impl<W: Write + Seek> WavWriter<W> {
    pub fn new(mut inner: W, spec: WavSpec) -> Result<Self, WavError> {
        spec.validate()?;
        write_header(&mut inner, &spec, 0)?;
        Ok(Self { inner, data_len: 0 })
    }

    /// Bytes of sample data written so far.
    pub fn data_len(&self) -> u32 {
        self.data_len
    }

    /**
        Append raw sample bytes, in the layout described by the spec.
    */
    pub fn write_samples(&mut self, data: &[u8]) -> Result<(), WavError> {
        let len = u32::try_from(data.len()).map_err(|_| WavError::TooLarge)?;
        let data_len = self
            .data_len
            .checked_add(len)
            .filter(|total| *total <= MAX_DATA_LEN)
            .ok_or(WavError::TooLarge)?;
        self.inner.write_all(data)?;
        self.data_len = data_len;
        Ok(())
    }

    /**
        Pad the data chunk to an even length, patch the chunk sizes and flush.
    */
    pub fn finalize(mut self) -> Result<W, WavError> {
        let pad = self.data_len % 2;
        if pad == 1 {
            self.inner.write_all(&[0])?;
        }

        let riff_size = HEADER_LEN - 8 + self.data_len + pad;
        self.inner.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
        self.inner.write_all(&riff_size.to_le_bytes())?;
        self.inner.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
        self.inner.write_all(&self.data_len.to_le_bytes())?;
        self.inner.seek(SeekFrom::End(0))?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

fn write_header<W: Write>(out: &mut W, spec: &WavSpec, data_len: u32) -> io::Result<()> {
    // validated specs always have a byte rate
    let byte_rate = spec.byte_rate().unwrap_or(u32::MAX);

    out.write_all(b"RIFF")?;
    out.write_all(&(HEADER_LEN - 8 + data_len).to_le_bytes())?;
    out.write_all(b"WAVE")?;

    out.write_all(b"fmt ")?;
    out.write_all(&16u32.to_le_bytes())?;
    out.write_all(&spec.format_tag().to_le_bytes())?;
    out.write_all(&spec.channels.to_le_bytes())?;
    out.write_all(&spec.sample_rate.to_le_bytes())?;
    out.write_all(&byte_rate.to_le_bytes())?;
    out.write_all(&spec.block_align().to_le_bytes())?;
    out.write_all(&spec.bits_per_sample().to_le_bytes())?;

    out.write_all(b"data")?;
    out.write_all(&data_len.to_le_bytes())
}
