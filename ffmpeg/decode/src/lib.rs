/*!
    Audio decoding for the ffmpeg crate ecosystem.

    This crate transforms encoded packets from `ffmpeg-source` into raw,
    interleaved audio frames.

    # Example

    ```ignore
    use ffmpeg_decode::{AudioDecoder, AudioDecoderConfig};
    use ffmpeg_source::Media;

    let mut media = Media::open("song.flac")?;
    let index = media.info().first_audio().expect("no audio").index;
    let mut decoder = AudioDecoder::new(media.codec_config(index)?, AudioDecoderConfig::default())?;

    for packet in &mut media {
        let packet = packet?;
        if packet.stream_index == index {
            for frame in decoder.decode(&packet)? {
                // frame.data holds interleaved samples
            }
        }
    }
    ```
*/

mod audio;
mod config;

pub use audio::AudioDecoder;
pub use config::AudioDecoderConfig;

pub use ffmpeg_types::{AudioFrame, Error, Result, SampleFormat};
