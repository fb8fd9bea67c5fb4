/*!
    Probing functionality for extracting media metadata.
*/

use std::path::Path;

use ffmpeg_next::{
    codec, format::context::Input as InputContext, format::stream::Stream, media::Type,
};
use tracing::{debug, warn};

use ffmpeg_types::{
    AudioStreamInfo, Metadata, MediaInfo, OtherStreamInfo, Result, StreamInfo, VideoStreamInfo,
};

use crate::convert::{
    duration_from_av_time_base, frame_rate_from_ffmpeg, media_kind_from_ffmpeg,
    sample_format_from_ffmpeg, stream_duration_from_ffmpeg, time_base_from_ffmpeg,
};
use crate::media::Media;

/**
    Probe a media file to extract metadata without decoding anything.

    Opens the resource, snapshots its [`MediaInfo`] and releases the native
    context before returning.

    # Example

    ```ignore
    let info = probe("video.mp4")?;
    for stream in &info.streams {
        println!("#{} {} ({})", stream.index(), stream.codec(), stream.kind());
    }
    ```
*/
pub fn probe<P: AsRef<Path>>(path: P) -> Result<MediaInfo> {
    Media::open(path).map(|media| media.info())
}

/**
    Extract MediaInfo from an already-opened input context.
*/
pub(crate) fn extract_media_info(input_ctx: &InputContext, name: &str) -> MediaInfo {
    let streams = input_ctx
        .streams()
        .map(|stream| extract_stream_info(&stream))
        .collect::<Vec<_>>();

    MediaInfo {
        name: name.to_string(),
        duration: duration_from_av_time_base(input_ctx.duration()),
        metadata: extract_metadata(input_ctx),
        streams,
    }
}

/**
    Walk the container's tag dictionary in native order.
*/
pub(crate) fn extract_metadata(input_ctx: &InputContext) -> Metadata {
    input_ctx.metadata().iter().collect()
}

/**
    Build the tagged info record for one stream.
*/
pub(crate) fn extract_stream_info(stream: &Stream) -> StreamInfo {
    let index = stream.index();
    let parameters = stream.parameters();
    let medium = parameters.medium();
    let codec = codec_name(parameters.id());

    let info = match medium {
        Type::Audio => extract_audio_stream_info(stream, codec.clone()).map(StreamInfo::Audio),
        Type::Video => extract_video_stream_info(stream, codec.clone()).map(StreamInfo::Video),
        _ => None,
    };

    let info = info.unwrap_or_else(|| {
        if matches!(medium, Type::Audio | Type::Video) {
            warn!(index, %codec, "could not open codec context, reporting stream as opaque");
        }
        StreamInfo::Other(OtherStreamInfo {
            index,
            codec,
            kind: media_kind_from_ffmpeg(medium),
        })
    });

    debug!(index, kind = %info.kind(), codec = info.codec(), "probed stream");
    info
}

/**
    Resolve the decoder name for a codec id.

    The decoder is looked up by id rather than trusting any codec pointer on
    the stream. Ids without a registered decoder fall back to the generic id name.
*/
fn codec_name(id: codec::Id) -> String {
    ffmpeg_next::decoder::find(id)
        .map(|codec| codec.name().to_string())
        .unwrap_or_else(|| id.name().to_string())
}

/**
    Extract audio stream info, including the decoded sample layout.
*/
fn extract_audio_stream_info(stream: &Stream, codec: String) -> Option<AudioStreamInfo> {
    let time_base = time_base_from_ffmpeg(stream.time_base());

    // Create a decoder context to get format info
    let decoder_ctx = codec::context::Context::from_parameters(stream.parameters()).ok()?;
    let decoder = decoder_ctx.decoder().audio().ok()?;
    let format = decoder.format();

    // SAFETY: We're reading from a valid AVCodecParameters pointer that FFmpeg owns
    let bit_rate = unsafe {
        let ptr = stream.parameters().as_ptr();
        ((*ptr).bit_rate > 0).then_some((*ptr).bit_rate as u64)
    };

    Some(AudioStreamInfo {
        index: stream.index(),
        codec,
        channels: decoder.channels(),
        bytes_per_sample: format.bytes(),
        sample_rate: decoder.rate(),
        sample_format: sample_format_from_ffmpeg(format),
        time_base,
        duration: stream_duration_from_ffmpeg(stream.duration(), time_base),
        bit_rate,
    })
}

/**
    Extract video stream info from its codec parameters.
*/
fn extract_video_stream_info(stream: &Stream, codec: String) -> Option<VideoStreamInfo> {
    let time_base = time_base_from_ffmpeg(stream.time_base());

    let decoder_ctx = codec::context::Context::from_parameters(stream.parameters()).ok()?;
    let decoder = decoder_ctx.decoder().video().ok()?;

    let frame_rate = frame_rate_from_ffmpeg(stream.avg_frame_rate())
        .or_else(|| frame_rate_from_ffmpeg(stream.rate()));

    Some(VideoStreamInfo {
        index: stream.index(),
        codec,
        width: decoder.width(),
        height: decoder.height(),
        frame_rate,
        time_base,
        duration: stream_duration_from_ffmpeg(stream.duration(), time_base),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn probe_pcm_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_pcm_wav(dir.path(), "tone.wav", 2, 8000, 2);

        let info = probe(&path).unwrap();
        assert_eq!(info.streams.len(), 1);

        let audio = info.first_audio().expect("audio stream");
        assert_eq!(audio.index, 0);
        assert_eq!(audio.codec, "pcm_s16le");
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.bytes_per_sample, 2);
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.bytes_per_second(), 32_000);

        let duration = info.duration_secs().expect("duration");
        assert!((duration - 2.0).abs() < 0.05, "duration was {duration}");
    }

    #[test]
    fn probe_reports_subtitles_as_other() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_srt(dir.path(), "captions.srt");

        let info = probe(&path).unwrap();
        assert!(!info.has_audio());
        assert_eq!(info.streams.len(), 1);
        assert_eq!(info.streams[0].kind(), ffmpeg_types::MediaKind::Subtitle);
        assert_eq!(info.streams[0].index(), 0);
    }

    #[test]
    fn probe_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = probe(dir.path().join("nothing-here.mp3")).unwrap_err();
        match err {
            ffmpeg_types::Error::Open { path, message } => {
                assert!(path.ends_with("nothing-here.mp3"));
                assert!(!message.is_empty());
            }
            other => panic!("expected open error, got {other:?}"),
        }
    }

    #[test]
    fn y4m_reports_frame_size_and_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_y4m(dir.path(), "tiny.y4m", 4, 2, 2);

        let info = probe(&path).unwrap();
        assert!(!info.has_audio());
        let video = info.streams[0].as_video().expect("video variant");
        assert_eq!(video.index, 0);
        assert_eq!(video.codec, "rawvideo");
        assert_eq!(video.width, 4);
        assert_eq!(video.height, 2);
        assert_eq!(video.aspect_ratio(), 2.0);
        assert_eq!(video.frame_rate, Some(ffmpeg_types::Rational::new(25, 1)));
    }

    #[test]
    fn container_title_tag_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_titled_wav(dir.path(), "titled.wav", "Test Tone");

        let info = probe(&path).unwrap();
        assert_eq!(info.metadata.get("title"), Some("Test Tone"));
        assert_eq!(info.first_audio().map(|a| a.sample_rate), Some(8000));

        let media = Media::open(&path).unwrap();
        assert_eq!(media.metadata().get("title"), Some("Test Tone"));
    }
}
