/*!
    Small media files generated on the fly for tests.

    Enabled for this crate's own tests and, through the `test-fixtures`
    feature, for downstream crates' tests.
*/

use std::fs;
use std::path::{Path, PathBuf};
use std::ptr;

use ffmpeg_next::{Rational as FFmpegRational, ffi};

/// Sample rate of the audio track in [`write_subtitle_then_audio`].
pub const MIXED_SAMPLE_RATE: u32 = 8000;
/// Audio bytes in [`write_subtitle_then_audio`]: one second of stereo s16.
pub const MIXED_AUDIO_BYTES: usize = MIXED_SAMPLE_RATE as usize * 4;

fn riff_chunk(out: &mut Vec<u8>, id: &[u8; 4], body: &[u8]) {
    out.extend_from_slice(id);
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    if body.len() % 2 == 1 {
        out.push(0);
    }
}

fn pcm_wav_bytes(channels: u16, rate: u32, seconds: u32, info_title: Option<&str>) -> Vec<u8> {
    let block_align = channels * 2;
    let frames = rate * seconds;

    let mut fmt = Vec::with_capacity(16);
    fmt.extend_from_slice(&1u16.to_le_bytes());
    fmt.extend_from_slice(&channels.to_le_bytes());
    fmt.extend_from_slice(&rate.to_le_bytes());
    fmt.extend_from_slice(&(rate * block_align as u32).to_le_bytes());
    fmt.extend_from_slice(&block_align.to_le_bytes());
    fmt.extend_from_slice(&16u16.to_le_bytes());

    let mut data = Vec::with_capacity((frames * block_align as u32) as usize);
    for frame in 0..frames {
        // quiet square wave
        let sample: i16 = if (frame / 20) % 2 == 0 { 1000 } else { -1000 };
        for _ in 0..channels {
            data.extend_from_slice(&sample.to_le_bytes());
        }
    }

    let mut body = b"WAVE".to_vec();
    riff_chunk(&mut body, b"fmt ", &fmt);
    if let Some(title) = info_title {
        let mut name = title.as_bytes().to_vec();
        name.push(0);
        let mut info = b"INFO".to_vec();
        riff_chunk(&mut info, b"INAM", &name);
        riff_chunk(&mut body, b"LIST", &info);
    }
    riff_chunk(&mut body, b"data", &data);

    let mut bytes = Vec::with_capacity(body.len() + 8);
    riff_chunk(&mut bytes, b"RIFF", &body);
    bytes
}

/// Write a 16-bit PCM WAV file holding a quiet square wave.
pub fn write_pcm_wav(dir: &Path, name: &str, channels: u16, rate: u32, seconds: u32) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, pcm_wav_bytes(channels, rate, seconds, None)).unwrap();
    path
}

/// Write a mono 16-bit PCM WAV file carrying a `LIST/INFO/INAM` title tag.
pub fn write_titled_wav(dir: &Path, name: &str, title: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, pcm_wav_bytes(1, 8000, 1, Some(title))).unwrap();
    path
}

/// Write a two-cue SubRip file, which demuxes to a single subtitle stream.
pub fn write_srt(dir: &Path, name: &str) -> PathBuf {
    let text = "1\n00:00:00,000 --> 00:00:01,000\nHello\n\n\
                2\n00:00:01,500 --> 00:00:03,000\nWorld\n\n";
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

/// Write a raw 4:2:0 YUV4MPEG2 file of `frames` frames at 25 fps.
pub fn write_y4m(dir: &Path, name: &str, width: usize, height: usize, frames: usize) -> PathBuf {
    let mut bytes = format!("YUV4MPEG2 W{width} H{height} F25:1 Ip A1:1 C420jpeg\n").into_bytes();
    let luma = width * height;
    let chroma = width.div_ceil(2) * height.div_ceil(2);
    for _ in 0..frames {
        bytes.extend_from_slice(b"FRAME\n");
        bytes.extend(std::iter::repeat_n(0x80, luma + 2 * chroma));
    }
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/**
    Mux a Matroska file with a SubRip stream at index 0 and one second of
    stereo 16-bit PCM at index 1.

    `name` must end in `.mkv` so the muxer is picked from the extension.
*/
pub fn write_subtitle_then_audio(dir: &Path, name: &str) -> PathBuf {
    ffmpeg_next::init().unwrap();
    let path = dir.join(name);
    let mut output = ffmpeg_next::format::output(&path).unwrap();

    // SAFETY: the context is freshly allocated and owned by `output`; the new
    // streams' codec parameters are allocated by avformat_new_stream.
    unsafe {
        let ctx = output.as_mut_ptr();

        let subtitle = ffi::avformat_new_stream(ctx, ptr::null());
        assert!(!subtitle.is_null());
        let par = (*subtitle).codecpar;
        (*par).codec_type = ffi::AVMediaType::AVMEDIA_TYPE_SUBTITLE;
        (*par).codec_id = ffi::AVCodecID::AV_CODEC_ID_SUBRIP;
        (*subtitle).time_base = ffi::AVRational { num: 1, den: 1000 };

        let audio = ffi::avformat_new_stream(ctx, ptr::null());
        assert!(!audio.is_null());
        let par = (*audio).codecpar;
        (*par).codec_type = ffi::AVMediaType::AVMEDIA_TYPE_AUDIO;
        (*par).codec_id = ffi::AVCodecID::AV_CODEC_ID_PCM_S16LE;
        (*par).sample_rate = MIXED_SAMPLE_RATE as i32;
        (*par).format = ffi::AVSampleFormat::AV_SAMPLE_FMT_S16 as i32;
        (*par).bits_per_coded_sample = 16;
        (*par).block_align = 4;
        ffi::av_channel_layout_default(&mut (*par).ch_layout, 2);
        (*audio).time_base = ffi::AVRational {
            num: 1,
            den: MIXED_SAMPLE_RATE as i32,
        };
    }

    output.write_header().unwrap();

    let write = |output: &mut ffmpeg_next::format::context::Output,
                 stream: usize,
                 data: &[u8],
                 pts: i64,
                 duration: i64,
                 time_base: FFmpegRational| {
        let mut packet = ffmpeg_next::Packet::copy(data);
        packet.set_stream(stream);
        packet.set_pts(Some(pts));
        packet.set_dts(Some(pts));
        packet.set_duration(duration);
        let target = output.stream(stream).unwrap().time_base();
        packet.rescale_ts(time_base, target);
        packet.write_interleaved(output).unwrap();
    };

    write(
        &mut output,
        0,
        b"Hello",
        0,
        500,
        FFmpegRational::new(1, 1000),
    );

    let frames_per_packet = 2000usize;
    let chunk: Vec<u8> = (0..frames_per_packet)
        .flat_map(|i| {
            let [a, b] = ((i % 64) as i16 * 256).to_le_bytes();
            [a, b, a, b]
        })
        .collect();
    let audio_time_base = FFmpegRational::new(1, MIXED_SAMPLE_RATE as i32);
    for i in 0..(MIXED_SAMPLE_RATE as usize / frames_per_packet) {
        write(
            &mut output,
            1,
            &chunk,
            (i * frames_per_packet) as i64,
            frames_per_packet as i64,
            audio_time_base,
        );
    }

    output.write_trailer().unwrap();
    path
}
