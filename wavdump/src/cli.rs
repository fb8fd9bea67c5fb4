use std::path::PathBuf;

use clap::Parser;
use ffmpeg_source::LogLevel;

use crate::dump::DumpConfig;

/**
    Decode the first audio stream of a media file into a WAV file.
*/
#[derive(Debug, Parser)]
#[command(name = "wavdump", version)]
pub struct Args {
    /// Media file or URL to read.
    #[arg(short, long)]
    pub media: PathBuf,

    /// Seconds of audio to decode.
    #[arg(short, long, default_value_t = 90)]
    pub length: u64,

    /// Output WAV file.
    #[arg(short, long, default_value = "out.wav")]
    pub output: PathBuf,

    /// FFmpeg log level: quiet, error, warning, info or debug.
    #[arg(long = "ffmpeg-log", default_value = "quiet")]
    pub ffmpeg_log: LogLevel,

    /// Log decoding progress.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn into_config(self) -> DumpConfig {
        DumpConfig {
            media: self.media,
            length: self.length,
            output: self.output,
            log_level: self.ffmpeg_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["wavdump", "-m", "song.mp3"]).unwrap();
        let config = args.into_config();
        assert_eq!(config.media, PathBuf::from("song.mp3"));
        assert_eq!(config.length, 90);
        assert_eq!(config.output, PathBuf::from("out.wav"));
        assert_eq!(config.log_level, LogLevel::Quiet);
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "wavdump",
            "--media",
            "in.ogg",
            "-l",
            "5",
            "-o",
            "clip.wav",
            "--ffmpeg-log",
            "warning",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose);
        let config = args.into_config();
        assert_eq!(config.length, 5);
        assert_eq!(config.output, PathBuf::from("clip.wav"));
        assert_eq!(config.log_level, LogLevel::Warning);
    }

    #[test]
    fn media_is_required() {
        assert!(Args::try_parse_from(["wavdump"]).is_err());
        assert!(Args::try_parse_from(["wavdump", "-m", "a", "--ffmpeg-log", "loud"]).is_err());
    }
}
