/*!
    Translation of native FFmpeg error codes.
*/

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use ffmpeg_next::ffi;

use ffmpeg_types::Error;

const ERROR_BUFFER_SIZE: usize = 128;

/**
    Resolve a negative FFmpeg return code into a human-readable message.

    Uses `av_strerror`. When the native resolver cannot interpret the code,
    a generic `unknown error code <n>` message is returned instead.
*/
pub fn error_string(code: i32) -> String {
    let mut buf: [c_char; ERROR_BUFFER_SIZE] = [0; ERROR_BUFFER_SIZE];

    // SAFETY: `buf` is writable for its full length and av_strerror always
    // NUL-terminates within the size it is given.
    let res = unsafe { ffi::av_strerror(code, buf.as_mut_ptr(), buf.len()) };
    if res < 0 {
        return format!("unknown error code {code}");
    }

    // SAFETY: see above, the buffer holds a NUL-terminated string.
    let message = unsafe { CStr::from_ptr(buf.as_ptr()) };
    message.to_string_lossy().into_owned()
}

/**
    Native code carried by an ffmpeg-next error.
*/
pub(crate) fn error_code(err: ffmpeg_next::Error) -> i32 {
    c_int::from(err)
}

/**
    Build an open failure for `path` from an ffmpeg-next error.
*/
pub(crate) fn open_error(path: &str, err: ffmpeg_next::Error) -> Error {
    Error::open(path, error_string(error_code(err)))
}

/**
    Build a codec error from an ffmpeg-next error.
*/
pub(crate) fn codec_error(err: ffmpeg_next::Error) -> Error {
    Error::codec(error_string(error_code(err)))
}
