use std::{
    ffi::{c_void, CStr},
    ptr, slice,
};

use colorize::AnsiColor;
use gl::types::{GLchar, GLenum, GLsizei, GLuint};
use log::Level;

#[cfg(not(debug_assertions))]
pub const DEBUG_ENABLED: bool = false;
#[cfg(debug_assertions)]
pub const DEBUG_ENABLED: bool = true;

pub fn type_label(message_type: GLenum) -> &'static str {
    match message_type {
        gl::DEBUG_TYPE_ERROR => "ERROR",
        gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "DEPRECATED",
        gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "UNDEFINED",
        gl::DEBUG_TYPE_PORTABILITY => "PORTABILITY",
        gl::DEBUG_TYPE_PERFORMANCE => "PERFORMANCE",
        gl::DEBUG_TYPE_MARKER => "MARKER",
        _ => "OTHER",
    }
}

pub fn severity_level(severity: GLenum) -> Level {
    match severity {
        gl::DEBUG_SEVERITY_HIGH => Level::Error,
        gl::DEBUG_SEVERITY_MEDIUM => Level::Warn,
        gl::DEBUG_SEVERITY_LOW => Level::Info,
        _ => Level::Debug,
    }
}

fn colorize_message(level: Level, message: String) -> String {
    match level {
        Level::Error => message.red(),
        Level::Warn => message.yellow(),
        Level::Info => message.blue(),
        _ => message.green(),
    }
}

extern "system" fn gl_debug_callback(
    _source: GLenum,
    message_type: GLenum,
    id: GLuint,
    severity: GLenum,
    length: GLsizei,
    message: *const GLchar,
    _user_param: *mut c_void,
) {
    if message.is_null() {
        return;
    }

    let text = unsafe {
        if length >= 0 {
            String::from_utf8_lossy(slice::from_raw_parts(message as *const u8, length as usize))
        } else {
            CStr::from_ptr(message).to_string_lossy()
        }
    };

    let level = severity_level(severity);
    log::log!(
        level,
        "{}",
        colorize_message(
            level,
            format!("GL {} ({id}): {}", type_label(message_type), text.trim_end())
        )
    );
}

/// Routes driver debug messages into the logger while installed.
pub struct Debug;

impl Debug {
    pub fn install() -> Option<Self> {
        if !DEBUG_ENABLED {
            return None;
        }

        unsafe {
            gl::Enable(gl::DEBUG_OUTPUT);
            gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
            gl::DebugMessageCallback(Some(gl_debug_callback), ptr::null());
        }
        log::debug!("GL debug output enabled");

        Some(Debug)
    }
}

impl Drop for Debug {
    fn drop(&mut self) {
        unsafe {
            gl::DebugMessageCallback(None, ptr::null());
            gl::Disable(gl::DEBUG_OUTPUT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_maps_to_log_level() {
        assert_eq!(severity_level(gl::DEBUG_SEVERITY_HIGH), Level::Error);
        assert_eq!(severity_level(gl::DEBUG_SEVERITY_MEDIUM), Level::Warn);
        assert_eq!(severity_level(gl::DEBUG_SEVERITY_LOW), Level::Info);
        assert_eq!(severity_level(gl::DEBUG_SEVERITY_NOTIFICATION), Level::Debug);
    }

    #[test]
    fn message_types() {
        assert_eq!(type_label(gl::DEBUG_TYPE_PERFORMANCE), "PERFORMANCE");
        assert_eq!(type_label(gl::DEBUG_TYPE_OTHER), "OTHER");
    }

    #[test]
    fn colored_message_keeps_text() {
        assert!(colorize_message(Level::Error, "boom".into()).contains("boom"));
    }
}
