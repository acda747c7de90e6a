use anyhow::{bail, Result};
use gl::types::GLenum;
use glutin::{config::Config, prelude::*};

pub fn gl_config_picker(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    // glutin-winit wants a config back, an empty set has nothing to report through
    configs
        .max_by_key(|config| config.num_samples())
        .expect("no GL config matches the default template")
}

pub fn error_name(code: GLenum) -> String {
    match code {
        gl::INVALID_ENUM => "GL_INVALID_ENUM".into(),
        gl::INVALID_VALUE => "GL_INVALID_VALUE".into(),
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION".into(),
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW".into(),
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW".into(),
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY".into(),
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION".into(),
        gl::CONTEXT_LOST => "GL_CONTEXT_LOST".into(),
        other => format!("0x{other:04X}"),
    }
}

/// Drains the GL error queue, failing if anything was raised.
pub fn check_gl_error() -> Result<()> {
    let mut errors = Vec::new();

    loop {
        let code = unsafe { gl::GetError() };
        // GL_CONTEXT_LOST keeps being reported, draining it would never end
        if code == gl::NO_ERROR || errors.len() >= 16 {
            break;
        }
        errors.push(error_name(code));
    }

    if !errors.is_empty() {
        bail!("OpenGL error: {}", errors.join(", "));
    }

    Ok(())
}

/// Driver info logs come NUL terminated and often end with a newline.
pub fn info_log_to_string(log: &[u8]) -> String {
    let end = log.iter().position(|&b| b == 0).unwrap_or(log.len());

    String::from_utf8_lossy(&log[..end]).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_errors() {
        assert_eq!(error_name(gl::INVALID_OPERATION), "GL_INVALID_OPERATION");
        assert_eq!(error_name(gl::OUT_OF_MEMORY), "GL_OUT_OF_MEMORY");
    }

    #[test]
    fn unknown_error_as_hex() {
        assert_eq!(error_name(0x1234), "0x1234");
    }

    #[test]
    fn info_log_strips_terminator() {
        assert_eq!(
            info_log_to_string(b"0(3) : error C0000: syntax error\n\0"),
            "0(3) : error C0000: syntax error"
        );
    }

    #[test]
    fn info_log_without_terminator() {
        assert_eq!(info_log_to_string(b"link failed"), "link failed");
        assert_eq!(info_log_to_string(b""), "");
    }

    #[test]
    fn info_log_invalid_utf8() {
        assert_eq!(info_log_to_string(b"bad \xFF byte\0garbage"), "bad \u{FFFD} byte");
    }
}
