use std::{
    ffi::CString,
    fs,
    path::{Path, PathBuf},
    ptr,
};

use anyhow::{bail, Context, Result};
use gl::types::{GLbitfield, GLenum, GLint, GLuint};

use crate::utils::info_log_to_string;

pub const VERTEX_SHADER_FILE: &str = "triangle-vs.glsl";
pub const FRAGMENT_SHADER_FILE: &str = "triangle-fs.glsl";

const VERTEX_SHADER: &str = include_str!("../shaders/triangle-vs.glsl");
const FRAGMENT_SHADER: &str = include_str!("../shaders/triangle-fs.glsl");

pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn embedded() -> Self {
        Self {
            vertex: VERTEX_SHADER.to_owned(),
            fragment: FRAGMENT_SHADER.to_owned(),
        }
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let read = |name: &str| -> Result<String> {
            let path: PathBuf = dir.join(name);
            fs::read_to_string(&path)
                .with_context(|| format!("Couldn't read shader {}", path.display()))
        };

        Ok(Self {
            vertex: read(VERTEX_SHADER_FILE)?,
            fragment: read(FRAGMENT_SHADER_FILE)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn shader_type(self) -> GLenum {
        match self {
            Stage::Vertex => gl::VERTEX_SHADER,
            Stage::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    pub fn pipeline_bit(self) -> GLbitfield {
        match self {
            Stage::Vertex => gl::VERTEX_SHADER_BIT,
            Stage::Fragment => gl::FRAGMENT_SHADER_BIT,
        }
    }
}

/// A single-stage separable program.
#[derive(Default)]
pub struct ShaderProgram {
    pub program: GLuint,
}

impl ShaderProgram {
    pub fn new(stage: Stage, source: &str) -> Result<Self> {
        let source = CString::new(source).context("Shader source contains a NUL byte")?;
        let sources = [source.as_ptr()];

        let program = unsafe { gl::CreateShaderProgramv(stage.shader_type(), 1, sources.as_ptr()) };
        if program == 0 {
            bail!("glCreateShaderProgramv failed for the {stage:?} stage");
        }

        let mut linked = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut linked) };

        if linked == gl::FALSE as GLint {
            let info_log = program_info_log(program);
            unsafe { gl::DeleteProgram(program) };
            log::error!("Error : {info_log}");
            bail!("{stage:?} shader failed to build: {info_log}");
        }

        log::info!("Shader compilation : OK");

        Ok(Self { program })
    }

    pub fn uniform_location(&self, name: &str) -> Result<Option<GLint>> {
        let c_name = CString::new(name)?;
        let location = unsafe { gl::GetUniformLocation(self.program, c_name.as_ptr()) };

        if location < 0 {
            log::warn!("Uniform `{name}` is not active");
            Ok(None)
        } else {
            Ok(Some(location))
        }
    }

    pub fn set_f32(&self, location: Option<GLint>, value: f32) {
        if let Some(location) = location {
            unsafe { gl::ProgramUniform1f(self.program, location, value) };
        }
    }

    pub fn free(&mut self) {
        if self.program != 0 {
            unsafe { gl::DeleteProgram(self.program) };
            self.program = 0;
        }
    }
}

#[derive(Default)]
pub struct Pipeline {
    pub pipeline: GLuint,
}

impl Pipeline {
    pub fn new(vertex: &ShaderProgram, fragment: &ShaderProgram) -> Result<Self> {
        let mut pipeline = 0;

        unsafe {
            gl::CreateProgramPipelines(1, &mut pipeline);
            gl::UseProgramStages(pipeline, Stage::Vertex.pipeline_bit(), vertex.program);
            gl::UseProgramStages(pipeline, Stage::Fragment.pipeline_bit(), fragment.program);
            gl::ValidateProgramPipeline(pipeline);
        }

        let mut valid = 0;
        unsafe { gl::GetProgramPipelineiv(pipeline, gl::VALIDATE_STATUS, &mut valid) };

        if valid == gl::FALSE as GLint {
            let info_log = pipeline_info_log(pipeline);
            unsafe { gl::DeleteProgramPipelines(1, &pipeline) };
            log::error!("Error : {info_log}");
            bail!("Program pipeline failed validation: {info_log}");
        }

        log::info!("Pipeline : OK");

        Ok(Self { pipeline })
    }

    pub fn bind(&self) {
        unsafe { gl::BindProgramPipeline(self.pipeline) };
    }

    pub fn free(&mut self) {
        if self.pipeline != 0 {
            unsafe { gl::DeleteProgramPipelines(1, &self.pipeline) };
            self.pipeline = 0;
        }
    }
}

fn program_info_log(program: GLuint) -> String {
    let mut length = 0;
    unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length) };

    // length counts the NUL terminator
    let mut buf = vec![0u8; length.max(1) as usize];
    unsafe {
        gl::GetProgramInfoLog(program, length, ptr::null_mut(), buf.as_mut_ptr() as _);
    }

    info_log_to_string(&buf)
}

fn pipeline_info_log(pipeline: GLuint) -> String {
    let mut length = 0;
    unsafe { gl::GetProgramPipelineiv(pipeline, gl::INFO_LOG_LENGTH, &mut length) };

    let mut buf = vec![0u8; length.max(1) as usize];
    unsafe {
        gl::GetProgramPipelineInfoLog(pipeline, length, ptr::null_mut(), buf.as_mut_ptr() as _);
    }

    info_log_to_string(&buf)
}
