use std::mem::{size_of, size_of_val};

use anyhow::{bail, Result};
use gl::types::{GLsizei, GLsizeiptr, GLuint};
use ultraviolet::Vec3;

pub const POSITION_ATTRIBUTE: GLuint = 0;
pub const POSITION_BINDING: GLuint = 0;

#[derive(Default)]
pub struct Buffer {
    pub buffer: GLuint,
    size: usize,
}

impl Buffer {
    pub fn new<T: Copy>(data: &[T]) -> Result<Self> {
        let size = size_of_val(data);
        let Ok(gl_size) = GLsizeiptr::try_from(size) else {
            bail!("Buffer too large: {size} bytes");
        };

        let mut buffer = 0;
        unsafe {
            gl::CreateBuffers(1, &mut buffer);
            gl::NamedBufferData(buffer, gl_size, data.as_ptr() as _, gl::STATIC_DRAW);
        }

        if buffer == 0 {
            bail!("glCreateBuffers returned no buffer");
        }

        Ok(Self { buffer, size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn free(&mut self) {
        if self.buffer != 0 {
            unsafe { gl::DeleteBuffers(1, &self.buffer) };
            self.buffer = 0;
        }
    }
}

/// Vertex array reading tightly packed `Vec3` positions on attribute 0.
#[derive(Default)]
pub struct VertexArray {
    pub array: GLuint,
}

impl VertexArray {
    pub fn new(vertex_buffer: &Buffer, index_buffer: &Buffer) -> Self {
        let mut array = 0;

        unsafe {
            gl::CreateVertexArrays(1, &mut array);

            gl::VertexArrayAttribFormat(array, POSITION_ATTRIBUTE, 3, gl::FLOAT, gl::FALSE, 0);
            gl::EnableVertexArrayAttrib(array, POSITION_ATTRIBUTE);
            gl::VertexArrayVertexBuffer(
                array,
                POSITION_BINDING,
                vertex_buffer.buffer,
                0,
                size_of::<Vec3>() as GLsizei,
            );
            gl::VertexArrayAttribBinding(array, POSITION_ATTRIBUTE, POSITION_BINDING);
            gl::VertexArrayElementBuffer(array, index_buffer.buffer);
        }

        Self { array }
    }

    pub fn bind(&self) {
        unsafe { gl::BindVertexArray(self.array) };
    }

    pub fn free(&mut self) {
        if self.array != 0 {
            unsafe { gl::DeleteVertexArrays(1, &self.array) };
            self.array = 0;
        }
    }
}
