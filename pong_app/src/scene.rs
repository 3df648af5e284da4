//! The demo scene: a flat-colored triangle, a quad textured from the CPU
//! overlay surface, and a wireframe cube under a perspective camera.
//!
//! GL object names are owned through [`Handle`] guards, so programs,
//! buffers and vertex arrays are released deterministically when the
//! scene drops.

use nalgebra::{Matrix4, Perspective3, Point3, Rotation3, Vector3};

use pong_engine::gl;
use pong_engine::gles;
use pong_engine::gles::types::{GLint, GLsizei, GLsizeiptr, GLuint};
use pong_engine::handle::{Handle, ResourceCreationError};
use pong_engine::render;

use crate::raster::PixelSurface;

const TRIANGLE_VERTEX_SHADER: &str = "#version 300 es
in vec2 position;
void main()
{
    gl_Position = vec4(position.xy, 0.0, 1.0);
}
";

const TRIANGLE_FRAGMENT_SHADER: &str = "#version 300 es
precision mediump float;
out vec4 color;
void main()
{
    color = vec4(0.4, 0.8, 0.2, 1.0);
}
";

const QUAD_VERTEX_SHADER: &str = "#version 300 es
in vec2 position;
out vec2 UV;
void main()
{
    gl_Position = vec4(position.xy, 0.0, 1.0);
    UV = (position.xy + vec2(1, 1)) / 2.0;
    UV.y = -UV.y; // the software surface uses a top-left origin
}
";

const QUAD_FRAGMENT_SHADER: &str = "#version 300 es
precision mediump float;
out vec4 color;
in vec2 UV;
uniform sampler2D overlaySampler;
void main()
{
    color = texture(overlaySampler, UV).rgba;
}
";

const CUBE_VERTEX_SHADER: &str = "#version 300 es
in vec3 position;
uniform mat4 mvp;
void main()
{
    gl_Position = mvp * vec4(position, 1.0);
}
";

const CUBE_FRAGMENT_SHADER: &str = "#version 300 es
precision mediump float;
out vec4 color;
void main()
{
    color = vec4(0.9, 0.9, 0.9, 1.0);
}
";

/// One drawable primitive set; created once at startup, read-only during
/// the loop.
struct Renderable {
    program: Handle<GLuint>,
    vao: Handle<GLuint>,
    vbo: Handle<GLuint>,
    /// Null for non-indexed renderables.
    ebo: Handle<GLuint>,
    mode: u32,
    count: GLsizei,
}

impl Renderable {
    fn draw(&self) {
        unsafe {
            gl!(gles::UseProgram(self.program.raw()));
            gl!(gles::BindVertexArray(self.vao.raw()));
            if self.ebo.is_null() {
                gl!(gles::DrawArrays(self.mode, 0, self.count));
            } else {
                gl!(gles::DrawElements(
                    self.mode,
                    self.count,
                    gles::UNSIGNED_SHORT,
                    std::ptr::null()
                ));
            }
            gl!(gles::BindVertexArray(0));
            gl!(gles::UseProgram(0));
        }
    }
}

fn compile_program_handle(
    vertex_source: &str,
    fragment_source: &str,
) -> Result<Handle<GLuint>, ResourceCreationError> {
    Handle::acquire(
        || render::compile_program(vertex_source, fragment_source),
        |program| unsafe { gles::DeleteProgram(program) },
        "shader program",
    )
}

fn gen_vertex_array() -> Result<Handle<GLuint>, ResourceCreationError> {
    let mut name: GLuint = 0;
    unsafe {
        gl!(gles::GenVertexArrays(1, &mut name));
    }
    Handle::from_raw(
        name,
        |vao| unsafe { gles::DeleteVertexArrays(1, &vao) },
        "vertex array",
    )
}

fn gen_buffer() -> Result<Handle<GLuint>, ResourceCreationError> {
    let mut name: GLuint = 0;
    unsafe {
        gl!(gles::GenBuffers(1, &mut name));
    }
    Handle::from_raw(name, |vbo| unsafe { gles::DeleteBuffers(1, &vbo) }, "buffer")
}

unsafe fn upload_array_buffer(target: u32, data: &[u8], usage: u32) {
    gl!(gles::BufferData(
        target,
        data.len() as GLsizeiptr,
        data.as_ptr().cast(),
        usage
    ));
}

unsafe fn bind_position_attribute(program: GLuint, components: GLint) {
    let attribute = gl!(gles::GetAttribLocation(
        program,
        b"position\0".as_ptr().cast()
    ));
    gl!(gles::EnableVertexAttribArray(attribute as GLuint));
    gl!(gles::VertexAttribPointer(
        attribute as GLuint,
        components,
        gles::FLOAT,
        gles::FALSE,
        0,
        std::ptr::null()
    ));
}

/// All three demo renderables plus the cube's cached uniform location.
pub struct Scene {
    triangle: Renderable,
    quad: Renderable,
    cube: Renderable,
    cube_mvp: GLint,
}

impl Scene {
    /// Build every renderable. Must be called with a current GL context.
    pub fn create() -> Result<Self, ResourceCreationError> {
        let triangle = Self::build_triangle()?;
        let quad = Self::build_quad()?;
        let (cube, cube_mvp) = Self::build_cube()?;
        Ok(Self {
            triangle,
            quad,
            cube,
            cube_mvp,
        })
    }

    fn build_triangle() -> Result<Renderable, ResourceCreationError> {
        let vao = gen_vertex_array()?;
        unsafe {
            gl!(gles::BindVertexArray(vao.raw()));
        }

        let vbo = gen_buffer()?;
        let vertices: [f32; 6] = [0.0, 0.5, -0.5, -0.5, 0.5, -0.5];
        unsafe {
            gl!(gles::BindBuffer(gles::ARRAY_BUFFER, vbo.raw()));
            upload_array_buffer(
                gles::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                gles::STATIC_DRAW,
            );
        }

        let program = compile_program_handle(TRIANGLE_VERTEX_SHADER, TRIANGLE_FRAGMENT_SHADER)?;
        unsafe {
            bind_position_attribute(program.raw(), 2);
            gl!(gles::BindVertexArray(0));
        }

        Ok(Renderable {
            program,
            vao,
            vbo,
            ebo: Handle::null(),
            mode: gles::TRIANGLES,
            count: 3,
        })
    }

    fn build_quad() -> Result<Renderable, ResourceCreationError> {
        let vao = gen_vertex_array()?;
        unsafe {
            gl!(gles::BindVertexArray(vao.raw()));
        }

        let vbo = gen_buffer()?;
        let vertices: [f32; 12] = [
            -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, //
            -1.0, 1.0, 1.0, -1.0, 1.0, 1.0,
        ];
        unsafe {
            gl!(gles::BindBuffer(gles::ARRAY_BUFFER, vbo.raw()));
            upload_array_buffer(
                gles::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                gles::STATIC_DRAW,
            );
        }

        let program = compile_program_handle(QUAD_VERTEX_SHADER, QUAD_FRAGMENT_SHADER)?;
        unsafe {
            bind_position_attribute(program.raw(), 2);
            gl!(gles::BindVertexArray(0));
        }

        Ok(Renderable {
            program,
            vao,
            vbo,
            ebo: Handle::null(),
            mode: gles::TRIANGLES,
            count: 6,
        })
    }

    fn build_cube() -> Result<(Renderable, GLint), ResourceCreationError> {
        let vao = gen_vertex_array()?;
        unsafe {
            gl!(gles::BindVertexArray(vao.raw()));
        }

        let vbo = gen_buffer()?;
        // Unit cube corners around the origin.
        let vertices: [f32; 24] = [
            -0.5, -0.5, -0.5, //
            0.5, -0.5, -0.5, //
            0.5, 0.5, -0.5, //
            -0.5, 0.5, -0.5, //
            -0.5, -0.5, 0.5, //
            0.5, -0.5, 0.5, //
            0.5, 0.5, 0.5, //
            -0.5, 0.5, 0.5,
        ];
        unsafe {
            gl!(gles::BindBuffer(gles::ARRAY_BUFFER, vbo.raw()));
            upload_array_buffer(
                gles::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                gles::STATIC_DRAW,
            );
        }

        let ebo = gen_buffer()?;
        // The cube's 12 edges.
        let edges: [u16; 24] = [
            0, 1, 1, 2, 2, 3, 3, 0, // back face
            4, 5, 5, 6, 6, 7, 7, 4, // front face
            0, 4, 1, 5, 2, 6, 3, 7, // connecting edges
        ];
        unsafe {
            gl!(gles::BindBuffer(gles::ELEMENT_ARRAY_BUFFER, ebo.raw()));
            upload_array_buffer(
                gles::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&edges),
                gles::STATIC_DRAW,
            );
        }

        let program = compile_program_handle(CUBE_VERTEX_SHADER, CUBE_FRAGMENT_SHADER)?;
        let mvp = unsafe {
            bind_position_attribute(program.raw(), 3);
            gl!(gles::BindVertexArray(0));

            gl!(gles::GetUniformLocation(
                program.raw(),
                b"mvp\0".as_ptr().cast()
            ))
        };

        Ok((
            Renderable {
                program,
                vao,
                vbo,
                ebo,
                mode: gles::LINES,
                count: 24,
            },
            mvp,
        ))
    }

    /// Draw the flat triangle.
    pub fn draw_triangle(&self) {
        self.triangle.draw();
    }

    /// Draw the wireframe cube rotated by `rotation` radians around the
    /// vertical axis, under a perspective camera.
    pub fn draw_cube(&self, rotation: f32, aspect: f32) {
        let projection = Perspective3::new(aspect, std::f32::consts::FRAC_PI_4, 0.1, 100.0);
        let view = Matrix4::look_at_rh(
            &Point3::new(0.0, 1.0, 3.0),
            &Point3::origin(),
            &Vector3::y(),
        );
        let model = Rotation3::from_axis_angle(&Vector3::y_axis(), rotation).to_homogeneous();
        let mvp: Matrix4<f32> = projection.to_homogeneous() * view * model;

        unsafe {
            gl!(gles::UseProgram(self.cube.program.raw()));
            gl!(gles::UniformMatrix4fv(
                self.cube_mvp,
                1,
                gles::FALSE,
                mvp.as_slice().as_ptr()
            ));
            gl!(gles::UseProgram(0));
        }
        self.cube.draw();
    }

    /// Upload the overlay surface as a throwaway texture and draw the
    /// fullscreen quad with it.
    pub fn draw_overlay(&self, surface: &PixelSurface) -> Result<(), ResourceCreationError> {
        let mut name: GLuint = 0;
        unsafe {
            gl!(gles::GenTextures(1, &mut name));
        }
        let texture = Handle::from_raw(
            name,
            |texture| unsafe { gles::DeleteTextures(1, &texture) },
            "overlay texture",
        )?;

        unsafe {
            gl!(gles::ActiveTexture(gles::TEXTURE0));
            gl!(gles::BindTexture(gles::TEXTURE_2D, texture.raw()));
            gl!(gles::TexImage2D(
                gles::TEXTURE_2D,
                0,
                gles::RGBA as GLint,
                surface.width() as GLsizei,
                surface.height() as GLsizei,
                0,
                gles::RGBA,
                gles::UNSIGNED_BYTE,
                surface.pixels().as_ptr().cast()
            ));
            gl!(gles::TexParameteri(
                gles::TEXTURE_2D,
                gles::TEXTURE_MIN_FILTER,
                gles::LINEAR as GLint
            ));
            gl!(gles::TexParameteri(
                gles::TEXTURE_2D,
                gles::TEXTURE_MAG_FILTER,
                gles::LINEAR as GLint
            ));
        }

        self.quad.draw();

        unsafe {
            gl!(gles::BindTexture(gles::TEXTURE_2D, 0));
        }

        Ok(())
    }
}
