//! Fixed-function OpenGL 1.1 calls against the current WGL context

use windows_sys::Win32::Graphics::OpenGL::{
    glBegin, glClear, glClearColor, glClearDepth, glColor3f, glDepthFunc, glDisable, glEnable, glEnd, glHint,
    glLoadIdentity, glLoadMatrixf, glMatrixMode, glRotatef, glShadeModel, glTranslatef, glVertex3f, glViewport,
    GL_COLOR_BUFFER_BIT, GL_DEPTH_BUFFER_BIT, GL_DEPTH_TEST, GL_DONT_CARE, GL_FASTEST, GL_FLAT, GL_LEQUAL, GL_LESS,
    GL_MODELVIEW, GL_NICEST, GL_PERSPECTIVE_CORRECTION_HINT, GL_PROJECTION, GL_QUADS, GL_SMOOTH, GL_TRIANGLES,
};

use super::Win32Backend;
use crate::foundation::math::Vec3;
use crate::render::{
    ColoredVertex, DepthFunc, PerspectiveHint, Primitive, Projection, RenderState, Renderer, Rgba, ShadeModel,
};

fn to_gl_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl Renderer for Win32Backend {
    fn apply_projection(&mut self, projection: &Projection) {
        let viewport = projection.viewport;
        unsafe {
            glViewport(
                viewport.x,
                viewport.y,
                to_gl_int(viewport.width),
                to_gl_int(viewport.height),
            );
            glMatrixMode(GL_PROJECTION);
            // nalgebra stores column-major, which is what glLoadMatrixf expects
            glLoadMatrixf(projection.matrix.as_ptr());
            glMatrixMode(GL_MODELVIEW);
            glLoadIdentity();
        }
    }

    fn apply_render_state(&mut self, state: &RenderState) {
        let shade_model = match state.shade_model {
            ShadeModel::Flat => GL_FLAT,
            ShadeModel::Smooth => GL_SMOOTH,
        };
        let depth_func = match state.depth_func {
            DepthFunc::Less => GL_LESS,
            DepthFunc::LessOrEqual => GL_LEQUAL,
        };
        let hint = match state.perspective_hint {
            PerspectiveHint::DontCare => GL_DONT_CARE,
            PerspectiveHint::Fastest => GL_FASTEST,
            PerspectiveHint::Nicest => GL_NICEST,
        };

        unsafe {
            glShadeModel(shade_model);
            glClearDepth(state.clear_depth);
            if state.depth_test {
                glEnable(GL_DEPTH_TEST);
            } else {
                glDisable(GL_DEPTH_TEST);
            }
            glDepthFunc(depth_func);
            glHint(GL_PERSPECTIVE_CORRECTION_HINT, hint);
        }
        self.set_clear_color(state.clear_color);
    }

    fn set_clear_color(&mut self, color: Rgba) {
        unsafe { glClearColor(color.r, color.g, color.b, color.a) }
    }

    fn clear(&mut self) {
        unsafe { glClear(GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT) }
    }

    fn load_identity(&mut self) {
        unsafe { glLoadIdentity() }
    }

    fn translate(&mut self, offset: Vec3) {
        unsafe { glTranslatef(offset.x, offset.y, offset.z) }
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) {
        unsafe { glRotatef(degrees, axis.x, axis.y, axis.z) }
    }

    fn draw(&mut self, primitive: Primitive, vertices: &[ColoredVertex]) {
        let mode = match primitive {
            Primitive::Triangles => GL_TRIANGLES,
            Primitive::Quads => GL_QUADS,
        };
        unsafe {
            glBegin(mode);
            for vertex in vertices {
                glColor3f(vertex.color.x, vertex.color.y, vertex.color.z);
                glVertex3f(vertex.position.x, vertex.position.y, vertex.position.z);
            }
            glEnd();
        }
    }
}
