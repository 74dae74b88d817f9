//! Matrix Stacks
//!
//! Three bounded stacks (modelview / projection / texture). Any mutation
//! marks the derived matrices dirty; the normal matrix and the
//! texture-matrix-identity flag are recomputed lazily at the next `begin`.

use crate::math3d::Mat4;

use super::op::MatrixMode;
use super::Context;

pub(crate) const MATRIX_STACK_DEPTHS: [usize; 3] = [32, 8, 8];

impl Context {
    #[inline]
    pub(crate) fn modelview(&self) -> &Mat4 {
        self.stacks[MatrixMode::ModelView.index()]
            .last()
            .expect("modelview stack empty")
    }

    #[inline]
    pub(crate) fn projection(&self) -> &Mat4 {
        self.stacks[MatrixMode::Projection.index()]
            .last()
            .expect("projection stack empty")
    }

    #[inline]
    pub(crate) fn texture_matrix(&self) -> &Mat4 {
        self.stacks[MatrixMode::Texture.index()]
            .last()
            .expect("texture stack empty")
    }

    fn current_matrix_mut(&mut self) -> &mut Mat4 {
        self.matrices_dirty = true;
        self.stacks[self.matrix_mode.index()]
            .last_mut()
            .expect("matrix stack empty")
    }

    pub(crate) fn exec_matrix_mode(&mut self, mode: MatrixMode) {
        self.matrix_mode = mode;
    }

    pub(crate) fn exec_push_matrix(&mut self) {
        let idx = self.matrix_mode.index();
        assert!(
            self.stacks[idx].len() < MATRIX_STACK_DEPTHS[idx],
            "matrix stack overflow"
        );
        let top = *self.stacks[idx].last().expect("matrix stack empty");
        self.stacks[idx].push(top);
    }

    pub(crate) fn exec_pop_matrix(&mut self) {
        let idx = self.matrix_mode.index();
        assert!(self.stacks[idx].len() > 1, "matrix stack underflow");
        self.stacks[idx].pop();
        self.matrices_dirty = true;
    }

    pub(crate) fn exec_load_identity(&mut self) {
        *self.current_matrix_mut() = Mat4::IDENTITY;
    }

    pub(crate) fn exec_load_matrix(&mut self, m: Mat4) {
        *self.current_matrix_mut() = m;
    }

    /// Post-multiply, per GL: C = C * M
    pub(crate) fn exec_mult_matrix(&mut self, m: Mat4) {
        let cur = self.current_matrix_mut();
        *cur = *cur * m;
    }

    /// Recompute derived matrices when dirty; called from `begin`
    pub(crate) fn update_matrices(&mut self) {
        if !self.matrices_dirty {
            return;
        }
        if self.lighting {
            self.normal_matrix = self.modelview().inverse().transpose();
        }
        self.texture_matrix_identity = *self.texture_matrix() == Mat4::IDENTITY;
        self.matrices_dirty = false;
    }
}
