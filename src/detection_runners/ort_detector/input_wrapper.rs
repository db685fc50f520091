use std::ops::Deref;
use ndarray::{Array, IxDyn};

/// A model tensor, always `f32` on our side. [`super::OrtEngine`] converts it to the
/// session's element type on the way in and back on the way out.
#[derive(Debug, Clone, Default)]
pub struct X(pub Array<f32, IxDyn>);

impl From<Array<f32, IxDyn>> for X {
    fn from(x: Array<f32, IxDyn>) -> Self {
        Self(x)
    }
}

impl Deref for X {
    type Target = Array<f32, IxDyn>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl X {
    /// Blank input of the given shape, used for warm-up runs.
    pub fn zeros(shape: &[usize]) -> Self {
        Self(Array::zeros(IxDyn(shape)))
    }

    pub fn into_inner(self) -> Array<f32, IxDyn> {
        self.0
    }
}
