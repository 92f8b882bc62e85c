use bevy::prelude::*;

/// One generation's worth of points. Index `i` of `colors` belongs to index `i` of `positions`.
///
/// Only the generator builds these, so both buffers always hold the same number of points.
#[derive(Clone, Debug, PartialEq)]
pub struct PointField {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl PointField {
    pub(crate) fn from_buffers(positions: Vec<[f32; 3]>, colors: Vec<[f32; 3]>) -> Self {
        debug_assert_eq!(positions.len(), colors.len());
        Self { positions, colors }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `x0, y0, z0, x1, ...`, the layout a GPU vertex buffer wants.
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn flat_colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Linear blend from the galactic core color to the rim color.
#[derive(Clone, Copy, Debug)]
pub struct ColorRamp {
    inside: Vec3,
    outside: Vec3,
}

impl ColorRamp {
    pub fn new(inside: Color, outside: Color) -> Self {
        Self {
            inside: linear_rgb(inside),
            outside: linear_rgb(outside),
        }
    }

    pub fn sample(&self, t: f32) -> [f32; 3] {
        self.inside.lerp(self.outside, t).to_array()
    }
}

fn linear_rgb(color: Color) -> Vec3 {
    let linear = LinearRgba::from(color);
    vec3(linear.red, linear.green, linear.blue)
}
