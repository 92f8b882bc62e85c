use std::f32::consts::TAU;
use std::time::Instant;

use bevy::prelude::*;
use rand::prelude::*;
use rayon::prelude::*;

use super::{ColorRamp, GalaxyParameters, PointField};
use crate::error::Result;

/// Builds a complete point field for `params`.
///
/// Points are placed on the rayon pool, each worker drawing from its own thread RNG, so two
/// calls with the same parameters give statistically similar but different fields. The call
/// only returns once every point is written.
pub fn generate(params: &GalaxyParameters) -> Result<PointField> {
    params.validate()?;

    let started = Instant::now();
    let ramp = ColorRamp::new(params.inside_color, params.outside_color);
    let count = params.quantity as usize;

    let mut positions = vec![[0.0; 3]; count];
    let mut colors = vec![[0.0; 3]; count];

    positions
        .par_iter_mut()
        .zip(colors.par_iter_mut())
        .enumerate()
        .for_each_init(rand::rng, |rng, (index, (position, color))| {
            (*position, *color) = sample_point(params, &ramp, index, rng);
        });

    debug!(
        "Placed {} points in {:.2} ms",
        count,
        started.elapsed().as_secs_f64() * 1000.0
    );

    Ok(PointField::from_buffers(positions, colors))
}

/// Sequential variant of [`generate`] drawing every sample from `rng`.
pub fn generate_with_rng<R: Rng + ?Sized>(
    params: &GalaxyParameters,
    rng: &mut R,
) -> Result<PointField> {
    params.validate()?;

    let ramp = ColorRamp::new(params.inside_color, params.outside_color);
    let (positions, colors): (Vec<_>, Vec<_>) = (0..params.quantity as usize)
        .map(|index| sample_point(params, &ramp, index, rng))
        .unzip();

    Ok(PointField::from_buffers(positions, colors))
}

/// Arm angle for point `index`. Arms are handed out round-robin, not at random.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches as usize;
    (index % branches) as f32 / branches as f32 * TAU
}

/// Places point `index` and returns its `(position, color)`.
///
/// Expects validated parameters: `radius` must be positive and `branches` non-zero.
pub fn sample_point<R: Rng + ?Sized>(
    params: &GalaxyParameters,
    ramp: &ColorRamp,
    index: usize,
    rng: &mut R,
) -> ([f32; 3], [f32; 3]) {
    let distance = rng.random_range(0.0..params.radius);
    let angle = branch_angle(index, params.branches) + distance * params.spin;

    let offset_x = scatter(rng.random_range(-0.5..0.5), params.randomness_power, rng);
    let offset_y = scatter(rng.random::<f32>(), params.randomness_power, rng);
    let offset_z = scatter(rng.random_range(-0.5..0.5), params.randomness_power, rng);

    let position = [
        angle.cos() * distance + offset_x,
        offset_y,
        angle.sin() * distance + offset_z,
    ];

    (position, ramp.sample(distance / params.radius))
}

// |u|^power with a coin-flip sign. Powers above 1 pull points toward the arm.
fn scatter<R: Rng + ?Sized>(sample: f32, power: f32, rng: &mut R) -> f32 {
    let magnitude = sample.abs().powf(power);
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}
