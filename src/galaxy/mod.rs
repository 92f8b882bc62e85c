use bevy::prelude::*;

mod display;
mod generator;
mod parameter_store;
mod parameters;
mod point_field;

pub use display::{regenerate, DisplayedGalaxy, PointFieldDisplay, PointStyle};
pub use generator::{branch_angle, generate, generate_with_rng, sample_point};
pub use parameter_store::{ParameterStore, RegenerationRequest};
pub use parameters::{GalaxyParameters, ParameterBounds, ParameterField, ParameterValue};
pub use point_field::{ColorRamp, PointField};

/// Owns the parameter store and turns startup into the first regeneration request.
pub struct GalaxyParametersPlugin {
    pub initial: GalaxyParameters,
}

impl Default for GalaxyParametersPlugin {
    fn default() -> Self {
        Self {
            initial: GalaxyParameters::default(),
        }
    }
}

impl Plugin for GalaxyParametersPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ParameterStore::new(self.initial.clone()))
            .add_event::<RegenerationRequest>()
            .add_systems(Startup, request_initial_galaxy);
    }
}

fn request_initial_galaxy(
    mut store: ResMut<ParameterStore>,
    mut requests: EventWriter<RegenerationRequest>,
) {
    requests.write(store.request_full());
}
