use bevy::prelude::*;

mod point_field;

pub use point_field::{
    point_field_mesh, GalaxyHandle, GalaxyPoints, PointFieldMaterial, PointFieldRenderPlugin,
    SceneDisplay,
};

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PointFieldRenderPlugin);
    }
}
