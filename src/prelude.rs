pub use crate::error::GalaxyError;
pub use crate::galaxy::{
    generate, generate_with_rng, regenerate, DisplayedGalaxy, GalaxyParameters, ParameterField,
    ParameterStore, ParameterValue, PointField, PointFieldDisplay, PointStyle,
    RegenerationRequest,
};
