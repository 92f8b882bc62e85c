use bevy::prelude::*;

use super::{generate, GalaxyParameters, PointField};
use crate::error::Result;

/// How a field is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointStyle {
    pub size: f32,
    pub additive_blending: bool,
    pub depth_write: bool,
    pub vertex_colors: bool,
}

impl From<&GalaxyParameters> for PointStyle {
    fn from(params: &GalaxyParameters) -> Self {
        Self {
            size: params.size,
            additive_blending: true,
            depth_write: false,
            vertex_colors: true,
        }
    }
}

/// Whatever shows point fields on screen.
pub trait PointFieldDisplay {
    type Handle;

    fn install(&mut self, field: PointField, style: &PointStyle) -> Self::Handle;

    /// Frees everything `install` allocated for `handle` and takes it off screen.
    fn release(&mut self, handle: Self::Handle);
}

/// Replaces the field held in `slot` with one built from `params`.
///
/// Invalid parameters are rejected before anything is touched, leaving the old field on
/// screen. Otherwise the old field is released before the new one is generated, so at most
/// one field per slot is ever alive.
pub fn regenerate<D: PointFieldDisplay>(
    params: &GalaxyParameters,
    slot: &mut Option<D::Handle>,
    display: &mut D,
) -> Result<()> {
    params.validate()?;

    if let Some(previous) = slot.take() {
        display.release(previous);
    }

    let field = generate(params)?;
    *slot = Some(display.install(field, &PointStyle::from(params)));
    Ok(())
}

/// The slot the scene's galaxy lives in.
#[derive(Resource)]
pub struct DisplayedGalaxy<H: Send + Sync + 'static> {
    pub slot: Option<H>,
    pub point_count: usize,
    pub generation: u32,
}

impl<H: Send + Sync + 'static> Default for DisplayedGalaxy<H> {
    fn default() -> Self {
        Self {
            slot: None,
            point_count: 0,
            generation: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Install(usize),
        Release(u32),
    }

    /// Tracks live handles the way a scene graph would track live meshes.
    #[derive(Default)]
    struct CountingDisplay {
        next_id: u32,
        live: Vec<u32>,
        max_live: usize,
        calls: Vec<Call>,
    }

    impl PointFieldDisplay for CountingDisplay {
        type Handle = u32;

        fn install(&mut self, field: PointField, _style: &PointStyle) -> u32 {
            assert_eq!(field.flat_positions().len(), field.flat_colors().len());
            self.next_id += 1;
            self.live.push(self.next_id);
            self.max_live = self.max_live.max(self.live.len());
            self.calls.push(Call::Install(field.len()));
            self.next_id
        }

        fn release(&mut self, handle: u32) {
            let before = self.live.len();
            self.live.retain(|live| *live != handle);
            assert_eq!(self.live.len() + 1, before, "released unknown handle {handle}");
            self.calls.push(Call::Release(handle));
        }
    }

    fn params(quantity: u32) -> GalaxyParameters {
        GalaxyParameters {
            quantity,
            ..default()
        }
    }

    #[test]
    fn first_generation_installs_without_release() {
        let mut display = CountingDisplay::default();
        let mut slot = None;

        regenerate(&params(100), &mut slot, &mut display).unwrap();

        assert_eq!(slot, Some(1));
        assert_eq!(display.calls, vec![Call::Install(100)]);
    }

    #[test]
    fn regeneration_releases_before_installing() {
        let mut display = CountingDisplay::default();
        let mut slot = None;

        for quantity in [100, 200, 300, 400] {
            regenerate(&params(quantity), &mut slot, &mut display).unwrap();
        }

        assert_eq!(display.max_live, 1);
        assert_eq!(display.live, vec![4]);
        assert_eq!(
            display.calls,
            vec![
                Call::Install(100),
                Call::Release(1),
                Call::Install(200),
                Call::Release(2),
                Call::Install(300),
                Call::Release(3),
                Call::Install(400),
            ]
        );
    }

    #[test]
    fn invalid_parameters_keep_the_previous_field() {
        let mut display = CountingDisplay::default();
        let mut slot = None;
        regenerate(&params(100), &mut slot, &mut display).unwrap();

        let result = regenerate(&params(0), &mut slot, &mut display);

        assert!(result.is_err());
        assert_eq!(slot, Some(1));
        assert_eq!(display.live, vec![1]);
        assert_eq!(display.calls.len(), 1);
    }

    #[test]
    fn style_follows_point_size() {
        let style = PointStyle::from(&GalaxyParameters {
            size: 0.04,
            ..default()
        });
        assert_eq!(
            style,
            PointStyle {
                size: 0.04,
                additive_blending: true,
                depth_write: false,
                vertex_colors: true,
            }
        );
    }
}
