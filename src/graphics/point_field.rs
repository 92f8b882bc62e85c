use bevy::{
    asset::RenderAssetUsages,
    pbr::{MaterialPipeline, MaterialPipelineKey, NotShadowCaster},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::{Indices, MeshVertexBufferLayoutRef, PrimitiveTopology},
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
        },
        view::NoFrustumCulling,
    },
};

use crate::prelude::*;

const SHADER_ASSET_PATH: &str = "shaders/point_field.wgsl";

// Billboard corners, in units of point size.
const CORNERS: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];

pub struct PointFieldRenderPlugin;

impl Plugin for PointFieldRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<PointFieldMaterial>::default())
            .init_resource::<DisplayedGalaxy<GalaxyHandle>>()
            .add_systems(Update, regenerate_galaxy);
    }
}

/// Marks the entity currently showing the galaxy.
#[derive(Component)]
pub struct GalaxyPoints;

/// Everything one installed field owns in the scene.
pub struct GalaxyHandle {
    entity: Entity,
    mesh: Handle<Mesh>,
    material: Handle<PointFieldMaterial>,
}

/// Installs fields as a single billboard mesh entity.
pub struct SceneDisplay<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<PointFieldMaterial>,
}

impl PointFieldDisplay for SceneDisplay<'_, '_, '_> {
    type Handle = GalaxyHandle;

    fn install(&mut self, field: PointField, style: &PointStyle) -> GalaxyHandle {
        let mesh = self.meshes.add(point_field_mesh(&field));
        let material = self.materials.add(PointFieldMaterial::from(style));
        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::IDENTITY,
                Visibility::Inherited,
                GalaxyPoints,
                NotShadowCaster,
                // the mesh bounds only cover point centres
                NoFrustumCulling,
            ))
            .id();

        GalaxyHandle {
            entity,
            mesh,
            material,
        }
    }

    fn release(&mut self, handle: GalaxyHandle) {
        self.commands.entity(handle.entity).despawn();
        self.meshes.remove(&handle.mesh);
        self.materials.remove(&handle.material);
    }
}

/// Only the newest request of the frame is built; older ones are already stale.
pub(crate) fn regenerate_galaxy(
    mut commands: Commands,
    mut requests: EventReader<RegenerationRequest>,
    mut displayed: ResMut<DisplayedGalaxy<GalaxyHandle>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<PointFieldMaterial>>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };

    let mut display = SceneDisplay {
        commands: &mut commands,
        meshes: &mut meshes,
        materials: &mut materials,
    };
    let displayed = &mut *displayed;

    match regenerate(&request.parameters, &mut displayed.slot, &mut display) {
        Ok(()) => {
            displayed.point_count = request.parameters.quantity as usize;
            displayed.generation = request.generation;
            info!(
                "Galaxy generation {} built with {} points",
                request.generation, request.parameters.quantity
            );
        }
        Err(err) => warn!("Galaxy generation {} rejected: {err}", request.generation),
    }
}

/// Expands every point into a camera-facing quad: four vertices sharing the point's centre
/// and color, told apart by their corner offset in UV_0.
pub fn point_field_mesh(field: &PointField) -> Mesh {
    let count = field.len();
    let mut positions = Vec::with_capacity(count * 4);
    let mut corners = Vec::with_capacity(count * 4);
    let mut colors = Vec::with_capacity(count * 4);
    let mut indices = Vec::with_capacity(count * 6);

    // validated fields stay under GalaxyParameters::MAX_QUANTITY, so every base fits in u32
    let bases = (0u32..).step_by(4);
    for ((position, color), base) in field.positions().iter().zip(field.colors()).zip(bases) {
        for corner in CORNERS {
            positions.push(*position);
            corners.push(corner);
            colors.push([color[0], color[1], color[2], 1.0]);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
#[bind_group_data(PointFieldMaterialKey)]
pub struct PointFieldMaterial {
    #[uniform(0)]
    pub size: f32,
    pub alpha_mode: AlphaMode,
    pub depth_write: bool,
    pub vertex_colors: bool,
}

impl From<&PointStyle> for PointFieldMaterial {
    fn from(style: &PointStyle) -> Self {
        Self {
            size: style.size,
            alpha_mode: if style.additive_blending {
                AlphaMode::Add
            } else {
                AlphaMode::Blend
            },
            depth_write: style.depth_write,
            vertex_colors: style.vertex_colors,
        }
    }
}

impl Material for PointFieldMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let mut attributes = vec![
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
        ];
        if key.bind_group_data.vertex_colors {
            attributes.push(Mesh::ATTRIBUTE_COLOR.at_shader_location(2));
            descriptor.vertex.shader_defs.push("VERTEX_COLORS".into());
            if let Some(fragment) = descriptor.fragment.as_mut() {
                fragment.shader_defs.push("VERTEX_COLORS".into());
            }
        }
        descriptor.vertex.buffers = vec![layout.0.get_layout(&attributes)?];

        if !key.bind_group_data.depth_write {
            if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
                depth_stencil.depth_write_enabled = false;
            }
        }
        Ok(())
    }
}

#[derive(Eq, PartialEq, Hash, Clone)]
pub struct PointFieldMaterialKey {
    depth_write: bool,
    vertex_colors: bool,
}

impl From<&PointFieldMaterial> for PointFieldMaterialKey {
    fn from(material: &PointFieldMaterial) -> Self {
        Self {
            depth_write: material.depth_write,
            vertex_colors: material.vertex_colors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::AssetPlugin;
    use bevy::render::mesh::VertexAttributeValues;

    fn headless_app(parameters: GalaxyParameters) -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            crate::galaxy::GalaxyParametersPlugin {
                initial: parameters,
            },
        ))
        .init_asset::<Mesh>()
        .init_asset::<PointFieldMaterial>()
        .init_resource::<DisplayedGalaxy<GalaxyHandle>>()
        .add_systems(Update, regenerate_galaxy);
        app
    }

    fn live_points(app: &mut App) -> usize {
        let mut query = app
            .world_mut()
            .query_filtered::<Entity, With<GalaxyPoints>>();
        query.iter(app.world()).count()
    }

    fn small() -> GalaxyParameters {
        GalaxyParameters {
            quantity: 1000,
            ..default()
        }
    }

    #[test]
    fn mesh_has_four_vertices_and_two_triangles_per_point() {
        let field = generate(&GalaxyParameters {
            quantity: 25,
            ..default()
        })
        .unwrap();
        let mesh = point_field_mesh(&field);

        assert_eq!(mesh.count_vertices(), 100);
        assert_eq!(mesh.indices().map(|indices| indices.len()), Some(150));

        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        assert_eq!(positions[4], field.positions()[1]);
        assert_eq!(positions[7], field.positions()[1]);

        let Some(VertexAttributeValues::Float32x4(colors)) = mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("missing colors");
        };
        let [r, g, b] = field.colors()[24];
        assert_eq!(colors[99], [r, g, b, 1.0]);

        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("missing u32 indices");
        };
        assert_eq!(&indices[144..], &[96, 97, 98, 96, 98, 99]);
    }

    #[test]
    fn material_follows_style() {
        let material = PointFieldMaterial::from(&PointStyle::from(&GalaxyParameters::default()));
        assert_eq!(material.size, 0.01);
        assert_eq!(material.alpha_mode, AlphaMode::Add);
        assert!(!material.depth_write);
        assert!(material.vertex_colors);
    }

    #[test]
    fn startup_installs_one_galaxy() {
        let mut app = headless_app(small());
        app.update();

        assert_eq!(live_points(&mut app), 1);
        let displayed = app.world().resource::<DisplayedGalaxy<GalaxyHandle>>();
        assert_eq!(displayed.point_count, 1000);
        assert_eq!(displayed.generation, 1);
    }

    #[test]
    fn committed_edits_replace_the_galaxy() {
        let mut app = headless_app(small());
        app.update();

        for quantity in [200u32, 300, 400] {
            let request = app
                .world_mut()
                .resource_mut::<ParameterStore>()
                .commit_edit(ParameterField::Quantity, quantity.into())
                .unwrap()
                .unwrap();
            app.world_mut().send_event(request);
            app.update();

            assert_eq!(live_points(&mut app), 1);
            assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
            assert_eq!(app.world().resource::<Assets<PointFieldMaterial>>().len(), 1);
            assert_eq!(
                app.world()
                    .resource::<DisplayedGalaxy<GalaxyHandle>>()
                    .point_count,
                quantity as usize
            );
        }
    }

    #[test]
    fn rejected_request_keeps_the_current_galaxy() {
        let mut app = headless_app(small());
        app.update();

        let request = app
            .world_mut()
            .resource_mut::<ParameterStore>()
            .commit_edit(ParameterField::Branches, 0u32.into())
            .unwrap()
            .unwrap();
        app.world_mut().send_event(request);
        app.update();

        assert_eq!(live_points(&mut app), 1);
        let displayed = app.world().resource::<DisplayedGalaxy<GalaxyHandle>>();
        assert_eq!(displayed.generation, 1);
        assert_eq!(displayed.point_count, 1000);
    }

    #[test]
    fn only_the_newest_request_per_frame_is_built() {
        let mut app = headless_app(small());
        app.update();

        let mut store = app.world_mut().resource_mut::<ParameterStore>();
        let first = store
            .commit_edit(ParameterField::Quantity, 150u32.into())
            .unwrap()
            .unwrap();
        let second = store
            .commit_edit(ParameterField::Quantity, 250u32.into())
            .unwrap()
            .unwrap();
        app.world_mut().send_event(first);
        app.world_mut().send_event(second);
        app.update();

        assert_eq!(live_points(&mut app), 1);
        let displayed = app.world().resource::<DisplayedGalaxy<GalaxyHandle>>();
        assert_eq!(displayed.point_count, 250);
        assert_eq!(displayed.generation, 3);
    }
}
