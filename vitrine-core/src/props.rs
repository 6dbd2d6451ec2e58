/// The built-in showroom props: a floor, a bookshelf and a perfume bottle
use crate::error::RenderError;
use crate::geometry::{build, GeometryDescriptor, ShelfLayout};
use crate::mesh::{Material, Mesh, Submesh};
use crate::render::RenderBackend;
use crate::revolution::{NormalBand, RevolutionProfile};
use crate::scene::{MeshId, Scene};
use crate::transform::Transform;

pub const FLOOR_COLOR: [f32; 4] = [0.9, 0.9, 0.92, 1.0];
pub const WOOD_COLOR: [f32; 4] = [0.4, 0.2, 0.1, 1.0];
pub const GLASS_COLOR: [f32; 4] = [0.8, 0.85, 1.0, 0.9];
pub const METAL_COLOR: [f32; 4] = [0.8, 0.8, 0.85, 1.0];

/// `(radius, height)` outline of the bottle, base to cap.
pub const BOTTLE_PROFILE: [(f32, f32); 19] = [
    // base
    (0.0, -1.0),
    (0.3, -0.95),
    (0.35, -0.9),
    // body
    (0.45, -0.8),
    (0.5, -0.6),
    (0.52, -0.4),
    (0.52, -0.2),
    (0.5, 0.0),
    (0.45, 0.1),
    // neck
    (0.25, 0.2),
    (0.2, 0.3),
    (0.15, 0.4),
    (0.12, 0.5),
    (0.15, 0.6),
    // cap
    (0.2, 0.65),
    (0.22, 0.7),
    (0.2, 0.8),
    (0.18, 0.85),
    (0.0, 0.9),
];

pub const BOTTLE_SEGMENTS: u32 = 32;

/// First profile point of the cap band.
pub const CAP_START: usize = 14;

pub const BOTTLE_BANDS: [NormalBand; 4] = [
    NormalBand::new(3, -0.5),
    NormalBand::new(8, 0.1),
    NormalBand::new(CAP_START, 0.3),
    NormalBand::new(BOTTLE_PROFILE.len(), 0.5),
];

pub fn bottle_profile() -> RevolutionProfile {
    RevolutionProfile::new(BOTTLE_PROFILE.to_vec(), BOTTLE_SEGMENTS)
        .with_bands(BOTTLE_BANDS.to_vec())
}

pub fn bookshelf_layout() -> ShelfLayout {
    ShelfLayout {
        width: 1.0,
        height: 1.0,
        depth: 0.4,
        thickness: 0.05,
        shelf_count: 3,
    }
}

/// A flattened quad one unit below the origin.
pub fn floor() -> Mesh {
    let geometry = build(&GeometryDescriptor::Quad {
        half_width: 1.0,
        half_depth: 1.0,
    });
    Mesh::new("floor", geometry, Material::solid(FLOOR_COLOR))
        .with_transform(Transform::at(0.0, -1.0, 0.0).with_scale(4.0, 0.02, 4.0))
}

pub fn bookshelf() -> Mesh {
    let geometry = build(&bookshelf_layout().descriptor());
    Mesh::new("bookshelf", geometry, Material::solid(WOOD_COLOR))
        .with_transform(Transform::at(0.0, 0.0, -2.0).with_scale(1.5, 2.0, 0.8))
}

/// Glass body with a metal cap, split where the cap band begins.
pub fn perfume_bottle() -> Mesh {
    let profile = bottle_profile();
    let geometry = profile.sweep();
    let last_segment = BOTTLE_PROFILE.len() - 1;

    let submeshes = vec![
        Submesh {
            range: profile.segment_index_range(0..CAP_START),
            material: Material::solid(GLASS_COLOR).with_shininess(64.0),
        },
        Submesh {
            range: profile.segment_index_range(CAP_START..last_segment),
            material: Material::solid(METAL_COLOR).with_shininess(128.0),
        },
    ];

    Mesh::with_submeshes("perfume bottle", geometry, submeshes)
        .with_transform(Transform::at(0.5, 0.35, 2.0).with_scale(0.15, 0.15, 0.15))
}

/// Handles to the props placed by [`populate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Props {
    pub floor: MeshId,
    pub bookshelf: MeshId,
    pub bottle: MeshId,
}

/// Add the floor, bookshelf and bottle to `scene`, in that draw order.
pub fn populate<B: RenderBackend>(scene: &mut Scene<B>) -> Result<Props, RenderError> {
    let floor = scene.add_mesh(floor())?;
    let bookshelf = scene.add_mesh(bookshelf())?;
    let bottle = scene.add_mesh(perfume_bottle())?;

    log::info!("Showroom populated with {} meshes", scene.meshes().len());

    Ok(Props {
        floor,
        bookshelf,
        bottle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::scene::tests::{Call, RecordingBackend};
    use nalgebra::Vector3;

    #[test]
    fn test_bottle_band_biases() {
        let profile = bottle_profile();
        assert_eq!(profile.vertical_bias(0), -0.5);
        assert_eq!(profile.vertical_bias(2), -0.5);
        assert_eq!(profile.vertical_bias(3), 0.1);
        assert_eq!(profile.vertical_bias(8), 0.3);
        assert_eq!(profile.vertical_bias(13), 0.3);
        assert_eq!(profile.vertical_bias(14), 0.5);
        assert_eq!(profile.vertical_bias(18), 0.5);
    }

    #[test]
    fn test_bottle_submeshes_cover_every_index() {
        let bottle = perfume_bottle();
        let geometry = bottle.geometry();
        assert_eq!(geometry.vertex_count(), 33 * 19);
        assert_eq!(geometry.index_count(), 18 * 32 * 6);

        let [body, cap] = bottle.submeshes() else {
            panic!("expected two submeshes");
        };
        assert_eq!(body.range, 0..14 * 192);
        assert_eq!(cap.range, 14 * 192..geometry.index_count());
        assert_eq!(body.material.base_color, GLASS_COLOR);
        assert_eq!(cap.material.shininess_or_default(), 128.0);
    }

    #[test]
    fn test_bookshelf_is_eight_panels() {
        let shelf = bookshelf();
        assert_eq!(shelf.geometry().vertex_count(), 8 * 24);
        assert_eq!(shelf.geometry().index_count(), 8 * 36);
        assert_eq!(shelf.transform.scale, Vector3::new(1.5, 2.0, 0.8));
    }

    #[test]
    fn test_floor_placement() {
        let floor = floor();
        assert_eq!(floor.geometry().vertex_count(), 4);
        assert_eq!(floor.transform.position, Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_populate_and_render() {
        let config = SceneConfig::default();
        let mut scene = Scene::new(RecordingBackend::default(), &config, 640, 480);
        let props = populate(&mut scene).unwrap();

        assert_eq!(props.floor, MeshId::new(0));
        assert_eq!(props.bottle, MeshId::new(2));

        let before: Vec<_> = scene
            .meshes()
            .iter()
            .map(|m| (m.geometry().positions.len(), m.geometry().indices.len()))
            .collect();
        scene.render_frame();
        scene.render_frame();
        let after: Vec<_> = scene
            .meshes()
            .iter()
            .map(|m| (m.geometry().positions.len(), m.geometry().indices.len()))
            .collect();

        assert_eq!(before, after);
        assert_eq!(scene.backend().uploads, before);

        // Floor, bookshelf and two bottle runs, twice
        let draws = scene
            .backend()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Draw(_)))
            .count();
        assert_eq!(draws, 8);
    }
}
