//! OBJ decoding for fetched model bytes.

use cgmath::{InnerSpace, Vector3};

use crate::viewer::bounds::Aabb;
use crate::viewer::error::ViewerError;

/// CPU-side mesh data decoded from the asset.
#[derive(Debug)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// A decoded model, recentered so its bounding volume sits at the origin.
#[derive(Debug)]
pub struct LoadedModel {
    pub meshes: Vec<MeshData>,
    pub bounds: Aabb,
}

pub fn decode_obj(bytes: &[u8]) -> Result<LoadedModel, ViewerError> {
    let mut reader = std::io::BufReader::new(std::io::Cursor::new(bytes));

    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        // Materials come from sibling .mtl files which a byte buffer does
        // not have; the scene shades with a fixed material instead.
        |_path| Err(tobj::LoadError::OpenFileFailed),
    )
    .map_err(|e| ViewerError::AssetLoad(e.to_string()))?;

    let mut meshes = Vec::new();
    let mut bounds: Option<Aabb> = None;

    for model in models {
        let mesh = model.mesh;
        if mesh.positions.is_empty() {
            continue;
        }

        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();

        if let Some(mesh_bounds) = Aabb::from_positions(&positions) {
            bounds = Some(match bounds {
                Some(b) => b.union(mesh_bounds),
                None => mesh_bounds,
            });
        }

        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        } else {
            compute_vertex_normals(&positions, &mesh.indices)
        };

        meshes.push(MeshData {
            name: model.name,
            positions,
            normals,
            indices: mesh.indices,
        });
    }

    let bounds = bounds
        .ok_or_else(|| ViewerError::AssetLoad("asset contains no geometry".to_string()))?;

    // Recenter at the origin; the camera frames around (0, 0, 0).
    let center = bounds.center();
    for mesh in &mut meshes {
        for p in &mut mesh.positions {
            p[0] -= center.x;
            p[1] -= center.y;
            p[2] -= center.z;
        }
    }
    let bounds = bounds.translated(-center);

    Ok(LoadedModel { meshes, bounds })
}

/// Area-weighted vertex normals for meshes that ship without them.
fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vector3::new(0.0f32, 0.0, 0.0); positions.len()];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = Vector3::from(positions[i0]);
        let p1 = Vector3::from(positions[i1]);
        let p2 = Vector3::from(positions[i2]);
        let face_normal = (p1 - p0).cross(p2 - p0);
        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    normals
        .into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                let n = n.normalize();
                [n.x, n.y, n.z]
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT_QUAD_OBJ: &str = "\
o quad
v 1.0 0.0 2.0
v 3.0 0.0 2.0
v 3.0 2.0 2.0
v 1.0 2.0 2.0
f 1 2 3
f 1 3 4
";

    #[test]
    fn test_decode_recenters_at_origin() {
        let model = decode_obj(UNIT_QUAD_OBJ.as_bytes()).unwrap();
        assert_eq!(model.meshes.len(), 1);
        let center = model.bounds.center();
        assert!(center.x.abs() < 1e-6);
        assert!(center.y.abs() < 1e-6);
        assert!(center.z.abs() < 1e-6);
        // Extents survive the translation.
        assert!((model.bounds.max.x - 1.0).abs() < 1e-6);
        assert!((model.bounds.max.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_computes_missing_normals() {
        let model = decode_obj(UNIT_QUAD_OBJ.as_bytes()).unwrap();
        let mesh = &model.meshes[0];
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        // The quad faces +Z.
        for n in &mesh.normals {
            assert!((n[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_decode_rejects_empty_geometry() {
        let err = decode_obj(b"# nothing here\n").unwrap_err();
        assert!(matches!(err, ViewerError::AssetLoad(_)));
    }
}
