//! 打包流程的端到端测试

use mesh_packer::core::error::{MeshLoadError, MeshPackError};
use mesh_packer::geometry::loaders::{load_model_from_path, ObjBuffer};
use mesh_packer::geometry::model::{Face, ParsedModel, RawAttributes, Shape};
use mesh_packer::geometry::packer::{load_model, pack_model};
use mesh_packer::geometry::PackedVertex;

const CUBE: &str = "\
o cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
vn 0 0 -1
vn 0 0 1
vn 0 -1 0
vn 0 1 0
vn -1 0 0
vn 1 0 0
f 1//1 4//1 3//1 2//1
f 5//2 6//2 7//2 8//2
f 1//3 2//3 6//3 5//3
f 4//4 8//4 7//4 3//4
f 1//5 5//5 8//5 4//5
f 2//6 3//6 7//6 6//6
";

fn positions_model(positions: Vec<f32>, faces: Vec<Face>) -> ParsedModel {
    ParsedModel::new(
        RawAttributes {
            positions,
            ..Default::default()
        },
        vec![Shape::new("shape", faces)],
    )
}

fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
    for k in 0..3 {
        assert!(
            (actual[k] - expected[k]).abs() < 1e-5,
            "{:?} != {:?}",
            actual,
            expected
        );
    }
}

fn assert_index_invariants(vertices: &[PackedVertex], indices: &[u32]) {
    assert_eq!(indices.len() % 3, 0);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
}

#[test]
fn test_single_triangle() {
    let model = positions_model(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        vec![Face::from_positions(0, 1, 2)],
    );

    let loaded = load_model(&model, false).unwrap();

    assert_eq!(loaded.buffer.indices, vec![0, 1, 2]);
    assert_eq!(loaded.buffer.vertex_count(), 3);
    for vertex in &loaded.buffer.vertices {
        assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertex.texcoord, [0.0, 0.0]);
    }
}

#[test]
fn test_cube_from_obj_text() {
    let loaded = load_model(&ObjBuffer(CUBE.as_bytes()), false).unwrap();
    let buffer = &loaded.buffer;

    // 6 个面各 4 个角，法线不同的角点不会焊接
    assert_eq!(buffer.vertex_count(), 24);
    assert_eq!(buffer.index_count(), 36);
    assert_eq!(buffer.subsets.len(), 1);
    assert_index_invariants(&buffer.vertices, &buffer.indices);
    assert!(buffer.validate().is_ok());

    assert_eq!(loaded.bounds.lower(), Some([0.0, 0.0, 0.0]));
    assert_eq!(loaded.bounds.upper(), Some([1.0, 1.0, 1.0]));
}

#[test]
fn test_cube_from_file() {
    let path = std::env::temp_dir().join(format!("mesh_packer_cube_{}.obj", std::process::id()));
    std::fs::write(&path, CUBE).unwrap();

    let loaded = load_model_from_path(&path, true);
    let _ = std::fs::remove_file(&path);
    let loaded = loaded.unwrap();

    assert_eq!(loaded.buffer.vertex_count(), 24);
    let name = loaded.buffer.name.as_deref().unwrap();
    assert!(name.starts_with("mesh_packer_cube_"));
    assert_eq!(loaded.bounds.lower(), Some([-1.0, -1.0, -1.0]));
    assert_eq!(loaded.bounds.upper(), Some([1.0, 1.0, 1.0]));
}

#[test]
fn test_position_weld_threshold() {
    let close = positions_model(
        vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            0.0005, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
        ],
        vec![Face::from_positions(0, 1, 2), Face::from_positions(3, 4, 5)],
    );
    let loaded = pack_model(&close, false).unwrap();
    assert_eq!(loaded.buffer.vertex_count(), 3);
    assert_eq!(loaded.buffer.indices, vec![0, 1, 2, 0, 1, 2]);

    let far = positions_model(
        vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            0.002, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
        ],
        vec![Face::from_positions(0, 1, 2), Face::from_positions(3, 4, 5)],
    );
    let loaded = pack_model(&far, false).unwrap();
    assert_eq!(loaded.buffer.vertex_count(), 4);
    assert_eq!(loaded.buffer.indices, vec![0, 1, 2, 3, 1, 2]);
}

#[test]
fn test_unit_box_scaling() {
    let model = positions_model(
        vec![2.0, 0.0, -1.0, 6.0, 0.0, -1.0, 2.0, 2.0, 0.0],
        vec![Face::from_positions(0, 1, 2)],
    );

    let loaded = pack_model(&model, true).unwrap();

    for vertex in &loaded.buffer.vertices {
        assert!(vertex.position.iter().all(|c| (-1.0..=1.0).contains(c)));
    }

    // 最长轴 (X) 正好跨越 [-1, 1]
    let xs: Vec<f32> = loaded.buffer.vertices.iter().map(|v| v.position[0]).collect();
    assert_eq!(xs.iter().cloned().fold(f32::INFINITY, f32::min), -1.0);
    assert_eq!(xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 1.0);

    // 包围盒与顶点处于同一坐标空间
    assert_eq!(loaded.bounds.lower(), Some([-1.0, -1.0, -1.0]));
    assert_eq!(loaded.bounds.upper(), Some([1.0, 0.0, -0.5]));
}

#[test]
fn test_unscaled_bounds_are_raw() {
    let model = positions_model(
        vec![2.0, 0.0, -1.0, 6.0, 0.0, -1.0, 2.0, 2.0, 0.0],
        vec![Face::from_positions(0, 1, 2)],
    );

    let loaded = pack_model(&model, false).unwrap();
    assert_eq!(loaded.bounds.lower(), Some([2.0, 0.0, -1.0]));
    assert_eq!(loaded.bounds.upper(), Some([6.0, 2.0, 0.0]));
}

#[test]
fn test_coincident_positions_cannot_normalize() {
    let model = positions_model(
        vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        vec![Face::from_positions(0, 1, 2)],
    );

    let err = pack_model(&model, true).unwrap_err();
    assert!(matches!(
        err,
        MeshPackError::MeshLoading(MeshLoadError::DegenerateNormalization { .. })
    ));

    // 不归一化时同样的输入可以正常打包
    let loaded = pack_model(&model, false).unwrap();
    assert_eq!(loaded.buffer.vertex_count(), 1);
    assert_eq!(loaded.buffer.indices, vec![0, 0, 0]);
}

#[test]
fn test_smoothing_group_averages_shared_edge() {
    let model = positions_model(
        vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 1.0, 1.0,
        ],
        vec![
            Face::from_positions(0, 1, 2).with_smoothing_group(1),
            Face::from_positions(1, 3, 2).with_smoothing_group(1),
        ],
    );

    let loaded = pack_model(&model, false).unwrap();
    let buffer = &loaded.buffer;

    assert_eq!(buffer.vertex_count(), 4);
    assert_eq!(buffer.indices, vec![0, 1, 2, 1, 3, 2]);

    let shared = 1.0 / 6.0f32.sqrt();
    let single = 1.0 / 3.0f32.sqrt();
    assert_close(buffer.vertices[0].normal, [0.0, 0.0, 1.0]);
    assert_close(buffer.vertices[1].normal, [-shared, -shared, 2.0 * shared]);
    assert_close(buffer.vertices[2].normal, [-shared, -shared, 2.0 * shared]);
    assert_close(buffer.vertices[3].normal, [-single, -single, single]);
}

#[test]
fn test_smoothing_statement_in_obj_text() {
    let data = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 1
s 1
f 1 2 3
f 2 4 3
";
    let loaded = load_model(&ObjBuffer(data.as_bytes()), false).unwrap();
    let buffer = &loaded.buffer;

    assert_eq!(buffer.vertex_count(), 4);
    assert_eq!(buffer.indices, vec![0, 1, 2, 1, 3, 2]);

    let shared = 1.0 / 6.0f32.sqrt();
    assert_close(buffer.vertices[1].normal, [-shared, -shared, 2.0 * shared]);
    assert_close(buffer.vertices[2].normal, [-shared, -shared, 2.0 * shared]);
}

#[test]
fn test_declared_but_unreferenced_obj_normal() {
    let data = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 1 0 0\nvt 0.5 0.25\nf 1 2 3\n";
    let loaded = load_model(&ObjBuffer(&data[..]), false).unwrap();

    for vertex in &loaded.buffer.vertices {
        assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertex.texcoord, [0.0, 0.0]);
    }
}

#[test]
fn test_obj_faces_without_normals_use_face_normal() {
    let data = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vn 1 0 0
f 1//1 2//1 3//1
f 2 4 3
";
    let loaded = load_model(&ObjBuffer(data.as_bytes()), false).unwrap();
    let buffer = &loaded.buffer;

    // 第一个面用显式法线，第二个面计算面法线，共享位置不会焊接
    assert_eq!(buffer.vertex_count(), 6);
    assert_eq!(buffer.vertices[0].normal, [1.0, 0.0, 0.0]);
    for &index in &buffer.indices[3..] {
        assert_eq!(buffer.vertices[index as usize].normal, [0.0, 0.0, 1.0]);
    }
}

#[test]
fn test_xy_collinear_face_has_zero_normal() {
    let model = positions_model(
        vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        vec![Face::from_positions(0, 1, 2)],
    );

    let loaded = pack_model(&model, false).unwrap();
    for vertex in &loaded.buffer.vertices {
        assert_eq!(vertex.normal, [0.0, 0.0, 0.0]);
    }
}

#[test]
fn test_packing_is_deterministic() {
    let first = load_model(&ObjBuffer(CUBE.as_bytes()), true).unwrap();
    let second = load_model(&ObjBuffer(CUBE.as_bytes()), true).unwrap();

    assert_eq!(first.buffer.vertices, second.buffer.vertices);
    assert_eq!(first.buffer.indices, second.buffer.indices);
    assert_eq!(first.bounds, second.bounds);
}

#[test]
fn test_missing_file_reports_not_found() {
    let err = load_model_from_path(std::path::Path::new("missing/model.obj"), false).unwrap_err();
    assert!(matches!(
        err,
        MeshPackError::MeshLoading(MeshLoadError::FileNotFound(_))
    ));
}
