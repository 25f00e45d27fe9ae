//! 网格打包模块
//!
//! 驱动整个加载流程：逐形状、逐面遍历解析结果，选择法线和纹理坐标，
//! 把角点送入焊接器，最后组装输出缓冲区和包围盒。
//!
//! # 流程
//!
//! ```text
//! ParsedModel
//!     ↓  (形状带平滑组时) SmoothingNormals
//! 每个面: 位置 → 包围盒
//!         法线: 显式 → 平滑 → 面法线
//!         纹理坐标: 显式(V 翻转) → (0, 0)
//!     ↓
//! VertexWelder (角点 0, 1, 2 依次插入)
//!     ↓  (可选) 单位盒归一化
//! LoadedMesh
//! ```
//!
//! 每次调用独占自己的焊接表、平滑表和包围盒，不存在共享可变状态，
//! 不同模型可以在不同线程上并行打包。任何错误都会终止本次调用，不返回部分结果。

use crate::core::error::{AttributeKind, MeshLoadError, Result};
use crate::geometry::bounds::BoundingBox;
use crate::geometry::loaders::ModelSource;
use crate::geometry::mesh::{MeshBuffer, Subset};
use crate::geometry::model::{invalid_reference, Face, ParsedModel, RawAttributes, Shape};
use crate::geometry::normals::{face_normal, is_degenerate_xy, SmoothingNormals};
use crate::geometry::vertex::PackedVertex;
use crate::geometry::weld::VertexWelder;
use crate::{packer_debug, packer_error, packer_info, packer_warn};

/// 打包结果
///
/// `bounds` 总是与 `buffer` 中的顶点位于同一坐标空间：
/// 未归一化时是原始包围盒；归一化后是原始包围盒经过同一变换后的结果
/// （下角点为 (-1, -1, -1)，最长轴跨越 [-1, 1]）。
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub buffer: MeshBuffer,
    pub bounds: BoundingBox,
}

/// 一个面的法线来源，按优先级排列
#[derive(Debug, Clone, Copy)]
enum NormalSource<'s> {
    /// 模型带法线且三个角点的法线索引都存在
    Explicit([usize; 3]),
    /// 形状做过平滑，按原始位置索引查表
    Smoothed(&'s SmoothingNormals),
    /// 计算面法线并广播给三个角点
    FaceComputed,
}

fn select_normal_source<'s>(
    attributes: &RawAttributes,
    face: &Face,
    smoothing: Option<&'s SmoothingNormals>,
) -> NormalSource<'s> {
    if attributes.has_normals() {
        if let [Some(a), Some(b), Some(c)] = face.corners.map(|corner| corner.normal) {
            return NormalSource::Explicit([a, b, c]);
        }
    }

    match smoothing {
        Some(smooth) => NormalSource::Smoothed(smooth),
        None => NormalSource::FaceComputed,
    }
}

/// 加载并打包一个模型
///
/// 先由 `source` 解析出 `ParsedModel`，再调用 [`pack_model`]。
///
/// # 示例
///
/// ```rust
/// use mesh_packer::geometry::model::{Face, ParsedModel, RawAttributes, Shape};
/// use mesh_packer::geometry::packer::load_model;
///
/// let model = ParsedModel::new(
///     RawAttributes {
///         positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
///         ..Default::default()
///     },
///     vec![Shape::new("triangle", vec![Face::from_positions(0, 1, 2)])],
/// );
///
/// let loaded = load_model(&model, false)?;
/// assert_eq!(loaded.buffer.indices, vec![0, 1, 2]);
/// # Ok::<(), mesh_packer::core::MeshPackError>(())
/// ```
pub fn load_model<S: ModelSource + ?Sized>(source: &S, scale_to_unit_box: bool) -> Result<LoadedMesh> {
    let model = source.parse().inspect_err(|e| {
        packer_error!(source = %source.describe(), error = %e, "模型解析失败");
    })?;

    pack_model(&model, scale_to_unit_box)
}

/// 把解析结果打包成焊接后的网格
///
/// # 错误
///
/// - `MeshLoadError::EmptyModel`：模型没有任何形状
/// - `MeshLoadError::InvalidIndexReference`：角点索引超出属性数组
/// - `MeshLoadError::DegenerateNormalization`：要求归一化但包围盒没有体积
/// - `MeshLoadError::IndexOverflow`：角点总数超出 u32 索引范围
pub fn pack_model(model: &ParsedModel, scale_to_unit_box: bool) -> Result<LoadedMesh> {
    let model_name = model.name.as_deref().unwrap_or("Unnamed");

    if model.shapes.is_empty() {
        packer_error!(model = model_name, "模型不包含任何形状");
        return Err(MeshLoadError::empty_model(model_name).into());
    }

    let span = crate::span_trace!("pack_model");
    let _enter = span.enter();

    // 通过后，顶点数、三角面数都不超过角点数，下面的 u32 转换不会截断
    let corner_count = check_index_capacity(model.face_count()).inspect_err(|e| {
        packer_error!(model = model_name, error = %e, "模型超出 32 位索引范围");
    })?;

    let mut buffer = MeshBuffer::with_capacity(corner_count, corner_count);
    buffer.name = model.name.clone();

    let mut bounds = BoundingBox::new();
    for (shape_index, shape) in model.shapes.iter().enumerate() {
        let shape_bounds = pack_shape(&model.attributes, shape, shape_index, &mut buffer)
            .inspect_err(|e| {
                packer_error!(model = model_name, shape = %shape.name, error = %e, "形状打包失败");
            })?;
        bounds.merge_box(&shape_bounds);
    }

    let bounds = if scale_to_unit_box {
        let transform = buffer.normalize_to_unit_box(&bounds).inspect_err(|e| {
            packer_error!(model = model_name, error = %e, "单位盒归一化失败");
        })?;
        transform.apply_to_bounds(&bounds)
    } else {
        bounds
    };

    debug_assert!(buffer.validate().is_ok());

    packer_info!(
        model = model_name,
        shapes = model.shapes.len(),
        vertices = buffer.vertex_count(),
        indices = buffer.index_count(),
        corners = corner_count,
        "网格打包完成"
    );

    Ok(LoadedMesh { buffer, bounds })
}

/// 角点总数，要求能用 u32 索引表示
fn check_index_capacity(face_count: usize) -> std::result::Result<usize, MeshLoadError> {
    face_count
        .checked_mul(3)
        .filter(|&corners| u32::try_from(corners).is_ok())
        .ok_or(MeshLoadError::IndexOverflow {
            corners: face_count.saturating_mul(3),
        })
}

/// 打包单个形状，返回该形状原始位置的包围盒
///
/// 每个形状使用独立的焊接表，顶点追加在 `buffer` 末尾。
fn pack_shape(
    attributes: &RawAttributes,
    shape: &Shape,
    shape_index: usize,
    buffer: &mut MeshBuffer,
) -> std::result::Result<BoundingBox, MeshLoadError> {
    let smoothing = if shape.has_smoothing_group() {
        Some(SmoothingNormals::compute(attributes, shape, shape_index)?)
    } else {
        None
    };

    packer_debug!(
        shape = %shape.name,
        faces = shape.faces.len(),
        smoothed_positions = smoothing.as_ref().map_or(0, SmoothingNormals::position_count),
        "开始打包形状"
    );

    let vertex_start = buffer.vertices.len() as u32;
    let face_start = buffer.triangle_count() as u32;

    let mut shape_bounds = BoundingBox::new();
    let mut degenerate_faces = 0usize;
    let mut welder = VertexWelder::new(&mut buffer.vertices);

    for (face_index, face) in shape.faces.iter().enumerate() {
        let locate = |corner: usize, attribute: AttributeKind, index: usize| {
            invalid_reference(attributes, shape_index, face_index, corner, attribute, index)
        };

        let mut positions = [[0.0f32; 3]; 3];
        for (k, corner) in face.corners.iter().enumerate() {
            positions[k] = attributes
                .position(corner.position)
                .ok_or_else(|| locate(k, AttributeKind::Position, corner.position))?;
            shape_bounds.merge(positions[k]);
        }

        let normals = match select_normal_source(attributes, face, smoothing.as_ref()) {
            NormalSource::Explicit(normal_indices) => {
                let mut normals = [[0.0f32; 3]; 3];
                for (k, &index) in normal_indices.iter().enumerate() {
                    normals[k] = attributes
                        .normal(index)
                        .ok_or_else(|| locate(k, AttributeKind::Normal, index))?;
                }
                normals
            }
            NormalSource::Smoothed(smooth) => face
                .corners
                .map(|corner| smooth.get(corner.position).unwrap_or([0.0; 3])),
            NormalSource::FaceComputed => {
                if is_degenerate_xy(positions[0], positions[1], positions[2]) {
                    degenerate_faces += 1;
                }
                [face_normal(positions[0], positions[1], positions[2]); 3]
            }
        };

        let texcoords = match face.corners.map(|corner| corner.texcoord) {
            [Some(a), Some(b), Some(c)] if attributes.has_texcoords() => {
                let mut texcoords = [[0.0f32; 2]; 3];
                for (k, &index) in [a, b, c].iter().enumerate() {
                    let [u, v] = attributes
                        .texcoord(index)
                        .ok_or_else(|| locate(k, AttributeKind::Texcoord, index))?;
                    // 翻转 V 轴
                    texcoords[k] = [u, 1.0 - v];
                }
                texcoords
            }
            _ => [[0.0f32; 2]; 3],
        };

        for k in 0..3 {
            let index = welder.insert(PackedVertex::new(positions[k], texcoords[k], normals[k]));
            buffer.indices.push(index);
        }
    }

    let inserted = welder.inserted_count();
    let unique = welder.unique_count();

    if degenerate_faces > 0 {
        packer_warn!(
            shape = %shape.name,
            count = degenerate_faces,
            "形状包含 XY 投影退化的三角面，面法线为零向量"
        );
    }

    packer_debug!(shape = %shape.name, corners = inserted, unique, "形状焊接完成");

    buffer.subsets.push(Subset::new(
        shape_index as u32,
        vertex_start,
        buffer.vertices.len() as u32 - vertex_start,
        face_start,
        shape.faces.len() as u32,
    ));

    Ok(shape_bounds)
}
