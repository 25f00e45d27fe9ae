/// OBJ 文件加载器
///
/// 使用 tobj crate 解析 Wavefront OBJ 格式，转换为打包器的 `ParsedModel`。
/// 每个 tobj 模型对应一个形状，所有形状的属性拼接进同一组共享的扁平数组。
use super::MeshLoader;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::model::{Corner, Face, ParsedModel, RawAttributes, Shape};
use std::path::Path;

/// OBJ 格式加载器
///
/// 实现 `MeshLoader` trait，提供 OBJ 文件的解析功能。
///
/// # 特性
///
/// - 使用 tobj 解析，自动三角化，忽略点和线元素
/// - 位置、法线、纹理坐标使用各自独立的索引（不做单一索引展开）
/// - 角点没有写出 `vt` / `vn` 索引时，对应属性为 `None`
/// - `s N` 语句给随后的面打上平滑组 ID，`s off` / `s 0` 恢复为 0
///
/// # 使用示例
///
/// ```rust,no_run
/// use mesh_packer::geometry::loaders::{MeshLoader, ObjLoader};
/// use std::path::Path;
///
/// let model = ObjLoader::load_from_file(Path::new("model.obj"))?;
/// println!("解析了 {} 个三角面", model.face_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ObjLoader;

impl ObjLoader {
    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        }
    }

    /// 解析完整的 OBJ 文本
    fn parse_buffer(data: &[u8]) -> std::result::Result<ParsedModel, MeshLoadError> {
        let text = std::str::from_utf8(data)
            .map_err(|e| MeshLoadError::parse_failure(format!("OBJ 文本不是有效的 UTF-8: {}", e)))?;

        let mut reader = data;

        // 材质与几何打包无关，mtllib 一律视为无法打开
        let (models, _materials) = tobj::load_obj_buf(&mut reader, &Self::load_options(), |_: &Path| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| MeshLoadError::parse_failure(format!("tobj 解析失败: {}", e)))?;

        convert_models(models, &scan_faces(text))
    }
}

impl MeshLoader for ObjLoader {
    fn load_from_file(path: &Path) -> Result<ParsedModel> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let data = std::fs::read(path)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unnamed");

        let model = Self::parse_buffer(&data)?.with_name(name);

        tracing::info!(
            "成功解析 OBJ 文件: {} 个形状, {} 个三角面",
            model.shapes.len(),
            model.face_count()
        );

        Ok(model)
    }

    fn load_from_memory(data: &[u8]) -> Result<ParsedModel> {
        Ok(Self::parse_buffer(data)?)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

/// 源文件中一个三角形的附加信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TriangleTags {
    /// 每个角点是否写出了纹理坐标索引
    texcoord: [bool; 3],
    /// 每个角点是否写出了法线索引
    normal: [bool; 3],
    smoothing_group: u32,
}

/// 按 tobj 的规则逐个三角形扫描面记录
///
/// tobj 在多索引模式下会给没有写 `vt`/`vn` 的角点补上一个索引，
/// 也不输出 `s` 语句，这两项信息只能从原始文本恢复。
///
/// 与 tobj 保持一致：`f` 和 `l` 都是面记录，少于 3 个角点的被忽略，
/// 多边形按 (0, k-1, k) 扇形三角化。平滑组状态跨越 `o`/`g` 语句保持。
fn scan_faces(text: &str) -> Vec<TriangleTags> {
    let mut triangles = Vec::new();
    let mut smoothing_group = 0u32;

    for line in text.lines() {
        let mut words = line.split_whitespace();

        match words.next() {
            Some("s") => {
                // "off" 解析失败，与 "0" 一样表示不平滑
                smoothing_group = words.next().and_then(|w| w.parse().ok()).unwrap_or(0);
            }
            Some("f") | Some("l") => {
                let corners: Vec<(bool, bool)> = words
                    .map(|token| {
                        let mut fields = token.split('/').skip(1);
                        let texcoord = fields.next().is_some_and(|f| !f.is_empty());
                        let normal = fields.next().is_some_and(|f| !f.is_empty());
                        (texcoord, normal)
                    })
                    .collect();

                for k in 2..corners.len() {
                    let fan = [corners[0], corners[k - 1], corners[k]];
                    triangles.push(TriangleTags {
                        texcoord: fan.map(|(texcoord, _)| texcoord),
                        normal: fan.map(|(_, normal)| normal),
                        smoothing_group,
                    });
                }
            }
            _ => {}
        }
    }

    triangles
}

/// 把 tobj 的模型列表拼接为一个共享属性数组的 `ParsedModel`
///
/// `tags` 按文件顺序对应 tobj 输出的全部三角形。
fn convert_models(
    models: Vec<tobj::Model>,
    tags: &[TriangleTags],
) -> std::result::Result<ParsedModel, MeshLoadError> {
    let mut attributes = RawAttributes::default();
    let mut shapes = Vec::with_capacity(models.len());
    let mut tags = tags.iter();

    for model in models {
        let mesh = model.mesh;
        let corner_count = mesh.indices.len();

        if corner_count % 3 != 0 {
            return Err(MeshLoadError::parse_failure(format!(
                "模型 '{}' 的索引数量 {} 不是3的倍数",
                model.name, corner_count
            )));
        }

        // 追加前的元素个数就是本模型索引的偏移量
        let position_base = attributes.position_count();
        let normal_base = attributes.normal_count();
        let texcoord_base = attributes.texcoord_count();

        let has_normals = !mesh.normals.is_empty() && mesh.normal_indices.len() == corner_count;
        let has_texcoords = !mesh.texcoords.is_empty() && mesh.texcoord_indices.len() == corner_count;

        let mut faces = Vec::with_capacity(corner_count / 3);
        for first in (0..corner_count).step_by(3) {
            let tag = tags.next().ok_or_else(|| {
                MeshLoadError::parse_failure(format!("模型 '{}' 的三角面多于源文件中的面记录", model.name))
            })?;

            let corners = [0, 1, 2].map(|k| {
                let i = first + k;
                Corner::new(
                    position_base + mesh.indices[i] as usize,
                    (has_normals && tag.normal[k]).then(|| normal_base + mesh.normal_indices[i] as usize),
                    (has_texcoords && tag.texcoord[k]).then(|| texcoord_base + mesh.texcoord_indices[i] as usize),
                )
            });

            faces.push(Face::new(corners).with_smoothing_group(tag.smoothing_group));
        }

        attributes.positions.extend_from_slice(&mesh.positions);
        attributes.normals.extend_from_slice(&mesh.normals);
        attributes.texcoords.extend_from_slice(&mesh.texcoords);

        shapes.push(Shape::new(model.name, faces));
    }

    if tags.next().is_some() {
        return Err(MeshLoadError::parse_failure("源文件中的面记录多于 tobj 输出的三角面"));
    }

    Ok(ParsedModel::new(attributes, shapes))
}
