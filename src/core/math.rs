//! 数学类型模块
//!
//! 基于 `nalgebra` 提供打包器使用的向量类型别名。
//! 顶点数据在 GPU 侧使用 `[f32; N]` 数组，计算时转换为这里的向量类型。

pub use nalgebra::Vector3 as Vec3;

// 类型别名，使用更简洁的名称
pub type Vector3 = Vec3<f32>;

/// 把 `[f32; 3]` 数组转换为 `Vector3`
#[inline]
pub fn vec3(v: [f32; 3]) -> Vector3 {
    Vector3::new(v[0], v[1], v[2])
}

/// 把 `Vector3` 转换回 GPU 布局使用的数组
#[inline]
pub fn to_array3(v: &Vector3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// 归一化向量，零长度（或非有限长度）时返回零向量而不是 NaN
#[inline]
pub fn normalize_or_zero(v: &Vector3) -> Vector3 {
    let length = v.norm();
    if length > 0.0 && length.is_finite() {
        v / length
    } else {
        Vector3::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_or_zero() {
        let n = normalize_or_zero(&Vector3::new(3.0, 4.0, 0.0));
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);

        let zero = normalize_or_zero(&Vector3::zeros());
        assert_eq!(to_array3(&zero), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_array_round_trip() {
        let v = vec3([1.0, 2.0, 3.0]);
        assert_eq!(to_array3(&v), [1.0, 2.0, 3.0]);
    }
}
