//! 平面仿射变换
//!
//! 形状的位置、旋转、缩放组合成一个 [`Transform2D`]，
//! 既作为输出分组的变换，也用于求父坐标系下的包围盒和标注几何。
//! 另提供沿任意直线的镜像，供图形的对称变换使用。

use crate::math::{deg_to_rad, Matrix3, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 2D仿射变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    matrix: Matrix3,
}

impl Transform2D {
    /// 创建单位变换
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// 创建平移变换
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            matrix: Matrix3::new(
                1.0, 0.0, dx,
                0.0, 1.0, dy,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 创建旋转变换（绕原点，弧度）
    pub fn rotation(angle: f64) -> Self {
        let cos = angle.cos();
        let sin = angle.sin();
        Self {
            matrix: Matrix3::new(
                cos, -sin, 0.0,
                sin, cos, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 创建旋转变换（绕原点，角度）
    pub fn rotation_degrees(degrees: f64) -> Self {
        Self::rotation(deg_to_rad(degrees))
    }

    /// 创建缩放变换（绕原点）
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            matrix: Matrix3::new(
                sx, 0.0, 0.0,
                0.0, sy, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// 创建均匀缩放变换
    pub fn uniform_scale(s: f64) -> Self {
        Self::scale(s, s)
    }

    /// 形状放置变换：先缩放，再旋转（角度），最后平移到 position
    pub fn placement(position: Point2, rotation_degrees: f64, sx: f64, sy: f64) -> Self {
        Self::translation(position.x, position.y)
            .then(&Self::rotation_degrees(rotation_degrees))
            .then(&Self::scale(sx, sy))
    }

    /// 关于 x 轴的镜像
    pub fn mirror_x() -> Self {
        Self::scale(1.0, -1.0)
    }

    /// 创建相对于过 p1、p2 两点直线的镜像变换
    ///
    /// p1 与 p2 重合时直线无定义，返回单位变换。
    pub fn mirror_line(p1: Point2, p2: Point2) -> Self {
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        if dx.abs() < crate::math::EPSILON && dy.abs() < crate::math::EPSILON {
            return Self::identity();
        }
        let angle = dy.atan2(dx);

        // 平移到原点 -> 旋转使直线与X轴对齐 -> 镜像 -> 反向旋转 -> 反向平移
        Self::translation(p1.x, p1.y)
            .then(&Self::rotation(angle))
            .then(&Self::mirror_x())
            .then(&Self::rotation(-angle))
            .then(&Self::translation(-p1.x, -p1.y))
    }

    /// 创建相对于直线 y = m·x + b 的镜像变换
    pub fn reflection(slope: f64, intercept: f64) -> Self {
        Self::mirror_line(
            Point2::new(0.0, intercept),
            Point2::new(1.0, slope + intercept),
        )
    }

    /// 组合：先施加 other，再施加 self
    pub fn then(&self, other: &Transform2D) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// 变换一个点
    pub fn transform_point(&self, point: &Point2) -> Point2 {
        let v = self.matrix * nalgebra::Vector3::new(point.x, point.y, 1.0);
        Point2::new(v.x, v.y)
    }

    /// 变换一个向量（不受平移影响）
    pub fn transform_vector(&self, vector: &Vector2) -> Vector2 {
        let v = self.matrix * nalgebra::Vector3::new(vector.x, vector.y, 0.0);
        Vector2::new(v.x, v.y)
    }

    /// 获取逆变换
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|m| Self { matrix: m })
    }

    /// 线性部分 `[[a, b], [c, d]]`（不含平移）
    pub fn linear(&self) -> [[f64; 2]; 2] {
        [
            [self.matrix[(0, 0)], self.matrix[(0, 1)]],
            [self.matrix[(1, 0)], self.matrix[(1, 1)]],
        ]
    }

    /// 是否为单位变换
    pub fn is_identity(&self) -> bool {
        self.matrix
            .iter()
            .zip(Matrix3::identity().iter())
            .all(|(a, b)| crate::math::approx_eq(*a, *b))
    }

    /// 提取缩放分量
    pub fn scale_component(&self) -> (f64, f64) {
        let sx = (self.matrix[(0, 0)].powi(2) + self.matrix[(1, 0)].powi(2)).sqrt();
        let sy = (self.matrix[(0, 1)].powi(2) + self.matrix[(1, 1)].powi(2)).sqrt();
        (sx, sy)
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, approx_eq_tol};

    #[test]
    fn test_translation() {
        let t = Transform2D::translation(10.0, 20.0);
        let p = Point2::new(5.0, 5.0);
        let result = t.transform_point(&p);

        assert!(approx_eq(result.x, 15.0));
        assert!(approx_eq(result.y, 25.0));
    }

    #[test]
    fn test_rotation() {
        let t = Transform2D::rotation_degrees(90.0);
        let p = Point2::new(1.0, 0.0);
        let result = t.transform_point(&p);

        assert!(approx_eq(result.x, 0.0));
        assert!(approx_eq(result.y, 1.0));
    }

    #[test]
    fn test_placement_order() {
        let t = Transform2D::placement(Point2::new(100.0, 50.0), 90.0, 2.0, 1.0);
        let result = t.transform_point(&Point2::new(10.0, 0.0));

        // 先缩放到 (20, 0)，旋转到 (0, 20)，再平移
        assert!(approx_eq_tol(result.x, 100.0, 1e-9));
        assert!(approx_eq_tol(result.y, 70.0, 1e-9));
    }

    #[test]
    fn test_inverse() {
        let t = Transform2D::translation(10.0, 20.0)
            .then(&Transform2D::rotation(0.5))
            .then(&Transform2D::scale(2.0, 3.0));

        let inv = t.inverse().unwrap();
        let p = Point2::new(100.0, 200.0);

        let transformed = t.transform_point(&p);
        let restored = inv.transform_point(&transformed);

        assert!(approx_eq_tol(restored.x, p.x, 1e-9));
        assert!(approx_eq_tol(restored.y, p.y, 1e-9));
    }

    /// 用闭式公式独立验证 y = m·x + b 的镜像
    fn reflect_closed_form(p: Point2, m: f64, b: f64) -> Point2 {
        let d = (p.x + (p.y - b) * m) / (1.0 + m * m);
        Point2::new(2.0 * d - p.x, 2.0 * d * m - p.y + 2.0 * b)
    }

    #[test]
    fn test_reflection_matches_closed_form() {
        for &(m, b) in &[(0.0, 3.0), (1.0, 0.0), (-2.0, 5.0), (0.5, -1.5)] {
            let t = Transform2D::reflection(m, b);
            for p in [Point2::new(3.0, 7.0), Point2::new(-4.0, 1.0), Point2::new(0.0, 0.0)] {
                let got = t.transform_point(&p);
                let expected = reflect_closed_form(p, m, b);
                assert!(approx_eq_tol(got.x, expected.x, 1e-9), "m={m} b={b} p={p:?}");
                assert!(approx_eq_tol(got.y, expected.y, 1e-9), "m={m} b={b} p={p:?}");
            }
        }
    }

    #[test]
    fn test_reflection_geometric_properties() {
        let (m, b) = (-0.75, 2.0);
        let t = Transform2D::reflection(m, b);

        // 直线上的点不动
        let on_line = Point2::new(4.0, m * 4.0 + b);
        let fixed = t.transform_point(&on_line);
        assert!(approx_eq_tol(fixed.x, on_line.x, 1e-9));
        assert!(approx_eq_tol(fixed.y, on_line.y, 1e-9));

        // 两次镜像还原
        let p = Point2::new(-3.0, 9.0);
        let twice = t.transform_point(&t.transform_point(&p));
        assert!(approx_eq_tol(twice.x, p.x, 1e-9));
        assert!(approx_eq_tol(twice.y, p.y, 1e-9));

        // 中点在直线上，位移垂直于直线
        let q = t.transform_point(&p);
        let mid = Point2::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0);
        assert!(approx_eq_tol(mid.y, m * mid.x + b, 1e-9));
        let displacement = q - p;
        assert!(approx_eq_tol(displacement.dot(&Vector2::new(1.0, m)), 0.0, 1e-9));
    }

    #[test]
    fn test_mirror_degenerate_line() {
        let p = Point2::new(2.0, 2.0);
        assert!(Transform2D::mirror_line(p, p).is_identity());
    }
}
