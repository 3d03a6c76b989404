//! 三维到二维的投影
//!
//! 立体的局部坐标 y 轴向上，投影结果为屏幕坐标（y 轴向下）。
//! 三种投影都把原点映射到原点，即立体的锚点就是放置位置。

use crate::math::{deg_to_rad, Point2, Point3};
use serde::{Deserialize, Serialize};

/// 透视投影中深度分母的下限，防止除零或翻转
const MIN_PERSPECTIVE_DENOMINATOR: f64 = 1e-6;

/// 正投影中 z 轴的斜率
const OBLIQUE_FACTOR: f64 = 0.5;

/// 投影方式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// 等轴测：angle 为轴与水平方向的夹角（度），scale 为整体缩放
    Isometric { angle: f64, scale: f64 },
    /// 透视：distance 为视点到投影面的距离
    Perspective { distance: f64 },
    /// 斜二测式的正投影：z 轴沿右下方向按一半长度画出
    Orthographic,
}

impl Default for Projection {
    fn default() -> Self {
        Self::isometric()
    }
}

impl Projection {
    /// 默认参数的等轴测投影（30°，0.8）
    pub fn isometric() -> Self {
        Projection::Isometric {
            angle: 30.0,
            scale: 0.8,
        }
    }

    pub fn perspective(distance: f64) -> Self {
        Projection::Perspective { distance }
    }

    /// 投影一个点
    pub fn project(&self, p: &Point3) -> Point2 {
        match *self {
            Projection::Isometric { angle, scale } => {
                let a = deg_to_rad(angle);
                Point2::new(
                    (p.x - p.z) * a.cos() * scale,
                    ((p.x + p.z) * a.sin() - p.y) * scale,
                )
            }
            Projection::Perspective { .. } => {
                let f = self.scale_at(p.z);
                Point2::new(p.x * f, -p.y * f)
            }
            Projection::Orthographic => {
                Point2::new(p.x + OBLIQUE_FACTOR * p.z, OBLIQUE_FACTOR * p.z - p.y)
            }
        }
    }

    /// 带整体深度偏移的投影：偏移只影响透视缩放，平行投影下锚点不动
    pub fn project_at_depth(&self, p: &Point3, depth: f64) -> Point2 {
        match *self {
            Projection::Perspective { .. } => {
                let f = self.scale_at(p.z + depth);
                Point2::new(p.x * f, -p.y * f)
            }
            _ => self.project(p),
        }
    }

    /// 沿视线方向朝向观察者的坐标，画家算法按它从小到大绘制
    pub fn view_depth(&self, p: &Point3) -> f64 {
        match *self {
            Projection::Isometric { angle, .. } => p.x + 2.0 * deg_to_rad(angle).sin() * p.y + p.z,
            Projection::Perspective { .. } => -p.z,
            Projection::Orthographic => p.z + OBLIQUE_FACTOR * (p.y - p.x),
        }
    }

    /// 正面在屏幕上的绕向符号
    ///
    /// 平行投影的观察者在 +z 一侧；透视的观察者在 -z 一侧，
    /// x 向右、y 向上不变，因此投影后绕向相反。
    pub fn winding_sign(&self) -> f64 {
        match self {
            Projection::Perspective { .. } => -1.0,
            _ => 1.0,
        }
    }

    /// 深度 z 处的线性缩放系数（用于球体等按半径绘制的形状）
    pub fn scale_at(&self, z: f64) -> f64 {
        match *self {
            Projection::Isometric { scale, .. } => scale,
            Projection::Perspective { distance } => {
                distance / (distance + z).max(MIN_PERSPECTIVE_DENOMINATOR)
            }
            Projection::Orthographic => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Projection::Isometric { .. } => "isometric",
            Projection::Perspective { .. } => "perspective",
            Projection::Orthographic => "orthographic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, approx_eq_tol};

    #[test]
    fn test_origin_maps_to_anchor() {
        for projection in [
            Projection::isometric(),
            Projection::Isometric {
                angle: 45.0,
                scale: 2.0,
            },
            Projection::perspective(400.0),
            Projection::Orthographic,
        ] {
            let p = projection.project(&Point3::origin());
            assert!(approx_eq(p.x, 0.0), "{}", projection.name());
            assert!(approx_eq(p.y, 0.0), "{}", projection.name());
        }
    }

    #[test]
    fn test_isometric_axes() {
        let iso = Projection::isometric();
        let x = iso.project(&Point3::new(10.0, 0.0, 0.0));
        assert!(approx_eq_tol(x.x, 10.0 * 30f64.to_radians().cos() * 0.8, 1e-12));
        assert!(approx_eq_tol(x.y, 10.0 * 0.5 * 0.8, 1e-12));

        // y 轴向上投影为屏幕上方
        let y = iso.project(&Point3::new(0.0, 10.0, 0.0));
        assert!(approx_eq(y.x, 0.0));
        assert!(approx_eq(y.y, -8.0));
    }

    #[test]
    fn test_perspective_shrinks_with_depth() {
        let persp = Projection::perspective(100.0);
        let near = persp.project(&Point3::new(10.0, 10.0, 0.0));
        let far = persp.project(&Point3::new(10.0, 10.0, 100.0));
        assert!(approx_eq(near.x, 10.0));
        assert!(approx_eq(far.x, 5.0));
        assert!(approx_eq(far.y, -5.0));

        // 视点后方的点不会产生无穷大
        let behind = persp.project(&Point3::new(1.0, 1.0, -100.0));
        assert!(behind.x.is_finite());
    }

    #[test]
    fn test_depth_offset_keeps_anchor() {
        for projection in [Projection::isometric(), Projection::perspective(300.0)] {
            let p = projection.project_at_depth(&Point3::origin(), 120.0);
            assert!(approx_eq(p.x, 0.0));
            assert!(approx_eq(p.y, 0.0));
        }
        let persp = Projection::perspective(100.0);
        let shifted = persp.project_at_depth(&Point3::new(10.0, 0.0, 0.0), 100.0);
        assert!(approx_eq(shifted.x, 5.0));
    }

    #[test]
    fn test_view_depth_prefers_visible_side() {
        // 等轴测从 (+x, +y, +z) 方向观察
        let iso = Projection::isometric();
        assert!(iso.view_depth(&Point3::new(1.0, 1.0, 1.0)) > iso.view_depth(&Point3::origin()));
        let ortho = Projection::Orthographic;
        assert!(ortho.view_depth(&Point3::new(0.0, 0.0, 1.0)) > 0.0);
        assert!(ortho.view_depth(&Point3::new(1.0, 0.0, 0.0)) < 0.0);
    }

    #[test]
    fn test_perspective_depth_grows_toward_viewer() {
        // z 越大越远，画面上越小，深度键也越小
        let persp = Projection::perspective(200.0);
        let near = Point3::new(10.0, 0.0, 0.0);
        let far = Point3::new(10.0, 0.0, 50.0);
        assert!(persp.project(&far).x < persp.project(&near).x);
        assert!(persp.view_depth(&far) < persp.view_depth(&near));
        assert_eq!(persp.winding_sign(), -1.0);
        assert_eq!(Projection::isometric().winding_sign(), 1.0);
    }

    #[test]
    fn test_orthographic() {
        let p = Projection::Orthographic.project(&Point3::new(2.0, 3.0, 4.0));
        assert!(approx_eq(p.x, 4.0));
        assert!(approx_eq(p.y, -1.0));
    }
}
