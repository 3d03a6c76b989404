//! 数学基础类型与几何工具函数
//!
//! 基于 nalgebra 提供的向量和点类型的别名，以及距离、角度、插值、
//! 鞋带公式等基础计算。

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// 2D点类型
pub type Point2 = na::Point2<f64>;

/// 3D点类型
pub type Point3 = na::Point3<f64>;

/// 2D向量类型
pub type Vector2 = na::Vector2<f64>;

/// 3D向量类型
pub type Vector3 = na::Vector3<f64>;

/// 2D变换矩阵
pub type Matrix3 = na::Matrix3<f64>;

/// 数值容差，用于几何比较
pub const EPSILON: f64 = 1e-10;

/// 判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 按指定容差判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq_tol(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// 判断两个2D点是否近似相等
#[inline]
pub fn points_approx_eq(a: &Point2, b: &Point2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// 角度转弧度
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// 弧度转角度
#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians.to_degrees()
}

/// 两点间距离
#[inline]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// 从 a 指向 b 的方向角（度，屏幕坐标系下顺时针为正）
#[inline]
pub fn angle_of(a: &Point2, b: &Point2) -> f64 {
    rad_to_deg((b.y - a.y).atan2(b.x - a.x))
}

/// 在 vertex 处由 a、b 两条射线所夹的角（度，范围 [0, 180]）
pub fn angle_between(vertex: &Point2, a: &Point2, b: &Point2) -> f64 {
    let u = a - vertex;
    let v = b - vertex;
    let denom = u.norm() * v.norm();
    if denom < EPSILON {
        return 0.0;
    }
    rad_to_deg((u.dot(&v) / denom).clamp(-1.0, 1.0).acos())
}

/// 线性插值
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// 点的线性插值
#[inline]
pub fn lerp_point(a: &Point2, b: &Point2, t: f64) -> Point2 {
    Point2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// 将值限制在区间内
///
/// 与 `f64::clamp` 不同，`min > max` 时不会 panic，而是交换两端。
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    value.max(lo).min(hi)
}

/// 有向面积（鞋带公式），逆时针为正（y轴向上时）
pub fn signed_area(points: &[Point2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let sum: f64 = (0..n)
        .map(|i| {
            let p = &points[i];
            let q = &points[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum();
    sum / 2.0
}

/// 多边形面积（鞋带公式取绝对值，与顶点绕向无关）
pub fn shoelace_area(points: &[Point2]) -> f64 {
    signed_area(points).abs()
}

/// 闭合多边形周长（首尾相连）
pub fn polygon_perimeter(points: &[Point2]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let n = points.len();
    (0..n).map(|i| distance(&points[i], &points[(i + 1) % n])).sum()
}

/// 顶点平均值
pub fn centroid(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::origin();
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx / n, sy / n)
}

/// 轴对齐矩形区域 `{x, y, width, height}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 获取中心点
    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// 2D包围盒
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    /// 创建新的包围盒
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 创建空的包围盒（无效状态）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(f64::MIN, f64::MIN),
        }
    }

    /// 从点集创建包围盒
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    /// 是否为空（未包含任何点）
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// 扩展包围盒以包含指定点
    pub fn expand_to_include(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 合并两个包围盒
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// 检查是否包含指定点
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// 获取中心点
    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// 获取宽度
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// 获取高度
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// 转换为 `{x, y, width, height}` 形式，空包围盒返回零区域
    pub fn to_bounds(&self) -> Bounds {
        if self.is_empty() {
            return Bounds::default();
        }
        Bounds::new(self.min.x, self.min.y, self.width(), self.height())
    }
}
