//! 平面图形
//!
//! 所有平面图形都在局部坐标系（y 轴向下）中定义顶点，
//! 由 [`crate::shape::Frame`] 负责放置。

mod circle;
mod composite;
mod irregular;
mod polygon;
mod rectangle;
mod triangle;

pub use circle::Circle;
pub use composite::{CompositeOperation, CompositeShape};
pub use irregular::IrregularPolygon;
pub use polygon::RegularPolygon;
pub use rectangle::Rectangle;
pub use triangle::{Triangle, TriangleVariant};

use crate::context::RenderContext;
use crate::error::GeometryError;
use crate::math::{angle_of, distance, signed_area, Point2, EPSILON};
use crate::measurement::arc::{render_right_angle, sweep_degrees};
use crate::shape::OutlineElement;
use crate::style::Style;
use crate::surface::{Primitive, Surface};
use crate::transform::Transform2D;

/// 多行文字标注（面积、周长）之间的行距
pub(crate) const LABEL_LINE_SPACING: f64 = 18.0;

/// 第 i 条边的端点，顺序保证正偏移落在多边形外侧
pub(crate) fn outward_edge(points: &[Point2], index: usize) -> Option<(Point2, Point2)> {
    let n = points.len();
    if n < 2 {
        return None;
    }
    let a = points[index % n];
    let b = points[(index + 1) % n];
    // 屏幕坐标下有向面积为正即顺时针，此时行进方向右侧是内部
    if signed_area(points) > 0.0 {
        Some((b, a))
    } else {
        Some((a, b))
    }
}

/// 第 i 个顶点处内角的起止方向（度），从 start 顺时针扫到 end 落在多边形内部
pub(crate) fn interior_angle(points: &[Point2], index: usize) -> Option<(Point2, f64, f64)> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let i = index % n;
    let vertex = points[i];
    let prev = points[(i + n - 1) % n];
    let next = points[(i + 1) % n];
    if distance(&vertex, &prev) < EPSILON || distance(&vertex, &next) < EPSILON {
        return None;
    }
    let to_prev = angle_of(&vertex, &prev);
    let to_next = angle_of(&vertex, &next);
    if signed_area(points) > 0.0 {
        Some((vertex, to_next, to_prev))
    } else {
        Some((vertex, to_prev, to_next))
    }
}

/// 内角大小（度）
pub(crate) fn interior_angle_degrees(points: &[Point2], index: usize) -> Option<f64> {
    interior_angle(points, index).map(|(_, start, end)| sweep_degrees(start, end))
}

pub(crate) fn point_outline(points: &[Point2]) -> Vec<OutlineElement> {
    points.iter().copied().map(OutlineElement::Point).collect()
}

/// 输出多边形本体；顶点不足 3 个时记录警告并跳过
pub(crate) fn draw_polygon(points: &[Point2], style: &Style, surface: &mut Surface) -> bool {
    if points.len() < 3 {
        tracing::warn!(
            "Skipping polygon body: {}",
            GeometryError::TooFewVertices {
                count: points.len()
            }
        );
        return false;
    }
    surface.push(Primitive::Polygon {
        points: points.to_vec(),
        attrs: style.to_attributes(),
    });
    true
}

/// 在父坐标系中绘制局部顶点处的直角标记，标记大小不随形状缩放
pub(crate) fn draw_right_angle_mark(
    transform: &Transform2D,
    vertex: Point2,
    toward_a: Point2,
    toward_b: Point2,
    surface: &mut Surface,
    ctx: &RenderContext,
) {
    render_right_angle(
        transform.transform_point(&vertex),
        transform.transform_point(&toward_a),
        transform.transform_point(&toward_b),
        &ctx.style,
        surface,
    );
}
