//! 任意多边形与随机生成器
//!
//! 生成器接受调用方提供的随机数源，测试中使用固定种子即可复现。

use super::{
    draw_polygon, interior_angle, interior_angle_degrees, outward_edge, point_outline,
    LABEL_LINE_SPACING,
};
use crate::context::RenderContext;
use crate::math::{
    centroid, distance, polygon_perimeter, shoelace_area, BoundingBox2, Point2, Vector2,
};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{Frame, OutlineElement, Shape, ShapeKind};
use crate::surface::Surface;
use crate::transform::Transform2D;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// 任意顶点序列构成的多边形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrregularPolygon {
    frame: Frame,
    vertices: Vec<Point2>,
}

impl IrregularPolygon {
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self {
            frame: Frame::default(),
            vertices,
        }
    }

    /// 围绕原点的随机多边形：等分角度后加扰动，半径在 `radius·(1 ± irregularity)` 内浮动
    pub fn random(count: usize, radius: f64, irregularity: f64, rng: &mut impl Rng) -> Self {
        let count = count.max(3);
        let irregularity = crate::math::clamp(irregularity, 0.0, 0.9);
        let step = TAU / count as f64;
        let vertices = (0..count)
            .map(|i| {
                let jitter = rng.random_range(-0.4..=0.4) * step * irregularity;
                let a = -PI / 2.0 + i as f64 * step + jitter;
                let r = radius * (1.0 + rng.random_range(-irregularity..=irregularity));
                Point2::new(r * a.cos(), r * a.sin())
            })
            .collect();
        Self::new(vertices)
    }

    /// 随机凸多边形：在圆上取若干随机角度，按角度排序后连线
    pub fn convex(count: usize, radius: f64, rng: &mut impl Rng) -> Self {
        let count = count.max(3);
        let mut angles: Vec<f64> = (0..count).map(|_| rng.random_range(0.0..TAU)).collect();
        angles.sort_by(|a, b| a.total_cmp(b));
        let vertices = angles
            .into_iter()
            .map(|a| Point2::new(radius * a.cos(), radius * a.sin()))
            .collect();
        Self::new(vertices)
    }

    /// 星形：内外半径交替，第一个尖角朝上
    pub fn star(points: usize, outer_radius: f64, inner_radius: f64) -> Self {
        let points = points.max(2);
        let step = PI / points as f64;
        let vertices = (0..points * 2)
            .map(|i| {
                let r = if i % 2 == 0 { outer_radius } else { inner_radius };
                let a = -PI / 2.0 + i as f64 * step;
                Point2::new(r * a.cos(), r * a.sin())
            })
            .collect();
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    pub fn set_vertices(&mut self, vertices: Vec<Point2>) {
        self.vertices = vertices;
    }

    /// 关于局部坐标直线 y = slope·x + intercept 的镜像
    ///
    /// 镜像会翻转绕向，顶点顺序随之反转以保持原绕向。
    pub fn reflected(&self, slope: f64, intercept: f64) -> Self {
        let mirror = Transform2D::reflection(slope, intercept);
        Self {
            frame: self.frame.clone(),
            vertices: self
                .vertices
                .iter()
                .rev()
                .map(|p| mirror.transform_point(p))
                .collect(),
        }
    }

    pub fn area(&self) -> f64 {
        shoelace_area(&self.vertices)
    }

    pub fn perimeter(&self) -> f64 {
        polygon_perimeter(&self.vertices)
    }

    fn extent(&self) -> BoundingBox2 {
        BoundingBox2::from_points(self.vertices.iter().copied())
    }
}

impl Shape for IrregularPolygon {
    fn kind(&self) -> ShapeKind {
        ShapeKind::IrregularPolygon
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn outline(&self) -> Vec<OutlineElement> {
        point_outline(&self.vertices)
    }

    fn draw(&self, surface: &mut Surface, _ctx: &mut RenderContext) {
        draw_polygon(&self.vertices, &self.frame.style, surface);
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        _options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        if self.vertices.len() < 3 {
            return None;
        }
        let v = &self.vertices;
        let linear = |(start, end): (Point2, Point2)| MeasurementGeometry::Linear {
            start,
            end,
            guide: false,
        };
        let bbox = self.extent();
        let center = centroid(v);
        match kind {
            MeasurementKind::Side(i) => outward_edge(v, i).map(linear),
            // 宽高按包围盒的下边和左边标注
            MeasurementKind::Width => Some(linear((
                Point2::new(bbox.min.x, bbox.max.y),
                Point2::new(bbox.max.x, bbox.max.y),
            ))),
            MeasurementKind::Height => Some(linear((
                Point2::new(bbox.min.x, bbox.min.y),
                Point2::new(bbox.min.x, bbox.max.y),
            ))),
            MeasurementKind::Angle(i) => {
                interior_angle(v, i).map(|(vertex, start, end)| MeasurementGeometry::Angle {
                    vertex,
                    start,
                    end,
                    radius: None,
                })
            }
            MeasurementKind::Area => Some(MeasurementGeometry::Label { anchor: center }),
            MeasurementKind::Perimeter => Some(MeasurementGeometry::Label {
                anchor: center + Vector2::new(0.0, LABEL_LINE_SPACING),
            }),
            _ => None,
        }
    }

    fn measurement_value(
        &self,
        kind: MeasurementKind,
        _options: &MeasurementOptions,
    ) -> Option<f64> {
        if self.vertices.len() < 3 {
            return None;
        }
        let v = &self.vertices;
        match kind {
            MeasurementKind::Side(i) => outward_edge(v, i).map(|(a, b)| distance(&a, &b)),
            MeasurementKind::Width => Some(self.extent().width()),
            MeasurementKind::Height => Some(self.extent().height()),
            MeasurementKind::Angle(i) => interior_angle_degrees(v, i),
            MeasurementKind::Area => Some(self.area()),
            MeasurementKind::Perimeter => Some(self.perimeter()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, approx_eq_tol, signed_area};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn l_shape() -> IrregularPolygon {
        IrregularPolygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 4.0),
            Point2::new(0.0, 4.0),
        ])
    }

    #[test]
    fn test_area_and_perimeter() {
        let poly = l_shape();
        assert!(approx_eq(poly.area(), 12.0));
        assert!(approx_eq(poly.perimeter(), 16.0));
    }

    #[test]
    fn test_reflex_angle() {
        let poly = l_shape();
        let opts = MeasurementOptions::new();
        let convex = poly.measurement_value(MeasurementKind::Angle(0), &opts).unwrap();
        let reflex = poly.measurement_value(MeasurementKind::Angle(3), &opts).unwrap();
        assert!(approx_eq_tol(convex, 90.0, 1e-9));
        assert!(approx_eq_tol(reflex, 270.0, 1e-9));

        // 内角和 (n-2)·180
        let total: f64 = (0..6)
            .map(|i| poly.measurement_value(MeasurementKind::Angle(i), &opts).unwrap())
            .sum();
        assert!(approx_eq_tol(total, 720.0, 1e-9));
    }

    #[test]
    fn test_winding_does_not_change_metrics() {
        let mut reversed = l_shape();
        let mut v = reversed.vertices().to_vec();
        v.reverse();
        reversed.set_vertices(v);
        assert!(approx_eq(reversed.area(), 12.0));
        let opts = MeasurementOptions::new();
        let reflex = reversed.measurement_value(MeasurementKind::Angle(2), &opts).unwrap();
        assert!(approx_eq_tol(reflex, 270.0, 1e-9));
    }

    #[test]
    fn test_too_few_vertices_are_skipped() {
        let mut poly = IrregularPolygon::new(vec![Point2::origin(), Point2::new(1.0, 0.0)]);
        poly.add_measurement(MeasurementKind::Area, MeasurementOptions::new());
        let mut surface = Surface::new();
        let mut ctx = RenderContext::default();
        poly.render(&mut surface, &mut ctx);
        assert_eq!(surface.count("Polygon"), 0);
        assert!(surface.texts().is_empty());
    }

    #[test]
    fn test_seeded_generators_are_reproducible() {
        let a = IrregularPolygon::random(7, 50.0, 0.3, &mut StdRng::seed_from_u64(42));
        let b = IrregularPolygon::random(7, 50.0, 0.3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.vertices(), b.vertices());
        assert_eq!(a.vertices().len(), 7);
        for p in a.vertices() {
            let r = (p - Point2::origin()).norm();
            assert!((35.0 - 1e-9..=65.0 + 1e-9).contains(&r));
        }
    }

    #[test]
    fn test_convex_generator() {
        let poly = IrregularPolygon::convex(8, 20.0, &mut StdRng::seed_from_u64(7));
        let v = poly.vertices();
        assert_eq!(v.len(), 8);
        // 按角度排序后所有转向一致
        let n = v.len();
        let turns: Vec<f64> = (0..n)
            .map(|i| {
                let a = v[i];
                let b = v[(i + 1) % n];
                let c = v[(i + 2) % n];
                (b - a).perp(&(c - b))
            })
            .collect();
        assert!(turns.iter().all(|t| *t >= -1e-9) || turns.iter().all(|t| *t <= 1e-9));
        assert!(signed_area(v) > 0.0);
    }

    #[test]
    fn test_reflection_across_diagonal() {
        let poly = l_shape();
        let mirrored = poly.reflected(1.0, 0.0);
        // 关于 y = x 镜像即交换坐标
        assert!(mirrored
            .vertices()
            .iter()
            .any(|p| approx_eq_tol(p.x, 4.0, 1e-9) && approx_eq_tol(p.y, 2.0, 1e-9)));
        assert!(approx_eq_tol(mirrored.area(), poly.area(), 1e-9));
        assert!(signed_area(mirrored.vertices()) * signed_area(poly.vertices()) > 0.0);
    }

    #[test]
    fn test_star() {
        let star = IrregularPolygon::star(5, 10.0, 4.0);
        assert_eq!(star.vertices().len(), 10);
        assert!(approx_eq(star.vertices()[0].y, -10.0));
        let r1 = (star.vertices()[1] - Point2::origin()).norm();
        assert!(approx_eq(r1, 4.0));
    }
}
