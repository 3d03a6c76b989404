//! 三角形
//!
//! 三种构造方式共用同一组顶点约定：底边在下（y = 高），第三个顶点在上。
//! - 直角：直角顶点在左下，高就是左侧直角边
//! - 等边：顶点居中，高为 边长·√3/2
//! - 等腰：顶点居中，高由调用方给定

use super::{
    draw_polygon, draw_right_angle_mark, interior_angle, interior_angle_degrees, outward_edge,
    point_outline, LABEL_LINE_SPACING,
};
use crate::context::RenderContext;
use crate::math::{centroid, distance, polygon_perimeter, Point2, Vector2};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{Frame, OutlineElement, Shape, ShapeKind};
use crate::surface::Surface;
use serde::{Deserialize, Serialize};

/// 三角形类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriangleVariant {
    Right,
    Equilateral,
    Isosceles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    frame: Frame,
    variant: TriangleVariant,
    base: f64,
    height: f64,
}

impl Triangle {
    /// 直角三角形：两条直角边分别为 base（水平）和 height（竖直）
    pub fn right(base: f64, height: f64) -> Self {
        Self::with_variant(TriangleVariant::Right, base, height)
    }

    /// 等边三角形
    pub fn equilateral(side: f64) -> Self {
        let side = side.abs();
        Self::with_variant(TriangleVariant::Equilateral, side, side * 3f64.sqrt() / 2.0)
    }

    /// 等腰三角形
    pub fn isosceles(base: f64, height: f64) -> Self {
        Self::with_variant(TriangleVariant::Isosceles, base, height)
    }

    fn with_variant(variant: TriangleVariant, base: f64, height: f64) -> Self {
        Self {
            frame: Frame::default(),
            variant,
            base: base.abs(),
            height: height.abs(),
        }
    }

    pub fn variant(&self) -> TriangleVariant {
        self.variant
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// 顶点：底边左端、底边右端、第三个顶点
    pub fn vertices(&self) -> [Point2; 3] {
        let (b, h) = (self.base, self.height);
        let apex = match self.variant {
            TriangleVariant::Right => Point2::new(0.0, 0.0),
            TriangleVariant::Equilateral | TriangleVariant::Isosceles => Point2::new(b / 2.0, 0.0),
        };
        [Point2::new(0.0, h), Point2::new(b, h), apex]
    }

    pub fn area(&self) -> f64 {
        self.base * self.height / 2.0
    }

    pub fn perimeter(&self) -> f64 {
        match self.variant {
            TriangleVariant::Right => self.base + self.height + self.hypotenuse(),
            TriangleVariant::Equilateral => 3.0 * self.base,
            TriangleVariant::Isosceles => self.base + 2.0 * self.slant(),
        }
    }

    /// 斜边（仅对直角三角形有意义）
    pub fn hypotenuse(&self) -> f64 {
        self.base.hypot(self.height)
    }

    /// 腰长
    pub fn slant(&self) -> f64 {
        match self.variant {
            TriangleVariant::Right => self.hypotenuse(),
            TriangleVariant::Equilateral => self.base,
            TriangleVariant::Isosceles => (self.base / 2.0).hypot(self.height),
        }
    }

    /// 高所在的线段：从顶点到底边的垂足
    fn altitude(&self) -> (Point2, Point2) {
        let [left, _, apex] = self.vertices();
        (apex, Point2::new(apex.x, left.y))
    }
}

impl Shape for Triangle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Triangle
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn outline(&self) -> Vec<OutlineElement> {
        point_outline(&self.vertices())
    }

    fn draw(&self, surface: &mut Surface, _ctx: &mut RenderContext) {
        draw_polygon(&self.vertices(), &self.frame.style, surface);
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        _options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        let v = self.vertices();
        let linear = |(start, end): (Point2, Point2)| MeasurementGeometry::Linear {
            start,
            end,
            guide: false,
        };
        let center = centroid(&v);
        match (kind, self.variant) {
            (MeasurementKind::Base | MeasurementKind::Width, _) => outward_edge(&v, 0).map(linear),
            // 直角三角形的高就是左侧直角边
            (MeasurementKind::Height, TriangleVariant::Right) => outward_edge(&v, 2).map(linear),
            (MeasurementKind::Height, _) => {
                let (start, end) = self.altitude();
                Some(MeasurementGeometry::Linear {
                    start,
                    end,
                    guide: true,
                })
            }
            (MeasurementKind::Hypotenuse, TriangleVariant::Right) => {
                outward_edge(&v, 1).map(linear)
            }
            (MeasurementKind::Slant, _) => outward_edge(&v, 1).map(linear),
            (MeasurementKind::Side(i), _) => outward_edge(&v, i).map(linear),
            (MeasurementKind::Angle(i), _) => {
                interior_angle(&v, i).map(|(vertex, start, end)| MeasurementGeometry::Angle {
                    vertex,
                    start,
                    end,
                    radius: None,
                })
            }
            (MeasurementKind::Area, _) => Some(MeasurementGeometry::Label { anchor: center }),
            (MeasurementKind::Perimeter, _) => Some(MeasurementGeometry::Label {
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
        let v = self.vertices();
        match (kind, self.variant) {
            (MeasurementKind::Base | MeasurementKind::Width, _) => Some(self.base),
            (MeasurementKind::Height, _) => Some(self.height),
            (MeasurementKind::Hypotenuse, TriangleVariant::Right) => Some(self.hypotenuse()),
            (MeasurementKind::Slant, _) => Some(self.slant()),
            (MeasurementKind::Side(i), _) => outward_edge(&v, i).map(|(a, b)| distance(&a, &b)),
            (MeasurementKind::Angle(i), _) => interior_angle_degrees(&v, i),
            (MeasurementKind::Area, _) => Some(self.area()),
            (MeasurementKind::Perimeter, _) => Some(self.perimeter()),
            _ => None,
        }
    }

    fn draw_marks(&self, surface: &mut Surface, ctx: &mut RenderContext) {
        let transform = self.transform();
        let [left, right, apex] = self.vertices();
        match self.variant {
            TriangleVariant::Right => {
                draw_right_angle_mark(&transform, left, right, apex, surface, ctx);
            }
            // 高与底边的垂足，只在画出高时标记
            _ if self
                .measurements()
                .iter()
                .any(|m| m.kind == MeasurementKind::Height) =>
            {
                let (top, foot) = self.altitude();
                draw_right_angle_mark(&transform, foot, right, top, surface, ctx);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, approx_eq_tol};
    use crate::surface::Primitive;

    #[test]
    fn test_right_triangle() {
        let t = Triangle::right(6.0, 4.0);
        let opts = MeasurementOptions::new();
        assert!(approx_eq(t.area(), 12.0));
        assert!(approx_eq(t.perimeter(), 6.0 + 4.0 + 52f64.sqrt()));
        assert!(approx_eq(t.hypotenuse(), 52f64.sqrt()));

        // 高的标注落在左侧直角边上
        match t.measurement_geometry(MeasurementKind::Height, &opts) {
            Some(MeasurementGeometry::Linear { start, end, guide }) => {
                assert!(!guide);
                assert!(approx_eq(start.x, 0.0));
                assert!(approx_eq(end.x, 0.0));
                assert!(approx_eq(distance(&start, &end), 4.0));
            }
            other => panic!("unexpected geometry {:?}", other),
        }
        assert!(approx_eq(
            t.measurement_value(MeasurementKind::Angle(0), &opts).unwrap(),
            90.0
        ));
    }

    #[test]
    fn test_equilateral() {
        let t = Triangle::equilateral(10.0);
        assert!(approx_eq(t.height(), 10.0 * 3f64.sqrt() / 2.0));
        assert!(approx_eq(t.perimeter(), 30.0));
        let opts = MeasurementOptions::new();
        for i in 0..3 {
            let angle = t.measurement_value(MeasurementKind::Angle(i), &opts).unwrap();
            assert!(approx_eq_tol(angle, 60.0, 1e-9));
            let side = t.measurement_value(MeasurementKind::Side(i), &opts).unwrap();
            assert!(approx_eq_tol(side, 10.0, 1e-9));
        }
    }

    #[test]
    fn test_isosceles_height_is_guided_altitude() {
        let t = Triangle::isosceles(8.0, 3.0);
        assert!(approx_eq(t.slant(), 5.0));
        assert!(approx_eq(t.perimeter(), 18.0));
        match t.measurement_geometry(MeasurementKind::Height, &MeasurementOptions::new()) {
            Some(MeasurementGeometry::Linear { start, end, guide }) => {
                assert!(guide);
                assert!(approx_eq(start.x, 4.0));
                assert!(approx_eq(end.x, 4.0));
                assert!(approx_eq(distance(&start, &end), 3.0));
            }
            other => panic!("unexpected geometry {:?}", other),
        }
        assert_eq!(
            t.measurement_geometry(MeasurementKind::Hypotenuse, &MeasurementOptions::new()),
            None
        );
    }

    #[test]
    fn test_altitude_renders_dashed_guide_and_mark() {
        let mut t = Triangle::isosceles(80.0, 60.0);
        t.add_measurement(MeasurementKind::Height, MeasurementOptions::new());
        let mut surface = Surface::new();
        let mut ctx = RenderContext::default();
        t.render(&mut surface, &mut ctx);

        let dashed = surface
            .flatten()
            .into_iter()
            .filter(|p| matches!(p, Primitive::Line { attrs, .. } if !attrs.dash_array.is_empty()))
            .count();
        assert_eq!(dashed, 1);
        assert_eq!(surface.count("Polyline"), 1);
        assert_eq!(surface.texts(), vec!["60"]);
    }

    #[test]
    fn test_base_is_below() {
        let t = Triangle::right(6.0, 4.0);
        match t.measurement_geometry(MeasurementKind::Base, &MeasurementOptions::new()) {
            Some(MeasurementGeometry::Linear { start, end, .. }) => {
                assert!(approx_eq(start.y, 4.0));
                assert!(end.x > start.x);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }
}
