//! 正多边形

use super::{
    draw_polygon, interior_angle, interior_angle_degrees, outward_edge, point_outline,
    LABEL_LINE_SPACING,
};
use crate::context::RenderContext;
use crate::math::{angle_of, lerp_point, Point2, Vector2};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{Frame, OutlineElement, Shape, ShapeKind};
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 正多边形，外接圆圆心在原点，第一个顶点朝正上方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularPolygon {
    frame: Frame,
    sides: usize,
    radius: f64,
}

impl RegularPolygon {
    /// 边数少于 3 时按 3 处理
    pub fn new(sides: usize, radius: f64) -> Self {
        Self {
            frame: Frame::default(),
            sides: sides.max(3),
            radius: radius.abs(),
        }
    }

    pub fn sides(&self) -> usize {
        self.sides
    }

    /// 外接圆半径
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn side_length(&self) -> f64 {
        2.0 * self.radius * (PI / self.sides as f64).sin()
    }

    /// 边心距
    pub fn apothem(&self) -> f64 {
        self.radius * (PI / self.sides as f64).cos()
    }

    pub fn area(&self) -> f64 {
        let n = self.sides as f64;
        n * self.radius * self.radius * (2.0 * PI / n).sin() / 2.0
    }

    pub fn perimeter(&self) -> f64 {
        self.sides as f64 * self.side_length()
    }

    /// 内角（度）
    pub fn interior_angle(&self) -> f64 {
        let n = self.sides as f64;
        (n - 2.0) * 180.0 / n
    }

    pub fn vertices(&self) -> Vec<Point2> {
        let n = self.sides;
        (0..n)
            .map(|i| {
                let a = -PI / 2.0 + 2.0 * PI * i as f64 / n as f64;
                Point2::new(self.radius * a.cos(), self.radius * a.sin())
            })
            .collect()
    }
}

impl Shape for RegularPolygon {
    fn kind(&self) -> ShapeKind {
        ShapeKind::RegularPolygon
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
        options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        let v = self.vertices();
        let center = Point2::origin();
        let linear = |(start, end): (Point2, Point2)| MeasurementGeometry::Linear {
            start,
            end,
            guide: false,
        };
        match kind {
            MeasurementKind::Side(i) => outward_edge(&v, i).map(linear),
            // 与第一个顶点相对的边
            MeasurementKind::Base | MeasurementKind::Width => {
                outward_edge(&v, self.sides / 2).map(linear)
            }
            MeasurementKind::Radius => Some(MeasurementGeometry::Radial {
                center,
                radius: self.radius,
                direction: options
                    .direction
                    .unwrap_or_else(|| angle_of(&center, &v[0])),
                diameter: false,
            }),
            MeasurementKind::Apothem => Some(MeasurementGeometry::Linear {
                start: center,
                end: lerp_point(&v[0], &v[1], 0.5),
                guide: true,
            }),
            MeasurementKind::Angle(i) => {
                interior_angle(&v, i).map(|(vertex, start, end)| MeasurementGeometry::Angle {
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
        match kind {
            MeasurementKind::Side(_) | MeasurementKind::Base | MeasurementKind::Width => {
                Some(self.side_length())
            }
            MeasurementKind::Radius => Some(self.radius),
            MeasurementKind::Apothem => Some(self.apothem()),
            MeasurementKind::Angle(i) => interior_angle_degrees(&self.vertices(), i),
            MeasurementKind::Area => Some(self.area()),
            MeasurementKind::Perimeter => Some(self.perimeter()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, approx_eq_tol, distance, polygon_perimeter, shoelace_area};

    #[test]
    fn test_hexagon() {
        let hex = RegularPolygon::new(6, 50.0);
        assert!(approx_eq_tol(hex.perimeter(), 300.0, 1e-9));
        assert!(approx_eq_tol(hex.area(), 6495.19, 1e-2));
        assert!(approx_eq_tol(hex.interior_angle(), 120.0, 1e-12));

        // 闭式公式与顶点计算一致
        let v = hex.vertices();
        assert!(approx_eq_tol(shoelace_area(&v), hex.area(), 1e-6));
        assert!(approx_eq_tol(polygon_perimeter(&v), hex.perimeter(), 1e-9));
    }

    #[test]
    fn test_first_vertex_points_up() {
        let p = RegularPolygon::new(5, 10.0);
        let v = p.vertices();
        assert!(approx_eq(v[0].x, 0.0));
        assert!(approx_eq(v[0].y, -10.0));
    }

    #[test]
    fn test_sides_clamped() {
        let p = RegularPolygon::new(1, 10.0);
        assert_eq!(p.sides(), 3);
        assert_eq!(p.vertices().len(), 3);
    }

    #[test]
    fn test_apothem_geometry() {
        let square = RegularPolygon::new(4, 10.0);
        match square.measurement_geometry(MeasurementKind::Apothem, &MeasurementOptions::new()) {
            Some(MeasurementGeometry::Linear { start, end, guide }) => {
                assert!(guide);
                assert!(approx_eq_tol(distance(&start, &end), square.apothem(), 1e-9));
            }
            other => panic!("unexpected geometry {:?}", other),
        }
        let opts = MeasurementOptions::new();
        let angle = square.measurement_value(MeasurementKind::Angle(1), &opts).unwrap();
        assert!(approx_eq_tol(angle, 90.0, 1e-9));
    }
}
