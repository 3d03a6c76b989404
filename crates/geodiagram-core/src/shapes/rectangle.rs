//! 矩形

use super::{
    draw_polygon, draw_right_angle_mark, interior_angle, interior_angle_degrees, outward_edge,
    point_outline, LABEL_LINE_SPACING,
};
use crate::context::RenderContext;
use crate::math::{centroid, distance, polygon_perimeter, Point2};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{Frame, OutlineElement, Shape, ShapeKind};
use crate::surface::Surface;
use serde::{Deserialize, Serialize};

/// 矩形，局部坐标左上角在原点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    frame: Frame,
    width: f64,
    height: f64,
}

impl Rectangle {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            frame: Frame::default(),
            width: width.abs(),
            height: height.abs(),
        }
    }

    /// 正方形
    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// 顶点：左上、右上、右下、左下
    pub fn vertices(&self) -> [Point2; 4] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(self.width, 0.0),
            Point2::new(self.width, self.height),
            Point2::new(0.0, self.height),
        ]
    }
}

impl Shape for Rectangle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
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
        match kind {
            MeasurementKind::Width | MeasurementKind::Length | MeasurementKind::Base => {
                outward_edge(&v, 2).map(linear)
            }
            MeasurementKind::Height => outward_edge(&v, 3).map(linear),
            MeasurementKind::Side(i) => outward_edge(&v, i).map(linear),
            MeasurementKind::Diagonal => Some(MeasurementGeometry::Linear {
                start: v[0],
                end: v[2],
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
                anchor: center + crate::math::Vector2::new(0.0, LABEL_LINE_SPACING),
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
        match kind {
            MeasurementKind::Width | MeasurementKind::Length | MeasurementKind::Base => {
                Some(self.width)
            }
            MeasurementKind::Height => Some(self.height),
            MeasurementKind::Side(i) => {
                outward_edge(&v, i).map(|(a, b)| distance(&a, &b))
            }
            MeasurementKind::Diagonal => Some(self.diagonal()),
            MeasurementKind::Angle(i) => interior_angle_degrees(&v, i),
            MeasurementKind::Area => Some(self.area()),
            MeasurementKind::Perimeter => Some(polygon_perimeter(&v)),
            _ => None,
        }
    }

    /// 左下角的直角标记
    fn draw_marks(&self, surface: &mut Surface, ctx: &mut RenderContext) {
        let [_, _, bottom_right, bottom_left] = self.vertices();
        draw_right_angle_mark(
            &self.transform(),
            bottom_left,
            bottom_right,
            Point2::origin(),
            surface,
            ctx,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagramOptions;
    use crate::math::{approx_eq, approx_eq_tol};
    use crate::style::{Color, StylePatch};
    use crate::surface::Primitive;

    #[test]
    fn test_metrics() {
        let rect = Rectangle::new(5.0, 3.0);
        assert!(approx_eq(rect.area(), 15.0));
        assert!(approx_eq(rect.perimeter(), 16.0));
        assert!(approx_eq_tol(rect.diagonal(), 5.831, 1e-3));

        let opts = MeasurementOptions::new();
        assert_eq!(rect.measurement_value(MeasurementKind::Area, &opts), Some(15.0));
        assert!(approx_eq(
            rect.measurement_value(MeasurementKind::Perimeter, &opts).unwrap(),
            16.0
        ));
        assert!(approx_eq(
            rect.measurement_value(MeasurementKind::Angle(2), &opts).unwrap(),
            90.0
        ));
    }

    #[test]
    fn test_width_dimension_sits_below() {
        let rect = Rectangle::new(100.0, 40.0);
        match rect.measurement_geometry(MeasurementKind::Width, &MeasurementOptions::new()) {
            Some(MeasurementGeometry::Linear { start, end, .. }) => {
                // 正偏移的法向 (-dy, dx) 朝下，即形状外侧
                let dir = (end - start).normalize();
                assert!(dir.x > 0.0);
                assert!(approx_eq(start.y, 40.0));
                assert!(approx_eq(end.y, 40.0));
                assert!(start.x < end.x);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_height_dimension_sits_left() {
        let rect = Rectangle::new(100.0, 40.0);
        match rect.measurement_geometry(MeasurementKind::Height, &MeasurementOptions::new()) {
            Some(MeasurementGeometry::Linear { start, end, .. }) => {
                let dir = (end - start).normalize();
                let normal_x = -dir.y;
                assert!(normal_x < 0.0);
                assert!(approx_eq(start.x, 0.0));
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_bounds_follow_placement() {
        let mut rect = Rectangle::new(100.0, 50.0);
        rect.set_position(10.0, 20.0).scale(2.0);
        let b = rect.bounds();
        assert!(approx_eq(b.x, 10.0));
        assert!(approx_eq(b.y, 20.0));
        assert!(approx_eq(b.width, 200.0));
        assert!(approx_eq(b.height, 100.0));

        rect.rotate(90.0);
        let b = rect.bounds();
        assert!(approx_eq_tol(b.width, 100.0, 1e-9));
        assert!(approx_eq_tol(b.height, 200.0, 1e-9));
    }

    #[test]
    fn test_render_with_measurements() {
        let mut rect = Rectangle::new(5.0, 3.0);
        rect.set_style(StylePatch::new().fill(Color::YELLOW))
            .add_measurement(MeasurementKind::Width, MeasurementOptions::new())
            .add_measurement(MeasurementKind::Area, MeasurementOptions::new());

        let mut surface = Surface::new();
        let mut ctx = RenderContext::new(DiagramOptions::default());
        rect.render(&mut surface, &mut ctx);

        assert_eq!(surface.texts(), vec!["5", "A = 15"]);
        match &surface.primitives()[0] {
            Primitive::Group { children, .. } => match &children[0] {
                Primitive::Polygon { points, attrs } => {
                    assert_eq!(points.len(), 4);
                    assert_eq!(attrs.fill, crate::style::Paint::Solid(Color::YELLOW));
                }
                other => panic!("unexpected primitive {:?}", other),
            },
            other => panic!("unexpected primitive {:?}", other),
        }
        // 直角标记
        assert_eq!(surface.count("Polyline"), 1);
    }

    #[test]
    fn test_measurements_can_be_disabled() {
        let mut rect = Rectangle::new(5.0, 3.0);
        rect.add_measurement_named("diagonal", MeasurementOptions::new())
            .add_measurement_named("not-a-kind", MeasurementOptions::new());
        assert_eq!(rect.measurements().len(), 1);

        let mut surface = Surface::new();
        let mut ctx = RenderContext::new(DiagramOptions {
            show_measurements: false,
            show_right_angle_marks: false,
            ..Default::default()
        });
        rect.render(&mut surface, &mut ctx);
        assert!(surface.texts().is_empty());
        assert_eq!(surface.count("Polyline"), 0);
    }

    #[test]
    fn test_zero_size_does_not_panic() {
        let mut rect = Rectangle::new(0.0, 0.0);
        rect.add_measurement(MeasurementKind::Width, MeasurementOptions::new());
        let mut surface = Surface::new();
        let mut ctx = RenderContext::default();
        rect.render(&mut surface, &mut ctx);
        assert!(surface.texts().is_empty());
    }
}
