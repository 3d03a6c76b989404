//! 圆

use super::LABEL_LINE_SPACING;
use crate::context::RenderContext;
use crate::math::{deg_to_rad, Point2, Vector2};
use crate::measurement::arc::sweep_degrees;
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{Frame, OutlineElement, Shape, ShapeKind};
use crate::surface::{Primitive, Surface};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 默认的弧长标注范围（度）
const DEFAULT_ARC: (f64, f64) = (0.0, 90.0);

/// 圆，局部坐标圆心在原点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    frame: Frame,
    radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Self {
        Self {
            frame: Frame::default(),
            radius: radius.abs(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    /// 从 start 顺时针到 end 的弧长
    pub fn arc_length(&self, start_degrees: f64, end_degrees: f64) -> f64 {
        self.radius * deg_to_rad(sweep_degrees(start_degrees, end_degrees))
    }
}

impl Shape for Circle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn outline(&self) -> Vec<OutlineElement> {
        vec![OutlineElement::Ellipse {
            center: Point2::origin(),
            rx: self.radius,
            ry: self.radius,
            rotation: 0.0,
        }]
    }

    fn draw(&self, surface: &mut Surface, _ctx: &mut RenderContext) {
        surface.push(Primitive::Circle {
            center: Point2::origin(),
            radius: self.radius,
            attrs: self.frame.style.to_attributes(),
        });
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        let center = Point2::origin();
        match kind {
            MeasurementKind::Radius | MeasurementKind::Diameter => {
                Some(MeasurementGeometry::Radial {
                    center,
                    radius: self.radius,
                    direction: options.direction.unwrap_or(0.0),
                    diameter: kind == MeasurementKind::Diameter,
                })
            }
            MeasurementKind::ArcLength => {
                let (start, end) = options.arc.unwrap_or(DEFAULT_ARC);
                Some(MeasurementGeometry::Arc {
                    center,
                    radius: self.radius,
                    start,
                    end,
                })
            }
            // 周长写在圆的下方
            MeasurementKind::Circumference => Some(MeasurementGeometry::Label {
                anchor: center + Vector2::new(0.0, self.radius + LABEL_LINE_SPACING),
            }),
            MeasurementKind::Area => Some(MeasurementGeometry::Label {
                anchor: center + Vector2::new(0.0, self.radius / 2.0),
            }),
            _ => None,
        }
    }

    fn measurement_value(
        &self,
        kind: MeasurementKind,
        options: &MeasurementOptions,
    ) -> Option<f64> {
        match kind {
            MeasurementKind::Radius => Some(self.radius),
            MeasurementKind::Diameter => Some(self.diameter()),
            MeasurementKind::Circumference => Some(self.circumference()),
            MeasurementKind::ArcLength => {
                let (start, end) = options.arc.unwrap_or(DEFAULT_ARC);
                Some(self.arc_length(start, end))
            }
            MeasurementKind::Area => Some(self.area()),
            _ => None,
        }
    }
}
