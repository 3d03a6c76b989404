//! 球
//!
//! 经纬网格只用于满足顶点/面/棱的接口，实际绘制是一个带径向渐变的圆，
//! 加上一圈虚线赤道和左上方的高光弧。

use super::mesh::{label_below, SolidGeometry, SolidView};
use super::round::{DEFAULT_SEGMENTS, MIN_SEGMENTS};
use super::solid::Solid;
use crate::context::RenderContext;
use crate::math::{Point2, Point3, Vector2, Vector3};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{OutlineElement, ShapeKind};
use crate::style::{Attributes, Color, LineType, Paint, Style};
use crate::surface::{Gradient, GradientStop, PathCommand, Primitive, Surface};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 渐变焦点（相对包围盒），偏向左上
const GRADIENT_FOCUS: f64 = 0.35;
/// 高光弧的半径比例与起止角度（度，屏幕坐标）
const HIGHLIGHT_RADIUS: f64 = 0.7;
const HIGHLIGHT_ARC: (f64, f64) = (200.0, 250.0);
const HIGHLIGHT_OPACITY: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub radius: f64,
    /// 经线数；纬向分段取其一半（至少 3）
    pub segments: usize,
}

pub type Sphere = Solid<Ball>;

impl Solid<Ball> {
    pub fn new(radius: f64) -> Self {
        Solid::from_geometry(Ball {
            radius: radius.abs(),
            segments: DEFAULT_SEGMENTS,
        })
    }

    pub fn set_segments(&mut self, segments: usize) -> &mut Self {
        self.geometry_mut().segments = segments.max(MIN_SEGMENTS);
        self
    }
}

impl Ball {
    fn slices(&self) -> usize {
        self.segments.max(MIN_SEGMENTS)
    }

    fn stacks(&self) -> usize {
        (self.slices() / 2).max(3)
    }

    /// 第 k 条纬线上第 j 个点的序号（k 取 1..stacks）
    fn index(&self, k: usize, j: usize) -> usize {
        let slices = self.slices();
        1 + (k - 1) * slices + j % slices
    }

    fn bottom_pole(&self) -> usize {
        1 + (self.stacks() - 1) * self.slices()
    }

    /// 屏幕上的半径：三个坐标平面大圆投影后长半轴的最大值
    pub fn screen_radius(&self, view: &SolidView) -> f64 {
        let center = Point3::origin();
        [
            (Vector3::x(), Vector3::y()),
            (Vector3::y(), Vector3::z()),
            (Vector3::x(), Vector3::z()),
        ]
        .iter()
        .map(|(u, v)| view.project_circle(&center, self.radius, u, v).rx)
        .fold(0.0, f64::max)
    }

    fn gradient(&self, id: String, base: Color) -> Gradient {
        Gradient {
            id,
            cx: 0.5,
            cy: 0.5,
            r: 0.5,
            fx: GRADIENT_FOCUS,
            fy: GRADIENT_FOCUS,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: base.shade(0.6),
                    opacity: 1.0,
                },
                GradientStop {
                    offset: 0.5,
                    color: base,
                    opacity: 1.0,
                },
                GradientStop {
                    offset: 1.0,
                    color: base.shade(-0.35),
                    opacity: 1.0,
                },
            ],
        }
    }
}

fn point_on_circle(center: Point2, radius: f64, degrees: f64) -> Point2 {
    let a = degrees.to_radians();
    center + Vector2::new(a.cos(), a.sin()) * radius
}

impl SolidGeometry for Ball {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Sphere
    }

    /// 北极、各纬线（自上而下）、南极
    fn vertices_3d(&self) -> Vec<Point3> {
        let (stacks, slices) = (self.stacks(), self.slices());
        let r = self.radius;
        let mut vertices = vec![Point3::new(0.0, r, 0.0)];
        for k in 1..stacks {
            let theta = PI * k as f64 / stacks as f64;
            let (y, rho) = (r * theta.cos(), r * theta.sin());
            vertices.extend((0..slices).map(|j| {
                let phi = 2.0 * PI * j as f64 / slices as f64;
                Point3::new(rho * phi.cos(), y, rho * phi.sin())
            }));
        }
        vertices.push(Point3::new(0.0, -r, 0.0));
        vertices
    }

    fn faces(&self) -> Vec<Vec<usize>> {
        let (stacks, slices) = (self.stacks(), self.slices());
        let bottom = self.bottom_pole();
        let mut faces = Vec::with_capacity(stacks * slices);
        for j in 0..slices {
            faces.push(vec![0, self.index(1, j), self.index(1, j + 1)]);
        }
        for k in 1..stacks - 1 {
            for j in 0..slices {
                faces.push(vec![
                    self.index(k, j),
                    self.index(k + 1, j),
                    self.index(k + 1, j + 1),
                    self.index(k, j + 1),
                ]);
            }
        }
        for j in 0..slices {
            faces.push(vec![
                bottom,
                self.index(stacks - 1, j + 1),
                self.index(stacks - 1, j),
            ]);
        }
        faces
    }

    /// 纬线段与经线段
    fn edges(&self) -> Vec<(usize, usize)> {
        let (stacks, slices) = (self.stacks(), self.slices());
        let bottom = self.bottom_pole();
        let mut edges = Vec::new();
        for k in 1..stacks {
            for j in 0..slices {
                edges.push((self.index(k, j), self.index(k, j + 1)));
            }
        }
        for j in 0..slices {
            edges.push((0, self.index(1, j)));
            for k in 1..stacks - 1 {
                edges.push((self.index(k, j), self.index(k + 1, j)));
            }
            edges.push((self.index(stacks - 1, j), bottom));
        }
        edges
    }

    fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.radius.powi(3)
    }

    fn surface_area(&self) -> f64 {
        4.0 * PI * self.radius * self.radius
    }

    fn outline(&self, view: &SolidView) -> Vec<OutlineElement> {
        let rho = self.screen_radius(view);
        vec![OutlineElement::Ellipse {
            center: view.project(&Point3::origin()),
            rx: rho,
            ry: rho,
            rotation: 0.0,
        }]
    }

    fn render_projected(
        &self,
        view: &SolidView,
        style: &Style,
        surface: &mut Surface,
        ctx: &mut RenderContext,
    ) {
        let center = view.project(&Point3::origin());
        let rho = self.screen_radius(view);
        let base = style.fill.unwrap_or(Color::DEFAULT_FILL);

        let id = ctx.ids.next_id("sphere-gradient");
        surface.add_gradient(self.gradient(id.clone(), base));
        surface.push(Primitive::Circle {
            center,
            radius: rho,
            attrs: style.attributes_with_fill(Paint::Gradient(id)),
        });

        if style.stroke.is_some() {
            let equator =
                view.project_circle(&Point3::origin(), self.radius, &Vector3::x(), &Vector3::z());
            let dashed = style.outline_attributes().with_dash(&LineType::Dashed);
            surface.push(equator.to_primitive(dashed));
        }

        let highlight = rho * HIGHLIGHT_RADIUS;
        let (start, end) = HIGHLIGHT_ARC;
        surface.push(Primitive::Path {
            commands: vec![
                PathCommand::MoveTo(point_on_circle(center, highlight, start)),
                PathCommand::ArcTo {
                    rx: highlight,
                    ry: highlight,
                    x_axis_rotation: 0.0,
                    large_arc: false,
                    sweep: true,
                    to: point_on_circle(center, highlight, end),
                },
            ],
            attrs: Attributes::stroked(Color::WHITE, style.stroke_width * 1.5)
                .with_opacity(HIGHLIGHT_OPACITY),
        });
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        view: &SolidView,
        options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        let center = view.project(&Point3::origin());
        let rho = self.screen_radius(view);
        match kind {
            MeasurementKind::Radius | MeasurementKind::Diameter => {
                Some(MeasurementGeometry::Radial {
                    center,
                    radius: rho,
                    direction: options.direction.unwrap_or(0.0),
                    diameter: kind == MeasurementKind::Diameter,
                })
            }
            MeasurementKind::Volume | MeasurementKind::SurfaceArea => {
                let extent = [
                    center - Vector2::new(rho, rho),
                    center + Vector2::new(rho, rho),
                ];
                label_below(&extent, usize::from(kind == MeasurementKind::SurfaceArea))
            }
            _ => None,
        }
    }

    fn measurement_value(&self, kind: MeasurementKind) -> Option<f64> {
        match kind {
            MeasurementKind::Radius => Some(self.radius),
            MeasurementKind::Diameter => Some(2.0 * self.radius),
            MeasurementKind::Volume => Some(self.volume()),
            MeasurementKind::SurfaceArea => Some(self.surface_area()),
            _ => None,
        }
    }
}
