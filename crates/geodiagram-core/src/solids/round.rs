//! 圆柱与圆锥
//!
//! 底面（和顶面）圆用 N 段折线近似，面列表包含侧面和端面扇形，
//! 但绘制不走画家算法：端面画成投影椭圆，侧面只填充第 25% 到 75%
//! 段之间的"可见"部分。这是近似做法，不是真正的可见性判断。
//!
//! 端面椭圆不按 `sin θ` 压扁，而是由圆的两条正交半径投影后的共轭半径求出，
//! 与侧面采样点落在同一条曲线上。默认等轴测下短轴与长轴之比为 `tan θ`，
//! 换成其他投影或三维朝向时同样精确。

use super::mesh::{summary_label, ProjectedEllipse, SolidGeometry, SolidView};
use super::solid::Solid;
use crate::config::DiagramOptions;
use crate::context::RenderContext;
use crate::math::{Point2, Point3, Vector3};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{OutlineElement, ShapeKind};
use crate::style::{Attributes, Color, LineType, Paint, Style};
use crate::surface::{Primitive, Surface};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const DEFAULT_SEGMENTS: usize = 16;
pub const MIN_SEGMENTS: usize = 6;

/// 底面与顶面的明暗
const BOTTOM_SHADE: f64 = -0.15;
const TOP_SHADE: f64 = 0.15;

/// 半径为 radius、高度为 y 的水平圆上的 n 个采样点
///
/// 起始角使第 n/4 个点落在默认等轴测视图的最右侧，第 3n/4 个点落在最左侧。
fn ring(radius: f64, y: f64, n: usize) -> Vec<Point3> {
    (0..n)
        .map(|i| {
            let phi = 2.0 * PI * i as f64 / n as f64 - 0.75 * PI;
            Point3::new(radius * phi.cos(), y, radius * phi.sin())
        })
        .collect()
}

/// 侧面可见段的起止序号
fn visible_range(n: usize) -> (usize, usize) {
    (n / 4, 3 * n / 4)
}

/// 水平圆的投影椭圆（共轭半径法，精确经过 ring 的投影点）
fn horizontal_circle(view: &SolidView, center: Point3, radius: f64) -> ProjectedEllipse {
    view.project_circle(&center, radius, &Vector3::x(), &Vector3::z())
}

/// 曲面立体的顶端：圆柱的顶面或圆锥的顶点
enum Top<'a> {
    Cap(ProjectedEllipse, &'a [Point2]),
    Apex(Point2),
}

/// 曲面立体的专用绘制：底面椭圆、可见侧面、顶面椭圆，最后按需画出底面背侧虚线
fn paint_curved(
    base: &ProjectedEllipse,
    ring: &[Point2],
    top: Top<'_>,
    style: &Style,
    options: &DiagramOptions,
    surface: &mut Surface,
) {
    let n = ring.len();
    if n < 3 {
        tracing::warn!("Curved surface needs at least 3 samples, got {}", n);
        return;
    }
    let fill = style.fill.unwrap_or(Color::DEFAULT_FILL);
    let (q1, q3) = visible_range(n);

    let base_attrs = style.attributes_with_fill(Paint::Solid(fill.shade(BOTTOM_SHADE)));
    surface.push(base.to_primitive(base_attrs));

    let mut side: Vec<Point2> = ring[q1..=q3].to_vec();
    let silhouette = match &top {
        Top::Cap(_, top_ring) => {
            side.extend((q1..=q3).rev().map(|i| top_ring[i]));
            [(ring[q1], top_ring[q1]), (ring[q3], top_ring[q3])]
        }
        Top::Apex(apex) => {
            side.push(*apex);
            [(ring[q1], *apex), (ring[q3], *apex)]
        }
    };
    surface.push(Primitive::Polygon {
        points: side,
        attrs: Attributes {
            fill: Paint::Solid(fill),
            fill_opacity: style.fill_opacity,
            opacity: style.opacity,
            ..Default::default()
        },
    });
    if style.stroke.is_some() {
        for (from, to) in silhouette {
            surface.push(Primitive::Line {
                from,
                to,
                attrs: style.outline_attributes(),
            });
        }
    }

    if let Top::Cap(cap, _) = &top {
        let cap_attrs = style.attributes_with_fill(Paint::Solid(fill.shade(TOP_SHADE)));
        surface.push(cap.to_primitive(cap_attrs));
    }

    // 侧面盖住了底面背侧的一半
    if options.show_hidden_edges && style.stroke.is_some() {
        surface.push(Primitive::Polyline {
            points: (q3..n).chain(0..=q1).map(|i| ring[i]).collect(),
            attrs: style.outline_attributes().with_dash(&LineType::Dashed),
        });
    }
}

/// 直圆柱，局部原点为底面圆心
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularCylinder {
    pub radius: f64,
    pub height: f64,
    /// 圆周分段数
    pub segments: usize,
}

pub type Cylinder = Solid<CircularCylinder>;

impl Solid<CircularCylinder> {
    pub fn new(radius: f64, height: f64) -> Self {
        Solid::from_geometry(CircularCylinder {
            radius: radius.abs(),
            height: height.abs(),
            segments: DEFAULT_SEGMENTS,
        })
    }

    /// 分段数不少于 6
    pub fn set_segments(&mut self, segments: usize) -> &mut Self {
        self.geometry_mut().segments = segments.max(MIN_SEGMENTS);
        self
    }
}

impl CircularCylinder {
    fn segment_count(&self) -> usize {
        self.segments.max(MIN_SEGMENTS)
    }

    fn top_center(&self) -> Point3 {
        Point3::new(0.0, self.height, 0.0)
    }
}

impl SolidGeometry for CircularCylinder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Cylinder
    }

    /// 底面圈 0..n，顶面圈 n..2n，随后是底面圆心和顶面圆心
    fn vertices_3d(&self) -> Vec<Point3> {
        let n = self.segment_count();
        let mut vertices = ring(self.radius, 0.0, n);
        vertices.extend(ring(self.radius, self.height, n));
        vertices.push(Point3::origin());
        vertices.push(self.top_center());
        vertices
    }

    fn faces(&self) -> Vec<Vec<usize>> {
        let n = self.segment_count();
        let (bottom, top) = (2 * n, 2 * n + 1);
        let sides = (0..n).map(|i| {
            let j = (i + 1) % n;
            vec![i, j, n + j, n + i]
        });
        let bottom_fan = (0..n).map(|i| vec![bottom, (i + 1) % n, i]);
        let top_fan = (0..n).map(|i| vec![top, n + i, n + (i + 1) % n]);
        sides.chain(bottom_fan).chain(top_fan).collect()
    }

    fn edges(&self) -> Vec<(usize, usize)> {
        let n = self.segment_count();
        (0..n)
            .flat_map(|i| {
                let j = (i + 1) % n;
                [(i, j), (n + i, n + j), (i, n + i)]
            })
            .collect()
    }

    fn volume(&self) -> f64 {
        PI * self.radius * self.radius * self.height
    }

    fn surface_area(&self) -> f64 {
        2.0 * PI * self.radius * (self.radius + self.height)
    }

    fn outline(&self, view: &SolidView) -> Vec<OutlineElement> {
        vec![
            horizontal_circle(view, Point3::origin(), self.radius).outline(),
            horizontal_circle(view, self.top_center(), self.radius).outline(),
        ]
    }

    fn render_projected(
        &self,
        view: &SolidView,
        style: &Style,
        surface: &mut Surface,
        ctx: &mut RenderContext,
    ) {
        let n = self.segment_count();
        let bottom = view.project_all(&ring(self.radius, 0.0, n));
        let top = view.project_all(&ring(self.radius, self.height, n));
        paint_curved(
            &horizontal_circle(view, Point3::origin(), self.radius),
            &bottom,
            Top::Cap(horizontal_circle(view, self.top_center(), self.radius), &top),
            style,
            &ctx.options,
            surface,
        );
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        view: &SolidView,
        _options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        let n = self.segment_count();
        let (q1, q3) = visible_range(n);
        let p = view.project_all(&self.vertices_3d());
        let guide = |start: Point2, end: Point2| {
            Some(MeasurementGeometry::Linear {
                start,
                end,
                guide: true,
            })
        };
        match kind {
            MeasurementKind::Radius => guide(p[2 * n + 1], p[n + q1]),
            MeasurementKind::Diameter => guide(p[n + q3], p[n + q1]),
            MeasurementKind::Height => Some(MeasurementGeometry::Linear {
                start: p[q1],
                end: p[n + q1],
                guide: false,
            }),
            _ => summary_label(kind, &p),
        }
    }

    fn measurement_value(&self, kind: MeasurementKind) -> Option<f64> {
        match kind {
            MeasurementKind::Radius => Some(self.radius),
            MeasurementKind::Diameter => Some(2.0 * self.radius),
            MeasurementKind::Height => Some(self.height),
            MeasurementKind::Volume => Some(self.volume()),
            MeasurementKind::SurfaceArea => Some(self.surface_area()),
            _ => None,
        }
    }
}

/// 直圆锥，局部原点为底面圆心
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularCone {
    pub radius: f64,
    pub height: f64,
    pub segments: usize,
}

pub type Cone = Solid<CircularCone>;

impl Solid<CircularCone> {
    pub fn new(radius: f64, height: f64) -> Self {
        Solid::from_geometry(CircularCone {
            radius: radius.abs(),
            height: height.abs(),
            segments: DEFAULT_SEGMENTS,
        })
    }

    /// 分段数不少于 6
    pub fn set_segments(&mut self, segments: usize) -> &mut Self {
        self.geometry_mut().segments = segments.max(MIN_SEGMENTS);
        self
    }
}

impl CircularCone {
    fn segment_count(&self) -> usize {
        self.segments.max(MIN_SEGMENTS)
    }

    fn apex(&self) -> Point3 {
        Point3::new(0.0, self.height, 0.0)
    }

    /// 母线长
    pub fn slant_height(&self) -> f64 {
        self.radius.hypot(self.height)
    }
}

impl SolidGeometry for CircularCone {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Cone
    }

    /// 底面圈 0..n，随后是顶点和底面圆心
    fn vertices_3d(&self) -> Vec<Point3> {
        let mut vertices = ring(self.radius, 0.0, self.segment_count());
        vertices.push(self.apex());
        vertices.push(Point3::origin());
        vertices
    }

    fn faces(&self) -> Vec<Vec<usize>> {
        let n = self.segment_count();
        let (apex, center) = (n, n + 1);
        let sides = (0..n).map(|i| vec![i, (i + 1) % n, apex]);
        let base = (0..n).map(|i| vec![center, (i + 1) % n, i]);
        sides.chain(base).collect()
    }

    fn edges(&self) -> Vec<(usize, usize)> {
        let n = self.segment_count();
        (0..n).flat_map(|i| [(i, (i + 1) % n), (i, n)]).collect()
    }

    fn volume(&self) -> f64 {
        PI * self.radius * self.radius * self.height / 3.0
    }

    fn surface_area(&self) -> f64 {
        PI * self.radius * (self.radius + self.slant_height())
    }

    fn outline(&self, view: &SolidView) -> Vec<OutlineElement> {
        vec![
            horizontal_circle(view, Point3::origin(), self.radius).outline(),
            OutlineElement::Point(view.project(&self.apex())),
        ]
    }

    fn render_projected(
        &self,
        view: &SolidView,
        style: &Style,
        surface: &mut Surface,
        ctx: &mut RenderContext,
    ) {
        let base = view.project_all(&ring(self.radius, 0.0, self.segment_count()));
        paint_curved(
            &horizontal_circle(view, Point3::origin(), self.radius),
            &base,
            Top::Apex(view.project(&self.apex())),
            style,
            &ctx.options,
            surface,
        );
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        view: &SolidView,
        _options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        let n = self.segment_count();
        let (q1, q3) = visible_range(n);
        let p = view.project_all(&self.vertices_3d());
        let (apex, center) = (p[n], p[n + 1]);
        let linear = |start: Point2, end: Point2, guide: bool| {
            Some(MeasurementGeometry::Linear { start, end, guide })
        };
        match kind {
            MeasurementKind::Radius => linear(center, p[q1], true),
            MeasurementKind::Diameter => linear(p[q3], p[q1], true),
            MeasurementKind::Height => linear(center, apex, true),
            MeasurementKind::Slant => linear(p[q1], apex, false),
            _ => summary_label(kind, &p),
        }
    }

    fn measurement_value(&self, kind: MeasurementKind) -> Option<f64> {
        match kind {
            MeasurementKind::Radius => Some(self.radius),
            MeasurementKind::Diameter => Some(2.0 * self.radius),
            MeasurementKind::Height => Some(self.height),
            MeasurementKind::Slant => Some(self.slant_height()),
            MeasurementKind::Volume => Some(self.volume()),
            MeasurementKind::SurfaceArea => Some(self.surface_area()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, approx_eq_tol};
    use crate::shape::Shape;

    fn dashed_polylines(surface: &Surface) -> usize {
        surface
            .flatten()
            .into_iter()
            .filter(|p| {
                matches!(p, Primitive::Polyline { attrs, .. } if !attrs.dash_array.is_empty())
            })
            .count()
    }

    #[test]
    fn test_cylinder_topology() {
        let cylinder = Cylinder::new(5.0, 10.0);
        assert_eq!(cylinder.geometry().segments, DEFAULT_SEGMENTS);
        assert_eq!(cylinder.vertices_3d().len(), 2 * 16 + 2);
        assert_eq!(cylinder.faces().len(), 3 * 16);
        assert_eq!(cylinder.edges().len(), 3 * 16);
    }

    #[test]
    fn test_segments_are_clamped() {
        let mut cylinder = Cylinder::new(5.0, 10.0);
        cylinder.set_segments(3);
        assert_eq!(cylinder.geometry().segments, MIN_SEGMENTS);
        assert_eq!(cylinder.vertices_3d().len(), 14);

        let mut cone = Cone::new(5.0, 10.0);
        cone.set_segments(24);
        assert_eq!(cone.vertices_3d().len(), 26);
        cone.set_segments(0);
        assert_eq!(cone.faces().len(), 2 * MIN_SEGMENTS);
    }

    #[test]
    fn test_cylinder_metrics() {
        let cylinder = Cylinder::new(3.0, 5.0);
        assert!(approx_eq(cylinder.volume(), 45.0 * PI));
        assert!(approx_eq(cylinder.surface_area(), 2.0 * PI * 3.0 * 8.0));
    }

    #[test]
    fn test_cone_metrics() {
        let cone = Cone::new(3.0, 4.0);
        assert!(approx_eq(cone.geometry().slant_height(), 5.0));
        assert!(approx_eq(cone.volume(), 12.0 * PI));
        assert!(approx_eq(cone.surface_area(), 24.0 * PI));
    }

    #[test]
    fn test_visible_range_matches_facing_sides() {
        // 默认等轴测下，朝向观察者的侧面正好是第 n/4 到 3n/4 段
        let cylinder = Cylinder::new(40.0, 60.0);
        let mut front: Vec<usize> = cylinder
            .projected_mesh()
            .faces
            .iter()
            .filter(|f| f.front_facing && f.index < 16)
            .map(|f| f.index)
            .collect();
        front.sort_unstable();
        assert_eq!(front, (4..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_ring_extremes() {
        let view = SolidView::default();
        let p = view.project_all(&ring(10.0, 0.0, 16));
        let rightmost = (0..16).max_by(|&a, &b| p[a].x.total_cmp(&p[b].x)).unwrap();
        let leftmost = (0..16).min_by(|&a, &b| p[a].x.total_cmp(&p[b].x)).unwrap();
        assert_eq!(rightmost, 4);
        assert_eq!(leftmost, 12);
    }

    #[test]
    fn test_cap_ellipse_passes_through_ring() {
        let view = SolidView::default();
        let e = horizontal_circle(&view, Point3::origin(), 10.0);
        assert!(approx_eq_tol(e.ry / e.rx, 30f64.to_radians().tan(), 1e-9));
        assert!(approx_eq_tol(e.rotation, 0.0, 1e-9));
        for p in view.project_all(&ring(10.0, 0.0, 16)) {
            let d = p - e.center;
            let r = (d.x / e.rx).powi(2) + (d.y / e.ry).powi(2);
            assert!(approx_eq_tol(r, 1.0, 1e-9));
        }
    }

    #[test]
    fn test_cylinder_render() {
        let cylinder = Cylinder::new(40.0, 60.0);
        let mut surface = Surface::new();
        cylinder.render(&mut surface, &mut RenderContext::default());
        assert_eq!(surface.count("Ellipse"), 2);
        assert_eq!(surface.count("Polygon"), 1);
        assert_eq!(surface.count("Line"), 2);
        assert_eq!(dashed_polylines(&surface), 0);

        let mut ctx = RenderContext::new(DiagramOptions {
            show_hidden_edges: true,
            ..Default::default()
        });
        let mut surface = Surface::new();
        cylinder.render(&mut surface, &mut ctx);
        assert_eq!(dashed_polylines(&surface), 1);
    }

    #[test]
    fn test_top_ellipse_painted_after_side() {
        let cylinder = Cylinder::new(40.0, 60.0);
        let mut surface = Surface::new();
        cylinder.render(&mut surface, &mut RenderContext::default());
        let names: Vec<&str> = surface
            .flatten()
            .into_iter()
            .map(|p| p.type_name())
            .filter(|name| *name != "Group")
            .collect();
        assert_eq!(names, vec!["Ellipse", "Polygon", "Line", "Line", "Ellipse"]);
    }

    #[test]
    fn test_cone_render() {
        let cone = Cone::new(40.0, 80.0);
        let mut surface = Surface::new();
        cone.render(&mut surface, &mut RenderContext::default());
        assert_eq!(surface.count("Ellipse"), 1);
        assert_eq!(surface.count("Polygon"), 1);
        assert_eq!(surface.count("Line"), 2);
    }

    #[test]
    fn test_bounds_cover_both_caps() {
        let cylinder = Cylinder::new(10.0, 50.0);
        let b = cylinder.bounds();
        let s = 0.8;
        // 椭圆长半轴 r·√2·cos30°·s，高度方向：顶面中心上移 h·s，两端再加短半轴
        let major = 10.0 * 2f64.sqrt() * 30f64.to_radians().cos() * s;
        assert!(approx_eq_tol(b.width, 2.0 * major, 1e-9));
        assert!(approx_eq_tol(b.height, 50.0 * s + 2.0 * 10.0 * 2f64.sqrt() * 0.5 * s, 1e-9));
    }

    #[test]
    fn test_measurement_labels() {
        let mut cone = Cone::new(3.0, 4.0);
        cone.add_measurement(MeasurementKind::Radius, MeasurementOptions::new())
            .add_measurement(MeasurementKind::Slant, MeasurementOptions::new())
            .add_measurement(MeasurementKind::Height, MeasurementOptions::new());
        let mut surface = Surface::new();
        cone.render(&mut surface, &mut RenderContext::default());
        assert_eq!(surface.texts(), vec!["r = 3", "5", "4"]);
    }
}
