//! 立体的几何能力接口与公共绘制算法
//!
//! 每种立体只需给出 [`SolidGeometry`]：顶点、面、棱以及标注几何。
//! 面可见性与深度排序（画家算法）由 [`project_mesh`] / [`paint_faces`]
//! 统一完成；曲面立体可以覆盖 [`SolidGeometry::render_projected`] 改用专门的绘制方式。
//!
//! 画家算法只对凸的、无自遮挡的立体成立，不是真正的深度缓冲。

use super::projection::Projection;
use crate::config::DiagramOptions;
use crate::context::RenderContext;
use crate::math::{BoundingBox2, Point2, Point3, Vector2, Vector3};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{OutlineElement, ShapeKind};
use crate::shapes::LABEL_LINE_SPACING;
use crate::style::{Attributes, Color, LineType, Paint, Style};
use crate::surface::{Primitive, Surface};
use nalgebra::Rotation3;
use std::collections::HashMap;

/// 体积、表面积等文字标注与立体底部的间距
pub(crate) const LABEL_GAP: f64 = 24.0;

/// 按面序号循环使用的明暗系数
const FACE_SHADES: [f64; 6] = [0.0, -0.08, 0.12, -0.16, 0.2, -0.24];

/// 立体的几何能力
pub trait SolidGeometry {
    fn kind(&self) -> ShapeKind;

    /// 局部坐标顶点（y 轴向上）
    fn vertices_3d(&self) -> Vec<Point3>;

    /// 面的顶点序号；从外侧看投影后为顺时针（屏幕坐标）的面朝向观察者
    fn faces(&self) -> Vec<Vec<usize>>;

    /// 棱的顶点序号对
    fn edges(&self) -> Vec<(usize, usize)>;

    fn volume(&self) -> f64;

    fn surface_area(&self) -> f64;

    /// 投影坐标下的被测几何
    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        view: &SolidView,
        options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry>;

    fn measurement_value(&self, kind: MeasurementKind) -> Option<f64>;

    /// 投影坐标下的轮廓，默认取全部投影顶点
    fn outline(&self, view: &SolidView) -> Vec<OutlineElement> {
        view.project_all(&self.vertices_3d())
            .into_iter()
            .map(OutlineElement::Point)
            .collect()
    }

    /// 输出投影后的立体，默认按面列表走画家算法
    fn render_projected(
        &self,
        view: &SolidView,
        style: &Style,
        surface: &mut Surface,
        ctx: &mut RenderContext,
    ) {
        paint_faces(self, view, style, &ctx.options, surface);
    }
}

/// 一次投影所需的全部参数：投影方式、三维朝向和深度偏移
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidView {
    pub projection: Projection,
    pub rotation: Rotation3<f64>,
    pub depth: f64,
}

impl Default for SolidView {
    fn default() -> Self {
        Self {
            projection: Projection::default(),
            rotation: Rotation3::identity(),
            depth: 0.0,
        }
    }
}

impl SolidView {
    /// orientation 为绕 x、y、z 轴的旋转角度（度）
    pub fn new(projection: Projection, orientation: Vector3, depth: f64) -> Self {
        Self {
            projection,
            rotation: Rotation3::from_euler_angles(
                orientation.x.to_radians(),
                orientation.y.to_radians(),
                orientation.z.to_radians(),
            ),
            depth,
        }
    }

    fn oriented(&self, p: &Point3) -> Point3 {
        self.rotation * p
    }

    pub fn project(&self, p: &Point3) -> Point2 {
        self.projection.project_at_depth(&self.oriented(p), self.depth)
    }

    pub fn project_all(&self, points: &[Point3]) -> Vec<Point2> {
        points.iter().map(|p| self.project(p)).collect()
    }

    /// 深度键，越大越靠近观察者
    pub fn depth_of(&self, p: &Point3) -> f64 {
        let mut q = self.oriented(p);
        q.z += self.depth;
        self.projection.view_depth(&q)
    }

    /// 局部平面圆（由两个正交单位轴 u、v 张成）投影后的椭圆
    ///
    /// 平行投影下结果精确；透视投影在圆心处线性化，是近似值。
    pub fn project_circle(
        &self,
        center: &Point3,
        radius: f64,
        u: &Vector3,
        v: &Vector3,
    ) -> ProjectedEllipse {
        let c = self.project(center);
        let a = self.project(&(center + u * radius)) - c;
        let b = self.project(&(center + v * radius)) - c;
        ProjectedEllipse::from_conjugate(c, a, b)
    }
}

/// 投影得到的椭圆
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedEllipse {
    pub center: Point2,
    /// 长半轴
    pub rx: f64,
    /// 短半轴
    pub ry: f64,
    /// 长轴方向（度）
    pub rotation: f64,
}

impl ProjectedEllipse {
    /// 由一对共轭半径 a、b 求椭圆：椭圆是单位圆经矩阵 [a b] 的像
    pub fn from_conjugate(center: Point2, a: Vector2, b: Vector2) -> Self {
        // S = M·Mᵀ 的特征值给出半轴平方
        let s00 = a.x * a.x + b.x * b.x;
        let s11 = a.y * a.y + b.y * b.y;
        let s01 = a.x * a.y + b.x * b.y;
        let mean = (s00 + s11) / 2.0;
        let spread = (((s00 - s11) / 2.0).powi(2) + s01 * s01).sqrt();
        Self {
            center,
            rx: (mean + spread).max(0.0).sqrt(),
            ry: (mean - spread).max(0.0).sqrt(),
            rotation: (0.5 * (2.0 * s01).atan2(s00 - s11)).to_degrees(),
        }
    }

    pub fn to_primitive(&self, attrs: Attributes) -> Primitive {
        Primitive::Ellipse {
            center: self.center,
            rx: self.rx,
            ry: self.ry,
            rotation: self.rotation,
            attrs,
        }
    }

    pub fn outline(&self) -> OutlineElement {
        OutlineElement::Ellipse {
            center: self.center,
            rx: self.rx,
            ry: self.ry,
            rotation: self.rotation,
        }
    }
}

/// 投影后的面
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFace {
    /// 在 faces() 中的序号
    pub index: usize,
    pub vertices: Vec<usize>,
    /// 顶点深度键的平均值
    pub depth: f64,
    pub front_facing: bool,
}

/// 投影后的网格，面已按深度从远到近排序
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMesh {
    pub points: Vec<Point2>,
    pub faces: Vec<ProjectedFace>,
}

impl ProjectedMesh {
    /// 只被背面共享的棱
    pub fn hidden_edges(&self) -> Vec<(usize, usize)> {
        let mut facing: HashMap<(usize, usize), bool> = HashMap::new();
        for face in &self.faces {
            let n = face.vertices.len();
            for i in 0..n {
                let key = edge_key(face.vertices[i], face.vertices[(i + 1) % n]);
                *facing.entry(key).or_insert(false) |= face.front_facing;
            }
        }
        let mut hidden: Vec<_> = facing
            .into_iter()
            .filter(|(_, front)| !front)
            .map(|(key, _)| key)
            .collect();
        hidden.sort_unstable();
        hidden
    }
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// 投影全部顶点，求每个面的朝向和深度并按深度升序排序（先远后近）
///
/// 顶点不足 3 个或序号越界的面记录警告后跳过。
pub fn project_mesh<G: SolidGeometry + ?Sized>(geometry: &G, view: &SolidView) -> ProjectedMesh {
    let vertices = geometry.vertices_3d();
    let points = view.project_all(&vertices);
    let depths: Vec<f64> = vertices.iter().map(|p| view.depth_of(p)).collect();
    let winding = view.projection.winding_sign();

    let mut faces: Vec<ProjectedFace> = geometry
        .faces()
        .into_iter()
        .enumerate()
        .filter_map(|(index, face)| {
            if face.len() < 3 || face.iter().any(|&i| i >= points.len()) {
                tracing::warn!("Skipping malformed face {} of {}", index, geometry.kind().name());
                return None;
            }
            let e1 = points[face[1]] - points[face[0]];
            let e2 = points[face[2]] - points[face[1]];
            let depth = face.iter().map(|&i| depths[i]).sum::<f64>() / face.len() as f64;
            Some(ProjectedFace {
                index,
                front_facing: winding * e1.perp(&e2) > 0.0,
                depth,
                vertices: face,
            })
        })
        .collect();

    faces.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    tracing::trace!(
        "{}: {} faces sorted, {} front-facing",
        geometry.kind().name(),
        faces.len(),
        faces.iter().filter(|f| f.front_facing).count()
    );
    ProjectedMesh { points, faces }
}

/// 面的填充色：在基础色上按序号做明暗变化
pub fn face_fill(base: Color, index: usize) -> Color {
    base.shade(FACE_SHADES[index % FACE_SHADES.len()])
}

/// 画家算法：按深度顺序填充各面，再在上面描出全部棱
///
/// 开启剔除时跳过背面；开启隐藏棱时只被背面共享的棱画成虚线。
pub fn paint_faces<G: SolidGeometry + ?Sized>(
    geometry: &G,
    view: &SolidView,
    style: &Style,
    options: &DiagramOptions,
    surface: &mut Surface,
) {
    let mesh = project_mesh(geometry, view);
    let base = style.fill.unwrap_or(Color::DEFAULT_FILL);

    for face in &mesh.faces {
        if options.cull_back_faces && !face.front_facing {
            continue;
        }
        let attrs = Attributes {
            fill: Paint::Solid(face_fill(base, face.index)),
            fill_opacity: style.fill_opacity,
            opacity: style.opacity,
            ..Default::default()
        };
        surface.push(Primitive::Polygon {
            points: face.vertices.iter().map(|&i| mesh.points[i]).collect(),
            attrs,
        });
    }

    if style.stroke.is_none() {
        return;
    }
    let hidden = mesh.hidden_edges();
    for (a, b) in geometry.edges() {
        let (Some(from), Some(to)) = (mesh.points.get(a), mesh.points.get(b)) else {
            tracing::warn!("Skipping edge ({}, {}) of {}", a, b, geometry.kind().name());
            continue;
        };
        let is_hidden = hidden.binary_search(&edge_key(a, b)).is_ok();
        let attrs = if is_hidden && options.show_hidden_edges {
            style.outline_attributes().with_dash(&LineType::Dashed)
        } else if is_hidden && options.cull_back_faces {
            continue;
        } else {
            style.outline_attributes()
        };
        surface.push(Primitive::Line {
            from: *from,
            to: *to,
            attrs,
        });
    }
}

/// 平面多边形面的总面积（Newell 法求各面法向长度）
pub fn mesh_surface_area(vertices: &[Point3], faces: &[Vec<usize>]) -> f64 {
    faces
        .iter()
        .filter(|face| face.iter().all(|&i| i < vertices.len()))
        .map(|face| {
            let n = face.len();
            let normal = (0..n).fold(Vector3::zeros(), |acc, i| {
                let p = vertices[face[i]].coords;
                let q = vertices[face[(i + 1) % n]].coords;
                acc + p.cross(&q)
            });
            normal.norm() / 2.0
        })
        .sum()
}

/// 立体下方第 line 行文字标注
pub(crate) fn label_below(points: &[Point2], line: usize) -> Option<MeasurementGeometry> {
    let bbox = BoundingBox2::from_points(points.iter().copied());
    if bbox.is_empty() {
        return None;
    }
    Some(MeasurementGeometry::Label {
        anchor: Point2::new(
            bbox.center().x,
            bbox.max.y + LABEL_GAP + line as f64 * LABEL_LINE_SPACING,
        ),
    })
}

/// 体积与表面积两行文字标注的公共处理
pub(crate) fn summary_label(
    kind: MeasurementKind,
    points: &[Point2],
) -> Option<MeasurementGeometry> {
    match kind {
        MeasurementKind::Volume => label_below(points, 0),
        MeasurementKind::SurfaceArea => label_below(points, 1),
        _ => None,
    }
}
