//! 立体形状的通用外壳
//!
//! [`Solid`] 把任意 [`SolidGeometry`] 包装成一个 [`Shape`]：
//! 平面内的放置、样式和标注请求交给 [`Frame`]，三维朝向、深度和投影方式由本结构持有。

use super::mesh::{project_mesh, ProjectedMesh, SolidGeometry, SolidView};
use super::projection::Projection;
use crate::context::RenderContext;
use crate::math::{Point2, Point3, Vector3};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{Frame, OutlineElement, Shape, ShapeKind};
use crate::surface::Surface;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solid<G> {
    frame: Frame,
    geometry: G,
    projection: Projection,
    /// 绕 x、y、z 轴的旋转（度）
    orientation: Vector3,
    /// 沿视线方向的深度坐标
    depth: f64,
}

impl<G: SolidGeometry> Solid<G> {
    pub fn from_geometry(geometry: G) -> Self {
        Self {
            frame: Frame::default(),
            geometry,
            projection: Projection::default(),
            orientation: Vector3::zeros(),
            depth: 0.0,
        }
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// 修改参数后顶点、面、棱会在下次查询时一并重新生成
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) -> &mut Self {
        self.projection = projection;
        self
    }

    pub fn orientation(&self) -> Vector3 {
        self.orientation
    }

    pub fn set_orientation(&mut self, rx: f64, ry: f64, rz: f64) -> &mut Self {
        self.orientation = Vector3::new(rx, ry, rz);
        self
    }

    /// 在当前朝向上继续旋转（度）
    pub fn rotate_3d(&mut self, rx: f64, ry: f64, rz: f64) -> &mut Self {
        self.orientation += Vector3::new(rx, ry, rz);
        self
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn set_position_3d(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.frame.position = Point2::new(x, y);
        self.depth = z;
        self
    }

    pub fn view(&self) -> SolidView {
        SolidView::new(self.projection, self.orientation, self.depth)
    }

    pub fn vertices_3d(&self) -> Vec<Point3> {
        self.geometry.vertices_3d()
    }

    pub fn faces(&self) -> Vec<Vec<usize>> {
        self.geometry.faces()
    }

    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.geometry.edges()
    }

    pub fn volume(&self) -> f64 {
        self.geometry.volume()
    }

    pub fn surface_area(&self) -> f64 {
        self.geometry.surface_area()
    }

    /// 当前视图下的投影网格（面已按深度排序）
    pub fn projected_mesh(&self) -> ProjectedMesh {
        project_mesh(&self.geometry, &self.view())
    }
}

impl<G: SolidGeometry> Shape for Solid<G> {
    fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn outline(&self) -> Vec<OutlineElement> {
        self.geometry.outline(&self.view())
    }

    fn draw(&self, surface: &mut Surface, ctx: &mut RenderContext) {
        self.geometry
            .render_projected(&self.view(), &self.frame.style, surface, ctx);
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        self.geometry.measurement_geometry(kind, &self.view(), options)
    }

    fn measurement_value(
        &self,
        kind: MeasurementKind,
        _options: &MeasurementOptions,
    ) -> Option<f64> {
        self.geometry.measurement_value(kind)
    }
}
