//! 四棱锥与三棱锥（四面体）

use super::mesh::{mesh_surface_area, summary_label, SolidGeometry, SolidView};
use super::solid::Solid;
use crate::math::{lerp_point, Point2, Point3};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::ShapeKind;
use serde::{Deserialize, Serialize};

fn midpoint_3d(a: &Point3, b: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords) / 2.0)
}

/// 矩形底面的棱锥，顶点位于底面中心正上方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquarePyramid {
    /// 底面沿 x 的边长
    pub base_length: f64,
    /// 底面沿 z 的边长
    pub base_width: f64,
    pub height: f64,
}

pub type Pyramid = Solid<SquarePyramid>;

impl Solid<SquarePyramid> {
    pub fn new(base_length: f64, base_width: f64, height: f64) -> Self {
        Solid::from_geometry(SquarePyramid {
            base_length: base_length.abs(),
            base_width: base_width.abs(),
            height: height.abs(),
        })
    }

    /// 正四棱锥
    pub fn square(base: f64, height: f64) -> Self {
        Self::new(base, base, height)
    }
}

impl SquarePyramid {
    fn apex(&self) -> Point3 {
        Point3::new(self.base_length / 2.0, self.height, self.base_width / 2.0)
    }

    fn base_center(&self) -> Point3 {
        Point3::new(self.base_length / 2.0, 0.0, self.base_width / 2.0)
    }

    /// 前侧面（底边沿 x）的斜高
    pub fn slant_height(&self) -> f64 {
        self.height.hypot(self.base_width / 2.0)
    }
}

impl SolidGeometry for SquarePyramid {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Pyramid
    }

    fn vertices_3d(&self) -> Vec<Point3> {
        let (l, w) = (self.base_length, self.base_width);
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(l, 0.0, 0.0),
            Point3::new(l, 0.0, w),
            Point3::new(0.0, 0.0, w),
            self.apex(),
        ]
    }

    fn faces(&self) -> Vec<Vec<usize>> {
        vec![
            vec![0, 3, 2, 1],
            vec![0, 1, 4],
            vec![1, 2, 4],
            vec![2, 3, 4],
            vec![3, 0, 4],
        ]
    }

    fn edges(&self) -> Vec<(usize, usize)> {
        vec![
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (0, 4),
            (1, 4),
            (2, 4),
            (3, 4),
        ]
    }

    fn volume(&self) -> f64 {
        self.base_length * self.base_width * self.height / 3.0
    }

    fn surface_area(&self) -> f64 {
        mesh_surface_area(&self.vertices_3d(), &self.faces())
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        view: &SolidView,
        _options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        let vertices = self.vertices_3d();
        let p = view.project_all(&vertices);
        let apex = p[4];
        match kind {
            MeasurementKind::Length | MeasurementKind::Base => Some(MeasurementGeometry::Linear {
                start: p[3],
                end: p[2],
                guide: false,
            }),
            MeasurementKind::Width | MeasurementKind::Depth => Some(MeasurementGeometry::Linear {
                start: p[2],
                end: p[1],
                guide: false,
            }),
            MeasurementKind::Height => Some(MeasurementGeometry::Linear {
                start: view.project(&self.base_center()),
                end: apex,
                guide: true,
            }),
            MeasurementKind::Slant => Some(MeasurementGeometry::Linear {
                start: lerp_point(&p[3], &p[2], 0.5),
                end: apex,
                guide: true,
            }),
            _ => summary_label(kind, &p),
        }
    }

    fn measurement_value(&self, kind: MeasurementKind) -> Option<f64> {
        match kind {
            MeasurementKind::Length | MeasurementKind::Base => Some(self.base_length),
            MeasurementKind::Width | MeasurementKind::Depth => Some(self.base_width),
            MeasurementKind::Height => Some(self.height),
            MeasurementKind::Slant => Some(self.slant_height()),
            MeasurementKind::Volume => Some(self.volume()),
            MeasurementKind::SurfaceArea => Some(self.surface_area()),
            _ => None,
        }
    }
}

/// 正三角形底面的三棱锥，顶点位于底面重心正上方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tetrahedron {
    /// 底面边长
    pub edge: f64,
    pub height: f64,
}

pub type TriangularPyramid = Solid<Tetrahedron>;

impl Solid<Tetrahedron> {
    pub fn new(edge: f64, height: f64) -> Self {
        Solid::from_geometry(Tetrahedron {
            edge: edge.abs(),
            height: height.abs(),
        })
    }

    /// 正四面体：高为 a·√(2/3)
    pub fn regular(edge: f64) -> Self {
        Self::new(edge, edge.abs() * (2.0f64 / 3.0).sqrt())
    }
}

impl Tetrahedron {
    fn base_area(&self) -> f64 {
        3f64.sqrt() / 4.0 * self.edge * self.edge
    }

    fn base_centroid(&self) -> Point3 {
        Point3::new(self.edge / 2.0, 0.0, self.edge * 3f64.sqrt() / 6.0)
    }

    /// 侧面斜高（底边中点到顶点）
    pub fn slant_height(&self) -> f64 {
        let v = self.vertices_3d();
        (v[3] - midpoint_3d(&v[1], &v[2])).norm()
    }
}

impl SolidGeometry for Tetrahedron {
    fn kind(&self) -> ShapeKind {
        ShapeKind::TriangularPyramid
    }

    fn vertices_3d(&self) -> Vec<Point3> {
        let a = self.edge;
        let mut apex = self.base_centroid();
        apex.y = self.height;
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(a, 0.0, 0.0),
            Point3::new(a / 2.0, 0.0, a * 3f64.sqrt() / 2.0),
            apex,
        ]
    }

    fn faces(&self) -> Vec<Vec<usize>> {
        vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![2, 0, 3]]
    }

    fn edges(&self) -> Vec<(usize, usize)> {
        vec![(0, 1), (1, 2), (2, 0), (0, 3), (1, 3), (2, 3)]
    }

    fn volume(&self) -> f64 {
        self.base_area() * self.height / 3.0
    }

    fn surface_area(&self) -> f64 {
        mesh_surface_area(&self.vertices_3d(), &self.faces())
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        view: &SolidView,
        _options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        let p = view.project_all(&self.vertices_3d());
        let apex: Point2 = p[3];
        match kind {
            MeasurementKind::Base | MeasurementKind::Length | MeasurementKind::Side(_) => {
                Some(MeasurementGeometry::Linear {
                    start: p[2],
                    end: p[1],
                    guide: false,
                })
            }
            MeasurementKind::Height => Some(MeasurementGeometry::Linear {
                start: view.project(&self.base_centroid()),
                end: apex,
                guide: true,
            }),
            MeasurementKind::Slant => Some(MeasurementGeometry::Linear {
                start: lerp_point(&p[1], &p[2], 0.5),
                end: apex,
                guide: true,
            }),
            _ => summary_label(kind, &p),
        }
    }

    fn measurement_value(&self, kind: MeasurementKind) -> Option<f64> {
        match kind {
            MeasurementKind::Base | MeasurementKind::Length | MeasurementKind::Side(_) => {
                Some(self.edge)
            }
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
    use crate::config::DiagramOptions;
    use crate::context::RenderContext;
    use crate::math::{approx_eq, approx_eq_tol};
    use crate::shape::Shape;
    use crate::solids::Projection;
    use crate::surface::{Primitive, Surface};

    fn front_faces<G: SolidGeometry>(solid: &Solid<G>) -> Vec<usize> {
        let mut front: Vec<usize> = solid
            .projected_mesh()
            .faces
            .iter()
            .filter(|f| f.front_facing)
            .map(|f| f.index)
            .collect();
        front.sort_unstable();
        front
    }

    #[test]
    fn test_pyramid_topology() {
        let pyramid = Pyramid::square(6.0, 4.0);
        assert_eq!(pyramid.vertices_3d().len(), 5);
        assert_eq!(pyramid.faces().len(), 5);
        assert_eq!(pyramid.faces()[0].len(), 4);
        assert!(pyramid.faces()[1..].iter().all(|f| f.len() == 3));
        assert_eq!(pyramid.edges().len(), 8);
    }

    #[test]
    fn test_pyramid_metrics() {
        let pyramid = Pyramid::new(6.0, 8.0, 3.0);
        assert!(approx_eq(pyramid.volume(), 48.0));
        let expected = 6.0 * 8.0 + 6.0 * 3f64.hypot(4.0) + 8.0 * 3f64.hypot(3.0);
        assert!(approx_eq_tol(pyramid.surface_area(), expected, 1e-9));
        assert!(approx_eq(pyramid.geometry().slant_height(), 5.0));
    }

    #[test]
    fn test_pyramid_visible_faces() {
        let pyramid = Pyramid::square(60.0, 50.0);
        assert_eq!(front_faces(&pyramid), vec![2, 3]);
        assert_eq!(pyramid.projected_mesh().hidden_edges(), vec![(0, 1), (0, 3), (0, 4)]);
    }

    #[test]
    fn test_tetrahedron_topology() {
        let tetra = TriangularPyramid::regular(10.0);
        assert_eq!(tetra.vertices_3d().len(), 4);
        assert_eq!(tetra.faces().len(), 4);
        assert!(tetra.faces().iter().all(|f| f.len() == 3));
        assert_eq!(tetra.edges().len(), 6);
    }

    #[test]
    fn test_regular_tetrahedron_metrics() {
        let a = 10.0;
        let tetra = TriangularPyramid::regular(a);
        // 正四面体：四个全等正三角形，全部棱长相等
        assert!(approx_eq_tol(tetra.surface_area(), 3f64.sqrt() * a * a, 1e-9));
        assert!(approx_eq_tol(tetra.volume(), a.powi(3) / (6.0 * 2f64.sqrt()), 1e-9));
        let v = tetra.vertices_3d();
        for (i, j) in tetra.edges() {
            assert!(approx_eq_tol((v[i] - v[j]).norm(), a, 1e-9));
        }
        assert!(approx_eq_tol(tetra.geometry().slant_height(), a * 3f64.sqrt() / 2.0, 1e-9));
    }

    #[test]
    fn test_tetrahedron_visible_faces() {
        let tetra = TriangularPyramid::regular(80.0);
        assert_eq!(front_faces(&tetra), vec![2, 3]);
        assert_eq!(tetra.projected_mesh().hidden_edges(), vec![(0, 1)]);
    }

    #[test]
    fn test_depth_order_under_every_projection() {
        for projection in [
            Projection::isometric(),
            Projection::perspective(300.0),
            Projection::Orthographic,
        ] {
            let mut pyramid = Pyramid::square(60.0, 50.0);
            pyramid.set_projection(projection);
            let mesh = pyramid.projected_mesh();
            assert!(mesh.faces.windows(2).all(|w| w[0].depth <= w[1].depth));
        }
    }

    #[test]
    fn test_height_is_dashed_guide() {
        let mut pyramid = Pyramid::square(60.0, 50.0);
        pyramid.add_measurement(MeasurementKind::Height, MeasurementOptions::new());
        let mut surface = Surface::new();
        let mut ctx = RenderContext::new(DiagramOptions {
            cull_back_faces: true,
            ..Default::default()
        });
        pyramid.render(&mut surface, &mut ctx);
        assert_eq!(surface.texts(), vec!["50"]);
        let dashed = surface
            .flatten()
            .into_iter()
            .filter(|p| matches!(p, Primitive::Line { attrs, .. } if !attrs.dash_array.is_empty()))
            .count();
        assert_eq!(dashed, 1);
    }

    #[test]
    fn test_tetrahedron_labels() {
        let mut tetra = TriangularPyramid::new(6.0, 4.0);
        tetra
            .add_measurement(MeasurementKind::Base, MeasurementOptions::new())
            .add_measurement(MeasurementKind::Volume, MeasurementOptions::new());
        let mut surface = Surface::new();
        tetra.render(&mut surface, &mut RenderContext::default());
        // V = (√3/4)·36·4/3 = 12√3
        assert_eq!(surface.texts(), vec!["6", "V = 20.78"]);
    }
}
