//! 长方体

use super::mesh::{mesh_surface_area, summary_label, SolidGeometry, SolidView};
use super::solid::Solid;
use crate::math::Point3;
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::ShapeKind;
use serde::{Deserialize, Serialize};

/// 长方体参数：length 沿 x，height 沿 y，width 沿 z
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

pub type RectangularPrism = Solid<Cuboid>;

impl Solid<Cuboid> {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Solid::from_geometry(Cuboid {
            length: length.abs(),
            width: width.abs(),
            height: height.abs(),
        })
    }

    /// 正方体
    pub fn cube(side: f64) -> Self {
        Self::new(side, side, side)
    }
}

impl Cuboid {
    /// 体对角线
    pub fn space_diagonal(&self) -> f64 {
        (self.length.powi(2) + self.width.powi(2) + self.height.powi(2)).sqrt()
    }
}

impl SolidGeometry for Cuboid {
    fn kind(&self) -> ShapeKind {
        ShapeKind::RectangularPrism
    }

    fn vertices_3d(&self) -> Vec<Point3> {
        let (l, h, w) = (self.length, self.height, self.width);
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(l, 0.0, 0.0),
            Point3::new(l, h, 0.0),
            Point3::new(0.0, h, 0.0),
            Point3::new(0.0, 0.0, w),
            Point3::new(l, 0.0, w),
            Point3::new(l, h, w),
            Point3::new(0.0, h, w),
        ]
    }

    /// 后、前、底、顶、左、右
    fn faces(&self) -> Vec<Vec<usize>> {
        vec![
            vec![0, 1, 2, 3],
            vec![4, 7, 6, 5],
            vec![0, 4, 5, 1],
            vec![3, 2, 6, 7],
            vec![0, 3, 7, 4],
            vec![1, 5, 6, 2],
        ]
    }

    fn edges(&self) -> Vec<(usize, usize)> {
        vec![
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ]
    }

    fn volume(&self) -> f64 {
        self.length * self.width * self.height
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
        let linear = |a: usize, b: usize, guide: bool| {
            Some(MeasurementGeometry::Linear {
                start: p[a],
                end: p[b],
                guide,
            })
        };
        // 默认视角下这些棱都在轮廓上，正偏移朝外
        match kind {
            MeasurementKind::Length | MeasurementKind::Base => linear(4, 5, false),
            MeasurementKind::Width | MeasurementKind::Depth => linear(5, 1, false),
            MeasurementKind::Height => linear(1, 2, false),
            MeasurementKind::Diagonal => linear(0, 6, true),
            _ => summary_label(kind, &p),
        }
    }

    fn measurement_value(&self, kind: MeasurementKind) -> Option<f64> {
        match kind {
            MeasurementKind::Length | MeasurementKind::Base => Some(self.length),
            MeasurementKind::Width | MeasurementKind::Depth => Some(self.width),
            MeasurementKind::Height => Some(self.height),
            MeasurementKind::Diagonal => Some(self.space_diagonal()),
            MeasurementKind::Volume => Some(self.volume()),
            MeasurementKind::SurfaceArea => Some(self.surface_area()),
            _ => None,
        }
    }
}
