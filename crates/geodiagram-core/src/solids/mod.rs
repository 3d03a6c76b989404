//! 立体：投影、网格与各类具体立体
//!
//! 平面立体（长方体、棱锥）走统一的画家算法；
//! 圆柱、圆锥、球使用各自的曲面绘制方式。

pub mod mesh;
pub mod prism;
pub mod projection;
pub mod pyramid;
pub mod round;
pub mod solid;
pub mod sphere;

pub use mesh::{
    project_mesh, ProjectedEllipse, ProjectedFace, ProjectedMesh, SolidGeometry, SolidView,
};
pub use prism::{Cuboid, RectangularPrism};
pub use projection::Projection;
pub use pyramid::{Pyramid, SquarePyramid, Tetrahedron, TriangularPyramid};
pub use round::{CircularCone, CircularCylinder, Cone, Cylinder};
pub use solid::Solid;
pub use sphere::{Ball, Sphere};
