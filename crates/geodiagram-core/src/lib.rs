//! Geodiagram 核心引擎
//!
//! 为教学几何图生成矢量场景图：带尺寸标注的平面图形，以及投影后的立体。
//!
//! # 架构设计
//!
//! - [`shape::Shape`]：所有形状的统一契约（放置、样式、包围盒、渲染、标注）
//! - [`shapes`]：矩形、三角形、圆、正多边形、任意多边形、组合图形
//! - [`solids`]：投影方式、立体网格与画家算法、各类立体
//! - [`measurement`]：尺寸线、半径线、角度弧、直角标记
//! - [`surface::Surface`]：渲染输出，只追加的图元列表和渐变定义
//!
//! 渲染不依赖全局状态：每次会话创建一个 [`context::RenderContext`]，
//! 显式传入所有渲染调用。
//!
//! # 示例
//!
//! ```rust
//! use geodiagram_core::prelude::*;
//!
//! let mut rect = Rectangle::new(120.0, 80.0);
//! rect.set_position(40.0, 40.0)
//!     .add_measurement(MeasurementKind::Width, MeasurementOptions::new());
//!
//! let mut surface = Surface::new();
//! let mut ctx = RenderContext::default();
//! rect.render(&mut surface, &mut ctx);
//! assert_eq!(surface.texts(), vec!["120"]);
//! ```

pub mod any_shape;
pub mod config;
pub mod context;
pub mod error;
pub mod layout;
pub mod math;
pub mod measurement;
pub mod shape;
pub mod shapes;
pub mod solids;
pub mod style;
pub mod surface;
pub mod transform;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::any_shape::AnyShape;
    pub use crate::config::{DiagramOptions, MeasurementStyle};
    pub use crate::context::RenderContext;
    pub use crate::error::GeometryError;
    pub use crate::layout::Viewport;
    pub use crate::math::{Bounds, Point2, Point3, Vector2, Vector3};
    pub use crate::measurement::{MeasurementKind, MeasurementOptions, PreferredSide};
    pub use crate::shape::{Shape, ShapeKind};
    pub use crate::shapes::{
        Circle, CompositeOperation, CompositeShape, IrregularPolygon, Rectangle, RegularPolygon,
        Triangle, TriangleVariant,
    };
    pub use crate::solids::{
        Cone, Cylinder, Projection, Pyramid, RectangularPrism, Sphere, TriangularPyramid,
    };
    pub use crate::style::{Color, LineType, Style, StylePatch};
    pub use crate::surface::{Primitive, Surface};
    pub use crate::transform::Transform2D;
}
