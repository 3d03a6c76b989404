//! 形状的统一枚举
//!
//! 组合图形的成员和调度方的图形列表都需要保存异构形状，
//! [`AnyShape`] 把全部具体形状收拢到一个可序列化、可克隆的枚举中。

use crate::context::RenderContext;
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{Frame, OutlineElement, Shape, ShapeKind};
use crate::shapes::{Circle, CompositeShape, IrregularPolygon, Rectangle, RegularPolygon, Triangle};
use crate::solids::{Cone, Cylinder, Pyramid, RectangularPrism, Sphere, TriangularPyramid};
use crate::surface::Surface;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AnyShape {
    Rectangle(Rectangle),
    Triangle(Triangle),
    Circle(Circle),
    RegularPolygon(RegularPolygon),
    IrregularPolygon(IrregularPolygon),
    Composite(CompositeShape),
    RectangularPrism(RectangularPrism),
    Pyramid(Pyramid),
    TriangularPyramid(TriangularPyramid),
    Cylinder(Cylinder),
    Cone(Cone),
    Sphere(Sphere),
}

macro_rules! dispatch {
    ($value:expr, $shape:ident => $body:expr) => {
        match $value {
            AnyShape::Rectangle($shape) => $body,
            AnyShape::Triangle($shape) => $body,
            AnyShape::Circle($shape) => $body,
            AnyShape::RegularPolygon($shape) => $body,
            AnyShape::IrregularPolygon($shape) => $body,
            AnyShape::Composite($shape) => $body,
            AnyShape::RectangularPrism($shape) => $body,
            AnyShape::Pyramid($shape) => $body,
            AnyShape::TriangularPyramid($shape) => $body,
            AnyShape::Cylinder($shape) => $body,
            AnyShape::Cone($shape) => $body,
            AnyShape::Sphere($shape) => $body,
        }
    };
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for AnyShape {
                fn from(shape: $ty) -> Self {
                    AnyShape::$variant(shape)
                }
            }
        )*
    };
}

impl_from!(
    Rectangle(Rectangle),
    Triangle(Triangle),
    Circle(Circle),
    RegularPolygon(RegularPolygon),
    IrregularPolygon(IrregularPolygon),
    Composite(CompositeShape),
    RectangularPrism(RectangularPrism),
    Pyramid(Pyramid),
    TriangularPyramid(TriangularPyramid),
    Cylinder(Cylinder),
    Cone(Cone),
    Sphere(Sphere),
);

impl Shape for AnyShape {
    fn kind(&self) -> ShapeKind {
        dispatch!(self, s => s.kind())
    }

    fn frame(&self) -> &Frame {
        dispatch!(self, s => s.frame())
    }

    fn frame_mut(&mut self) -> &mut Frame {
        dispatch!(self, s => s.frame_mut())
    }

    fn outline(&self) -> Vec<OutlineElement> {
        dispatch!(self, s => s.outline())
    }

    fn draw(&self, surface: &mut Surface, ctx: &mut RenderContext) {
        dispatch!(self, s => s.draw(surface, ctx))
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        dispatch!(self, s => s.measurement_geometry(kind, options))
    }

    fn measurement_value(
        &self,
        kind: MeasurementKind,
        options: &MeasurementOptions,
    ) -> Option<f64> {
        dispatch!(self, s => s.measurement_value(kind, options))
    }

    fn draw_marks(&self, surface: &mut Surface, ctx: &mut RenderContext) {
        dispatch!(self, s => s.draw_marks(surface, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_delegates_kind_and_bounds() {
        let mut shape = AnyShape::from(Rectangle::new(10.0, 4.0));
        shape.set_position(5.0, 5.0);
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        let b = shape.bounds();
        assert!(approx_eq(b.x, 5.0));
        assert!(approx_eq(b.width, 10.0));
    }

    #[test]
    fn test_render_through_enum_matches_concrete() {
        let cone = Cone::new(30.0, 50.0);
        let mut direct = Surface::new();
        cone.render(&mut direct, &mut RenderContext::default());

        let mut wrapped = Surface::new();
        AnyShape::from(cone).render(&mut wrapped, &mut RenderContext::default());
        assert_eq!(direct, wrapped);
    }

    #[test]
    fn test_json_round_trip_keeps_type_tag() {
        let shape = AnyShape::from(Sphere::new(12.0));
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "sphere");
        let back: AnyShape = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), ShapeKind::Sphere);
        assert!(approx_eq(back.bounds().width, shape.bounds().width));
    }
}
