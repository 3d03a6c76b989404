//! 组合图形
//!
//! 组合图形只在视觉上区分并、差、交，不做真正的布尔运算：
//! - 并：所有成员使用组合图形的样式
//! - 差：第一个成员正常绘制，其余成员以背景色填充并用虚线描边
//! - 交：所有成员半透明叠加，重叠区域颜色更深

use crate::any_shape::AnyShape;
use crate::context::RenderContext;
use crate::math::{BoundingBox2, Point2};
use crate::measurement::{MeasurementGeometry, MeasurementKind, MeasurementOptions};
use crate::shape::{transformed_extent, Frame, OutlineElement, Shape, ShapeKind};
use crate::style::{Color, LineType, StylePatch};
use crate::surface::Surface;
use serde::{Deserialize, Serialize};

/// 组合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompositeOperation {
    #[default]
    Union,
    Subtract,
    Intersect,
}

/// 交集模式下成员的填充不透明度
const INTERSECT_FILL_OPACITY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeShape {
    frame: Frame,
    operation: CompositeOperation,
    members: Vec<AnyShape>,
}

impl CompositeShape {
    pub fn new(operation: CompositeOperation) -> Self {
        Self {
            frame: Frame::default(),
            operation,
            members: Vec::new(),
        }
    }

    /// 添加成员，成员的位置相对于组合图形的局部坐标
    pub fn add(&mut self, member: impl Into<AnyShape>) -> &mut Self {
        self.members.push(member.into());
        self
    }

    pub fn members(&self) -> &[AnyShape] {
        &self.members
    }

    pub fn operation(&self) -> CompositeOperation {
        self.operation
    }

    pub fn set_operation(&mut self, operation: CompositeOperation) {
        self.operation = operation;
    }

    /// 成员在局部坐标系中的合并包围盒
    fn extent(&self) -> BoundingBox2 {
        self.members
            .iter()
            .map(|m| transformed_extent(&m.outline(), &m.transform()))
            .filter(|b| !b.is_empty())
            .fold(BoundingBox2::empty(), |acc, b| acc.union(&b))
    }

    /// 按组合方式覆盖第 index 个成员的样式
    fn member_patch(&self, index: usize) -> StylePatch {
        let style = &self.frame.style;
        let base = StylePatch {
            fill: Some(style.fill),
            stroke: Some(style.stroke),
            stroke_width: Some(style.stroke_width),
            ..Default::default()
        };
        match self.operation {
            CompositeOperation::Union => base,
            CompositeOperation::Subtract if index == 0 => base,
            CompositeOperation::Subtract => base.fill(Color::WHITE).line_type(LineType::Dashed),
            CompositeOperation::Intersect => base.fill_opacity(INTERSECT_FILL_OPACITY),
        }
    }
}

impl Shape for CompositeShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Composite
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn outline(&self) -> Vec<OutlineElement> {
        let bbox = self.extent();
        if bbox.is_empty() {
            return Vec::new();
        }
        vec![
            OutlineElement::Point(bbox.min),
            OutlineElement::Point(Point2::new(bbox.max.x, bbox.min.y)),
            OutlineElement::Point(bbox.max),
            OutlineElement::Point(Point2::new(bbox.min.x, bbox.max.y)),
        ]
    }

    fn draw(&self, surface: &mut Surface, ctx: &mut RenderContext) {
        for (index, member) in self.members.iter().enumerate() {
            let mut member = member.clone();
            member.frame_mut().style.merge(&self.member_patch(index));
            member.render(surface, ctx);
        }
    }

    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        _options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        let bbox = self.extent();
        if bbox.is_empty() {
            return None;
        }
        match kind {
            MeasurementKind::Width => Some(MeasurementGeometry::Linear {
                start: Point2::new(bbox.min.x, bbox.max.y),
                end: bbox.max,
                guide: false,
            }),
            MeasurementKind::Height => Some(MeasurementGeometry::Linear {
                start: bbox.min,
                end: Point2::new(bbox.min.x, bbox.max.y),
                guide: false,
            }),
            _ => None,
        }
    }

    fn measurement_value(
        &self,
        kind: MeasurementKind,
        _options: &MeasurementOptions,
    ) -> Option<f64> {
        let bbox = self.extent();
        if bbox.is_empty() {
            return None;
        }
        match kind {
            MeasurementKind::Width => Some(bbox.width()),
            MeasurementKind::Height => Some(bbox.height()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;
    use crate::shapes::{Circle, Rectangle};
    use crate::style::Paint;
    use crate::surface::Primitive;

    fn sample(operation: CompositeOperation) -> CompositeShape {
        let mut composite = CompositeShape::new(operation);
        let mut hole = Circle::new(10.0);
        hole.set_position(50.0, 25.0);
        composite.add(Rectangle::new(100.0, 50.0)).add(hole);
        composite
    }

    fn member_fills(surface: &Surface) -> Vec<(Paint, Vec<f64>, f64)> {
        surface
            .flatten()
            .into_iter()
            .filter_map(|p| match p {
                Primitive::Polygon { attrs, .. } | Primitive::Circle { attrs, .. } => {
                    Some((attrs.fill.clone(), attrs.dash_array.clone(), attrs.fill_opacity))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_bounds_from_members() {
        let mut composite = sample(CompositeOperation::Union);
        composite.set_position(10.0, 10.0);
        let b = composite.bounds();
        assert!(approx_eq(b.x, 10.0));
        assert!(approx_eq(b.width, 100.0));
        assert!(approx_eq(b.height, 50.0));
        assert_eq!(
            composite.measurement_value(MeasurementKind::Width, &MeasurementOptions::new()),
            Some(100.0)
        );
    }

    #[test]
    fn test_subtract_styles_holes() {
        let composite = sample(CompositeOperation::Subtract);
        let mut surface = Surface::new();
        let mut ctx = RenderContext::default();
        ctx.options.show_right_angle_marks = false;
        composite.render(&mut surface, &mut ctx);

        let fills = member_fills(&surface);
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].0, Paint::Solid(Color::DEFAULT_FILL));
        assert!(fills[0].1.is_empty());
        assert_eq!(fills[1].0, Paint::Solid(Color::WHITE));
        assert!(!fills[1].1.is_empty());
    }

    #[test]
    fn test_intersect_is_translucent() {
        let composite = sample(CompositeOperation::Intersect);
        let mut surface = Surface::new();
        let mut ctx = RenderContext::default();
        ctx.options.show_right_angle_marks = false;
        composite.render(&mut surface, &mut ctx);
        assert!(member_fills(&surface)
            .iter()
            .all(|(_, _, opacity)| approx_eq(*opacity, INTERSECT_FILL_OPACITY)));
    }

    #[test]
    fn test_empty_composite() {
        let composite = CompositeShape::new(CompositeOperation::Union);
        assert_eq!(composite.bounds(), crate::math::Bounds::default());
        let mut surface = Surface::new();
        composite.render(&mut surface, &mut RenderContext::default());
        assert_eq!(surface.count("Group"), 1);
    }
}
