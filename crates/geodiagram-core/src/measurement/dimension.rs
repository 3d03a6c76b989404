//! 尺寸线布局
//!
//! 给定被测线段的两个端点和垂直偏移量，计算延伸线、尺寸线、箭头和文本位置。
//!
//! 文本规则：
//! - 尺寸线与水平方向夹角小于 30° 时，文本总是放在线的上方（屏幕 y 减小方向），
//!   与偏移方向无关
//! - 其余情况文本放在偏移一侧
//! - 线的角度绝对值超过 90° 时文本旋转 180°，保证文字不倒置；
//!   不受水平规则约束时，放置侧随之翻到偏移的另一侧

use crate::config::MeasurementStyle;
use crate::error::{GeometryError, Result};
use crate::math::{lerp_point, rad_to_deg, Point2, Vector2, EPSILON};
use crate::style::{Attributes, Paint};
use crate::surface::{Primitive, Surface, TextAnchor};

/// 文本放置结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// 文本锚点
    pub position: Point2,
    /// 文本旋转角度（度），范围 [-90, 90]
    pub rotation: f64,
    /// 是否因接近水平而强制放在上方
    pub forced_above: bool,
    /// 是否因倒置而旋转了 180°
    pub flipped: bool,
}

/// 尺寸线布局（纯计算结果，不含绘制）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionLayout {
    /// 被测线段起点
    pub start: Point2,
    /// 被测线段终点
    pub end: Point2,
    /// 尺寸线起点
    pub dim_start: Point2,
    /// 尺寸线终点
    pub dim_end: Point2,
    /// 线段单位方向
    pub direction: Vector2,
    /// 单位法向（方向向量顺时针旋转 90°，屏幕坐标系）
    pub normal: Vector2,
    /// 偏移距离（正值沿法向）
    pub offset: f64,
    /// 尺寸线角度（度），范围 (-180, 180]
    pub angle: f64,
    /// 文本放置
    pub label: LabelPlacement,
}

impl DimensionLayout {
    /// 计算布局；两端点重合时返回 [`GeometryError::DegenerateSegment`]
    pub fn compute(start: Point2, end: Point2, offset: f64, label_offset: f64) -> Result<Self> {
        let delta = end - start;
        let length = delta.norm();
        if length < EPSILON || !length.is_finite() {
            return Err(GeometryError::DegenerateSegment);
        }

        let direction = delta / length;
        let normal = Vector2::new(-direction.y, direction.x);
        let shift = normal * offset;
        let dim_start = start + shift;
        let dim_end = end + shift;

        let angle = rad_to_deg(direction.y.atan2(direction.x));
        let forced_above = angle.abs() < 30.0 || angle.abs() > 150.0;
        let flipped = angle.abs() > 90.0;
        let rotation = if flipped {
            if angle > 0.0 {
                angle - 180.0
            } else {
                angle + 180.0
            }
        } else {
            angle
        };

        let label_dir = if forced_above {
            if normal.y > 0.0 {
                -normal
            } else {
                normal
            }
        } else {
            // 倒置旋转后文字的"上下"随之对调，放置侧也翻到另一边
            let toward_offset = if offset < 0.0 { -normal } else { normal };
            if flipped {
                -toward_offset
            } else {
                toward_offset
            }
        };

        let mid = lerp_point(&dim_start, &dim_end, 0.5);
        let label = LabelPlacement {
            position: mid + label_dir * label_offset,
            rotation,
            forced_above,
            flipped,
        };

        Ok(Self {
            start,
            end,
            dim_start,
            dim_end,
            direction,
            normal,
            offset,
            angle,
            label,
        })
    }

    /// 被测线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 两条延伸线：从被测点（留出 gap）到尺寸线（再超出 overshoot）
    pub fn extension_lines(&self, gap: f64, overshoot: f64) -> [(Point2, Point2); 2] {
        let side = if self.offset < 0.0 { -1.0 } else { 1.0 };
        let n = self.normal * side;
        [
            (self.start + n * gap, self.dim_start + n * overshoot),
            (self.end + n * gap, self.dim_end + n * overshoot),
        ]
    }

    /// 两端箭头三角形，尖端落在尺寸线端点，箭身朝向被测区间内部
    pub fn arrowheads(&self, size: f64, half_width: f64) -> [[Point2; 3]; 2] {
        [
            arrowhead(self.dim_start, self.direction, size, half_width),
            arrowhead(self.dim_end, -self.direction, size, half_width),
        ]
    }
}

/// 尖端在 tip、箭身沿 inward 方向的箭头
pub fn arrowhead(tip: Point2, inward: Vector2, size: f64, half_width: f64) -> [Point2; 3] {
    let perp = Vector2::new(-inward.y, inward.x);
    let base = tip + inward * size;
    [tip, base + perp * half_width, base - perp * half_width]
}

/// 标注线属性
pub(crate) fn line_attributes(style: &MeasurementStyle) -> Attributes {
    Attributes::stroked(style.line_color, style.line_width)
}

/// 箭头属性
pub(crate) fn arrow_attributes(style: &MeasurementStyle) -> Attributes {
    Attributes::filled(style.line_color)
}

/// 标注文本图元
pub(crate) fn label_primitive(
    content: &str,
    position: Point2,
    rotation: f64,
    style: &MeasurementStyle,
) -> Primitive {
    Primitive::Text {
        position,
        content: content.to_string(),
        font_size: style.font_size,
        font_family: style.font_family.clone(),
        anchor: TextAnchor::Middle,
        rotation,
        attrs: Attributes::default().with_fill(Paint::Solid(style.text_color)),
    }
}

/// 绘制完整的尺寸标注：延伸线、尺寸线、两端箭头和文本
pub fn draw_dimension(
    layout: &DimensionLayout,
    label: &str,
    style: &MeasurementStyle,
    surface: &mut Surface,
) {
    let line = line_attributes(style);
    if layout.offset.abs() > EPSILON {
        for (from, to) in layout.extension_lines(style.extension_gap, style.extension_overshoot) {
            surface.push(Primitive::Line {
                from,
                to,
                attrs: line.clone(),
            });
        }
    }

    surface.push(Primitive::Line {
        from: layout.dim_start,
        to: layout.dim_end,
        attrs: line,
    });

    for head in layout.arrowheads(style.arrow_size, style.arrow_half_width) {
        surface.push(Primitive::Polygon {
            points: head.to_vec(),
            attrs: arrow_attributes(style),
        });
    }

    surface.push(label_primitive(
        label,
        layout.label.position,
        layout.label.rotation,
        style,
    ));
}

/// 计算并绘制线性尺寸；退化线段只记录警告，返回 false
pub fn render_linear(
    start: Point2,
    end: Point2,
    offset: f64,
    label: &str,
    style: &MeasurementStyle,
    surface: &mut Surface,
) -> bool {
    match DimensionLayout::compute(start, end, offset, style.label_offset) {
        Ok(layout) => {
            draw_dimension(&layout, label, style, surface);
            true
        }
        Err(e) => {
            tracing::warn!("Skipping dimension '{}': {}", label, e);
            false
        }
    }
}
