//! 尺寸标注引擎
//!
//! 形状只负责给出被测几何（[`MeasurementGeometry`]）和数值，
//! 本模块负责把它们画成尺寸线、半径线、角度弧或文字。
//!
//! - [`dimension`]：线性尺寸（延伸线 + 尺寸线 + 箭头 + 文本）
//! - [`arc`]：半径/直径、角度、弧长与直角标记

pub mod arc;
pub mod dimension;

pub use dimension::{DimensionLayout, LabelPlacement};

use crate::config::MeasurementStyle;
use crate::error::GeometryError;
use crate::math::{rad_to_deg, Point2, Vector2};
use crate::surface::Surface;
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 标注类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementKind {
    Width,
    Height,
    Length,
    Depth,
    Base,
    /// 第 i 条边（从第 i 个顶点到下一个顶点）
    Side(usize),
    Hypotenuse,
    Slant,
    Diagonal,
    Radius,
    Diameter,
    Circumference,
    ArcLength,
    Apothem,
    /// 第 i 个顶点处的内角
    Angle(usize),
    Area,
    Perimeter,
    Volume,
    SurfaceArea,
}

/// 标注数值的量纲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Length,
    Area,
    Volume,
    Angle,
}

impl MeasurementKind {
    /// 量纲
    pub fn quantity(&self) -> Quantity {
        match self {
            MeasurementKind::Area | MeasurementKind::SurfaceArea => Quantity::Area,
            MeasurementKind::Volume => Quantity::Volume,
            MeasurementKind::Angle(_) => Quantity::Angle,
            _ => Quantity::Length,
        }
    }

    /// 文本前缀
    pub fn label_prefix(&self) -> Option<&'static str> {
        match self {
            MeasurementKind::Radius => Some("r = "),
            MeasurementKind::Diameter => Some("d = "),
            MeasurementKind::Circumference => Some("C = "),
            MeasurementKind::Area => Some("A = "),
            MeasurementKind::Perimeter => Some("P = "),
            MeasurementKind::Volume => Some("V = "),
            MeasurementKind::SurfaceArea => Some("SA = "),
            _ => None,
        }
    }

    /// 按样式格式化数值
    pub fn format_value(&self, value: f64, style: &MeasurementStyle) -> String {
        let number = match self.quantity() {
            Quantity::Length => style.format_length(value),
            Quantity::Area => style.format_area(value),
            Quantity::Volume => style.format_volume(value),
            Quantity::Angle => style.format_angle(value),
        };
        match self.label_prefix() {
            Some(prefix) => format!("{}{}", prefix, number),
            None => number,
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementKind::Width => write!(f, "width"),
            MeasurementKind::Height => write!(f, "height"),
            MeasurementKind::Length => write!(f, "length"),
            MeasurementKind::Depth => write!(f, "depth"),
            MeasurementKind::Base => write!(f, "base"),
            MeasurementKind::Side(i) => write!(f, "side-{}", i),
            MeasurementKind::Hypotenuse => write!(f, "hypotenuse"),
            MeasurementKind::Slant => write!(f, "slant"),
            MeasurementKind::Diagonal => write!(f, "diagonal"),
            MeasurementKind::Radius => write!(f, "radius"),
            MeasurementKind::Diameter => write!(f, "diameter"),
            MeasurementKind::Circumference => write!(f, "circumference"),
            MeasurementKind::ArcLength => write!(f, "arc-length"),
            MeasurementKind::Apothem => write!(f, "apothem"),
            MeasurementKind::Angle(i) => write!(f, "angle-{}", i),
            MeasurementKind::Area => write!(f, "area"),
            MeasurementKind::Perimeter => write!(f, "perimeter"),
            MeasurementKind::Volume => write!(f, "volume"),
            MeasurementKind::SurfaceArea => write!(f, "surface-area"),
        }
    }
}

impl FromStr for MeasurementKind {
    type Err = GeometryError;

    /// 解析调度方传入的名称，如 `"width"`、`"side-2"`、`"arc_length"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();

        let indexed = |prefix: &str| -> Option<Option<usize>> {
            let rest = normalized.strip_prefix(prefix)?;
            if rest.is_empty() {
                return Some(Some(0));
            }
            Some(rest.strip_prefix('-').and_then(|n| n.parse().ok()))
        };

        let kind = match normalized.as_str() {
            "width" => MeasurementKind::Width,
            "height" => MeasurementKind::Height,
            "length" => MeasurementKind::Length,
            "depth" => MeasurementKind::Depth,
            "base" => MeasurementKind::Base,
            "hypotenuse" => MeasurementKind::Hypotenuse,
            "slant" | "slant-height" => MeasurementKind::Slant,
            "diagonal" => MeasurementKind::Diagonal,
            "radius" => MeasurementKind::Radius,
            "diameter" => MeasurementKind::Diameter,
            "circumference" => MeasurementKind::Circumference,
            "arc-length" | "arclength" => MeasurementKind::ArcLength,
            "apothem" => MeasurementKind::Apothem,
            "area" => MeasurementKind::Area,
            "perimeter" => MeasurementKind::Perimeter,
            "volume" => MeasurementKind::Volume,
            "surface-area" | "surfacearea" => MeasurementKind::SurfaceArea,
            _ => {
                let unknown = || GeometryError::UnknownMeasurement(s.to_string());
                if let Some(index) = indexed("side") {
                    MeasurementKind::Side(index.ok_or_else(unknown)?)
                } else if let Some(index) = indexed("angle") {
                    MeasurementKind::Angle(index.ok_or_else(unknown)?)
                } else {
                    return Err(GeometryError::UnknownMeasurement(s.to_string()));
                }
            }
        };
        Ok(kind)
    }
}

/// 偏好的标注侧（相对于被测线段的行进方向）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PreferredSide {
    /// 使用形状给出的默认方向（通常在形状外侧）
    #[default]
    Auto,
    /// 行进方向右侧（偏移取正）
    Right,
    /// 行进方向左侧（偏移取负）
    Left,
}

/// 标注选项
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementOptions {
    /// 偏移距离（None = 使用样式默认值）
    pub offset: Option<f64>,
    /// 覆盖文本
    pub label: Option<String>,
    /// 偏好的标注侧
    pub side: PreferredSide,
    /// 半径/直径线的方向（度）
    pub direction: Option<f64>,
    /// 弧长标注的起止角度（度）
    pub arc: Option<(f64, f64)>,
}

impl MeasurementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn side(mut self, side: PreferredSide) -> Self {
        self.side = side;
        self
    }

    pub fn direction(mut self, degrees: f64) -> Self {
        self.direction = Some(degrees);
        self
    }

    pub fn arc(mut self, start: f64, end: f64) -> Self {
        self.arc = Some((start, end));
        self
    }

    /// 实际使用的带符号偏移
    pub fn signed_offset(&self, style: &MeasurementStyle) -> f64 {
        let offset = self.offset.unwrap_or(style.default_offset);
        match self.side {
            PreferredSide::Auto => offset,
            PreferredSide::Right => offset.abs(),
            PreferredSide::Left => -offset.abs(),
        }
    }
}

/// 标注请求：类型 + 选项，按添加顺序绘制
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRequest {
    pub kind: MeasurementKind,
    pub options: MeasurementOptions,
}

impl MeasurementRequest {
    pub fn new(kind: MeasurementKind, options: MeasurementOptions) -> Self {
        Self { kind, options }
    }
}

/// 被测几何
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementGeometry {
    /// 线性尺寸；guide 为 true 时额外以虚线画出被测线段本身（如三角形的高）
    Linear {
        start: Point2,
        end: Point2,
        guide: bool,
    },
    /// 半径或直径
    Radial {
        center: Point2,
        radius: f64,
        direction: f64,
        diameter: bool,
    },
    /// 顶点处的角度弧；radius 为 None 时使用样式中的默认半径
    Angle {
        vertex: Point2,
        start: f64,
        end: f64,
        radius: Option<f64>,
    },
    /// 圆弧长度
    Arc {
        center: Point2,
        radius: f64,
        start: f64,
        end: f64,
    },
    /// 仅文本（面积、周长、体积等）
    Label { anchor: Point2 },
}

/// 把方向角经变换后重新求角
fn transform_angle(transform: &Transform2D, degrees: f64) -> f64 {
    let a = degrees.to_radians();
    let v = transform.transform_vector(&Vector2::new(a.cos(), a.sin()));
    rad_to_deg(v.y.atan2(v.x))
}

/// 变换后的半径取两个轴向缩放的平均值
fn transform_radius(transform: &Transform2D, radius: f64) -> f64 {
    let (sx, sy) = transform.scale_component();
    radius * (sx + sy) / 2.0
}

impl MeasurementGeometry {
    /// 从形状局部坐标变换到父坐标
    pub fn transformed(&self, transform: &Transform2D) -> Self {
        let [[a, b], [c, d]] = transform.linear();
        let mirrored = a * d - b * c < 0.0;
        let arc_angles = |start: f64, end: f64| {
            let (s, e) = (transform_angle(transform, start), transform_angle(transform, end));
            if mirrored {
                (e, s)
            } else {
                (s, e)
            }
        };
        match self {
            MeasurementGeometry::Linear { start, end, guide } => MeasurementGeometry::Linear {
                start: transform.transform_point(start),
                end: transform.transform_point(end),
                guide: *guide,
            },
            MeasurementGeometry::Radial {
                center,
                radius,
                direction,
                diameter,
            } => MeasurementGeometry::Radial {
                center: transform.transform_point(center),
                radius: transform_radius(transform, *radius),
                direction: transform_angle(transform, *direction),
                diameter: *diameter,
            },
            MeasurementGeometry::Angle {
                vertex,
                start,
                end,
                radius,
            } => {
                let (start, end) = arc_angles(*start, *end);
                MeasurementGeometry::Angle {
                    vertex: transform.transform_point(vertex),
                    start,
                    end,
                    radius: radius.map(|r| transform_radius(transform, r)),
                }
            }
            MeasurementGeometry::Arc {
                center,
                radius,
                start,
                end,
            } => {
                let (start, end) = arc_angles(*start, *end);
                MeasurementGeometry::Arc {
                    center: transform.transform_point(center),
                    radius: transform_radius(transform, *radius),
                    start,
                    end,
                }
            }
            MeasurementGeometry::Label { anchor } => MeasurementGeometry::Label {
                anchor: transform.transform_point(anchor),
            },
        }
    }
}

/// 绘制一个已经位于父坐标系的标注，返回是否绘制了内容
pub fn render_geometry(
    geometry: &MeasurementGeometry,
    label: &str,
    options: &MeasurementOptions,
    style: &MeasurementStyle,
    surface: &mut Surface,
) -> bool {
    match geometry {
        MeasurementGeometry::Linear { start, end, guide } => {
            // 辅助线上的尺寸默认直接沿辅助线标注
            let offset = if *guide {
                if (*end - *start).norm() > crate::math::EPSILON {
                    arc::render_guide(*start, *end, style, surface);
                }
                options.offset.map_or(0.0, |_| options.signed_offset(style))
            } else {
                options.signed_offset(style)
            };
            dimension::render_linear(*start, *end, offset, label, style, surface)
        }
        MeasurementGeometry::Radial {
            center,
            radius,
            direction,
            diameter,
        } => arc::render_radial(*center, *radius, *direction, *diameter, label, style, surface),
        MeasurementGeometry::Angle {
            vertex,
            start,
            end,
            radius,
        } => {
            let radius = radius.unwrap_or(style.angle_arc_radius);
            arc::render_angle(*vertex, *start, *end, radius, label, style, surface)
        }
        MeasurementGeometry::Arc {
            center,
            radius,
            start,
            end,
        } => {
            let offset = options.signed_offset(style).abs();
            arc::render_arc_length(*center, *radius, *start, *end, offset, label, style, surface)
        }
        MeasurementGeometry::Label { anchor } => {
            surface.push(dimension::label_primitive(label, *anchor, 0.0, style));
            true
        }
    }
}
