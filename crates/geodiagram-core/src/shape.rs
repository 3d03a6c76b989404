//! 形状通用契约
//!
//! 每种形状都持有一个 [`Frame`]（位置、旋转、缩放、样式和标注请求），
//! 并实现 [`Shape`] 的少量必需方法；定位、样式合并、包围盒、渲染和标注绘制
//! 由 trait 的默认方法统一完成。
//!
//! 形状本体在局部坐标系中输出，外层包一个带放置变换的分组；
//! 标注先在局部坐标系求出被测几何，再变换到父坐标系绘制，
//! 这样文本不会随形状一起被旋转或拉伸。

use crate::context::RenderContext;
use crate::error::GeometryError;
use crate::math::{BoundingBox2, Bounds, Point2};
use crate::measurement::{
    render_geometry, MeasurementGeometry, MeasurementKind, MeasurementOptions, MeasurementRequest,
};
use crate::style::{Attributes, Style, StylePatch};
use crate::surface::{Primitive, Surface};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 形状的放置与外观
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// 在父坐标系中的位置
    pub position: Point2,
    /// 平面内旋转角度（度）
    pub rotation: f64,
    /// X方向缩放
    pub scale_x: f64,
    /// Y方向缩放
    pub scale_y: f64,
    /// 样式
    pub style: Style,
    /// 标注请求（按添加顺序绘制）
    pub measurements: Vec<MeasurementRequest>,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            position: Point2::origin(),
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            style: Style::default(),
            measurements: Vec::new(),
        }
    }
}

impl Frame {
    /// 局部坐标到父坐标的放置变换
    pub fn transform(&self) -> Transform2D {
        Transform2D::placement(self.position, self.rotation, self.scale_x, self.scale_y)
    }
}

/// 用于计算包围盒的轮廓元素（局部坐标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineElement {
    Point(Point2),
    /// 椭圆，rotation 为长轴 rx 相对 x 轴的角度（度）
    Ellipse {
        center: Point2,
        rx: f64,
        ry: f64,
        rotation: f64,
    },
}

/// 把轮廓元素经仿射变换后求精确包围盒
pub fn transformed_extent(outline: &[OutlineElement], transform: &Transform2D) -> BoundingBox2 {
    let [[a, b], [c, d]] = transform.linear();
    let mut bbox = BoundingBox2::empty();
    for element in outline {
        match element {
            OutlineElement::Point(p) => bbox.expand_to_include(&transform.transform_point(p)),
            OutlineElement::Ellipse {
                center,
                rx,
                ry,
                rotation,
            } => {
                let center = transform.transform_point(center);
                // 椭圆是单位圆经 L·R·diag(rx, ry) 的像，两列向量的分量给出半宽半高
                let (sin, cos) = rotation.to_radians().sin_cos();
                let u = (rx * cos, rx * sin);
                let v = (-ry * sin, ry * cos);
                let col_u = (a * u.0 + b * u.1, c * u.0 + d * u.1);
                let col_v = (a * v.0 + b * v.1, c * v.0 + d * v.1);
                let hx = col_u.0.hypot(col_v.0);
                let hy = col_u.1.hypot(col_v.1);
                bbox.expand_to_include(&Point2::new(center.x - hx, center.y - hy));
                bbox.expand_to_include(&Point2::new(center.x + hx, center.y + hy));
            }
        }
    }
    bbox
}

/// 形状种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Triangle,
    Circle,
    RegularPolygon,
    IrregularPolygon,
    Composite,
    RectangularPrism,
    Pyramid,
    TriangularPyramid,
    Cylinder,
    Cone,
    Sphere,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Circle => "circle",
            ShapeKind::RegularPolygon => "regular-polygon",
            ShapeKind::IrregularPolygon => "irregular-polygon",
            ShapeKind::Composite => "composite",
            ShapeKind::RectangularPrism => "rectangular-prism",
            ShapeKind::Pyramid => "pyramid",
            ShapeKind::TriangularPyramid => "triangular-pyramid",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cone => "cone",
            ShapeKind::Sphere => "sphere",
        }
    }

    pub const ALL: [ShapeKind; 12] = [
        ShapeKind::Rectangle,
        ShapeKind::Triangle,
        ShapeKind::Circle,
        ShapeKind::RegularPolygon,
        ShapeKind::IrregularPolygon,
        ShapeKind::Composite,
        ShapeKind::RectangularPrism,
        ShapeKind::Pyramid,
        ShapeKind::TriangularPyramid,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
        ShapeKind::Sphere,
    ];

    /// 是否为立体
    pub fn is_solid(&self) -> bool {
        matches!(
            self,
            ShapeKind::RectangularPrism
                | ShapeKind::Pyramid
                | ShapeKind::TriangularPyramid
                | ShapeKind::Cylinder
                | ShapeKind::Cone
                | ShapeKind::Sphere
        )
    }
}

impl FromStr for ShapeKind {
    type Err = GeometryError;

    /// 接受 `name()` 的写法，下划线、空格与连字符等价，另有几个常用别名
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let alias = match normalized.as_str() {
            "square" => Some(ShapeKind::Rectangle),
            "polygon" => Some(ShapeKind::RegularPolygon),
            "cube" | "cuboid" | "prism" => Some(ShapeKind::RectangularPrism),
            "tetrahedron" => Some(ShapeKind::TriangularPyramid),
            _ => None,
        };
        alias
            .or_else(|| ShapeKind::ALL.into_iter().find(|k| k.name() == normalized))
            .ok_or_else(|| GeometryError::UnknownShape(s.to_string()))
    }
}

/// 形状契约
pub trait Shape {
    /// 形状种类
    fn kind(&self) -> ShapeKind;

    /// 放置与外观
    fn frame(&self) -> &Frame;

    /// 放置与外观（可变）
    fn frame_mut(&mut self) -> &mut Frame;

    /// 局部坐标下的轮廓，用于包围盒
    fn outline(&self) -> Vec<OutlineElement>;

    /// 在局部坐标系中输出形状本体
    fn draw(&self, surface: &mut Surface, ctx: &mut RenderContext);

    /// 局部坐标下的被测几何；不支持的类型返回 None
    fn measurement_geometry(
        &self,
        kind: MeasurementKind,
        options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry>;

    /// 被测数值；不支持的类型返回 None
    fn measurement_value(&self, kind: MeasurementKind, options: &MeasurementOptions) -> Option<f64>;

    /// 在父坐标系中输出的附加标记（如直角标记），默认无
    fn draw_marks(&self, _surface: &mut Surface, _ctx: &mut RenderContext) {}

    // ===== 定位 =====

    fn position(&self) -> Point2 {
        self.frame().position
    }

    fn set_position(&mut self, x: f64, y: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.frame_mut().position = Point2::new(x, y);
        self
    }

    /// 在当前角度上继续旋转（度）
    fn rotate(&mut self, degrees: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.frame_mut().rotation += degrees;
        self
    }

    /// 均匀缩放（在当前缩放上相乘）
    fn scale(&mut self, factor: f64) -> &mut Self
    where
        Self: Sized,
    {
        self.scale_xy(factor, factor)
    }

    /// 非均匀缩放（在当前缩放上相乘）
    fn scale_xy(&mut self, fx: f64, fy: f64) -> &mut Self
    where
        Self: Sized,
    {
        let frame = self.frame_mut();
        frame.scale_x *= fx;
        frame.scale_y *= fy;
        self
    }

    /// 浅合并样式
    fn set_style(&mut self, patch: StylePatch) -> &mut Self
    where
        Self: Sized,
    {
        self.frame_mut().style.merge(&patch);
        self
    }

    fn style(&self) -> &Style {
        &self.frame().style
    }

    // ===== 标注 =====

    fn add_measurement(&mut self, kind: MeasurementKind, options: MeasurementOptions) -> &mut Self
    where
        Self: Sized,
    {
        self.frame_mut()
            .measurements
            .push(MeasurementRequest::new(kind, options));
        self
    }

    /// 按名称添加标注；无法识别的名称只记录警告
    fn add_measurement_named(&mut self, name: &str, options: MeasurementOptions) -> &mut Self
    where
        Self: Sized,
    {
        match name.parse::<MeasurementKind>() {
            Ok(kind) => {
                self.add_measurement(kind, options);
            }
            Err(e) => tracing::warn!("{} ignored on {}", e, self.kind().name()),
        }
        self
    }

    fn measurements(&self) -> &[MeasurementRequest] {
        &self.frame().measurements
    }

    fn clear_measurements(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.frame_mut().measurements.clear();
        self
    }

    /// 父坐标系下的被测几何
    fn measurement_points(
        &self,
        kind: MeasurementKind,
        options: &MeasurementOptions,
    ) -> Option<MeasurementGeometry> {
        self.measurement_geometry(kind, options)
            .map(|g| g.transformed(&self.transform()))
    }

    // ===== 几何 =====

    /// 放置变换
    fn transform(&self) -> Transform2D {
        self.frame().transform()
    }

    /// 父坐标系下的轴对齐包围盒（已计入缩放与旋转）
    fn bounds(&self) -> Bounds {
        transformed_extent(&self.outline(), &self.transform()).to_bounds()
    }

    // ===== 渲染 =====

    /// 输出形状本体，并按开关输出标记与标注
    fn render(&self, surface: &mut Surface, ctx: &mut RenderContext) {
        let mut body = Surface::new();
        self.draw(&mut body, ctx);
        let (children, defs) = body.into_parts();
        for gradient in defs {
            surface.add_gradient(gradient);
        }
        let mut attrs = Attributes::default();
        attrs
            .extra
            .insert("data-shape".to_string(), self.kind().name().to_string());
        surface.push(Primitive::Group {
            transform: self.transform(),
            children,
            attrs,
        });

        if ctx.options.show_right_angle_marks {
            self.draw_marks(surface, ctx);
        }
        if ctx.options.show_measurements {
            self.render_measurements(surface, ctx);
        }
    }

    /// 依次绘制全部标注请求；不支持或退化的请求跳过，不影响其余请求
    fn render_measurements(&self, surface: &mut Surface, ctx: &mut RenderContext) {
        let mut drawn = 0usize;
        for request in self.measurements() {
            let Some(geometry) = self.measurement_points(request.kind, &request.options) else {
                tracing::warn!(
                    "Unsupported measurement '{}' on {}",
                    request.kind,
                    self.kind().name()
                );
                continue;
            };
            let label = match &request.options.label {
                Some(label) => label.clone(),
                None => match self.measurement_value(request.kind, &request.options) {
                    Some(value) => request.kind.format_value(value, &ctx.style),
                    None => String::new(),
                },
            };
            if render_geometry(&geometry, &label, &request.options, &ctx.style, surface) {
                drawn += 1;
            }
        }
        tracing::debug!(
            "{}: {} of {} measurements drawn",
            self.kind().name(),
            drawn,
            self.measurements().len()
        );
    }
}
