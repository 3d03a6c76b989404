//! 渲染表面
//!
//! 只追加的有序矢量图元集合。本模块不做任何格式序列化，
//! 调用方负责把图元写成具体的矢量格式。

use crate::math::Point2;
use crate::style::{Attributes, Color};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};

/// 文本锚点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

/// 路径指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point2),
    LineTo(Point2),
    /// 椭圆弧，参数含义与常见矢量格式的弧指令一致
    ArcTo {
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point2,
    },
    Close,
}

/// 矢量图元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line {
        from: Point2,
        to: Point2,
        attrs: Attributes,
    },
    Polyline {
        points: Vec<Point2>,
        attrs: Attributes,
    },
    Polygon {
        points: Vec<Point2>,
        attrs: Attributes,
    },
    Circle {
        center: Point2,
        radius: f64,
        attrs: Attributes,
    },
    Ellipse {
        center: Point2,
        rx: f64,
        ry: f64,
        /// 旋转角度（度）
        rotation: f64,
        attrs: Attributes,
    },
    Path {
        commands: Vec<PathCommand>,
        attrs: Attributes,
    },
    Text {
        position: Point2,
        content: String,
        font_size: f64,
        font_family: String,
        anchor: TextAnchor,
        /// 旋转角度（度），绕 position 旋转
        rotation: f64,
        attrs: Attributes,
    },
    Group {
        transform: Transform2D,
        children: Vec<Primitive>,
        attrs: Attributes,
    },
}

impl Primitive {
    /// 获取图元的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Primitive::Line { .. } => "Line",
            Primitive::Polyline { .. } => "Polyline",
            Primitive::Polygon { .. } => "Polygon",
            Primitive::Circle { .. } => "Circle",
            Primitive::Ellipse { .. } => "Ellipse",
            Primitive::Path { .. } => "Path",
            Primitive::Text { .. } => "Text",
            Primitive::Group { .. } => "Group",
        }
    }

    /// 获取图元属性
    pub fn attributes(&self) -> &Attributes {
        match self {
            Primitive::Line { attrs, .. }
            | Primitive::Polyline { attrs, .. }
            | Primitive::Polygon { attrs, .. }
            | Primitive::Circle { attrs, .. }
            | Primitive::Ellipse { attrs, .. }
            | Primitive::Path { attrs, .. }
            | Primitive::Text { attrs, .. }
            | Primitive::Group { attrs, .. } => attrs,
        }
    }

    /// 深度优先遍历自身及所有子图元
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Primitive)) {
        visit(self);
        if let Primitive::Group { children, .. } = self {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

/// 渐变色标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// 位置 (0-1)
    pub offset: f64,
    pub color: Color,
    pub opacity: f64,
}

/// 径向渐变定义，坐标为相对于被填充对象包围盒的比例
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub id: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    /// 焦点
    pub fx: f64,
    pub fy: f64,
    pub stops: Vec<GradientStop>,
}

/// 渲染表面
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    primitives: Vec<Primitive>,
    defs: Vec<Gradient>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加图元
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// 批量追加
    pub fn extend(&mut self, primitives: impl IntoIterator<Item = Primitive>) {
        self.primitives.extend(primitives);
    }

    /// 注册渐变定义
    pub fn add_gradient(&mut self, gradient: Gradient) {
        self.defs.push(gradient);
    }

    /// 顶层图元
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// 渐变定义
    pub fn defs(&self) -> &[Gradient] {
        &self.defs
    }

    /// 顶层图元数量
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// 拆出所有顶层图元和定义（用于把子表面包进分组）
    pub fn into_parts(self) -> (Vec<Primitive>, Vec<Gradient>) {
        (self.primitives, self.defs)
    }

    /// 递归展开后的全部图元
    pub fn flatten(&self) -> Vec<&Primitive> {
        let mut all = Vec::new();
        for primitive in &self.primitives {
            primitive.walk(&mut |p| all.push(p));
        }
        all
    }

    /// 递归统计指定类型的图元数量
    pub fn count(&self, type_name: &str) -> usize {
        self.flatten()
            .into_iter()
            .filter(|p| p.type_name() == type_name)
            .count()
    }

    /// 递归收集所有文本内容
    pub fn texts(&self) -> Vec<&str> {
        self.flatten()
            .into_iter()
            .filter_map(|p| match p {
                Primitive::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}
