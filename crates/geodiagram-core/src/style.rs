//! 样式定义
//!
//! 包含颜色、线型、填充等视觉属性。主题解析由外部完成，这里只接收
//! 已经确定的数值与颜色。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// RGBA颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 从十六进制值创建（如 0xFF0000 表示红色）
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 255,
        }
    }

    /// 解析颜色字符串：`#rgb`、`#rrggbb`、`#rrggbbaa` 或常用颜色名
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex_digits(hex);
        }
        match value.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "yellow" => Some(Self::YELLOW),
            "gray" | "grey" => Some(Self::GRAY),
            "transparent" => Some(Self::TRANSPARENT),
            _ => None,
        }
    }

    fn parse_hex_digits(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut chars = hex.chars();
                let mut next = || {
                    let c = chars.next()?;
                    channel(&format!("{c}{c}"))
                };
                Some(Self::new(next()?, next()?, next()?))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self::with_alpha(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// 输出 `#rrggbb` 形式（忽略透明度）
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// 按比例调亮（factor > 0）或调暗（factor < 0），范围 [-1, 1]
    pub fn shade(&self, factor: f64) -> Self {
        let factor = crate::math::clamp(factor, -1.0, 1.0);
        let adjust = |c: u8| -> u8 {
            let c = c as f64;
            let v = if factor >= 0.0 {
                c + (255.0 - c) * factor
            } else {
                c * (1.0 + factor)
            };
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::with_alpha(adjust(self.r), adjust(self.g), adjust(self.b), self.a)
    }

    pub const RED: Color = Color::new(255, 0, 0);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const GREEN: Color = Color::new(0, 128, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const TRANSPARENT: Color = Color::with_alpha(0, 0, 0, 0);

    /// 默认填充色（浅蓝）
    pub const DEFAULT_FILL: Color = Color::from_hex(0xDBEAFE);
    /// 默认描边色（深蓝）
    pub const DEFAULT_STROKE: Color = Color::from_hex(0x1E3A8A);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// 线型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum LineType {
    /// 连续线（实线）
    #[default]
    Continuous,
    /// 虚线
    Dashed,
    /// 点线
    Dotted,
    /// 自定义线型（正数表示画线，负数表示空白）
    Custom(Vec<f64>),
}

impl LineType {
    /// 获取线型的虚线模式（绝对值序列，空表示实线）
    pub fn dash_array(&self) -> Vec<f64> {
        match self {
            LineType::Continuous => vec![],
            LineType::Dashed => vec![6.0, 4.0],
            LineType::Dotted => vec![1.5, 3.0],
            LineType::Custom(pattern) => pattern.iter().map(|x| x.abs()).collect(),
        }
    }
}

/// 填充方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Paint {
    #[default]
    None,
    Solid(Color),
    /// 引用 [`crate::surface::Gradient`] 的 id
    Gradient(String),
}

/// 图元属性集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub fill: Paint,
    pub fill_opacity: f64,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub dash_array: Vec<f64>,
    pub opacity: f64,
    pub extra: BTreeMap<String, String>,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            fill: Paint::None,
            fill_opacity: 1.0,
            stroke: None,
            stroke_width: 1.0,
            dash_array: Vec::new(),
            opacity: 1.0,
            extra: BTreeMap::new(),
        }
    }
}

impl Attributes {
    /// 仅描边
    pub fn stroked(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Default::default()
        }
    }

    /// 仅填充
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Paint::Solid(color),
            stroke: None,
            ..Default::default()
        }
    }

    pub fn with_fill(mut self, fill: Paint) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }

    pub fn with_dash(mut self, line_type: &LineType) -> Self {
        self.dash_array = line_type.dash_array();
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// 形状样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// 填充色（None = 不填充）
    pub fill: Option<Color>,
    /// 填充不透明度 (0-1)
    pub fill_opacity: f64,
    /// 描边色（None = 不描边）
    pub stroke: Option<Color>,
    /// 描边宽度
    pub stroke_width: f64,
    /// 线型
    pub line_type: LineType,
    /// 整体不透明度 (0-1)
    pub opacity: f64,
    /// 形状特有的附加属性，原样写入图元
    pub extras: BTreeMap<String, String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Color::DEFAULT_FILL),
            fill_opacity: 1.0,
            stroke: Some(Color::DEFAULT_STROKE),
            stroke_width: 2.0,
            line_type: LineType::Continuous,
            opacity: 1.0,
            extras: BTreeMap::new(),
        }
    }
}

impl Style {
    /// 浅合并：只覆盖 patch 中给出的字段，extras 按键合并
    pub fn merge(&mut self, patch: &StylePatch) {
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
        if let Some(opacity) = patch.fill_opacity {
            self.fill_opacity = crate::math::clamp(opacity, 0.0, 1.0);
        }
        if let Some(stroke) = patch.stroke {
            self.stroke = stroke;
        }
        if let Some(width) = patch.stroke_width {
            self.stroke_width = width.max(0.0);
        }
        if let Some(line_type) = &patch.line_type {
            self.line_type = line_type.clone();
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = crate::math::clamp(opacity, 0.0, 1.0);
        }
        for (key, value) in &patch.extras {
            self.extras.insert(key.clone(), value.clone());
        }
    }

    /// 转换为图元属性
    pub fn to_attributes(&self) -> Attributes {
        Attributes {
            fill: self.fill.map_or(Paint::None, Paint::Solid),
            fill_opacity: self.fill_opacity,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            dash_array: self.line_type.dash_array(),
            opacity: self.opacity,
            extra: self.extras.clone(),
        }
    }

    /// 使用指定填充色的属性
    pub fn attributes_with_fill(&self, fill: Paint) -> Attributes {
        self.to_attributes().with_fill(fill)
    }

    /// 仅描边的属性（不填充）
    pub fn outline_attributes(&self) -> Attributes {
        self.to_attributes().with_fill(Paint::None)
    }
}

/// 样式的部分更新
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    pub fill: Option<Option<Color>>,
    pub fill_opacity: Option<f64>,
    pub stroke: Option<Option<Color>>,
    pub stroke_width: Option<f64>,
    pub line_type: Option<LineType>,
    pub opacity: Option<f64>,
    pub extras: BTreeMap<String, String>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(Some(color));
        self
    }

    pub fn no_fill(mut self) -> Self {
        self.fill = Some(None);
        self
    }

    pub fn fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.stroke = Some(Some(color));
        self
    }

    pub fn no_stroke(mut self) -> Self {
        self.stroke = Some(None);
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn line_type(mut self, line_type: LineType) -> Self {
        self.line_type = Some(line_type);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colors() {
        assert_eq!(Color::parse("#ff0000"), Some(Color::RED));
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("#00000080"), Some(Color::with_alpha(0, 0, 0, 128)));
        assert_eq!(Color::parse("Grey"), Some(Color::GRAY));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#zzzzzz"), None);
        assert_eq!(Color::parse("chartreuse-ish"), None);
        assert_eq!(Color::from_hex(0x1E3A8A).to_hex(), "#1e3a8a");
    }

    #[test]
    fn test_shade() {
        let c = Color::new(100, 100, 100);
        assert_eq!(c.shade(0.0), c);
        assert_eq!(c.shade(1.0), Color::WHITE);
        assert_eq!(c.shade(-1.0), Color::BLACK);
        assert!(c.shade(0.2).r > c.r);
        assert!(c.shade(-0.2).r < c.r);
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut style = Style::default();
        style.extras.insert("data-kind".into(), "base".into());

        let patch = StylePatch::new()
            .stroke_width(4.0)
            .no_fill()
            .extra("data-role", "figure");
        style.merge(&patch);

        assert_eq!(style.stroke_width, 4.0);
        assert_eq!(style.fill, None);
        // 未给出的字段保持原值
        assert_eq!(style.stroke, Some(Color::DEFAULT_STROKE));
        assert_eq!(style.fill_opacity, 1.0);
        assert_eq!(style.extras.len(), 2);
    }

    #[test]
    fn test_merge_clamps_opacity() {
        let mut style = Style::default();
        style.merge(&StylePatch::new().fill_opacity(3.0).opacity(-1.0));
        assert_eq!(style.fill_opacity, 1.0);
        assert_eq!(style.opacity, 0.0);
    }

    #[test]
    fn test_attributes() {
        let style = Style {
            line_type: LineType::Dashed,
            ..Default::default()
        };
        let attrs = style.to_attributes();
        assert_eq!(attrs.fill, Paint::Solid(Color::DEFAULT_FILL));
        assert_eq!(attrs.dash_array, vec![6.0, 4.0]);
        assert_eq!(style.outline_attributes().fill, Paint::None);
    }
}
