//! 配置
//!
//! - [`DiagramOptions`]：调度方传入的功能开关，未识别的键直接忽略
//! - [`MeasurementStyle`]：尺寸标注的外观与数值格式，参照 CAD 标注样式的组织方式

use crate::error::Result;
use crate::style::Color;
use serde::{Deserialize, Serialize};

/// 图形功能开关
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramOptions {
    /// 是否绘制尺寸标注
    pub show_measurements: bool,
    /// 是否绘制直角标记
    pub show_right_angle_marks: bool,
    /// 立体是否以虚线绘制背面棱
    pub show_hidden_edges: bool,
    /// 立体是否只绘制正面
    pub cull_back_faces: bool,
    /// 单位字符串（覆盖标注样式中的单位）
    pub unit: Option<String>,
    /// 小数位数（覆盖标注样式中的精度）
    pub precision: Option<u8>,
    /// 标注样式预设名称
    pub measurement_style: Option<String>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            show_measurements: true,
            show_right_angle_marks: true,
            show_hidden_edges: false,
            cull_back_faces: false,
            unit: None,
            precision: None,
            measurement_style: None,
        }
    }
}

impl DiagramOptions {
    /// 从 JSON 解析；缺失字段取默认值，未知字段忽略
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从已解析的 JSON 值读取
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// 按开关解析出对应的标注样式
    pub fn resolve_style(&self) -> MeasurementStyle {
        let mut style = match self.measurement_style.as_deref() {
            Some(name) => MeasurementStyle::preset(name).unwrap_or_else(|| {
                tracing::warn!("Unknown measurement style preset: {}", name);
                MeasurementStyle::default()
            }),
            None => MeasurementStyle::default(),
        };
        if let Some(unit) = &self.unit {
            style.unit = unit.clone();
        }
        if let Some(precision) = self.precision {
            style.precision = precision;
        }
        style
    }
}

/// 尺寸标注样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementStyle {
    /// 样式名称
    pub name: String,

    // ===== 线条设置 =====
    /// 标注线颜色
    pub line_color: Color,
    /// 标注线宽度
    pub line_width: f64,
    /// 延伸线超出标注线的长度
    pub extension_overshoot: f64,
    /// 延伸线与被测点之间的间隙
    pub extension_gap: f64,
    /// 默认偏移距离（请求未指定时使用）
    pub default_offset: f64,

    // ===== 箭头设置 =====
    /// 箭头长度
    pub arrow_size: f64,
    /// 箭头半宽
    pub arrow_half_width: f64,

    // ===== 文本设置 =====
    /// 字号
    pub font_size: f64,
    /// 字体
    pub font_family: String,
    /// 文本颜色
    pub text_color: Color,
    /// 文本与标注线的距离
    pub label_offset: f64,

    // ===== 标记设置 =====
    /// 直角标记边长
    pub right_angle_size: f64,
    /// 角度弧默认半径
    pub angle_arc_radius: f64,

    // ===== 数值格式 =====
    /// 单位字符串
    pub unit: String,
    /// 小数位数
    pub precision: u8,
}

impl Default for MeasurementStyle {
    fn default() -> Self {
        Self {
            name: "Standard".to_string(),

            line_color: Color::from_hex(0x374151),
            line_width: 1.0,
            extension_overshoot: 0.0,
            extension_gap: 0.0,
            default_offset: 20.0,

            arrow_size: 8.0,
            arrow_half_width: 3.0,

            font_size: 14.0,
            font_family: "sans-serif".to_string(),
            text_color: Color::from_hex(0x111827),
            label_offset: 8.0,

            right_angle_size: 10.0,
            angle_arc_radius: 24.0,

            unit: String::new(),
            precision: 2,
        }
    }
}

impl MeasurementStyle {
    /// 创建新的标注样式
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// 紧凑样式（小字号、短箭头，适合小图）
    pub fn compact() -> Self {
        Self {
            name: "Compact".to_string(),
            default_offset: 12.0,
            arrow_size: 5.0,
            arrow_half_width: 2.0,
            font_size: 10.0,
            label_offset: 5.0,
            right_angle_size: 6.0,
            angle_arc_radius: 16.0,
            ..Default::default()
        }
    }

    /// 演示样式（大字号、粗线，适合投影展示）
    pub fn presentation() -> Self {
        Self {
            name: "Presentation".to_string(),
            line_width: 2.0,
            default_offset: 28.0,
            arrow_size: 12.0,
            arrow_half_width: 4.5,
            font_size: 20.0,
            label_offset: 12.0,
            right_angle_size: 14.0,
            angle_arc_radius: 32.0,
            ..Default::default()
        }
    }

    /// 按名称获取预设（不区分大小写）
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(Self::default()),
            "compact" => Some(Self::compact()),
            "presentation" => Some(Self::presentation()),
            _ => None,
        }
    }

    /// 按精度格式化数值并去掉末尾的零
    pub fn format_number(&self, value: f64) -> String {
        let formatted = format!("{:.prec$}", value, prec = self.precision as usize);
        let trimmed = if formatted.contains('.') {
            formatted.trim_end_matches('0').trim_end_matches('.')
        } else {
            formatted.as_str()
        };
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }

    fn with_unit(&self, number: String, power: &str) -> String {
        if self.unit.is_empty() {
            number
        } else {
            format!("{} {}{}", number, self.unit, power)
        }
    }

    /// 格式化长度
    pub fn format_length(&self, value: f64) -> String {
        self.with_unit(self.format_number(value), "")
    }

    /// 格式化面积
    pub fn format_area(&self, value: f64) -> String {
        self.with_unit(self.format_number(value), "²")
    }

    /// 格式化体积
    pub fn format_volume(&self, value: f64) -> String {
        self.with_unit(self.format_number(value), "³")
    }

    /// 格式化角度（度）
    pub fn format_angle(&self, degrees: f64) -> String {
        format!("{}°", self.format_number(degrees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_measurement() {
        let mut style = MeasurementStyle::default();
        assert_eq!(style.format_length(5.0), "5");
        assert_eq!(style.format_length(5.8309), "5.83");
        assert_eq!(style.format_length(-0.001), "0");

        style.unit = "cm".into();
        assert_eq!(style.format_length(2.5), "2.5 cm");
        assert_eq!(style.format_area(15.0), "15 cm²");
        assert_eq!(style.format_volume(24.0), "24 cm³");
        assert_eq!(style.format_angle(60.0), "60°");

        style.precision = 0;
        assert_eq!(style.format_length(120.4), "120 cm");
    }

    #[test]
    fn test_options_ignore_unknown_keys() {
        let options = DiagramOptions::from_json(
            r#"{"show_measurements": false, "unit": "m", "theme": "dark", "grid": true}"#,
        )
        .unwrap();
        assert!(!options.show_measurements);
        assert!(options.show_right_angle_marks);
        assert_eq!(options.unit.as_deref(), Some("m"));
    }

    #[test]
    fn test_options_reject_wrong_types() {
        assert!(DiagramOptions::from_json(r#"{"precision": "high"}"#).is_err());
    }

    #[test]
    fn test_resolve_style() {
        let options = DiagramOptions {
            unit: Some("in".into()),
            precision: Some(1),
            measurement_style: Some("Compact".into()),
            ..Default::default()
        };
        let style = options.resolve_style();
        assert_eq!(style.name, "Compact");
        assert_eq!(style.format_length(3.14159), "3.1 in");

        let unknown = DiagramOptions {
            measurement_style: Some("baroque".into()),
            ..Default::default()
        };
        assert_eq!(unknown.resolve_style().name, "Standard");
    }
}
