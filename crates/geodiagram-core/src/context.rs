//! 渲染上下文
//!
//! 每次渲染会话持有一个 [`RenderContext`]，显式传入所有渲染调用。
//! 需要唯一名称的资源（如渐变定义）从上下文中的计数器取号，
//! 不依赖全局状态或时间戳。

use crate::config::{DiagramOptions, MeasurementStyle};
use serde::{Deserialize, Serialize};

/// 单调递增的资源ID生成器
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成带前缀的唯一ID，如 `sphere-gradient-0`
    pub fn next_id(&mut self, prefix: &str) -> String {
        let id = self.next;
        self.next += 1;
        format!("{}-{}", prefix, id)
    }

    /// 已发放的ID数量
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// 渲染上下文
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// 功能开关
    pub options: DiagramOptions,
    /// 标注样式
    pub style: MeasurementStyle,
    /// 资源ID生成器
    pub ids: IdGenerator,
}

impl RenderContext {
    /// 按功能开关创建上下文，标注样式由开关解析得到
    pub fn new(options: DiagramOptions) -> Self {
        let style = options.resolve_style();
        Self {
            options,
            style,
            ids: IdGenerator::new(),
        }
    }

    /// 使用指定的标注样式
    pub fn with_style(mut self, style: MeasurementStyle) -> Self {
        self.style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut ids = IdGenerator::new();
        let a = ids.next_id("grad");
        let b = ids.next_id("grad");
        let c = ids.next_id("clip");
        assert_eq!(a, "grad-0");
        assert_eq!(b, "grad-1");
        assert_eq!(c, "clip-2");
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn test_context_resolves_style() {
        let ctx = RenderContext::new(DiagramOptions {
            unit: Some("cm".into()),
            ..Default::default()
        });
        assert_eq!(ctx.style.unit, "cm");
        assert_eq!(ctx.ids.issued(), 0);
    }
}
