//! 视口布局
//!
//! 形状不反向持有渲染器；需要按画布尺寸居中或缩放时，
//! 由调用方用 [`Viewport`] 根据形状的 `bounds()` 调整放置。

use crate::math::{Bounds, Point2};
use crate::shape::Shape;
use serde::{Deserialize, Serialize};

/// 画布区域
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.abs(),
            height: height.abs(),
        }
    }

    pub fn center_point(&self) -> Point2 {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width, self.height)
    }

    /// 平移形状使其包围盒中心与画布中心重合
    pub fn center<S: Shape>(&self, shape: &mut S) {
        let target = self.center_point();
        let current = shape.bounds().center();
        let position = shape.position() + (target - current);
        shape.set_position(position.x, position.y);
    }

    /// 等比缩放形状使其留出 padding 后恰好放入画布，再居中；返回缩放系数
    pub fn fit<S: Shape>(&self, shape: &mut S, padding: f64) -> f64 {
        let bounds = shape.bounds();
        let available_w = self.width - padding * 2.0;
        let available_h = self.height - padding * 2.0;
        if bounds.width <= 0.0 && bounds.height <= 0.0 {
            tracing::warn!("Cannot fit empty {} into viewport", shape.kind().name());
            self.center(shape);
            return 1.0;
        }
        if available_w <= 0.0 || available_h <= 0.0 {
            tracing::warn!(
                "Padding {} leaves no room in {}x{} viewport",
                padding,
                self.width,
                self.height
            );
            self.center(shape);
            return 1.0;
        }

        let scale_x = if bounds.width > 0.0 { available_w / bounds.width } else { f64::INFINITY };
        let scale_y = if bounds.height > 0.0 { available_h / bounds.height } else { f64::INFINITY };
        let factor = scale_x.min(scale_y);
        shape.scale(factor);
        self.center(shape);
        tracing::debug!("Fitted {} with scale {:.3}", shape.kind().name(), factor);
        factor
    }
}
