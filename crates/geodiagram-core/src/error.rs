//! 错误定义
//!
//! 渲染路径上的错误只用于内部信号：记录日志后跳过，不向调用方抛出。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Degenerate segment: endpoints coincide")]
    DegenerateSegment,

    #[error("Polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },

    #[error("Unknown measurement type: {0}")]
    UnknownMeasurement(String),

    #[error("Unknown shape type: {0}")]
    UnknownShape(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeometryError>;
