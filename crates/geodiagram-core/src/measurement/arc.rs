//! 半径/直径、角度弧与弧长标注，以及直角标记

use super::dimension::{
    arrow_attributes, arrowhead, label_primitive, line_attributes, DimensionLayout,
};
use crate::config::MeasurementStyle;
use crate::error::{GeometryError, Result};
use crate::math::{deg_to_rad, Point2, Vector2, EPSILON};
use crate::style::{Attributes, LineType};
use crate::surface::{PathCommand, Primitive, Surface};

/// 圆上指定角度（度，屏幕坐标系顺时针为正）的点
pub fn point_on_circle(center: &Point2, radius: f64, degrees: f64) -> Point2 {
    let a = deg_to_rad(degrees);
    Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
}

/// 从 start 顺时针扫到 end 的角度，范围 [0, 360)
pub fn sweep_degrees(start: f64, end: f64) -> f64 {
    (end - start).rem_euclid(360.0)
}

/// 圆弧路径
pub fn arc_path(center: &Point2, radius: f64, start: f64, sweep: f64) -> Vec<PathCommand> {
    let from = point_on_circle(center, radius, start);
    let to = point_on_circle(center, radius, start + sweep);
    vec![
        PathCommand::MoveTo(from),
        PathCommand::ArcTo {
            rx: radius,
            ry: radius,
            x_axis_rotation: 0.0,
            large_arc: sweep > 180.0,
            sweep: true,
            to,
        },
    ]
}

/// 半径或直径标注的两个端点
pub fn radial_endpoints(
    center: Point2,
    radius: f64,
    direction_degrees: f64,
    diameter: bool,
) -> (Point2, Point2) {
    let rim = point_on_circle(&center, radius, direction_degrees);
    if diameter {
        (point_on_circle(&center, radius, direction_degrees + 180.0), rim)
    } else {
        (center, rim)
    }
}

/// 绘制半径（单箭头指向圆周）或直径（双箭头）标注
pub fn render_radial(
    center: Point2,
    radius: f64,
    direction_degrees: f64,
    diameter: bool,
    label: &str,
    style: &MeasurementStyle,
    surface: &mut Surface,
) -> bool {
    let (start, end) = radial_endpoints(center, radius, direction_degrees, diameter);
    let layout = match DimensionLayout::compute(start, end, 0.0, style.label_offset) {
        Ok(layout) => layout,
        Err(e) => {
            tracing::warn!("Skipping radial measurement '{}': {}", label, e);
            return false;
        }
    };

    surface.push(Primitive::Line {
        from: layout.dim_start,
        to: layout.dim_end,
        attrs: line_attributes(style),
    });
    let [head_start, head_end] = layout.arrowheads(style.arrow_size, style.arrow_half_width);
    if diameter {
        surface.push(Primitive::Polygon {
            points: head_start.to_vec(),
            attrs: arrow_attributes(style),
        });
    } else {
        surface.push(Primitive::Circle {
            center,
            radius: style.arrow_half_width * 0.6,
            attrs: arrow_attributes(style),
        });
    }
    surface.push(Primitive::Polygon {
        points: head_end.to_vec(),
        attrs: arrow_attributes(style),
    });
    surface.push(label_primitive(
        label,
        layout.label.position,
        layout.label.rotation,
        style,
    ));
    true
}

/// 角度弧的几何结果
#[derive(Debug, Clone, PartialEq)]
pub struct AngleArc {
    pub vertex: Point2,
    pub radius: f64,
    pub start: f64,
    /// 扫过的角度（度）
    pub sweep: f64,
    /// 文本位置：弧的中间角度再向外偏移
    pub label_position: Point2,
}

impl AngleArc {
    /// 计算角度弧；半径非正或扫角为零时返回错误
    pub fn compute(
        vertex: Point2,
        start: f64,
        end: f64,
        radius: f64,
        label_offset: f64,
    ) -> Result<Self> {
        let sweep = sweep_degrees(start, end);
        if radius <= EPSILON || sweep < EPSILON {
            return Err(GeometryError::DegenerateSegment);
        }
        let mid = start + sweep / 2.0;
        Ok(Self {
            vertex,
            radius,
            start,
            sweep,
            label_position: point_on_circle(&vertex, radius + label_offset, mid),
        })
    }

    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }
}

/// 绘制角度标注：顶点处的圆弧与角度文本
pub fn render_angle(
    vertex: Point2,
    start: f64,
    end: f64,
    radius: f64,
    label: &str,
    style: &MeasurementStyle,
    surface: &mut Surface,
) -> bool {
    let label_distance = style.label_offset + style.font_size * 0.5;
    let arc = match AngleArc::compute(vertex, start, end, radius, label_distance) {
        Ok(arc) => arc,
        Err(e) => {
            tracing::warn!("Skipping angle measurement '{}': {}", label, e);
            return false;
        }
    };
    surface.push(Primitive::Path {
        commands: arc_path(&arc.vertex, arc.radius, arc.start, arc.sweep),
        attrs: line_attributes(style),
    });
    surface.push(label_primitive(label, arc.label_position, 0.0, style));
    true
}

/// 绘制弧长标注：在半径外侧 offset 处画平行圆弧，两端加径向短线和箭头
pub fn render_arc_length(
    center: Point2,
    radius: f64,
    start: f64,
    end: f64,
    offset: f64,
    label: &str,
    style: &MeasurementStyle,
    surface: &mut Surface,
) -> bool {
    let outer = radius + offset;
    let arc = match AngleArc::compute(center, start, end, outer, style.label_offset) {
        Ok(arc) => arc,
        Err(e) => {
            tracing::warn!("Skipping arc-length measurement '{}': {}", label, e);
            return false;
        }
    };

    let line = line_attributes(style);
    for angle in [arc.start, arc.end()] {
        surface.push(Primitive::Line {
            from: point_on_circle(&center, radius, angle),
            to: point_on_circle(&center, outer, angle),
            attrs: line.clone(),
        });
    }
    surface.push(Primitive::Path {
        commands: arc_path(&center, outer, arc.start, arc.sweep),
        attrs: line,
    });

    // 箭头沿切线方向
    for (angle, forward) in [(arc.start, 1.0), (arc.end(), -1.0)] {
        let a = deg_to_rad(angle);
        let tangent = Vector2::new(-a.sin(), a.cos()) * forward;
        surface.push(Primitive::Polygon {
            points: arrowhead(
                point_on_circle(&center, outer, angle),
                tangent,
                style.arrow_size,
                style.arrow_half_width,
            )
            .to_vec(),
            attrs: arrow_attributes(style),
        });
    }

    surface.push(label_primitive(label, arc.label_position, 0.0, style));
    true
}

/// 直角标记的三个点：沿两条边各走 size 后构成的小方框
pub fn right_angle_marker(
    vertex: Point2,
    toward_a: Point2,
    toward_b: Point2,
    size: f64,
) -> Option<[Point2; 3]> {
    let da = toward_a - vertex;
    let db = toward_b - vertex;
    if da.norm() < EPSILON || db.norm() < EPSILON {
        return None;
    }
    let ua = da.normalize() * size;
    let ub = db.normalize() * size;
    Some([vertex + ua, vertex + ua + ub, vertex + ub])
}

/// 绘制直角标记
pub fn render_right_angle(
    vertex: Point2,
    toward_a: Point2,
    toward_b: Point2,
    style: &MeasurementStyle,
    surface: &mut Surface,
) {
    if let Some(points) = right_angle_marker(vertex, toward_a, toward_b, style.right_angle_size) {
        surface.push(Primitive::Polyline {
            points: points.to_vec(),
            attrs: line_attributes(style),
        });
    }
}

/// 辅助虚线（如三角形的高）
pub fn render_guide(from: Point2, to: Point2, style: &MeasurementStyle, surface: &mut Surface) {
    surface.push(Primitive::Line {
        from,
        to,
        attrs: Attributes::stroked(style.line_color, style.line_width).with_dash(&LineType::Dashed),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, approx_eq_tol, distance};

    #[test]
    fn test_sweep_normalization() {
        assert!(approx_eq(sweep_degrees(0.0, 90.0), 90.0));
        assert!(approx_eq(sweep_degrees(270.0, 30.0), 120.0));
        assert!(approx_eq(sweep_degrees(-45.0, 45.0), 90.0));
    }

    #[test]
    fn test_radial_endpoints() {
        let c = Point2::new(10.0, 10.0);
        let (s, e) = radial_endpoints(c, 5.0, 0.0, false);
        assert_eq!(s, c);
        assert!(approx_eq(e.x, 15.0));

        let (s, e) = radial_endpoints(c, 5.0, 90.0, true);
        assert!(approx_eq_tol(distance(&s, &e), 10.0, 1e-9));
        assert!(approx_eq_tol(s.y, 5.0, 1e-9));
        assert!(approx_eq_tol(e.y, 15.0, 1e-9));
    }

    #[test]
    fn test_angle_label_at_mid_angle() {
        let arc = AngleArc::compute(Point2::origin(), 0.0, 90.0, 20.0, 10.0).unwrap();
        assert!(approx_eq(arc.sweep, 90.0));
        let expected = point_on_circle(&Point2::origin(), 30.0, 45.0);
        assert!(approx_eq_tol(arc.label_position.x, expected.x, 1e-9));
        assert!(approx_eq_tol(arc.label_position.y, expected.y, 1e-9));
    }

    #[test]
    fn test_degenerate_arcs_are_skipped() {
        let style = MeasurementStyle::default();
        let mut surface = Surface::new();
        assert!(!render_angle(Point2::origin(), 30.0, 30.0, 20.0, "0°", &style, &mut surface));
        assert!(!render_radial(Point2::origin(), 0.0, 0.0, false, "r = 0", &style, &mut surface));
        assert!(!render_arc_length(
            Point2::origin(),
            0.0,
            0.0,
            90.0,
            0.0,
            "0",
            &style,
            &mut surface
        ));
        assert!(surface.is_empty());
    }

    #[test]
    fn test_right_angle_marker() {
        let pts = right_angle_marker(
            Point2::new(0.0, 40.0),
            Point2::new(60.0, 40.0),
            Point2::new(0.0, 0.0),
            10.0,
        )
        .unwrap();
        assert!(approx_eq(pts[0].x, 10.0));
        assert!(approx_eq(pts[1].x, 10.0));
        assert!(approx_eq(pts[1].y, 30.0));
        assert!(approx_eq(pts[2].y, 30.0));
        let collapsed = right_angle_marker(
            Point2::origin(),
            Point2::origin(),
            Point2::new(1.0, 0.0),
            5.0,
        );
        assert!(collapsed.is_none());
    }

    #[test]
    fn test_render_radius() {
        let mut surface = Surface::new();
        let style = MeasurementStyle::default();
        assert!(render_radial(Point2::origin(), 30.0, 0.0, false, "r = 30", &style, &mut surface));
        assert_eq!(surface.count("Line"), 1);
        assert_eq!(surface.count("Polygon"), 1);
        assert_eq!(surface.texts(), vec!["r = 30"]);
    }
}
