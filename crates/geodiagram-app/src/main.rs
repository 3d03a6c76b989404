//! Geodiagram 演示程序
//!
//! 构建一组示例图形，按网格排布渲染到同一个表面上，
//! 记录统计信息后把场景图以 JSON 输出到标准输出。
//!
//! 用法：`geodiagram [--options FILE] [--verbose] [SHAPE...]`

use anyhow::{bail, Context, Result};
use geodiagram_core::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// 每个示例占用的格子大小
const CELL: f64 = 260.0;
const CELL_PADDING: f64 = 40.0;
const COLUMNS: usize = 4;

struct Args {
    options_path: Option<String>,
    verbose: bool,
    shapes: Vec<ShapeKind>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        options_path: None,
        verbose: false,
        shapes: Vec::new(),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--options" | "-o" => {
                let Some(path) = iter.next() else {
                    bail!("--options requires a file path");
                };
                args.options_path = Some(path);
            }
            "--verbose" | "-v" => args.verbose = true,
            name => args.shapes.push(name.parse()?),
        }
    }
    if args.shapes.is_empty() {
        args.shapes = ShapeKind::ALL.to_vec();
    }
    Ok(args)
}

fn load_options(path: Option<&str>) -> Result<DiagramOptions> {
    let Some(path) = path else {
        return Ok(DiagramOptions::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file {}", path))?;
    let options = DiagramOptions::from_json(&json)
        .with_context(|| format!("Failed to parse options file {}", path))?;
    Ok(options)
}

/// 每种形状的示例：尺寸取整数，附带常见的标注
fn demo_shape(kind: ShapeKind) -> AnyShape {
    let opts = MeasurementOptions::new;
    match kind {
        ShapeKind::Rectangle => {
            let mut rect = Rectangle::new(12.0, 8.0);
            rect.add_measurement(MeasurementKind::Width, opts())
                .add_measurement(MeasurementKind::Height, opts())
                .add_measurement(MeasurementKind::Area, opts());
            rect.into()
        }
        ShapeKind::Triangle => {
            let mut tri = Triangle::right(6.0, 8.0);
            tri.add_measurement(MeasurementKind::Base, opts())
                .add_measurement(MeasurementKind::Height, opts())
                .add_measurement(MeasurementKind::Hypotenuse, opts());
            tri.into()
        }
        ShapeKind::Circle => {
            let mut circle = Circle::new(5.0);
            circle
                .add_measurement(MeasurementKind::Radius, opts().direction(-30.0))
                .add_measurement(MeasurementKind::Circumference, opts());
            circle.into()
        }
        ShapeKind::RegularPolygon => {
            let mut hexagon = RegularPolygon::new(6, 5.0);
            hexagon
                .add_measurement(MeasurementKind::Side(2), opts())
                .add_measurement(MeasurementKind::Apothem, opts())
                .add_measurement(MeasurementKind::Angle(0), opts());
            hexagon.into()
        }
        ShapeKind::IrregularPolygon => {
            let mut rng = StdRng::seed_from_u64(7);
            let mut polygon = IrregularPolygon::convex(7, 5.0, &mut rng);
            polygon
                .add_measurement(MeasurementKind::Side(0), opts())
                .add_measurement(MeasurementKind::Perimeter, opts());
            polygon.into()
        }
        ShapeKind::Composite => {
            let mut composite = CompositeShape::new(CompositeOperation::Subtract);
            let mut hole = Circle::new(3.0);
            hole.set_position(6.0, 4.0);
            composite.add(Rectangle::new(12.0, 8.0)).add(hole);
            composite.add_measurement(MeasurementKind::Width, opts());
            composite.into()
        }
        ShapeKind::RectangularPrism => {
            let mut prism = RectangularPrism::new(6.0, 4.0, 3.0);
            prism
                .add_measurement(MeasurementKind::Length, opts())
                .add_measurement(MeasurementKind::Width, opts())
                .add_measurement(MeasurementKind::Height, opts())
                .add_measurement(MeasurementKind::Volume, opts());
            prism.into()
        }
        ShapeKind::Pyramid => {
            let mut pyramid = Pyramid::square(6.0, 5.0);
            pyramid
                .add_measurement(MeasurementKind::Base, opts())
                .add_measurement(MeasurementKind::Height, opts())
                .add_measurement(MeasurementKind::Volume, opts());
            pyramid.into()
        }
        ShapeKind::TriangularPyramid => {
            let mut tetra = TriangularPyramid::regular(6.0);
            tetra
                .add_measurement(MeasurementKind::Base, opts())
                .add_measurement(MeasurementKind::SurfaceArea, opts());
            tetra.into()
        }
        ShapeKind::Cylinder => {
            let mut cylinder = Cylinder::new(3.0, 7.0);
            cylinder
                .add_measurement(MeasurementKind::Radius, opts())
                .add_measurement(MeasurementKind::Height, opts())
                .add_measurement(MeasurementKind::Volume, opts());
            cylinder.into()
        }
        ShapeKind::Cone => {
            let mut cone = Cone::new(3.0, 4.0);
            cone.add_measurement(MeasurementKind::Radius, opts())
                .add_measurement(MeasurementKind::Slant, opts())
                .add_measurement(MeasurementKind::SurfaceArea, opts());
            cone.into()
        }
        ShapeKind::Sphere => {
            let mut sphere = Sphere::new(4.0);
            sphere
                .add_measurement(MeasurementKind::Radius, opts())
                .add_measurement(MeasurementKind::Volume, opts());
            sphere.into()
        }
    }
}

fn main() -> Result<()> {
    let args = parse_args()?;

    // 初始化日志
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    info!("Starting Geodiagram...");

    let options = load_options(args.options_path.as_deref())?;
    let mut ctx = RenderContext::new(options);
    let cell = Viewport::new(CELL, CELL);
    let mut surface = Surface::new();

    for (index, kind) in args.shapes.iter().enumerate() {
        let mut shape = demo_shape(*kind);
        let scale = cell.fit(&mut shape, CELL_PADDING);

        // 格子内布局后再平移到格子所在位置
        let origin = Vector2::new(
            (index % COLUMNS) as f64 * CELL,
            (index / COLUMNS) as f64 * CELL,
        );
        let position = shape.position() + origin;
        shape.set_position(position.x, position.y);

        let before = surface.flatten().len();
        shape.render(&mut surface, &mut ctx);
        let bounds = shape.bounds();
        info!(
            "{:<20} scale {:>6.2}  bounds ({:.1}, {:.1}) {:.1}x{:.1}  {} primitives",
            kind.name(),
            scale,
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            surface.flatten().len() - before
        );
    }

    info!(
        "Rendered {} shapes: {} primitives, {} texts, {} gradients",
        args.shapes.len(),
        surface.flatten().len(),
        surface.texts().len(),
        surface.defs().len()
    );

    let json = serde_json::to_string_pretty(&surface).context("Failed to serialize surface")?;
    println!("{}", json);

    Ok(())
}
