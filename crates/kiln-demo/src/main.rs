use anyhow::{Context, Result, bail};

use kiln_engine::gpu::VertexSet;
use kiln_engine::harness::{self, HarnessConfig, Scene};
use kiln_engine::layout::{Color, Position};
use kiln_engine::logging::{LoggingConfig, init_logging};
use kiln_engine::window::{GlutinProvider, WindowConfig};

const BASIC_VERT: &str = include_str!("../shaders/basic.vert");
const VERTEX_COLOR_FRAG: &str = include_str!("../shaders/vertex_color.frag");
const PULSE_FRAG: &str = include_str!("../shaders/pulse.frag");

kiln_engine::vertex_record! {
    struct Vertex {
        position: Position,
        color: Color,
    }
}

fn vertex(x: f32, y: f32, r: f32, g: f32, b: f32) -> Vertex {
    Vertex {
        position: Position::new(x, y, 0.0),
        color: Color::new(r, g, b),
    }
}

#[derive(Debug, Copy, Clone)]
enum Demo {
    Triangle,
    Quad,
    Pulse,
}

impl Demo {
    fn from_arg(arg: Option<&str>) -> Result<Self> {
        Ok(match arg {
            None | Some("triangle") => Self::Triangle,
            Some("quad") => Self::Quad,
            Some("pulse") => Self::Pulse,
            Some(other) => bail!("unknown demo {other:?} (expected triangle, quad or pulse)"),
        })
    }

    fn name(self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Quad => "quad",
            Self::Pulse => "pulse",
        }
    }

    fn scene(self) -> Scene<'static, Vertex> {
        match self {
            Self::Triangle | Self::Pulse => Scene {
                vertex_shader: BASIC_VERT,
                fragment_shader: match self {
                    Self::Pulse => PULSE_FRAG,
                    _ => VERTEX_COLOR_FRAG,
                },
                vertices: VertexSet::new(vec![
                    vertex(-0.5, -0.5, 1.0, 0.0, 0.0),
                    vertex(0.5, -0.5, 0.0, 1.0, 0.0),
                    vertex(0.0, 0.5, 0.0, 0.0, 1.0),
                ]),
            },
            // Two triangles sharing an edge.
            Self::Quad => Scene {
                vertex_shader: BASIC_VERT,
                fragment_shader: VERTEX_COLOR_FRAG,
                vertices: VertexSet::new(vec![
                    vertex(0.5, 0.5, 1.0, 0.0, 0.0),
                    vertex(0.5, -0.5, 0.0, 1.0, 0.0),
                    vertex(-0.5, -0.5, 0.0, 0.0, 1.0),
                    vertex(-0.5, 0.5, 1.0, 1.0, 0.0),
                ])
                .with_indices(vec![0, 1, 3, 1, 2, 3]),
            },
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let arg = std::env::args().nth(1);
    let demo = Demo::from_arg(arg.as_deref())?;
    log::info!("starting {} demo", demo.name());

    let config = HarnessConfig {
        window: WindowConfig {
            title: format!("kiln - {}", demo.name()),
            ..WindowConfig::default()
        },
        ..HarnessConfig::default()
    };

    let mut provider = GlutinProvider::new().context("failed to set up windowing")?;
    let scene = demo.scene();

    let frames = match demo {
        Demo::Pulse => harness::run(&mut provider, &config, &scene, |program, frame| {
            program.set_uniform_f32("uTime", frame.elapsed.as_secs_f32());
        }),
        Demo::Triangle | Demo::Quad => harness::run(&mut provider, &config, &scene, |_, _| {}),
    }
    .inspect_err(|e| log::error!("{e}"))
    .with_context(|| format!("{} demo failed", demo.name()))?;

    log::info!("{} demo closed after {frames} frames", demo.name());
    Ok(())
}
