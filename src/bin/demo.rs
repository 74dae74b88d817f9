//! Spinning-cube demo: lighting, texturing, fog, point starfield, and
//! dirty-rectangle presentation over an SDL2 window.

use sdl2::keyboard::Keycode;

use softgl::display::{Display, InputEvent, RenderTarget};
use softgl::util::{FpsCounter, Rng};
use softgl::{
    Capability, Context, ContextOptions, Face, LightParam, MaterialParam, MatrixMode, Primitive,
    TexParam, TextureEnv, TextureFilter,
};

const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;

/// Parse command line arguments and return (width, height, vsync)
fn parse_args() -> (u32, u32, bool) {
    let args: Vec<String> = std::env::args().collect();
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    let mut vsync = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => vsync = false,
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g. 800x600)
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            width = w;
                            height = h;
                        }
                    }
                    i += 1;
                }
            }
            "--help" => {
                println!("softgl-demo [--resolution WxH] [--no-vsync]");
                std::process::exit(0);
            }
            other => {
                eprintln!("unknown argument: {other}");
            }
        }
        i += 1;
    }

    (width, height, vsync)
}

fn checkerboard_rgba(size: u32, tile: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let checker = ((x / tile) + (y / tile)) % 2 == 0;
            if checker {
                data.extend_from_slice(&[230, 220, 180, 255]);
            } else {
                data.extend_from_slice(&[120, 60, 40, 255]);
            }
        }
    }
    data
}

fn draw_stars(gl: &mut Context, stars: &[(f32, f32)]) {
    gl.disable(Capability::Lighting);
    gl.disable(Capability::Texture2D);
    gl.disable(Capability::DepthTest);
    gl.matrix_mode(MatrixMode::Projection);
    gl.push_matrix();
    gl.load_identity();
    gl.matrix_mode(MatrixMode::ModelView);
    gl.push_matrix();
    gl.load_identity();

    gl.color3(0.8, 0.8, 0.9);
    gl.begin(Primitive::Points);
    for &(x, y) in stars {
        gl.vertex3(x, y, 0.9);
    }
    gl.end();

    gl.pop_matrix();
    gl.matrix_mode(MatrixMode::Projection);
    gl.pop_matrix();
    gl.matrix_mode(MatrixMode::ModelView);
}

fn draw_cube(gl: &mut Context, angle: f32) {
    gl.enable(Capability::Lighting);
    gl.enable(Capability::Texture2D);
    gl.enable(Capability::DepthTest);

    gl.load_identity();
    gl.translate(0.0, 0.0, -4.0);
    gl.rotate(angle, 0.0, 1.0, 0.0);
    gl.rotate(angle * 0.7, 1.0, 0.0, 0.0);

    // (normal, four corners) per face
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ]),
        ([0.0, 0.0, -1.0], [
            [1.0, -1.0, -1.0],
            [-1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
        ]),
        ([1.0, 0.0, 0.0], [
            [1.0, -1.0, 1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, 1.0],
        ]),
        ([-1.0, 0.0, 0.0], [
            [-1.0, -1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, 1.0, -1.0],
        ]),
        ([0.0, 1.0, 0.0], [
            [-1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
        ]),
        ([0.0, -1.0, 0.0], [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0],
        ]),
    ];
    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    gl.begin(Primitive::Quads);
    for (normal, corners) in &faces {
        gl.normal3(normal[0], normal[1], normal[2]);
        for (corner, uv) in corners.iter().zip(&uvs) {
            gl.tex_coord2(uv[0], uv[1]);
            gl.vertex3(corner[0], corner[1], corner[2]);
        }
    }
    gl.end();
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt::init();

    let (width, height, vsync) = parse_args();
    let opts = ContextOptions::new(width, height);
    let format = opts.format;
    let mut gl = Context::new(opts);

    let (mut display, texture_creator) = Display::new("softgl demo", width, height, vsync)?;
    let mut target = RenderTarget::new(&texture_creator, width, height, format)?;

    // Projection with the window's aspect ratio
    let aspect = height as f32 / width as f32;
    gl.matrix_mode(MatrixMode::Projection);
    gl.load_identity();
    gl.frustum(-0.5, 0.5, -0.5 * aspect, 0.5 * aspect, 1.0, 50.0);
    gl.matrix_mode(MatrixMode::ModelView);

    // One white directional light over the shoulder
    gl.light(0, LightParam::Position([0.3, 0.5, 1.0, 0.0]));
    gl.light(0, LightParam::Diffuse([1.0, 1.0, 1.0, 1.0]));
    gl.enable(Capability::Light(0));
    gl.material(Face::Front, MaterialParam::Diffuse([0.9, 0.9, 0.9, 1.0]));
    gl.enable(Capability::CullFace);
    gl.enable(Capability::Normalize);

    // Checkerboard texture
    let tex = gl.gen_textures(1)[0];
    gl.bind_texture(tex);
    gl.tex_parameter(TexParam::MagFilter(TextureFilter::Bilinear));
    gl.tex_image_2d(0, 64, 64, &checkerboard_rgba(64, 8));
    gl.tex_env(TextureEnv::Modulate);

    gl.clear_color(0.02, 0.02, 0.08, 1.0);
    gl.clear_depth(1.0);

    let mut rng = Rng::new(20260807);
    let stars: Vec<(f32, f32)> = (0..160)
        .map(|_| (rng.range_f32(-1.0, 1.0), rng.range_f32(-1.0, 1.0)))
        .collect();

    let mut fps = FpsCounter::new(120);
    let mut angle = 0.0f32;
    let mut frame = 0u64;

    'running: loop {
        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'running,
                InputEvent::KeyDown(_) => {}
            }
        }

        let (dt, _, avg_fps) = fps.tick();
        angle = (angle + dt * 45.0) % 360.0;

        gl.clear(true, true, false);
        draw_stars(&mut gl, &stars);
        draw_cube(&mut gl, angle);

        let dirty = gl.present();
        display.present(&mut target, &gl)?;

        frame += 1;
        if frame % 120 == 0 {
            tracing::info!(fps = avg_fps, dirty_rects = dirty.len(), "frame stats");
        }
    }

    Ok(())
}
