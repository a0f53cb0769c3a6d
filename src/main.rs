use clap::Parser;

use voxelspace::render::{RenderParams, Renderer, ViewerState};
use voxelspace::synth::{self, SynthParams};
use voxelspace::terrain::TerrainMaps;
use voxelspace::viewer;

#[derive(Parser, Debug)]
#[command(name = "voxelspace")]
#[command(about = "Comanche-style voxel-space terrain flyover")]
struct Args {
    /// Height map image; elevation is read from the blue channel
    #[arg(long, requires = "color_map")]
    height_map: Option<String>,

    /// Color map image covering the height map
    #[arg(long, requires = "height_map")]
    color_map: Option<String>,

    /// Random seed for generated demo terrain (random if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Side length of generated demo terrain
    #[arg(long, default_value = "1024")]
    demo_size: usize,

    /// Starting viewer X position in world units
    #[arg(long, default_value = "800.0")]
    x: f64,

    /// Starting viewer Y position in world units
    #[arg(long, default_value = "500.0")]
    y: f64,

    /// Starting heading in radians
    #[arg(long, default_value = "1.7")]
    heading: f64,

    /// Integer window upscale of the 400x300 logical frame
    #[arg(long, default_value = "2")]
    scale: usize,

    /// Target frames per second
    #[arg(long, default_value = "60")]
    fps: usize,
}

fn main() {
    let args = Args::parse();

    let terrain = match (&args.height_map, &args.color_map) {
        (Some(height_path), Some(color_path)) => {
            println!("Loading terrain: {} + {}", height_path, color_path);
            match TerrainMaps::load(height_path, color_path) {
                Ok(terrain) => terrain,
                Err(e) => {
                    eprintln!("Failed to load terrain: {}", e);
                    std::process::exit(1);
                }
            }
        }
        _ => {
            let seed = args.seed.unwrap_or_else(rand::random);
            println!("Generating demo terrain with seed: {}", seed);
            let params = SynthParams {
                size: args.demo_size,
                ..SynthParams::default()
            };
            synth::generate(&params, seed)
        }
    };
    println!("Terrain size: {}x{}", terrain.width(), terrain.height());

    let params = RenderParams::default();
    let start = ViewerState::new(args.x, args.y, args.heading);
    let mut renderer = Renderer::new(terrain, params);

    if let Err(e) = viewer::run_viewer(&mut renderer, start, args.scale, args.fps) {
        eprintln!("Viewer error: {}", e);
        std::process::exit(1);
    }
}
