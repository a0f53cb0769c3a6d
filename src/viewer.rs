//! Windowed fly-through viewer.
//!
//! Platform glue only: opens a minifb window at an integer upscale of the
//! logical render resolution, then loops render → present → advance until
//! the window closes or Escape is pressed. All timing lives here; the
//! renderer itself never paces or blocks.

use minifb::{Key, Window, WindowOptions};

use crate::render::{Renderer, ViewerState};

/// Run the fly-through loop. Returns when the window is closed.
pub fn run_viewer(
    renderer: &mut Renderer,
    start: ViewerState,
    scale: usize,
    fps: usize,
) -> Result<(), minifb::Error> {
    let scale = scale.max(1);
    let logical_width = renderer.params().screen_width;
    let logical_height = renderer.params().screen_height;
    let window_width = logical_width * scale;
    let window_height = logical_height * scale;

    let mut window = Window::new(
        "Voxel Space - Esc: Exit",
        window_width,
        window_height,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(fps);

    let params = renderer.params().clone();
    let mut view = start;
    let mut window_buffer = vec![0u32; window_width * window_height];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let frame = renderer.render_frame(&view);

        if scale == 1 {
            window.update_with_buffer(frame.data(), window_width, window_height)?;
        } else {
            blit_scaled(frame.data(), logical_width, scale, &mut window_buffer, window_width);
            window.update_with_buffer(&window_buffer, window_width, window_height)?;
        }

        view = view.advanced(&params);
    }

    Ok(())
}

/// Nearest-neighbor upscale of the logical frame into the window buffer.
fn blit_scaled(frame: &[u32], frame_width: usize, scale: usize, out: &mut [u32], out_width: usize) {
    for (idx, &pixel) in frame.iter().enumerate() {
        let fx = idx % frame_width;
        let fy = idx / frame_width;
        for sy in 0..scale {
            let row = (fy * scale + sy) * out_width + fx * scale;
            out[row..row + scale].fill(pixel);
        }
    }
}
