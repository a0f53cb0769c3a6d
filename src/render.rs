//! Voxel-space terrain rendering.
//!
//! The classic Comanche projection: for every screen column, march a ray
//! outward from the viewer in depth-ascending order, project each terrain
//! sample to a screen row, and paint a vertical span from that row down to
//! the lowest row not yet covered. Because depth only increases, nearer
//! terrain always paints first and the per-column frontier gives correct
//! occlusion with no geometry and no depth buffer.

use crate::framebuffer::Framebuffer;
use crate::terrain::{Rgb, TerrainMaps};

/// Tunable constants of the projection, fog, and fly-through drift.
///
/// Defaults reproduce the reference behavior exactly, including the
/// asymmetric field of view (the sweep covers heading − 0.5 rad to
/// heading + 1.0 rad; inherited, kept deliberately).
#[derive(Clone, Debug)]
pub struct RenderParams {
    /// Logical framebuffer width in pixels
    pub screen_width: usize,
    /// Logical framebuffer height in pixels
    pub screen_height: usize,
    /// Angular offset of the leftmost column, radians relative to heading
    pub fov_start: f64,
    /// Angular offset one past the rightmost column, radians
    pub fov_end: f64,
    /// First depth sampled along each ray, world units
    pub min_depth: u32,
    /// One past the last depth sampled
    pub max_depth: u32,
    /// Perspective scale factor applied to projected heights
    pub projection_scale: f64,
    /// Elevation that projects to the horizon
    pub horizon: f64,
    /// Depth at which fog starts to blend in
    pub fog_start: f64,
    /// Depth range over which fog ramps from none to full
    pub fog_range: f64,
    /// Background and fog convergence color
    pub sky_color: Rgb,
    /// Forward drift per frame, world units
    pub speed: f64,
    /// Heading change per frame, radians
    pub angular_step: f64,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            screen_width: 400,
            screen_height: 300,
            fov_start: -0.5,
            fov_end: 1.0,
            min_depth: 10,
            max_depth: 600,
            projection_scale: 120.0,
            horizon: 300.0,
            fog_start: 100.0,
            fog_range: 500.0,
            sky_color: [150, 170, 170],
            speed: 2.0,
            angular_step: 0.01,
        }
    }
}

/// Where the viewer stands and which way it faces. Never mutated by
/// rendering; the animation driver advances it explicitly between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerState {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl ViewerState {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// The next frame's viewer state: drift forward along the heading and
    /// keep turning. The automatic fly-through of the original.
    pub fn advanced(&self, params: &RenderParams) -> Self {
        Self {
            x: self.x + params.speed * self.heading.cos(),
            y: self.y + params.speed * self.heading.sin(),
            heading: self.heading + params.angular_step,
        }
    }
}

/// Blend a terrain color toward the sky with distance. No fog up to
/// `fog_start`, then a linear ramp over `fog_range`, clamped so that deep
/// samples converge on the sky color instead of overshooting it.
pub fn apply_fog(color: Rgb, depth: u32, params: &RenderParams) -> Rgb {
    let depth = depth as f64;
    if depth <= params.fog_start {
        return color;
    }
    let p = ((depth - params.fog_start) / params.fog_range).clamp(0.0, 1.0);
    let blend = |c: u8, sky: u8| (c as f64 + (sky as f64 - c as f64) * p) as u8;
    [
        blend(color[0], params.sky_color[0]),
        blend(color[1], params.sky_color[1]),
        blend(color[2], params.sky_color[2]),
    ]
}

/// One paint command: color rows `top..=bottom` of the current column.
///
/// `top` is the raw projected row and may be negative (terrain rising past
/// the top of the screen); the framebuffer clamps when painting. `bottom`
/// is the occlusion frontier the span abuts, painted inclusively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub top: i64,
    pub bottom: i64,
    pub color: Rgb,
}

/// Lazy depth-ascending sweep of a single screen column, yielding the paint
/// spans for every visible terrain sample along the column's ray.
///
/// The frontier starts at the full screen height and only ever moves up;
/// samples projecting at or below it are occluded by nearer terrain and are
/// skipped, as are samples that fall outside the terrain rasters.
pub struct ColumnSweep<'a> {
    terrain: &'a TerrainMaps,
    params: &'a RenderParams,
    origin_x: f64,
    origin_y: f64,
    dir_x: f64,
    dir_y: f64,
    depth: u32,
    frontier: i64,
}

impl<'a> ColumnSweep<'a> {
    pub fn new(
        terrain: &'a TerrainMaps,
        params: &'a RenderParams,
        view: &ViewerState,
        column: usize,
    ) -> Self {
        let fov = params.fov_end - params.fov_start;
        let angle = params.fov_start + column as f64 * fov / params.screen_width as f64;
        let ray = view.heading + angle;
        Self {
            terrain,
            params,
            origin_x: view.x,
            origin_y: view.y,
            dir_x: ray.cos(),
            dir_y: ray.sin(),
            depth: params.min_depth,
            frontier: params.screen_height as i64,
        }
    }
}

impl Iterator for ColumnSweep<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        while self.depth < self.params.max_depth {
            let depth = self.depth;
            self.depth += 1;

            let world_x = (self.origin_x + depth as f64 * self.dir_x) as i64;
            let world_y = (self.origin_y + depth as f64 * self.dir_y) as i64;
            let Some(height) = self.terrain.sample_height(world_x, world_y) else {
                continue;
            };
            let Some(color) = self.terrain.sample_color(world_x, world_y) else {
                continue;
            };

            // Inverse-depth projection: near and high terrain projects tall,
            // distant terrain compresses toward the horizon.
            let screen_y = (self.params.projection_scale * (self.params.horizon - height as f64)
                / depth as f64) as i64;
            if screen_y >= self.frontier {
                continue;
            }

            let span = Span {
                top: screen_y,
                bottom: self.frontier,
                color: apply_fog(color, depth, self.params),
            };
            self.frontier = screen_y;
            return Some(span);
        }
        None
    }
}

/// Owns the terrain, the render constants, and the output frame.
pub struct Renderer {
    terrain: TerrainMaps,
    params: RenderParams,
    frame: Framebuffer,
}

impl Renderer {
    pub fn new(terrain: TerrainMaps, params: RenderParams) -> Self {
        let frame = Framebuffer::new(params.screen_width, params.screen_height);
        Self {
            terrain,
            params,
            frame,
        }
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// The sweep for one column, restartable from any viewer state.
    pub fn column_sweep<'a>(&'a self, view: &ViewerState, column: usize) -> ColumnSweep<'a> {
        ColumnSweep::new(&self.terrain, &self.params, view, column)
    }

    /// Render one complete frame from the given viewer state. Always total:
    /// fixed column count times fixed depth walk, no failure path.
    pub fn render_frame(&mut self, view: &ViewerState) -> &Framebuffer {
        self.frame.clear(self.params.sky_color);
        for column in 0..self.params.screen_width {
            let sweep = ColumnSweep::new(&self.terrain, &self.params, view, column);
            for span in sweep {
                self.frame.fill_column(column, span.top, span.bottom, span.color);
            }
        }
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::Tilemap;

    const RED: Rgb = [255, 0, 0];
    const BLUE: Rgb = [0, 0, 255];

    /// Params with fog pushed past any reachable depth, so colors pass
    /// through the sweep untouched.
    fn fogless_params() -> RenderParams {
        RenderParams {
            fog_start: f64::INFINITY,
            ..RenderParams::default()
        }
    }

    /// A large flat map: all heights zero, all cells red, viewer-centered.
    fn flat_red_terrain() -> (TerrainMaps, ViewerState) {
        let heights = Tilemap::new_with(2048, 2048, 0u8);
        let colors = Tilemap::new_with(2048, 2048, RED);
        let terrain = TerrainMaps::new(heights, colors).unwrap();
        (terrain, ViewerState::new(1024.0, 1024.0, 0.0))
    }

    #[test]
    fn test_frontier_monotonic_within_column() {
        let (terrain, view) = flat_red_terrain();
        let params = fogless_params();
        let renderer = Renderer::new(terrain, params.clone());

        for column in [0, 137, 399] {
            let spans: Vec<Span> = renderer.column_sweep(&view, column).collect();
            assert!(!spans.is_empty());
            assert_eq!(spans[0].bottom, params.screen_height as i64);
            for pair in spans.windows(2) {
                // Each span abuts the previous frontier and raises it
                assert_eq!(pair[1].bottom, pair[0].top);
                assert!(pair[1].top < pair[0].top);
            }
        }
    }

    #[test]
    fn test_fog_is_identity_up_to_knee() {
        let params = RenderParams::default();
        let color = [200, 30, 90];
        for depth in [0, 1, 50, 99, 100] {
            assert_eq!(apply_fog(color, depth, &params), color);
        }
        assert_ne!(apply_fog(color, 101, &params), color);
    }

    #[test]
    fn test_fog_channels_stay_between_color_and_sky() {
        let params = RenderParams::default();
        let color = [255, 0, 90];
        for depth in [101, 200, 350, 599, 600] {
            let fogged = apply_fog(color, depth, &params);
            for i in 0..3 {
                let lo = color[i].min(params.sky_color[i]);
                let hi = color[i].max(params.sky_color[i]);
                assert!(fogged[i] >= lo && fogged[i] <= hi);
            }
        }
    }

    #[test]
    fn test_fog_clamps_at_extreme_depth() {
        // Beyond fog_start + fog_range the ramp would exceed 1 unclamped;
        // clamped, it converges exactly on the sky color.
        let params = RenderParams::default();
        assert_eq!(apply_fog([255, 0, 0], 10_000, &params), params.sky_color);
    }

    #[test]
    fn test_render_is_idempotent_without_advance() {
        let (terrain, view) = flat_red_terrain();
        let mut renderer = Renderer::new(terrain, RenderParams::default());
        let first = renderer.render_frame(&view).clone();
        let second = renderer.render_frame(&view).clone();
        assert!(first == second);
    }

    #[test]
    fn test_flat_terrain_paints_one_red_span_per_column() {
        let (terrain, view) = flat_red_terrain();
        let params = fogless_params();
        let mut renderer = Renderer::new(terrain, params.clone());
        let frame = renderer.render_frame(&view);

        // Deepest sampled depth is max_depth - 1; on flat zero terrain the
        // farthest sample projects highest, so it sets each column's top row.
        let deepest = (params.max_depth - 1) as f64;
        let top = (params.projection_scale * params.horizon / deepest) as usize;

        for x in 0..params.screen_width {
            for y in 0..top {
                assert_eq!(frame.pixel(x, y), params.sky_color);
            }
            for y in top..params.screen_height {
                assert_eq!(frame.pixel(x, y), RED);
            }
        }
    }

    #[test]
    fn test_near_wall_occludes_far_terrain() {
        // A full-height red wall within 150 units of the viewer; blue ground
        // at height zero beyond it. The wall's frontier sits above anything
        // the far ground can project to, so no blue may appear.
        let mut heights = Tilemap::new_with(2048, 2048, 0u8);
        let mut colors = Tilemap::new_with(2048, 2048, BLUE);
        for y in 0..2048 {
            for x in 0..2048 {
                let dx = x as f64 - 1024.0;
                let dy = y as f64 - 1024.0;
                if (dx * dx + dy * dy).sqrt() <= 150.0 {
                    heights.set(x, y, 255);
                    colors.set(x, y, RED);
                }
            }
        }
        let terrain = TerrainMaps::new(heights, colors).unwrap();
        let view = ViewerState::new(1024.0, 1024.0, 0.0);
        let params = fogless_params();

        for column in [0, 200, 399] {
            for span in ColumnSweep::new(&terrain, &params, &view, column) {
                assert_eq!(span.color, RED);
            }
        }

        let mut renderer = Renderer::new(terrain, params.clone());
        let frame = renderer.render_frame(&view);
        for x in 0..params.screen_width {
            for y in 0..params.screen_height {
                assert_ne!(frame.pixel(x, y), BLUE);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_rays_leave_sky_untouched() {
        // Tiny map, default min_depth: every sampled depth misses the map,
        // so the frame stays pure sky.
        let heights = Tilemap::new_with(4, 4, 0u8);
        let colors = Tilemap::new_with(4, 4, RED);
        let terrain = TerrainMaps::new(heights, colors).unwrap();
        let view = ViewerState::new(2.0, 2.0, 0.0);
        let params = RenderParams::default();
        let mut renderer = Renderer::new(terrain, params.clone());
        let frame = renderer.render_frame(&view);
        for x in 0..params.screen_width {
            for y in 0..params.screen_height {
                assert_eq!(frame.pixel(x, y), params.sky_color);
            }
        }
    }

    #[test]
    fn test_advance_moves_by_speed_and_turns_by_step() {
        let params = RenderParams::default();
        let view = ViewerState::new(5.0, 7.0, 0.0);
        let next = view.advanced(&params);
        assert_eq!(next.x, 5.0 + params.speed);
        assert_eq!(next.y, 7.0);
        assert_eq!(next.heading, params.angular_step);
    }
}
