/// Depth-buffered ASCII rasterizer for the terminal host
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;
use turnstage_core::{Camera, Mesh, Triangle};

/// Shading ramp from unlit to fully lit
const SHADE_RAMP: &[char] = &[' ', '.', ',', ':', ';', '=', 'o', 'O', '8', '@'];

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    depth: f32,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        depth: f32::INFINITY,
    };
}

/// Converts projected triangles into a grid of shaded characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    light_dir: Vector3<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
            // Keyed off-axis so rotation visibly changes facet shading
            light_dir: Vector3::new(0.4, 0.7, 0.6).normalize(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::EMPTY; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model_matrix: &Matrix4<f32>, camera: &Camera) {
        let mut projected = [(0.0f32, 0.0f32, 0.0f32); 3];
        for (slot, vertex) in projected.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // clipped
            }
        }

        // Rotate the winding normal with the model so shading tracks the spin
        let world_normal = model_matrix
            .transform_vector(&triangle.face_normal())
            .normalize();
        let brightness = world_normal.dot(&self.light_dir).max(0.0);
        let shade = (brightness * (SHADE_RAMP.len() - 1) as f32).round() as usize;
        let glyph = SHADE_RAMP[shade.min(SHADE_RAMP.len() - 1)];

        self.fill_triangle(&projected, glyph);
    }

    fn fill_triangle(&mut self, corners: &[(f32, f32, f32); 3], glyph: char) {
        let [a, b, c] = corners;
        let denom = (b.1 - c.1) * (a.0 - c.0) + (c.0 - b.0) * (a.1 - c.1);
        if denom.abs() < 1e-6 {
            return; // degenerate in screen space
        }

        let min_x = (a.0.min(b.0).min(c.0).floor() as i32).max(0);
        let max_x = (a.0.max(b.0).max(c.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (a.1.min(b.1).min(c.1).floor() as i32).max(0);
        let max_y = (a.1.max(b.1).max(c.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let w0 = ((b.1 - c.1) * (px - c.0) + (c.0 - b.0) * (py - c.1)) / denom;
                let w1 = ((c.1 - a.1) * (px - c.0) + (a.0 - c.0) * (py - c.1)) / denom;
                let w2 = 1.0 - w0 - w1;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * a.2 + w1 * b.2 + w2 * c.2;
                let cell = &mut self.cells[y as usize * self.width + x as usize];
                if depth < cell.depth {
                    *cell = Cell { glyph, depth };
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                writer.queue(SetForegroundColor(glyph_color(cell.glyph)))?;
                writer.queue(Print(cell.glyph))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn glyph_color(glyph: char) -> Color {
    match glyph {
        ' ' | '.' | ',' => Color::DarkGrey,
        ':' | ';' | '=' => Color::Grey,
        'o' | 'O' => Color::White,
        _ => Color::Cyan,
    }
}
