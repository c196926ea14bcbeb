/// Interactive terminal host for the turnstage rotation controller
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use nalgebra::Vector3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use turnstage_core::{transform, Camera, Mesh, RotateKey, RotationController, ViewerConfig};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Main application struct for the terminal turntable
pub struct TerminalApp {
    mesh: Mesh,
    controller: RotationController,
    camera: Camera,
    renderer: AsciiRenderer,
    release_reported: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let mut camera = Camera::turntable_view(width as u32, height as u32);
        // Terminal cells are roughly twice as tall as wide
        camera.set_viewport(width as u32, height as u32 * 2);

        Ok(Self {
            mesh,
            controller: RotationController::with_config(
                width as f32,
                config.tuning,
                config.stages,
            ),
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            release_reported: false,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        // Key-release events need the kitty keyboard protocol; fall back to
        // synthesized releases elsewhere.
        self.release_reported = terminal::supports_keyboard_enhancement().unwrap_or(false);
        info!("key release reporting: {}", self.release_reported);

        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        if self.release_reported {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        let result = self.main_loop();

        // Cleanup
        if self.release_reported {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain all input that arrived since the previous frame
            while event::poll(Duration::from_millis(0))? {
                let next = event::read()?;
                self.handle_event(next);
            }

            // Per-frame tick: integrate motion, re-classify the stage
            self.controller.update();

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) => self.handle_key(code, kind),
            Event::Mouse(MouseEvent { kind, column, .. }) => self.handle_mouse(kind, column),
            Event::Resize(width, height) => {
                debug!("resize to {width}x{height}");
                self.controller.set_viewport_width(width as f32);
                self.camera.set_viewport(width as u32, height as u32 * 2);
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, kind: KeyEventKind) {
        let key = match code {
            KeyCode::Left => Some(RotateKey::Left),
            KeyCode::Right => Some(RotateKey::Right),
            _ => None,
        };

        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                _ => {
                    if let Some(key) = key {
                        self.controller.key_down(key);
                        // Without release reporting a held key would never end
                        // its drag session; end it right after the nudge.
                        if !self.release_reported {
                            self.controller.key_up(key);
                        }
                    }
                }
            },
            KeyEventKind::Release => {
                if let Some(key) = key {
                    self.controller.key_up(key);
                }
            }
        }
    }

    fn handle_mouse(&mut self, kind: MouseEventKind, column: u16) {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.controller.drag_start(column as f32);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.controller.drag_move(column as f32);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.controller.drag_end();
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let model = transform::model_matrix(self.controller.angle(), Vector3::new(0.0, -0.3, 0.0));

        self.renderer.clear();
        self.renderer.render_mesh(&self.mesh, &model, &self.camera);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let stage = match self.controller.stage() {
            Some(stage) => stage.0.to_string(),
            None => "-".to_string(),
        };
        let dragging = if self.controller.is_dragging() {
            "dragging"
        } else {
            "coasting"
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Turnstage | FPS: {:.1} | angle {:+.2} (norm {:.2}) | stage {} | {} | Drag mouse or \u{2190}/\u{2192}, Q quits",
                self.fps,
                self.controller.angle(),
                self.controller.normalized_angle(),
                stage,
                dragging,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
