/// Terminal host for the showroom scene, drawn as colored ASCII
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use vitrine_core::{props, AnimationController, InputEvent, RenderError, Scene, SceneConfig};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Pointer travel, in cells, applied per arrow key press
const ARROW_STEP: f32 = 20.0;

/// Wheel delta applied per `+`/`-` press
const ZOOM_STEP: f32 = 100.0;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Scene<AsciiRenderer>,
    animation: AnimationController,
    clock: Instant,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &SceneConfig) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        Self::with_size(config, columns, rows).map_err(io::Error::other)
    }

    /// Build the showroom for a `columns x rows` terminal.
    pub fn with_size(config: &SceneConfig, columns: u16, rows: u16) -> Result<Self, RenderError> {
        let (width, height) = viewport(columns, rows);
        let mut scene = Scene::new(AsciiRenderer::new(1, 1), config, width, height);
        let placed = props::populate(&mut scene)?;

        Ok(Self {
            scene,
            animation: AnimationController::from_config(placed.bottle, &config.animation),
            clock: Instant::now(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn scene(&self) -> &Scene<AsciiRenderer> {
        &self.scene
    }

    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Drain every pending event before drawing
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.update();
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

    /// Milliseconds since the app started.
    fn now(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(columns, rows) => {
                let (width, height) = viewport(columns, rows);
                self.scene.handle_input(InputEvent::Resize { width, height });
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(' ') => {
                let now = self.now();
                self.animation.toggle(now);
            }
            KeyCode::Left => self.drag_by(-ARROW_STEP, 0.0),
            KeyCode::Right => self.drag_by(ARROW_STEP, 0.0),
            KeyCode::Up => self.drag_by(0.0, -ARROW_STEP),
            KeyCode::Down => self.drag_by(0.0, ARROW_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom_by(-ZOOM_STEP),
            KeyCode::Char('-') => self.zoom_by(ZOOM_STEP),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column as f32, mouse.row as f32 * 2.0);
        let input = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => InputEvent::PointerDown { x, y },
            MouseEventKind::Up(MouseButton::Left) => InputEvent::PointerUp,
            MouseEventKind::Drag(MouseButton::Left) => InputEvent::PointerMove { x, y },
            MouseEventKind::ScrollDown => InputEvent::Wheel { delta_y: ZOOM_STEP },
            MouseEventKind::ScrollUp => InputEvent::Wheel {
                delta_y: -ZOOM_STEP,
            },
            _ => return,
        };
        self.scene.handle_input(input);
    }

    /// A complete press-move-release drag.
    fn drag_by(&mut self, dx: f32, dy: f32) {
        self.scene
            .handle_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        self.scene
            .handle_input(InputEvent::PointerMove { x: dx, y: dy });
        self.scene.handle_input(InputEvent::PointerUp);
    }

    fn zoom_by(&mut self, delta_y: f32) {
        self.scene.handle_input(InputEvent::Wheel { delta_y });
    }

    fn update(&mut self) {
        let now = self.now();
        if self.animation.is_running() {
            self.scene.tick_animation(&mut self.animation, now);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.scene.render_frame();

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.scene.backend().draw(&mut stdout)?;

        // Draw UI overlay
        let status = if self.animation.is_running() {
            "Space=Stop"
        } else {
            "Space=Start Animation"
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Vitrine | FPS: {:.1} | Drag/Arrows=Orbit +/-/Wheel=Zoom {} Q=Quit",
                self.fps, status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Viewport for a terminal of `columns x rows` cells, in half-cell units.
fn viewport(columns: u16, rows: u16) -> (u32, u32) {
    (u32::from(columns), u32::from(rows) * 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use vitrine_core::AnimationPhase;

    fn app() -> TerminalApp {
        TerminalApp::with_size(&SceneConfig::default(), 80, 24).unwrap()
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_new_app_places_showroom() {
        let app = app();
        assert_eq!(app.scene().meshes().len(), 3);
        assert_eq!(app.scene().viewport(), (80, 48));
        assert_eq!(app.scene().backend().size(), (80, 24));
        assert_eq!(app.animation().phase(), AnimationPhase::Idle);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_event(press(KeyCode::Char('x')));
        assert!(app.is_running());
        app.handle_event(press(KeyCode::Esc));
        assert!(!app.is_running());
    }

    #[test]
    fn test_space_toggles_animation() {
        let mut app = app();
        app.handle_event(press(KeyCode::Char(' ')));
        assert!(app.animation().is_running());
        app.handle_event(press(KeyCode::Char(' ')));
        assert_eq!(app.animation().phase(), AnimationPhase::Idle);
    }

    #[test]
    fn test_arrows_orbit_and_keys_zoom() {
        let mut app = app();
        let yaw = app.scene().camera().yaw();
        let radius = app.scene().camera().radius();

        app.handle_event(press(KeyCode::Right));
        assert!(app.scene().camera().yaw() > yaw);

        app.handle_event(press(KeyCode::Char('-')));
        assert!(app.scene().camera().radius() > radius);
    }

    #[test]
    fn test_resize_event() {
        let mut app = app();
        app.handle_event(Event::Resize(120, 40));
        assert_eq!(app.scene().viewport(), (120, 80));
        assert_eq!(app.scene().backend().size(), (120, 40));
    }
}
