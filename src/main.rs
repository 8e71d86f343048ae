//! Tidewave - procedural ocean animations in a window
//!
//! Layered waves with jumping fish, a depth backdrop with marine snow, a
//! cursor bubble trail and a rotating point-cloud sphere, stacked over the
//! page background. `--record` renders frames to disk instead.

mod cli;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Theme, Window, WindowId},
};

use tidewave::input::{ColorMode, HostEvent};
use tidewave::params::RenderConfig;
use tidewave::recording;
use tidewave::rendering::Presenter;
use tidewave::stage::Stage;

fn theme_mode(theme: Theme) -> ColorMode {
    match theme {
        Theme::Light => ColorMode::Light,
        Theme::Dark => ColorMode::Dark,
    }
}

/// Main application state
struct App {
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    stage: Stage,
    render_config: RenderConfig,
    /// Color mode forced on the command line; otherwise the OS theme wins
    forced_mode: Option<ColorMode>,
    /// First fatal error, reported after the event loop exits
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(stage: Stage, render_config: RenderConfig, forced_mode: Option<ColorMode>) -> Self {
        Self {
            window: None,
            presenter: None,
            stage,
            render_config,
            forced_mode,
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Tidewave")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let presenter = pollster::block_on(Presenter::new(Arc::clone(&window)))
            .context("Failed to initialize GPU presentation")?;

        let size = window.inner_size();
        self.stage.dispatch(HostEvent::Resize {
            width: size.width,
            height: size.height,
        });
        let mode = self
            .forced_mode
            .or_else(|| window.theme().map(theme_mode))
            .unwrap_or_default();
        self.stage.dispatch(HostEvent::ColorMode(mode));
        self.stage.start(Instant::now());

        info!("Window {}x{}, {:?} mode", size.width, size.height, mode);
        info!("Press T to toggle color mode, ESC to quit");

        self.window = Some(window);
        self.presenter = Some(presenter);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.failure.get_or_insert(err);
        self.shutdown(event_loop);
    }

    /// Stop every render loop before the window goes away
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.stage.stop();
        event_loop.exit();
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        let Some(frame) = self.stage.tick(Instant::now()) else {
            return;
        };
        if let Err(e) = presenter.present(frame) {
            self.fail(event_loop, anyhow::Error::new(e).context("Presentation failed"));
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => self.shutdown(event_loop),
                KeyCode::KeyT => {
                    let mode = self.stage.color_mode().toggled();
                    self.stage.dispatch(HostEvent::ColorMode(mode));
                }
                _ => {}
            },
            WindowEvent::Resized(size) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.resize(size.width, size.height);
                }
                self.stage.dispatch(HostEvent::Resize {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.stage.dispatch(HostEvent::PointerMove {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::CursorLeft { .. } => self.stage.dispatch(HostEvent::PointerLeave),
            WindowEvent::ThemeChanged(theme) => {
                debug!("OS theme changed: {:?}", theme);
                self.stage.dispatch(HostEvent::ColorMode(theme_mode(theme)));
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let render_config = args.render_config();
    let mut stage =
        Stage::new(&args.scene_kinds(), &render_config).context("Invalid scene parameters")?;

    if let Some(config) = args.recording_config() {
        if let Some(mode) = args.color_mode() {
            stage.dispatch(HostEvent::ColorMode(mode));
        }
        let written = recording::record(&mut stage, &config).context("Recording failed")?;
        info!("Wrote {} frames to {}", written, config.frames_dir().display());
        return Ok(());
    }

    let mut app = App::new(stage, render_config, args.color_mode());
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
