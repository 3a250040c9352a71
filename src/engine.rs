use glam::{Mat4, Vec2};
use winit::{
    dpi::LogicalSize,
    event::{DeviceEvent, ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowBuilder},
};

use crate::assets::{AssetLoader, FileAssetLoader, MemoryAssets};
use crate::config::OrreryConfig;
use crate::ecs::rendering::{DrawCall, RenderContext};
use crate::game::Game;
use crate::time::{FpsCounter, FrameClock};

/// Pixels of trackpad scroll counted as one wheel unit
const PIXELS_PER_WHEEL_UNIT: f64 = 20.0;

/// Render context of the headless host: counts what a frame would draw
#[derive(Debug, Default)]
pub struct FrameStats {
    pub draws: usize,
    pub sprite_draws: usize,
    pub depth_switches: usize,
}

impl RenderContext for FrameStats {
    fn begin_frame(&mut self, _view: Mat4, _projection: Mat4) {
        *self = Self::default();
    }

    fn set_depth_test(&mut self, _enabled: bool) {
        self.depth_switches += 1;
    }

    fn draw(&mut self, call: &DrawCall) {
        self.draws += 1;
        if call.frame.is_some() {
            self.sprite_draws += 1;
        }
    }
}

pub struct Engine {
    event_loop: EventLoop<()>,
    window: Window,
    config: OrreryConfig,
}

impl Engine {
    pub fn new(config: OrreryConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)?;

        Ok(Self {
            event_loop,
            window,
            config,
        })
    }

    fn grab_cursor(window: &Window) {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
        if let Err(e) = grabbed {
            log::warn!("Could not grab cursor: {e}");
        }
        window.set_cursor_visible(false);
    }

    pub fn run(self) -> anyhow::Result<()> {
        let Self {
            event_loop,
            window,
            config,
        } = self;

        let mut assets: Box<dyn AssetLoader> = match &config.assets.root {
            Some(root) => {
                let loader = FileAssetLoader::new(root);
                log::info!("Loading assets from {}", loader.root().display());
                Box::new(loader)
            }
            None => {
                log::warn!("No asset root configured, using placeholder assets");
                Box::new(MemoryAssets::permissive())
            }
        };
        let mut game = Game::new(&config, assets.as_mut())?;

        Self::grab_cursor(&window);

        let mut clock = FrameClock::new();
        let mut fps = FpsCounter::new();
        let mut stats = FrameStats::default();
        let title = config.window.title.clone();

        event_loop.run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    target.exit();
                }
                Event::WindowEvent {
                    event:
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key_code),
                                    state,
                                    ..
                                },
                            ..
                        },
                    ..
                } => {
                    game.input_mut().key_event(key_code, state == ElementState::Pressed);
                }
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta },
                    ..
                } => {
                    game.input_mut().pointer_moved(Vec2::new(delta.0 as f32, delta.1 as f32));
                }
                Event::WindowEvent {
                    event: WindowEvent::MouseWheel { delta, .. },
                    ..
                } => {
                    let amount = match delta {
                        MouseScrollDelta::LineDelta(_x, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_WHEEL_UNIT) as f32,
                    };
                    game.input_mut().wheel_moved(amount);
                }
                Event::WindowEvent {
                    event: WindowEvent::Resized(size),
                    ..
                } => {
                    if size.height > 0 {
                        game.set_aspect_ratio(size.width as f32 / size.height as f32);
                    }
                }
                Event::WindowEvent {
                    event: WindowEvent::Focused(true),
                    ..
                } => {
                    Self::grab_cursor(&window);
                }
                Event::AboutToWait => {
                    window.request_redraw();
                }
                Event::WindowEvent {
                    event: WindowEvent::RedrawRequested,
                    ..
                } => {
                    let delta_time = clock.tick();
                    game.update(delta_time);
                    game.draw(&mut stats);

                    if let Some(rate) = fps.frame(delta_time) {
                        let tally = game.tally();
                        window.set_title(&format!(
                            "{title} - {rate} FPS - {} destroyed",
                            tally.destroyed
                        ));
                        log::debug!("{rate} FPS, {stats:?}");
                    }

                    if game.exit_requested() {
                        target.exit();
                    }
                }
                Event::LoopExiting => {
                    let tally = game.tally();
                    log::info!(
                        "Shutting down after {:.1}s: {} shots, {} asteroids destroyed, {} consumed",
                        game.time(),
                        tally.shots,
                        tally.destroyed,
                        tally.consumed
                    );
                    if let Some(rate) = fps.fps() {
                        log::info!("Last measured rate: {rate} FPS");
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
