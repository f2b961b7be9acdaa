//! Opens a window, loads the first engine that works on it and shows a small
//! staircase of blocks. `BLOCK_NGIN_ENGINES=software,wgpu` changes the order
//! engines are tried in.

#[cfg(not(target_arch = "wasm32"))]
mod app {
    use std::sync::Arc;

    use block_ngin::{BlockKey, BlockSettings, Canvas, Engine, EngineConfig, EngineLoader};
    use tokio::runtime::Runtime;
    use winit::{
        application::ApplicationHandler,
        event::WindowEvent,
        event_loop::{ActiveEventLoop, EventLoop},
        window::{Window, WindowId},
    };

    struct App {
        runtime: Runtime,
        config: EngineConfig,
        window: Option<Arc<Window>>,
        engine: Option<Engine>,
    }

    impl App {
        fn blocks() -> Vec<(BlockKey, BlockSettings)> {
            let palette = [[0.9, 0.3, 0.2], [0.3, 0.8, 0.3], [0.2, 0.4, 0.9]];
            (0..9)
                .map(|i| {
                    let key = BlockKey::new(i % 3 - 1, i / 3, -(i / 3));
                    (key, BlockSettings::colored(palette[(i % 3) as usize]))
                })
                .collect()
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }
            let attributes = Window::default_attributes().with_title("block-ngin cubes");
            let window = match event_loop.create_window(attributes) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    log::error!("cannot create window: {e}");
                    event_loop.exit();
                    return;
                }
            };

            let canvas = Canvas::from_window(window.clone());
            let loader = EngineLoader::new(self.config.clone());
            let engine = self.runtime.block_on(async {
                let mut engine = loader.load(&canvas).await?;
                engine.add_blocks(Self::blocks()).await?;
                anyhow::Ok(engine)
            });
            match engine {
                Ok(mut engine) => {
                    log::info!("running on the {} engine", engine.kind());
                    engine.start();
                    self.engine = Some(engine);
                }
                Err(e) => {
                    log::error!("{e:#}");
                    event_loop.exit();
                }
            }
            window.request_redraw();
            self.window = Some(window);
        }

        fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
            if let WindowEvent::CloseRequested = event {
                if let Some(engine) = self.engine.take() {
                    engine.dispose();
                }
                event_loop.exit();
                return;
            }
            let (Some(window), Some(engine)) = (&self.window, &mut self.engine) else {
                return;
            };
            match event {
                WindowEvent::Resized(_) => {
                    engine.resize_if_needed(&Canvas::from_window(window.clone()));
                }
                WindowEvent::RedrawRequested => {
                    if let Err(e) = engine.render_frame() {
                        log::warn!("frame failed: {e}");
                    }
                    window.request_redraw();
                }
                _ => {}
            }
        }
    }

    pub fn run() -> anyhow::Result<()> {
        block_ngin::init_logging();
        let config = EngineConfig::from_env()?;
        let event_loop = EventLoop::new()?;
        let mut app = App {
            runtime: Runtime::new()?,
            config,
            window: None,
            engine: None,
        };
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
