//! Native showcase application: one window, one orbit-controlled scene,
//! records cycled with the bracket keys.
//!
//! Network work (metadata fetch, asset fetch + decode) runs on worker
//! threads and reports back through a channel tagged with the lifecycle
//! ticket, so a result that arrives after disposal or after the user moved
//! on is simply dropped.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use cgmath::Vector3;
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowAttributes},
};

use crate::viewer::api::{CatalogClient, CatalogEntry};
use crate::viewer::asset::{decode_obj, LoadedModel};
use crate::viewer::camera::OrbitCamera;
use crate::viewer::controller::CameraController;
use crate::viewer::error::ViewerError;
use crate::viewer::lifecycle::{LoadTicket, SceneLifecycle, ScenePhase};
use crate::viewer::render::SceneRenderer;

/// Idle turntable rotation, radians per frame.
const AUTO_ROTATE_SPEED: f32 = 0.003;

enum FetchEvent {
    Metadata(LoadTicket, Result<CatalogEntry, ViewerError>),
    Asset(LoadTicket, Result<LoadedModel, ViewerError>),
}

pub struct ViewerApp {
    client: Arc<CatalogClient>,
    records: Vec<CatalogEntry>,
    current: usize,
    lifecycle: SceneLifecycle,
    camera: OrbitCamera,
    controller: CameraController,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    is_fullscreen: bool,
    tx: Sender<FetchEvent>,
    rx: Receiver<FetchEvent>,
}

impl ViewerApp {
    pub fn new(client: Arc<CatalogClient>, records: Vec<CatalogEntry>, start: usize) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            current: start.min(records.len().saturating_sub(1)),
            records,
            lifecycle: SceneLifecycle::new(),
            camera: OrbitCamera::new(5.0, 0.3, 0.4, Vector3::new(0.0, 0.0, 0.0), 1.0),
            controller: CameraController::new(0.005, 0.1),
            window: None,
            renderer: None,
            is_fullscreen: false,
            tx,
            rx,
        }
    }

    /// Runs the event loop until the window closes.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop =
            EventLoop::new().map_err(|e| anyhow::anyhow!("failed to create event loop: {}", e))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self)
            .map_err(|e| anyhow::anyhow!("event loop error: {}", e))?;
        Ok(())
    }

    /// Re-enters the lifecycle for the currently selected record.
    fn enter_current_record(&mut self) {
        let Some(record) = self.records.get(self.current) else {
            return;
        };
        let record_id = record.id.clone();

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.clear_model();
        }

        let ticket = self.lifecycle.begin(&record_id);
        info!("🔍 Loading record {}", record_id);

        let client = self.client.clone();
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = client.get_model(&record_id);
            let _ = tx.send(FetchEvent::Metadata(ticket, result));
        });
    }

    fn step_record(&mut self, step: isize) {
        if self.records.is_empty() {
            return;
        }
        let len = self.records.len() as isize;
        self.current = (self.current as isize + step).rem_euclid(len) as usize;
        self.enter_current_record();
    }

    fn toggle_fullscreen(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.fullscreen().is_some() {
            window.set_fullscreen(None);
        } else {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        // Mirror the window's actual state, not our intent.
        self.is_fullscreen = window.fullscreen().is_some();
        info!("⛶ fullscreen: {}", self.is_fullscreen);
    }

    fn drain_fetch_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                FetchEvent::Metadata(ticket, Ok(entry)) => {
                    if !self.lifecycle.metadata_ready(ticket) {
                        continue;
                    }
                    print_details(&entry);

                    if self.renderer.is_some()
                        && self.lifecycle.mount_scene(ticket)
                        && self.lifecycle.model_loading(ticket)
                    {
                        let client = self.client.clone();
                        let tx = self.tx.clone();
                        let url = entry.file_url.clone();
                        std::thread::spawn(move || {
                            let result = client
                                .fetch_asset(&url)
                                .and_then(|bytes| decode_obj(&bytes));
                            let _ = tx.send(FetchEvent::Asset(ticket, result));
                        });
                    }
                }
                FetchEvent::Metadata(ticket, Err(e)) => {
                    if self.lifecycle.fail(ticket, e.to_string()) {
                        error!("❌ {}", e);
                    }
                }
                FetchEvent::Asset(ticket, Ok(model)) => {
                    if self.lifecycle.model_ready(ticket) {
                        if let Some(renderer) = self.renderer.as_mut() {
                            renderer.upload_model(&model);
                        }
                        self.camera.frame(&model.bounds);
                        info!("✅ Model ready ({} meshes)", model.meshes.len());
                    }
                }
                FetchEvent::Asset(ticket, Err(e)) => {
                    if self.lifecycle.fail(ticket, e.to_string()) {
                        error!("❌ {}", e);
                    }
                }
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("Model Showcase")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) else {
            error!("failed to create window");
            event_loop.exit();
            return;
        };

        let window = Arc::new(window);
        let (width, height) = window.inner_size().into();
        self.camera.resize_projection(width, height);

        let window_clone = window.clone();
        let renderer =
            pollster::block_on(async move { SceneRenderer::new(window_clone, width, height).await });

        self.window = Some(window);
        self.renderer = Some(renderer);

        self.enter_current_record();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                self.controller.process_key_event(&event);
                if event.state == ElementState::Pressed {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Escape) => {
                            self.lifecycle.dispose();
                            event_loop.exit();
                        }
                        PhysicalKey::Code(KeyCode::KeyF) => self.toggle_fullscreen(),
                        PhysicalKey::Code(KeyCode::BracketRight) => self.step_record(1),
                        PhysicalKey::Code(KeyCode::BracketLeft) => self.step_record(-1),
                        _ => (),
                    }
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if self.lifecycle.is_mounted() {
                    self.camera.resize_projection(width, height);
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.resize(width, height);
                    }
                }
            }
            WindowEvent::CloseRequested => {
                self.lifecycle.dispose();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if self.lifecycle.is_render_loop_active() {
                    if *self.lifecycle.phase() == ScenePhase::ModelReady
                        && !self.controller.is_interacting()
                    {
                        self.camera.add_yaw(AUTO_ROTATE_SPEED);
                    }
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.update_camera(self.camera.uniform());
                        renderer.render_frame();
                    }
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        self.controller
            .process_device_event(&event, &mut self.camera);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.drain_fetch_events();
        if self.lifecycle.is_render_loop_active() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

/// Terminal rendition of the showcase details pane.
fn print_details(entry: &CatalogEntry) {
    info!("━━━ {} ({})", entry.model_name, entry.category);
    info!("{}", entry.description);
    if !entry.applications.is_empty() {
        info!("Applications: {}", entry.applications.join(", "));
    }
    if !entry.features.is_empty() {
        info!("Key features: {}", entry.features.join(", "));
    }
    for (key, value) in &entry.specifications {
        info!("  {}: {}", key, value);
    }
}
