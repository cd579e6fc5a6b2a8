//! Pet Pool entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use pet_pool::Tuning;
    use pet_pool::input::{AimGesture, screen_to_table};
    use pet_pool::renderer::{RenderState, build_frame, hud_entries};
    use pet_pool::sim::{LoopControl, SimLoop, Snapshot};

    /// Everything the page needs between animation frames
    struct App {
        sim: SimLoop,
        tuning: Tuning,
        render_state: Option<RenderState>,
        aim: AimGesture,
        /// Last snapshot published by the loop
        latest: Rc<RefCell<Snapshot>>,
        /// Pending `requestAnimationFrame` handle
        raf_id: Option<i32>,
        canvas: HtmlCanvasElement,
    }

    impl App {
        fn table_size(&self) -> Vec2 {
            let table = self.sim.session().table;
            Vec2::new(table.width, table.height)
        }

        /// Canvas CSS pixels to table units
        fn to_table(&self, x: f32, y: f32) -> Vec2 {
            let canvas = Vec2::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            );
            screen_to_table(Vec2::new(x, y), canvas, self.table_size())
        }

        fn begin_aim(&mut self, p: Vec2) {
            // No aiming while balls are still rolling
            if self.latest.borrow().moving {
                return;
            }
            self.aim.begin(p);
        }

        fn release_aim(&mut self) {
            let Some(shot) = self.aim.release(&self.tuning) else {
                return;
            };
            if self.sim.shoot(shot.power, shot.angle) {
                log::debug!("Shot power {:.2} angle {:.3}", shot.power, shot.angle);
            }
        }

        fn rerack(&mut self) {
            self.aim.cancel();
            self.sim.init_rack();
            log::info!("Table re-racked");
        }

        /// Run one animation frame; returns whether another is needed
        fn frame(&mut self, now_ms: f64) -> bool {
            let control = if self.sim.is_running() {
                self.sim.frame(now_ms)
            } else {
                LoopControl::Stop
            };
            self.render();
            control == LoopControl::Continue || self.aim.is_active()
        }

        fn render(&mut self) {
            let vertices = {
                let latest = self.latest.borrow();
                build_frame(&self.sim.session().table, &latest, &self.aim, &self.tuning)
            };

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Page is going away: stop scheduling and drop pending timers
        fn teardown(&mut self) {
            if let (Some(id), Some(window)) = (self.raf_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            self.aim.cancel();
            self.sim.shutdown();
        }
    }

    /// Write score and balls remaining into the HUD
    fn update_hud(snapshot: &Snapshot) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for (id, text) in hud_entries(snapshot) {
            if let Some(el) = document.get_element_by_id(id) {
                el.set_text_content(Some(&text));
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Pet Pool starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        // Backing store in device pixels
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::load();
        let mut sim = SimLoop::new(tuning);
        let table = tuning.table();
        log::info!(
            "Table {}x{} cushion {}, {} balls racked",
            table.width,
            table.height,
            table.cushion,
            sim.session().balls.len()
        );

        let latest = Rc::new(RefCell::new(sim.snapshot()));
        {
            let latest = latest.clone();
            sim.subscribe(move |snapshot| {
                update_hud(snapshot);
                *latest.borrow_mut() = snapshot.clone();
            });
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            Vec2::new(table.width, table.height),
        )
        .await
        .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;

        let app = Rc::new(RefCell::new(App {
            sim,
            tuning,
            render_state: Some(render_state),
            aim: AimGesture::default(),
            latest,
            raf_id: None,
            canvas: canvas.clone(),
        }));

        setup_mouse_handlers(&canvas, app.clone());
        setup_touch_handlers(&canvas, app.clone());
        setup_keyboard(app.clone());
        setup_teardown(app.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // First frame publishes the rack and lets the loop go idle
        request_frame(&app);

        log::info!("Pet Pool running!");
        Ok(())
    }

    fn setup_mouse_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Press: start the pull-back
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                {
                    let mut a = app.borrow_mut();
                    let p = a.to_table(event.offset_x() as f32, event.offset_y() as f32);
                    a.begin_aim(p);
                }
                request_frame(&app);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                if a.aim.is_active() {
                    let p = a.to_table(event.offset_x() as f32, event.offset_y() as f32);
                    a.aim.update(p);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release: shoot
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().release_aim();
                request_frame(&app);
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaving the canvas abandons the drag
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().aim.cancel();
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// First touch point in canvas CSS pixels
    fn touch_position(event: &TouchEvent, canvas: &HtmlCanvasElement) -> Option<(f32, f32)> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some((
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    fn setup_touch_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Touch start
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_position(&event, &canvas_clone) {
                    let mut a = app.borrow_mut();
                    let p = a.to_table(x, y);
                    a.begin_aim(p);
                }
                request_frame(&app);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some((x, y)) = touch_position(&event, &canvas_clone) {
                    let mut a = app.borrow_mut();
                    let p = a.to_table(x, y);
                    a.aim.update(p);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end shoots from the last move position
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().release_aim();
                request_frame(&app);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().aim.cancel();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match event.key().as_str() {
                "r" | "R" => app.borrow_mut().rerack(),
                "Escape" => app.borrow_mut().aim.cancel(),
                _ => return,
            }
            request_frame(&app);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_teardown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().teardown();
            log::info!("Page hidden, frame loop stopped");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule the next animation frame unless one is already pending
    fn request_frame(app: &Rc<RefCell<App>>) {
        if app.borrow().raf_id.is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };

        let app_clone = app.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app_clone, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => app.borrow_mut().raf_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        let again = {
            let mut a = app.borrow_mut();
            a.raf_id = None;
            a.frame(time)
        };

        if again {
            request_frame(&app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pet Pool (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless_break();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Break straight up the table and report how it settles
#[cfg(not(target_arch = "wasm32"))]
fn headless_break() {
    use pet_pool::Tuning;
    use pet_pool::consts::FRAME_MS;
    use pet_pool::sim::{LoopControl, SimLoop};
    use std::f32::consts::FRAC_PI_2;

    const MAX_FRAMES: u64 = 60 * 120;

    let mut sim = SimLoop::new(Tuning::load());
    // Slightly off-centre so the break is not perfectly symmetric
    sim.shoot(1.0, -FRAC_PI_2 + 0.01);

    let mut now_ms = 0.0;
    while sim.frame(now_ms) == LoopControl::Continue && sim.frames() < MAX_FRAMES {
        now_ms += FRAME_MS;
    }

    let snapshot = sim.snapshot();
    println!(
        "Break settled after {} frames: score {}, {} object balls left",
        sim.frames(),
        snapshot.score,
        snapshot.remaining()
    );
}
