//! Magnet Quest entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, KeyboardEvent,
        PointerEvent,
    };

    use magnet_quest::audio::{AudioManager, SoundEffect};
    use magnet_quest::renderer::{RenderState, Scene};
    use magnet_quest::settings::OPTION_NAMES;
    use magnet_quest::sim::{Polarity, Tier};
    use magnet_quest::{Phase, Session, SessionEvent, Settings};

    /// Bounces slower than this (px/frame) stay silent
    const THUD_MIN_SPEED: f32 = 1.5;

    /// Game instance holding all state
    struct Game {
        session: Session,
        scene: Scene,
        settings: Settings,
        render_state: Option<RenderState>,
        audio: AudioManager,
        /// Countdown interval handle; `None` while the clock is stopped
        timer_handle: Option<i32>,
        timer_callback: Option<Closure<dyn FnMut()>>,
    }

    impl Game {
        fn new(width: f32, height: f32, seed: u64) -> Self {
            let settings = Settings::load();
            let mut session = Session::new(width, height, seed);
            session.apply_settings(&settings);
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                session,
                scene: Scene::new(&settings),
                settings,
                render_state: None,
                audio,
                timer_handle: None,
                timer_callback: None,
            }
        }

        /// Start the one second countdown interval (no-op if running)
        fn start_timer(&mut self) {
            if self.timer_handle.is_some() {
                return;
            }
            let (Some(window), Some(callback)) = (web_sys::window(), &self.timer_callback) else {
                return;
            };
            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                1000,
            ) {
                Ok(handle) => self.timer_handle = Some(handle),
                Err(e) => log::warn!("Failed to start countdown: {:?}", e),
            }
        }

        /// Stop the countdown interval. Safe to call repeatedly.
        fn stop_timer(&mut self) {
            if let (Some(handle), Some(window)) = (self.timer_handle.take(), web_sys::window()) {
                window.clear_interval_with_handle(handle);
            }
        }

        /// Keep the interval in step with the round phase
        fn sync_timer(&mut self) {
            if self.session.phase() == Phase::Running {
                self.start_timer();
            } else {
                self.stop_timer();
            }
        }

        fn on_timer_second(&mut self) {
            self.session.on_timer_second(js_sys::Date::now());
            self.dispatch_events();
            self.sync_timer();
        }

        /// Apply a control change everywhere and persist it
        fn change_setting(&mut self, name: &str, value: &str) {
            if !self.settings.set_option(name, value) {
                log::warn!("Ignoring setting {}={}", name, value);
                return;
            }
            self.session.apply_settings(&self.settings);
            self.scene.apply_settings(&self.settings);
            self.audio.apply_settings(&self.settings);
            self.settings.save();
        }

        /// Physics, then render
        fn frame(&mut self) {
            if let Some(outcome) = self.session.frame() {
                if outcome.wall_hit && self.session.sim.mover.vel.length() > THUD_MIN_SPEED {
                    self.audio.play(SoundEffect::Thud);
                }
            }
            self.dispatch_events();

            let vertices = self.scene.build(&self.session.sim);
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
            self.update_hud();
        }

        /// Route session notifications to audio and DOM
        fn dispatch_events(&mut self) {
            for event in self.session.drain_events() {
                match event {
                    SessionEvent::AttractionChanged(active) => self.audio.set_hum(active),
                    SessionEvent::Win => self.audio.play(SoundEffect::Goal),
                    SessionEvent::RoundEnded { .. } => {
                        self.audio.play(SoundEffect::TimeUp);
                        render_history(&self.session);
                    }
                    SessionEvent::ScoreChanged(score) => {
                        set_text("score", &score.to_string());
                    }
                    SessionEvent::TimeLeftChanged(secs) => {
                        set_text("time", &secs.to_string());
                    }
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else { return };

            if let Some(el) = document.get_element_by_id("polarity") {
                let (text, class) = match self.session.sim.magnet.polarity {
                    Polarity::North => ("NORTH", "north"),
                    Polarity::South => ("SOUTH", "south"),
                };
                el.set_text_content(Some(text));
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("pauseBtn") {
                let label = if self.session.phase() == Phase::Paused {
                    "Resume"
                } else {
                    "Pause"
                };
                el.set_text_content(Some(label));
            }

            if let Some(el) = document.get_element_by_id("time-up") {
                let class = if self.session.banner_visible(js_sys::Date::now()) {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.session.resize(width as f32, height as f32);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    /// Rebuild the score history list, newest first
    fn render_history(session: &Session) {
        let Some(document) = document() else { return };
        let Some(list) = document.get_element_by_id("score-history") else {
            return;
        };
        list.set_inner_html("");
        for label in session.history().labels() {
            if let Ok(p) = document.create_element("p") {
                p.set_text_content(Some(&label));
                let _ = list.append_child(&p);
            }
        }
    }

    /// Canvas size in device pixels, constrained like the page layout
    fn canvas_size(window: &web_sys::Window) -> (u32, u32) {
        let inner_w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let inner_h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        let max_w = (inner_w * 0.94).min(1600.0);
        let max_h = (inner_h * 0.84).min(1200.0);
        let width = ((max_w - 40.0).floor()).max(300.0) as u32;
        let height = ((max_h - 20.0).floor()).max(200.0) as u32;
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Magnet Quest starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("Canvas element #gameCanvas not found");
            return;
        };

        let (width, height) = canvas_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(width as f32, height as f32, seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Countdown callback lives for the page lifetime
        {
            let timer_game = game.clone();
            let callback = Closure::<dyn FnMut()>::new(move || {
                timer_game.borrow_mut().on_timer_second();
            });
            game.borrow_mut().timer_callback = Some(callback);
        }

        // WebGPU is optional; without it the game still runs headless
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::default(),
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(rs) => game.borrow_mut().render_state = Some(rs),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_tier_selector(game.clone());
        setup_settings_controls(game.clone());
        setup_resize(canvas.clone(), game.clone());

        request_animation_frame(game);

        log::info!("Magnet Quest running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Pointer move (document-wide so drags can leave the canvas)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                game.borrow_mut().session.pointer_move(x, y);
            });
            let _ = window
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down on the canvas grabs the magnet
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.button() != 0 {
                    return;
                }
                event.prevent_default();
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                let mut g = game.borrow_mut();
                g.session.pointer_move(x, y);
                g.session.set_pointer_down(true);
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up anywhere releases it
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().session.set_pointer_down(false);
            });
            let _ = window
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space flips polarity
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    if g.session.flip_polarity() {
                        g.audio.play(SoundEffect::Flip);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch-only polarity button
        if let Some(btn) = document().and_then(|d| d.get_element_by_id("mobilePolarityBtn")) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.session.flip_polarity() {
                    g.audio.play(SoundEffect::Flip);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click<F>(id: &str, mut handler: F)
    where
        F: FnMut() + 'static,
    {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::warn!("Button #{} not found", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("startBtn", move || {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.session.start();
                g.dispatch_events();
                g.sync_timer();
            });
        }
        {
            let game = game.clone();
            on_click("pauseBtn", move || {
                let mut g = game.borrow_mut();
                g.session.toggle_pause();
                g.dispatch_events();
                g.sync_timer();
            });
        }
        on_click("restartBtn", move || {
            let mut g = game.borrow_mut();
            g.stop_timer();
            g.session.restart();
            g.dispatch_events();
            g.sync_timer();
        });
    }

    fn setup_tier_selector(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };
        let Ok(options) = document.query_selector_all(".magnet-choice") else {
            return;
        };
        for i in 0..options.length() {
            let Some(option) = options
                .item(i)
                .and_then(|n| n.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            let Some(tier) = ["small", "medium", "large"]
                .iter()
                .find(|name| option.class_list().contains(name))
                .and_then(|name| Tier::from_str(name))
            else {
                continue;
            };

            let game = game.clone();
            let options = options.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                for j in 0..options.length() {
                    if let Some(el) = options
                        .item(j)
                        .and_then(|n| n.dyn_into::<web_sys::Element>().ok())
                    {
                        let _ = el.class_list().remove_1("active");
                    }
                }
                if let Some(el) = options
                    .item(i)
                    .and_then(|n| n.dyn_into::<web_sys::Element>().ok())
                {
                    let _ = el.class_list().add_1("active");
                }
                game.borrow_mut().session.select_tier(tier);
            });
            let _ =
                option.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Bind `#setting-<name>` checkboxes and selects to the settings
    fn setup_settings_controls(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };
        for name in OPTION_NAMES {
            let Some(el) = document.get_element_by_id(&format!("setting-{}", name)) else {
                continue;
            };
            let current = game.borrow().settings.option_value(name).unwrap_or_default();

            let closure = if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
                input.set_checked(current == "on");
                let input = input.clone();
                let game = game.clone();
                Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    let value = if input.checked() { "on" } else { "off" };
                    game.borrow_mut().change_setting(name, value);
                })
            } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
                select.set_value(&current);
                let select = select.clone();
                let game = game.clone();
                Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    game.borrow_mut().change_setting(name, &select.value());
                })
            } else {
                log::warn!("#setting-{} is not an input or select", name);
                continue;
            };
            let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (width, height) = canvas_size(&window);
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Magnet Quest (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    demo_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one scripted round: drag the magnet just ahead of the puck toward the goal
#[cfg(not(target_arch = "wasm32"))]
fn demo_round() {
    use magnet_quest::{Session, SessionEvent, Settings};

    const FPS: f32 = 60.0;
    const LEAD: f32 = 70.0;

    let mut session = Session::new(1000.0, 600.0, 7);
    session.apply_settings(&Settings::load());
    session.start();
    session.set_pointer_down(true);

    let mut now = 0.0_f64;
    while !session.is_time_up() {
        let mover = session.sim.mover.pos;
        let toward_goal = (session.sim.goal.pos - mover).normalize_or_zero();
        let target = mover + toward_goal * LEAD;
        session.pointer_move(target.x, target.y);

        session.frame();
        now += 1000.0 / f64::from(FPS);
        session.advance_clock(1.0 / FPS, now);

        for event in session.drain_events() {
            match event {
                SessionEvent::Win => log::info!("Goal at {:.1}s", now / 1000.0),
                SessionEvent::RoundEnded { total_score, .. } => {
                    log::info!("Round over, total {}", total_score)
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    for line in session.history().labels() {
        println!("{}", line);
    }
}
