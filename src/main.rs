//! Color Walls entry point
//!
//! WASM: browser game loop. Native: seeded headless runs.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use color_walls::audio::{AudioManager, SoundEffect};
    use color_walls::consts::*;
    use color_walls::platform::{apply_canvas_fit, variant_from_query};
    use color_walls::renderer::{RenderState, scene_vertices};
    use color_walls::sim::{GameEvent, GamePhase, Simulation, TickInput};
    use color_walls::{GameConfig, HighScores, Settings, Variant};

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        high_scores: HighScores,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Matching bounces in the running episode, for the leaderboard
        episode_bounces: u32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(sim: Simulation, settings: Settings) -> Self {
            Self {
                audio: AudioManager::new(&settings),
                sim,
                render_state: None,
                settings,
                high_scores: HighScores::load(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                episode_bounces: 0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                self.sim.advance(&input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.jump = false;
                self.input.pause = false;
            }

            self.handle_events();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Sounds and leaderboard bookkeeping
        fn handle_events(&mut self) {
            let tracks_score = self.sim.session.config().variant.tracks_score();

            for event in self.sim.session.drain_events() {
                match event {
                    GameEvent::Jumped => self.audio.play(SoundEffect::Jump),
                    GameEvent::Bounced { .. } => {
                        self.episode_bounces += 1;
                        self.audio.play(SoundEffect::WallBounce);
                    }
                    GameEvent::CoinCollected { .. } => self.audio.play(SoundEffect::CoinCollect),
                    GameEvent::Restarted {
                        reason,
                        episode_points,
                    } => {
                        log::info!(
                            "Episode {} over ({:?}), {} points",
                            self.sim.session.episode(),
                            reason,
                            episode_points
                        );
                        let bounces = std::mem::take(&mut self.episode_bounces);
                        let rank = if tracks_score {
                            self.high_scores
                                .add_score(episode_points, bounces, js_sys::Date::now())
                        } else {
                            None
                        };
                        match rank {
                            Some(rank) => {
                                log::info!("New high score, rank {}", rank);
                                self.high_scores.save();
                                self.audio.play(SoundEffect::HighScore);
                            }
                            None => self.audio.play(SoundEffect::Restart),
                        }
                    }
                    GameEvent::Paused => log::info!("Paused"),
                    GameEvent::Resumed => log::info!("Resumed"),
                    GameEvent::Repainted { .. } => {}
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene_vertices(self.sim.session.scene());
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("score") {
                match self.sim.session.score_text() {
                    Some(text) => {
                        el.set_text_content(Some(&text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("best") {
                match self.high_scores.top_score() {
                    Some(best) if self.sim.session.config().variant.tracks_score() => {
                        el.set_text_content(Some(&format!("Best: {}", best)));
                        let _ = el.set_attribute("class", "");
                    }
                    _ => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("pause-overlay") {
                let class = if self.sim.session.phase() == GamePhase::Paused {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }
        }

        /// Queue a pause toggle when focus is lost during play
        fn auto_pause(&mut self, why: &str) {
            if self.settings.pause_on_blur && self.sim.session.phase() == GamePhase::Running {
                self.input.pause = true;
                log::info!("Auto-paused ({})", why);
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Color Walls starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let search = window.location().search().unwrap_or_default();
        let variant = variant_from_query(&search).unwrap_or(Variant::Classic);
        let config = GameConfig::load(variant);
        let (game_w, game_h) = (config.width, config.height);
        log::info!("Variant: {}", variant.as_str());

        // Backing store matches the logical viewport; CSS scales it
        let width = game_w as u32;
        let height = game_h as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        apply_canvas_fit(&canvas, game_w as f64, game_h as f64);

        let seed = js_sys::Date::now() as u64;
        let sim = Simulation::new(config, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let game = Rc::new(RefCell::new(Game::new(sim, Settings::load())));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, (game_w, game_h))
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        setup_input_handlers(&canvas, game.clone())?;
        setup_resize(&canvas, game_w as f64, game_h as f64)?;
        setup_auto_pause(game.clone())?;

        request_animation_frame(game);

        log::info!("Color Walls running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Tap anywhere on the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.jump = true;
            });
            canvas.add_event_listener_with_callback(
                "pointerdown",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        g.audio.resume();
                        g.input.jump = true;
                    }
                    "Escape" => g.input.pause = true,
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    "m" | "M" => {
                        g.settings.muted = !g.settings.muted;
                        g.settings.save();
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        log::info!("Muted: {}", settings.muted);
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game_w: f64, game_h: f64) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            apply_canvas_fit(&canvas, game_w, game_h);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::{Parser, ValueEnum};

    use color_walls::headless::{HeadlessRun, RunSummary, run_headless};
    use color_walls::{GameConfig, Variant};

    #[derive(Debug, Clone, Copy, ValueEnum)]
    enum CliVariant {
        Classic,
        Scoring,
    }

    impl From<CliVariant> for Variant {
        fn from(v: CliVariant) -> Self {
            match v {
                CliVariant::Classic => Variant::Classic,
                CliVariant::Scoring => Variant::Scoring,
            }
        }
    }

    #[derive(Debug, Parser)]
    #[command(name = "color-walls", about = "Run a seeded Color Walls session without a browser")]
    struct Cli {
        /// RNG seed
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Frames to simulate (60 per second)
        #[arg(long, default_value_t = 3600)]
        frames: u32,

        /// Tap every N frames (0 = never tap)
        #[arg(long, default_value_t = 30)]
        tap_every: u32,

        #[arg(long, value_enum, default_value = "classic")]
        variant: CliVariant,

        /// JSON file with game option overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        let mut config = match &cli.config {
            Some(path) => GameConfig::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GameConfig::default(),
        };
        config.variant = cli.variant.into();

        let run = HeadlessRun {
            seed: cli.seed,
            frames: cli.frames,
            tap_every: cli.tap_every,
        };
        log::info!(
            "Running {} frames, seed {}, tap every {}",
            run.frames,
            run.seed,
            run.tap_every
        );

        let summary = run_headless(config, &run).context("invalid game config")?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }
        Ok(())
    }

    fn print_summary(s: &RunSummary) {
        println!("seed:              {}", s.seed);
        println!("variant:           {}", s.variant);
        println!("frames:            {}", s.frames);
        println!("episodes:          {}", s.episodes);
        println!("jumps:             {}", s.jumps);
        println!("bounces:           {}", s.bounces);
        println!("coins:             {}", s.coins);
        println!("color mismatches:  {}", s.mismatch_restarts);
        println!("out of bounds:     {}", s.out_of_bounds_restarts);
        println!("final score:       {}", s.final_score);
        println!("longest episode:   {} frames", s.longest_episode);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
