//! Arcade Sim entry point
//!
//! Native builds run a headless autoplay session; the wasm build hooks the
//! browser's input and animation frame into the fixed step driver.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use arcade_sim::consts::FRAME_MS;
    use arcade_sim::maze::MazeState;
    use arcade_sim::sim::GameState;
    use arcade_sim::{ConfigError, FixedStepDriver, FlappyConfig, FlappyPreset, InputEvent, MazeConfig};

    /// Which engine the page hosts
    enum Engine {
        Flappy(FixedStepDriver<GameState>),
        Maze(FixedStepDriver<MazeState>),
    }

    struct Game {
        engine: Engine,
        last_time: f64,
        last_score: Option<u32>,
    }

    impl Game {
        fn new(kind: &str, seed: u64) -> Result<Self, ConfigError> {
            let engine = match kind {
                "maze" => Engine::Maze(FixedStepDriver::new(MazeState::new(
                    MazeConfig::default(),
                    seed,
                )?)),
                _ => Engine::Flappy(FixedStepDriver::new(GameState::new(
                    FlappyConfig::from_preset(FlappyPreset::Web),
                    seed,
                )?)),
            };
            Ok(Self {
                engine,
                last_time: 0.0,
                last_score: None,
            })
        }

        fn handle(&mut self, event: InputEvent) {
            match &mut self.engine {
                Engine::Flappy(driver) => driver.handle(event),
                Engine::Maze(driver) => driver.handle(event),
            }
        }

        fn toggle_autopilot(&mut self) {
            if let Engine::Flappy(driver) = &mut self.engine {
                driver.input.autopilot = !driver.input.autopilot;
                log::info!("Autopilot: {}", driver.input.autopilot);
            }
        }

        fn update(&mut self, elapsed_ms: f32) {
            match &mut self.engine {
                Engine::Flappy(driver) => {
                    for event in driver.frame(elapsed_ms) {
                        log::debug!("{event:?}");
                    }
                }
                Engine::Maze(driver) => {
                    for event in driver.frame(elapsed_ms) {
                        log::debug!("{event:?}");
                    }
                }
            }
        }

        /// Forget frame timing, e.g. while the tab is hidden
        fn pause_clock(&mut self) {
            self.last_time = 0.0;
            match &mut self.engine {
                Engine::Flappy(driver) => driver.reset_clock(),
                Engine::Maze(driver) => driver.reset_clock(),
            }
        }

        fn score(&self) -> u32 {
            match &self.engine {
                Engine::Flappy(driver) => driver.sim.score.display(),
                Engine::Maze(driver) => driver.sim.score,
            }
        }

        /// Write the score into `#score` when it changes
        fn update_hud(&mut self) {
            let score = self.score();
            if self.last_score == Some(score) {
                return;
            }
            self.last_score = Some(score);
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("score"))
            {
                el.set_text_content(Some(&score.to_string()));
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // <html data-game="maze"> selects the maze, anything else is flappy
        let kind = document
            .document_element()
            .and_then(|el| el.get_attribute("data-game"))
            .unwrap_or_default();

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(&kind, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Arcade Sim ({}) initialized with seed: {}", kind, seed);
        let game = Rc::new(RefCell::new(game));

        setup_input_handlers(&window, game.clone())?;
        setup_visibility_handler(&document, game.clone())?;
        request_animation_frame(game);
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if code == "KeyI" {
                    game.borrow_mut().toggle_autopilot();
                    return;
                }
                if let Some(input) = InputEvent::from_key(&code, true) {
                    event.prevent_default();
                    game.borrow_mut().handle(input);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(input) = InputEvent::from_key(&event.code(), false) {
                    game.borrow_mut().handle(input);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().handle(InputEvent::Action);
            });
            window.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().handle(InputEvent::Action);
            });
            window.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Drop the time spent hidden instead of catching up on it
    fn setup_visibility_handler(
        document: &web_sys::Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.hidden() {
                game.borrow_mut().pause_clock();
                log::info!("Tab hidden, frame clock reset");
            }
        });
        document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        )?;
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
            let elapsed_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                FRAME_MS
            };
            g.last_time = time;
            g.update(elapsed_ms);
            g.update_hud();
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use arcade_sim::input::{Direction, InputEvent};
    use arcade_sim::maze::{MazeEvent, MazeState};
    use arcade_sim::sim::{GameEvent, GameState};
    use arcade_sim::{
        ConfigError, FixedStepDriver, FlappyConfig, FlappyPreset, MazeConfig, MazePreset,
    };

    const USAGE: &str =
        "usage: arcade-sim [flappy|maze] [--preset NAME] [--config FILE] [--seed N] [--ticks N]";

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Game {
        Flappy,
        Maze,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Args {
        pub game: Game,
        pub preset: Option<String>,
        pub config: Option<PathBuf>,
        pub seed: u64,
        pub ticks: u64,
    }

    impl Default for Args {
        fn default() -> Self {
            Self {
                game: Game::Flappy,
                preset: None,
                config: None,
                seed: 42,
                ticks: 3600,
            }
        }
    }

    /// Parse command line arguments (without the program name)
    pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "flappy" => parsed.game = Game::Flappy,
                "maze" => parsed.game = Game::Maze,
                "--preset" => parsed.preset = Some(value(&mut args, "--preset")?),
                "--config" => parsed.config = Some(PathBuf::from(value(&mut args, "--config")?)),
                "--seed" => {
                    parsed.seed = value(&mut args, "--seed")?
                        .parse()
                        .map_err(|e| format!("invalid --seed: {e}"))?
                }
                "--ticks" => {
                    parsed.ticks = value(&mut args, "--ticks")?
                        .parse()
                        .map_err(|e| format!("invalid --ticks: {e}"))?
                }
                "-h" | "--help" => return Err(USAGE.to_string()),
                other => return Err(format!("unexpected argument '{other}'\n{USAGE}")),
            }
        }
        Ok(parsed)
    }

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
        args.next().ok_or_else(|| format!("{flag} needs a value\n{USAGE}"))
    }

    fn flappy_config(args: &Args) -> Result<FlappyConfig, ConfigError> {
        match (&args.config, &args.preset) {
            (Some(path), _) => FlappyConfig::load(path),
            (None, Some(name)) => Ok(FlappyConfig::from_preset(name.parse::<FlappyPreset>()?)),
            (None, None) => Ok(FlappyConfig::default()),
        }
    }

    fn maze_config(args: &Args) -> Result<MazeConfig, ConfigError> {
        match (&args.config, &args.preset) {
            (Some(path), _) => MazeConfig::load(path),
            (None, Some(name)) => Ok(MazeConfig::from_preset(name.parse::<MazePreset>()?)),
            (None, None) => Ok(MazeConfig::default()),
        }
    }

    pub fn run(args: &Args) -> Result<(), ConfigError> {
        match args.game {
            Game::Flappy => run_flappy(args),
            Game::Maze => run_maze(args),
        }
    }

    fn run_flappy(args: &Args) -> Result<(), ConfigError> {
        let state = GameState::new(flappy_config(args)?, args.seed)?;
        let mut driver = FixedStepDriver::new(state);
        driver.input.autopilot = true;

        for _ in 0..args.ticks {
            for event in driver.step_once() {
                match event {
                    GameEvent::Scored { .. } | GameEvent::PipeSpawned { .. } => {
                        log::debug!("{event:?}")
                    }
                    _ => log::info!("{event:?}"),
                }
            }
            if driver.sim.is_over() {
                break;
            }
        }

        let sim = &driver.sim;
        println!(
            "flappy seed={} ticks={} score={} over={}",
            sim.seed,
            sim.time_ticks,
            sim.score.display(),
            sim.is_over()
        );
        Ok(())
    }

    /// Held direction for a given tick of the scripted maze run
    fn maze_pattern(tick: u64) -> Direction {
        const PATTERN: [Direction; 4] = [
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ];
        PATTERN[((tick / 45) % 4) as usize]
    }

    fn run_maze(args: &Args) -> Result<(), ConfigError> {
        let state = MazeState::new(maze_config(args)?, args.seed)?;
        let mut driver = FixedStepDriver::new(state);
        let mut held: Option<Direction> = None;

        for tick in 0..args.ticks {
            let direction = maze_pattern(tick);
            if held != Some(direction) {
                if let Some(previous) = held {
                    driver.handle(InputEvent::Release(previous));
                }
                driver.handle(InputEvent::Press(direction));
                held = Some(direction);
            }

            for event in driver.step_once() {
                match event {
                    MazeEvent::DotEaten { .. } => log::debug!("{event:?}"),
                    _ => log::info!("{event:?}"),
                }
            }
            if driver.sim.is_over() || driver.sim.maze.remaining_food() == 0 {
                break;
            }
        }

        let sim = &driver.sim;
        println!(
            "maze seed={} ticks={} score={} lives={} food_left={} over={}",
            sim.seed,
            sim.time_ticks,
            sim.score,
            sim.lives,
            sim.maze.remaining_food(),
            sim.is_over()
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args = match headless::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };
    log::info!("Arcade Sim (native) starting: {args:?}");

    if let Err(e) = headless::run(&args) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
