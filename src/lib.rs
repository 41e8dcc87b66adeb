#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! The core of a voxel-world game: chunked block storage with distance-based
//! streaming, procedural terrain and trees, face-culled chunk meshing, DDA
//! block ray casting, AABB player physics and a level-based water simulation.
//!
//! Windowing, GPU upload and drawing are left to a rendering collaborator that
//! implements [`engine_state::rendering::ChunkRenderer`]. The bundled
//! [`engine_state::rendering::HeadlessRenderer`] records uploads without a GPU.
//!
//! ## Key Modules
//!
//! * `config` - Explicit startup configuration, loadable from JSON
//! * `error` - Errors raised at the edges of the engine
//! * `engine_state` - The engine: world, player, camera, meshing and physics
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(err) = voxel_world::run() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunk-based voxel storage keeps only the render distance in memory
//! * Face culling skips every quad hidden behind an opaque neighbour
//! * Only dirty chunks are remeshed, once per tick

use log::info;
use web_time::Instant;

use config::GameConfig;
use engine_state::{rendering::HeadlessRenderer, EngineState, PlayerAction};
use error::EngineError;

pub mod config;
pub mod engine_state;
pub mod error;

pub const APPLICATION_INITIALIZATION_STOPWATCH: &str = "Application Initialization";

/// Seconds of simulated walking in the headless session.
const HEADLESS_SESSION_SECONDS: u32 = 10;

/// Runs a headless session.
///
/// Usage: `voxel-world [config.json] [save.json]`. The player walks forward for
/// a few seconds, jumping now and then, and pours one water source. When a
/// save path is given the loaded chunks are written to it at the end.
pub fn run() -> Result<(), EngineError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let save_path = args.next();

    let started = Instant::now();
    let mut engine = EngineState::new(config, HeadlessRenderer::new());
    info!(
        "{}: {:?} ({} chunks, {} meshes resident)",
        APPLICATION_INITIALIZATION_STOPWATCH,
        started.elapsed(),
        engine.world.chunk_count(),
        engine.renderer().resident_count()
    );

    let tick_rate = engine.config().tick_rate;
    let total_ticks = HEADLESS_SESSION_SECONDS * tick_rate;
    let mut events = 0;
    for tick in 0..total_ticks {
        let actions = PlayerAction {
            move_forward: true,
            jump: tick % tick_rate == 0,
            select_slot: (tick == 0).then_some(5),
            place_block: tick == tick_rate,
            ..Default::default()
        };
        events += engine.tick(&actions).events.len();
    }

    let position = engine.player.position;
    info!(
        "Simulated {} ticks: player at ({:.1}, {:.1}, {:.1}), {} chunks loaded, {} meshes resident, {} vertices, {} water cells tracked, {} world events",
        engine.ticks(),
        position.x,
        position.y,
        position.z,
        engine.world.chunk_count(),
        engine.renderer().resident_count(),
        engine.renderer().resident_vertices(),
        engine.world.fluids().tracked(),
        events
    );

    if let Some(path) = save_path {
        engine.save(path)?;
    }
    Ok(())
}
