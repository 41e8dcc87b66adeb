//! # Voxel World Entry Point
//!
//! This is the main entry point for the headless simulation.
//! It simply calls into the library's `run()` function to initialize and start the engine.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json] [save.json]
//! ```

fn main() {
    if let Err(err) = voxel_world::run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
