//! # Fractal Formula
//!
//! Compiles formulas from a library file and renders them to the
//! terminal. Set `RUST_LOG=debug` to see what the compiler does.
//!

mod term;

fn main() {
    env_logger::init();
    term::main();
}
