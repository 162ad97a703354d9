//! UCI entry point. All engine logic lives in the library crate; this binary
//! just drives the stdin/stdout loop.

fn main() {
    chess_engine::uci::run::run();
}
