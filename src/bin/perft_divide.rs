use std::time::Instant;

use chess_engine::board::Board;
use chess_engine::uci::format_uci_move;

fn main() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut board = Board::try_from_fen(fen).expect("valid fen");
    let depth = 3;
    println!("Perft divide for Kiwipete depth {depth}");

    let start = Instant::now();
    let mut total = 0u64;
    let mut root_moves = board.generate_moves();
    root_moves.sort_by_key(|m| (m.from().index(), m.to().index()));

    for mv in root_moves.iter() {
        let uci = format_uci_move(mv);
        let mut child = board.clone();
        child.make_move_uci(&uci).expect("pseudo-legal root move parses");
        let nodes = child.perft(depth - 1);
        println!("  {uci}: {nodes}");
        total += nodes;
    }

    let dur = start.elapsed();
    println!("Total: {total} in {dur:?}");
}
