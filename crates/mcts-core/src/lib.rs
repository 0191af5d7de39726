pub mod chess_move;
pub mod constants;
pub mod eval_info;
pub mod node;
pub mod score;
pub mod square;
pub mod types;
pub mod util;
