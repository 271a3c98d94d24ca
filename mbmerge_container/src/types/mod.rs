mod tile_sink;
mod tile_store;

pub use tile_sink::*;
pub use tile_store::*;
