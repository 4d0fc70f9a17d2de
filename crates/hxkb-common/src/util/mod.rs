mod bitmatrix;
mod node_pool;

pub use bitmatrix::*;
pub use node_pool::*;
