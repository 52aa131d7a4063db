pub mod barrier;
pub mod log_setup;
pub mod shared_fn;
pub mod test_utils;

pub use barrier::{BarrierError, CyclicBarrier};
pub use shared_fn::SharedFn;
