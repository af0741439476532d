pub mod pipeline;
pub mod sync;
pub mod update;
