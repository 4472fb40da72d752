pub mod block_channel;
pub mod controller;
pub mod dispatch;
pub mod memory_block_channel;
pub mod session;
pub mod session_builder;
pub mod status;
pub mod tag;
pub mod type2_tag;

pub mod error;

#[cfg(test)]
mod fake_tag;
