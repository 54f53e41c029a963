pub mod push_flow;

pub use push_flow::PushFlow;
