pub mod submission;

pub use submission::{PushPayload, Submission};
