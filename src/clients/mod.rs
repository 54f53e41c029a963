pub mod github_client;
pub mod solution_path;

pub use github_client::{GithubClient, PushOutcome};
