pub mod auth_flow;
pub mod posting;

pub use auth_flow::AuthFlow;
pub use posting::PostService;
