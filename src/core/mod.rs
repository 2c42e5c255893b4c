pub mod orchestrator;
pub mod renderer;
pub mod stream;

pub use orchestrator::Reconciler;
pub use stream::StreamDefinition;
