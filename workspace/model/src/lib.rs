pub mod credentials;
pub mod entities;

// Re-export tracing for downstream crates
pub use tracing;
