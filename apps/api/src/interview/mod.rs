// Interview engine: session state machine, prompt assembly, response parsing.
// All model calls go through the ModelGateway trait; no direct HTTP here.

pub mod evaluation;
pub mod fallback;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod session;
pub mod store;
pub mod summary;
