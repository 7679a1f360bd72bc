//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.

mod fixtures;
mod recorder;
mod stream_server;

pub use fixtures::*;
pub use recorder::{RecordingRenderSink, RenderCall};
#[allow(unused_imports)]
pub use stream_server::TestStreamServer;
