//! Chat completion client and streaming machinery

pub mod mock;
pub mod openai;
pub mod stream;
pub mod traits;

pub use mock::ScriptedClient;
pub use openai::OpenAiClient;
pub use stream::{ToolCallAccumulator, ToolCallFragment};
pub use traits::{ChatClient, ChatDelta, ChatStream, GenerationParams, ToolCallChunk};
