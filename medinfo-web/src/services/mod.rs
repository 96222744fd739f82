pub mod catalog;
pub mod chat_relay;
pub mod metrics;
pub mod providers;
pub mod translations;
pub mod upload;

pub use catalog::DiseaseCatalog;
pub use chat_relay::{ChatRelay, ChatRequest};
pub use metrics::{get_metrics, init_metrics};
pub use providers::{CompletionProvider, GroqProvider, MockCompletionProvider, MockReply};
pub use translations::{Translations, Translator};
pub use upload::ImageUpload;
