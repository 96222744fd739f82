pub mod chat;
pub mod disease;
pub mod language;
pub mod page;

pub use chat::{ChatAnswer, ChatMessage, ContentBlock, ImageUrl, Role};
pub use disease::{Disease, DiseaseSummary};
pub use language::{Language, UnsupportedLanguage};
pub use page::{LanguageOption, PageContext};
