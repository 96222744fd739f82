use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One part of a multimodal message, in the OpenAI-compatible wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// The single message sent upstream per chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl ChatMessage {
    /// A user message: the query text first, then the image if one was accepted.
    pub fn user(query: impl Into<String>, image_data_url: Option<String>) -> Self {
        let mut content = vec![ContentBlock::Text { text: query.into() }];

        if let Some(url) = image_data_url {
            content.push(ContentBlock::ImageUrl {
                image_url: ImageUrl { url },
            });
        }

        Self {
            role: Role::User,
            content,
        }
    }

    pub fn text_blocks(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::ImageUrl { .. } => None,
        })
    }

    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ImageUrl { image_url } => Some(image_url.url.as_str()),
            ContentBlock::Text { .. } => None,
        })
    }
}

/// Successful body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
}
