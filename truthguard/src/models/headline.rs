use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub source_name: String,
    pub published_at: Option<String>,
}
