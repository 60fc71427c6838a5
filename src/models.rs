use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attribute map kept verbatim from MangaDex
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Reference from one MangaDex entity to another. `attributes` is only
/// populated when the request expanded it with `includes[]`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Entity<A> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: A,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl<A> Entity<A> {
    pub fn relationships_of<'a>(
        &'a self,
        rel_type: &'a str,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships.iter().filter(move |r| r.rel_type == rel_type)
    }
}

pub type Manga = Entity<Attributes>;
pub type Author = Entity<Attributes>;
pub type Chapter = Entity<ChapterAttributes>;
pub type Cover = Entity<CoverAttributes>;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChapterAttributes {
    /// Chapter label such as "12" or "12.5"; absent for oneshots
    #[serde(default)]
    pub chapter: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Attributes,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CoverAttributes {
    pub file_name: String,
    #[serde(flatten)]
    pub extra: Attributes,
}

/// Cover record plus the public image URL built from its file name
#[derive(Debug, Serialize, Clone)]
pub struct ResolvedCover {
    #[serde(flatten)]
    pub cover: Cover,
    pub url: String,
}

/// Search hit enriched with its resolved cover and authors
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub manga: Manga,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_cover_resolved: Option<ResolvedCover>,
    pub authors_resolved: Vec<Author>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChapterPages {
    pub chapter: Chapter,
    pub pages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RouteIndex {
    pub intro: String,
    pub routes: Vec<&'static str>,
    pub documentation: String,
}

// Upstream envelopes

#[derive(Debug, Deserialize)]
pub struct ApiStatus {
    pub result: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntityResponse<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct CollectionResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtHomeServer {
    pub base_url: String,
    pub chapter: AtHomeChapter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtHomeChapter {
    pub hash: String,
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default)]
    pub data_saver: Vec<String>,
}
