use crate::config::UpstreamConfig;
use crate::error::{Result, UpstreamError};
use crate::models::{
    ApiStatus, AtHomeServer, Author, Chapter, CollectionResponse, Cover, EntityResponse, Manga,
    ResolvedCover, SearchResult,
};
use futures::future::try_join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;

pub const BASE_URL: &str = "https://api.mangadex.org";
pub const UPLOADS_URL: &str = "https://uploads.mangadex.org";

/// Thin MangaDex API client. Each method issues its requests once and
/// reports the first failure.
#[derive(Clone)]
pub struct MangaDex {
    client: Client,
    config: UpstreamConfig,
}

impl MangaDex {
    pub fn new(client: Client, config: UpstreamConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        log::debug!("MangaDex GET {} {:?}", url, query);
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { status: status.as_u16(), url });
        }
        let text = response.text().await?;
        let envelope: ApiStatus = serde_json::from_str(&text)?;
        if envelope.result != "ok" {
            return Err(UpstreamError::Api(describe_errors(&envelope)));
        }
        Ok(serde_json::from_str::<T>(&text)?)
    }

    /// Search manga by title, cover art expanded
    pub async fn search(&self, title: &str) -> Result<Vec<Manga>> {
        let query = [
            ("title", title.to_string()),
            ("limit", self.config.search_limit.to_string()),
            ("hasAvailableChapters", "true".to_string()),
            ("includes[]", "cover_art".to_string()),
        ];
        let list: CollectionResponse<Manga> = self.fetch("/manga", &query).await?;
        log::debug!(
            "MangaDex search '{}' returned {} of {} (offset {}, limit {})",
            title,
            list.data.len(),
            list.total,
            list.offset,
            list.limit
        );
        Ok(list.data)
    }

    pub async fn get_manga(&self, id: &str) -> Result<Manga> {
        let path = format!("/manga/{}", segment(id));
        let res: EntityResponse<Manga> = self.fetch(&path, &[]).await?;
        Ok(res.data)
    }

    /// Chapters of a manga in the configured languages, newest upload first
    pub async fn get_feed(&self, manga_id: &str) -> Result<Vec<Chapter>> {
        let path = format!("/manga/{}/feed", segment(manga_id));
        let mut query = vec![("limit", self.config.feed_limit.to_string())];
        for lang in &self.config.translated_languages {
            query.push(("translatedLanguage[]", lang.clone()));
        }
        query.push(("order[createdAt]", "desc".to_string()));
        query.push(("includes[]", "manga".to_string()));

        let feed: CollectionResponse<Chapter> = self.fetch(&path, &query).await?;
        Ok(feed.data)
    }

    pub async fn get_chapter(&self, id: &str) -> Result<Chapter> {
        let path = format!("/chapter/{}", segment(id));
        let res: EntityResponse<Chapter> = self.fetch(&path, &[]).await?;
        Ok(res.data)
    }

    /// Image URLs for every page of a chapter, via the at-home delivery network
    pub async fn get_readable_pages(&self, chapter_id: &str) -> Result<Vec<String>> {
        let path = format!("/at-home/server/{}", segment(chapter_id));
        let server: AtHomeServer = self.fetch(&path, &[]).await?;
        Ok(page_urls(&server, self.config.data_saver))
    }

    pub async fn get_cover(&self, id: &str) -> Result<Cover> {
        let path = format!("/cover/{}", segment(id));
        let res: EntityResponse<Cover> = self.fetch(&path, &[]).await?;
        Ok(res.data)
    }

    pub async fn get_author(&self, id: &str) -> Result<Author> {
        let path = format!("/author/{}", segment(id));
        let res: EntityResponse<Author> = self.fetch(&path, &[]).await?;
        Ok(res.data)
    }

    /// Resolve the manga's main cover. An expanded `cover_art` relationship is
    /// used as-is; a bare reference is fetched.
    pub async fn resolve_cover(&self, manga: &Manga) -> Result<Option<ResolvedCover>> {
        let Some(rel) = manga.relationships_of("cover_art").next() else {
            return Ok(None);
        };
        let cover = match &rel.attributes {
            Some(attrs) => Cover {
                id: rel.id.clone(),
                kind: rel.rel_type.clone(),
                attributes: serde_json::from_value(attrs.clone())?,
                relationships: Vec::new(),
            },
            None => self.get_cover(&rel.id).await?,
        };
        let url = cover_url(&self.config.uploads_base_url, &manga.id, &cover.attributes.file_name);
        Ok(Some(ResolvedCover { cover, url }))
    }

    pub async fn resolve_authors(&self, manga: &Manga) -> Result<Vec<Author>> {
        try_join_all(manga.relationships_of("author").map(|rel| self.get_author(&rel.id))).await
    }

    /// Attach resolved cover and authors to a search hit
    pub async fn enrich(&self, manga: Manga) -> Result<SearchResult> {
        let (main_cover_resolved, authors_resolved) =
            futures::try_join!(self.resolve_cover(&manga), self.resolve_authors(&manga))?;
        Ok(SearchResult {
            manga,
            main_cover_resolved,
            authors_resolved,
        })
    }

    /// Search and enrich every hit concurrently; any failed resolution fails the whole search
    pub async fn search_enriched(&self, title: &str) -> Result<Vec<SearchResult>> {
        let hits = self.search(title).await?;
        try_join_all(hits.into_iter().map(|manga| self.enrich(manga))).await
    }
}

fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

fn describe_errors(status: &ApiStatus) -> String {
    if status.errors.is_empty() {
        return format!("result '{}'", status.result);
    }
    status
        .errors
        .iter()
        .map(|e| {
            let text = e
                .detail
                .as_deref()
                .or(e.title.as_deref())
                .unwrap_or("unknown error");
            match e.status {
                Some(code) => format!("{} ({})", text, code),
                None => text.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn cover_url(uploads_base_url: &str, manga_id: &str, file_name: &str) -> String {
    format!(
        "{}/covers/{}/{}",
        uploads_base_url.trim_end_matches('/'),
        manga_id,
        file_name
    )
}

pub fn page_urls(server: &AtHomeServer, data_saver: bool) -> Vec<String> {
    let (quality, files) = if data_saver {
        ("data-saver", &server.chapter.data_saver)
    } else {
        ("data", &server.chapter.data)
    };
    files
        .iter()
        .map(|file| {
            format!(
                "{}/{}/{}/{}",
                server.base_url.trim_end_matches('/'),
                quality,
                server.chapter.hash,
                file
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiErrorDetail, AtHomeChapter};

    fn server() -> AtHomeServer {
        AtHomeServer {
            base_url: "https://node.mangadex.network/".to_string(),
            chapter: AtHomeChapter {
                hash: "abc123".to_string(),
                data: vec!["1.png".to_string(), "2.png".to_string()],
                data_saver: vec!["1.jpg".to_string()],
            },
        }
    }

    #[test]
    fn test_page_urls() {
        assert_eq!(
            page_urls(&server(), false),
            vec![
                "https://node.mangadex.network/data/abc123/1.png",
                "https://node.mangadex.network/data/abc123/2.png",
            ]
        );
    }

    #[test]
    fn test_page_urls_data_saver() {
        assert_eq!(
            page_urls(&server(), true),
            vec!["https://node.mangadex.network/data-saver/abc123/1.jpg"]
        );
    }

    #[test]
    fn test_cover_url() {
        assert_eq!(
            cover_url("https://uploads.mangadex.org/", "m1", "c.jpg"),
            "https://uploads.mangadex.org/covers/m1/c.jpg"
        );
    }

    #[test]
    fn test_segment_keeps_path_single() {
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
        assert_eq!(segment("8f3e-11aa"), "8f3e-11aa");
    }

    #[test]
    fn test_describe_errors() {
        let status = ApiStatus {
            result: "error".to_string(),
            errors: vec![ApiErrorDetail {
                status: Some(404),
                title: Some("not_found_http_exception".to_string()),
                detail: Some("Manga not found".to_string()),
            }],
        };
        assert_eq!(describe_errors(&status), "Manga not found (404)");

        let bare = ApiStatus { result: "error".to_string(), errors: Vec::new() };
        assert_eq!(describe_errors(&bare), "result 'error'");
    }
}
