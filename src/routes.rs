//! HTTP handlers for the MangaDex provider
//!
//! Every upstream failure is logged and flattened to a 500 with the generic
//! message body; callers never see which call failed or why.

use actix_web::{get, web, HttpResponse, Responder};
use log::{error, info};

use crate::app_state::AppState;
use crate::chapters::select_latest_per_label;
use crate::error::{generic_error_body, Result, UpstreamError};
use crate::models::{Chapter, ChapterPages, RouteIndex};
use crate::sources::mangadex::MangaDex;

/// Register the provider routes. The index is reachable with and without a
/// trailing slash so it still answers when mounted under a prefix.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(["", "/"]).route(web::get().to(index)))
        .service(manga_info)
        .service(read_manga)
        .service(read_chapter)
        .service(search_manga);
}

async fn index() -> impl Responder {
    HttpResponse::Ok().json(RouteIndex {
        intro: "Welcome to the mangadex provider: check out the provider's website @ https://mangadex.org/"
            .to_string(),
        routes: vec!["/:query", "/info/:id", "/read/:chapterId", "/chapter/:chapterId"],
        documentation: "https://docs.consumet.org/#tag/mangadex".to_string(),
    })
}

#[get("/{query}")]
async fn search_manga(data: web::Data<AppState>, query: web::Path<String>) -> impl Responder {
    let query = query.into_inner();
    info!("Searching MangaDex for '{}'", query);
    match data.mangadex.search_enriched(&query).await {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => upstream_failure("search", &query, e),
    }
}

#[get("/info/{id}")]
async fn manga_info(data: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
    let id = decode_id(id.into_inner());
    info!("Fetching manga info {}", id);
    match data.mangadex.get_manga(&id).await {
        Ok(manga) => HttpResponse::Ok().json(manga),
        Err(e) => upstream_failure("info", &id, e),
    }
}

#[get("/read/{manga_id}")]
async fn read_manga(data: web::Data<AppState>, manga_id: web::Path<String>) -> impl Responder {
    let manga_id = manga_id.into_inner();
    info!("Fetching chapter list for manga {}", manga_id);
    match latest_chapters(&data.mangadex, &manga_id).await {
        Ok(chapters) => HttpResponse::Ok().json(chapters),
        Err(e) => upstream_failure("read", &manga_id, e),
    }
}

#[get("/chapter/{chapter_id}")]
async fn read_chapter(data: web::Data<AppState>, chapter_id: web::Path<String>) -> impl Responder {
    let chapter_id = chapter_id.into_inner();
    info!("Fetching pages for chapter {}", chapter_id);
    match chapter_pages(&data.mangadex, &chapter_id).await {
        Ok(pages) => HttpResponse::Ok().json(pages),
        Err(e) => upstream_failure("chapter", &chapter_id, e),
    }
}

/// Feed of a manga reduced to its newest upload per chapter, newest chapter first
async fn latest_chapters(mangadex: &MangaDex, manga_id: &str) -> Result<Vec<Chapter>> {
    let manga = mangadex.get_manga(manga_id).await?;
    let feed = mangadex.get_feed(&manga.id).await?;
    let total = feed.len();
    let latest = select_latest_per_label(feed);
    info!("Manga {}: {} uploads, {} distinct chapters", manga.id, total, latest.len());
    Ok(latest)
}

async fn chapter_pages(mangadex: &MangaDex, chapter_id: &str) -> Result<ChapterPages> {
    let chapter = mangadex.get_chapter(chapter_id).await?;
    let pages = mangadex.get_readable_pages(&chapter.id).await?;
    Ok(ChapterPages { chapter, pages })
}

/// Percent-decode an id once more; ids that do not decode to UTF-8 are kept raw
fn decode_id(raw: String) -> String {
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}

fn upstream_failure(route: &str, id: &str, e: UpstreamError) -> HttpResponse {
    error!("{} failed for '{}': {}", route, id, e);
    HttpResponse::InternalServerError().json(generic_error_body())
}
