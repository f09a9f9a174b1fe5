//! Command handlers.
//!
//! Each handler constructs exactly the resources it needs: the database is
//! opened once and shared via `Arc`; HTTP clients are built once from
//! configuration. Absent results become messages and a nonzero exit, not
//! errors from the storage layer.

use std::sync::Arc;

use anyhow::{Context, bail};

use scry_cache::DigestCache;
use scry_citations::{CitationSync, SyncSettings};
use scry_config::ScryConfig;
use scry_core::entities::PaperRef;
use scry_db::ScryDb;
use scry_digest::{AnthropicClient, DigestError, FastEmbedder};
use scry_openalex::{OpenAlexClient, OpenAlexOptions};

use crate::cli::{DigestArgs, GraphArgs, LatestArgs, SyncArgs};

pub async fn digest(config: &ScryConfig, args: DigestArgs) -> anyhow::Result<()> {
    let db = open_db(config).await?;
    let cache = DigestCache::from_config(config, Arc::clone(&db)).await?;
    let openalex = OpenAlexClient::new(openalex_options(config));
    let citations = CitationSync::new(Arc::clone(&db), openalex.clone(), sync_settings(config));
    let composer = AnthropicClient::new(&config.anthropic)?;
    let embedder = FastEmbedder::new().context("embedding engine failed to start")?;

    let mut pipeline = scry_digest::DigestPipeline::new(
        openalex,
        embedder,
        composer,
        cache,
        citations,
        config.cache.ttl_hours,
    );

    let request = scry_digest::DigestRequest {
        topic: args.topic.clone(),
        days: args.days,
        top_k: args.top_k,
        period: args.period,
        voice: args.voice,
    };
    match pipeline.run(&request).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Err(DigestError::NoPapers) => bail!("no papers found for '{}'", args.topic),
        Err(e) => Err(e.into()),
    }
}

pub async fn latest(config: &ScryConfig, args: &LatestArgs) -> anyhow::Result<()> {
    let db = open_db(config).await?;
    let cache = DigestCache::from_config(config, db).await?;

    let Some(digest) = cache.get_latest(&args.topic, args.days).await? else {
        bail!("no digest found for '{}' ({} days)", args.topic, args.days);
    };

    let clusters: serde_json::Value =
        serde_json::from_str(&digest.clusters_json).unwrap_or_default();
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "digestId": digest.id,
            "summary": digest.summary,
            "clusters": clusters,
            "audioUrl": digest.audio_url,
            "createdAt": digest.created_at,
        }))?
    );
    Ok(())
}

pub async fn graph(config: &ScryConfig, args: GraphArgs) -> anyhow::Result<()> {
    let db = open_db(config).await?;
    let openalex = OpenAlexClient::new(openalex_options(config));
    let citations = CitationSync::new(db, openalex, sync_settings(config));

    let (edges, metadata) = citations
        .load_citation_context(&args.ids, args.max_neighbors)
        .await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "edges": edges,
            "metadata": metadata,
        }))?
    );
    Ok(())
}

pub async fn sync(config: &ScryConfig, args: SyncArgs) -> anyhow::Result<()> {
    let db = open_db(config).await?;
    let openalex = OpenAlexClient::new(openalex_options(config));
    let citations = CitationSync::new(db, openalex, sync_settings(config));

    let papers: Vec<PaperRef> = args
        .ids
        .iter()
        .map(|id| PaperRef {
            id: id.clone(),
            ..Default::default()
        })
        .collect();
    citations.ensure_citations_for_papers(&papers).await?;
    println!("synced citations for {} paper(s)", papers.len());
    Ok(())
}

async fn open_db(config: &ScryConfig) -> anyhow::Result<Arc<ScryDb>> {
    let db = ScryDb::open_local(&config.cache.db_path)
        .await
        .with_context(|| format!("failed to open database at '{}'", config.cache.db_path))?;
    Ok(Arc::new(db))
}

fn openalex_options(config: &ScryConfig) -> OpenAlexOptions {
    OpenAlexOptions {
        base_url: config.openalex.base_url.clone(),
        mailto: config.openalex.mailto.clone(),
        timeout_secs: config.openalex.timeout_secs,
        batch_size: config.openalex.batch_size,
    }
}

fn sync_settings(config: &ScryConfig) -> SyncSettings {
    SyncSettings {
        ttl_hours: config.openalex.citation_ttl_hours,
        max_references: config.openalex.max_references,
        max_cited_by: config.openalex.max_cited_by,
    }
}
