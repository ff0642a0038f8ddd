//! Slice Cache demo driver
//!
//! Simulates a short viewing session against a synthetic loader and prints
//! the resulting cache statistics. Useful for eyeballing preload behavior
//! with `RUST_LOG=slice_cache=debug`.

use bytes::Bytes;
use tokio::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slice_cache::{
    slice_key, CacheConfig, InteractionEvent, NavDirection, SliceCacheEngine,
};

const SCOPE: &str = "demo-series";
const TOTAL_SLICES: i64 = 60;
const SLICE_BYTES: usize = 256 * 1024;

/// Synthetic loader: a small artificial delay, then an opaque payload.
async fn fake_loader(key: String) -> slice_cache::Result<(Bytes, u64)> {
    tokio::time::sleep(Duration::from_millis(5)).await;
    let payload = Bytes::from(vec![key.len() as u8; SLICE_BYTES]);
    Ok((payload, SLICE_BYTES as u64))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slice_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        max_cache_bytes = config.max_cache_bytes,
        max_items = config.max_items,
        confidence_threshold = config.confidence_threshold,
        "starting slice cache demo"
    );

    let engine = SliceCacheEngine::new(config);

    // A radiologist paging forward through the stack: each step records the
    // interaction, loads the current slice, then lets the engine speculate.
    for slice in 0..25i64 {
        engine
            .record_interaction(InteractionEvent::navigation(
                slice,
                NavDirection::Next,
                "demo-session",
            ))
            .await;

        let key = slice_key(SCOPE, slice);
        engine
            .load_slice(&key, fake_loader)
            .await
            .expect("synthetic loader cannot fail");

        let handles = engine
            .predict_and_preload(SCOPE, slice, TOTAL_SLICES, fake_loader)
            .await;
        for handle in handles {
            let _ = handle.await;
        }
    }

    let stats = engine.stats().await;
    info!(
        hit_rate = format!("{:.2}", stats.hit_rate()),
        predictive_hit_rate = format!("{:.2}", stats.predictive_hit_rate()),
        "session finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).expect("stats serialize")
    );

    engine.dispose().await;
}
