//! Replay a recorded set of HTSP channel messages into a catalog
//!
//! Run with: cargo run --example replay [other-policy]
//!
//! Examples:
//!   cargo run --example replay            # 'other' services ignored
//!   cargo run --example replay tv         # 'other' services published as TV
//!   RUST_LOG=tvh_catalog=debug cargo run --example replay radio
//!
//! The messages are encoded to HTSMSG frames first and decoded again, the
//! same path a live HTSP connection would take.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tvh_catalog::htsmsg::{HtsmsgDecoder, HtsmsgEncoder};
use tvh_catalog::{CatalogConfig, ChannelCatalog, ChannelIcon, HtsMessage, OtherTypePolicy};

fn recorded_messages() -> Vec<HtsMessage> {
    let service = |t: &str| vec![HtsMessage::new().with("type", t)];

    vec![
        HtsMessage::new()
            .with("method", "channelAdd")
            .with("channelId", 1)
            .with("channelNumber", 1)
            .with("channelName", "Das Erste HD")
            .with("channelIcon", "imagecache/12")
            .with("services", service("HDTV")),
        HtsMessage::new()
            .with("method", "channelAdd")
            .with("channelId", 2)
            .with("channelNumber", 2)
            .with("channelName", "ZDF HD")
            .with("channelIcon", "http://picons.example/zdf.png")
            .with("services", service("HDTV")),
        HtsMessage::new()
            .with("method", "channelAdd")
            .with("channelId", 3)
            .with("channelNumber", 0)
            .with("channelName", "Unmapped mux")
            .with("services", service("SDTV")),
        HtsMessage::new()
            .with("method", "channelAdd")
            .with("channelId", 4)
            .with("channelNumber", 301)
            .with("channelNumberMinor", 1)
            .with("channelName", "Deutschlandfunk")
            .with("services", service("Radio")),
        HtsMessage::new()
            .with("method", "channelAdd")
            .with("channelId", 5)
            .with("channelNumber", 900)
            .with("channelName", "Data carousel")
            .with("services", service("Other")),
        HtsMessage::new()
            .with("method", "channelUpdate")
            .with("channelId", 2)
            .with("channelName", "ZDF"),
    ]
}

#[tokio::main]
async fn main() -> tvh_catalog::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tvh_catalog=info".parse().expect("valid directive")),
        )
        .init();

    let policy = match std::env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|e| {
            eprintln!("{}, using Ignore", e);
            OtherTypePolicy::Ignore
        }),
        None => OtherTypePolicy::Ignore,
    };

    let config = CatalogConfig::default().other_type_policy(policy);
    let catalog = Arc::new(ChannelCatalog::with_config(config));

    let mut encoder = HtsmsgEncoder::new();
    for msg in recorded_messages() {
        encoder.encode(&msg)?;
    }
    let mut wire = BytesMut::from(&encoder.finish()[..]);
    println!("Encoded {} bytes of channel messages", wire.len());

    let (tx, rx) = mpsc::channel(64);
    let ingest = catalog.spawn_ingest_task(rx);

    let mut decoder = HtsmsgDecoder::new();
    while let Some(msg) = decoder.decode_frame(&mut wire)? {
        if tx.send(msg).await.is_err() {
            break;
        }
    }
    drop(tx);

    let processed = ingest.await.unwrap_or(0);
    println!(
        "Processed {} messages, {} channel records",
        processed,
        catalog.channel_count().await
    );

    let channels = catalog
        .build_catalog(CancellationToken::new())
        .await
        .unwrap_or_default();

    println!("\nCatalog ({} channels, 'other' -> {}):", channels.len(), policy);
    for channel in &channels {
        let icon = match &channel.icon {
            ChannelIcon::Remote(url) => url.clone(),
            ChannelIcon::Local => format!(
                "local:{}",
                catalog.lookup_icon(&channel.id).unwrap_or_default()
            ),
            ChannelIcon::None => "-".to_string(),
        };
        println!("  {:<40} icon={}", channel.to_string(), icon);
    }

    Ok(())
}
