//! End-to-end channel flow: HTSMSG frames -> ingest task -> catalog build

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::BytesMut;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tvh_catalog::htsmsg::{HtsmsgDecoder, HtsmsgEncoder};
use tvh_catalog::{
    AddOutcome, CatalogConfig, ChannelCatalog, ChannelIcon, ChannelKind, HtsMessage,
    OtherTypePolicy, TunerEnrichment,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn channel_add(id: i64, number: i64, name: &str, service_type: &str) -> HtsMessage {
    HtsMessage::new()
        .with("method", "channelAdd")
        .with("channelId", id)
        .with("channelNumber", number)
        .with("channelName", name)
        .with("services", vec![HtsMessage::new().with("type", service_type)])
}

fn channel_update(id: i64) -> HtsMessage {
    HtsMessage::new()
        .with("method", "channelUpdate")
        .with("channelId", id)
}

/// Counts the hook calls it receives
#[derive(Default)]
struct CountingTuner {
    added: Arc<AtomicUsize>,
    cleaned: Arc<AtomicUsize>,
}

impl TunerEnrichment for CountingTuner {
    fn add_tuner_info(&self, _message: &HtsMessage) {
        self.added.fetch_add(1, Ordering::SeqCst);
    }

    fn clean(&self) {
        self.cleaned.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_wire_frames_to_catalog() {
    init_tracing();

    let messages = vec![
        channel_add(101, 1, "Das Erste HD", "HDTV").with("channelIcon", "imagecache/1"),
        channel_add(102, 2, "ZDF HD", "HDTV")
            .with("channelIcon", "http://picons.example/zdf.png"),
        // Arrives before it has a number: ignored
        channel_update(103).with("channelName", "Not yet numbered"),
        channel_add(104, 0, "Zero", "SDTV"),
        channel_add(105, 301, "Bayern 3", "Radio").with("channelNumberMinor", 2),
        channel_add(106, 400, "EPG data", "Other"),
        channel_update(101).with("channelName", "Das Erste"),
    ];

    let mut encoder = HtsmsgEncoder::new();
    for msg in &messages {
        encoder.encode(msg).unwrap();
    }
    let mut wire = BytesMut::from(&encoder.finish()[..]);

    let catalog = Arc::new(ChannelCatalog::new());
    let (tx, rx) = mpsc::channel(16);
    let ingest = catalog.spawn_ingest_task(rx);

    let mut decoder = HtsmsgDecoder::new();
    while let Some(msg) = decoder.decode_frame(&mut wire).unwrap() {
        tx.send(msg).await.unwrap();
    }
    drop(tx);

    assert_eq!(ingest.await.unwrap(), messages.len());
    assert_eq!(catalog.channel_count().await, 4);

    let channels = catalog
        .build_catalog(CancellationToken::new())
        .await
        .unwrap();

    let ids: Vec<&str> = channels.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["101", "102", "105"]);

    assert_eq!(channels[0].name.as_deref(), Some("Das Erste"));
    assert_eq!(channels[0].icon, ChannelIcon::Local);
    assert_eq!(catalog.lookup_icon("101").as_deref(), Some("imagecache/1"));

    assert_eq!(channels[1].icon_url(), Some("http://picons.example/zdf.png"));
    assert_eq!(catalog.lookup_icon("102"), None);

    assert_eq!(channels[2].kind, ChannelKind::Radio);
    assert_eq!(channels[2].number.as_deref(), Some("301.2"));

    catalog.set_other_type_policy(OtherTypePolicy::Tv);
    let channels = catalog.build(&CancellationToken::new()).await;
    assert_eq!(channels.len(), 4);
    assert_eq!(channels[3].id, "106");
    assert_eq!(channels[3].kind, ChannelKind::Tv);
}

#[tokio::test]
async fn test_tuner_hooks_invoked() {
    let tuner = CountingTuner::default();
    let added = Arc::clone(&tuner.added);
    let cleaned = Arc::clone(&tuner.cleaned);

    let catalog = ChannelCatalog::with_tuner(CatalogConfig::default(), tuner);
    catalog.add(channel_add(1, 1, "A", "SDTV")).await;
    catalog.add(channel_update(2)).await;
    catalog.add(HtsMessage::new()).await;
    assert_eq!(added.load(Ordering::SeqCst), 3);

    catalog.clean().await;
    assert_eq!(cleaned.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_add_and_build() {
    let catalog = Arc::new(ChannelCatalog::new());

    let writer = {
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move {
            for id in 1..=200 {
                catalog.add(channel_add(id, id, "Ch", "SDTV")).await;
                catalog
                    .add(channel_update(id).with("channelName", format!("Channel {}", id)))
                    .await;
            }
        })
    };

    let mut builds = Vec::new();
    for _ in 0..8 {
        builds.push(catalog.build_catalog(CancellationToken::new()));
    }

    for build in builds {
        let channels = build.await.unwrap();
        // A build never sees a torn id sequence
        for (i, channel) in channels.iter().enumerate() {
            assert_eq!(channel.id, (i + 1).to_string());
        }
    }

    writer.await.unwrap();
    let channels = catalog.build(&CancellationToken::new()).await;
    assert_eq!(channels.len(), 200);
    assert!(channels
        .iter()
        .all(|c| c.name == Some(format!("Channel {}", c.id))));
}

#[tokio::test]
async fn test_clean_then_build_is_empty() {
    let catalog = Arc::new(ChannelCatalog::new());
    for id in 1..=3 {
        catalog.add(channel_add(id, id, "Ch", "HDTV")).await;
    }

    catalog.clean().await;
    let channels = catalog
        .build_catalog(CancellationToken::new())
        .await
        .unwrap();
    assert!(channels.is_empty());
}

#[test]
fn test_add_outcomes_blocking() {
    let catalog = ChannelCatalog::new();

    tokio_test::block_on(async {
        assert_eq!(
            catalog.add(channel_add(1, 5, "A", "HDTV")).await,
            AddOutcome::Created
        );
        assert_eq!(catalog.add(channel_update(1)).await, AddOutcome::Merged);
        assert_eq!(catalog.add(channel_update(2)).await, AddOutcome::Dropped);
        assert_eq!(
            catalog.add(HtsMessage::new().with("channelId", "x")).await,
            AddOutcome::Rejected
        );
    });
}
