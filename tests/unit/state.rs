use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::payload::{ColorPayload, RawId, SpeciesPayload};

// 2 species x 3 colors.
const TABLE: [u8; 8] = [2, 3, 0b0000_1001, 0, 64, 255, 8, 0];

struct CountingSource {
    calls: AtomicUsize,
    delay: Duration,
    fail: bool,
}

impl CountingSource {
    fn new(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
            fail: false,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for CountingSource {
    async fn fetch_validity_table(&self) -> DtiResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(DtiError::fetch("offline"));
        }
        Ok(TABLE.to_vec())
    }

    async fn fetch_species_and_colors(&self) -> DtiResult<SpeciesAndColorsPayload> {
        Ok(SpeciesAndColorsPayload {
            all_species: vec![
                SpeciesPayload {
                    id: RawId::Str("1".into()),
                    name: "Acara".into(),
                },
                SpeciesPayload {
                    id: RawId::Num(2),
                    name: "Aisha".into(),
                },
            ],
            all_colors: vec![
                ColorPayload {
                    id: RawId::Num(1),
                    name: "Alien".into(),
                },
                ColorPayload {
                    id: RawId::Num(2),
                    name: "Apple".into(),
                },
                ColorPayload {
                    id: RawId::Num(3),
                    name: "Asparagus".into(),
                },
            ],
        })
    }
}

fn cache(source: Arc<CountingSource>) -> StateCache {
    StateCache::new(source, CacheConfig::default())
}

#[test]
fn ttl_has_a_floor() {
    assert_eq!(CacheConfig::default().ttl, Duration::from_secs(3600));
    assert_eq!(CacheConfig::new(Duration::from_secs(1)).ttl, CacheConfig::MIN_TTL);
    assert_eq!(
        CacheConfig::new(Duration::from_secs(120)).ttl,
        Duration::from_secs(120)
    );
    let hand_built = CacheConfig {
        ttl: Duration::ZERO,
    };
    assert_eq!(hand_built.effective_ttl(), Duration::from_secs(10));
}

#[tokio::test]
async fn empty_cache_is_outdated_until_refreshed() {
    let source = Arc::new(CountingSource::new(Duration::ZERO));
    let state = cache(source.clone());
    assert!(state.is_outdated().await);
    assert!(state.last_refresh().await.is_none());

    state.refresh(false).await.unwrap();
    assert!(!state.is_outdated().await);
    assert!(state.last_refresh().await.is_some());

    state.refresh(false).await.unwrap();
    assert_eq!(source.calls(), 1);

    state.refresh(true).await.unwrap();
    assert_eq!(source.calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_misses_fetch_once() {
    let source = Arc::new(CountingSource::new(Duration::from_millis(50)));
    let state = Arc::new(cache(source.clone()));

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..16 {
        let state = Arc::clone(&state);
        tasks.spawn(async move {
            if i % 2 == 0 {
                state.species("acara").await.map(|s| s.id)
            } else {
                state.color("3").await.map(|c| c.id)
            }
        });
    }
    while let Some(res) = tasks.join_next().await {
        let id = res.unwrap().unwrap();
        assert!(id == 1 || id == 3);
    }
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn lookups_and_masks() {
    let state = cache(Arc::new(CountingSource::new(Duration::ZERO)));

    assert_eq!(state.species("AISHA").await.unwrap().id, 2);
    assert_eq!(state.color("2").await.unwrap().name, "Apple");
    assert!(matches!(
        state.species("Zafara").await.unwrap_err(),
        DtiError::UnknownSpecies(_)
    ));
    assert!(matches!(
        state.color("Coconut").await.unwrap_err(),
        DtiError::UnknownColor(_)
    ));

    assert_eq!(state.mask(1, 1).await.unwrap().bits(), 0b0000_1001);
    assert!(state.check(1, 1, Some(PetPose::HappyFem)).await.unwrap());
    assert!(!state.check(1, 1, Some(PetPose::SadFem)).await.unwrap());
    assert!(!state.check(1, 2, None).await.unwrap());
    assert!(state.check(1, 3, Some(PetPose::Unconverted)).await.unwrap());
    assert!(matches!(
        state.mask(3, 1).await.unwrap_err(),
        DtiError::InvalidArgument(_)
    ));

    let names = |v: Vec<Color>| v.into_iter().map(|c| c.name).collect::<Vec<_>>();
    assert_eq!(names(state.colors_for(1).await.unwrap()), ["Alien", "Asparagus"]);
    assert_eq!(names(state.missing_colors_for(1).await.unwrap()), ["Apple"]);

    let species: Vec<_> = state
        .species_for(1)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(species, ["Acara", "Aisha"]);
    assert!(state.missing_species_for(3).await.unwrap().iter().any(|s| s.id == 2));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_catalog() {
    let state = cache(Arc::new(CountingSource::new(Duration::ZERO)));
    state.refresh(false).await.unwrap();

    let failing = StateCache {
        source: Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            fail: true,
        }),
        config: state.config(),
        contents: Mutex::new(state.contents.lock().await.take()),
        refresh_lock: Mutex::new(()),
    };
    assert!(matches!(
        failing.refresh(true).await.unwrap_err(),
        DtiError::Fetch(_)
    ));
    assert_eq!(failing.species("1").await.unwrap().name, "Acara");
}

#[test]
fn corrupt_table_fails_catalog() {
    let names = SpeciesAndColorsPayload {
        all_species: vec![],
        all_colors: vec![],
    };
    assert!(matches!(
        Catalog::from_payloads(&[2, 3, 0], names).unwrap_err(),
        DtiError::CorruptTable(_)
    ));
}
