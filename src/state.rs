use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::foundation::error::{DtiError, DtiResult};
use crate::lookup::NameIndex;
use crate::model::{Color, Species};
use crate::payload::SpeciesAndColorsPayload;
use crate::pose::{BitField, PetPose};
use crate::validity::ValidityTable;

/// Where the cache gets its data from. Usually a thin wrapper over the DTI HTTP API.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Raw bytes of the binary validity table.
    async fn fetch_validity_table(&self) -> DtiResult<Vec<u8>>;

    /// The `{allSpecies, allColors}` query result.
    async fn fetch_species_and_colors(&self) -> DtiResult<SpeciesAndColorsPayload>;
}

/// Cache tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a refresh stays fresh.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Shortest accepted TTL.
    pub const MIN_TTL: Duration = Duration::from_secs(10);
    /// TTL used when none is given.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

    /// Build a config, clamping `ttl` up to [`CacheConfig::MIN_TTL`].
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ttl.max(Self::MIN_TTL),
        }
    }

    /// The TTL actually applied; fields set by hand are clamped here too.
    pub fn effective_ttl(&self) -> Duration {
        self.ttl.max(Self::MIN_TTL)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Self::DEFAULT_TTL,
        }
    }
}

/// Species, colors and the validity table from one refresh.
#[derive(Clone, Debug)]
pub struct Catalog {
    /// Every species, by id or name.
    pub species: NameIndex<Species>,
    /// Every color, by id or name.
    pub colors: NameIndex<Color>,
    /// Pose masks for every pair.
    pub table: ValidityTable,
}

impl Catalog {
    /// Assemble a catalog from raw API payloads.
    pub fn from_payloads(table: &[u8], names: SpeciesAndColorsPayload) -> DtiResult<Self> {
        let table = ValidityTable::decode(table)?;
        let species = names
            .all_species
            .into_iter()
            .map(Species::try_from)
            .collect::<DtiResult<Vec<_>>>()?;
        let colors = names
            .all_colors
            .into_iter()
            .map(Color::try_from)
            .collect::<DtiResult<Vec<_>>>()?;
        Ok(Self {
            species: NameIndex::new(species),
            colors: NameIndex::new(colors),
            table,
        })
    }

    /// Species by id or case-insensitive name.
    pub fn species(&self, key: &str) -> DtiResult<&Species> {
        self.species
            .resolve(key)
            .ok_or_else(|| DtiError::UnknownSpecies(key.to_owned()))
    }

    /// Color by id or case-insensitive name.
    pub fn color(&self, key: &str) -> DtiResult<&Color> {
        self.colors
            .resolve(key)
            .ok_or_else(|| DtiError::UnknownColor(key.to_owned()))
    }
}

struct Snapshot {
    catalog: Arc<Catalog>,
    refreshed_at: Instant,
}

/// TTL'd, shareable cache of the species/color catalog.
///
/// Reads go through a content lock. Refreshes are serialized by a second lock, and a caller that
/// queued behind an in-flight refresh re-checks freshness once it gets the lock, so concurrent
/// misses cost one fetch. A failed refresh keeps the previous catalog.
pub struct StateCache {
    source: Arc<dyn CatalogSource>,
    config: CacheConfig,
    contents: Mutex<Option<Snapshot>>,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for StateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StateCache {
    /// An empty cache; the first read triggers a refresh.
    pub fn new(source: Arc<dyn CatalogSource>, config: CacheConfig) -> Self {
        Self {
            source,
            config,
            contents: Mutex::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// The applied configuration.
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// `true` when nothing is cached or the last refresh is older than the TTL.
    pub async fn is_outdated(&self) -> bool {
        let contents = self.contents.lock().await;
        self.outdated(contents.as_ref())
    }

    /// When the cached catalog was fetched, if ever.
    pub async fn last_refresh(&self) -> Option<Instant> {
        self.contents.lock().await.as_ref().map(|s| s.refreshed_at)
    }

    fn outdated(&self, snapshot: Option<&Snapshot>) -> bool {
        snapshot.is_none_or(|s| s.refreshed_at.elapsed() >= self.config.effective_ttl())
    }

    /// Refetch the catalog when outdated, or always when `force` is set.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self, force: bool) -> DtiResult<Arc<Catalog>> {
        let _guard = self.refresh_lock.lock().await;

        if !force {
            let contents = self.contents.lock().await;
            if !self.outdated(contents.as_ref())
                && let Some(snapshot) = contents.as_ref()
            {
                tracing::trace!("catalog still fresh");
                return Ok(Arc::clone(&snapshot.catalog));
            }
        }

        let (table, names) = tokio::try_join!(
            self.source.fetch_validity_table(),
            self.source.fetch_species_and_colors(),
        )?;
        let catalog = Arc::new(Catalog::from_payloads(&table, names)?);
        tracing::debug!(
            species = catalog.species.len(),
            colors = catalog.colors.len(),
            "refreshed catalog"
        );

        *self.contents.lock().await = Some(Snapshot {
            catalog: Arc::clone(&catalog),
            refreshed_at: Instant::now(),
        });
        Ok(catalog)
    }

    /// The current catalog, refreshing first when outdated.
    pub async fn catalog(&self) -> DtiResult<Arc<Catalog>> {
        {
            let contents = self.contents.lock().await;
            if !self.outdated(contents.as_ref())
                && let Some(snapshot) = contents.as_ref()
            {
                return Ok(Arc::clone(&snapshot.catalog));
            }
        }
        self.refresh(false).await
    }

    /// Species by id or name.
    pub async fn species(&self, key: &str) -> DtiResult<Species> {
        self.catalog().await?.species(key).cloned()
    }

    /// Color by id or name.
    pub async fn color(&self, key: &str) -> DtiResult<Color> {
        self.catalog().await?.color(key).cloned()
    }

    /// Pose mask of a pair.
    pub async fn mask(&self, species_id: u32, color_id: u32) -> DtiResult<BitField> {
        self.catalog().await?.table.get_mask(species_id, color_id)
    }

    /// Whether the pair exists (`pose == None`) or has `pose`.
    pub async fn check(
        &self,
        species_id: u32,
        color_id: u32,
        pose: Option<PetPose>,
    ) -> DtiResult<bool> {
        self.catalog()
            .await?
            .table
            .is_valid(species_id, color_id, pose)
    }

    /// Colors that exist for a species.
    pub async fn colors_for(&self, species_id: u32) -> DtiResult<Vec<Color>> {
        self.colors_matching(species_id, true).await
    }

    /// Colors that do not exist for a species.
    pub async fn missing_colors_for(&self, species_id: u32) -> DtiResult<Vec<Color>> {
        self.colors_matching(species_id, false).await
    }

    /// Species that exist in a color.
    pub async fn species_for(&self, color_id: u32) -> DtiResult<Vec<Species>> {
        self.species_matching(color_id, true).await
    }

    /// Species that do not exist in a color.
    pub async fn missing_species_for(&self, color_id: u32) -> DtiResult<Vec<Species>> {
        self.species_matching(color_id, false).await
    }

    async fn colors_matching(&self, species_id: u32, valid: bool) -> DtiResult<Vec<Color>> {
        let catalog = self.catalog().await?;
        let ids = catalog.table.colors_for_species(species_id, valid)?;
        Ok(ids
            .into_iter()
            .filter_map(|id| catalog.colors.get(id).cloned())
            .collect())
    }

    async fn species_matching(&self, color_id: u32, valid: bool) -> DtiResult<Vec<Species>> {
        let catalog = self.catalog().await?;
        let ids = catalog.table.species_for_color(color_id, valid)?;
        Ok(ids
            .into_iter()
            .filter_map(|id| catalog.species.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
#[path = "../tests/unit/state.rs"]
mod tests;
