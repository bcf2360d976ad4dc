// src/market_data/cache.rs
use crate::domain::errors::MarketDataResult;
use crate::domain::models::{CacheKey, PriceSeries};
use crate::domain::repository::PriceRepository;
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

const MAX_CACHED_SERIES: usize = 64;

struct CacheState {
    entries: HashMap<CacheKey, Arc<PriceSeries>>,
    // Insertion order, oldest first
    order: VecDeque<CacheKey>,
}

/// In-process cache of fetched price histories keyed by ticker and date
/// range. Cloning shares the underlying storage.
#[derive(Clone)]
pub struct PriceCache {
    state: Arc<Mutex<CacheState>>,
    capacity: usize,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHED_SERIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            })),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<PriceSeries>> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: CacheKey, prices: Arc<PriceSeries>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.entries.insert(key.clone(), prices).is_none() {
            state.order.push_back(key);
        }

        // Evict the oldest entries once over capacity
        while state.entries.len() > self.capacity {
            match state.order.pop_front() {
                Some(oldest) => {
                    state.entries.remove(&oldest);
                    log::debug!("Evicted cached prices for {}", oldest.ticker);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return cached prices for the key, fetching them from `repository` on a
    /// miss. Failed fetches are not cached.
    pub async fn get_or_fetch(
        &self,
        repository: &dyn PriceRepository,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> MarketDataResult<Arc<PriceSeries>> {
        let key = CacheKey::new(ticker, start, end);
        if let Some(prices) = self.get(&key) {
            log::debug!("Cache hit for {} {}..{}", key.ticker, start, end);
            return Ok(prices);
        }

        log::info!(
            "Fetching {} prices from {} for {}..{}",
            key.ticker,
            repository.name(),
            start,
            end
        );
        let prices = Arc::new(repository.fetch_prices(&key.ticker, start, end).await?);
        self.insert(key, prices.clone());
        Ok(prices)
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new()
    }
}
