use rand::Rng;
use std::future::Future;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Items stay in the cache after being drawn.
    WithReplacement,
    /// Drawn items are removed; the cache refills once it runs dry.
    WithoutReplacement,
}

/// A lazily filled pool of items to draw from at random.
pub struct DrawCache<T> {
    items: Mutex<Vec<T>>,
    mode: DrawMode,
}

impl<T: Clone + Send> DrawCache<T> {
    pub fn new(mode: DrawMode) -> Self {
        Self::prefilled(mode, Vec::new())
    }

    pub fn prefilled(mode: DrawMode, items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
            mode,
        }
    }

    /// Draws one item, calling `fetch` first only if the cache is empty.
    /// `Ok(None)` means even a fresh fetch produced nothing.
    pub async fn draw<F, Fut, E>(&self, fetch: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        let mut items = self.items.lock().await;
        if items.is_empty() {
            *items = fetch().await?;
        }
        if items.is_empty() {
            return Ok(None);
        }
        let index = rand::thread_rng().gen_range(0..items.len());
        Ok(Some(match self.mode {
            DrawMode::WithReplacement => items[index].clone(),
            DrawMode::WithoutReplacement => items.remove(index),
        }))
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn fetch(counter: &AtomicUsize) -> Result<Vec<&'static str>, ()> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["a", "b", "c"])
    }

    #[tokio::test]
    async fn without_replacement_drains_then_refills() {
        let fetches = AtomicUsize::new(0);
        let cache = DrawCache::new(DrawMode::WithoutReplacement);
        let mut drawn = Vec::new();
        for _ in 0..3 {
            drawn.push(cache.draw(|| fetch(&fetches)).await.unwrap().unwrap());
        }
        drawn.sort_unstable();
        assert_eq!(drawn, vec!["a", "b", "c"]);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 0);

        cache.draw(|| fetch(&fetches)).await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn with_replacement_fetches_once() {
        let fetches = AtomicUsize::new(0);
        let cache = DrawCache::new(DrawMode::WithReplacement);
        for _ in 0..10 {
            let item = cache.draw(|| fetch(&fetches)).await.unwrap().unwrap();
            assert!(["a", "b", "c"].contains(&item));
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 3);
    }

    #[tokio::test]
    async fn prefilled_cache_is_not_fetched() {
        let cache = DrawCache::prefilled(DrawMode::WithReplacement, vec!["x"]);
        let item = cache
            .draw(|| async { Err::<Vec<&str>, &str>("must not fetch") })
            .await
            .unwrap();
        assert_eq!(item, Some("x"));
    }

    #[tokio::test]
    async fn empty_fetch_draws_nothing() {
        let cache: DrawCache<String> = DrawCache::new(DrawMode::WithoutReplacement);
        let item = cache.draw(|| async { Ok::<_, ()>(Vec::new()) }).await.unwrap();
        assert_eq!(item, None);
    }

    #[tokio::test]
    async fn fetch_errors_are_returned() {
        let cache: DrawCache<String> = DrawCache::new(DrawMode::WithReplacement);
        let result = cache.draw(|| async { Err::<Vec<String>, _>("offline") }).await;
        assert_eq!(result, Err("offline"));
    }
}
