//! Weighted random selection.

use crate::error::{Result, UtilsError};
use rand::Rng;

/// Picks items at random, each with probability `weight / total weight`.
///
/// ```
/// use fieldwork_utils::WeightedRandomSelector;
///
/// let mut banners = WeightedRandomSelector::new();
/// banners.add_item("spring", Some(3))?.add_item("summer", None)?;
///
/// let shown = banners.get()?;
/// assert!(["spring", "summer"].contains(shown));
/// # Ok::<(), fieldwork_utils::UtilsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WeightedRandomSelector<T> {
    items: Vec<(T, u32)>,
    total_weight: u64,
    default_weight: u32,
}

impl<T> WeightedRandomSelector<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            total_weight: 0,
            default_weight: 1,
        }
    }

    /// Build a selector from `(item, weight)` pairs
    pub fn from_items<I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, Option<u32>)>,
    {
        let mut selector = Self::new();
        selector.add_items(items)?;
        Ok(selector)
    }

    /// Weight used when `add_item` is given none
    pub fn set_default_weight(&mut self, weight: u32) -> Result<&mut Self> {
        if weight == 0 {
            return Err(UtilsError::InvalidWeight);
        }
        self.default_weight = weight;
        Ok(self)
    }

    /// Add an item; `None` uses the default weight
    pub fn add_item(&mut self, item: T, weight: Option<u32>) -> Result<&mut Self> {
        let weight = weight.unwrap_or(self.default_weight);
        if weight == 0 {
            return Err(UtilsError::InvalidWeight);
        }
        self.items.push((item, weight));
        self.total_weight += u64::from(weight);
        Ok(self)
    }

    /// Add several items, stopping at the first invalid weight
    pub fn add_items<I>(&mut self, items: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (T, Option<u32>)>,
    {
        let mut added = 0;
        for (item, weight) in items {
            self.add_item(item, weight)?;
            added += 1;
        }
        if added == 0 {
            return Err(UtilsError::NoItems);
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Pick one item
    pub fn get(&self) -> Result<&T> {
        self.get_with(&mut rand::rng())
    }

    /// Pick one item using `rng`
    pub fn get_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&T> {
        if self.total_weight == 0 {
            return Err(UtilsError::Empty);
        }

        let mut remaining = rng.random_range(1..=self.total_weight);
        for (item, weight) in &self.items {
            let weight = u64::from(*weight);
            if remaining <= weight {
                return Ok(item);
            }
            remaining -= weight;
        }

        // remaining never exceeds the total weight
        Err(UtilsError::Empty)
    }

    /// Pick `count` items independently
    pub fn get_multi(&self, count: usize) -> Result<Vec<&T>> {
        let mut rng = rand::rng();
        self.get_multi_with(&mut rng, count)
    }

    pub fn get_multi_with<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Result<Vec<&T>> {
        if count == 0 {
            return Err(UtilsError::InvalidCount);
        }
        (0..count).map(|_| self.get_with(rng)).collect()
    }
}

impl<T> Default for WeightedRandomSelector<T> {
    fn default() -> Self {
        Self::new()
    }
}
