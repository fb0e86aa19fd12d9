//! Keyframe map: ordered tick → callback chain storage.

use std::collections::BTreeMap;
use std::fmt;

use crate::tick::Tick;

/// A keyframe callback. Runs synchronously on the thread that drives the scheduler.
pub type KeyframeFn = Box<dyn FnMut()>;

/// Ordered mapping from tick to the callbacks registered there.
///
/// Registering at an occupied tick appends; callbacks at one tick always run in
/// registration order.
#[derive(Default)]
pub struct KeyframeMap {
    entries: BTreeMap<Tick, Vec<KeyframeFn>>,
}

impl KeyframeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callback` to the chain at `tick`, returning the new chain length.
    pub fn insert(&mut self, tick: Tick, callback: KeyframeFn) -> usize {
        let chain = self.entries.entry(tick).or_default();
        chain.push(callback);
        chain.len()
    }

    /// Drop the whole chain at `tick`. Returns how many callbacks were removed.
    pub fn remove(&mut self, tick: Tick) -> usize {
        self.entries.remove(&tick).map_or(0, |chain| chain.len())
    }

    #[inline]
    pub fn contains(&self, tick: Tick) -> bool {
        self.entries.contains_key(&tick)
    }

    /// Number of callbacks chained at `tick` (0 when absent).
    #[inline]
    pub fn chain_len(&self, tick: Tick) -> usize {
        self.entries.get(&tick).map_or(0, Vec::len)
    }

    /// Registered ticks in ascending order.
    pub fn ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        self.entries.keys().copied()
    }

    /// `(tick, chain length)` pairs in ascending tick order.
    pub fn chain_lengths(&self) -> impl Iterator<Item = (Tick, usize)> + '_ {
        self.entries.iter().map(|(t, chain)| (*t, chain.len()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke every callback at `tick` in order. Returns false if nothing is registered.
    pub(crate) fn fire(&mut self, tick: Tick) -> bool {
        match self.entries.get_mut(&tick) {
            Some(chain) => {
                for callback in chain.iter_mut() {
                    callback();
                }
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for KeyframeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.chain_lengths()).finish()
    }
}
