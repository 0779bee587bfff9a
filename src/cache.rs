//! Bounded memoizing cache with strict least-recently-used eviction.
//!
//! [`LruCache`] is the unsynchronized structure: a hash map from key to slot index plus an
//! index-linked doubly-linked recency list stored in a `Vec`. [`MemoCache`] wraps it in a single
//! mutex and adds the get-or-compute contract used by the color path. Compute failures are never
//! cached, so the next lookup for the same key computes again.

// std
use std::borrow::Borrow;
// self
use crate::_prelude::*;

const NIL: usize = usize::MAX;

struct Node<K, V> {
	key: K,
	value: V,
	prev: usize,
	next: usize,
}

/// Fixed-capacity map that evicts the least recently used entry on overflow.
///
/// Reads through [`LruCache::get`] count as a use; [`LruCache::peek`] does not.
pub struct LruCache<K, V> {
	map: HashMap<K, usize>,
	nodes: Vec<Node<K, V>>,
	// Most recently used.
	head: usize,
	// Least recently used.
	tail: usize,
	capacity: usize,
}
impl<K, V> LruCache<K, V>
where
	K: Clone + Hash + Eq,
{
	/// Creates a cache holding at most `capacity` entries (a zero capacity is treated as one).
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);

		Self {
			map: HashMap::with_capacity(capacity),
			nodes: Vec::with_capacity(capacity),
			head: NIL,
			tail: NIL,
			capacity,
		}
	}

	/// Maximum number of entries.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Current number of entries.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns `true` when the cache holds no entries.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Returns `true` if `key` is cached, without touching its recency.
	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		self.map.contains_key(key)
	}

	/// Returns the value for `key` and marks it most recently used.
	pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		let idx = *self.map.get(key)?;

		self.promote(idx);

		Some(&self.nodes[idx].value)
	}

	/// Returns the value for `key` without touching its recency.
	pub fn peek<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		self.map.get(key).map(|&idx| &self.nodes[idx].value)
	}

	/// Inserts or replaces `key`, marking it most recently used.
	///
	/// Returns the entry evicted to make room, if any. Replacing an existing key never evicts.
	pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
		if let Some(&idx) = self.map.get(&key) {
			self.nodes[idx].value = value;
			self.promote(idx);

			return None;
		}

		let evicted = if self.nodes.len() >= self.capacity { self.pop_lru() } else { None };
		let idx = self.nodes.len();

		self.nodes.push(Node { key: key.clone(), value, prev: NIL, next: NIL });
		self.attach_front(idx);
		self.map.insert(key, idx);

		evicted
	}

	/// Removes `key`, returning its value.
	pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		let idx = *self.map.get(key)?;

		Some(self.remove_at(idx).value)
	}

	/// Removes and returns the least recently used entry.
	pub fn pop_lru(&mut self) -> Option<(K, V)> {
		if self.tail == NIL {
			return None;
		}

		let node = self.remove_at(self.tail);

		Some((node.key, node.value))
	}

	/// Drops every entry.
	pub fn clear(&mut self) {
		self.map.clear();
		self.nodes.clear();
		self.head = NIL;
		self.tail = NIL;
	}

	/// Iterates entries from most to least recently used.
	pub fn iter(&self) -> Iter<'_, K, V> {
		Iter { nodes: &self.nodes, cursor: self.head }
	}

	/// Keys ordered from most to least recently used.
	pub fn keys_by_recency(&self) -> Vec<&K> {
		self.iter().map(|(key, _)| key).collect()
	}

	fn promote(&mut self, idx: usize) {
		if self.head != idx {
			self.detach(idx);
			self.attach_front(idx);
		}
	}

	fn detach(&mut self, idx: usize) {
		let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

		if prev == NIL {
			self.head = next;
		} else {
			self.nodes[prev].next = next;
		}
		if next == NIL {
			self.tail = prev;
		} else {
			self.nodes[next].prev = prev;
		}
	}

	fn attach_front(&mut self, idx: usize) {
		let old_head = self.head;

		self.nodes[idx].prev = NIL;
		self.nodes[idx].next = old_head;

		if old_head == NIL {
			self.tail = idx;
		} else {
			self.nodes[old_head].prev = idx;
		}

		self.head = idx;
	}

	fn remove_at(&mut self, idx: usize) -> Node<K, V> {
		self.detach(idx);

		let last = self.nodes.len() - 1;

		// `swap_remove` moves the last node into `idx`; relink everything that pointed at it.
		if idx != last {
			let (prev, next) = (self.nodes[last].prev, self.nodes[last].next);

			if prev == NIL {
				self.head = idx;
			} else {
				self.nodes[prev].next = idx;
			}
			if next == NIL {
				self.tail = idx;
			} else {
				self.nodes[next].prev = idx;
			}
			if let Some(slot) = self.map.get_mut(&self.nodes[last].key) {
				*slot = idx;
			}
		}

		let node = self.nodes.swap_remove(idx);

		self.map.remove(&node.key);

		node
	}
}
impl<K, V> Debug for LruCache<K, V>
where
	K: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let keys = Iter { nodes: &self.nodes, cursor: self.head }.map(|(key, _)| key);

		f.debug_struct("LruCache")
			.field("capacity", &self.capacity)
			.field("keys", &keys.collect::<Vec<_>>())
			.finish()
	}
}

/// Iterator over [`LruCache`] entries from most to least recently used.
pub struct Iter<'a, K, V> {
	nodes: &'a [Node<K, V>],
	cursor: usize,
}
impl<'a, K, V> Iterator for Iter<'a, K, V> {
	type Item = (&'a K, &'a V);

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.nodes.get(self.cursor)?;

		self.cursor = node.next;

		Some((&node.key, &node.value))
	}
}

/// Thread-safe memoizing wrapper around [`LruCache`].
///
/// One mutex guards the map and the recency list together. Computations run outside the lock;
/// when two callers compute the same key concurrently, the first stored value wins and both
/// receive it.
pub struct MemoCache<K, V> {
	inner: Mutex<LruCache<K, V>>,
}
impl<K, V> MemoCache<K, V>
where
	K: Clone + Hash + Eq,
	V: Clone,
{
	/// Creates a cache holding at most `capacity` entries.
	pub fn new(capacity: usize) -> Self {
		Self { inner: Mutex::new(LruCache::new(capacity)) }
	}

	/// Maximum number of entries.
	pub fn capacity(&self) -> usize {
		self.inner.lock().capacity()
	}

	/// Current number of entries.
	pub fn len(&self) -> usize {
		self.inner.lock().len()
	}

	/// Returns `true` when the cache holds no entries.
	pub fn is_empty(&self) -> bool {
		self.inner.lock().is_empty()
	}

	/// Returns `true` if `key` is cached, without touching its recency.
	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		self.inner.lock().contains(key)
	}

	/// Returns a copy of the value for `key`, marking it most recently used.
	pub fn get<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: ?Sized + Hash + Eq,
	{
		self.inner.lock().get(key).cloned()
	}

	/// Keys ordered from most to least recently used.
	pub fn keys_by_recency(&self) -> Vec<K> {
		self.inner.lock().iter().map(|(key, _)| key.clone()).collect()
	}

	/// Drops every entry.
	pub fn clear(&self) {
		self.inner.lock().clear();
	}

	/// Returns the cached value for `key`, or runs `compute` and caches its success.
	///
	/// A failed computation returns `None` and leaves the cache untouched.
	pub fn get_or_compute<E, F>(&self, key: K, compute: F) -> Option<V>
	where
		F: FnOnce() -> Result<V, E>,
	{
		if let Some(value) = self.get(&key) {
			return Some(value);
		}

		let value = compute().ok()?;

		Some(self.store_computed(key, value))
	}

	/// Async variant of [`MemoCache::get_or_compute`] for computations that suspend.
	pub async fn get_or_compute_async<E, F, Fut>(&self, key: K, compute: F) -> Option<V>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<V, E>>,
	{
		if let Some(value) = self.get(&key) {
			return Some(value);
		}

		let value = compute().await.ok()?;

		Some(self.store_computed(key, value))
	}

	fn store_computed(&self, key: K, value: V) -> V {
		let mut cache = self.inner.lock();

		if let Some(existing) = cache.get(&key) {
			return existing.clone();
		}

		cache.insert(key, value.clone());

		value
	}
}
impl<K, V> Debug for MemoCache<K, V>
where
	K: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("MemoCache").field(&*self.inner.lock()).finish()
	}
}
