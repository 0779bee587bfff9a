//! Dominant-color lookups memoized by image URL.

// self
use crate::{
	_prelude::*,
	cache::MemoCache,
	obs::{self, OpKind, OpOutcome, OpSpan, debug_event, warn_event},
};

/// Boxed future returned by [`ColorExtractor::extract`].
pub type ColorFuture<'a> = Pin<Box<dyn Future<Output = Result<Rgb>> + 'a + Send>>;

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}
impl Rgb {
	/// Creates a color from its channels.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Formats the color as a lowercase `#rrggbb` string.
	pub fn to_hex(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}
impl Display for Rgb {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.to_hex())
	}
}

/// Downloads an image and derives its representative color.
///
/// Image fetching and pixel analysis are left to the implementor.
pub trait ColorExtractor
where
	Self: 'static + Send + Sync,
{
	/// Computes the dominant color of the image at `url`.
	fn extract<'a>(&'a self, url: &'a str) -> ColorFuture<'a>;
}

/// Memoizing front for a [`ColorExtractor`], keyed by image URL.
pub struct ColorCache {
	extractor: Arc<dyn ColorExtractor>,
	cache: MemoCache<String, Rgb>,
}
impl ColorCache {
	/// Creates a cache remembering at most `capacity` colors.
	pub fn new(extractor: Arc<dyn ColorExtractor>, capacity: usize) -> Self {
		Self { extractor, cache: MemoCache::new(capacity) }
	}

	/// Underlying memo cache.
	pub fn cache(&self) -> &MemoCache<String, Rgb> {
		&self.cache
	}

	/// Returns the dominant color for `url`, extracting it on a miss.
	///
	/// Extraction failures yield `None` and are not remembered, so the next lookup tries again.
	pub async fn dominant_color(&self, url: &str) -> Option<Rgb> {
		const KIND: OpKind = OpKind::ColorLookup;

		let span = OpSpan::new(KIND, "dominant_color");
		let extractor = &self.extractor;

		obs::record_outcome(KIND, OpOutcome::Attempt);

		let color = span
			.instrument(self.cache.get_or_compute_async(url.to_owned(), || async move {
				extractor.extract(url).await.inspect_err(|err| log_extraction_failure(url, err))
			}))
			.await;
		let outcome = if color.is_some() { OpOutcome::Success } else { OpOutcome::Failure };

		obs::record_outcome(KIND, outcome);
		debug_event!(url, outcome = outcome.as_str(), "Dominant color lookup finished.");

		color
	}
}
impl Debug for ColorCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ColorCache").field("cache", &self.cache).finish()
	}
}

fn log_extraction_failure(url: &str, err: &Error) {
	warn_event!(url, error = %err, "Dominant color extraction failed.");

	#[cfg(not(feature = "tracing"))]
	let _ = (url, err);
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::error::TransportError;

	#[derive(Default)]
	struct CountingExtractor {
		calls: AtomicUsize,
	}
	impl ColorExtractor for CountingExtractor {
		fn extract<'a>(&'a self, url: &'a str) -> ColorFuture<'a> {
			Box::pin(async move {
				self.calls.fetch_add(1, Ordering::SeqCst);

				if url.contains("broken") {
					return Err(TransportError::Io(std::io::Error::other("image truncated")).into());
				}

				Ok(Rgb::new(url.len() as u8, 0x20, 0xff))
			})
		}
	}

	#[test]
	fn hex_is_zero_padded_lowercase() {
		assert_eq!(Rgb::new(0x0a, 0xbc, 0x01).to_hex(), "#0abc01");
		assert_eq!(Rgb::new(255, 255, 255).to_string(), "#ffffff");
	}

	#[tokio::test]
	async fn repeated_lookups_extract_once() {
		let extractor = Arc::new(CountingExtractor::default());
		let colors = ColorCache::new(extractor.clone(), 10);
		let url = "https://img.example.com/cover.jpg";
		let first = colors.dominant_color(url).await;
		let second = colors.dominant_color(url).await;

		assert!(first.is_some());
		assert_eq!(first, second);
		assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn failures_are_retried_on_next_lookup() {
		let extractor = Arc::new(CountingExtractor::default());
		let colors = ColorCache::new(extractor.clone(), 10);
		let url = "https://img.example.com/broken.jpg";

		assert_eq!(colors.dominant_color(url).await, None);
		assert_eq!(colors.dominant_color(url).await, None);
		assert!(colors.cache().is_empty());
		assert_eq!(extractor.calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn capacity_bounds_remembered_colors() {
		let extractor = Arc::new(CountingExtractor::default());
		let colors = ColorCache::new(extractor.clone(), 10);

		for n in 0..11 {
			colors.dominant_color(&format!("https://img.example.com/{n}.jpg")).await;
		}

		assert_eq!(colors.cache().len(), 10);
		assert!(!colors.cache().contains("https://img.example.com/0.jpg"));

		colors.dominant_color("https://img.example.com/0.jpg").await;

		assert_eq!(extractor.calls.load(Ordering::SeqCst), 12);
	}
}
