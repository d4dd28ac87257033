// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	source::{TokenFuture, TokenSource},
};

/// Caching decorator that reuses a token until it nears expiry.
///
/// The cache sits behind an async mutex held for the whole refresh, so concurrent callers
/// wait for the one in-flight exchange instead of starting their own.
pub struct ReuseTokenSource<S> {
	inner: S,
	cached: AsyncMutex<Option<BearerToken>>,
	preemptive_window: Duration,
}
impl<S> ReuseTokenSource<S> {
	/// Tokens expiring within this window are treated as stale.
	pub const DEFAULT_PREEMPTIVE_WINDOW: Duration = Duration::seconds(10);

	/// Wraps `inner` with an empty cache.
	pub fn new(inner: S) -> Self {
		Self {
			inner,
			cached: AsyncMutex::new(None),
			preemptive_window: Self::DEFAULT_PREEMPTIVE_WINDOW,
		}
	}

	/// Wraps `inner` with a cache seeded by `token`.
	pub fn with_token(inner: S, token: BearerToken) -> Self {
		Self { cached: AsyncMutex::new(Some(token)), ..Self::new(inner) }
	}

	/// Overrides the preemptive refresh window; negative values become zero.
	pub fn with_preemptive_window(mut self, window: Duration) -> Self {
		self.preemptive_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}

	/// Drops the cached token so the next call exchanges again.
	pub async fn invalidate(&self) {
		self.cached.lock().await.take();
	}

	/// Wrapped source.
	pub fn inner(&self) -> &S {
		&self.inner
	}

	/// Determines whether `token` must be replaced at `now`.
	pub fn should_refresh(&self, token: &BearerToken, now: OffsetDateTime) -> bool {
		token.expires_within(self.preemptive_window, now)
	}
}
impl<S> TokenSource for ReuseTokenSource<S>
where
	S: TokenSource,
{
	fn token(&self) -> TokenFuture<'_> {
		Box::pin(async move {
			let mut cached = self.cached.lock().await;

			if let Some(token) = cached.as_ref() {
				if !self.should_refresh(token, OffsetDateTime::now_utc()) {
					return Ok(token.clone());
				}
			}

			let fresh = self.inner.token().await?;

			*cached = Some(fresh.clone());

			Ok(fresh)
		})
	}
}
impl<S> Debug for ReuseTokenSource<S> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReuseTokenSource")
			.field("preemptive_window", &self.preemptive_window)
			.finish_non_exhaustive()
	}
}
