//! Collaborator contract for fetching raw markup.
//!
//! Network access stays outside this crate: the pipelines only consume
//! decoded text handed to them through this trait. Authenticated sessions,
//! user-agent headers, cookie handling and retry policy all live in the
//! implementation.

use url::Url;

use crate::error::Result;

/// Supplies decoded markup text for a URL.
///
/// Implementations signal a permanently unavailable resource with
/// [`Error::Unavailable`](crate::Error::Unavailable), which the MPF
/// pagination loop relies on to detect the page past the last one, and any
/// other failure with [`Error::Fetch`](crate::Error::Fetch).
pub trait Fetcher {
    /// Fetch the resource at `url` and return its decoded text content.
    fn fetch(&mut self, url: &Url) -> Result<String>;
}
