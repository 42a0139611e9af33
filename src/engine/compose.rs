//! Fetch composition
//!
//! Chains a second fetch onto the aggregated result of a first one and
//! exposes the pair as a single event stream.

use super::types::FetchEvent;
use super::FetchStream;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// Runs `outer` to completion, then the fetch `extract` builds from its
/// result
///
/// Only the outer fetch's terminal outcome is observed: its `start`,
/// `newPage` and `end` are swallowed, its `error` is forwarded and ends the
/// composite. Every event of the inner fetch is forwarded as is, so the
/// composite looks exactly like the inner fetch.
pub struct FetchComposer<F> {
    outer: FetchStream,
    extract: F,
}

impl<F> FetchComposer<F>
where
    F: FnOnce(Vec<JsonValue>) -> Result<FetchStream> + Send + 'static,
{
    /// Compose `outer` with the inner fetch built by `extract`
    pub fn new(outer: FetchStream, extract: F) -> Self {
        Self { outer, extract }
    }

    /// The composite event stream
    pub fn into_stream(self) -> FetchStream {
        let Self { mut outer, extract } = self;

        let inner = async move {
            while let Some(event) = outer.next().await {
                match event {
                    FetchEvent::AllPages(items) => {
                        debug!("Outer fetch done with {} items, starting inner fetch", items.len());
                        return match extract(items) {
                            Ok(inner) => inner,
                            Err(e) => {
                                warn!("Could not build inner fetch: {e}");
                                FetchStream::failed(e)
                            }
                        };
                    }
                    FetchEvent::Error(e) => return FetchStream::failed(e),
                    FetchEvent::Start | FetchEvent::NewPage(_) | FetchEvent::End => {}
                }
            }
            FetchStream::failed(Error::Incomplete)
        };

        FetchStream::new(stream::once(inner).flatten())
    }
}
