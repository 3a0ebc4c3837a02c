//! Turns a streaming response body into text fragments.

use futures_util::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;

use super::decoder::Utf8Decoder;
use crate::error::StreamError;
use crate::traits::ByteStream;

/// Lazy, finite, non-restartable sequence of decoded text fragments.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, StreamError>> + Send>>;

struct ReaderState {
    body: ByteStream,
    decoder: Utf8Decoder,
    idle_timeout: Duration,
    done: bool,
}

/// Wrap a response body in a fragment stream.
///
/// Fails with [`StreamError::Unavailable`] when there is no body. The
/// returned stream ends after the body ends or after the first transport
/// error, which is yielded as [`StreamError::Interrupted`]. Waiting longer
/// than `idle_timeout` for a chunk counts as a transport error.
pub fn read_text_stream(
    body: Option<ByteStream>,
    idle_timeout: Duration,
) -> Result<TextStream, StreamError> {
    let body = body.ok_or(StreamError::Unavailable)?;
    let state = ReaderState {
        body,
        decoder: Utf8Decoder::new(),
        idle_timeout,
        done: false,
    };

    let fragments = stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }
        loop {
            let next = match tokio::time::timeout(state.idle_timeout, state.body.next()).await {
                Ok(next) => next,
                Err(_) => {
                    state.done = true;
                    tracing::warn!(
                        idle_secs = state.idle_timeout.as_secs_f64(),
                        "stream: no data before read timeout"
                    );
                    let err = StreamError::Interrupted {
                        message: format!(
                            "no data received for {:.1}s",
                            state.idle_timeout.as_secs_f64()
                        ),
                    };
                    return Some((Err(err), state));
                }
            };
            match next {
                Some(Ok(chunk)) => {
                    let text = state.decoder.decode(&chunk);
                    if text.is_empty() {
                        // chunk held only part of a character
                        continue;
                    }
                    return Some((Ok(text), state));
                }
                Some(Err(err)) => {
                    state.done = true;
                    let err = StreamError::Interrupted {
                        message: err.to_string(),
                    };
                    return Some((Err(err), state));
                }
                None => {
                    state.done = true;
                    let tail = state.decoder.finish();
                    if tail.is_empty() {
                        return None;
                    }
                    return Some((Ok(tail), state));
                }
            }
        }
    });

    Ok(Box::pin(fragments))
}
