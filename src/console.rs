use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

const EOF_BACKOFF: Duration = Duration::from_millis(100);

/// Read `input` one byte at a time until a newline arrives.
///
/// End of stream is not a stop signal: the read is retried after a short
/// pause, so a terminal that sent ^D keeps working.
pub async fn wait_for_newline<R>(mut input: R) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut byte = [0u8; 1];
    let mut eof_seen = false;
    loop {
        match input.read(&mut byte).await {
            Ok(0) => {
                if !eof_seen {
                    tracing::debug!(
                        "console input reached end of stream; still waiting for newline"
                    );
                    eof_seen = true;
                }
                tokio::time::sleep(EOF_BACKOFF).await;
            }
            Ok(_) if byte[0] == b'\n' => return Ok(()),
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::ReadBuf;

    use super::*;

    /// Reports end of stream `eofs` times before yielding `data`.
    struct FlakyInput {
        eofs: usize,
        data: &'static [u8],
        fail: Option<io::ErrorKind>,
    }

    impl AsyncRead for FlakyInput {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if let Some(kind) = self.fail.take() {
                return Poll::Ready(Err(io::Error::from(kind)));
            }
            if self.eofs > 0 {
                self.eofs -= 1;
                return Poll::Ready(Ok(()));
            }
            let n = buf.remaining().min(self.data.len());
            buf.put_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_first_newline() {
        let mut input: &[u8] = b"abc\nrest";
        wait_for_newline(&mut input).await.unwrap();
        assert_eq!(input, &b"rest"[..]);
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_stream_is_retried() {
        let mut input = FlakyInput {
            eofs: 3,
            data: b"\n",
            fail: None,
        };
        wait_for_newline(&mut input).await.unwrap();
        assert_eq!(input.eofs, 0);
        assert!(input.data.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn interrupted_read_is_retried() {
        let mut input = FlakyInput {
            eofs: 0,
            data: b"x\n",
            fail: Some(io::ErrorKind::Interrupted),
        };
        wait_for_newline(&mut input).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn other_read_errors_are_returned() {
        let input = FlakyInput {
            eofs: 0,
            data: b"\n",
            fail: Some(io::ErrorKind::BrokenPipe),
        };
        let err = wait_for_newline(input).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
