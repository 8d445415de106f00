//! File streaming module
//!
//! Streams a byte span of a file as a response body. Read errors surface as
//! body errors, which makes hyper abort the connection.

use std::io::SeekFrom;
use std::path::Path;

use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::response::ServeBody;

/// Open `path` and stream `len` bytes starting at `start`
pub async fn file_body(path: &Path, start: u64, len: u64) -> std::io::Result<ServeBody> {
    let mut file = File::open(path).await?;
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }

    let stream = ReaderStream::new(file.take(len)).map_ok(Frame::data);
    Ok(StreamBody::new(stream).boxed())
}
