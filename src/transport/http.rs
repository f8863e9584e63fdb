use std::io::{self, Read, Write};

use crate::constants::archive::DOWNLOAD_BUFFER_BYTES;

/// Byte counters reported while an archive is streamed to disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes written so far.
    pub bytes_fetched: u64,
    /// Size announced by the server, when known.
    pub total_bytes: Option<u64>,
}

impl DownloadProgress {
    /// Completed share in `0.0..=1.0`, or `None` when the size is unknown.
    pub fn fraction(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => {
                Some((self.bytes_fetched as f64 / total as f64).clamp(0.0, 1.0))
            }
            _ => None,
        }
    }
}

/// Source of archive bytes.
pub trait Downloader {
    /// Stream the body at `url` into `sink`, calling `progress` after every
    /// chunk, and return the number of bytes written.
    fn download(
        &self,
        url: &str,
        sink: &mut dyn Write,
        progress: &mut dyn FnMut(DownloadProgress),
    ) -> io::Result<u64>;
}

/// Blocking HTTP downloader backed by `ureq`.
#[derive(Clone, Debug)]
pub struct HttpDownloader {
    buffer_bytes: usize,
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self {
            buffer_bytes: DOWNLOAD_BUFFER_BYTES,
        }
    }
}

impl Downloader for HttpDownloader {
    fn download(
        &self,
        url: &str,
        sink: &mut dyn Write,
        progress: &mut dyn FnMut(DownloadProgress),
    ) -> io::Result<u64> {
        let response = ureq::get(url)
            .call()
            .map_err(|err| io::Error::other(format!("request to '{url}' failed: {err}")))?;
        let total_bytes = response
            .headers()
            .get("content-length")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let mut reader = response.into_body().into_reader();
        copy_with_progress(&mut reader, sink, total_bytes, self.buffer_bytes, progress)
    }
}

/// Copy `reader` into `writer` in `buffer_bytes` chunks, reporting progress.
pub fn copy_with_progress(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    total_bytes: Option<u64>,
    buffer_bytes: usize,
    progress: &mut dyn FnMut(DownloadProgress),
) -> io::Result<u64> {
    let mut buffer = vec![0u8; buffer_bytes.max(1)];
    let mut bytes_fetched = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        writer.write_all(&buffer[..read])?;
        bytes_fetched = bytes_fetched.saturating_add(read as u64);
        progress(DownloadProgress {
            bytes_fetched,
            total_bytes,
        });
    }
    writer.flush()?;
    Ok(bytes_fetched)
}
