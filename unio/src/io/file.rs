//! File driver.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::core::mode::{CallMode, Op};
use crate::core::open_flags::OpenMode;
use crate::io::transfer::{read_some, write_fully};

/// An open file plus its receive buffer.
#[derive(Debug)]
pub struct FileEntry {
    state: Mutex<FileState>,
}

#[derive(Debug)]
struct FileState {
    file: File,
    buf: Box<[u8]>,
}

impl FileEntry {
    /// Open `path` with the resolved access mode.
    ///
    /// Under a mode where `open` does not suspend, the platform call is made
    /// with blocking std I/O and the handle is adopted by tokio afterwards.
    pub async fn open(
        path: &Path,
        access: OpenMode,
        call: CallMode,
        buffer_size: usize,
    ) -> Result<Self> {
        let file = if call.suspends(Op::Open) {
            let mut options = tokio::fs::OpenOptions::new();
            options
                .read(access.read)
                .write(access.write)
                .append(access.append)
                .truncate(access.truncate)
                .create(access.create)
                .create_new(access.create_new);
            options
                .open(path)
                .await
                .with_context(|| format!("open {}", path.display()))?
        } else {
            let std_file = std::fs::OpenOptions::new()
                .read(access.read)
                .write(access.write)
                .append(access.append)
                .truncate(access.truncate)
                .create(access.create)
                .create_new(access.create_new)
                .open(path)
                .with_context(|| format!("open {}", path.display()))?;
            File::from_std(std_file)
        };
        Ok(Self {
            state: Mutex::new(FileState {
                file,
                buf: vec![0; buffer_size].into_boxed_slice(),
            }),
        })
    }

    /// Read the next chunk and lend it to `f`. An empty slice means end-of-file.
    pub async fn read_with<T>(&self, f: impl FnOnce(&[u8]) -> T) -> Result<T> {
        let mut state = self.state.lock().await;
        let FileState { file, buf } = &mut *state;
        let n = read_some(file, buf).await.context("read file")?;
        Ok(f(&buf[..n]))
    }

    /// Write all of `data` and flush it to the platform before returning.
    pub async fn write(&self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock().await;
        write_fully(&mut state.file, data)
            .await
            .context("write file")?;
        state.file.flush().await.context("flush file")
    }

    /// Finish outstanding work ahead of release.
    ///
    /// `write` already flushes, so the non-suspending path has nothing to
    /// await; the descriptor closes when the last reference drops.
    pub async fn close(&self, call: CallMode) -> Result<()> {
        if call.suspends(Op::Close) {
            let mut state = self.state.lock().await;
            state.file.flush().await.context("flush file")?;
        }
        Ok(())
    }

    pub async fn buffer_len(&self) -> usize {
        self.state.lock().await.buf.len()
    }
}
