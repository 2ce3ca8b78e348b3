use std::io::{self, Read, Seek, SeekFrom};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar that implements the `Read` and `Seek` traits.
///
/// This wrapper of `indicatif`'s `ProgressBar` updates progress based on the
/// current offset within the file.
pub struct ReadProgress<R> {
    inner: R,
    progress_bar: ProgressBar,
}

impl<R> ReadProgress<R>
where
    R: Seek,
{
    pub fn new(mut read: R) -> io::Result<Self> {
        let len = read.seek(SeekFrom::End(0))? + 1;
        read.seek(SeekFrom::Start(0))?;
        let style = ProgressStyle::with_template("{bar} {bytes}/{total_bytes}")
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
        let progress_bar = ProgressBar::new(len).with_style(style);

        Ok(ReadProgress {
            inner: read,
            progress_bar,
        })
    }
}

impl<R> Read for ReadProgress<R>
where
    R: Read + Seek,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n_read = self.inner.read(buf)?;
        let pos = self.inner.stream_position()?;
        self.progress_bar.set_position(pos);
        Ok(n_read)
    }
}

impl<R> Seek for ReadProgress<R>
where
    R: Seek,
{
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let pos = self.inner.seek(pos)?;
        self.progress_bar.set_position(pos);
        Ok(pos)
    }
}

impl<R> Drop for ReadProgress<R> {
    fn drop(&mut self) {
        self.progress_bar.finish();
    }
}

/// Measure the number of sentences parsed per second.
///
/// The processing speed is logged when the instance is dropped.
pub struct ParserSpeed {
    start: Instant,
    n_sentences: usize,
    n_tokens: usize,
}

impl ParserSpeed {
    pub fn new() -> Self {
        ParserSpeed {
            start: Instant::now(),
            n_sentences: 0,
            n_tokens: 0,
        }
    }

    /// Count a parsed sentence of `n_tokens` tokens.
    pub fn count_sentence(&mut self, n_tokens: usize) {
        self.n_sentences += 1;
        self.n_tokens += n_tokens;
    }
}

impl Default for ParserSpeed {
    fn default() -> Self {
        ParserSpeed::new()
    }
}

impl Drop for ParserSpeed {
    fn drop(&mut self) {
        let elapsed_secs = self.start.elapsed().as_secs_f32();
        log::info!(
            "Parsed {} sentences ({} tokens) in {:.1}s ({:.1} sents/s)",
            self.n_sentences,
            self.n_tokens,
            elapsed_secs,
            self.n_sentences as f32 / elapsed_secs
        );
    }
}
