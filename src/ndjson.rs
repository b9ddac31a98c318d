use crate::util::open_with_backoff;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use zstd::stream::read::Decoder;

/// Minimal NDJSON reader with buffering and `\r?\n` trimming.
/// Transparently decodes `.zst` inputs; anything else is read as plain text.
pub struct NdjsonReader {
    rdr: Box<dyn BufRead>,
    line_no: usize,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let cap = buf_bytes.max(8 * 1024);
        let f = open_with_backoff(path, 16, 50)?;
        let rdr: Box<dyn BufRead> = if is_zst(path) {
            let mut decoder = Decoder::new(f)?;
            // Reddit dumps are compressed with long windows.
            decoder.window_log_max(31)?;
            Box::new(BufReader::with_capacity(cap, decoder))
        } else {
            Box::new(BufReader::with_capacity(cap, f))
        };
        Ok(Self { rdr, line_no: 0 })
    }

    /// Read the next line into `buf`. Returns the number of raw bytes read (0 on EOF).
    /// Strips trailing `\r?\n`.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n == 0 { return Ok(0); }
        self.line_no += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') { buf.pop(); }
        }
        Ok(n)
    }

    /// 1-based number of the line most recently returned by `read_line`.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

pub fn is_zst(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("zst")).unwrap_or(false)
}
