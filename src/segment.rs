use itertools::Itertools;

/// Smallest segment worth handing to a worker.
pub const MIN_SEGMENT_SIZE: u64 = 1024;

/// A contiguous, line-aligned slice of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRange {
    pub offset: u64,
    pub length: u64,
}

impl FileRange {
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }

    pub fn slice<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        &bytes[self.offset as usize..self.end() as usize]
    }
}

/// Splits `bytes` into line-aligned ranges, aiming for one range per worker.
///
/// Each cut is made at the first line terminator found at least
/// `max(1024, len / workers)` bytes past the previous cut, so no line ever
/// crosses a range boundary. The last range runs to the end of the input,
/// with or without a trailing terminator.
pub fn partition(bytes: &[u8], workers: usize) -> Vec<FileRange> {
    let total_file_length = bytes.len() as u64;
    let block_size = MIN_SEGMENT_SIZE.max(total_file_length / workers.max(1) as u64);

    let mut boundaries = vec![0u64];
    let mut cursor = 0u64;
    while cursor < total_file_length {
        cursor = next_boundary(bytes, cursor, block_size);
        boundaries.push(cursor);
    }

    boundaries
        .into_iter()
        .tuple_windows::<(u64, u64)>()
        .map(|(start, end)| FileRange {
            offset: start,
            length: end - start,
        })
        .collect_vec()
}

fn next_boundary(bytes: &[u8], start: u64, block_size: u64) -> u64 {
    let total_file_length = bytes.len() as u64;
    let probe = start + block_size;
    if probe >= total_file_length {
        return total_file_length;
    }
    match bytes[probe as usize..].iter().position(|b| *b == b'\n') {
        Some(pos) => probe + pos as u64 + 1,
        None => total_file_length,
    }
}
