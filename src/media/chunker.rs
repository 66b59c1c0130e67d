//! Size-bounded slicing of audio byte streams.

use std::path::Path;

use super::error::MediaError;
use crate::models::Chunk;

/// Split `data` into ordered chunks of at most `max_chunk_size` bytes.
///
/// Chunk names are derived from the base name of `file_name`:
/// `lecture.mp3` yields `lecture_chunk_000.mp3`, `lecture_chunk_001.mp3`, ...
/// Empty input yields no chunks.
pub fn split_into_chunks(
    data: &[u8],
    max_chunk_size: usize,
    file_name: &str,
) -> Result<Vec<Chunk>, MediaError> {
    if max_chunk_size == 0 {
        return Err(MediaError::InvalidChunkSize);
    }

    let (stem, extension) = name_parts(file_name);
    let chunks = data
        .chunks(max_chunk_size)
        .enumerate()
        .map(|(index, slice)| Chunk {
            index,
            name: chunk_name(&stem, extension.as_deref(), index),
            data: slice.to_vec(),
        })
        .collect();
    Ok(chunks)
}

/// Strip directories from `file_name` and split it into stem and extension.
fn name_parts(file_name: &str) -> (String, Option<String>) {
    let base = Path::new(file_name);
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("audio")
        .to_string();
    let extension = base
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_string);
    (stem, extension)
}

fn chunk_name(stem: &str, extension: Option<&str>, index: usize) -> String {
    match extension {
        Some(ext) => format!("{stem}_chunk_{index:03}.{ext}"),
        None => format!("{stem}_chunk_{index:03}"),
    }
}
