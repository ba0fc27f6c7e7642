/// Accumulates encoded chunks from a recorder until the recording stops.
///
/// Unlike a ring buffer nothing is ever dropped: the final artifact is the
/// concatenation of every chunk in arrival order. Wrap in
/// `Arc<parking_lot::Mutex<ChunkBuffer>>` to share with an encoder callback.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Empty chunks are ignored.
    pub fn push(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        self.total_bytes += chunk.len();
        self.chunks.push(chunk.to_vec());
    }

    /// Number of chunks buffered.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total bytes across all chunks.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Concatenate every chunk into one artifact and empty the buffer.
    pub fn take_concatenated(&mut self) -> Vec<u8> {
        let mut artifact = Vec::with_capacity(self.total_bytes);
        for chunk in self.chunks.drain(..) {
            artifact.extend_from_slice(&chunk);
        }
        self.total_bytes = 0;
        artifact
    }

    /// Discard everything buffered.
    pub fn reset(&mut self) {
        self.chunks.clear();
        self.total_bytes = 0;
    }
}
