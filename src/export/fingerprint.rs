use crate::foundation::core::FrameIndex;
use crate::render::backend::FrameRGBA;
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x3c1e_5ce7_a9d4_0b27;

/// Stable 128-bit fingerprint of an exported frame sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ExportDigest {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for ExportDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Incremental digest over frames in capture order.
///
/// Hashes index, dimensions, alpha convention and pixel bytes of every frame.
pub struct FrameDigest {
    inner: Xxh3,
    frames: u64,
}

impl FrameDigest {
    pub fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
            frames: 0,
        }
    }

    pub fn push(&mut self, idx: FrameIndex, frame: &FrameRGBA) {
        self.inner.update(&idx.0.to_le_bytes());
        self.inner.update(&frame.width.to_le_bytes());
        self.inner.update(&frame.height.to_le_bytes());
        self.inner.update(&[u8::from(frame.premultiplied)]);
        self.inner.update(&(frame.data.len() as u64).to_le_bytes());
        self.inner.update(&frame.data);
        self.frames += 1;
    }

    /// Frames pushed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn finish(&self) -> ExportDigest {
        let mut tail = self.inner.clone();
        tail.update(&self.frames.to_le_bytes());
        let v = tail.digest128();
        ExportDigest {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

impl Default for FrameDigest {
    fn default() -> Self {
        Self::new()
    }
}

/// Digest of a single frame.
pub fn fingerprint_frame(idx: FrameIndex, frame: &FrameRGBA) -> ExportDigest {
    let mut d = FrameDigest::new();
    d.push(idx, frame);
    d.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/export/fingerprint.rs"]
mod tests;
