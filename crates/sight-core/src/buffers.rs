/// Reusable scratch storage for [`crate::find_all`].
///
/// Owned by the caller and kept across frames so per-frame detection doesn't allocate.
/// `raw` has a fixed capacity chosen up front and is never resized: when a range query
/// returns more candidates than it can hold, the surplus is dropped. `output` holds the
/// visible targets of the last call.
///
/// A buffer must not be shared by two detections running at the same time; `&mut` access
/// enforces this.
#[derive(Debug, Clone)]
pub struct QueryBuffers<H> {
    raw: Box<[Option<H>]>,
    output: Vec<H>,
}

impl<H: Copy> QueryBuffers<H> {
    /// Buffers able to consider up to `capacity` candidates per call.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: vec![None; capacity].into_boxed_slice(),
            output: Vec::with_capacity(capacity),
        }
    }

    /// Maximum number of candidates examined per call.
    pub fn capacity(&self) -> usize {
        self.raw.len()
    }

    /// Visible targets found by the last call, in provider order.
    pub fn output(&self) -> &[H] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<H> {
        core::mem::take(&mut self.output)
    }

    pub fn clear(&mut self) {
        self.raw.fill(None);
        self.output.clear();
    }

    pub(crate) fn split_mut(&mut self) -> (&mut [Option<H>], &mut Vec<H>) {
        (&mut self.raw[..], &mut self.output)
    }
}
