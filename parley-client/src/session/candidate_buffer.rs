use std::collections::VecDeque;

use parley_core::CandidateInit;

/// Holding pen for remote candidates that arrive before the remote
/// description is applied. Applying a candidate earlier would be rejected
/// by the negotiation primitive, so they wait here and flush in arrival
/// order once the description lands.
#[derive(Debug, Default)]
pub struct CandidateBuffer {
    queue: VecDeque<CandidateInit>,
    capacity: usize,
}

impl CandidateBuffer {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            capacity,
        }
    }

    /// Buffers a candidate, evicting and returning the oldest one when the
    /// buffer is full.
    pub fn push(&mut self, candidate: CandidateInit) -> Option<CandidateInit> {
        let evicted = if self.queue.len() == self.capacity {
            self.queue.pop_front()
        } else {
            None
        };
        self.queue.push_back(candidate);
        evicted
    }

    pub fn pop(&mut self) -> Option<CandidateInit> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
