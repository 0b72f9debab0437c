/// Sequence number stamped on a request when it is issued.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

/// Orders responses of overlapping requests.
///
/// Requests are numbered at issue time. A response is accepted only if no
/// newer request has already been applied, so a slow response can never
/// overwrite the result of a request issued after it.
#[derive(Debug, Default, Clone)]
pub struct RequestSequencer {
    next: u64,
    applied: Option<RequestSeq>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestSeq {
        let seq = RequestSeq(self.next);
        self.next = self.next.wrapping_add(1);
        seq
    }

    pub fn last_applied(&self) -> Option<RequestSeq> {
        self.applied
    }

    /// Number of requests issued but not yet superseded by an applied one.
    pub fn outstanding(&self) -> u64 {
        match self.applied {
            Some(RequestSeq(a)) => self.next.saturating_sub(a + 1),
            None => self.next,
        }
    }

    /// Would a response for `seq` still be fresh?
    pub fn is_fresh(&self, seq: RequestSeq) -> bool {
        self.applied.is_none_or(|applied| seq > applied)
    }

    /// Mark `seq` as applied. Returns `false` (and changes nothing) if a newer
    /// response has already been applied.
    pub fn try_apply(&mut self, seq: RequestSeq) -> bool {
        if !self.is_fresh(seq) {
            return false;
        }
        self.applied = Some(seq);
        true
    }
}
