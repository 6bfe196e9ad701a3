//! Rolling frame history for the diagnostics graphs.

/// Fixed-capacity buffer keeping the most recent samples.
pub struct RingBuffer {
    data: Vec<f32>,
    head: usize,
    len: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn push(&mut self, value: f32) {
        let cap = self.capacity();
        self.data[self.head] = value;
        self.head = (self.head + 1) % cap;
        if self.len < cap {
            self.len += 1;
        }
    }

    /// Samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let cap = self.capacity();
        let start = if self.len < cap { 0 } else { self.head };
        (0..self.len).map(move |i| self.data[(start + i) % cap])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn last(&self) -> Option<f32> {
        if self.len == 0 {
            None
        } else {
            let cap = self.capacity();
            Some(self.data[(self.head + cap - 1) % cap])
        }
    }

    pub fn max(&self) -> Option<f32> {
        self.iter().reduce(f32::max)
    }
}

/// Per-frame samples recorded by the engine.
pub struct FrameStats {
    pub frame_ms: RingBuffer,
    pub particle_count: RingBuffer,
    pub spawned: RingBuffer,
    spawned_since_sample: u32,
}

impl FrameStats {
    pub fn new(capacity: usize) -> Self {
        Self {
            frame_ms: RingBuffer::new(capacity),
            particle_count: RingBuffer::new(capacity),
            spawned: RingBuffer::new(capacity),
            spawned_since_sample: 0,
        }
    }

    /// Particles created between frames count toward the next sample.
    pub fn note_spawned(&mut self, count: usize) {
        self.spawned_since_sample = self.spawned_since_sample.saturating_add(count as u32);
    }

    pub fn record(&mut self, frame_ms: f64, particle_count: usize) {
        self.frame_ms.push(frame_ms as f32);
        self.particle_count.push(particle_count as f32);
        self.spawned.push(self.spawned_since_sample as f32);
        self.spawned_since_sample = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_iterates_in_insertion_order_after_wrap() {
        let mut buf = RingBuffer::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            buf.push(v);
        }

        let values: Vec<f32> = buf.iter().collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(buf.last(), Some(4.0));
        assert_eq!(buf.max(), Some(4.0));
    }

    #[test]
    fn spawn_counts_accumulate_until_next_sample() {
        let mut stats = FrameStats::new(8);
        stats.note_spawned(12);
        stats.note_spawned(3);
        stats.record(16.0, 15);
        stats.record(17.0, 14);

        let spawned: Vec<f32> = stats.spawned.iter().collect();
        assert_eq!(spawned, vec![15.0, 0.0]);
        assert_eq!(stats.particle_count.last(), Some(14.0));
    }
}
