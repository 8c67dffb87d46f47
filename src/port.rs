//! Single-port send/receive serialisation.

/// Guard interval around every reserved slot.
const PORT_BUFFER: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
struct TimeSlot {
    start: f64,
    finish: f64,
}

/// Reserved I/O windows of a single-port host.
///
/// With the port constraint enabled a host can drive only one transfer at
/// a time: the sending and receiving phases of its tasks must stay clear
/// of every other reserved phase, with a one time-unit gap on both sides.
#[derive(Debug, Clone, Default)]
pub struct PortSchedule {
    slots: Vec<TimeSlot>,
}

impl PortSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, start: f64, finish: f64) {
        self.slots.push(TimeSlot { start, finish });
    }

    /// Earliest `ready' >= ready_time` such that a task starting its
    /// sending phase at `ready'` collides with no reserved slot.
    ///
    /// The task occupies `[ready', ready'+sending]` on the port, computes
    /// during `[ready'+sending, ready'+sending+comp]` and receives during
    /// the following `receiving` units. On a collision the ready time is
    /// bumped past the conflicting slot and the scan restarts. Zero-cost
    /// pseudo tasks and empty reservation lists pass through unchanged.
    pub fn earliest_ready(&self, ready_time: f64, comp: f64, sending: f64, receiving: f64) -> f64 {
        if comp == 0. || self.slots.is_empty() {
            return ready_time;
        }
        let mut ready = ready_time;
        loop {
            let send_finish = ready + sending;
            let recv_start = send_finish + comp;
            let recv_finish = recv_start + receiving;
            let conflict = self
                .slots
                .iter()
                .find(|slot| overlaps(ready, send_finish, slot) || overlaps(recv_start, recv_finish, slot));
            match conflict {
                Some(slot) => ready = slot.finish + PORT_BUFFER,
                None => return ready,
            }
        }
    }
}

fn overlaps(start: f64, finish: f64, slot: &TimeSlot) -> bool {
    start < slot.finish + PORT_BUFFER && finish > slot.start - PORT_BUFFER
}
