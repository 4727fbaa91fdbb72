use super::*;
use proptest::prelude::*;
use std::collections::VecDeque;
use tri_core::Edge;

fn ring(capacity: u32) -> Ring {
    let region = SharedRegion::anonymous(Ring::required_len(capacity)).unwrap();
    Ring::initialize(region, capacity).unwrap()
}

fn candidate(n: u32) -> CandidateSolution {
    CandidateSolution::from_conflicts((0..n % 5).map(|i| Edge::new(n, i)))
}

#[test]
fn initialize_publishes_header() {
    let ring = ring(4);
    let header = ring.header();
    assert_eq!(header.capacity(), 4);
    assert!(!header.stop_requested());
    assert_eq!(header.registered(), 0);
    assert_eq!(header.read_pos(), 0);
    assert_eq!(header.write_pos(), 0);
    assert_eq!(header.in_flight(), 0);
}

#[test]
fn rejects_zero_and_oversized_capacity() {
    let region = SharedRegion::anonymous(Ring::required_len(1)).unwrap();
    assert!(matches!(
        Ring::initialize(region, 0),
        Err(ChannelError::InvalidCapacity(0))
    ));
    assert!(Ring::validate_capacity(MAX_CAPACITY + 1).is_err());
    assert!(Ring::validate_capacity(MAX_CAPACITY).is_ok());
}

#[test]
fn rejects_region_too_small_for_capacity() {
    let region = SharedRegion::anonymous(Ring::required_len(2)).unwrap();
    assert!(Ring::initialize(region, 3).is_err());
}

#[test]
fn attach_rejects_uninitialized_region() {
    let region = SharedRegion::anonymous(Ring::required_len(2)).unwrap();
    assert!(matches!(
        Ring::attach(region),
        Err(ChannelError::NotReady { .. })
    ));
}

#[test]
fn cursors_wrap_modulo_capacity() {
    let ring = ring(3);
    for n in 0..7 {
        // SAFETY: single-threaded test; each write is drained before the ring fills.
        let written = unsafe { ring.write_next(&candidate(n)) };
        assert_eq!(written, n % 3);
        // SAFETY: as above.
        let (read, solution) = unsafe { ring.read_next() };
        assert_eq!(read, n % 3);
        assert_eq!(solution, candidate(n));
    }
    assert_eq!(ring.header().write_pos(), 7 % 3);
    assert_eq!(ring.header().read_pos(), 7 % 3);
    assert_eq!(ring.header().published(), 7);
    assert_eq!(ring.header().consumed(), 7);
}

#[test]
fn capacity_one_alternates_single_slot() {
    let ring = ring(1);
    for n in 0..3 {
        // SAFETY: single-threaded test; the only slot is drained every round.
        unsafe { ring.write_next(&candidate(n)) };
        assert_eq!(ring.header().in_flight(), 1);
        // SAFETY: as above.
        let (pos, solution) = unsafe { ring.read_next() };
        assert_eq!(pos, 0);
        assert_eq!(solution, candidate(n));
    }
}

#[derive(Clone, Debug)]
enum Op {
    Push,
    Pop,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(prop_oneof![Just(Op::Push), Just(Op::Pop)], 0..200)
}

proptest! {
    #[test]
    fn behaves_like_bounded_fifo(capacity in 1u32..9, ops in arb_ops()) {
        let ring = ring(capacity);
        let mut model = VecDeque::new();
        let mut next = 0u32;

        for op in ops {
            match op {
                // The semaphore protocol never lets a producer into a full ring
                Op::Push if model.len() < capacity as usize => {
                    // SAFETY: model tracks occupancy; the slot is free.
                    unsafe { ring.write_next(&candidate(next)) };
                    model.push_back(candidate(next));
                    next += 1;
                }
                Op::Pop if !model.is_empty() => {
                    // SAFETY: model tracks occupancy; the slot is published.
                    let (_, solution) = unsafe { ring.read_next() };
                    prop_assert_eq!(Some(solution), model.pop_front());
                }
                _ => {}
            }
            prop_assert!(ring.header().in_flight() <= u64::from(capacity));
            prop_assert_eq!(ring.header().in_flight(), model.len() as u64);
        }
    }
}
