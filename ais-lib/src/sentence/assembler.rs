use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::error::Result;
use crate::sentence::{Gatehouse, Sentence};

/// Fragment groups are keyed by sequence id and channel. `None` sequence
/// ids fold to -1 so single-sourced feeds without ids still group.
type GroupKey = (i16, Option<char>);

/// Reassembles multi-fragment sentences.
///
/// Fragments may arrive out of order and interleaved across `(sequence id,
/// channel)` groups. A bounded number of incomplete groups is kept in
/// flight; beyond that the oldest group is dropped, which bounds memory on
/// lossy UDP feeds where fragments go missing for good.
///
/// An assembler belongs to exactly one stream: the key space is not
/// meaningful across sources.
#[derive(Debug)]
pub struct Assembler {
    buffer: HashMap<GroupKey, Vec<Option<Sentence>>>,
    arrival: VecDeque<GroupKey>,
    max_in_flight: usize,
    pending_wrapper: Option<Gatehouse>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// Default bound on incomplete groups held in flight.
    pub const DEFAULT_MAX_IN_FLIGHT: usize = 10_000;

    #[must_use]
    pub fn new() -> Self {
        Self::with_max_in_flight(Self::DEFAULT_MAX_IN_FLIGHT)
    }

    #[must_use]
    pub fn with_max_in_flight(max_in_flight: usize) -> Self {
        Assembler {
            buffer: HashMap::new(),
            arrival: VecDeque::new(),
            max_in_flight: max_in_flight.max(1),
            pending_wrapper: None,
        }
    }

    /// Number of incomplete groups currently buffered.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.buffer.len()
    }

    /// Hold `wrapper` for attachment to the next completed sentence.
    pub fn set_wrapper(&mut self, wrapper: Gatehouse) {
        self.pending_wrapper = Some(wrapper);
    }

    /// Add a fragment, returning the assembled sentence once its group is
    /// complete. Single-fragment sentences pass through without buffering.
    ///
    /// A duplicate fragment index replaces the buffered one; differing
    /// payloads are traced, not failed, since lossy feeds legitimately
    /// re-send.
    ///
    /// # Errors
    /// [Error::MissingPayload](crate::Error) when a completed assembly has
    /// an empty payload.
    pub fn push(&mut self, sentence: Sentence) -> Result<Option<Sentence>> {
        if sentence.is_single() {
            return Ok(Some(self.finish(sentence)));
        }

        let key: GroupKey = (
            sentence.seq_id.map_or(-1, i16::from),
            sentence.channel,
        );
        let count = sentence.frag_count as usize;
        let slots = self.buffer.entry(key).or_insert_with(Vec::new);
        if slots.is_empty() {
            slots.resize(count, None);
            self.arrival.push_back(key);
        } else if slots.len() != count {
            // A new group reused the key with a different fragment count;
            // the old partial can never complete.
            debug!(?key, "fragment count changed mid-group, restarting");
            slots.clear();
            slots.resize(count, None);
        }

        let idx = sentence.frag_index as usize - 1;
        if let Some(prev) = &slots[idx] {
            if prev.payload != sentence.payload {
                debug!(?key, index = sentence.frag_index, "duplicate fragment differs, replacing");
            }
        }
        slots[idx] = Some(sentence);

        if slots.iter().all(Option::is_some) {
            let parts: Vec<Sentence> = self
                .buffer
                .remove(&key)
                .expect("group present, it was just filled")
                .into_iter()
                .map(|s| s.expect("all slots populated"))
                .collect();
            let assembled = Sentence::assemble(parts)?;
            return Ok(Some(self.finish(assembled)));
        }

        self.evict();
        Ok(None)
    }

    /// Discard all in-flight groups and any pending wrapper.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.arrival.clear();
        self.pending_wrapper = None;
    }

    fn finish(&mut self, mut sentence: Sentence) -> Sentence {
        if let Some(wrapper) = self.pending_wrapper.take() {
            sentence.wrapper = Some(wrapper);
        }
        sentence
    }

    fn evict(&mut self) {
        while self.buffer.len() > self.max_in_flight {
            // Arrival order may hold keys of groups that already completed;
            // skip those.
            let Some(key) = self.arrival.pop_front() else {
                break;
            };
            if self.buffer.remove(&key).is_some() {
                debug!(?key, "evicting incomplete fragment group");
            }
        }
    }
}

/// Collects sentences that share a tag-block `g:` group id, independent of
/// AIS fragment reassembly.
///
/// Sentences without a group release immediately as singletons; grouped
/// sentences release as a list, in arrival order, once all `total` members
/// arrived.
#[derive(Debug)]
pub struct GroupAssembler {
    groups: HashMap<u32, (u32, Vec<Sentence>)>,
    arrival: VecDeque<u32>,
    max_in_flight: usize,
}

impl Default for GroupAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupAssembler {
    #[must_use]
    pub fn new() -> Self {
        GroupAssembler {
            groups: HashMap::new(),
            arrival: VecDeque::new(),
            max_in_flight: Assembler::DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Add a sentence, returning a completed group if this one finished it.
    pub fn push(&mut self, sentence: Sentence) -> Option<Vec<Sentence>> {
        let Some(group) = sentence.tag_block.as_ref().and_then(|tb| tb.group) else {
            return Some(vec![sentence]);
        };
        let (total, members) = self
            .groups
            .entry(group.group_id)
            .or_insert_with(|| {
                self.arrival.push_back(group.group_id);
                (group.sentence_tot, Vec::new())
            });
        *total = group.sentence_tot.max(1);
        members.push(sentence);

        if members.len() as u32 >= *total {
            let (_, members) = self
                .groups
                .remove(&group.group_id)
                .expect("group present, it was just filled");
            return Some(members);
        }

        while self.groups.len() > self.max_in_flight {
            let Some(id) = self.arrival.pop_front() else {
                break;
            };
            if self.groups.remove(&id).is_some() {
                debug!(group = id, "evicting incomplete tag-block group");
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Sentence;

    const FRAG1: &[u8] =
        b"!AIVDM,2,1,4,A,55O0W7`00001L@gCWGA2uItLth@DqtL5@F22220j1h742t0Ht0000000,0*08";
    const FRAG2: &[u8] = b"!AIVDM,2,2,4,A,000000000000000,2*20";
    const SINGLE: &[u8] = b"!AIVDM,1,1,,B,15M67FC000G?ufbE`FepT@3n00Sa,0*5C";

    fn sentence(raw: &[u8]) -> Sentence {
        Sentence::parse(raw).unwrap()
    }

    #[test]
    fn single_bypasses_buffering() {
        let mut asm = Assembler::new();
        let out = asm.push(sentence(SINGLE)).unwrap();
        assert!(out.is_some());
        assert_eq!(asm.in_flight(), 0);
    }

    #[test]
    fn assembles_in_order() {
        let mut asm = Assembler::new();
        assert!(asm.push(sentence(FRAG1)).unwrap().is_none());
        let out = asm.push(sentence(FRAG2)).unwrap().unwrap();
        assert_eq!(out.fill_bits, 2);
        assert!(out.payload.starts_with("55O0W7`0"));
        assert_eq!(asm.in_flight(), 0);
    }

    #[test]
    fn assembles_out_of_order() {
        let mut asm = Assembler::new();
        assert!(asm.push(sentence(FRAG2)).unwrap().is_none());
        let a = asm.push(sentence(FRAG1)).unwrap().unwrap();

        let mut asm = Assembler::new();
        asm.push(sentence(FRAG1)).unwrap();
        let b = asm.push(sentence(FRAG2)).unwrap().unwrap();

        assert_eq!(a.payload, b.payload);
        assert_eq!(a.fill_bits, b.fill_bits);
    }

    #[test]
    fn interleaved_groups_do_not_mix() {
        // Same fragments on channel B form an independent group.
        let mut asm = Assembler::new();
        let frag1_b = {
            let mut s = sentence(FRAG1);
            s.channel = Some('B');
            s
        };
        assert!(asm.push(sentence(FRAG1)).unwrap().is_none());
        assert!(asm.push(frag1_b).unwrap().is_none());
        assert_eq!(asm.in_flight(), 2);
        assert!(asm.push(sentence(FRAG2)).unwrap().is_some());
        assert_eq!(asm.in_flight(), 1);
    }

    #[test]
    fn duplicate_fragment_replaces_silently() {
        let mut asm = Assembler::new();
        assert!(asm.push(sentence(FRAG1)).unwrap().is_none());
        assert!(asm.push(sentence(FRAG1)).unwrap().is_none());
        assert!(asm.push(sentence(FRAG2)).unwrap().is_some());
    }

    #[test]
    fn eviction_bounds_in_flight() {
        let mut asm = Assembler::with_max_in_flight(2);
        for seq in 0..5u8 {
            let mut s = sentence(FRAG1);
            s.seq_id = Some(seq);
            assert!(asm.push(s).unwrap().is_none());
        }
        assert!(asm.in_flight() <= 2);
    }

    #[test]
    fn wrapper_attaches_to_next_completion() {
        let mut asm = Assembler::new();
        let wrapper =
            crate::sentence::Gatehouse::parse(b"$PGHP,1,2020,12,31,23,59,58,239,0,0,0,1,2C*5B")
                .unwrap();
        asm.set_wrapper(wrapper);
        assert!(asm.push(sentence(FRAG1)).unwrap().is_none());
        let out = asm.push(sentence(FRAG2)).unwrap().unwrap();
        assert!(out.wrapper.is_some());

        // Consumed: the next completion has no wrapper.
        let out = asm.push(sentence(SINGLE)).unwrap().unwrap();
        assert!(out.wrapper.is_none());
    }

    #[test]
    fn groups_release_in_arrival_order() {
        use crate::sentence::{TagBlock, TagBlockGroup};

        let mk = |num: u32, marker: u8| {
            let mut s = sentence(SINGLE);
            s.seq_id = Some(marker);
            s.tag_block = Some(TagBlock {
                group: Some(TagBlockGroup {
                    sentence_num: num,
                    sentence_tot: 3,
                    group_id: 4512,
                }),
                ..TagBlock::default()
            });
            s
        };
        let mut groups = GroupAssembler::new();
        assert!(groups.push(mk(1, 0)).is_none());
        assert!(groups.push(mk(3, 1)).is_none());
        let out = groups.push(mk(2, 2)).unwrap();
        assert_eq!(out.len(), 3);
        let order: Vec<u8> = out.iter().map(|s| s.seq_id.unwrap()).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn ungrouped_sentences_release_immediately() {
        let mut groups = GroupAssembler::new();
        let out = groups.push(sentence(SINGLE)).unwrap();
        assert_eq!(out.len(), 1);
    }
}
