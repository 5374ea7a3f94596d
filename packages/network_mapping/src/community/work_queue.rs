// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use std::collections::VecDeque;

use rand::Rng;

use crate::errors::CoreError;

/// A circular work queue over node ids paired with per-node stability flags.
/// A node is on the queue exactly when it is marked unstable; `pop_front`
/// marks the popped node stable again, and `push_back` enqueues a node only
/// if it is currently stable, so no node can occupy two queue slots.
#[derive(Debug, PartialEq)]
pub struct WorkQueue {
    work_queue: VecDeque<usize>,
    stable: Vec<bool>,
}

impl WorkQueue {
    /// Fills the queue with `0..len` in a random order and marks every node
    /// unstable. The backing vector is allocated one element larger than
    /// needed so the `Vec` to `VecDeque` conversion can reuse the buffer.
    pub fn items_in_random_order<T>(
        len: usize,
        rng: &mut T,
    ) -> WorkQueue
    where
        T: Rng,
    {
        let mut permutation: Vec<usize> = Vec::with_capacity(len + 1);
        for i in 0..len {
            permutation.push(i);
        }
        let mut stable: Vec<bool> = Vec::with_capacity(len);
        for i in 0..len {
            stable.push(false);
            let random_index: usize = rng.gen_range(0..len);
            let old_value: usize = permutation[i];
            permutation[i] = permutation[random_index];
            permutation[random_index] = old_value;
        }
        let work_queue: VecDeque<usize> = VecDeque::from(permutation);
        return WorkQueue { work_queue, stable };
    }

    pub fn pop_front(&mut self) -> Result<usize, CoreError> {
        let front: usize = self.work_queue.pop_front().ok_or(CoreError::QueueError)?;
        self.stable[front] = true;
        return Ok(front);
    }

    pub fn push_back(
        &mut self,
        item: usize,
    ) {
        if self.stable[item] {
            self.stable[item] = false;
            self.work_queue.push_back(item);
        }
    }

    pub fn is_empty(&self) -> bool {
        return self.work_queue.is_empty();
    }

    pub fn len(&self) -> usize {
        return self.work_queue.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn test_determinism() {
        let mut rng1: XorShiftRng = XorShiftRng::seed_from_u64(1234);
        let mut rng2: XorShiftRng = XorShiftRng::seed_from_u64(1234);
        let order_1: WorkQueue = WorkQueue::items_in_random_order(100000, &mut rng1);
        let order_2: WorkQueue = WorkQueue::items_in_random_order(100000, &mut rng2);
        assert_eq!(order_1, order_2);
    }

    #[test]
    fn test_no_double_enqueue() {
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(1);
        let mut queue: WorkQueue = WorkQueue::items_in_random_order(3, &mut rng);
        let popped: usize = queue.pop_front().unwrap();
        assert_eq!(queue.len(), 2);
        queue.push_back(popped);
        queue.push_back(popped);
        assert_eq!(queue.len(), 3);
    }
}
