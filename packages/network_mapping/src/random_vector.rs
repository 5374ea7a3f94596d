// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use rand::Rng;

/// Generates a Vec of length `length`, initially populated with values from 0..length.
/// Executes `length` number of swaps based on current position and an index chosen at random
pub fn random_permutation<T>(
    length: usize,
    rng: &mut T,
) -> Vec<usize>
where
    T: Rng,
{
    let mut permutation: Vec<usize> = Vec::with_capacity(length);
    for i in 0..length {
        permutation.push(i);
    }

    for i in 0..length {
        let random_index: usize = rng.gen_range(0..length);
        let old_value: usize = permutation[i];
        permutation[i] = permutation[random_index];
        permutation[random_index] = old_value;
    }

    return permutation;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn test_permutation_is_a_permutation() {
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(20);
        let mut permutation: Vec<usize> = random_permutation(257, &mut rng);
        permutation.sort_unstable();
        let expected: Vec<usize> = (0..257).collect();
        assert_eq!(permutation, expected);
    }

    #[test]
    fn test_determinism() {
        let mut rng1: XorShiftRng = XorShiftRng::seed_from_u64(1234);
        let mut rng2: XorShiftRng = XorShiftRng::seed_from_u64(1234);
        assert_eq!(
            random_permutation(1000, &mut rng1),
            random_permutation(1000, &mut rng2)
        );
    }
}
