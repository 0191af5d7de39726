pub mod permutation;
pub mod spinlock;
