//! Collection aliases used throughout the crate. Hiding the concrete hash map
//! and bijection implementations here keeps the rest of the code independent
//! of the chosen backing types.

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;

/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// A bijective mapping between `L` and `R`, associating each `L` with precisely
/// one `R` and vice versa. Used for label interning and canonical relabeling.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;
