//! Hash collections used on hot paths (column registry lookups, per-batch
//! field unions). FxHash is fine here: keys are trusted field names.

pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;
