/// Values that can be clustered by [`KMeans1d`][crate::KMeans1d].
///
/// The engine only ever looks at this single integer. Two items are as far
/// apart as their keys are, and items are ordered by ascending key.
///
/// # Example
///
/// ```rust
/// use ordmeans::SortKey;
///
/// struct Reading {
///     sensor: &'static str,
///     millis: i64,
/// }
///
/// impl SortKey for Reading {
///     fn sort_key(&self) -> i64 {
///         self.millis
///     }
/// }
///
/// let r = Reading { sensor: "north", millis: 42 };
/// assert_eq!(r.sort_key(), 42);
/// ```
pub trait SortKey {
    fn sort_key(&self) -> i64;
}

macro_rules! impl_int {
    ( $t:ty ) => {
        impl SortKey for $t {
            fn sort_key(&self) -> i64 {
                i64::from(*self)
            }
        }
    };
}

impl_int!(i8);
impl_int!(i16);
impl_int!(i32);
impl_int!(i64);
impl_int!(u8);
impl_int!(u16);
impl_int!(u32);

impl<T> SortKey for &T
where
    T: SortKey + ?Sized,
{
    fn sort_key(&self) -> i64 {
        T::sort_key(*self)
    }
}

impl<T> SortKey for Box<T>
where
    T: SortKey + ?Sized,
{
    fn sort_key(&self) -> i64 {
        T::sort_key(self)
    }
}

/// Distance between two keys, `|a - b|`.
///
/// Never overflows, even for keys at both ends of the `i64` range.
pub fn distance(a: i64, b: i64) -> u64 {
    a.abs_diff(b)
}
