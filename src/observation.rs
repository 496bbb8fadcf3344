//! Canonical hashing keys for agent observations
//!
//! Observations come in many shapes: a constant for stateless games, an
//! integer cell index, a tuple of features or an `ndarray` of sensor values.
//! Floats and arrays cannot be hashed structurally, so every observation is
//! written into an [`ObservationKey`], a canonical text encoding that keeps
//! element order and array shape. Two observations share a table entry exactly
//! when their keys are equal.

use std::fmt::{self, Display, Write};

use ndarray::{ArrayBase, Data, Dimension};

/// Canonical, order-preserving encoding of one observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationKey(String);

impl ObservationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for ObservationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accumulates the encoding of a (possibly nested) observation.
#[derive(Debug, Default)]
pub struct KeyWriter {
    buffer: String,
}

impl KeyWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&mut self, value: impl Display) {
        // writing into a String cannot fail
        let _ = write!(self.buffer, "{}", value);
    }

    pub fn float(&mut self, value: f64) {
        // Debug output round-trips exactly and keeps the sign of zero
        let _ = write!(self.buffer, "{:?}", value);
    }

    pub fn text(&mut self, value: &str) {
        let _ = write!(self.buffer, "{:?}", value);
    }

    pub fn sequence<'a, T, I>(&mut self, open: char, close: char, items: I)
    where
        T: Observation + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        self.buffer.push(open);
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.buffer.push(',');
            }
            item.write_key(self);
        }
        self.buffer.push(close);
    }

    pub fn raw(&mut self, value: &str) {
        self.buffer.push_str(value);
    }

    pub fn finish(self) -> ObservationKey {
        ObservationKey(self.buffer)
    }
}

pub trait Observation {
    fn write_key(&self, writer: &mut KeyWriter);

    fn key(&self) -> ObservationKey {
        let mut writer = KeyWriter::new();
        self.write_key(&mut writer);
        writer.finish()
    }
}

impl Observation for ObservationKey {
    fn write_key(&self, writer: &mut KeyWriter) {
        writer.raw(&self.0);
    }

    fn key(&self) -> ObservationKey {
        self.clone()
    }
}

impl Observation for () {
    fn write_key(&self, writer: &mut KeyWriter) {
        writer.raw("()");
    }
}

macro_rules! display_observation {
    ($($t:ty),*) => {
        $(
            impl Observation for $t {
                fn write_key(&self, writer: &mut KeyWriter) {
                    writer.token(self);
                }
            }
        )*
    };
}

display_observation!(bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Observation for f32 {
    fn write_key(&self, writer: &mut KeyWriter) {
        writer.float(*self as f64);
    }
}

impl Observation for f64 {
    fn write_key(&self, writer: &mut KeyWriter) {
        writer.float(*self);
    }
}

impl Observation for char {
    fn write_key(&self, writer: &mut KeyWriter) {
        let _ = write!(writer.buffer, "{:?}", self);
    }
}

impl Observation for str {
    fn write_key(&self, writer: &mut KeyWriter) {
        writer.text(self);
    }
}

impl Observation for String {
    fn write_key(&self, writer: &mut KeyWriter) {
        writer.text(self);
    }
}

impl<T: Observation + ?Sized> Observation for &T {
    fn write_key(&self, writer: &mut KeyWriter) {
        (**self).write_key(writer);
    }
}

impl<T: Observation> Observation for Option<T> {
    fn write_key(&self, writer: &mut KeyWriter) {
        match self {
            Some(value) => {
                writer.raw("Some(");
                value.write_key(writer);
                writer.raw(")");
            }
            None => writer.raw("None"),
        }
    }
}

impl<T: Observation> Observation for [T] {
    fn write_key(&self, writer: &mut KeyWriter) {
        writer.sequence('[', ']', self.iter());
    }
}

impl<T: Observation> Observation for Vec<T> {
    fn write_key(&self, writer: &mut KeyWriter) {
        self.as_slice().write_key(writer);
    }
}

impl<T: Observation, const N: usize> Observation for [T; N] {
    fn write_key(&self, writer: &mut KeyWriter) {
        self.as_slice().write_key(writer);
    }
}

macro_rules! tuple_observation {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Observation),+> Observation for ($($name,)+) {
            fn write_key(&self, writer: &mut KeyWriter) {
                writer.raw("(");
                $(
                    if $idx > 0 {
                        writer.raw(",");
                    }
                    self.$idx.write_key(writer);
                )+
                writer.raw(")");
            }
        }
    };
}

tuple_observation!(A: 0);
tuple_observation!(A: 0, B: 1);
tuple_observation!(A: 0, B: 1, C: 2);
tuple_observation!(A: 0, B: 1, C: 2, D: 3);

impl<A, S, D> Observation for ArrayBase<S, D>
where
    A: Observation,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn write_key(&self, writer: &mut KeyWriter) {
        writer.raw("array");
        writer.token(format_args!("{:?}", self.shape()));
        // logical (row-major) order regardless of memory layout
        writer.sequence('[', ']', self.iter());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_equal_observations_share_a_key() {
        assert_eq!(vec![1, 2, 3].key(), [1, 2, 3].key());
        assert_eq!((0usize, true).key(), (0usize, true).key());
    }

    #[test]
    fn test_order_matters() {
        assert_ne!(vec![1, 2].key(), vec![2, 1].key());
        assert_ne!((1, 2).key(), (2, 1).key());
    }

    #[test]
    fn test_types_are_distinguished() {
        assert_ne!(1i64.key(), 1.0f64.key());
        assert_ne!(0.0f64.key(), (-0.0f64).key());
        assert_ne!("1".key(), 1u8.key());
        assert_ne!(vec!["a,b"].key(), vec!["a", "b"].key());
    }

    #[test]
    fn test_array_shape_is_part_of_the_key() {
        let flat: Array1<f64> = array![1.0, 2.0, 3.0, 4.0];
        let square = array![[1.0, 2.0], [3.0, 4.0]];
        assert_ne!(flat.key(), square.key());
        assert_eq!(square.key(), square.t().to_owned().t().key());
    }

    #[test]
    fn test_transposed_view_uses_logical_order() {
        let square = array![[1, 2], [3, 4]];
        let transposed = array![[1, 3], [2, 4]];
        assert_eq!(square.t().key(), transposed.key());
    }

    #[test]
    fn test_key_is_stable_text() {
        assert_eq!((0, vec![1.5, -2.0]).key().as_str(), "(0,[1.5,-2.0])");
        assert_eq!(Some(3u8).key().as_str(), "Some(3)");
    }
}
