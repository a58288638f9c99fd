pub(crate) fn is_true(v: &bool) -> bool {
    *v
}

pub(crate) fn is_zero_f32(v: &f32) -> bool {
    *v == 0.0
}

/// Declares `default_<name>()` and `is_default_<name>()` for use in serde attributes.
macro_rules! serde_default {
    ($name:ident, $ty:ty, $val:expr) => {
        ::paste::paste! {
            pub(crate) fn [<default_ $name>]() -> $ty { $val }
            #[allow(dead_code)]
            pub(crate) fn [<is_default_ $name>](v: &$ty) -> bool { *v == [<default_ $name>]() }
        }
    };
}

pub(crate) use serde_default;
