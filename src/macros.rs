/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Objects become mappings with string keys, arrays become sequences, and any
/// other expression goes through [`to_value`](crate::to_value) (falling back
/// to null if its `Serialize` impl fails).
///
/// ```rust
/// use serde_datafmt::{value, Value};
///
/// let v = value!({
///     "name": "web",
///     "replicas": 3,
///     "ports": [80, 443],
///     "tls": null
/// });
/// assert_eq!(v.get("replicas"), Some(&Value::from(3)));
/// assert_eq!(v.get("tls"), Some(&Value::Null));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Sequence(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Sequence(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Mapping($crate::Mapping::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut mapping = $crate::Mapping::new();
        $(
            mapping.insert($key, $crate::value!($value));
        )*
        $crate::Value::Mapping(mapping)
    }};

    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Null)
    };
}
