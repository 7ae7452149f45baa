/// Construct a [`Value`][crate::Value] from a literal.
///
/// Maps use `key: value` entries where the key is a bare identifier, lists
/// use `[...]`, and anything else goes through [`Value::from`][crate::Value].
///
/// ```
/// let bindings = fae::value! {
///     title: "Launch",
///     draft: false,
///     tags: ["a", "b"],
///     author: { name: "John Smith" },
/// };
/// ```
#[macro_export]
macro_rules! value {
    () => {
        $crate::Value::Map($crate::value::Map::new())
    };
    ($($tt:tt)+) => {
        $crate::_value!($($tt)+)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value {
    //////////////////////////////////////////////////////////////////////////
    // TT muncher for the inside of a list [...]. Produces a Vec of the
    // elements. Invoked as: _value!(@list [] $($tt)*)
    //////////////////////////////////////////////////////////////////////////

    (@list [$($elems:expr,)*]) => {
        ::std::vec![$($elems,)*]
    };

    (@list [$($elems:expr),*]) => {
        ::std::vec![$($elems),*]
    };

    (@list [$($elems:expr,)*] None $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!(None)] $($rest)*)
    };

    (@list [$($elems:expr,)*] [$($list:tt)*] $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!([$($list)*])] $($rest)*)
    };

    (@list [$($elems:expr,)*] {$($map:tt)*} $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!({$($map)*})] $($rest)*)
    };

    (@list [$($elems:expr,)*] $next:expr, $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!($next),] $($rest)*)
    };

    (@list [$($elems:expr,)*] $last:expr) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!($last)])
    };

    (@list [$($elems:expr),*] , $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)*] $($rest)*)
    };

    //////////////////////////////////////////////////////////////////////////
    // TT muncher for the inside of a map {...}. Each entry is inserted into
    // the given map variable. Invoked as: _value!(@map $map () ($($tt)*))
    //////////////////////////////////////////////////////////////////////////

    (@map $map:ident () ()) => {};

    (@map $map:ident [$key:ident] ($value:expr) , $($rest:tt)*) => {
        let _ = $map.insert(stringify!($key).to_owned(), $value);
        $crate::_value!(@map $map () ($($rest)*));
    };

    (@map $map:ident [$key:ident] ($value:expr)) => {
        let _ = $map.insert(stringify!($key).to_owned(), $value);
    };

    (@map $map:ident ($key:ident) (: None $($rest:tt)*)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!(None)) $($rest)*);
    };

    (@map $map:ident ($key:ident) (: [$($list:tt)*] $($rest:tt)*)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!([$($list)*])) $($rest)*);
    };

    (@map $map:ident ($key:ident) (: {$($m:tt)*} $($rest:tt)*)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!({$($m)*})) $($rest)*);
    };

    (@map $map:ident ($key:ident) (: $value:expr , $($rest:tt)*)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!($value)) , $($rest)*);
    };

    (@map $map:ident ($key:ident) (: $value:expr)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!($value)));
    };

    (@map $map:ident () ($key:ident $($rest:tt)*)) => {
        $crate::_value!(@map $map ($key) ($($rest)*));
    };

    //////////////////////////////////////////////////////////////////////////
    // The main implementation. Invoked as: _value!($($tt)+)
    //////////////////////////////////////////////////////////////////////////

    (None) => {
        $crate::Value::None
    };

    ([]) => {
        $crate::Value::List($crate::value::List::new())
    };

    ([ $($tt:tt)+ ]) => {
        $crate::Value::List($crate::_value!(@list [] $($tt)+))
    };

    ({}) => {
        $crate::Value::Map($crate::value::Map::new())
    };

    ({ $($tt:tt)+ }) => {
        $crate::Value::Map({
            let mut map = $crate::value::Map::new();
            $crate::_value!(@map map () ($($tt)+));
            map
        })
    };

    // A bare sequence of `key: value` entries is a map.
    ($key:ident : $($rest:tt)*) => {
        $crate::_value!({ $key : $($rest)* })
    };

    // Default to the `From` implementations.
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::value::{List, Map};
    use crate::Value;

    #[test]
    fn value_none() {
        assert_eq!(value!(None), Value::None);
    }

    #[test]
    fn value_empty() {
        assert_eq!(value!(), Value::Map(Map::new()));
    }

    #[test]
    fn value_bare_entries() {
        let v = value! { x: "hello", y: 123 };
        let exp = Value::from([
            ("x".to_owned(), Value::from("hello")),
            ("y".to_owned(), Value::Integer(123)),
        ]);
        assert_eq!(v, exp);
    }

    #[test]
    fn value_scalars() {
        assert_eq!(value!(true), Value::Bool(true));
        assert_eq!(value!(123), Value::Integer(123));
        assert_eq!(value!(1.5), Value::Float(1.5));
        assert_eq!(value!("testing..."), Value::from("testing..."));
    }

    #[test]
    fn value_list() {
        let v = value!(["testing...", None, {}, []]);
        assert_eq!(
            v,
            Value::from([
                Value::from("testing..."),
                Value::None,
                Value::Map(Map::new()),
                Value::List(List::new()),
            ])
        );
    }

    #[test]
    fn value_map() {
        let v = value!({ x: "hello" });
        let exp = Value::from([("x", "hello")]);
        assert_eq!(v, exp);

        let v = value!({ x: "hello", });
        assert_eq!(v, exp);

        let v = value!({ x: "hello", y: String::from("world!") });
        let exp = Value::from([("x", "hello"), ("y", "world!")]);
        assert_eq!(v, exp);
    }

    #[test]
    fn value_map_nested() {
        let v = value!({
            w: "hello",
            x: {
                y: "hello",
                z: "world!",
            },
        });
        let exp = Value::from([
            ("w".to_owned(), Value::from("hello")),
            (
                "x".to_owned(),
                Value::from([("y", "hello"), ("z", "world!")]),
            ),
        ]);
        assert_eq!(v, exp);
    }

    #[test]
    fn value_map_list_entry() {
        let v = value!({ collection: [1, 2, 3, 4, 5] });
        let exp = Value::from([("collection".to_owned(), Value::from([1i64, 2, 3, 4, 5]))]);
        assert_eq!(v, exp);
    }
}
