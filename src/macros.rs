/// Declares a struct and registers its field metadata.
///
/// The struct-level tag follows the struct name and each field tag follows the
/// field type, both in the raw `key:"value"` form. A field declared `pub` is
/// exported; any other visibility is recorded as non-exported. Attributes on
/// the struct and on fields are passed through unchanged.
///
/// Generic structs are not supported; implement [`Record`](crate::Record) and
/// [`Reflect`](crate::Reflect) by hand for those.
///
/// # Examples
///
/// ```rust
/// use structmeta::{reflect_struct, to_struct};
///
/// reflect_struct! {
///     #[derive(Debug, Clone, Default)]
///     pub struct Shift => r#"vm:"shift""# {
///         pub id: i64 => r#"vm:"shiftid" json:"id""#,
///         pub staff: Option<String>,
///         note: String,
///     }
/// }
///
/// let shift = to_struct(&Shift::default()).unwrap();
/// assert_eq!(shift.name(), "Shift");
/// assert_eq!(shift.identifier(), "shift");
///
/// let fields = shift.fields();
/// assert_eq!(fields.len(), 3);
/// assert_eq!(fields[0].identifier(), "shiftid");
/// assert!(!fields[2].exported());
/// ```
#[macro_export]
macro_rules! reflect_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(=> $stag:literal)? {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(=> $ftag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::Record for $name {
            fn struct_type() -> $crate::StructType {
                static TYPE: ::std::sync::OnceLock<$crate::StructType> =
                    ::std::sync::OnceLock::new();
                TYPE.get_or_init(|| {
                    $crate::StructType::new(stringify!($name), ::std::any::type_name::<$name>())
                        $(.with_tag($stag))?
                        .with_fields(::std::vec![
                            $(
                                $crate::FieldDef::new(
                                    stringify!($field),
                                    <$fty as $crate::Reflect>::reflect_type,
                                )
                                .with_exported($crate::macros::is_exported(stringify!($fvis)))
                                $(.with_tag($ftag))?,
                            )*
                        ])
                })
                .clone()
            }

            fn field_values(&self) -> ::std::vec::Vec<$crate::Value> {
                ::std::vec![$($crate::Reflect::reflect(&self.$field),)*]
            }
        }

        impl $crate::Reflect for $name {
            fn reflect_type() -> $crate::Type {
                $crate::reflect::record_type::<Self>()
            }

            fn reflect(&self) -> $crate::Value {
                $crate::reflect::record_value(self)
            }
        }
    };
}

/// Only plain `pub` counts as exported; restricted visibilities do not.
#[doc(hidden)]
pub fn is_exported(visibility: &str) -> bool {
    visibility == "pub"
}

#[cfg(test)]
mod tests {
    use crate::{Kind, Record, Reflect, Type, Value};

    reflect_struct! {
        #[derive(Debug, Clone, Default)]
        struct Node => r#"vm:"node""# {
            pub id: i64 => r#"vm:"nodeid""#,
            pub(crate) weight: f64,
            children: Vec<Node>,
            pub parent: Option<Box<Node>>,
        }
    }

    #[test]
    fn test_visibility_maps_to_exported() {
        let ty = Node::struct_type();
        let exported: Vec<_> = ty.fields().iter().map(|f| f.exported()).collect();
        assert_eq!(exported, vec![true, false, false, true]);
    }

    #[test]
    fn test_tags_registered() {
        let ty = Node::struct_type();
        assert_eq!(ty.tag().get("vm"), Some("node"));
        assert_eq!(ty.fields()[0].tag().get("vm"), Some("nodeid"));
        assert!(ty.fields()[1].tag().is_empty());
    }

    #[test]
    fn test_self_referential_descriptor() {
        let ty = Node::struct_type();
        let children = ty.field("children").unwrap().ty();
        assert_eq!(children.kind(), Kind::Seq);
        assert_eq!(children.elem(), Some(&Node::reflect_type()));
        assert_eq!(
            ty.field("parent").unwrap().ty().indirect(),
            &Type::Struct(ty.clone())
        );
    }

    #[test]
    fn test_values_follow_declaration_order() {
        let node = Node {
            id: 3,
            weight: 0.5,
            children: vec![Node::default()],
            parent: None,
        };
        let values = node.field_values();
        assert_eq!(values[0], Value::Int(3));
        assert_eq!(values[1], Value::Float(0.5));
        assert_eq!(values[2].as_seq().map(<[Value]>::len), Some(1));
        assert!(values[3].is_nil_pointer());
    }
}
