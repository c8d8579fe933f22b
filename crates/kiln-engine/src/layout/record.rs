use bytemuck::Pod;

use super::AttributeDescriptor;

/// A vertex record: one or more attribute payloads packed in declaration order.
///
/// Implement it with [`vertex_record!`](crate::vertex_record), which keeps the
/// struct definition and the attribute list in sync and makes the struct
/// `#[repr(C)]`. The `Pod` bound rejects records with padding.
pub trait VertexRecord: Pod {
    const ATTRIBUTES: &'static [AttributeDescriptor];

    /// Where each field actually lives in the struct, one entry per attribute.
    const FIELDS: &'static [FieldSpan];
}

/// Byte offset and size of one record field, as laid out by the compiler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldSpan {
    pub offset: usize,
    pub size: usize,
}

/// Declares a vertex record struct composed of [`Attribute`](crate::layout::Attribute)
/// payloads and implements [`VertexRecord`] for it.
///
/// Field order is attribute order: the first field binds to slot 0.
///
/// The expansion derives `bytemuck::Pod`, so the calling crate needs
/// `bytemuck` (with the `derive` feature) as a dependency.
///
/// ```ignore
/// use kiln_engine::layout::{Color, Position};
///
/// kiln_engine::vertex_record! {
///     pub struct PositionColor {
///         pub position: Position,
///         pub color: Color,
///     }
/// }
/// ```
#[macro_export]
macro_rules! vertex_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($field_vis:vis $field:ident : $ty:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Copy, Clone, PartialEq, ::bytemuck::Pod, ::bytemuck::Zeroable)]
        $vis struct $name {
            $($field_vis $field: $ty),+
        }

        impl $crate::layout::VertexRecord for $name {
            const ATTRIBUTES: &'static [$crate::layout::AttributeDescriptor] = &[
                $(<$ty as $crate::layout::Attribute>::DESCRIPTOR),+
            ];

            const FIELDS: &'static [$crate::layout::FieldSpan] = &[
                $($crate::layout::FieldSpan {
                    offset: ::core::mem::offset_of!($name, $field),
                    size: ::core::mem::size_of::<$ty>(),
                }),+
            ];
        }
    };
}
