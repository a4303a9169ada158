//! Macros to reduce boilerplate in vector path implementations

/// Implements the accessor half of [`VectorPath`](crate::layers::path::VectorPath)
///
/// This generates implementations for:
/// - properties(), properties_mut()
/// - as_any(), as_any_mut()
///
/// Usage:
/// ```ignore
/// impl VectorPath for MyShape {
///     impl_path_properties!(properties);
///     // project, update, geometry, contains_point, is_empty
/// }
/// ```
#[macro_export]
macro_rules! impl_path_properties {
    ($properties_field:ident) => {
        fn properties(&self) -> &$crate::layers::path::PathProperties {
            &self.$properties_field
        }

        fn properties_mut(&mut self) -> &mut $crate::layers::path::PathProperties {
            &mut self.$properties_field
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}
