use crate::builder::RegistrationBuilder;
use crate::error::CompositionError;

/// An independent configuration step contributing registrations.
///
/// Modules run in the order they are applied; with overwrite registrations a later module
/// wins, with try-add registrations an earlier one does.
///
/// Plain functions and closures taking `&mut RegistrationBuilder` are modules too.
pub trait CompositionModule {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// # Errors
    /// Returns an error if the module cannot describe its services, for example because a
    /// Temporary value it depends on is missing.
    fn configure(&self, builder: &mut RegistrationBuilder) -> Result<(), CompositionError>;
}

impl<F> CompositionModule for F
where
    F: Fn(&mut RegistrationBuilder) -> Result<(), CompositionError>,
{
    fn configure(&self, builder: &mut RegistrationBuilder) -> Result<(), CompositionError> {
        self(builder)
    }
}

impl std::fmt::Debug for dyn CompositionModule + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CompositionModule").field(&self.name()).finish()
    }
}
