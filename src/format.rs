//! Text rendering of errata.

use core::fmt;

use crate::ErratumRef;

/// Separator placed between annotations by the [`Display`] implementation of
/// [`Erratum`] and [`ErratumRef`].
///
/// [`Display`]: core::fmt::Display
/// [`Erratum`]: crate::Erratum
pub const DEFAULT_GLUE: &str = "\n";

/// Renders an erratum with a custom separator between annotations.
///
/// Created by [`Erratum::display_with_glue`] and
/// [`ErratumRef::display_with_glue`]. Annotations are rendered newest first,
/// each as its [`Display`] form, with `glue` between two consecutive
/// annotations and nothing after the last one. An empty erratum renders as an
/// empty string.
///
/// [`Erratum::display_with_glue`]: crate::Erratum::display_with_glue
/// [`Display`]: crate::Annotation#impl-Display-for-Annotation<'_>
#[derive(Clone, Copy)]
pub struct ErratumDisplay<'a> {
    erratum: ErratumRef<'a>,
    glue: &'a str,
}

impl<'a> ErratumDisplay<'a> {
    pub(crate) fn new(erratum: ErratumRef<'a>, glue: &'a str) -> Self {
        Self { erratum, glue }
    }
}

impl fmt::Display for ErratumDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, note) in self.erratum.iter().enumerate() {
            if index > 0 {
                f.write_str(self.glue)?;
            }
            fmt::Display::fmt(&note, f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ErratumDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErratumDisplay")
            .field("erratum", &self.erratum)
            .field("glue", &self.glue)
            .finish()
    }
}
