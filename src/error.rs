use thiserror::Error;

/// All errors that the crate can generate.
///
/// Boxes that simply don't fit are *not* errors: they are reported through
/// [FitStatus](crate::FitStatus) and [TextLayoutStatus](crate::text::TextLayoutStatus)
/// and handled by splitting or moving on to the next region.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A style property was given a value it doesn't understand
    #[error("invalid value {value:?} for style property `{property}`")]
    InvalidStyle {
        property: &'static str,
        value: String,
    },

    #[error("unknown style property `{0}`")]
    UnknownStyleProperty(String),

    /// A polygon passed to [Shape::from_polygon](crate::Shape::from_polygon) has an
    /// edge that is neither horizontal nor vertical
    #[error("polygon edge ({0:.2}, {1:.2}) -> ({2:.2}, {3:.2}) is not axis aligned")]
    NonRectilinear(f32, f32, f32, f32),

    /// A box with a fixed height overflowed and its style asks for an error
    #[error("box of height {0:.2} could not be fit completely")]
    Overflow(f32),

    /// `split` or `draw` was called on a box that was never fit
    #[error("{0} called on a box that has not been fit")]
    NotFitted(&'static str),

    #[error("box could not be placed on an empty page with a content area of {0:.2} x {1:.2}")]
    ElementTooLarge(f32, f32),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FontParsing(#[from] owned_ttf_parser::FaceParsingError),
}
