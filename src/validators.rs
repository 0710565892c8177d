use thiserror::Error;

/// Inclusive character-length bounds. `min` defaults to 0, `max` of `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthBounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn min_or_zero(&self) -> usize {
        self.min.unwrap_or(0)
    }
}

pub const ANNOTATION_TEXT_LENGTH_BOUNDS: LengthBounds = LengthBounds::new(10, 300);
pub const DELETE_USER_REASON_DETAIL_BOUNDS: LengthBounds = LengthBounds::new(15, 600);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Annotation text must be between {min} and {max} characters.")]
    AnnotationLength { min: usize, max: usize },
    #[error("Delete user reason detail text must be between {min} and {max} characters.")]
    DeleteReasonDetailLength { min: usize, max: usize },
}

pub fn is_within_bounds(length: usize, bounds: LengthBounds) -> bool {
    let min = bounds.min_or_zero();
    match bounds.max {
        Some(max) => min <= length && length <= max,
        None => min <= length,
    }
}

/// Character count as the moderator sees it (not bytes).
pub fn text_length(text: &str) -> usize {
    text.chars().count()
}

pub fn assert_valid_annotation_text_length(length: usize) -> Result<(), ValidationError> {
    if !is_within_bounds(length, ANNOTATION_TEXT_LENGTH_BOUNDS) {
        return Err(ValidationError::AnnotationLength {
            min: ANNOTATION_TEXT_LENGTH_BOUNDS.min_or_zero(),
            max: ANNOTATION_TEXT_LENGTH_BOUNDS.max.unwrap_or(usize::MAX),
        });
    }
    Ok(())
}

pub fn assert_valid_delete_user_reason_detail_text_length(
    length: usize,
) -> Result<(), ValidationError> {
    if !is_within_bounds(length, DELETE_USER_REASON_DETAIL_BOUNDS) {
        return Err(ValidationError::DeleteReasonDetailLength {
            min: DELETE_USER_REASON_DETAIL_BOUNDS.min_or_zero(),
            max: DELETE_USER_REASON_DETAIL_BOUNDS.max.unwrap_or(usize::MAX),
        });
    }
    Ok(())
}

/// The hint shown under a text area while the moderator types.
pub fn char_counter_hint(length: usize, bounds: LengthBounds) -> String {
    let min = bounds.min_or_zero();
    if length < min {
        return format!("{} more characters needed", min - length);
    }
    match bounds.max {
        Some(max) if length > max => format!("{} characters over the limit", length - max),
        Some(max) => format!("{} characters left", max - length),
        None => format!("{} characters", length),
    }
}
