//! Concatenation of source units into one scan buffer.

use std::fmt::Display;

use tracing::warn;

/// Separator appended after every unit. Must never contain a brace.
pub const UNIT_SEPARATOR: char = '\n';

/// Concatenate readable units in order, each followed by [`UNIT_SEPARATOR`].
///
/// A unit that failed to read contributes nothing; the rest are still
/// aggregated.
pub fn aggregate<I, S, E>(units: I) -> String
where
    I: IntoIterator<Item = Result<S, E>>,
    S: AsRef<str>,
    E: Display,
{
    aggregate_located(units.into_iter().enumerate())
}

/// Like [`aggregate`], with each unit paired with the location it was read
/// from so skipped units can be reported by where they live.
pub fn aggregate_located<I, L, S, E>(units: I) -> String
where
    I: IntoIterator<Item = (L, Result<S, E>)>,
    L: Display,
    S: AsRef<str>,
    E: Display,
{
    let mut buffer = String::new();
    for (location, unit) in units {
        match unit {
            Ok(text) => {
                buffer.push_str(text.as_ref());
                buffer.push(UNIT_SEPARATOR);
            }
            Err(e) => {
                warn!(location = %location, error = %e, "skipping unreadable source unit");
            }
        }
    }
    buffer
}

/// Infallible form for units already held in memory.
pub fn aggregate_texts<S: AsRef<str>>(units: &[S]) -> String {
    aggregate(units.iter().map(Ok::<&S, std::convert::Infallible>))
}
