//! Quote stream port trait.

use crate::domain::error::DcaError;
use crate::domain::quote::Quote;

pub type QuoteHandler<'a> = dyn FnMut(&dyn Quote) -> Result<(), DcaError> + 'a;

/// Source of an ordered quote sequence.
///
/// Implementations must deliver quotes in non-decreasing time order, invoke
/// the handler once per quote, stop on the first handler error and propagate
/// it. Returning `Ok(())` signals end-of-stream.
pub trait StreamPort {
    fn stream(&self, handler: &mut QuoteHandler) -> Result<(), DcaError>;
}
