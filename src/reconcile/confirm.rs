use crate::deps::Dependencies;
use crate::error::DotfilerError;
use crate::logging::Log;

/// Question shown once, after the plan.
pub const CONFIRMATION_PROMPT: &str = "Apply these operations? (y/n)";

/// Ask the user once whether to apply the plan.
///
/// Only `y` or `Y` proceeds.
///
/// # Errors
///
/// Returns [`DotfilerError::UserCancelled`] for any other key, or
/// [`DotfilerError::Input`] if the key cannot be read.
pub fn confirm(deps: &dyn Dependencies, log: &dyn Log) -> Result<(), DotfilerError> {
    log.prompt(CONFIRMATION_PROMPT);
    let key = deps.read_confirmation_key()?;
    if key.eq_ignore_ascii_case(&'y') {
        Ok(())
    } else {
        log.debug(&format!("confirmation declined with {key:?}"));
        Err(DotfilerError::UserCancelled)
    }
}
