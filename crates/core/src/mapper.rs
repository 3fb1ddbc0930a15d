//! Domain mapper contract.

use crate::code::ErrorFamily;
use crate::value::ErrorValue;

/// Translates one failure family into an [`ErrorValue`].
///
/// Implementations are pure: no IO, no panics, no raw failure returned. Every
/// implementation ends its match in an explicit default arm that produces the
/// family's `*_generic` code via [`unmapped`].
pub trait DomainMapper<F: ?Sized> {
    fn map(&self, failure: &F) -> ErrorValue;
}

/// Build the default-arm value for `family`.
///
/// The original discriminant and message go into `technical_detail` so the gap can
/// be found in logs and a dedicated code added later.
pub fn unmapped(family: ErrorFamily, discriminant: &str, message: &str) -> ErrorValue {
    let code = family.generic_code();
    tracing::warn!(
        family = ?family,
        discriminant = %discriminant,
        "unmapped failure discriminant; falling back to {code}"
    );
    ErrorValue::new(code, format!("unmapped {family:?} failure"))
        .with_detail(format!("discriminant={discriminant} message={message}"))
}
