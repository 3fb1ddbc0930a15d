use mishap_core::ErrorValue;

use crate::store::TemplateStore;

/// Display string for `value` in the locale `store` holds.
///
/// Missing templates yield the generic fallback message and a `warn` event;
/// missing parameters stay visible as `[?name]`.
pub fn resolve<S>(value: &ErrorValue, store: &S) -> String
where
    S: TemplateStore + ?Sized,
{
    value.get_display_message(|key| store.template(key).map(str::to_owned))
}
