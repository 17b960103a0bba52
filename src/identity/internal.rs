/// Whether a package or dependency reference belongs to the internal registry.
///
/// Plain case-sensitive substring match against the configured internal domain.
/// An empty domain matches nothing.
#[must_use]
pub fn is_internal(url: &str, internal_domain: &str) -> bool {
    !internal_domain.is_empty() && url.contains(internal_domain)
}
