/// Static metadata advertising a wrapper to the host.
///
/// The `id` keys registry lookups and the settings table, so it must be
/// unique across the process and stable across releases.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct WrapperDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
}
